mod assert;
mod compare;
mod error;
mod normalize;
mod pattern;
mod value;

pub use assert::*;
pub use compare::*;
pub use error::*;
pub use normalize::*;
pub use pattern::*;
pub use value::*;

#[doc(no_inline)]
pub use indexmap;
