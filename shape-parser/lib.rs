//! Text notation for patterns.
//!
//! The notation is JSON with three extensions: `...` as a list item (a gap),
//! `...` as a map value (the key must exist), and `...: ...` as a map entry
//! (other keys are allowed). Type names (`bool`, `int`, `float`, `str`, `list`,
//! `dict`) match any value of that type. Keys may be written without quotes,
//! trailing commas are allowed, and `#` starts a comment.
//!
//! ```text
//! {
//!     ...: ...,
//!     id: int,
//!     name: "Alice",
//!     tags: [..., "y", ...],
//! }
//! ```

mod error;
pub mod parser;

pub use error::*;
pub use parser::{parse_pattern, parse_value};
