use shape_core::{Kind, ListItem, MapEntry, MapPattern, Pattern, Value};
use winnow::{
    ModalResult, Parser,
    ascii::{digit1, multispace1, till_line_ending},
    combinator::{alt, cut_err, eof, fail, opt, repeat},
    error::{StrContext, StrContextValue},
    stream::Stream as _,
    token::{any, one_of, take_till, take_while},
};

use crate::ParseError;

pub type Input<'a> = &'a str;

/// Maximum nesting of lists and maps, matching `serde_json`'s recursion limit.
pub const MAX_DEPTH: usize = 128;

/// Parse a pattern, with wildcards.
pub fn parse_pattern(source: &str) -> Result<Pattern, ParseError> {
    (|input: &mut Input<'_>| document(input, true))
        .parse(source)
        .map_err(ParseError::from)
}

/// Parse a plain value. Wildcards and type names are rejected.
pub fn parse_value(source: &str) -> Result<Value, ParseError> {
    let pattern = (|input: &mut Input<'_>| document(input, false))
        .parse(source)
        .map_err(ParseError::from)?;
    pattern.into_value().ok_or_else(|| ParseError {
        offset: 0,
        message: String::from("wildcards are not allowed in values"),
    })
}

fn document(input: &mut Input<'_>, wild: bool) -> ModalResult<Pattern> {
    ws(input)?;
    let pattern = pattern(input, wild, 0)?;
    ws(input)?;
    cut_err(eof)
        .context(expected("end of input"))
        .parse_next(input)?;
    Ok(pattern)
}

fn expected(description: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(description))
}

/// Fail without backtracking at the current position.
fn fatal<O>(input: &mut Input<'_>, description: &'static str) -> ModalResult<O> {
    cut_err(fail)
        .context(expected(description))
        .parse_next(input)
}

/// Whitespace and `#` comments.
fn ws(input: &mut Input<'_>) -> ModalResult<()> {
    repeat(0.., alt((multispace1.void(), ('#', till_line_ending).void()))).parse_next(input)
}

/// Optionally consume the `...` wildcard.
fn ellipsis(input: &mut Input<'_>, wild: bool) -> ModalResult<bool> {
    if !wild {
        return Ok(false);
    }
    Ok(opt("...").parse_next(input)?.is_some())
}

fn pattern(input: &mut Input<'_>, wild: bool, depth: usize) -> ModalResult<Pattern> {
    match input.chars().next() {
        Some('[' | '{') if depth >= MAX_DEPTH => fatal(input, "nesting depth of at most 128"),
        Some('[') => list(input, wild, depth + 1).map(Pattern::List),
        Some('{') => map(input, wild, depth + 1).map(Pattern::Map),
        Some('"') => string(input).map(Pattern::String),
        Some(c) if c == '-' || c.is_ascii_digit() => number(input),
        Some(c) if c.is_ascii_alphabetic() => word(input, wild),
        _ if wild => fatal(input, "a value, a type name, a list, or a map"),
        _ => fatal(input, "a value, a list, or a map"),
    }
}

fn list(input: &mut Input<'_>, wild: bool, depth: usize) -> ModalResult<Vec<ListItem>> {
    '['.parse_next(input)?;
    let mut items = Vec::new();

    loop {
        ws(input)?;
        if opt(']').parse_next(input)?.is_some() {
            return Ok(items);
        }

        if ellipsis(input, wild)? {
            items.push(ListItem::Gap);
        } else {
            items.push(ListItem::Item(pattern(input, wild, depth)?));
        }

        ws(input)?;
        if cut_err(one_of([',', ']']))
            .context(expected("`,` or `]`"))
            .parse_next(input)?
            == ']'
        {
            return Ok(items);
        }
    }
}

fn map(input: &mut Input<'_>, wild: bool, depth: usize) -> ModalResult<MapPattern> {
    '{'.parse_next(input)?;
    let mut map = MapPattern::new();

    loop {
        ws(input)?;
        if opt('}').parse_next(input)?.is_some() {
            return Ok(map);
        }

        let key_start = input.checkpoint();
        let key = if ellipsis(input, wild)? {
            None
        } else {
            Some(map_key(input)?)
        };

        ws(input)?;
        cut_err(':').context(expected("`:`")).parse_next(input)?;
        ws(input)?;

        let entry = if ellipsis(input, wild)? {
            MapEntry::Exists
        } else {
            MapEntry::Value(pattern(input, wild, depth)?)
        };

        let previous = match key {
            Some(key) => map.insert(key, entry),
            None => map.set_rest(entry),
        };
        if previous.is_some() {
            input.reset(&key_start);
            return fatal(input, "a key that does not appear earlier in the map");
        }

        ws(input)?;
        if cut_err(one_of([',', '}']))
            .context(expected("`,` or `}`"))
            .parse_next(input)?
            == '}'
        {
            return Ok(map);
        }
    }
}

fn map_key(input: &mut Input<'_>) -> ModalResult<String> {
    match input.chars().next() {
        Some('"') => string(input),
        Some(c) if is_ident_char(c) => Ok(take_while(1.., is_ident_char)
            .parse_next(input)?
            .to_owned()),
        _ => fatal(input, "a key"),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// `null`, `true`, `false`, or a type name.
fn word(input: &mut Input<'_>, wild: bool) -> ModalResult<Pattern> {
    let start = input.checkpoint();
    let word = take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
    match word {
        "null" => Ok(Pattern::Null),
        "true" => Ok(Pattern::Bool(true)),
        "false" => Ok(Pattern::Bool(false)),
        _ => match Kind::from_name(word) {
            Some(kind) if wild => Ok(Pattern::Type(kind)),
            _ => {
                input.reset(&start);
                if wild {
                    fatal(
                        input,
                        "`null`, `true`, `false`, or a type name (`bool`, `int`, `float`, `str`, `list`, `dict`)",
                    )
                } else {
                    fatal(input, "`null`, `true`, or `false`")
                }
            }
        },
    }
}

/// JSON number. Integers without a fraction or exponent are `int`.
fn number(input: &mut Input<'_>) -> ModalResult<Pattern> {
    let start = input.checkpoint();
    let ((_, _, fraction, exponent), text) = (
        opt('-'),
        cut_err(digit1).context(expected("digits")),
        opt(('.', cut_err(digit1).context(expected("digits after `.`")))),
        opt((
            one_of(['e', 'E']),
            opt(one_of(['+', '-'])),
            cut_err(digit1).context(expected("exponent digits")),
        )),
    )
        .with_taken()
        .parse_next(input)?;

    if fraction.is_some() || exponent.is_some() {
        if let Some(x) = text.parse::<f64>().ok().filter(|x| x.is_finite()) {
            return Ok(Pattern::Float(x));
        }
    } else if let Ok(i) = text.parse::<i64>() {
        return Ok(Pattern::Int(i));
    }

    input.reset(&start);
    fatal(input, "a number that fits in a 64-bit integer or float")
}

/// JSON string literal.
fn string(input: &mut Input<'_>) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut out = String::new();

    loop {
        let chunk = take_till(0.., ['"', '\\', '\n']).parse_next(input)?;
        out.push_str(chunk);

        match cut_err(any)
            .context(expected("closing `\"`"))
            .parse_next(input)?
        {
            '"' => return Ok(out),
            '\\' => out.push(escape(input)?),
            _ => return fatal(input, "closing `\"` before the end of the line"),
        }
    }
}

fn escape(input: &mut Input<'_>) -> ModalResult<char> {
    let start = input.checkpoint();
    let c = cut_err(any)
        .context(expected("escape sequence"))
        .parse_next(input)?;

    Ok(match c {
        '"' => '"',
        '\\' => '\\',
        '/' => '/',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'u' => {
            let high = hex4(input)?;
            let code = if (0xD800..0xDC00).contains(&high) {
                cut_err("\\u")
                    .context(expected("low surrogate `\\uXXXX`"))
                    .parse_next(input)?;
                let low = hex4(input)?;
                if !(0xDC00..0xE000).contains(&low) {
                    input.reset(&start);
                    return fatal(input, "a valid surrogate pair");
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            } else {
                high
            };
            let Some(c) = char::from_u32(code) else {
                input.reset(&start);
                return fatal(input, "a valid unicode escape");
            };
            c
        }
        _ => {
            input.reset(&start);
            return fatal(input, "one of `\\\"`, `\\\\`, `\\/`, `\\n`, `\\r`, `\\t`, `\\b`, `\\f`, `\\u`");
        }
    })
}

fn hex4(input: &mut Input<'_>) -> ModalResult<u32> {
    let digits = cut_err(take_while(4, |c: char| c.is_ascii_hexdigit()))
        .context(expected("four hex digits"))
        .parse_next(input)?;
    // Four hex digits always fit.
    Ok(u32::from_str_radix(digits, 16).unwrap_or_default())
}
