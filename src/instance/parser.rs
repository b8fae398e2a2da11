//! Nom-based JSON parser producing span-carrying instance tokens.
//!
//! The schema reader can lean on serde, but the validator needs source
//! positions for its diagnostics and the Integer/Float/Date distinction,
//! so instances get their own single-pass parser. Spans are byte offsets
//! into the original text, recovered from slice positions.

use chrono::{DateTime, NaiveDate};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, opt, recognize},
    multi::separated_list0,
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{SchemaError, SchemaResult};
use crate::instance::span::Span;
use crate::instance::value::{Instance, InstanceKind};

/// Parse a complete JSON instance document.
///
/// Fails with [`SchemaError::MalformedJson`] on invalid JSON or trailing
/// content.
pub fn parse_instance(source: &str) -> SchemaResult<Instance> {
    match parse_value(source, source) {
        Ok((rest, instance)) => {
            if rest.trim().is_empty() {
                Ok(instance)
            } else {
                Err(SchemaError::MalformedJson(format!(
                    "trailing characters at offset {}",
                    offset_of(source, rest)
                )))
            }
        }
        Err(err) => Err(SchemaError::MalformedJson(err.to_string())),
    }
}

fn offset_of(source: &str, rest: &str) -> usize {
    rest.as_ptr() as usize - source.as_ptr() as usize
}

fn parse_value<'a>(source: &'a str, input: &'a str) -> IResult<&'a str, Instance> {
    let (input, _) = multispace0(input)?;
    let start = offset_of(source, input);
    let (rest, kind) = alt((
        |i| parse_object(source, i),
        |i| parse_array(source, i),
        parse_string_kind,
        parse_number,
        parse_literal,
    ))(input)?;
    let end = offset_of(source, rest);
    Ok((
        rest,
        Instance {
            kind,
            span: Span::new(start, end),
        },
    ))
}

fn parse_object<'a>(source: &'a str, input: &'a str) -> IResult<&'a str, InstanceKind> {
    let (input, _) = char('{')(input)?;
    let (input, members) = separated_list0(ws_comma, |i| parse_member(source, i))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('}')(input)?;
    Ok((input, InstanceKind::Object(members)))
}

fn parse_member<'a>(source: &'a str, input: &'a str) -> IResult<&'a str, (String, Instance)> {
    let (input, _) = multispace0(input)?;
    let (input, name) = parse_string(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(':')(input)?;
    let (input, value) = parse_value(source, input)?;
    Ok((input, (name, value)))
}

fn parse_array<'a>(source: &'a str, input: &'a str) -> IResult<&'a str, InstanceKind> {
    let (input, _) = char('[')(input)?;
    let (input, elements) = separated_list0(ws_comma, |i| parse_value(source, i))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(']')(input)?;
    Ok((input, InstanceKind::Array(elements)))
}

fn ws_comma(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    let (input, _) = char(',')(input)?;
    Ok((input, ()))
}

fn parse_literal(input: &str) -> IResult<&str, InstanceKind> {
    alt((
        map(tag("null"), |_| InstanceKind::Null),
        map(tag("true"), |_| InstanceKind::Boolean(true)),
        map(tag("false"), |_| InstanceKind::Boolean(false)),
    ))(input)
}

// Parse a number, keeping the integer/float distinction from the lexical
// form: a fraction or exponent makes it a float.
fn parse_number(input: &str) -> IResult<&str, InstanceKind> {
    let (rest, text) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(preceded(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;

    let kind = if text.contains(['.', 'e', 'E']) {
        match text.parse::<f64>() {
            Ok(value) => InstanceKind::Float(value),
            Err(_) => return Err(fail(input)),
        }
    } else {
        match text.parse::<i64>() {
            Ok(value) => InstanceKind::Integer(value),
            // out of i64 range, fall back to float
            Err(_) => match text.parse::<f64>() {
                Ok(value) => InstanceKind::Float(value),
                Err(_) => return Err(fail(input)),
            },
        }
    };
    Ok((rest, kind))
}

fn parse_string_kind(input: &str) -> IResult<&str, InstanceKind> {
    let (rest, text) = parse_string(input)?;
    Ok((rest, classify_string(text)))
}

fn classify_string(text: String) -> InstanceKind {
    if is_date_like(&text) {
        InstanceKind::Date(text)
    } else {
        InstanceKind::String(text)
    }
}

fn is_date_like(text: &str) -> bool {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok()
}

// Parse a quoted string with the full JSON escape set, including \uXXXX
// and surrogate pairs.
fn parse_string(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )))
        }
    }

    let mut out = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((&input[i + 1..], out)),
            '\\' => {
                let escape = match chars.next() {
                    Some((_, e)) => e,
                    None => return Err(fail(input)),
                };
                match escape {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    '/' => out.push('/'),
                    'b' => out.push('\u{0008}'),
                    'f' => out.push('\u{000C}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'u' => {
                        let unit = match hex4(&mut chars) {
                            Some(unit) => unit,
                            None => return Err(fail(input)),
                        };
                        let decoded = if (0xD800..=0xDBFF).contains(&unit) {
                            match (chars.next(), chars.next()) {
                                (Some((_, '\\')), Some((_, 'u'))) => {
                                    let low = match hex4(&mut chars) {
                                        Some(low) => low,
                                        None => return Err(fail(input)),
                                    };
                                    if !(0xDC00..=0xDFFF).contains(&low) {
                                        return Err(fail(input));
                                    }
                                    let combined = 0x10000
                                        + (((unit as u32 - 0xD800) << 10)
                                            | (low as u32 - 0xDC00));
                                    match char::from_u32(combined) {
                                        Some(c) => c,
                                        None => return Err(fail(input)),
                                    }
                                }
                                _ => return Err(fail(input)),
                            }
                        } else {
                            match char::from_u32(unit as u32) {
                                Some(c) => c,
                                None => return Err(fail(input)),
                            }
                        };
                        out.push(decoded);
                    }
                    _ => return Err(fail(input)),
                }
            }
            c if (c as u32) < 0x20 => return Err(fail(input)),
            c => out.push(c),
        }
    }
    // unterminated string
    Err(fail(input))
}

fn hex4(chars: &mut std::str::CharIndices<'_>) -> Option<u16> {
    let mut value = 0u16;
    for _ in 0..4 {
        let (_, c) = chars.next()?;
        let digit = c.to_digit(16)? as u16;
        value = value.checked_mul(16)?.checked_add(digit)?;
    }
    Some(value)
}

fn fail(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Escaped))
}
