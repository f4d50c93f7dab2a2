//! The STF parser: turns text into a [`tagbf::Tag`]. A mirror of
//! [`super::emit`] — every form the emitter produces, this parser accepts.

use nom::branch::alt;
use nom::bytes::complete::tag as ntag;
use nom::character::complete::{char, multispace0};
use nom::combinator::{map, map_res};
use nom::multi::separated_list0;
use nom::sequence::{delimited, separated_pair};
use nom::IResult;

use tagbf::{Compound, Tag, TagList};

use crate::error::{Error, Result};
use super::grammar::{
    parse_f32, parse_f64_bare, parse_f64_suffixed, parse_i16, parse_i32, parse_i64, parse_i8,
    parse_str,
};

/// Parses a complete STF document into a [`Tag`]. Fails if any input remains
/// after a full value is read.
pub fn from_stf(input: &str) -> Result<Tag> {
    let trimmed = skip_ws(input);
    match value(trimmed) {
        Ok((rest, tag)) => {
            let rest = skip_ws(rest);
            if rest.is_empty() {
                Ok(tag)
            } else {
                Err(Error::TrailingInput {
                    position: input.len() - rest.len(),
                })
            }
        }
        Err(_) => Err(Error::Parse {
            position: input.len() - trimmed.len(),
            message: "expected a value".to_owned(),
        }),
    }
}

fn skip_ws(input: &str) -> &str {
    multispace0::<_, nom::error::Error<&str>>(input)
        .map(|(rest, _)| rest)
        .unwrap_or(input)
}

fn ws<'a, F, O>(mut inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    move |input: &'a str| {
        let (input, _) = multispace0(input)?;
        let (input, out) = inner(input)?;
        let (input, _) = multispace0(input)?;
        Ok((input, out))
    }
}

// Order matters: suffixed/typed forms are tried first; the bare-decimal
// double form (requires a literal '.') must be tried *before* the bare
// integer form, since a nom `alt` commits to the first successful prefix
// match and `123` is itself a valid (partial) prefix of `123.5`.
fn value(input: &str) -> IResult<&str, Tag> {
    alt((
        typed_array,
        map(parse_i8, Tag::Byte),
        map(parse_i16, Tag::Short),
        map(parse_i64, Tag::Long),
        map(parse_f32, Tag::Float),
        map(parse_f64_suffixed, Tag::Double),
        map(parse_f64_bare, Tag::Double),
        map(parse_i32, Tag::Int),
        map(compound, Tag::Compound),
        list,
        map(parse_str, |s| Tag::String(s.into_owned())),
    ))(input)
}

fn typed_array(input: &str) -> IResult<&str, Tag> {
    alt((byte_array, int_array, long_array))(input)
}

fn byte_array(input: &str) -> IResult<&str, Tag> {
    map(
        delimited(
            ws(|i| ntag("[B;")(i)),
            separated_list0(ws(|i| char(',')(i)), ws(parse_i8)),
            ws(|i| char(']')(i)),
        ),
        |items| Tag::ByteArray(items.into_iter().map(|b| b as u8).collect()),
    )(input)
}

fn int_array(input: &str) -> IResult<&str, Tag> {
    map(
        delimited(
            ws(|i| ntag("[I;")(i)),
            separated_list0(ws(|i| char(',')(i)), ws(parse_i32)),
            ws(|i| char(']')(i)),
        ),
        Tag::IntArray,
    )(input)
}

fn long_array(input: &str) -> IResult<&str, Tag> {
    map(
        delimited(
            ws(|i| ntag("[L;")(i)),
            separated_list0(ws(|i| char(',')(i)), ws(parse_i64)),
            ws(|i| char(']')(i)),
        ),
        Tag::LongArray,
    )(input)
}

fn list(input: &str) -> IResult<&str, Tag> {
    map_res(
        delimited(
            ws(|i| char('[')(i)),
            separated_list0(ws(|i| char(',')(i)), value),
            ws(|i| char(']')(i)),
        ),
        |items| TagList::from_items(items).map(Tag::List),
    )(input)
}

fn key(input: &str) -> IResult<&str, String> {
    map(parse_str, |s| s.into_owned())(input)
}

fn entry(input: &str) -> IResult<&str, (String, Tag)> {
    separated_pair(ws(key), ws(|i| char(':')(i)), ws(value))(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
    map(
        delimited(
            ws(|i| char('{')(i)),
            separated_list0(ws(|i| char(',')(i)), entry),
            ws(|i| char('}')(i)),
        ),
        |entries| entries.into_iter().collect(),
    )(input)
}
