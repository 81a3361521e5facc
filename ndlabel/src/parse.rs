/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! This module defines a parser for the textual form of index
//! expressions.
//! ```text
//! index    ::= entry ( "," entry )*
//! entry    ::= slice
//!            | scalar
//! slice    ::= scalar? ":" scalar? ( ":" scalar? )?
//! scalar   ::= complex | number | string
//! complex  ::= "(" number ("+" | "-") unsigned "j" ")"
//!            | number "j"
//! number   ::= ( "+" | "-" )? unsigned
//! unsigned ::= ( [0-9]+ ( "." [0-9]* )? | "." [0-9]+ )
//!              ( ("e" | "E") ("+" | "-")? [0-9]+ )?
//! string   ::= "'" [^']* "'" | '"' [^"]* '"'
//! ```
//!
//! Notes:
//! - A number without a fractional part or exponent is an integer
//!   position; any other number is an axis value.
//! - A slice led by a string is name-based: `'flux':0.5` fixes the
//!   `flux` axis at 0.5 and `'flux'::2` takes its first two positions.
//! - An expression made of one integer and nothing else is plain
//!   integer indexing ([`Index::Int`]).
//! - Whitespace may surround any token, but never splits one: `1 2`
//!   is not `12`.

use std::str::FromStr;

use nom::IResult;
use nom::Parser;
use nom::branch::alt;
use nom::bytes::complete::take_while;
use nom::character::complete::char;
use nom::character::complete::multispace0;
use nom::character::complete::one_of;
use nom::combinator::map;
use nom::combinator::map_res;
use nom::combinator::opt;
use nom::combinator::verify;
use nom::multi::separated_list1;
use nom::number::complete::recognize_float;
use nom::sequence::delimited;
use nom::sequence::preceded;
use num_complex::Complex64;

use crate::index::Index;
use crate::index::IndexEntry;
use crate::index::Scalar;
use crate::index::SliceExpr;

/// Errors that can occur while parsing an index expression.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("parse error: invalid index expression {input:?}: {reason}")]
    Invalid { input: String, reason: String },
}

// `token` with any surrounding whitespace.
fn ws<'a, O, P>(token: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, token, multispace0)
}

fn signed(input: &str) -> IResult<&str, &str> {
    recognize_float(input)
}

fn unsigned(input: &str) -> IResult<&str, &str> {
    verify(signed, |text: &str| !text.starts_with(['+', '-'])).parse(input)
}

fn to_scalar(text: &str) -> Result<Scalar, String> {
    if text.contains(['.', 'e', 'E']) {
        text.parse().map(Scalar::Real).map_err(|e| format!("{e}"))
    } else {
        text.parse().map(Scalar::Int).map_err(|e| format!("{e}"))
    }
}

fn real(input: &str) -> IResult<&str, f64> {
    map_res(signed, str::parse).parse(input)
}

fn number(input: &str) -> IResult<&str, Scalar> {
    map_res(signed, to_scalar).parse(input)
}

fn complex(input: &str) -> IResult<&str, Complex64> {
    alt((
        delimited(
            char('('),
            map(
                (real, one_of("+-"), map_res(unsigned, str::parse::<f64>), char('j')),
                |(re, sign, im, _)| Complex64::new(re, if sign == '-' { -im } else { im }),
            ),
            char(')'),
        ),
        map((real, char('j')), |(im, _)| Complex64::new(0.0, im)),
    ))
    .parse(input)
}

fn string(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        str::to_string,
    )
    .parse(input)
}

fn scalar(input: &str) -> IResult<&str, Scalar> {
    alt((
        map(complex, Scalar::Complex),
        number,
        map(string, Scalar::Str),
    ))
    .parse(input)
}

fn slice(input: &str) -> IResult<&str, IndexEntry> {
    let (input, (start, stop, step)) = (
        opt(ws(scalar)),
        preceded(ws(char(':')), opt(ws(scalar))),
        opt(preceded(ws(char(':')), opt(ws(scalar)))),
    )
        .parse(input)?;

    Ok((
        input,
        IndexEntry::Slice(SliceExpr {
            start,
            stop,
            step: step.flatten(),
        }),
    ))
}

fn entry(input: &str) -> IResult<&str, IndexEntry> {
    alt((slice, map(ws(scalar), IndexEntry::Scalar))).parse(input)
}

pub fn expression(input: &str) -> IResult<&str, Index> {
    map(separated_list1(ws(char(',')), entry), |entries: Vec<IndexEntry>| {
        if let [IndexEntry::Scalar(Scalar::Int(position))] = entries.as_slice() {
            return Index::Int(*position);
        }
        Index::Entries(entries)
    })
    .parse(input)
}

/// Parses an index expression from a string. Whitespace between
/// tokens is ignored.
///
/// ```
/// use ndlabel::index::Index;
///
/// let index = ndlabel::parse::parse("'flux'::2, 'ng':-1").unwrap();
/// assert!(!index.is_positional());
/// assert_eq!(ndlabel::parse::parse("3").unwrap(), Index::Int(3));
/// ```
pub fn parse(input: &str) -> Result<Index, ParseError> {
    use nom::combinator::all_consuming;

    let (_, index) = all_consuming(expression)
        .parse(input)
        .map_err(|err| ParseError::Invalid {
            input: input.to_string(),
            reason: err.to_string(),
        })?;
    Ok(index)
}

impl FromStr for Index {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
