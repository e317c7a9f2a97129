/*
Copyright 2021 Robin Marchart

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use crate::{
    dice_types::{
        DiceTerm, Expression, Filter, Modifier, NumericTerm, Operation, PoolTerm, Selector, Term,
    },
    roll_data::{replace_data_references, RollData},
};

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till},
    character::complete::{digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, verify},
    error::context,
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ParseError {
    #[error("invalid dice formula {formula:?}, unable to continue at {rest:?}")]
    Invalid { formula: String, rest: String },
    #[error("unknown roll data reference @{0}")]
    UnknownReference(String),
}

pub fn parse_dice_digit(input: &str) -> IResult<&str, &str> {
    alt((tag_no_case("d"), tag_no_case("w")))(input)
}

pub fn parse_u32(input: &str) -> IResult<&str, u32> {
    context(
        "Failed to parse integer between 1 and 4294967295 inclusive",
        verify(
            map_res(digit1, |s: &str| s.parse::<u32>()),
            |value: &u32| value > &0,
        ),
    )(input)
}

pub fn parse_number(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |s: &str| s.parse::<i64>())(input)
}

pub fn parse_faces(input: &str) -> IResult<&str, u32> {
    alt((parse_u32, map(tag("%"), |_| 100)))(input)
}

pub fn parse_filter(input: &str) -> IResult<&str, Filter> {
    alt((
        map(tag(">="), |_| Filter::BiggerEq),
        map(tag(">"), |_| Filter::Bigger),
        map(tag("<="), |_| Filter::SmallerEq),
        map(tag("<"), |_| Filter::Smaller),
        map(tag("!="), |_| Filter::NotEq),
        map(tag("="), |_| Filter::Equal),
    ))(input)
}

pub fn parse_selector(input: &str) -> IResult<&str, Selector> {
    alt((
        map(tag_no_case("h"), |_| Selector::Higher),
        map(tag_no_case("l"), |_| Selector::Lower),
    ))(input)
}

/// `k`, `kh`, `kl` with an optional count, defaulting to keep-highest-1.
pub fn parse_keep(input: &str) -> IResult<&str, Modifier> {
    map(
        preceded(tag_no_case("k"), pair(opt(parse_selector), opt(parse_u32))),
        |(selector, keep)| Modifier::Keep(selector.unwrap_or(Selector::Higher), keep.unwrap_or(1)),
    )(input)
}

/// `r`, `r2`, `r<3`; a bare `r` rerolls ones.
pub fn parse_reroll(input: &str) -> IResult<&str, Modifier> {
    map(
        preceded(tag_no_case("r"), pair(opt(parse_filter), opt(parse_number))),
        |(filter, target)| Modifier::Reroll(filter.unwrap_or(Filter::Equal), target.unwrap_or(1)),
    )(input)
}

pub fn parse_modifier(input: &str) -> IResult<&str, Modifier> {
    alt((parse_keep, parse_reroll))(input)
}

pub fn parse_dice(input: &str) -> IResult<&str, DiceTerm> {
    map(
        tuple((
            opt(parse_u32),
            preceded(parse_dice_digit, parse_faces),
            many0(parse_modifier),
        )),
        |(count, faces, modifiers)| DiceTerm {
            count: count.unwrap_or(1),
            faces,
            modifiers,
            results: Vec::new(),
            flavor: None,
        },
    )(input)
}

pub fn parse_numeric(input: &str) -> IResult<&str, NumericTerm> {
    map(parse_number, NumericTerm::new)(input)
}

pub fn parse_flavor(input: &str) -> IResult<&str, String> {
    map(
        delimited(tag("["), take_till(|c| c == ']'), tag("]")),
        |flavor: &str| flavor.trim().to_string(),
    )(input)
}

pub fn parse_parenthetical(input: &str) -> IResult<&str, PoolTerm> {
    map(
        delimited(
            terminated(tag("("), multispace0),
            parse_terms,
            preceded(multispace0, tag(")")),
        ),
        PoolTerm::parenthetical,
    )(input)
}

pub fn parse_pool(input: &str) -> IResult<&str, PoolTerm> {
    map(
        pair(
            delimited(
                terminated(tag("{"), multispace0),
                separated_list1(delimited(multispace0, tag(","), multispace0), parse_terms),
                preceded(multispace0, tag("}")),
            ),
            many0(parse_keep),
        ),
        |(expressions, modifiers)| PoolTerm {
            expressions,
            modifiers,
            results: Vec::new(),
            flavor: None,
        },
    )(input)
}

pub fn parse_operator(input: &str) -> IResult<&str, Operation> {
    alt((
        map(tag("+"), |_| Operation::Add),
        map(tag("-"), |_| Operation::Sub),
    ))(input)
}

pub fn parse_term(input: &str) -> IResult<&str, Term> {
    map(
        pair(
            alt((
                map(parse_dice, Term::Dice),
                map(parse_numeric, Term::Numeric),
                map(parse_parenthetical, Term::Pool),
                map(parse_pool, Term::Pool),
            )),
            opt(preceded(multispace0, parse_flavor)),
        ),
        |(mut term, flavor)| {
            if let Some(flavor) = flavor.filter(|f| !f.is_empty()) {
                term.set_flavor(Some(flavor));
            }
            term
        },
    )(input)
}

/// An optionally signed term followed by any number of `op term` pairs.
pub fn parse_terms(input: &str) -> IResult<&str, Expression> {
    map(
        tuple((
            opt(terminated(parse_operator, multispace0)),
            parse_term,
            many0(pair(
                delimited(multispace0, parse_operator, multispace0),
                parse_term,
            )),
        )),
        |(sign, first, rest)| {
            let mut terms = Vec::with_capacity(rest.len() * 2 + 2);
            if let Some(sign) = sign {
                terms.push(Term::Operator(sign));
            }
            terms.push(first);
            for (op, term) in rest {
                terms.push(Term::Operator(op));
                terms.push(term);
            }
            Expression::new(terms)
        },
    )(input)
}

pub fn parse_expression(input: &str) -> IResult<&str, Expression> {
    delimited(multispace0, parse_terms, multispace0)(input)
}

/// Parses a complete formula, rejecting trailing input.
pub fn parse_formula(formula: &str) -> Result<Expression, ParseError> {
    match all_consuming(parse_expression)(formula) {
        Ok((_, expression)) => Ok(expression),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::Invalid {
            formula: formula.to_string(),
            rest: e.input.to_string(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Invalid {
            formula: formula.to_string(),
            rest: String::new(),
        }),
    }
}

/// Resolves `@` references against `data` before parsing.
pub fn parse_formula_with_data<D: RollData + ?Sized>(
    formula: &str,
    data: &D,
) -> Result<Expression, ParseError> {
    parse_formula(&replace_data_references(formula, data)?)
}
