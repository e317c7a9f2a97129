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

//! `@path` references in formulas, resolved against actor or item data.

use crate::parser::ParseError;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::alphanumeric1,
    combinator::recognize,
    multi::many1,
    sequence::preceded,
    IResult,
};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Source of numeric values for `@path` references, e.g. ability modifiers.
pub trait RollData {
    fn lookup(&self, path: &str) -> Option<i64>;
}

impl<S: BuildHasher> RollData for HashMap<String, i64, S> {
    fn lookup(&self, path: &str) -> Option<i64> {
        self.get(path).copied()
    }
}

impl RollData for BTreeMap<String, i64> {
    fn lookup(&self, path: &str) -> Option<i64> {
        self.get(path).copied()
    }
}

pub fn parse_reference(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("@"),
        recognize(many1(alt((alphanumeric1, tag("."), tag("_"))))),
    )(input)
}

/// Replaces every reference by its value. Negative values are wrapped in
/// parentheses so they stay a single term.
pub fn replace_data_references<D: RollData + ?Sized>(
    formula: &str,
    data: &D,
) -> Result<String, ParseError> {
    let mut output = String::with_capacity(formula.len());
    let mut rest = formula;
    while let Some(at) = rest.find('@') {
        output.push_str(&rest[..at]);
        match parse_reference(&rest[at..]) {
            Ok((remaining, path)) => {
                let value = data
                    .lookup(path)
                    .ok_or_else(|| ParseError::UnknownReference(path.to_string()))?;
                if value < 0 {
                    output.push_str(&format!("({})", value));
                } else {
                    output.push_str(&value.to_string());
                }
                rest = remaining;
            }
            Err(_) => {
                // a lone '@' is left for the parser to reject
                output.push('@');
                rest = &rest[at + 1..];
            }
        }
    }
    output.push_str(rest);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("@mod + 2"), Ok((" + 2", "mod")));
        assert_eq!(
            parse_reference("@abilities.dex.mod"),
            Ok(("", "abilities.dex.mod"))
        );
        assert!(parse_reference("@ mod").is_err());
    }

    #[test]
    fn test_replace_without_references() {
        let data: BTreeMap<String, i64> = BTreeMap::new();
        assert_eq!(
            replace_data_references("1d20 + 4", &data),
            Ok("1d20 + 4".to_string())
        );
        assert_eq!(replace_data_references("1d20 @", &data), Ok("1d20 @".to_string()));
    }

    #[test]
    fn test_replace_multiple_references() {
        let mut data = BTreeMap::new();
        data.insert("prof".to_string(), 2);
        data.insert("mod".to_string(), 4);
        assert_eq!(
            replace_data_references("1d20+@mod+@prof", &data),
            Ok("1d20+4+2".to_string())
        );
    }
}
