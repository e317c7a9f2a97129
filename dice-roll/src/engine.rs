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
    dice_roll::{EvaluateOptions, EvaluationErrors, ExpressionEvaluate},
    dice_types::Expression,
    parser::{parse_formula_with_data, ParseError},
};
use rand::{rngs::ThreadRng, Rng};
use std::collections::HashMap;
use thiserror::Error;

#[cfg(feature = "logging")]
use log::debug;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to evaluate roll: {0}")]
    Evaluation(#[from] EvaluationErrors),
}

/// Parses formulas and rolls expressions. Evaluation always completes
/// synchronously and returns a fully populated copy.
pub trait RollEngine {
    fn parse(&self, formula: &str) -> Result<Expression, EngineError>;

    fn evaluate(
        &mut self,
        expression: &Expression,
        options: EvaluateOptions,
    ) -> Result<Expression, EngineError>;

    fn roll(&mut self, formula: &str, options: EvaluateOptions) -> Result<Expression, EngineError> {
        let expression = self.parse(formula)?;
        self.evaluate(&expression, options)
    }
}

pub struct DiceRoller<R: Rng> {
    rng: R,
    data: HashMap<String, i64>,
}

impl<R: Rng> DiceRoller<R> {
    pub fn new(rng: R) -> DiceRoller<R> {
        DiceRoller {
            rng,
            data: HashMap::new(),
        }
    }

    /// Values for `@path` references in parsed formulas.
    pub fn with_data<S, I>(mut self, data: I) -> DiceRoller<R>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, i64)>,
    {
        self.data
            .extend(data.into_iter().map(|(path, value)| (path.into(), value)));
        self
    }
}

impl DiceRoller<ThreadRng> {
    pub fn from_entropy() -> DiceRoller<ThreadRng> {
        DiceRoller::new(rand::thread_rng())
    }
}

impl<R: Rng> RollEngine for DiceRoller<R> {
    fn parse(&self, formula: &str) -> Result<Expression, EngineError> {
        Ok(parse_formula_with_data(formula, &self.data)?)
    }

    fn evaluate(
        &mut self,
        expression: &Expression,
        options: EvaluateOptions,
    ) -> Result<Expression, EngineError> {
        let result = expression.evaluate(&options, &mut self.rng)?;
        #[cfg(feature = "logging")]
        {
            debug!(
                "evaluated {} to {:?} (maximize: {})",
                &result, result.total, options.maximize
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn roller() -> DiceRoller<Xoshiro256PlusPlus> {
        DiceRoller::new(Xoshiro256PlusPlus::seed_from_u64(42))
    }

    #[test]
    fn test_roll_formula() {
        let mut roller = roller();
        for _ in 0..100 {
            let rolled = roller
                .roll("1d20 + 5", EvaluateOptions::default())
                .unwrap();
            let total = rolled.total.unwrap();
            assert!((6..=25).contains(&total));
            assert_eq!(rolled.formula(), "1d20 + 5");
        }
    }

    #[test]
    fn test_roll_maximized_with_data() {
        let mut roller = roller().with_data(vec![("mod", 3)]);
        let rolled = roller
            .roll("2d6 + @mod", EvaluateOptions::maximized())
            .unwrap();
        assert_eq!(rolled.total, Some(15));
    }

    #[test]
    fn test_same_seed_same_results() {
        let first = roller()
            .roll("4d6kh3 + 1d8", EvaluateOptions::default())
            .unwrap();
        let second = roller()
            .roll("4d6kh3 + 1d8", EvaluateOptions::default())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_error_is_surfaced() {
        assert!(matches!(
            roller().roll("1d6 *", EvaluateOptions::default()),
            Err(EngineError::Parse(ParseError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_oversized_roll_is_an_error() {
        assert_eq!(
            roller().roll("4294967295d20", EvaluateOptions::default()),
            Err(EngineError::Evaluation(EvaluationErrors::TooManyDice(
                4294967295
            )))
        );
    }
}
