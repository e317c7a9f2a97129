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

use crate::{locate::D20_FACES, roll_state::RollState};
use insight_dice_roll::{DiceTerm, Expression, Modifier, Selector, Term};
use std::ops::ControlFlow;

#[cfg(feature = "logging")]
use log::debug;

/// A d20 roll rewritten as a single die, together with what was taken out.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NormalizedFormula {
    pub expression: Expression,
    pub formula: String,
    /// Dice count of the d20 group before normalization.
    pub num_rolls: Option<u32>,
    pub roll_state: RollState,
}

fn roll_state_of(dice: &DiceTerm) -> RollState {
    match dice.keep_selector() {
        Some(Selector::Higher) => RollState::Advantage,
        Some(Selector::Lower) => RollState::Disadvantage,
        None => RollState::None,
    }
}

fn normalize_term(dice: &mut DiceTerm) -> (u32, RollState) {
    let original = (dice.count, roll_state_of(dice));
    dice.count = 1;
    dice.modifiers.retain(|m| !matches!(m, Modifier::Keep(..)));
    original
}

/// Collapses the first d20 group to `1d20` without keep modifiers. Other
/// modifiers and already rolled results stay untouched, the input is never
/// modified.
pub fn normalize_d20_formula(expression: &Expression) -> NormalizedFormula {
    let mut expression = expression.clone();
    let found = match expression.try_walk_mut(&mut |term| match term {
        Term::Dice(dice) if dice.faces == D20_FACES => ControlFlow::Break(normalize_term(dice)),
        _ => ControlFlow::Continue(()),
    }) {
        ControlFlow::Break(found) => Some(found),
        ControlFlow::Continue(()) => None,
    };
    let (num_rolls, roll_state) = match found {
        Some((count, state)) => (Some(count), state),
        None => (None, RollState::None),
    };
    let formula = expression.formula();

    #[cfg(feature = "logging")]
    {
        debug!(
            "normalized d20 roll to {} ({:?} rolls, {})",
            &formula, num_rolls, roll_state
        );
    }

    NormalizedFormula {
        expression,
        formula,
        num_rolls,
        roll_state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_dice_roll::{parser::parse_formula, DieResult, Filter};

    #[test]
    fn test_advantage() {
        let expression = parse_formula("2d20kh").unwrap();
        let normalized = normalize_d20_formula(&expression);
        assert_eq!(normalized.num_rolls, Some(2));
        assert_eq!(normalized.roll_state, RollState::Advantage);
        assert_eq!(normalized.formula, "1d20");
        assert_eq!(
            normalized.expression.terms,
            vec![Term::Dice(DiceTerm::new(1, 20))]
        );
        assert_eq!(expression.formula(), "2d20kh");
    }

    #[test]
    fn test_disadvantage_keeps_other_parts() {
        let expression = parse_formula("2d20kl1r1 + 4").unwrap();
        let normalized = normalize_d20_formula(&expression);
        assert_eq!(normalized.num_rolls, Some(2));
        assert_eq!(normalized.roll_state, RollState::Disadvantage);
        assert_eq!(normalized.formula, "1d20r1 + 4");
    }

    #[test]
    fn test_plain_roll() {
        let normalized = normalize_d20_formula(&parse_formula("1d20 + 5").unwrap());
        assert_eq!(normalized.num_rolls, Some(1));
        assert_eq!(normalized.roll_state, RollState::None);
        assert_eq!(normalized.formula, "1d20 + 5");
    }

    #[test]
    fn test_without_d20() {
        let expression = parse_formula("2d6kh + 3").unwrap();
        let normalized = normalize_d20_formula(&expression);
        assert_eq!(normalized.num_rolls, None);
        assert_eq!(normalized.roll_state, RollState::None);
        assert_eq!(normalized.formula, "2d6kh + 3");
        assert_eq!(normalized.expression, expression);
    }

    #[test]
    fn test_nested_d20() {
        let expression = parse_formula("{2d20kh + 2, 10}kh").unwrap();
        let normalized = normalize_d20_formula(&expression);
        assert_eq!(normalized.num_rolls, Some(2));
        assert_eq!(normalized.formula, "{1d20 + 2, 10}kh");
    }

    #[test]
    fn test_results_preserved() {
        let d20 = DiceTerm::new(2, 20)
            .with_modifier(Modifier::Keep(Selector::Higher, 1))
            .with_modifier(Modifier::Reroll(Filter::Equal, 1))
            .with_results(vec![
                DieResult {
                    discarded: true,
                    ..DieResult::new(7)
                },
                DieResult::new(15),
            ]);
        let expression = Expression {
            total: Some(15),
            ..Expression::new(vec![Term::Dice(d20.clone())])
        };
        let normalized = normalize_d20_formula(&expression);
        match &normalized.expression.terms[0] {
            Term::Dice(dice) => {
                assert_eq!(dice.results, d20.results);
                assert_eq!(dice.modifiers, vec![Modifier::Reroll(Filter::Equal, 1)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(normalized.expression.total, Some(15));
    }

    #[test]
    fn test_idempotent() {
        for formula in &["2d20kh + 1d4", "3d20kl2", "1d8 + 2", "(1d20r1) - 1"] {
            let once = normalize_d20_formula(&parse_formula(formula).unwrap());
            let twice = normalize_d20_formula(&once.expression);
            assert_eq!(twice.expression, once.expression);
            assert_eq!(twice.formula, once.formula);
        }
    }
}
