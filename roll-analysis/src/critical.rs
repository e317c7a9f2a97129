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

//! Bonus damage rolled on a critical hit.

use crate::{error::RollError, flavor::strip_flavors};
use insight_dice_roll::{
    EvaluateOptions, EvaluationErrors, Expression, Operation, PoolTerm, RollEngine, Term,
};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use log::debug;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "snake_case"))]
pub enum CriticalPolicy {
    /// Only the critical dice are rolled.
    #[default]
    RerollOnly = 1,
    /// The critical dice show their maximum.
    MaximizeBase = 2,
    /// The critical dice show their maximum and the base roll is topped up
    /// to its maximum.
    MaximizeAll = 3,
    /// The base roll is topped up to its maximum, the critical dice are
    /// rolled.
    MaximizeBaseRollCrit = 4,
}

impl CriticalPolicy {
    pub fn from_ordinal(ordinal: u8) -> Option<CriticalPolicy> {
        match ordinal {
            1 => Some(CriticalPolicy::RerollOnly),
            2 => Some(CriticalPolicy::MaximizeBase),
            3 => Some(CriticalPolicy::MaximizeAll),
            4 => Some(CriticalPolicy::MaximizeBaseRollCrit),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CriticalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CriticalPolicy::RerollOnly => "reroll_only",
            CriticalPolicy::MaximizeBase => "maximize_base",
            CriticalPolicy::MaximizeAll => "maximize_all",
            CriticalPolicy::MaximizeBaseRollCrit => "maximize_base_roll_crit",
        })
    }
}

/// Accepts the ordinal `1` to `4` or the policy name, `-` and `_` alike.
impl FromStr for CriticalPolicy {
    type Err = RollError;

    fn from_str(s: &str) -> Result<CriticalPolicy, RollError> {
        let code = s.trim().to_lowercase().replace('-', "_");
        let policy = match code.as_str() {
            "reroll_only" | "reroll" => Some(CriticalPolicy::RerollOnly),
            "maximize_base" => Some(CriticalPolicy::MaximizeBase),
            "maximize_all" => Some(CriticalPolicy::MaximizeAll),
            "maximize_base_roll_crit" => Some(CriticalPolicy::MaximizeBaseRollCrit),
            _ => code.parse().ok().and_then(CriticalPolicy::from_ordinal),
        };
        policy.ok_or_else(|| RollError::UnknownPolicy(s.to_string()))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct CriticalOptions {
    /// Added to the count of every dice group.
    pub extra_crit_dice: u32,
    pub policy: CriticalPolicy,
}

fn push_operand(terms: &mut Vec<Term>, op: Option<Operation>, term: Term) {
    match op {
        Some(Operation::Sub) => terms.push(Term::Operator(Operation::Sub)),
        _ if !terms.is_empty() => terms.push(Term::Operator(op.unwrap_or(Operation::Add))),
        _ => {}
    }
    terms.push(term);
}

fn strip_pool(pool: &PoolTerm) -> Option<PoolTerm> {
    let expressions: Vec<Expression> = pool
        .expressions
        .iter()
        .map(strip_flat_modifiers)
        .filter(|e| !e.is_empty())
        .collect();
    if expressions.is_empty() {
        None
    } else {
        Some(PoolTerm {
            expressions,
            modifiers: pool.modifiers.clone(),
            results: Vec::new(),
            flavor: pool.flavor.clone(),
        })
    }
}

/// Drops every flat number together with the operator in front of it, at any
/// depth. Pools left without content disappear as well.
pub fn strip_flat_modifiers(expression: &Expression) -> Expression {
    let mut terms = Vec::with_capacity(expression.terms.len());
    let mut pending: Option<Operation> = None;
    for term in &expression.terms {
        match term {
            Term::Operator(op) => {
                pending = Some(pending.map_or(*op, |p| p.combine(*op)));
            }
            Term::Numeric(_) => pending = None,
            Term::Dice(dice) => push_operand(&mut terms, pending.take(), Term::Dice(dice.clone())),
            Term::Pool(pool) => match strip_pool(pool) {
                Some(pool) => push_operand(&mut terms, pending.take(), Term::Pool(pool)),
                None => pending = None,
            },
        }
    }
    Expression {
        terms,
        total: None,
        ignored: expression.ignored,
    }
}

fn add_extra_dice(expression: &mut Expression, extra: u32) {
    expression.walk_mut(|term| {
        if let Term::Dice(dice) = term {
            dice.count = dice.count.saturating_add(extra);
        }
    });
}

/// Builds and rolls the bonus damage of a critical hit on `base_formula`,
/// whose regular roll came to `base_total`. Formulas without dice cannot
/// crit and yield `None`.
pub fn derive_critical_roll<E: RollEngine + ?Sized>(
    engine: &mut E,
    base_formula: &str,
    base_total: i64,
    options: &CriticalOptions,
) -> Result<Option<Expression>, RollError> {
    if base_formula.trim().is_empty() {
        return Ok(None);
    }
    let mut base = engine.parse(base_formula)?;
    strip_flavors(&mut base);
    let mut critical = strip_flat_modifiers(&base);
    if !critical.has_dice() {
        #[cfg(feature = "logging")]
        {
            debug!("{} has no dice to crit", base_formula);
        }
        return Ok(None);
    }
    add_extra_dice(&mut critical, options.extra_crit_dice);

    let rolled = match options.policy {
        CriticalPolicy::RerollOnly => engine.evaluate(&critical, EvaluateOptions::default())?,
        CriticalPolicy::MaximizeBase => engine.evaluate(&critical, EvaluateOptions::maximized())?,
        CriticalPolicy::MaximizeAll | CriticalPolicy::MaximizeBaseRollCrit => {
            let max_base = engine
                .evaluate(&base, EvaluateOptions::maximized())?
                .total
                .unwrap_or(0);
            let max_difference = max_base
                .checked_sub(base_total)
                .ok_or(EvaluationErrors::Overflow)?;
            critical.push_modifier(max_difference);
            let evaluate_options = if options.policy == CriticalPolicy::MaximizeAll {
                EvaluateOptions::maximized()
            } else {
                EvaluateOptions::default()
            };
            engine.evaluate(&critical, evaluate_options)?
        }
    };

    #[cfg(feature = "logging")]
    {
        debug!(
            "critical roll for {} under {}: {} = {:?}",
            base_formula, options.policy, &rolled, rolled.total
        );
    }

    Ok(Some(rolled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_dice_roll::{parser::parse_formula, DiceRoller};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    const POLICIES: [CriticalPolicy; 4] = [
        CriticalPolicy::RerollOnly,
        CriticalPolicy::MaximizeBase,
        CriticalPolicy::MaximizeAll,
        CriticalPolicy::MaximizeBaseRollCrit,
    ];

    fn roller() -> DiceRoller<Xoshiro256PlusPlus> {
        DiceRoller::new(Xoshiro256PlusPlus::seed_from_u64(7))
    }

    fn options(policy: CriticalPolicy) -> CriticalOptions {
        CriticalOptions {
            policy,
            ..CriticalOptions::default()
        }
    }

    fn stripped(formula: &str) -> String {
        strip_flat_modifiers(&parse_formula(formula).unwrap()).formula()
    }

    #[test]
    fn test_strip_flat_modifiers() {
        assert_eq!(stripped("1d8+3"), "1d8");
        assert_eq!(stripped("3 + 1d8"), "1d8");
        assert_eq!(stripped("1d6 - 2 + 1d4"), "1d6 + 1d4");
        assert_eq!(stripped("1d6 - 1d4 + 5"), "1d6 - 1d4");
        assert_eq!(stripped("-2 - 1d4"), "-1d4");
        assert_eq!(stripped("-1d4 + 2"), "-1d4");
        assert_eq!(stripped("5"), "");
    }

    #[test]
    fn test_strip_flat_modifiers_in_pools() {
        assert_eq!(stripped("1d6 + (1d4 + 2)"), "1d6 + (1d4)");
        assert_eq!(stripped("1d6 + (2 + 3) + 1"), "1d6");
        assert_eq!(stripped("{1d8 + 2, 4}kh + 1"), "{1d8}kh");
    }

    #[test]
    fn test_reroll_only_drops_flat_modifier() {
        let mut roller = roller();
        for _ in 0..50 {
            let crit = derive_critical_roll(
                &mut roller,
                "1d8+3",
                7,
                &options(CriticalPolicy::RerollOnly),
            )
            .unwrap()
            .unwrap();
            assert_eq!(crit.formula(), "1d8");
            assert!((1..=8).contains(&crit.total.unwrap()));
        }
    }

    #[test]
    fn test_extra_crit_dice() {
        let crit = derive_critical_roll(
            &mut roller(),
            "1d8[slashing] + 2d6[fire] + 3",
            10,
            &CriticalOptions {
                extra_crit_dice: 2,
                policy: CriticalPolicy::MaximizeBase,
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(crit.formula(), "3d8 + 4d6");
        assert_eq!(crit.total, Some(48));
    }

    #[test]
    fn test_extra_crit_dice_every_group() {
        let crit = derive_critical_roll(
            &mut roller(),
            "1d8 + 2d6 + 3",
            10,
            &CriticalOptions {
                extra_crit_dice: 1,
                policy: CriticalPolicy::RerollOnly,
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(crit.formula(), "2d8 + 3d6");

        let nested = derive_critical_roll(
            &mut roller(),
            "1d6 + (1d4 + 2)",
            5,
            &CriticalOptions {
                extra_crit_dice: 2,
                policy: CriticalPolicy::MaximizeBase,
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(nested.formula(), "3d6 + (3d4)");
        assert_eq!(nested.total, Some(30));
    }

    #[test]
    fn test_too_many_crit_dice() {
        assert!(matches!(
            derive_critical_roll(
                &mut roller(),
                "1d8",
                4,
                &CriticalOptions {
                    extra_crit_dice: u32::MAX,
                    policy: CriticalPolicy::RerollOnly,
                },
            ),
            Err(RollError::Engine(_))
        ));
    }

    #[test]
    fn test_maximize_all() {
        let crit = derive_critical_roll(
            &mut roller(),
            "1d8 + 3",
            7,
            &options(CriticalPolicy::MaximizeAll),
        )
        .unwrap()
        .unwrap();
        assert_eq!(crit.formula(), "1d8 + 4");
        assert_eq!(crit.total, Some(12));
    }

    #[test]
    fn test_maximize_base_roll_crit() {
        let mut roller = roller();
        for _ in 0..50 {
            let crit = derive_critical_roll(
                &mut roller,
                "2d6 + 1",
                5,
                &options(CriticalPolicy::MaximizeBaseRollCrit),
            )
            .unwrap()
            .unwrap();
            assert_eq!(crit.formula(), "2d6 + 8");
            assert!((10..=20).contains(&crit.total.unwrap()));
        }
    }

    #[test]
    fn test_difference_kept_when_zero() {
        let crit = derive_critical_roll(
            &mut roller(),
            "1d4",
            4,
            &options(CriticalPolicy::MaximizeAll),
        )
        .unwrap()
        .unwrap();
        assert_eq!(crit.formula(), "1d4 + 0");
        assert_eq!(crit.total, Some(4));
    }

    #[test]
    fn test_no_dice_no_crit() {
        let mut roller = roller();
        for policy in POLICIES {
            assert_eq!(
                derive_critical_roll(&mut roller, "5", 5, &options(policy)),
                Ok(None)
            );
            assert_eq!(
                derive_critical_roll(&mut roller, "  ", 0, &options(policy)),
                Ok(None)
            );
        }
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(matches!(
            derive_critical_roll(&mut roller(), "1d8 +* 2", 3, &CriticalOptions::default()),
            Err(RollError::Engine(_))
        ));
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("3".parse::<CriticalPolicy>(), Ok(CriticalPolicy::MaximizeAll));
        assert_eq!(
            "maximize-base-roll-crit".parse::<CriticalPolicy>(),
            Ok(CriticalPolicy::MaximizeBaseRollCrit)
        );
        assert_eq!(
            "7".parse::<CriticalPolicy>(),
            Err(RollError::UnknownPolicy("7".to_string()))
        );
        for policy in POLICIES {
            assert_eq!(policy.to_string().parse::<CriticalPolicy>(), Ok(policy));
            assert_eq!(CriticalPolicy::from_ordinal(policy.ordinal()), Some(policy));
        }
    }
}
