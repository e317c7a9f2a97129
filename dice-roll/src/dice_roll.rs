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

use crate::{dice_types::*, limits::MAX_DICE};
use rand::{distributions::Uniform, Rng};
use thiserror::Error;

#[cfg(feature = "logging")]
use log::debug;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum EvaluationErrors {
    #[error("dice with {0} faces can not be rolled")]
    InvalidFaces(u32),
    #[error("two terms without an operator between them")]
    MissingOperator,
    #[error("roll total overflowed")]
    Overflow,
    #[error("{0} dice are too many to roll")]
    TooManyDice(u32),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct EvaluateOptions {
    /// Every die shows its highest face instead of a random one.
    pub maximize: bool,
}

impl EvaluateOptions {
    pub fn maximized() -> EvaluateOptions {
        EvaluateOptions { maximize: true }
    }
}

/// Marks every active, not yet discarded result outside the kept ones as
/// discarded. Ties keep the earlier result.
fn apply_keep(results: &mut [DieResult], selector: Selector, keep: u32) {
    let mut candidates: Vec<usize> = (0..results.len())
        .filter(|i| results[*i].is_counted())
        .collect();
    match selector {
        Selector::Higher => candidates.sort_by(|a, b| results[*b].value.cmp(&results[*a].value)),
        Selector::Lower => candidates.sort_by_key(|i| results[*i].value),
    }
    for i in candidates.into_iter().skip(keep as usize) {
        results[i].discarded = true;
    }
}

fn counted_sum(results: &[DieResult]) -> Result<i64, EvaluationErrors> {
    results
        .iter()
        .filter(|r| r.is_counted())
        .try_fold(0i64, |acc, r| {
            acc.checked_add(r.value).ok_or(EvaluationErrors::Overflow)
        })
}

pub trait DiceEvaluate {
    fn evaluate<R: Rng>(
        &self,
        options: &EvaluateOptions,
        rng: &mut R,
    ) -> Result<(DiceTerm, i64), EvaluationErrors>;
}

impl DiceEvaluate for DiceTerm {
    fn evaluate<R: Rng>(
        &self,
        options: &EvaluateOptions,
        rng: &mut R,
    ) -> Result<(DiceTerm, i64), EvaluationErrors> {
        if self.faces == 0 {
            return Err(EvaluationErrors::InvalidFaces(self.faces));
        }
        if self.count > MAX_DICE {
            return Err(EvaluationErrors::TooManyDice(self.count));
        }
        let faces = i64::from(self.faces);
        let dist = Uniform::new_inclusive(1, faces);
        let draw = |rng: &mut R| {
            if options.maximize {
                faces
            } else {
                rng.sample(&dist)
            }
        };

        let mut results: Vec<DieResult> = Vec::with_capacity(self.count as usize);
        for _ in 0..self.count {
            results.push(DieResult::new(draw(rng)));
        }

        for modifier in &self.modifiers {
            match modifier {
                Modifier::Reroll(filter, target) => {
                    let rolled = results.len();
                    for i in 0..rolled {
                        if results[i].is_counted() && filter.matches(results[i].value, *target) {
                            results[i].rerolled = true;
                            results.push(DieResult::new(draw(rng)));
                        }
                    }
                }
                Modifier::Keep(selector, keep) => apply_keep(&mut results, *selector, *keep),
            }
        }

        #[cfg(feature = "logging")]
        {
            debug!("Dice roll result for {} is {:?}", &self, &results);
        }

        let total = counted_sum(&results)?;
        Ok((
            DiceTerm {
                results,
                ..self.clone()
            },
            total,
        ))
    }
}

fn evaluate_pool<R: Rng>(
    pool: &PoolTerm,
    options: &EvaluateOptions,
    rng: &mut R,
) -> Result<(PoolTerm, i64), EvaluationErrors> {
    let expressions = pool
        .expressions
        .iter()
        .map(|e| e.evaluate(options, rng))
        .collect::<Result<Vec<_>, _>>()?;
    let mut results: Vec<DieResult> = expressions
        .iter()
        .map(|e| DieResult::new(e.total.unwrap_or(0)))
        .collect();
    for modifier in &pool.modifiers {
        if let Modifier::Keep(selector, keep) = modifier {
            apply_keep(&mut results, *selector, *keep);
        }
    }
    let total = counted_sum(&results)?;

    #[cfg(feature = "logging")]
    {
        debug!("rolled {:?} for pool {}", &results, pool)
    }

    Ok((
        PoolTerm {
            expressions,
            modifiers: pool.modifiers.clone(),
            results,
            flavor: pool.flavor.clone(),
        },
        total,
    ))
}

pub trait TermEvaluate {
    fn evaluate<R: Rng>(
        &self,
        options: &EvaluateOptions,
        rng: &mut R,
    ) -> Result<(Term, Option<i64>), EvaluationErrors>;
}

impl TermEvaluate for Term {
    fn evaluate<R: Rng>(
        &self,
        options: &EvaluateOptions,
        rng: &mut R,
    ) -> Result<(Term, Option<i64>), EvaluationErrors> {
        match self {
            Term::Operator(_) => Ok((self.clone(), None)),
            Term::Numeric(n) => Ok((self.clone(), Some(n.value))),
            Term::Dice(dice) => dice
                .evaluate(options, rng)
                .map(|(dice, total)| (Term::Dice(dice), Some(total))),
            Term::Pool(pool) => {
                evaluate_pool(pool, options, rng).map(|(pool, total)| (Term::Pool(pool), Some(total)))
            }
        }
    }
}

pub trait ExpressionEvaluate {
    fn evaluate<R: Rng>(
        &self,
        options: &EvaluateOptions,
        rng: &mut R,
    ) -> Result<Expression, EvaluationErrors>;
}

impl ExpressionEvaluate for Expression {
    /// Rolls every term again and returns the evaluated copy. A dangling
    /// trailing operator is ignored.
    fn evaluate<R: Rng>(
        &self,
        options: &EvaluateOptions,
        rng: &mut R,
    ) -> Result<Expression, EvaluationErrors> {
        let mut terms = Vec::with_capacity(self.terms.len());
        let mut total: i64 = 0;
        let mut pending = Operation::Add;
        let mut expect_value = true;
        for term in &self.terms {
            let (term, value) = TermEvaluate::evaluate(term, options, rng)?;
            match (&term, value) {
                (Term::Operator(op), _) => {
                    pending = if expect_value {
                        pending.combine(*op)
                    } else {
                        *op
                    };
                    expect_value = true;
                }
                (_, Some(value)) => {
                    if !expect_value {
                        return Err(EvaluationErrors::MissingOperator);
                    }
                    total = pending
                        .apply(total, value)
                        .ok_or(EvaluationErrors::Overflow)?;
                    pending = Operation::Add;
                    expect_value = false;
                }
                (_, None) => {}
            }
            terms.push(term);
        }

        #[cfg(feature = "logging")]
        {
            debug!("got {} for expression {}", total, &self)
        }

        Ok(Expression {
            terms,
            total: Some(total),
            ignored: self.ignored,
        })
    }
}
