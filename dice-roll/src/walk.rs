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

//! Depth-first traversal over expression trees.
//!
//! Every term is visited before the sub-expressions of a pool it contains, so
//! the visiting order matches the order terms appear in the formula.

use crate::dice_types::{Expression, Term};
use std::ops::ControlFlow;

impl Expression {
    pub fn try_walk<'a, B, F>(&'a self, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(&'a Term) -> ControlFlow<B>,
    {
        for term in &self.terms {
            f(term)?;
            if let Term::Pool(pool) = term {
                for expression in &pool.expressions {
                    expression.try_walk(f)?;
                }
            }
        }
        ControlFlow::Continue(())
    }

    pub fn walk<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a Term),
    {
        let _ = self.try_walk(&mut |term| {
            f(term);
            ControlFlow::<()>::Continue(())
        });
    }

    pub fn try_walk_mut<B, F>(&mut self, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(&mut Term) -> ControlFlow<B>,
    {
        for term in self.terms.iter_mut() {
            f(&mut *term)?;
            if let Term::Pool(pool) = term {
                for expression in pool.expressions.iter_mut() {
                    expression.try_walk_mut(f)?;
                }
            }
        }
        ControlFlow::Continue(())
    }

    pub fn walk_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Term),
    {
        let _ = self.try_walk_mut(&mut |term| {
            f(term);
            ControlFlow::<()>::Continue(())
        });
    }

    /// First term at any depth the predicate accepts.
    pub fn find_term<'a, P>(&'a self, mut predicate: P) -> Option<&'a Term>
    where
        P: FnMut(&Term) -> bool,
    {
        match self.try_walk(&mut |term| {
            if predicate(term) {
                ControlFlow::Break(term)
            } else {
                ControlFlow::Continue(())
            }
        }) {
            ControlFlow::Break(term) => Some(term),
            ControlFlow::Continue(()) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice_types::{DiceTerm, NumericTerm, Operation, PoolTerm};

    fn nested() -> Expression {
        Expression::new(vec![
            Term::Numeric(NumericTerm::new(2)),
            Term::Operator(Operation::Add),
            Term::Pool(PoolTerm::parenthetical(Expression::new(vec![
                Term::Dice(DiceTerm::new(1, 6)),
                Term::Operator(Operation::Add),
                Term::Dice(DiceTerm::new(1, 20)),
            ]))),
            Term::Operator(Operation::Add),
            Term::Dice(DiceTerm::new(2, 20)),
        ])
    }

    #[test]
    fn test_walk_visits_pool_before_children() {
        let mut visited = Vec::new();
        nested().walk(|term| {
            visited.push(match term {
                Term::Dice(d) => format!("d{}", d.faces),
                Term::Numeric(n) => n.value.to_string(),
                Term::Operator(_) => "op".to_string(),
                Term::Pool(_) => "pool".to_string(),
            })
        });
        assert_eq!(
            visited,
            vec!["2", "op", "pool", "d6", "op", "d20", "op", "d20"]
        );
    }

    #[test]
    fn test_find_term_stops_at_first_match() {
        let expression = nested();
        match expression.find_term(|t| matches!(t, Term::Dice(d) if d.faces == 20)) {
            Some(Term::Dice(d)) => assert_eq!(d.count, 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(expression
            .find_term(|t| matches!(t, Term::Dice(d) if d.faces == 100))
            .is_none());
    }

    #[test]
    fn test_walk_mut_reaches_nested_terms() {
        let mut expression = nested();
        expression.walk_mut(|term| {
            if let Term::Dice(d) = term {
                d.count += 1;
            }
        });
        let counts: Vec<u32> = expression.dice().iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![2, 2, 3]);
    }

    #[test]
    fn test_try_walk_mut_breaks_early() {
        let mut expression = nested();
        let flow = expression.try_walk_mut(&mut |term| match term {
            Term::Dice(d) if d.faces == 20 => {
                d.count = 5;
                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        });
        assert_eq!(flow, ControlFlow::Break(()));
        let counts: Vec<u32> = expression.dice().iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![1, 5, 2]);
    }
}
