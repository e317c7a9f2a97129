/// Largest dice group that is still rolled.
pub const MAX_DICE: u32 = 10_000;

pub trait DiceLimits {
    fn min(&self) -> i64;
    fn max(&self) -> i64;
}

use crate::dice_types::*;

/// Sum of the `keep` best entries, best meaning largest for `Higher`.
fn keep_sum(mut values: Vec<i64>, selector: Selector, keep: u32) -> i64 {
    match selector {
        Selector::Higher => values.sort_unstable_by(|a, b| b.cmp(a)),
        Selector::Lower => values.sort_unstable(),
    }
    values
        .into_iter()
        .take(keep as usize)
        .fold(0, i64::saturating_add)
}

fn kept_count(count: u32, modifiers: &[Modifier]) -> u32 {
    modifiers.iter().fold(count, |kept, m| match m {
        Modifier::Keep(_, n) => kept.min(*n),
        Modifier::Reroll(_, _) => kept,
    })
}

impl DiceLimits for DiceTerm {
    fn min(&self) -> i64 {
        if self.faces == 0 {
            return 0;
        }
        i64::from(kept_count(self.count, &self.modifiers))
    }

    fn max(&self) -> i64 {
        i64::from(kept_count(self.count, &self.modifiers)) * i64::from(self.faces)
    }
}

impl DiceLimits for NumericTerm {
    fn min(&self) -> i64 {
        self.value
    }

    fn max(&self) -> i64 {
        self.value
    }
}

impl DiceLimits for PoolTerm {
    fn min(&self) -> i64 {
        let mins = self.expressions.iter().map(|e| e.min()).collect::<Vec<_>>();
        match self.modifiers.iter().find_map(|m| match m {
            Modifier::Keep(s, n) => Some((*s, *n)),
            _ => None,
        }) {
            Some((selector, n)) => keep_sum(mins, selector, n),
            None => mins.into_iter().fold(0, i64::saturating_add),
        }
    }

    fn max(&self) -> i64 {
        let maxs = self.expressions.iter().map(|e| e.max()).collect::<Vec<_>>();
        match self.modifiers.iter().find_map(|m| match m {
            Modifier::Keep(s, n) => Some((*s, *n)),
            _ => None,
        }) {
            Some((selector, n)) => keep_sum(maxs, selector, n),
            None => maxs.into_iter().fold(0, i64::saturating_add),
        }
    }
}

impl DiceLimits for Expression {
    fn min(&self) -> i64 {
        let mut result = 0i64;
        let mut op = Operation::Add;
        for term in &self.terms {
            match term {
                Term::Operator(o) => op = op.combine(*o),
                value => {
                    result = match op {
                        Operation::Add => result.saturating_add(term_min(value)),
                        Operation::Sub => result.saturating_sub(term_max(value)),
                    };
                    op = Operation::Add;
                }
            }
        }
        result
    }

    fn max(&self) -> i64 {
        let mut result = 0i64;
        let mut op = Operation::Add;
        for term in &self.terms {
            match term {
                Term::Operator(o) => op = op.combine(*o),
                value => {
                    result = match op {
                        Operation::Add => result.saturating_add(term_max(value)),
                        Operation::Sub => result.saturating_sub(term_min(value)),
                    };
                    op = Operation::Add;
                }
            }
        }
        result
    }
}

fn term_min(term: &Term) -> i64 {
    match term {
        Term::Dice(d) => d.min(),
        Term::Numeric(n) => n.min(),
        Term::Pool(p) => p.min(),
        Term::Operator(_) => 0,
    }
}

fn term_max(term: &Term) -> i64 {
    match term {
        Term::Dice(d) => d.max(),
        Term::Numeric(n) => n.max(),
        Term::Pool(p) => p.max(),
        Term::Operator(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_limits() {
        assert_eq!(DiceTerm::new(2, 6).min(), 2);
        assert_eq!(DiceTerm::new(2, 6).max(), 12);
        let advantage = DiceTerm::new(2, 20).with_modifier(Modifier::Keep(Selector::Higher, 1));
        assert_eq!(advantage.min(), 1);
        assert_eq!(advantage.max(), 20);
    }

    #[test]
    fn test_expression_limits() {
        let expression = Expression::new(vec![
            Term::Dice(DiceTerm::new(1, 8)),
            Term::Operator(Operation::Add),
            Term::Numeric(NumericTerm::new(3)),
            Term::Operator(Operation::Sub),
            Term::Dice(DiceTerm::new(1, 4)),
        ]);
        assert_eq!(expression.min(), 1 + 3 - 4);
        assert_eq!(expression.max(), 8 + 3 - 1);
    }

    #[test]
    fn test_pool_limits() {
        let mut pool = PoolTerm::new(vec![
            Expression::new(vec![Term::Dice(DiceTerm::new(1, 20))]),
            Expression::new(vec![Term::Numeric(NumericTerm::new(10))]),
        ]);
        pool.modifiers.push(Modifier::Keep(Selector::Higher, 1));
        assert_eq!(pool.min(), 10);
        assert_eq!(pool.max(), 20);
        pool.modifiers = vec![Modifier::Keep(Selector::Lower, 1)];
        assert_eq!(pool.min(), 1);
        assert_eq!(pool.max(), 10);
    }

    #[test]
    fn test_pool_limits_saturate() {
        let huge = || Expression::new(vec![Term::Numeric(NumericTerm::new(i64::MAX))]);
        let mut pool = PoolTerm::new(vec![huge(), huge()]);
        assert_eq!(pool.max(), i64::MAX);
        pool.modifiers.push(Modifier::Keep(Selector::Higher, 2));
        assert_eq!(pool.min(), i64::MAX);
    }
}
