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

use crate::dice_types::*;
use std::fmt;

fn write_flavor(f: &mut fmt::Formatter<'_>, flavor: &Option<String>) -> fmt::Result {
    match flavor {
        Some(flavor) if !flavor.is_empty() => write!(f, "[{}]", flavor),
        _ => Ok(()),
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Filter::Equal => "=",
            Filter::Bigger => ">",
            Filter::BiggerEq => ">=",
            Filter::Smaller => "<",
            Filter::SmallerEq => "<=",
            Filter::NotEq => "!=",
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Selector::Higher => "h",
            Selector::Lower => "l",
        })
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Keep(selector, 1) => write!(f, "k{}", selector),
            Modifier::Keep(selector, n) => write!(f, "k{}{}", selector, n),
            Modifier::Reroll(Filter::Equal, target) => write!(f, "r{}", target),
            Modifier::Reroll(filter, target) => write!(f, "r{}{}", filter, target),
        }
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        for modifier in &self.modifiers {
            write!(f, "{}", modifier)?;
        }
        write_flavor(f, &self.flavor)
    }
}

impl fmt::Display for NumericTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        write_flavor(f, &self.flavor)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Add => "+",
            Operation::Sub => "-",
        })
    }
}

impl fmt::Display for PoolTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_parenthetical() {
            write!(f, "({})", self.expressions[0])?;
        } else {
            f.write_str("{")?;
            for (i, expression) in self.expressions.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", expression)?;
            }
            f.write_str("}")?;
            for modifier in &self.modifiers {
                write!(f, "{}", modifier)?;
            }
        }
        write_flavor(f, &self.flavor)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Dice(d) => d.fmt(f),
            Term::Operator(op) => op.fmt(f),
            Term::Numeric(n) => n.fmt(f),
            Term::Pool(p) => p.fmt(f),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match term {
                // a leading sign sticks to its operand
                Term::Operator(op) if i == 0 => write!(f, "{}", op)?,
                Term::Operator(op) => write!(f, " {} ", op)?,
                term => write!(f, "{}", term)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_dice() {
        assert_eq!(DiceTerm::new(1, 20).to_string(), "1d20");
        assert_eq!(
            DiceTerm::new(2, 20)
                .with_modifier(Modifier::Keep(Selector::Higher, 1))
                .to_string(),
            "2d20kh"
        );
        assert_eq!(
            DiceTerm::new(4, 6)
                .with_modifier(Modifier::Keep(Selector::Lower, 3))
                .to_string(),
            "4d6kl3"
        );
        assert_eq!(
            DiceTerm::new(1, 20)
                .with_modifier(Modifier::Reroll(Filter::Equal, 1))
                .to_string(),
            "1d20r1"
        );
        assert_eq!(
            DiceTerm::new(2, 6)
                .with_modifier(Modifier::Reroll(Filter::Smaller, 3))
                .with_flavor("fire")
                .to_string(),
            "2d6r<3[fire]"
        );
    }

    #[test]
    fn test_display_expression() {
        let expression = Expression::new(vec![
            Term::Dice(DiceTerm::new(1, 8)),
            Term::Operator(Operation::Add),
            Term::Numeric(NumericTerm::new(3)),
            Term::Operator(Operation::Sub),
            Term::Pool(PoolTerm::parenthetical(Expression::new(vec![
                Term::Dice(DiceTerm::new(1, 4)),
                Term::Operator(Operation::Add),
                Term::Numeric(NumericTerm::new(1)),
            ]))),
        ]);
        assert_eq!(expression.formula(), "1d8 + 3 - (1d4 + 1)");
    }

    #[test]
    fn test_display_leading_sign_and_pool() {
        let mut pool = PoolTerm::new(vec![
            Expression::new(vec![Term::Dice(DiceTerm::new(1, 20))]),
            Expression::new(vec![Term::Numeric(NumericTerm::new(10))]),
        ]);
        pool.modifiers.push(Modifier::Keep(Selector::Higher, 1));
        let expression = Expression::new(vec![
            Term::Operator(Operation::Sub),
            Term::Dice(DiceTerm::new(1, 4)),
            Term::Operator(Operation::Add),
            Term::Pool(pool),
        ]);
        assert_eq!(expression.formula(), "-1d4 + {1d20, 10}kh");
    }
}
