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

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Filter {
    Equal,
    Bigger,
    BiggerEq,
    Smaller,
    SmallerEq,
    NotEq,
}

impl Filter {
    pub fn matches(&self, value: i64, target: i64) -> bool {
        match self {
            Filter::Equal => value == target,
            Filter::Bigger => value > target,
            Filter::BiggerEq => value >= target,
            Filter::Smaller => value < target,
            Filter::SmallerEq => value <= target,
            Filter::NotEq => value != target,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Selector {
    Higher,
    Lower,
}

/// Modifier codes attached to a dice group or pool, applied in order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Modifier {
    /// `kh`/`kl`, keeps this many of the active results.
    Keep(Selector, u32),
    /// `r`, rerolls each matching die once.
    Reroll(Filter, i64),
}

/// A single die outcome.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct DieResult {
    pub value: i64,
    pub discarded: bool,
    pub rerolled: bool,
}

impl DieResult {
    pub fn new(value: i64) -> DieResult {
        DieResult {
            value,
            discarded: false,
            rerolled: false,
        }
    }

    /// Rerolled results were superseded and no longer take part in anything.
    pub fn is_active(&self) -> bool {
        !self.rerolled
    }

    pub fn is_counted(&self) -> bool {
        !self.rerolled && !self.discarded
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct DiceTerm {
    pub count: u32,
    pub faces: u32,
    pub modifiers: Vec<Modifier>,
    pub results: Vec<DieResult>,
    pub flavor: Option<String>,
}

impl DiceTerm {
    pub fn new(count: u32, faces: u32) -> DiceTerm {
        DiceTerm {
            count,
            faces,
            modifiers: Vec::new(),
            results: Vec::new(),
            flavor: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> DiceTerm {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_results<I: IntoIterator<Item = DieResult>>(mut self, results: I) -> DiceTerm {
        self.results = results.into_iter().collect();
        self
    }

    pub fn with_flavor<S: ToString>(mut self, flavor: S) -> DiceTerm {
        self.flavor = Some(flavor.to_string());
        self
    }

    /// Selector of the first keep modifier, if any.
    pub fn keep_selector(&self) -> Option<Selector> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Keep(selector, _) => Some(*selector),
            _ => None,
        })
    }

    pub fn active_results(&self) -> impl Iterator<Item = &DieResult> {
        self.results.iter().filter(|r| r.is_active())
    }

    /// Sum of the kept results, `None` before evaluation.
    pub fn total(&self) -> Option<i64> {
        if self.results.is_empty() {
            None
        } else {
            Some(
                self.results
                    .iter()
                    .filter(|r| r.is_counted())
                    .map(|r| r.value)
                    .sum(),
            )
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Operation {
    Add,
    Sub,
}

impl Operation {
    /// Folds two adjacent operators, `- -` reads as `+`.
    pub fn combine(self, other: Operation) -> Operation {
        if self == other {
            Operation::Add
        } else {
            Operation::Sub
        }
    }

    pub fn apply(self, left: i64, right: i64) -> Option<i64> {
        match self {
            Operation::Add => left.checked_add(right),
            Operation::Sub => left.checked_sub(right),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct NumericTerm {
    pub value: i64,
    pub flavor: Option<String>,
}

impl NumericTerm {
    pub fn new(value: i64) -> NumericTerm {
        NumericTerm {
            value,
            flavor: None,
        }
    }
}

/// Grouped sub-expressions. A single expression without modifiers is a plain
/// parenthetical, several expressions form a `{a, b}` pool whose keep
/// modifiers select among the sub totals.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct PoolTerm {
    pub expressions: Vec<Expression>,
    pub modifiers: Vec<Modifier>,
    pub results: Vec<DieResult>,
    pub flavor: Option<String>,
}

impl PoolTerm {
    pub fn new(expressions: Vec<Expression>) -> PoolTerm {
        PoolTerm {
            expressions,
            modifiers: Vec::new(),
            results: Vec::new(),
            flavor: None,
        }
    }

    pub fn parenthetical(expression: Expression) -> PoolTerm {
        PoolTerm::new(vec![expression])
    }

    pub fn is_parenthetical(&self) -> bool {
        self.expressions.len() == 1 && self.modifiers.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Term {
    Dice(DiceTerm),
    Operator(Operation),
    Numeric(NumericTerm),
    Pool(PoolTerm),
}

impl Term {
    pub fn flavor(&self) -> Option<&str> {
        match self {
            Term::Dice(d) => d.flavor.as_deref(),
            Term::Numeric(n) => n.flavor.as_deref(),
            Term::Pool(p) => p.flavor.as_deref(),
            Term::Operator(_) => None,
        }
    }

    /// Operators never carry a flavor, setting one on them is a no-op.
    pub fn set_flavor(&mut self, flavor: Option<String>) {
        match self {
            Term::Dice(d) => d.flavor = flavor,
            Term::Numeric(n) => n.flavor = flavor,
            Term::Pool(p) => p.flavor = flavor,
            Term::Operator(_) => {}
        }
    }
}

impl From<DiceTerm> for Term {
    fn from(dice: DiceTerm) -> Term {
        Term::Dice(dice)
    }
}

impl From<NumericTerm> for Term {
    fn from(numeric: NumericTerm) -> Term {
        Term::Numeric(numeric)
    }
}

impl From<PoolTerm> for Term {
    fn from(pool: PoolTerm) -> Term {
        Term::Pool(pool)
    }
}

impl From<Operation> for Term {
    fn from(op: Operation) -> Term {
        Term::Operator(op)
    }
}

/// A parsed and possibly evaluated roll. The formula is rendered from the
/// terms through `Display`, so it always reflects the current terms.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Expression {
    pub terms: Vec<Term>,
    pub total: Option<i64>,
    pub ignored: bool,
}

impl Expression {
    pub fn new(terms: Vec<Term>) -> Expression {
        Expression {
            terms,
            total: None,
            ignored: false,
        }
    }

    pub fn formula(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All dice groups at any depth, in formula order.
    pub fn dice(&self) -> Vec<&DiceTerm> {
        let mut dice = Vec::new();
        self.walk(|term| {
            if let Term::Dice(d) = term {
                dice.push(d);
            }
        });
        dice
    }

    pub fn has_dice(&self) -> bool {
        !self.dice().is_empty()
    }

    /// Appends `op value` as a flat modifier.
    pub fn push_modifier(&mut self, value: i64) {
        let (op, magnitude) = if value < 0 {
            (Operation::Sub, value.saturating_neg())
        } else {
            (Operation::Add, value)
        };
        if !self.terms.is_empty() || op == Operation::Sub {
            self.terms.push(Term::Operator(op));
        }
        self.terms.push(Term::Numeric(NumericTerm::new(magnitude)));
        self.total = None;
    }
}

impl From<Vec<Term>> for Expression {
    fn from(terms: Vec<Term>) -> Expression {
        Expression::new(terms)
    }
}
