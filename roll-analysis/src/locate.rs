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

use crate::error::RollError;
use insight_dice_roll::{DiceTerm, Expression, RollEngine, Term};

pub const D20_FACES: u32 = 20;

/// First d20 group in formula order, searching into pools.
pub fn locate_d20_term(expression: &Expression) -> Option<&DiceTerm> {
    match expression.find_term(|term| matches!(term, Term::Dice(dice) if dice.faces == D20_FACES))
    {
        Some(Term::Dice(dice)) => Some(dice),
        _ => None,
    }
}

/// Parses `formula` with the engine and returns a copy of its d20 group.
pub fn locate_d20_in_formula<E: RollEngine + ?Sized>(
    engine: &E,
    formula: &str,
) -> Result<Option<DiceTerm>, RollError> {
    let expression = engine.parse(formula)?;
    Ok(locate_d20_term(&expression).cloned())
}
