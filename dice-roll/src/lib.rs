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

//! Dice expression trees as produced by a roll: dice groups with their
//! individual results, operators, flat numbers and nested pools.

pub mod dice_types;
mod display;
pub mod limits;
mod walk;

#[cfg(feature = "roll")]
pub mod dice_roll;

#[cfg(feature = "parser")]
pub mod parser;

#[cfg(feature = "parser")]
pub mod roll_data;

#[cfg(all(feature = "parser", feature = "roll"))]
pub mod engine;

pub use dice_types::*;

#[cfg(feature = "roll")]
pub use dice_roll::{EvaluateOptions, EvaluationErrors};

#[cfg(all(feature = "parser", feature = "roll"))]
pub use engine::{DiceRoller, EngineError, RollEngine};
