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

use insight_dice_roll::{parser::ParseError, EngineError, EvaluationErrors};
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum RollError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("unknown critical policy {0:?}, expected 1, 2, 3 or 4")]
    UnknownPolicy(String),
    #[error("unknown roll state {0:?}")]
    UnknownRollState(String),
}

impl From<ParseError> for RollError {
    fn from(err: ParseError) -> RollError {
        RollError::Engine(EngineError::Parse(err))
    }
}

impl From<EvaluationErrors> for RollError {
    fn from(err: EvaluationErrors) -> RollError {
        RollError::Engine(EngineError::Evaluation(err))
    }
}
