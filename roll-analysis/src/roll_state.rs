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
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Which of several d20 results is kept.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "lowercase"))]
pub enum RollState {
    #[default]
    None,
    Advantage,
    Disadvantage,
}

impl fmt::Display for RollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RollState::None => "none",
            RollState::Advantage => "advantage",
            RollState::Disadvantage => "disadvantage",
        })
    }
}

/// Accepts both the descriptive names and the host codes `first`,
/// `highest` and `lowest`.
impl FromStr for RollState {
    type Err = RollError;

    fn from_str(s: &str) -> Result<RollState, RollError> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "first" => Ok(RollState::None),
            "advantage" | "highest" | "kh" => Ok(RollState::Advantage),
            "disadvantage" | "lowest" | "kl" => Ok(RollState::Disadvantage),
            _ => Err(RollError::UnknownRollState(s.to_string())),
        }
    }
}

/// Raw input device state at the time a roll was requested.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct InputModifiers {
    /// Requests advantage, e.g. a held alt key.
    pub primary: bool,
    /// Requests disadvantage, e.g. a held ctrl key.
    pub secondary: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct RollStateRequest {
    pub explicit_state: Option<RollState>,
    pub input_modifiers: Option<InputModifiers>,
    pub advantage: bool,
    pub disadvantage: bool,
}

impl RollStateRequest {
    pub fn explicit(state: RollState) -> RollStateRequest {
        RollStateRequest {
            explicit_state: Some(state),
            ..RollStateRequest::default()
        }
    }

    pub fn from_input(input_modifiers: InputModifiers) -> RollStateRequest {
        RollStateRequest {
            input_modifiers: Some(input_modifiers),
            ..RollStateRequest::default()
        }
    }
}

/// Explicit state wins over the flags, the flags win over device input.
pub fn resolve_roll_state(request: &RollStateRequest) -> RollState {
    if let Some(state) = request.explicit_state {
        state
    } else if request.advantage {
        RollState::Advantage
    } else if request.disadvantage {
        RollState::Disadvantage
    } else if let Some(input) = request.input_modifiers {
        resolve_roll_state(&RollStateRequest {
            explicit_state: None,
            input_modifiers: None,
            advantage: input.primary,
            disadvantage: input.secondary,
        })
    } else {
        RollState::None
    }
}
