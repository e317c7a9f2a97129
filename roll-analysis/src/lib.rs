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

//! Interpretation of rolled d20 expressions: roll state, critical outcome
//! and the bonus damage a critical hit deals.

pub mod critical;
pub mod error;
pub mod flavor;
pub mod locate;
pub mod normalize;
pub mod outcome;
pub mod roll_state;
pub mod settings;

pub use critical::{derive_critical_roll, strip_flat_modifiers, CriticalOptions, CriticalPolicy};
pub use error::RollError;
pub use flavor::{extract_flavors, strip_flavors};
pub use locate::{locate_d20_in_formula, locate_d20_term};
pub use normalize::{normalize_d20_formula, NormalizedFormula};
pub use outcome::{classify_outcome, effective_threshold, CritChecks, CritType, Outcome};
pub use roll_state::{resolve_roll_state, InputModifiers, RollState, RollStateRequest};
pub use settings::{RollSettings, SettingsProvider};
