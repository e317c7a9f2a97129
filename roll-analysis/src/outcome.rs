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

use insight_dice_roll::{Expression, Term};
use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use log::debug;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "lowercase"))]
pub enum CritType {
    Success,
    Failure,
    /// At least one die hit the threshold and at least one showed a 1.
    Mixed,
}

impl fmt::Display for CritType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CritType::Success => "success",
            CritType::Failure => "failure",
            CritType::Mixed => "mixed",
        })
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Outcome {
    pub total: i64,
    pub crit_type: Option<CritType>,
    pub is_crit: bool,
    pub ignored: bool,
}

/// Which dice groups take part in crit detection.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum CritChecks {
    #[default]
    All,
    Faces(BTreeSet<u32>),
}

impl CritChecks {
    pub fn faces<I: IntoIterator<Item = u32>>(faces: I) -> CritChecks {
        CritChecks::Faces(faces.into_iter().collect())
    }

    pub fn selects(&self, faces: u32) -> bool {
        match self {
            CritChecks::All => true,
            CritChecks::Faces(set) => set.contains(&faces),
        }
    }
}

/// `false` disables checking entirely, which the host expresses as an empty
/// face list.
impl From<bool> for CritChecks {
    fn from(enabled: bool) -> CritChecks {
        if enabled {
            CritChecks::All
        } else {
            CritChecks::Faces(BTreeSet::new())
        }
    }
}

/// The lowest configured crit threshold wins, `None` keeps the die's faces.
pub fn effective_threshold(base: Option<i64>, item_override: Option<i64>) -> Option<i64> {
    match (base, item_override) {
        (Some(base), Some(item)) => Some(base.min(item)),
        (base, item) => base.or(item),
    }
}

pub fn classify_outcome(
    expression: Option<&Expression>,
    threshold: Option<i64>,
    checks: &CritChecks,
    bonus: Option<&Expression>,
) -> Option<Outcome> {
    let expression = expression?;
    let mut high = 0usize;
    let mut low = 0usize;
    expression.walk(|term| {
        if let Term::Dice(dice) = term {
            if dice.faces > 1 && checks.selects(dice.faces) {
                let threshold = threshold.unwrap_or_else(|| i64::from(dice.faces));
                for result in dice.active_results() {
                    if result.value >= threshold {
                        high += 1;
                    } else if result.value == 1 {
                        low += 1;
                    }
                }
            }
        }
    });

    let crit_type = match (high > 0, low > 0) {
        (true, true) => Some(CritType::Mixed),
        (true, false) => Some(CritType::Success),
        (false, true) => Some(CritType::Failure),
        (false, false) => None,
    };
    let total = expression
        .total
        .unwrap_or(0)
        .saturating_add(bonus.and_then(|b| b.total).unwrap_or(0));

    #[cfg(feature = "logging")]
    {
        debug!(
            "classified {} as {:?} ({} high, {} low)",
            expression, crit_type, high, low
        );
    }

    Some(Outcome {
        total,
        crit_type,
        is_crit: high > 0,
        ignored: expression.ignored,
    })
}
