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

use crate::critical::{CriticalOptions, CriticalPolicy};
use std::path::Path;
use toml::{map::Map, Value};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use log::warn;

pub const POLICY_ENV_VAR: &str = "CRITICAL_POLICY";

/// Source of the configured critical hit behaviour.
pub trait SettingsProvider {
    fn critical_policy(&self) -> CriticalPolicy;

    /// Lowest d20 result counting as a critical success.
    fn crit_threshold(&self) -> Option<i64> {
        None
    }

    fn extra_crit_dice(&self) -> u32 {
        0
    }

    fn critical_options(&self) -> CriticalOptions {
        CriticalOptions {
            extra_crit_dice: self.extra_crit_dice(),
            policy: self.critical_policy(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct RollSettings {
    pub critical_policy: CriticalPolicy,
    pub crit_threshold: Option<i64>,
    pub extra_crit_dice: u32,
}

#[allow(unused_variables)]
fn unreadable<T: std::fmt::Debug>(key: &str, default: T) -> T {
    #[cfg(feature = "logging")]
    {
        warn!("unable to read {}, using {:?}", key, default);
    }
    default
}

fn read_policy(value: &Value) -> Option<CriticalPolicy> {
    match value {
        Value::Integer(i) => (*i).try_into().ok().and_then(CriticalPolicy::from_ordinal),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

impl RollSettings {
    /// Reads the settings file, an unreadable file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> RollSettings {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => RollSettings::from_toml_str(&content),
            Err(_e) => {
                #[cfg(feature = "logging")]
                {
                    warn!(
                        "Unable to read settings file {}: {}",
                        path.as_ref().display(),
                        _e
                    );
                }
                RollSettings::default()
            }
        }
    }

    /// Every key falls back to its default on its own when missing or
    /// invalid.
    pub fn from_toml_str(content: &str) -> RollSettings {
        let config: Map<String, Value> = match toml::from_str(content) {
            Ok(a) => a,
            Err(_e) => {
                #[cfg(feature = "logging")]
                {
                    warn!("Unable to parse settings: {}", _e);
                }
                Map::new()
            }
        };

        let critical_policy = match config.get("critical_policy") {
            None => CriticalPolicy::default(),
            Some(value) => match read_policy(value) {
                Some(policy) => policy,
                None => unreadable("critical_policy", CriticalPolicy::default()),
            },
        };
        let crit_threshold = match config.get("crit_threshold") {
            None => None,
            Some(value) => match value.as_integer() {
                Some(t) if t > 0 => Some(t),
                _ => unreadable("crit_threshold", None),
            },
        };
        let extra_crit_dice: u32 = match config
            .get("extra_crit_dice")
            .map(|d| d.as_integer().and_then(|d| d.try_into().ok()))
        {
            None => 0,
            Some(Some(d)) => d,
            Some(None) => unreadable("extra_crit_dice", 0),
        };

        RollSettings {
            critical_policy,
            crit_threshold,
            extra_crit_dice,
        }
    }

    /// Applies `CRITICAL_POLICY` from the environment on top of the file.
    pub fn with_env_overrides(self) -> RollSettings {
        self.with_policy_override(std::env::var(POLICY_ENV_VAR).ok().as_deref())
    }

    fn with_policy_override(mut self, code: Option<&str>) -> RollSettings {
        if let Some(code) = code {
            match code.parse() {
                Ok(policy) => self.critical_policy = policy,
                Err(_e) => {
                    #[cfg(feature = "logging")]
                    {
                        warn!("ignoring {}: {}", POLICY_ENV_VAR, _e);
                    }
                }
            }
        }
        self
    }
}

impl SettingsProvider for RollSettings {
    fn critical_policy(&self) -> CriticalPolicy {
        self.critical_policy
    }

    fn crit_threshold(&self) -> Option<i64> {
        self.crit_threshold
    }

    fn extra_crit_dice(&self) -> u32 {
        self.extra_crit_dice
    }
}
