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

use insight_dice_roll::{limits::DiceLimits, DiceRoller, EvaluateOptions, RollEngine};
use insight_roll_analysis::{
    classify_outcome, derive_critical_roll, extract_flavors, normalize_d20_formula, CritChecks,
    CritType, RollError, RollSettings, SettingsProvider,
};

fn main() {
    pretty_env_logger::init();
    log::info!("logger created");
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RollError> {
    let mut args = std::env::args().skip(1);
    let attack = match args.next() {
        Some(a) => a,
        None => {
            eprintln!("usage: roll-insight <attack formula> [damage formula] [settings.toml]");
            std::process::exit(2);
        }
    };
    let damage = args.next();
    let settings = match args.next() {
        Some(path) => RollSettings::load(path),
        None => RollSettings::default(),
    }
    .with_env_overrides();
    log::info!("using {:?}", &settings);

    let mut roller = DiceRoller::from_entropy();

    let attack_roll = roller.roll(&attack, EvaluateOptions::default())?;
    let normalized = normalize_d20_formula(&attack_roll);
    println!("attack: {} = {}", &attack_roll, attack_roll.total.unwrap_or(0));
    println!(
        "d20: {} ({} rolls, {})",
        &normalized.formula,
        normalized
            .num_rolls
            .map_or_else(|| "no".to_string(), |n| n.to_string()),
        normalized.roll_state
    );

    let outcome = classify_outcome(
        Some(&attack_roll),
        settings.crit_threshold(),
        &CritChecks::faces([20]),
        None,
    );
    if let Some(outcome) = outcome {
        println!(
            "outcome: {} {}",
            outcome.total,
            outcome
                .crit_type
                .map_or_else(|| "normal".to_string(), |c| c.to_string())
        );
    }

    if let Some(damage) = damage {
        let damage_roll = roller.roll(&damage, EvaluateOptions::default())?;
        let damage_total = damage_roll.total.unwrap_or(0);
        println!(
            "damage: {} = {} (range {}..={})",
            &damage_roll,
            damage_total,
            damage_roll.min(),
            damage_roll.max()
        );
        let critical_hit = outcome.map_or(false, |o| o.crit_type == Some(CritType::Success));
        if critical_hit {
            match derive_critical_roll(
                &mut roller,
                &damage,
                damage_total,
                &settings.critical_options(),
            )? {
                Some(critical) => println!(
                    "critical: {} = {} ({})",
                    &critical,
                    critical.total.unwrap_or(0),
                    settings.critical_policy()
                ),
                None => println!("critical: no dice to add"),
            }
        }
        let flavors = extract_flavors([&attack_roll, &damage_roll]);
        if !flavors.is_empty() {
            println!("flavors: {}", flavors.join(", "));
        }
    }
    Ok(())
}
