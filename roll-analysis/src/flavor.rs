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

use insight_dice_roll::Expression;
use std::collections::HashSet;

/// Distinct non-empty flavors of all terms at any depth, in the order they
/// are first met.
pub fn extract_flavors<'a, I>(expressions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Expression>,
{
    let mut seen = HashSet::new();
    let mut flavors = Vec::new();
    for expression in expressions {
        expression.walk(|term| {
            if let Some(flavor) = term.flavor().filter(|f| !f.is_empty()) {
                if seen.insert(flavor) {
                    flavors.push(flavor.to_string());
                }
            }
        });
    }
    flavors
}

pub fn strip_flavors(expression: &mut Expression) {
    expression.walk_mut(|term| term.set_flavor(None));
}
