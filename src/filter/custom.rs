// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use log::Metadata;

use crate::config::NAME_SEPARATOR;
use crate::filter::Filter;
use crate::filter::FilterResult;

type Decide = dyn Fn(&Metadata) -> FilterResult + Send + Sync + 'static;

/// A filter deciding on record metadata with a function.
///
/// Attached next to a level threshold, it can keep records out of an appender by target or by any
/// other property of the metadata:
///
/// ```
/// use log::Metadata;
/// use logtree::filter::CustomFilter;
/// use logtree::filter::FilterResult;
///
/// let quiet_pool = CustomFilter::deny_target("app::db::pool");
/// let no_hyper = CustomFilter::new(|metadata: &Metadata| {
///     if metadata.target().starts_with("hyper") {
///         FilterResult::Reject
///     } else {
///         FilterResult::Neutral
///     }
/// });
/// ```
pub struct CustomFilter {
    decide: Box<Decide>,
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFilter").finish_non_exhaustive()
    }
}

impl CustomFilter {
    /// Creates a filter from a decision function.
    pub fn new(decide: impl Fn(&Metadata) -> FilterResult + Send + Sync + 'static) -> Self {
        Self {
            decide: Box::new(decide),
        }
    }

    /// Creates a filter rejecting records whose target is `target` or a descendant of it, such as
    /// `app::db::pool` for `app::db`. Other records are left to the level threshold.
    pub fn deny_target(target: impl Into<String>) -> Self {
        let target = target.into();
        Self::new(move |metadata| {
            let within = metadata
                .target()
                .strip_prefix(target.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(NAME_SEPARATOR));
            if within {
                FilterResult::Reject
            } else {
                FilterResult::Neutral
            }
        })
    }

    pub(crate) fn matches(&self, metadata: &Metadata) -> FilterResult {
        (self.decide)(metadata)
    }
}

impl From<CustomFilter> for Filter {
    fn from(filter: CustomFilter) -> Self {
        Filter::Custom(filter)
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    fn check(filter: &CustomFilter, target: &str) -> FilterResult {
        filter.matches(&Metadata::builder().level(Level::Info).target(target).build())
    }

    #[test]
    fn test_deny_target_covers_descendants_only() {
        let filter = CustomFilter::deny_target("app::db");
        assert_eq!(check(&filter, "app::db"), FilterResult::Reject);
        assert_eq!(check(&filter, "app::db::pool"), FilterResult::Reject);
        assert_eq!(check(&filter, "app::dbx"), FilterResult::Neutral);
        assert_eq!(check(&filter, "app"), FilterResult::Neutral);
    }

    #[test]
    fn test_decision_function() {
        let filter = CustomFilter::new(|metadata| {
            if metadata.level() == Level::Info {
                FilterResult::Accept
            } else {
                FilterResult::Reject
            }
        });
        assert_eq!(check(&filter, "any"), FilterResult::Accept);
        assert_eq!(format!("{filter:?}"), "CustomFilter { .. }");
    }
}
