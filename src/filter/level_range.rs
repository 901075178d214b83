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

use log::LevelFilter;
use log::Metadata;

use crate::filter::Filter;
use crate::filter::FilterResult;

/// A filter that matches records whose level lies between `min` and `max`, both inclusive.
///
/// Levels are compared the way [`LevelFilter`] orders them: `Off < Error < Warn < Info < Debug <
/// Trace`. A range of `Off..=Warn` therefore matches `Error` and `Warn` records.
///
/// # Examples
///
/// Reject everything a `Warn` threshold already lets through:
///
/// ```
/// use log::LevelFilter;
/// use logtree::filter::LevelRangeFilter;
///
/// let filter = LevelRangeFilter::deny(LevelFilter::Off, LevelFilter::Warn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRangeFilter {
    min: LevelFilter,
    max: LevelFilter,
    on_match: FilterResult,
    on_mismatch: FilterResult,
}

impl LevelRangeFilter {
    /// Creates a filter with explicit results for matching and mismatching records.
    pub fn new(
        min: LevelFilter,
        max: LevelFilter,
        on_match: FilterResult,
        on_mismatch: FilterResult,
    ) -> Self {
        Self {
            min,
            max,
            on_match,
            on_mismatch,
        }
    }

    /// Creates a filter that rejects records in range and stays neutral otherwise.
    pub fn deny(min: LevelFilter, max: LevelFilter) -> Self {
        Self::new(min, max, FilterResult::Reject, FilterResult::Neutral)
    }

    /// The least verbose level of the range.
    pub fn min(&self) -> LevelFilter {
        self.min
    }

    /// The most verbose level of the range.
    pub fn max(&self) -> LevelFilter {
        self.max
    }

    /// The result for records in range.
    pub fn on_match(&self) -> FilterResult {
        self.on_match
    }

    /// The result for records out of range.
    pub fn on_mismatch(&self) -> FilterResult {
        self.on_mismatch
    }

    pub(crate) fn matches(&self, metadata: &Metadata) -> FilterResult {
        let level = metadata.level();
        if level >= self.min && level <= self.max {
            self.on_match
        } else {
            self.on_mismatch
        }
    }
}

impl From<LevelRangeFilter> for Filter {
    fn from(filter: LevelRangeFilter) -> Self {
        Filter::LevelRange(filter)
    }
}
