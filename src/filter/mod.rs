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

//! Filters for log records.
//!
//! A filter is attached next to an appender on a logger configuration node. It is consulted after
//! the appender's level threshold.

pub use self::custom::CustomFilter;
pub use self::level_range::LevelRangeFilter;

mod custom;
mod level_range;

/// The result of a filter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// The record will be processed without further filtering.
    Accept,
    /// The record should not be processed.
    Reject,
    /// No decision could be made, further filtering should occur.
    Neutral,
}

/// Represents a filter that can be applied to log records.
#[derive(Debug)]
pub enum Filter {
    /// Matches records whose level lies in a range.
    LevelRange(LevelRangeFilter),
    /// A custom filter.
    Custom(CustomFilter),
}

impl Filter {
    pub(crate) fn matches(&self, metadata: &log::Metadata) -> FilterResult {
        match self {
            Filter::LevelRange(filter) => filter.matches(metadata),
            Filter::Custom(filter) => filter.matches(metadata),
        }
    }

    /// Returns the inner [`LevelRangeFilter`], if this is one.
    pub fn as_level_range(&self) -> Option<&LevelRangeFilter> {
        match self {
            Filter::LevelRange(filter) => Some(filter),
            Filter::Custom(_) => None,
        }
    }
}
