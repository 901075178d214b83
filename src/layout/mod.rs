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

//! Layouts for formatting log records.

use std::fmt;

use log::Record;

use crate::Error;

#[cfg(feature = "layout-json")]
mod json;
mod kv;
mod pattern;
mod text;

#[cfg(feature = "layout-json")]
pub use self::json::JsonLayout;
pub use self::kv::KvDisplay;
pub use self::pattern::PatternLayout;
pub use self::text::TextLayout;

/// A layout for formatting log records.
///
/// Layouts are shared between appenders: an appender constructed to shadow another one reuses the
/// layout of the original, so appenders hold their layout as an [`Arc<dyn Layout>`](std::sync::Arc).
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a log record.
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error>;
}

/// Returns the last segment of the record's file path.
pub(crate) fn filename<'a>(record: &'a Record<'a>) -> &'a str {
    record
        .file()
        .map(|file| file.rsplit(['/', '\\']).next().unwrap_or(file))
        .unwrap_or_default()
}
