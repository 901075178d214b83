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

use crate::Append;
use crate::append::AppendKind;

/// Describes a kind of appender that can be looked up, reused and possibly constructed.
///
/// Names are tried in order when searching; the first one is the primary name given to newly
/// constructed appenders. Only [`AppenderType::CONSOLE`] and [`AppenderType::FILE`] can be
/// constructed: other types can be resolved by reusing an existing appender only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppenderType {
    names: &'static [&'static str],
    kind: AppendKind,
}

impl AppenderType {
    /// Console appenders.
    pub const CONSOLE: AppenderType =
        AppenderType::new(&["Console", "ConsoleAppender"], AppendKind::Console);

    /// Single file appenders.
    pub const FILE: AppenderType = AppenderType::new(&["File", "FileAppender"], AppendKind::File);

    /// Declares an appender type.
    ///
    /// # Panics
    ///
    /// Panics if `names` is empty.
    pub const fn new(names: &'static [&'static str], kind: AppendKind) -> Self {
        assert!(!names.is_empty(), "an appender type needs at least one name");
        Self { names, kind }
    }

    /// The recognized names, in lookup order.
    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// The name given to newly constructed appenders of this type.
    pub fn primary_name(&self) -> &'static str {
        self.names[0]
    }

    /// The capability an appender must provide to be of this type.
    pub fn kind(&self) -> AppendKind {
        self.kind
    }

    /// Whether `append` provides the capability this type requires.
    pub fn accepts(&self, append: &dyn Append) -> bool {
        append.kind() == self.kind
    }
}

impl fmt::Display for AppenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Appender", self.kind)
    }
}
