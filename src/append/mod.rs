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

//! Appenders: the sinks that log records are written to.
//!
//! An appender has a name, a layout, a kind that tells which capability it provides, and a
//! start/stop lifecycle. Appenders are shared as `Arc<dyn Append>` between the global registry of
//! a [`Configuration`](crate::Configuration) and the logger configuration nodes they are attached
//! to.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::Record;

use crate::Error;
use crate::Layout;

mod console;
mod file;
mod state;
mod testing;

pub use self::console::Console;
pub use self::console::Target;
pub use self::file::File;
pub use self::file::FileBuilder;
pub use self::state::LifeCycle;
pub use self::state::State;
pub use self::testing::Testing;

/// The capability an appender provides.
///
/// [`AppenderType`](crate::appender::AppenderType)s require one kind; an appender found by name
/// must report the same kind to be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppendKind {
    /// Writes to the process console.
    Console,
    /// Writes to a file on disk.
    File,
    /// Any other appender implementation, identified by its implementation name.
    Custom(&'static str),
}

impl fmt::Display for AppendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendKind::Console => f.write_str("Console"),
            AppendKind::File => f.write_str("File"),
            AppendKind::Custom(name) => f.write_str(name),
        }
    }
}

/// An appender that can process log records.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// The name this appender is registered and looked up under.
    fn name(&self) -> &str;

    /// The capability this appender provides.
    fn kind(&self) -> AppendKind;

    /// The layout records are formatted with.
    fn layout(&self) -> &Arc<dyn Layout>;

    /// The output path, for appenders that write to the filesystem.
    fn destination(&self) -> Option<&Path> {
        None
    }

    /// The current lifecycle state.
    fn state(&self) -> State;

    /// Whether the appender accepts records.
    fn is_started(&self) -> bool {
        self.state() == State::Started
    }

    /// Start accepting records.
    fn start(&self) -> Result<(), Error>;

    /// Stop accepting records and release buffered output.
    fn stop(&self) -> Result<(), Error>;

    /// Dispatch a log record to the append target.
    fn append(&self, record: &Record) -> Result<(), Error>;

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}
