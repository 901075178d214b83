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

use std::io::Write;
use std::sync::Arc;

use log::LevelFilter;
use log::Metadata;
use log::Record;

use crate::Configuration;
use crate::Error;

/// A logger facade that routes log records through a [`Configuration`].
///
/// This struct implements [`log::Log`]: a record enters the configuration tree at the node its
/// target resolves to, see [`Configuration::logger_config`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use log::LevelFilter;
/// use logtree::Configuration;
/// use logtree::Logger;
///
/// let config = Arc::new(Configuration::new(LevelFilter::Info));
/// Logger::new(config.clone()).apply().unwrap();
///
/// log::info!("This record enters the tree at the root node.");
/// ```
#[derive(Debug)]
pub struct Logger {
    config: Arc<Configuration>,
}

impl Logger {
    /// Creates a logger over `config`.
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    /// The configuration records are routed through.
    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.config
    }

    /// Set up this logger as the global logger.
    ///
    /// The global maximum level is set to [`LevelFilter::Trace`]: levels are decided per node.
    ///
    /// # Errors
    ///
    /// This function will fail if it is called more than once, or if another library has already
    /// initialized a global logger.
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.config.logger_config(metadata.target()).level()
    }

    fn log(&self, record: &Record) {
        if let Err(err) = self.config.log(record) {
            handle_log_error(record, err);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.config.flush() {
            handle_flush_error(err);
        }
    }
}

fn handle_log_error(record: &Record, error: Error) {
    let Err(fallback_error) = write!(
        std::io::stderr(),
        r###"
Error perform logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error:?}
"###,
        args = record.args(),
        record = record,
        error = error,
    ) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error:?}
    Fallback error: {fallback_error}
"###,
        args = record.args(),
        record = record,
        error = error,
        fallback_error = fallback_error,
    );
}

fn handle_flush_error(error: Error) {
    let Err(fallback_error) = write!(
        std::io::stderr(),
        r###"
Error perform flush.
    Error: {error:?}
"###,
    ) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular flush.
    Error: {error:?}
    Fallback error: {fallback_error}
"###,
    );
}
