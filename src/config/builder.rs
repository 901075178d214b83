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

use std::sync::Arc;

use log::LevelFilter;

use crate::Append;
use crate::Error;
use crate::config::Configuration;

/// A builder for a [`Configuration`]. See also [`Configuration::builder`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use log::LevelFilter;
/// use logtree::Configuration;
/// use logtree::append::Console;
///
/// let config = Configuration::builder()
///     .root_level(LevelFilter::Info)
///     .logger("app::db", LevelFilter::Debug, true)
///     .appender(Arc::new(Console::new("Console")))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.loggers().len(), 1);
/// assert!(config.appender("Console").unwrap().is_started());
/// ```
#[must_use = "call `build` to create the configuration"]
#[derive(Debug)]
pub struct ConfigurationBuilder {
    root_level: LevelFilter,
    loggers: Vec<(String, LevelFilter, bool)>,
    appenders: Vec<Arc<dyn Append>>,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            root_level: LevelFilter::Error,
            loggers: vec![],
            appenders: vec![],
        }
    }
}

impl ConfigurationBuilder {
    /// Set the level of the root node.
    ///
    /// Default to [`LevelFilter::Error`].
    pub fn root_level(mut self, level: LevelFilter) -> Self {
        self.root_level = level;
        self
    }

    /// Declare a named node.
    pub fn logger(mut self, name: impl Into<String>, level: LevelFilter, additive: bool) -> Self {
        self.loggers.push((name.into(), level, additive));
        self
    }

    /// Register an appender in the configuration's registry.
    pub fn appender(mut self, append: Arc<dyn Append>) -> Self {
        self.appenders.push(append);
        self
    }

    /// Create the configuration and start every registered appender.
    ///
    /// # Errors
    ///
    /// Return an error if a registered appender fails to start.
    pub fn build(self) -> Result<Configuration, Error> {
        let config = Configuration::new(self.root_level);
        for (name, level, additive) in self.loggers {
            config.get_or_create_logger_config(&name, level, additive);
        }
        for append in self.appenders {
            if !append.is_started() {
                append.start()?;
            }
            config.add_appender(append);
        }
        Ok(config)
    }
}
