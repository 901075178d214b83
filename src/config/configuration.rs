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

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use log::LevelFilter;
use log::Record;

use crate::Append;
use crate::Error;
use crate::appender::AppenderRecord;
use crate::appender::InitializationRequest;
use crate::appender::get_or_setup_appender;
use crate::config::ConfigurationBuilder;
use crate::config::LoggerConfig;
use crate::config::parent_name;

/// A logger configuration: the tree of [`LoggerConfig`] nodes under a root, and a flat registry of
/// named appenders.
///
/// The registry holds appenders that are known to the configuration but not necessarily attached
/// to any node. They are candidates for reuse when an appender is requested for a node that cannot
/// reach one through the tree.
///
/// A `Configuration` is created once at startup and passed explicitly to whoever needs it.
#[derive(Debug)]
pub struct Configuration {
    root: Arc<LoggerConfig>,
    loggers: RwLock<BTreeMap<String, Arc<LoggerConfig>>>,
    appenders: RwLock<BTreeMap<String, Arc<dyn Append>>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl Configuration {
    /// Creates an empty configuration whose root node has the given level.
    pub fn new(root_level: LevelFilter) -> Self {
        Self {
            root: Arc::new(LoggerConfig::new("", root_level, false)),
            loggers: RwLock::new(BTreeMap::new()),
            appenders: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a [`ConfigurationBuilder`].
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// The root node.
    pub fn root(&self) -> &Arc<LoggerConfig> {
        &self.root
    }

    /// The node with exactly this name. The empty name is the root.
    pub fn get_logger_config(&self, name: &str) -> Option<Arc<LoggerConfig>> {
        if name.is_empty() {
            return Some(self.root.clone());
        }
        read(&self.loggers).get(name).cloned()
    }

    /// The node that records with the given target enter the tree at: the node with this name,
    /// otherwise the closest configured ancestor, otherwise the root.
    pub fn logger_config(&self, name: &str) -> Arc<LoggerConfig> {
        let loggers = read(&self.loggers);
        let mut name = Some(name);
        while let Some(current) = name {
            if let Some(logger) = loggers.get(current) {
                return logger.clone();
            }
            name = parent_name(current);
        }
        self.root.clone()
    }

    /// All named nodes, ordered by name. The root is not included.
    pub fn loggers(&self) -> Vec<Arc<LoggerConfig>> {
        read(&self.loggers).values().cloned().collect()
    }

    /// Returns the node with this name, creating it with the given level and additivity if it
    /// does not exist yet.
    ///
    /// Parents are reassigned across the whole tree after a node is created, so existing
    /// descendants of the new node now inherit through it.
    pub fn get_or_create_logger_config(
        &self,
        name: &str,
        level: LevelFilter,
        additive: bool,
    ) -> Arc<LoggerConfig> {
        if let Some(logger) = self.get_logger_config(name) {
            log::debug!("getting logger config {name} from current configuration");
            return logger;
        }

        let logger = {
            let mut loggers = write(&self.loggers);
            let logger = loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(LoggerConfig::new(name, level, additive)))
                .clone();
            self.set_parents(&loggers);
            logger
        };

        log::debug!("created new logger config {name} in current configuration");
        logger
    }

    fn set_parents(&self, loggers: &BTreeMap<String, Arc<LoggerConfig>>) {
        for (name, logger) in loggers {
            let mut parent = parent_name(name);
            while let Some(current) = parent {
                if loggers.contains_key(current) {
                    break;
                }
                parent = parent_name(current);
            }
            match parent.and_then(|name| loggers.get(name)) {
                Some(parent) => logger.set_parent(Some(parent)),
                None => logger.set_parent(Some(&self.root)),
            }
        }
    }

    /// All registered appenders, ordered by name.
    pub fn appenders(&self) -> Vec<Arc<dyn Append>> {
        read(&self.appenders).values().cloned().collect()
    }

    /// The registered appender with exactly this name.
    pub fn appender(&self, name: &str) -> Option<Arc<dyn Append>> {
        read(&self.appenders).get(name).cloned()
    }

    /// Registers an appender, returning the one previously registered under the same name.
    pub fn add_appender(&self, append: Arc<dyn Append>) -> Option<Arc<dyn Append>> {
        let name = append.name().to_string();
        write(&self.appenders).insert(name, append)
    }

    /// Every appender the configuration knows of: the registry followed by the appenders attached
    /// to the root and to each named node. An appender reachable in several places is listed
    /// once per place.
    pub(crate) fn known_appenders(&self) -> Vec<Arc<dyn Append>> {
        let mut appenders = self.appenders();
        let nodes = std::iter::once(self.root.clone()).chain(self.loggers());
        for node in nodes {
            appenders.extend(node.appenders().into_iter().map(|c| c.append().clone()));
        }
        appenders
    }

    /// Finds, reuses or constructs the appender described by `request` in this configuration.
    ///
    /// See [`get_or_setup_appender`].
    pub fn get_or_setup_appender(
        &self,
        request: &InitializationRequest,
    ) -> Result<AppenderRecord, Error> {
        get_or_setup_appender(self, request)
    }

    /// Logs a record at the node its target resolves to.
    pub fn log(&self, record: &Record) -> Result<(), Error> {
        self.logger_config(record.target()).log(record)
    }

    /// Flushes every appender the configuration knows of.
    pub fn flush(&self) -> Result<(), Error> {
        for append in self.known_appenders() {
            append.flush()?;
        }
        Ok(())
    }

    /// Stops every appender the configuration knows of.
    pub fn stop(&self) -> Result<(), Error> {
        for append in self.known_appenders() {
            append.stop()?;
        }
        Ok(())
    }
}
