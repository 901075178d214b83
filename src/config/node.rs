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
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::Weak;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use log::LevelFilter;
use log::Record;

use crate::Append;
use crate::Error;
use crate::Filter;
use crate::filter::FilterResult;

/// The binding of an appender to a logger configuration node: the appender, the level threshold
/// it is attached with, and an optional filter.
#[derive(Debug, Clone)]
pub struct AppenderControl {
    append: Arc<dyn Append>,
    level: LevelFilter,
    filter: Option<Arc<Filter>>,
}

impl AppenderControl {
    pub(crate) fn new(append: Arc<dyn Append>, level: LevelFilter, filter: Option<Filter>) -> Self {
        Self {
            append,
            level,
            filter: filter.map(Arc::new),
        }
    }

    /// The attached appender.
    pub fn append(&self) -> &Arc<dyn Append> {
        &self.append
    }

    /// The name of the attached appender.
    pub fn name(&self) -> &str {
        self.append.name()
    }

    /// The level threshold of this attachment. Records more verbose than it are dropped.
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// The filter consulted after the level threshold.
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_deref()
    }

    fn call(&self, record: &Record) -> Result<(), Error> {
        if record.level() > self.level {
            return Ok(());
        }
        if let Some(filter) = &self.filter {
            if filter.matches(record.metadata()) == FilterResult::Reject {
                return Ok(());
            }
        }
        if !self.append.is_started() {
            return Ok(());
        }
        self.append.append(record)
    }
}

/// A node of the logger configuration tree.
///
/// A node is identified by its `::`-separated name; the root node has the empty name. Records
/// that enter a node must pass its level. They are then handed to the node's appenders and, when
/// the node is additive, to the appenders of its parent, recursively. The parent's own level is
/// not consulted again on the way up.
#[derive(Debug)]
pub struct LoggerConfig {
    name: String,
    level: RwLock<LevelFilter>,
    additive: AtomicBool,
    parent: RwLock<Weak<LoggerConfig>>,
    appenders: RwLock<Vec<AppenderControl>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl LoggerConfig {
    /// Creates a detached node without appenders.
    pub fn new(name: impl Into<String>, level: LevelFilter, additive: bool) -> Self {
        Self {
            name: name.into(),
            level: RwLock::new(level),
            additive: AtomicBool::new(additive),
            parent: RwLock::new(Weak::new()),
            appenders: RwLock::new(vec![]),
        }
    }

    /// The name of this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name used in messages and default file names: `root` for the root node.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "root"
        } else {
            &self.name
        }
    }

    /// The minimum level of records entering this node.
    pub fn level(&self) -> LevelFilter {
        *read(&self.level)
    }

    /// Sets the minimum level of records entering this node.
    pub fn set_level(&self, level: LevelFilter) {
        *write(&self.level) = level;
    }

    /// Whether records are also handed to the parent's appenders.
    pub fn is_additive(&self) -> bool {
        self.additive.load(Ordering::Acquire)
    }

    /// Sets the additive flag.
    pub fn set_additive(&self, additive: bool) {
        self.additive.store(additive, Ordering::Release);
    }

    /// The parent node, `None` for the root or a detached node.
    pub fn parent(&self) -> Option<Arc<LoggerConfig>> {
        read(&self.parent).upgrade()
    }

    pub(crate) fn set_parent(&self, parent: Option<&Arc<LoggerConfig>>) {
        *write(&self.parent) = parent.map(Arc::downgrade).unwrap_or_default();
    }

    /// A snapshot of the attached appenders, in attachment order.
    pub fn appenders(&self) -> Vec<AppenderControl> {
        read(&self.appenders).clone()
    }

    /// The attachment of the appender with exactly this name.
    pub fn appender(&self, name: &str) -> Option<AppenderControl> {
        read(&self.appenders)
            .iter()
            .find(|control| control.name() == name)
            .cloned()
    }

    /// Attaches an appender with a level threshold and an optional filter.
    ///
    /// A node holds at most one appender per name: an existing attachment with the same name is
    /// replaced in place and returned.
    pub fn add_appender(
        &self,
        append: Arc<dyn Append>,
        level: LevelFilter,
        filter: Option<Filter>,
    ) -> Option<AppenderControl> {
        let control = AppenderControl::new(append, level, filter);
        let mut appenders = write(&self.appenders);
        match appenders.iter_mut().find(|c| c.name() == control.name()) {
            Some(existing) => Some(std::mem::replace(existing, control)),
            None => {
                appenders.push(control);
                None
            }
        }
    }

    /// Detaches the appender with exactly this name.
    pub fn remove_appender(&self, name: &str) -> Option<AppenderControl> {
        let mut appenders = write(&self.appenders);
        let index = appenders.iter().position(|c| c.name() == name)?;
        Some(appenders.remove(index))
    }

    /// Logs a record that enters the tree at this node.
    pub fn log(&self, record: &Record) -> Result<(), Error> {
        if record.level() > self.level() {
            return Ok(());
        }
        self.call_appenders(record)
    }

    fn call_appenders(&self, record: &Record) -> Result<(), Error> {
        for control in self.appenders() {
            control.call(record)?;
        }

        if self.is_additive() {
            if let Some(parent) = self.parent() {
                parent.call_appenders(record)?;
            }
        }
        Ok(())
    }

    /// Flushes every appender attached to this node.
    pub fn flush(&self) -> Result<(), Error> {
        for control in self.appenders() {
            control.append().flush()?;
        }
        Ok(())
    }
}
