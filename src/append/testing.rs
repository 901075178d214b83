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
use std::sync::Mutex;

use log::Record;

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::append::AppendKind;
use crate::append::LifeCycle;
use crate::append::State;
use crate::layout::PatternLayout;

/// An appender that keeps formatted log records in memory, so tests can assert on what reached
/// it.
///
/// By default it reports [`AppendKind::Custom`]`("Testing")`. [`Testing::with_kind`] makes it
/// impersonate another capability.
///
/// # Examples
///
/// ```
/// use logtree::append::Testing;
///
/// let test_appender = Testing::new("Capture");
/// assert!(test_appender.lines().is_empty());
/// ```
#[derive(Debug)]
pub struct Testing {
    name: String,
    kind: AppendKind,
    layout: Arc<dyn Layout>,
    lines: Mutex<Vec<String>>,
    lifecycle: LifeCycle,
}

impl Testing {
    /// Creates an unstarted testing appender with a [`PatternLayout`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AppendKind::Custom("Testing"),
            layout: Arc::new(PatternLayout::default()),
            lines: Mutex::new(vec![]),
            lifecycle: LifeCycle::default(),
        }
    }

    /// Sets the layout for the [`Testing`] appender.
    pub fn with_layout(self, layout: impl Layout) -> Self {
        self.with_shared_layout(Arc::new(layout))
    }

    /// Sets a layout shared with other appenders.
    pub fn with_shared_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the kind this appender reports.
    pub fn with_kind(mut self, kind: AppendKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the records appended so far, formatted.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Append for Testing {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AppendKind {
        self.kind
    }

    fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    fn state(&self) -> State {
        self.lifecycle.state()
    }

    fn start(&self) -> Result<(), Error> {
        self.lifecycle.set(State::Started);
        Ok(())
    }

    fn stop(&self) -> Result<(), Error> {
        self.lifecycle.set(State::Stopped);
        Ok(())
    }

    fn append(&self, record: &Record) -> Result<(), Error> {
        let bytes = self.layout.format(record)?;
        let line = String::from_utf8_lossy(&bytes).into_owned();
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).push(line);
        Ok(())
    }
}
