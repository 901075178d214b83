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

use log::Record;

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::append::AppendKind;
use crate::append::LifeCycle;
use crate::append::State;
use crate::layout::PatternLayout;

/// The stream a [`Console`] appender writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    /// The standard output.
    #[default]
    Stdout,
    /// The standard error.
    Stderr,
}

/// An appender that prints log records to the console.
///
/// # Examples
///
/// ```
/// use logtree::append::Console;
/// use logtree::append::Target;
///
/// let console = Console::new("Console").with_target(Target::Stderr);
/// ```
#[derive(Debug)]
pub struct Console {
    name: String,
    target: Target,
    layout: Arc<dyn Layout>,
    lifecycle: LifeCycle,
}

impl Console {
    /// Creates a new, unstarted console appender printing to stdout with a [`PatternLayout`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: Target::default(),
            layout: Arc::new(PatternLayout::default()),
            lifecycle: LifeCycle::default(),
        }
    }

    /// Sets the layout for the [`Console`] appender.
    pub fn with_layout(self, layout: impl Layout) -> Self {
        self.with_shared_layout(Arc::new(layout))
    }

    /// Sets a layout shared with other appenders.
    pub fn with_shared_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the stream for the [`Console`] appender.
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Returns the stream this appender prints to.
    pub fn target(&self) -> Target {
        self.target
    }
}

impl Append for Console {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AppendKind {
        AppendKind::Console
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
        if self.lifecycle.set(State::Stopped) == State::Started {
            self.flush()?;
        }
        Ok(())
    }

    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        match self.target {
            Target::Stdout => std::io::stdout().write_all(&bytes),
            Target::Stderr => std::io::stderr().write_all(&bytes),
        }
        .map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        match self.target {
            Target::Stdout => std::io::stdout().flush(),
            Target::Stderr => std::io::stderr().flush(),
        }
        .map_err(Error::from_io_error)
    }
}
