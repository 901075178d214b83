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

use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use log::Record;

use crate::Error;
use crate::ErrorKind;
use crate::Layout;
use crate::append::Append;
use crate::append::AppendKind;
use crate::append::LifeCycle;
use crate::append::State;
use crate::layout::PatternLayout;

/// A builder to configure and create a [`File`] appender.
#[derive(Debug)]
pub struct FileBuilder {
    name: String,
    path: PathBuf,
    layout: Arc<dyn Layout>,
}

impl FileBuilder {
    /// Create a new file appender builder.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            layout: Arc::new(PatternLayout::default()),
        }
    }

    /// Set the layout for the logs.
    ///
    /// Default to [`PatternLayout`].
    pub fn layout(self, layout: impl Layout) -> Self {
        self.shared_layout(Arc::new(layout))
    }

    /// Set a layout shared with other appenders.
    pub fn shared_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    /// Build the [`File`] appender. The appender is not started.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The log directory cannot be created.
    /// * The log file cannot be opened for appending.
    pub fn build(self) -> Result<File, Error> {
        let FileBuilder { name, path, layout } = self;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new(ErrorKind::Unexpected, "failed to create log directory")
                    .with_context("path", dir.display())
                    .with_source(err)
            })?;
        }

        let writer = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|err| {
                Error::new(ErrorKind::Unexpected, "failed to open log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })?;

        Ok(File {
            name,
            path,
            layout,
            writer: Mutex::new(writer),
            lifecycle: LifeCycle::default(),
        })
    }
}

/// An appender that writes log records to a single file.
#[derive(Debug)]
pub struct File {
    name: String,
    path: PathBuf,
    layout: Arc<dyn Layout>,
    writer: Mutex<fs::File>,
    lifecycle: LifeCycle,
}

impl File {
    fn writer(&self) -> MutexGuard<'_, fs::File> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Append for File {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AppendKind {
        AppendKind::File
    }

    fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    fn destination(&self) -> Option<&Path> {
        Some(&self.path)
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
        let mut writer = self.writer();
        writer.write_all(&bytes).map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut writer = self.writer();
        writer.flush().map_err(Error::from_io_error)?;
        Ok(())
    }
}

impl Drop for File {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(|e| e.into_inner());
        let _ = writer.flush();
    }
}
