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

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use log::LevelFilter;

use crate::Append;
use crate::Layout;
use crate::LoggerConfig;
use crate::appender::AppenderType;
use crate::layout::PatternLayout;

/// Describes the appender a caller wants attached to a logger configuration node.
///
/// # Examples
///
/// ```
/// use log::LevelFilter;
/// use logtree::Configuration;
/// use logtree::appender::AppenderType;
/// use logtree::appender::InitializationRequest;
///
/// let config = Configuration::new(LevelFilter::Info);
/// let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
///
/// let request = InitializationRequest::new(node, AppenderType::FILE)
///     .with_level(LevelFilter::Debug)
///     .with_log_file_path("logs/app.log");
/// ```
#[derive(Debug, Clone)]
pub struct InitializationRequest {
    logger_config: Arc<LoggerConfig>,
    appender_type: AppenderType,
    level: LevelFilter,
    layout: Arc<dyn Layout>,
    log_file_path: Option<PathBuf>,
}

impl InitializationRequest {
    /// Creates a request for an appender of `appender_type` on `logger_config`.
    ///
    /// The level defaults to [`LevelFilter::Trace`], which lets every record through, and the
    /// layout to [`PatternLayout::default`].
    pub fn new(logger_config: Arc<LoggerConfig>, appender_type: AppenderType) -> Self {
        Self {
            logger_config,
            appender_type,
            level: LevelFilter::Trace,
            layout: Arc::new(PatternLayout::default()),
            log_file_path: None,
        }
    }

    /// Sets the level threshold of the requested appender.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Sets the layout used when an appender has to be constructed.
    pub fn with_layout(self, layout: impl Layout) -> Self {
        self.with_shared_layout(Arc::new(layout))
    }

    /// Sets a layout shared with other appenders.
    pub fn with_shared_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    /// Dedicates the requested appender to a log file.
    pub fn with_log_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file_path = Some(path.into());
        self
    }

    /// The node the appender is requested for.
    pub fn logger_config(&self) -> &Arc<LoggerConfig> {
        &self.logger_config
    }

    /// The requested appender type.
    pub fn appender_type(&self) -> AppenderType {
        self.appender_type
    }

    /// The requested level threshold.
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// The layout for constructed appenders.
    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    /// The dedicated log file, if any.
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }

    /// Whether reusing `candidate` would write to another destination than the one this request
    /// is dedicated to.
    ///
    /// Requests without a log file path are never dedicated.
    pub fn is_dedicated_file_appender(&self, candidate: &dyn Append) -> bool {
        match self.log_file_path() {
            Some(path) => candidate.destination() != Some(path),
            None => false,
        }
    }

    /// A copy of this request with another layout.
    pub fn copy_with_layout(&self, layout: Arc<dyn Layout>) -> Self {
        self.clone().with_shared_layout(layout)
    }
}
