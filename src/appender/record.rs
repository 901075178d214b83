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
use crate::Layout;
use crate::LoggerConfig;
use crate::append::State;
use crate::appender::AppenderType;

/// An appender together with the logger configuration node that owns it, the level it is
/// attached with and whether it is still attached.
///
/// Records are produced by the appender search and by [`get_or_setup_appender`]. They are a view
/// of an attachment: the level held by the node is authoritative, and changing it goes through
/// [`update_appender`] so that both stay in sync.
///
/// [`get_or_setup_appender`]: crate::appender::get_or_setup_appender
/// [`update_appender`]: crate::appender::update_appender
#[derive(Debug)]
pub struct AppenderRecord {
    logger_config: Arc<LoggerConfig>,
    append: Arc<dyn Append>,
    appender_type: AppenderType,
    level: LevelFilter,
    state: State,
}

impl AppenderRecord {
    pub(crate) fn new(
        logger_config: Arc<LoggerConfig>,
        append: Arc<dyn Append>,
        appender_type: AppenderType,
        level: LevelFilter,
    ) -> Self {
        Self {
            logger_config,
            append,
            appender_type,
            level,
            state: State::Started,
        }
    }

    /// The node the appender is attached to.
    pub fn logger_config(&self) -> &Arc<LoggerConfig> {
        &self.logger_config
    }

    /// The appender.
    pub fn append(&self) -> &Arc<dyn Append> {
        &self.append
    }

    /// The type the appender was resolved as.
    pub fn appender_type(&self) -> AppenderType {
        self.appender_type
    }

    /// The level threshold of the attachment.
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// [`State::Started`] while attached, [`State::Stopped`] once detached.
    pub fn state(&self) -> State {
        self.state
    }

    /// The layout of the appender.
    pub fn layout(&self) -> &Arc<dyn Layout> {
        self.append.layout()
    }

    /// Whether this attachment drops records at `level`, that is `level` is more verbose than the
    /// threshold.
    pub fn is_filtering(&self, level: LevelFilter) -> bool {
        level > self.level
    }

    /// Whether the threshold equals `level`.
    pub fn is_level(&self, level: LevelFilter) -> bool {
        self.level == level
    }

    /// Whether the appender is attached to exactly this node.
    pub fn is_logger_config(&self, logger_config: &LoggerConfig) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.logger_config), logger_config)
    }

    pub(crate) fn set_level(&mut self, level: LevelFilter) {
        self.level = level;
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.state = state;
    }
}
