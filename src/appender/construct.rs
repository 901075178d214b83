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
use crate::Configuration;
use crate::Error;
use crate::ErrorKind;
use crate::Filter;
use crate::Layout;
use crate::LoggerConfig;
use crate::append::AppendKind;
use crate::append::Console;
use crate::append::FileBuilder;
use crate::append::State;
use crate::appender::AppenderRecord;
use crate::appender::AppenderType;
use crate::appender::InitializationRequest;
use crate::config::AppenderControl;
use crate::config::NAME_SEPARATOR;

/// The default log file for a logger configuration node: `logs/<name>.log`, with `::` replaced by
/// `.` and `root` standing for the root node.
pub fn standard_log_file_path(logger: &str) -> PathBuf {
    let name = if logger.is_empty() {
        "root".to_string()
    } else {
        logger.replace(NAME_SEPARATOR, ".")
    };
    Path::new("logs").join(format!("{name}.log"))
}

/// Creates a console appender named after [`AppenderType::CONSOLE`], attaches it to
/// `logger_config` and starts it.
pub fn create_console_appender(
    logger_config: &LoggerConfig,
    level: LevelFilter,
    layout: Arc<dyn Layout>,
    filter: Option<Filter>,
) -> Result<Arc<dyn Append>, Error> {
    log::debug!(
        "creating new console appender for logger config {}",
        logger_config.display_name()
    );

    let console = Console::new(AppenderType::CONSOLE.primary_name()).with_shared_layout(layout);
    initialize_appender(logger_config, Arc::new(console), level, filter)
}

/// Creates a file appender named after [`AppenderType::FILE`] writing to `path`, attaches it to
/// `logger_config` and starts it.
///
/// # Errors
///
/// Return an error if an appender of another kind known to `config` already writes to `path`, or
/// if the log file cannot be opened.
pub fn create_file_appender(
    config: &Configuration,
    logger_config: &LoggerConfig,
    level: LevelFilter,
    layout: Arc<dyn Layout>,
    path: &Path,
    filter: Option<Filter>,
) -> Result<Arc<dyn Append>, Error> {
    log::debug!(
        "creating new file appender for logger config {}",
        logger_config.display_name()
    );

    check_destination(config, path)?;
    let file = FileBuilder::new(AppenderType::FILE.primary_name(), path)
        .shared_layout(layout)
        .build()?;
    initialize_appender(logger_config, Arc::new(file), level, filter)
}

fn check_destination(config: &Configuration, path: &Path) -> Result<(), Error> {
    let owner = config
        .known_appenders()
        .into_iter()
        .find(|append| append.destination() == Some(path) && append.kind() != AppendKind::File);

    match owner {
        None => Ok(()),
        Some(owner) => {
            let err = Error::new(
                ErrorKind::DuplicateDestination,
                "log file is already used by an appender of another kind",
            )
            .with_context("path", path.display())
            .with_context("appender", owner.name())
            .with_context("kind", owner.kind());
            log::error!("{err}");
            Err(err)
        }
    }
}

/// Constructs the appender described by `request`, attached with an optional filter.
///
/// File appenders write to the request's log file path, or to [`standard_log_file_path`] of the
/// node when the request has none.
///
/// # Errors
///
/// Return an error if the request's type cannot be constructed, or if constructing the appender
/// fails.
pub fn construct_appender(
    config: &Configuration,
    request: &InitializationRequest,
    filter: Option<Filter>,
) -> Result<Arc<dyn Append>, Error> {
    let logger_config = request.logger_config();
    let layout = request.layout().clone();
    let level = request.level();

    if request.appender_type() == AppenderType::FILE {
        let path = match request.log_file_path() {
            Some(path) => path.to_path_buf(),
            None => standard_log_file_path(logger_config.name()),
        };
        create_file_appender(config, logger_config, level, layout, &path, filter)
    } else if request.appender_type() == AppenderType::CONSOLE {
        create_console_appender(logger_config, level, layout, filter)
    } else {
        let err = Error::new(
            ErrorKind::UnsupportedConstruction,
            "construction for that appender type is not supported",
        )
        .with_context("type", request.appender_type())
        .with_context("logger", logger_config.display_name());
        log::error!("{err}");
        Err(err)
    }
}

/// Attaches `append` to `logger_config` and starts it if it is not running yet.
pub fn initialize_appender(
    logger_config: &LoggerConfig,
    append: Arc<dyn Append>,
    level: LevelFilter,
    filter: Option<Filter>,
) -> Result<Arc<dyn Append>, Error> {
    log::debug!(
        "initializing {} appender {} for logger config {}",
        append.kind(),
        append.name(),
        logger_config.display_name()
    );

    if let Some(displaced) = logger_config.add_appender(append.clone(), level, filter) {
        log::debug!(
            "replaced {} appender {} at {} in logger config {}",
            displaced.append().kind(),
            displaced.name(),
            displaced.level(),
            logger_config.display_name()
        );
    }
    if !append.is_started() {
        append.start()?;
    }
    Ok(append)
}

/// Re-attaches the appender of `record` with a new level and filter, and records the new level.
pub fn update_appender(
    record: &mut AppenderRecord,
    level: LevelFilter,
    filter: Option<Filter>,
) -> Result<(), Error> {
    log::debug!(
        "updating appender {} of logger config {} from {} to {level}",
        record.append().name(),
        record.logger_config().display_name(),
        record.level(),
    );

    initialize_appender(record.logger_config(), record.append().clone(), level, filter)?;
    record.set_level(level);
    record.set_state(State::Started);
    Ok(())
}

/// Detaches the appender of `record` from its node and marks the record stopped.
///
/// The appender itself keeps running: it may still be registered in the configuration or
/// attached elsewhere.
pub fn detach_appender(record: &mut AppenderRecord) -> Option<AppenderControl> {
    log::debug!(
        "detaching appender {} from logger config {}",
        record.append().name(),
        record.logger_config().display_name()
    );

    let control = record
        .logger_config()
        .remove_appender(record.append().name());
    record.set_state(State::Stopped);
    control
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::Once;

    use tempfile::TempDir;

    use super::*;
    use crate::append::Testing;
    use crate::layout::TextLayout;

    static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

    /// Collects the crate's own log messages.
    struct Capture;

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            let message = record.args().to_string();
            MESSAGES.lock().unwrap_or_else(|e| e.into_inner()).push(message);
        }

        fn flush(&self) {}
    }

    fn captured() -> Vec<String> {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            log::set_logger(&Capture).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });
        MESSAGES.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    #[test]
    fn test_replacing_an_attachment_is_logged() {
        captured();
        let node = LoggerConfig::new("replaced::node", LevelFilter::Trace, true);
        let first = Arc::new(Testing::new("Replaced").with_kind(AppendKind::Console));
        let second = Arc::new(Testing::new("Replaced").with_kind(AppendKind::Console));

        initialize_appender(&node, first, LevelFilter::Warn, None).unwrap();
        initialize_appender(&node, second.clone(), LevelFilter::Debug, None).unwrap();

        let control = node.appender("Replaced").unwrap();
        assert!(Arc::ptr_eq(control.append(), &(second as Arc<dyn Append>)));
        assert!(
            captured().iter().any(|message| message
                == "replaced Console appender Replaced at WARN in logger config replaced::node"),
            "{:?}",
            captured()
        );
    }

    #[test]
    fn test_constructed_appender_keeps_request_layout() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let config = Configuration::new(LevelFilter::Info);
        let layout: Arc<dyn Layout> = Arc::new(TextLayout::default());
        let request = InitializationRequest::new(config.root().clone(), AppenderType::FILE)
            .with_shared_layout(layout.clone())
            .with_log_file_path(temp_dir.path().join("root.log"));

        let append = construct_appender(&config, &request, None).unwrap();
        assert!(Arc::ptr_eq(append.layout(), &layout));
    }

    #[test]
    fn test_standard_log_file_path() {
        assert_eq!(standard_log_file_path("app::db"), Path::new("logs/app.db.log"));
        assert_eq!(standard_log_file_path(""), Path::new("logs/root.log"));
    }

    #[test]
    fn test_construct_console() {
        let config = Configuration::new(LevelFilter::Info);
        let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
        let request = InitializationRequest::new(node.clone(), AppenderType::CONSOLE)
            .with_level(LevelFilter::Info);

        let append = construct_appender(&config, &request, None).unwrap();
        assert_eq!(append.name(), "Console");
        assert_eq!(append.kind(), AppendKind::Console);
        assert!(append.is_started());

        let control = node.appender("Console").unwrap();
        assert!(Arc::ptr_eq(control.append(), &append));
        assert_eq!(control.level(), LevelFilter::Info);
        assert!(control.filter().is_none());
    }

    #[test]
    fn test_construct_unsupported_type() {
        const SOCKET: AppenderType =
            AppenderType::new(&["Socket"], AppendKind::Custom("Socket"));

        let config = Configuration::new(LevelFilter::Info);
        let request = InitializationRequest::new(config.root().clone(), SOCKET);

        let err = construct_appender(&config, &request, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConstruction);
        assert!(config.root().appenders().is_empty());
    }

    #[test]
    fn test_file_destination_must_be_unique_across_kinds() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");

        let config = Configuration::new(LevelFilter::Info);
        let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
        let layout: Arc<dyn Layout> = Arc::new(crate::layout::PatternLayout::default());

        // another file appender on the same path is fine
        let first =
            create_file_appender(&config, &node, LevelFilter::Info, layout.clone(), &path, None)
                .unwrap();
        assert_eq!(first.destination(), Some(path.as_path()));
        let second = create_file_appender(
            &config,
            config.root(),
            LevelFilter::Info,
            layout.clone(),
            &path,
            None,
        )
        .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        config.add_appender(Arc::new(Rolling::new(&path)));
        let err = create_file_appender(&config, &node, LevelFilter::Info, layout, &path, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateDestination);
        assert_eq!(err.context("appender"), Some("Rolling"));
    }

    #[test]
    fn test_update_and_detach() {
        let config = Configuration::new(LevelFilter::Info);
        let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
        let testing = Arc::new(Testing::new("Console").with_kind(AppendKind::Console));
        initialize_appender(&node, testing.clone(), LevelFilter::Warn, None).unwrap();

        let mut record = AppenderRecord::new(
            node.clone(),
            testing.clone(),
            AppenderType::CONSOLE,
            LevelFilter::Warn,
        );
        update_appender(&mut record, LevelFilter::Debug, None).unwrap();
        assert_eq!(record.level(), LevelFilter::Debug);
        assert_eq!(node.appender("Console").unwrap().level(), LevelFilter::Debug);
        assert_eq!(node.appenders().len(), 1);

        let control = detach_appender(&mut record).unwrap();
        assert_eq!(control.level(), LevelFilter::Debug);
        assert_eq!(record.state(), State::Stopped);
        assert!(node.appenders().is_empty());
        assert!(testing.is_started());
    }

    /// A file appender of another implementation, used to claim a destination.
    #[derive(Debug)]
    struct Rolling {
        path: PathBuf,
        layout: Arc<dyn Layout>,
    }

    impl Rolling {
        fn new(path: &Path) -> Self {
            Self {
                path: path.to_path_buf(),
                layout: Arc::new(crate::layout::PatternLayout::default()),
            }
        }
    }

    impl Append for Rolling {
        fn name(&self) -> &str {
            "Rolling"
        }

        fn kind(&self) -> AppendKind {
            AppendKind::Custom("RollingFile")
        }

        fn layout(&self) -> &Arc<dyn Layout> {
            &self.layout
        }

        fn destination(&self) -> Option<&Path> {
            Some(&self.path)
        }

        fn state(&self) -> State {
            State::Started
        }

        fn start(&self) -> Result<(), Error> {
            Ok(())
        }

        fn stop(&self) -> Result<(), Error> {
            Ok(())
        }

        fn append(&self, _: &log::Record) -> Result<(), Error> {
            Ok(())
        }
    }
}
