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
use std::sync::Once;

use log::Level;
use log::LevelFilter;
use log::Record;
use logtree::Append;
use logtree::Configuration;
use logtree::ErrorKind;
use logtree::Layout;
use logtree::append::AppendKind;
use logtree::append::FileBuilder;
use logtree::append::Testing;
use logtree::appender::AppenderType;
use logtree::appender::InitializationRequest;
use logtree::appender::find_appender;
use logtree::appender::initialize_appender;
use logtree::layout::PatternLayout;
use tempfile::TempDir;

static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Collects what the crate logs about its own decisions.
struct Capture;

impl log::Log for Capture {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let message = format!("{} {}", record.level(), record.args());
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

/// A started testing appender that passes for a console appender.
fn console(name: &str) -> Arc<dyn Append> {
    let testing = Testing::new(name).with_kind(AppendKind::Console);
    testing.start().unwrap();
    Arc::new(testing)
}

fn log(config: &Configuration, target: &str, level: Level, message: &str) {
    config
        .log(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(level)
                .target(target)
                .build(),
        )
        .unwrap();
}

#[test]
fn test_constructs_when_nothing_is_reachable() {
    let config = Configuration::new(LevelFilter::Info);
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);

    let record = config.get_or_setup_appender(&request).unwrap();

    assert_eq!(record.append().name(), "Console");
    assert_eq!(record.append().kind(), AppendKind::Console);
    assert!(record.append().is_started());
    assert!(record.is_logger_config(&node));
    assert_eq!(record.level(), LevelFilter::Info);
    assert_eq!(record.appender_type(), AppenderType::CONSOLE);

    let control = node.appender("Console").unwrap();
    assert!(Arc::ptr_eq(control.append(), record.append()));
    assert!(control.filter().is_none());
}

#[test]
fn test_reuses_own_appender_and_updates_its_level() {
    let config = Configuration::new(LevelFilter::Info);
    let node = config.get_or_create_logger_config("app", LevelFilter::Trace, false);
    let append = initialize_appender(&node, console("Console"), LevelFilter::Info, None).unwrap();

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);
    let record = config.get_or_setup_appender(&request).unwrap();
    assert!(Arc::ptr_eq(record.append(), &append));
    assert_eq!(node.appenders().len(), 1);

    let request = request.with_level(LevelFilter::Debug);
    let record = config.get_or_setup_appender(&request).unwrap();
    assert!(Arc::ptr_eq(record.append(), &append));
    assert_eq!(record.level(), LevelFilter::Debug);
    assert_eq!(node.appender("Console").unwrap().level(), LevelFilter::Debug);
    assert_eq!(node.appenders().len(), 1);
}

#[test]
fn test_reuses_inherited_appender() {
    let config = Configuration::new(LevelFilter::Info);
    let root_console =
        initialize_appender(config.root(), console("Console"), LevelFilter::Trace, None).unwrap();
    let node = config.get_or_create_logger_config("app::db", LevelFilter::Debug, true);

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(Arc::ptr_eq(record.append(), &root_console));
    assert!(record.is_logger_config(config.root()));
    assert_eq!(record.level(), LevelFilter::Trace);
    assert!(node.appenders().is_empty());
}

#[test]
fn test_shadows_inherited_appender_that_filters_the_level() {
    let config = Configuration::new(LevelFilter::Info);
    let root_console =
        initialize_appender(config.root(), console("Console"), LevelFilter::Warn, None).unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(!Arc::ptr_eq(record.append(), &root_console));
    assert!(record.is_logger_config(&node));
    assert_eq!(record.level(), LevelFilter::Info);
    assert!(Arc::ptr_eq(record.layout(), root_console.layout()));

    let control = node.appender("Console").unwrap();
    assert_eq!(control.level(), LevelFilter::Info);
    let filter = control.filter().and_then(|f| f.as_level_range()).unwrap();
    assert_eq!(filter.min(), LevelFilter::Off);
    assert_eq!(filter.max(), LevelFilter::Warn);
}

#[test]
fn test_shadows_when_own_appender_is_filtered_by_parent() {
    let config = Configuration::new(LevelFilter::Info);
    initialize_appender(config.root(), console("Console"), LevelFilter::Warn, None).unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Trace, true);
    let own = initialize_appender(&node, console("Console"), LevelFilter::Debug, None).unwrap();

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Debug);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(!Arc::ptr_eq(record.append(), &own));
    assert_eq!(record.append().kind(), AppendKind::Console);
    let control = node.appender("Console").unwrap();
    assert!(Arc::ptr_eq(control.append(), record.append()));
    let filter = control.filter().and_then(|f| f.as_level_range()).unwrap();
    assert_eq!(filter.max(), LevelFilter::Warn);
    assert_eq!(node.appenders().len(), 1);
}

#[test]
fn test_shadows_across_non_additive_parent() {
    let config = Configuration::new(LevelFilter::Error);
    let app = config.get_or_create_logger_config("app", LevelFilter::Info, false);
    let app_console = initialize_appender(&app, console("Console"), LevelFilter::Warn, None).unwrap();
    let db = config.get_or_create_logger_config("app::db", LevelFilter::Debug, true);

    let request =
        InitializationRequest::new(db.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(record.is_logger_config(&db));
    assert!(!Arc::ptr_eq(record.append(), &app_console));
    let filter = db
        .appender("Console")
        .and_then(|c| c.filter().and_then(|f| f.as_level_range()).cloned())
        .unwrap();
    assert_eq!(filter.min(), LevelFilter::Off);
    assert_eq!(filter.max(), LevelFilter::Warn);
    assert!(app.appenders().len() == 1);
}

#[test]
fn test_attaches_registered_appender() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let shared = temp_dir.path().join("shared.log");
    let file: Arc<dyn Append> = Arc::new(FileBuilder::new("File", &shared).build().unwrap());

    let config = Configuration::builder()
        .root_level(LevelFilter::Info)
        .appender(file.clone())
        .build()
        .unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);

    let request =
        InitializationRequest::new(node.clone(), AppenderType::FILE).with_level(LevelFilter::Debug);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(Arc::ptr_eq(record.append(), &file));
    assert!(record.is_logger_config(&node));
    assert_eq!(node.appender("File").unwrap().level(), LevelFilter::Debug);
}

#[test]
fn test_dedicated_file_constructs_new_appender() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let shared = temp_dir.path().join("shared.log");
    let dedicated = temp_dir.path().join("dedicated.log");
    let layout: Arc<dyn Layout> = Arc::new(PatternLayout::new("%p %m"));
    let file: Arc<dyn Append> = Arc::new(
        FileBuilder::new("File", &shared)
            .shared_layout(layout.clone())
            .build()
            .unwrap(),
    );

    let config = Configuration::builder()
        .root_level(LevelFilter::Info)
        .appender(file.clone())
        .build()
        .unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);

    let request = InitializationRequest::new(node.clone(), AppenderType::FILE)
        .with_level(LevelFilter::Debug)
        .with_log_file_path(&dedicated);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(!Arc::ptr_eq(record.append(), &file));
    assert_eq!(record.append().destination(), Some(dedicated.as_path()));
    assert!(Arc::ptr_eq(record.layout(), &layout));
    assert!(node.appender("File").unwrap().filter().is_none());
}

#[test]
fn test_name_priority_beats_depth() {
    const CONSOLES: AppenderType =
        AppenderType::new(&["ConsoleA", "ConsoleB"], AppendKind::Console);

    let config = Configuration::new(LevelFilter::Info);
    let far = initialize_appender(config.root(), console("ConsoleA"), LevelFilter::Trace, None)
        .unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
    initialize_appender(&node, console("ConsoleB"), LevelFilter::Trace, None).unwrap();

    let record = find_appender(&node, CONSOLES).unwrap().unwrap();
    assert!(Arc::ptr_eq(record.append(), &far));

    let request = InitializationRequest::new(node.clone(), CONSOLES);
    let record = config.get_or_setup_appender(&request).unwrap();
    assert_eq!(record.append().name(), "ConsoleA");
    assert!(record.is_logger_config(config.root()));
}

#[test]
fn test_names_match_case_insensitively() {
    let config = Configuration::new(LevelFilter::Info);
    let append =
        initialize_appender(config.root(), console("consoleappender"), LevelFilter::Trace, None)
            .unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);

    let record = find_appender(&node, AppenderType::CONSOLE).unwrap().unwrap();
    assert!(Arc::ptr_eq(record.append(), &append));
}

#[test]
fn test_capability_mismatch_falls_through_to_construction() {
    let config = Configuration::new(LevelFilter::Info);
    let impostor: Arc<dyn Append> = Arc::new(Testing::new("Console"));
    initialize_appender(config.root(), impostor.clone(), LevelFilter::Trace, None).unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);

    let err = find_appender(&node, AppenderType::CONSOLE).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapabilityMismatch);

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);
    let record = config.get_or_setup_appender(&request).unwrap();
    assert_eq!(record.append().kind(), AppendKind::Console);
    assert!(!Arc::ptr_eq(record.append(), &impostor));
    assert!(record.is_logger_config(&node));
}

#[test]
fn test_unsupported_type_is_an_error() {
    const SOCKET: AppenderType = AppenderType::new(&["Socket"], AppendKind::Custom("Socket"));

    let config = Configuration::new(LevelFilter::Info);
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
    let err = config
        .get_or_setup_appender(&InitializationRequest::new(node.clone(), SOCKET))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedConstruction);
    assert!(node.appenders().is_empty());
}

#[test]
fn test_shadowed_file_receives_each_record_once() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");

    let config = Configuration::new(LevelFilter::Warn);
    let root_request = InitializationRequest::new(config.root().clone(), AppenderType::FILE)
        .with_level(LevelFilter::Warn)
        .with_log_file_path(&path);
    let root_record = config.get_or_setup_appender(&root_request).unwrap();

    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
    let request =
        InitializationRequest::new(node.clone(), AppenderType::FILE).with_level(LevelFilter::Debug);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(!Arc::ptr_eq(record.append(), root_record.append()));
    assert_eq!(record.append().destination(), Some(path.as_path()));

    log(&config, "app", Level::Error, "error from app");
    log(&config, "app", Level::Info, "info from app");
    log(&config, "app", Level::Trace, "trace from app");
    log(&config, "other", Level::Warn, "warn from other");
    log(&config, "other", Level::Info, "info from other");
    config.flush().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines().collect::<Vec<_>>();
    lines.sort_unstable();
    assert_eq!(
        lines,
        vec!["error from app", "info from app", "warn from other"]
    );
}

#[test]
fn test_additive_owner_keeps_level_when_parent_passes_it() {
    let config = Configuration::new(LevelFilter::Info);
    initialize_appender(config.root(), console("Console"), LevelFilter::Trace, None).unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Trace, true);
    let own = initialize_appender(&node, console("Console"), LevelFilter::Info, None).unwrap();

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Debug);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(Arc::ptr_eq(record.append(), &own));
    assert!(record.is_logger_config(&node));
    assert_eq!(record.level(), LevelFilter::Info);
    let control = node.appender("Console").unwrap();
    assert_eq!(control.level(), LevelFilter::Info);
    assert!(control.filter().is_none());
    assert_eq!(node.appenders().len(), 1);
}

#[test]
fn test_registry_capability_mismatch_falls_through_to_construction() {
    captured();
    let impostor: Arc<dyn Append> = Arc::new(Testing::new("Console"));
    let config = Configuration::builder()
        .root_level(LevelFilter::Info)
        .appender(impostor.clone())
        .build()
        .unwrap();
    let node = config.get_or_create_logger_config("registry::mismatch", LevelFilter::Debug, true);

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert_eq!(record.append().kind(), AppendKind::Console);
    assert!(!Arc::ptr_eq(record.append(), &impostor));
    assert!(record.is_logger_config(&node));
    assert!(Arc::ptr_eq(node.appender("Console").unwrap().append(), record.append()));

    let messages = captured();
    assert!(
        messages.iter().any(|message| message.starts_with("ERROR ")
            && message.contains("(CapabilityMismatch)")
            && message.contains("logger: <configuration>")),
        "{messages:?}"
    );
}

#[test]
fn test_dedicated_file_never_reuses_inherited_appender() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let shared = temp_dir.path().join("shared.log");
    let dedicated = temp_dir.path().join("dedicated.log");

    let config = Configuration::new(LevelFilter::Info);
    let root_request = InitializationRequest::new(config.root().clone(), AppenderType::FILE)
        .with_layout(PatternLayout::new("%p %m"))
        .with_log_file_path(&shared);
    let root_record = config.get_or_setup_appender(&root_request).unwrap();

    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
    let request = InitializationRequest::new(node.clone(), AppenderType::FILE)
        .with_level(LevelFilter::Debug)
        .with_log_file_path(&dedicated);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(!Arc::ptr_eq(record.append(), root_record.append()));
    assert!(record.is_logger_config(&node));
    assert_eq!(record.level(), LevelFilter::Debug);
    assert_eq!(record.append().destination(), Some(dedicated.as_path()));
    assert!(Arc::ptr_eq(record.layout(), root_record.layout()));

    let control = node.appender("File").unwrap();
    assert!(Arc::ptr_eq(control.append(), record.append()));
    assert!(control.filter().is_none());
    assert_eq!(config.root().appenders().len(), 1);
}

#[test]
fn test_dedicated_file_never_reuses_own_appender() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let shared = temp_dir.path().join("shared.log");
    let dedicated = temp_dir.path().join("dedicated.log");

    let config = Configuration::new(LevelFilter::Info);
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, false);
    let shared_request = InitializationRequest::new(node.clone(), AppenderType::FILE)
        .with_level(LevelFilter::Info)
        .with_log_file_path(&shared);
    let own = config.get_or_setup_appender(&shared_request).unwrap();

    // asking again for the same file reuses it
    let again = config.get_or_setup_appender(&shared_request).unwrap();
    assert!(Arc::ptr_eq(again.append(), own.append()));

    let request = shared_request.with_log_file_path(&dedicated);
    let record = config.get_or_setup_appender(&request).unwrap();

    assert!(!Arc::ptr_eq(record.append(), own.append()));
    assert_eq!(record.append().destination(), Some(dedicated.as_path()));
    assert!(Arc::ptr_eq(record.layout(), own.layout()));
    assert_eq!(node.appenders().len(), 1);
    assert_eq!(
        node.appender("File").unwrap().append().destination(),
        Some(dedicated.as_path())
    );
}

#[cfg(feature = "layout-json")]
#[test]
fn test_shadow_formats_with_shadowed_json_layout() {
    use logtree::layout::JsonLayout;

    let config = Configuration::new(LevelFilter::Info);
    let json = Testing::new("Console")
        .with_kind(AppendKind::Console)
        .with_layout(JsonLayout::default());
    let root_console =
        initialize_appender(config.root(), Arc::new(json), LevelFilter::Warn, None).unwrap();
    let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);

    let request =
        InitializationRequest::new(node.clone(), AppenderType::CONSOLE).with_level(LevelFilter::Info);
    let record = config.get_or_setup_appender(&request).unwrap();
    assert!(!Arc::ptr_eq(record.append(), &root_console));
    assert!(Arc::ptr_eq(record.layout(), root_console.layout()));

    let bytes = record
        .layout()
        .format(
            &Record::builder()
                .args(format_args!("connected"))
                .level(Level::Info)
                .target("app")
                .build(),
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["logger"], "app");
    assert_eq!(value["message"], "connected");
}
