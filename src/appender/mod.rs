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

//! Programmatic setup of appenders on a logger configuration tree.
//!
//! The entry point is [`get_or_setup_appender`]: describe the wanted appender with an
//! [`InitializationRequest`] and receive an [`AppenderRecord`] for an appender that was found,
//! reused or constructed.
//!
//! # Examples
//!
//! ```
//! use log::LevelFilter;
//! use logtree::Configuration;
//! use logtree::appender::AppenderType;
//! use logtree::appender::InitializationRequest;
//! use logtree::appender::get_or_setup_appender;
//!
//! let config = Configuration::new(LevelFilter::Info);
//! let node = config.get_or_create_logger_config("app", LevelFilter::Debug, true);
//!
//! let request = InitializationRequest::new(node.clone(), AppenderType::CONSOLE)
//!     .with_level(LevelFilter::Debug);
//! let record = get_or_setup_appender(&config, &request).unwrap();
//!
//! assert_eq!(record.append().name(), "Console");
//! assert!(record.is_logger_config(&node));
//! ```

mod construct;
mod record;
mod request;
mod resolve;
mod types;

pub use self::construct::construct_appender;
pub use self::construct::create_console_appender;
pub use self::construct::create_file_appender;
pub use self::construct::detach_appender;
pub use self::construct::initialize_appender;
pub use self::construct::standard_log_file_path;
pub use self::construct::update_appender;
pub use self::record::AppenderRecord;
pub use self::request::InitializationRequest;
pub use self::resolve::find_appender;
pub use self::resolve::find_configured_appender;
pub use self::resolve::get_or_setup_appender;
pub use self::types::AppenderType;
