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

//! Logtree is a hierarchical logger configuration for the `log` facade, with programmatic
//! appender reconciliation.
//!
//! # Overview
//!
//! A [`Configuration`] is a tree of [`LoggerConfig`] nodes, named like `log` targets, plus a
//! registry of globally configured appenders. Applications ask for "an appender of this type at
//! this level on this node" through [`appender::get_or_setup_appender`]; the resolver reuses an
//! appender the node already reaches, attaches a configured one, or constructs a new one. When an
//! inherited appender would drop records the node needs, it builds a filtered "shadow" appender
//! that writes only the records the inherited one rejects.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use log::LevelFilter;
//! use logtree::Configuration;
//! use logtree::append::Console;
//! use logtree::appender::AppenderType;
//! use logtree::appender::InitializationRequest;
//!
//! let config = Configuration::builder()
//!     .root_level(LevelFilter::Warn)
//!     .logger("app::db", LevelFilter::Debug, true)
//!     .appender(Arc::new(Console::new("Console")))
//!     .build()
//!     .unwrap();
//!
//! let node = config.get_logger_config("app::db").unwrap();
//! let request = InitializationRequest::new(node, AppenderType::CONSOLE)
//!     .with_level(LevelFilter::Debug);
//! let record = config.get_or_setup_appender(&request).unwrap();
//!
//! assert_eq!(record.append().name(), "Console");
//! assert_eq!(record.level(), LevelFilter::Debug);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod appender;
pub mod config;
pub mod filter;
pub mod layout;
pub mod violation;

pub use append::Append;
pub use config::AppenderControl;
pub use config::Configuration;
pub use config::ConfigurationBuilder;
pub use config::LoggerConfig;
pub use filter::Filter;
pub use layout::Layout;

mod error;
pub use error::Error;
pub use error::ErrorKind;

mod logger;
pub use logger::Logger;
