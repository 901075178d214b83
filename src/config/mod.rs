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

//! The logger configuration tree and the global appender registry.

mod builder;
mod configuration;
mod node;

pub use self::builder::ConfigurationBuilder;
pub use self::configuration::Configuration;
pub use self::node::AppenderControl;
pub use self::node::LoggerConfig;

/// Separator between segments of a logger configuration name, matching `log` targets.
pub const NAME_SEPARATOR: &str = "::";

/// Returns the name of the closest possible ancestor: `a::b` for `a::b::c`, `None` for `a`.
pub(crate) fn parent_name(name: &str) -> Option<&str> {
    name.rfind(NAME_SEPARATOR).map(|index| &name[..index])
}
