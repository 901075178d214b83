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

use std::fmt::Write;

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::Colorize;
use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Level;
use log::Record;

use crate::Error;
use crate::layout::KvDisplay;
use crate::layout::Layout;
use crate::layout::filename;

/// A layout that formats log record as text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00 ERROR app::db: db.rs:51 Hello error!
/// 2024-08-11T22:44:57.172219+08:00  WARN app::db: db.rs:52 Hello warn!
/// 2024-08-11T22:44:57.172276+08:00  INFO app::db: db.rs:53 Hello info!
/// ```
///
/// With the `colored` feature enabled, log levels are colored unless [`TextLayout::no_color`] is
/// called.
///
/// # Examples
///
/// ```
/// use logtree::layout::TextLayout;
///
/// let text_layout = TextLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct TextLayout {
    #[cfg(feature = "colored")]
    colors: LevelColor,
    no_color: bool,
    tz: Option<TimeZone>,
}

/// Customize the color of each log level.
#[cfg(feature = "colored")]
#[derive(Debug, Clone)]
struct LevelColor {
    error: Color,
    warn: Color,
    info: Color,
    debug: Color,
    trace: Color,
}

#[cfg(feature = "colored")]
impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::Blue,
            trace: Color::Magenta,
        }
    }
}

impl TextLayout {
    /// Customize the color of the error log level. Default to red.
    #[cfg(feature = "colored")]
    pub fn error_color(mut self, color: Color) -> Self {
        self.colors.error = color;
        self
    }

    /// Customize the color of the warn log level. Default to yellow.
    #[cfg(feature = "colored")]
    pub fn warn_color(mut self, color: Color) -> Self {
        self.colors.warn = color;
        self
    }

    /// Customize the color of the info log level. Default to green.
    #[cfg(feature = "colored")]
    pub fn info_color(mut self, color: Color) -> Self {
        self.colors.info = color;
        self
    }

    /// Customize the color of the debug log level. Default to blue.
    #[cfg(feature = "colored")]
    pub fn debug_color(mut self, color: Color) -> Self {
        self.colors.debug = color;
        self
    }

    /// Customize the color of the trace log level. Default to magenta.
    #[cfg(feature = "colored")]
    pub fn trace_color(mut self, color: Color) -> Self {
        self.colors.trace = color;
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the timezone for timestamps. Default to the system timezone.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logtree::layout::TextLayout;
    ///
    /// let layout = TextLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    fn format_level(&self, level: Level) -> String {
        #[cfg(feature = "colored")]
        if !self.no_color {
            let color = match level {
                Level::Error => self.colors.error,
                Level::Warn => self.colors.warn,
                Level::Info => self.colors.info,
                Level::Debug => self.colors.debug,
                Level::Trace => self.colors.trace,
            };
            return format!("{:>5}", level.as_str().color(color));
        }

        format!("{:>5}", level.as_str())
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let time = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        };

        let mut text = String::new();
        write!(
            &mut text,
            "{time} {level} {target}: {file}:{line} {message}{kvs}",
            time = time.strftime("%Y-%m-%dT%H:%M:%S.%6f%:z"),
            level = self.format_level(record.level()),
            target = record.target(),
            file = filename(record),
            line = record.line().unwrap_or_default(),
            message = record.args(),
            kvs = KvDisplay::new(record.key_values()),
        )
        .map_err(Error::from_fmt_error)?;

        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_layout_output() {
        let layout = TextLayout::default().no_color().timezone(TimeZone::UTC);
        let kvs = [("user", "alice")];
        let bytes = layout
            .format(
                &Record::builder()
                    .args(format_args!("logged in"))
                    .level(Level::Info)
                    .target("app::auth")
                    .file(Some("src/auth/session.rs"))
                    .line(Some(42))
                    .key_values(&kvs)
                    .build(),
            )
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(
            text.ends_with("+00:00  INFO app::auth: session.rs:42 logged in user=alice"),
            "{text}"
        );
    }
}
