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

use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Record;

use crate::Error;
use crate::layout::KvDisplay;
use crate::layout::Layout;

/// The conversion pattern used by [`PatternLayout::default`]: only the message.
pub const SIMPLE_CONVERSION_PATTERN: &str = "%m";

/// The conversion pattern with a timestamp, the level and the target.
pub const DETAILED_CONVERSION_PATTERN: &str = "%d %5p %c: %m";

/// A layout that formats log records according to a conversion pattern.
///
/// Supported conversions:
///
/// | Pattern | Output                                    |
/// |---------|-------------------------------------------|
/// | `%d`    | timestamp, ISO 8601 with offset           |
/// | `%p`    | level, `%5p` pads it to five characters   |
/// | `%c`    | target                                    |
/// | `%t`    | target, alias of `%c`                     |
/// | `%m`    | message                                   |
/// | `%K`    | key-values, each prefixed with a space    |
/// | `%n`    | line separator                            |
/// | `%%`    | a literal `%`                             |
///
/// Unknown conversions are copied to the output unchanged.
///
/// # Examples
///
/// ```
/// use logtree::layout::PatternLayout;
///
/// let layout = PatternLayout::new("%5p [%c] %m");
/// ```
#[derive(Debug, Clone)]
pub struct PatternLayout {
    pattern: String,
    tokens: Vec<Token>,
    tz: Option<TimeZone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Date,
    Level(usize),
    Target,
    Message,
    KeyValues,
    Newline,
}

impl Default for PatternLayout {
    fn default() -> Self {
        Self::new(SIMPLE_CONVERSION_PATTERN)
    }
}

impl PatternLayout {
    /// Creates a layout from a conversion pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let tokens = parse(&pattern);
        Self {
            pattern,
            tokens,
            tz: None,
        }
    }

    /// Sets the timezone for `%d`. Default to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Returns the conversion pattern of this layout.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn parse(pattern: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let mut width = String::new();
        while let Some(d) = chars.next_if(|d| d.is_ascii_digit()) {
            width.push(d);
        }

        let token = match chars.next() {
            Some('%') if width.is_empty() => {
                literal.push('%');
                continue;
            }
            Some('d') => Token::Date,
            Some('p') => Token::Level(width.parse().unwrap_or(0)),
            Some('c') | Some('t') => Token::Target,
            Some('m') => Token::Message,
            Some('K') => Token::KeyValues,
            Some('n') => Token::Newline,
            Some(other) => {
                literal.push('%');
                literal.push_str(&width);
                literal.push(other);
                continue;
            }
            None => {
                literal.push('%');
                literal.push_str(&width);
                continue;
            }
        };

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(token);
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

impl Layout for PatternLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut text = String::new();

        for token in &self.tokens {
            match token {
                Token::Literal(s) => text.push_str(s),
                Token::Date => {
                    let now = match self.tz.clone() {
                        Some(tz) => Zoned::now().with_time_zone(tz),
                        None => Zoned::now(),
                    };
                    write!(&mut text, "{}", now.strftime("%Y-%m-%dT%H:%M:%S.%6f%:z"))
                        .map_err(Error::from_fmt_error)?;
                }
                Token::Level(width) => {
                    write!(&mut text, "{:>width$}", record.level().as_str(), width = *width)
                        .map_err(Error::from_fmt_error)?;
                }
                Token::Target => text.push_str(record.target()),
                Token::Message => {
                    write!(&mut text, "{}", record.args()).map_err(Error::from_fmt_error)?;
                }
                Token::KeyValues => {
                    write!(&mut text, "{}", KvDisplay::new(record.key_values()))
                        .map_err(Error::from_fmt_error)?;
                }
                Token::Newline => text.push('\n'),
            }
        }

        Ok(text.into_bytes())
    }
}
