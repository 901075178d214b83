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

use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Record;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::ErrorKind;
use crate::layout::Layout;

/// A layout that formats each record as one JSON object.
///
/// Output format:
///
/// ```json
/// {"timestamp":"2024-08-11T22:44:57.172051+08:00","level":"ERROR","logger":"app::db","message":"Hello error!","kvs":{"user":"alice"}}
/// {"timestamp":"2024-08-11T22:44:57.172187+08:00","level":"WARN","logger":"app::db","message":"Hello warn!","file":"src/db.rs","line":52}
/// ```
///
/// `logger` is the record's target, which is also the name of the logger config node it enters.
/// `file` and `line` are written when [`JsonLayout::with_location`] is set and the record has
/// them; `kvs` only when the record carries key-values.
///
/// # Examples
///
/// ```
/// use logtree::layout::JsonLayout;
///
/// let json_layout = JsonLayout::default().with_location(true);
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    location: bool,
    tz: Option<TimeZone>,
}

impl JsonLayout {
    /// Sets whether the source file and line are written. Default to false.
    pub fn with_location(mut self, location: bool) -> Self {
        self.location = location;
        self
    }

    /// Sets the timezone for timestamps. Default to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    level: &'a str,
    logger: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    kvs: Map<String, Value>,
}

struct KvCollector<'a>(&'a mut Map<String, Value>);

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.0.insert(key.to_string(), Value::String(value.to_string()));
        Ok(())
    }
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut kvs = Map::new();
        record
            .key_values()
            .visit(&mut KvCollector(&mut kvs))
            .map_err(|err| {
                Error::new(ErrorKind::Unexpected, "failed to collect key-values").with_source(err)
            })?;

        let now = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        };
        let line = JsonRecord {
            timestamp: now.strftime("%Y-%m-%dT%H:%M:%S.%6f%:z").to_string(),
            level: record.level().as_str(),
            logger: record.target(),
            message: record.args().to_string(),
            file: record.file().filter(|_| self.location),
            line: record.line().filter(|_| self.location),
            kvs,
        };

        serde_json::to_vec(&line).map_err(|err| {
            Error::new(ErrorKind::Unexpected, "failed to serialize record").with_source(err)
        })
    }
}
