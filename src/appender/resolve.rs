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
use crate::Configuration;
use crate::Error;
use crate::ErrorKind;
use crate::LoggerConfig;
use crate::appender::AppenderRecord;
use crate::appender::AppenderType;
use crate::appender::InitializationRequest;
use crate::appender::construct_appender;
use crate::appender::initialize_appender;
use crate::appender::update_appender;
use crate::filter::LevelRangeFilter;

/// Finds, reuses or constructs the appender described by `request`.
///
/// In order:
///
/// 1. Search the requested node and its additive ancestors for an appender of the requested type
///    (see [`find_appender`]). A match that writes somewhere else than the request's dedicated
///    log file is never reused: a new appender is constructed on the node with its layout.
/// 2. When nothing is reachable, look the type up in the configuration's registry. A registered
///    appender is attached to the node as is, unless the request is dedicated to another log file,
///    in which case a new appender is constructed with the registered appender's layout. Without
///    a registered appender, one is constructed from the request.
/// 3. When the node owns the match itself and inherits from its parent, an appender of the same
///    type further up that filters the match's level is shadowed by an additive appender on the
///    node. A node that does not inherit gets the match's level updated in place instead.
/// 4. When the match is inherited from an ancestor whose level filters the requested level, it is
///    shadowed by an additive appender on the node; otherwise the inherited match is returned.
///
/// An additive appender copies the layout of the appender it shadows and rejects every record
/// that the shadowed appender lets through, so that records are not written twice. When the
/// request is dedicated to another log file there is nothing to deduplicate and no filter is
/// attached.
///
/// # Errors
///
/// Return an error if an appender has to be constructed and construction fails, see
/// [`construct_appender`].
pub fn get_or_setup_appender(
    config: &Configuration,
    request: &InitializationRequest,
) -> Result<AppenderRecord, Error> {
    let logger_config = request.logger_config();
    let appender_type = request.appender_type();

    let Some(mut record) = report_mismatch(find_appender(logger_config, appender_type)) else {
        log::warn!(
            "unable to find reachable {appender_type} in logger config {}",
            logger_config.display_name()
        );

        let append = match report_mismatch(find_configured_appender(config, appender_type)) {
            // the registered appender writes somewhere else than the dedicated log file
            Some(append) if request.is_dedicated_file_appender(append.as_ref()) => {
                return construct_dedicated_appender(config, append.as_ref(), request);
            }
            Some(append) => initialize_appender(logger_config, append, request.level(), None)?,
            None => construct_appender(config, request, None)?,
        };

        return Ok(AppenderRecord::new(
            logger_config.clone(),
            append,
            appender_type,
            request.level(),
        ));
    };

    if request.is_dedicated_file_appender(record.append().as_ref()) {
        return construct_dedicated_appender(config, record.append().as_ref(), request);
    }

    if record.is_logger_config(logger_config) {
        match logger_config.parent() {
            Some(parent) if logger_config.is_additive() => {
                let parent_record = report_mismatch(find_appender(&parent, appender_type));
                if let Some(parent_record) = parent_record {
                    if parent_record.is_filtering(record.level()) {
                        return construct_additive_appender(config, &parent_record, request);
                    }
                }
            }
            _ => {
                if !record.is_level(request.level()) {
                    update_appender(&mut record, request.level(), None)?;
                }
            }
        }
    } else if !record.is_level(request.level()) && record.is_filtering(request.level()) {
        return construct_additive_appender(config, &record, request);
    }

    Ok(record)
}

/// Constructs an appender on the requested node that writes to the request's dedicated log file
/// with the layout of `found`.
fn construct_dedicated_appender(
    config: &Configuration,
    found: &dyn Append,
    request: &InitializationRequest,
) -> Result<AppenderRecord, Error> {
    log::debug!(
        "constructing dedicated {} for logger config {} instead of reusing {}",
        request.appender_type(),
        request.logger_config().display_name(),
        found.name(),
    );

    let dedicated = request.copy_with_layout(found.layout().clone());
    let append = construct_appender(config, &dedicated, None)?;
    Ok(AppenderRecord::new(
        request.logger_config().clone(),
        append,
        request.appender_type(),
        request.level(),
    ))
}

/// Constructs an appender on the requested node that shadows `shadowed`.
fn construct_additive_appender(
    config: &Configuration,
    shadowed: &AppenderRecord,
    request: &InitializationRequest,
) -> Result<AppenderRecord, Error> {
    log::debug!(
        "constructing additive {} for logger config {} over {} of logger config {}",
        request.appender_type(),
        request.logger_config().display_name(),
        shadowed.append().name(),
        shadowed.logger_config().display_name(),
    );

    let dedicated_file = request.is_dedicated_file_appender(shadowed.append().as_ref());
    let mut additive = request.copy_with_layout(shadowed.layout().clone());
    if additive.log_file_path().is_none() {
        if let Some(destination) = shadowed.append().destination() {
            additive = additive.with_log_file_path(destination);
        }
    }

    let filter = if dedicated_file {
        None
    } else {
        Some(LevelRangeFilter::deny(LevelFilter::Off, shadowed.level()).into())
    };

    let append = construct_appender(config, &additive, filter)?;
    Ok(AppenderRecord::new(
        request.logger_config().clone(),
        append,
        request.appender_type(),
        request.level(),
    ))
}

fn report_mismatch<T>(result: Result<Option<T>, Error>) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(err) => {
            log::error!("{err}");
            None
        }
    }
}

/// Searches `logger_config` and its additive ancestors for an appender of `appender_type`.
///
/// Names of the type are tried in order. For each name the walk starts over at `logger_config`
/// and climbs while the visited node is additive; names compare case-insensitively. The first hit
/// for a name wins over any hit for a later name, however close to `logger_config`.
///
/// The returned record is bound to the node the appender is attached to, with the level of that
/// attachment.
///
/// # Errors
///
/// Return an error if an appender is found by name but does not provide the capability of
/// `appender_type`. The search stops there.
pub fn find_appender(
    logger_config: &Arc<LoggerConfig>,
    appender_type: AppenderType,
) -> Result<Option<AppenderRecord>, Error> {
    for name in appender_type.names() {
        let mut lookup = Some(logger_config.clone());
        while let Some(node) = lookup {
            let found = node
                .appenders()
                .into_iter()
                .find(|control| control.name().eq_ignore_ascii_case(name));

            if let Some(control) = found {
                let append = control.append().clone();
                if !appender_type.accepts(append.as_ref()) {
                    return Err(capability_mismatch(appender_type, append.as_ref())
                        .with_context("logger", node.display_name()));
                }
                return Ok(Some(AppenderRecord::new(
                    node,
                    append,
                    appender_type,
                    control.level(),
                )));
            }

            lookup = if node.is_additive() {
                node.parent()
            } else {
                None
            };
        }
    }
    Ok(None)
}

/// Searches the registry of `config` for an appender of `appender_type`, trying names in order
/// and comparing them case-insensitively.
///
/// # Errors
///
/// Return an error if an appender is found by name but does not provide the capability of
/// `appender_type`.
pub fn find_configured_appender(
    config: &Configuration,
    appender_type: AppenderType,
) -> Result<Option<Arc<dyn Append>>, Error> {
    let appenders = config.appenders();
    for name in appender_type.names() {
        if let Some(append) = appenders.iter().find(|a| a.name().eq_ignore_ascii_case(name)) {
            if !appender_type.accepts(append.as_ref()) {
                return Err(capability_mismatch(appender_type, append.as_ref())
                    .with_context("logger", "<configuration>"));
            }
            return Ok(Some(append.clone()));
        }
    }
    Ok(None)
}

fn capability_mismatch(appender_type: AppenderType, append: &dyn Append) -> Error {
    Error::new(
        ErrorKind::CapabilityMismatch,
        format!("found appender \"{}\" by name with an unexpected kind", append.name()),
    )
    .with_context("expected", appender_type.kind())
    .with_context("found", append.kind())
}
