// Wire codec for the tab/newline-delimited control protocol.
//
// Everything here degrades instead of erroring: malformed input yields
// defaulted values with `success == false` (or an empty/None result), never
// a panic or an `Err` the caller has to handle.

use serde::Deserialize;
use tracing::{debug, warn};

use super::commands as cmd;
use crate::domain::{PlayState, TabInfo, TransportState};

/// Build the request path for one or more commands.
///
/// Batched commands are semicolon-joined after the fixed base path; a single
/// command is the degenerate one-element case. Commands are protocol opcodes
/// or key paths, not arbitrary user text, so no escaping is applied.
pub fn request_path(commands: &[&str]) -> String {
    format!("{}/{}", cmd::BASE_PATH, commands.join(";"))
}

/// Split one response line on horizontal tabs.
///
/// A single trailing newline is trimmed and empty trailing fragments are
/// dropped, so `"EXTSTATE\ta\tb\tc\n"` yields exactly four fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let mut fields: Vec<&str> = line.split('\t').collect();
    while fields.last().map_or(false, |f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Split a batched response body into its non-empty records.
///
/// Lines are newline-separated with an optional trailing carriage return.
/// Only commands that return data contribute a record: `SET/...` and opaque
/// run-script commands are silent, so the Nth record belongs to the Nth
/// output-producing command of the batch. Callers must index accordingly;
/// that is a protocol quirk, not a codec bug.
pub fn split_records(body: &str) -> Vec<&str> {
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse a `TRANSPORT` line into a transport snapshot.
///
/// Requires at least five fields shaped
/// `[TRANSPORT, play_state, position_seconds, repeat_flag, bars_beats]`.
/// Tag mismatch, short lines and unparseable numerics all degrade to a
/// defaulted state with `success == false`. A play-state code outside the
/// protocol's set fails the whole line as well, stricter than clients that
/// track an integer code: `PlayState` is a closed enum and has no slot for
/// an unknown code, and the store keeps the previous snapshot anyway.
pub fn parse_transport(fields: &[&str]) -> TransportState {
    let mut state = TransportState::default();

    if fields.len() < 5 || fields[0] != cmd::TRANSPORT {
        warn!(field_count = fields.len(), "malformed transport line");
        return state;
    }

    let play_state = match fields[1].parse::<i64>().ok().and_then(PlayState::from_code) {
        Some(ps) => ps,
        None => {
            warn!(raw = fields[1], "unrecognized play state code");
            return state;
        }
    };
    let position_seconds = match fields[2].parse::<f64>() {
        Ok(pos) => pos,
        Err(_) => {
            warn!(raw = fields[2], "unparseable transport position");
            return state;
        }
    };

    state.play_state = play_state;
    state.position_seconds = position_seconds;
    state.repeat_enabled = fields[3] == "1";
    state.position_bars_beats = fields[4].to_string();
    state.success = true;
    state
}

/// Shape of one tab entry inside the ReaperSetlist `tabs` extstate value.
/// Extra keys (e.g. `dirty`) are ignored.
#[derive(Deserialize)]
struct RawTab {
    length: f64,
    name: String,
    index: u32,
}

/// Parse the JSON tab list carried in the `tabs` extstate value.
///
/// Entries missing a required key are skipped with a warning; a malformed
/// document yields an empty list. Never fatal.
pub fn parse_tab_list(json: &str) -> Vec<TabInfo> {
    let doc: serde_json::Value = match serde_json::from_str(json) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(error = %err, "tab list is not valid JSON");
            return Vec::new();
        }
    };
    let entries = match doc.as_array() {
        Some(entries) => entries,
        None => {
            warn!("tab list is not a JSON array");
            return Vec::new();
        }
    };

    let mut tabs = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<RawTab>(entry.clone()) {
            Ok(raw) => tabs.push(TabInfo {
                length_seconds: raw.length,
                name: strip_project_suffix(raw.name),
                index: raw.index,
            }),
            Err(err) => warn!(error = %err, "skipping tab entry missing required fields"),
        }
    }

    debug!(count = tabs.len(), "parsed tab list");
    tabs
}

// Case-sensitive by protocol: only these two spellings are ever produced.
fn strip_project_suffix(name: String) -> String {
    for suffix in [".rpp", ".RPP"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    name
}

/// Extract the value of a 4-field `[EXTSTATE, namespace, key, value]` line.
///
/// Returns the value only when the namespace and key match exactly.
pub fn parse_keyed_field<'a>(fields: &[&'a str], namespace: &str, key: &str) -> Option<&'a str> {
    if fields.len() >= 4
        && fields[0] == cmd::EXTSTATE_TAG
        && fields[1] == namespace
        && fields[2] == key
    {
        Some(fields[3])
    } else {
        None
    }
}
