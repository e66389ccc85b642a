// Job execution - one exhaustive match over the closed set of job kinds.
//
// Each kind issues exactly one request (single command or semicolon batch)
// and parses the records it knows the batch produces. Transport failures and
// malformed bodies never escape: they come back as `success == false`.

use tracing::{debug, warn};

use crate::domain::{JobKind, PlayAction, ResultPayload, SetlistState, TabDirection};
use crate::port::{TransportError, TransportPort};
use crate::protocol::{self, commands as cmd};

/// Execute one job against the transport port.
///
/// Returns the overall success flag plus the kind-matched payload. An
/// unsuccessful execution carries defaulted payload fields.
pub(crate) async fn execute(kind: &JobKind, transport: &dyn TransportPort) -> (bool, ResultPayload) {
    match kind {
        JobKind::Connect => execute_connect(transport).await,
        JobKind::ChangeTab { direction, token } => {
            let tab_command = match direction {
                TabDirection::Next => cmd::NEXT_TAB,
                TabDirection::Previous => cmd::PREVIOUS_TAB,
            };
            let path = protocol::request_path(&[
                tab_command,
                cmd::SET_OPERATION_GET_OPEN_TABS,
                token.as_str(),
                cmd::GET_TABS,
                cmd::GET_ACTIVE_INDEX,
                cmd::TRANSPORT,
            ]);
            let (setlist, transport_state, ok) = match fetch(transport, &path).await {
                Some(body) => parse_status_batch(&body),
                None => Default::default(),
            };
            (
                ok,
                ResultPayload::ChangeTab {
                    setlist,
                    transport: transport_state,
                },
            )
        }
        JobKind::ChangePlaystate(action) => {
            let action_command = match action {
                PlayAction::Play => cmd::PLAY,
                PlayAction::Stop => cmd::STOP,
            };
            let path = protocol::request_path(&[action_command, cmd::TRANSPORT]);
            let transport_state = match fetch(transport, &path).await {
                Some(body) => {
                    // The playstate opcode is silent; the single record is
                    // the TRANSPORT line.
                    match protocol::split_records(&body).first() {
                        Some(record) => protocol::parse_transport(&protocol::split_fields(record)),
                        None => {
                            warn!("playstate batch returned no records");
                            Default::default()
                        }
                    }
                }
                None => Default::default(),
            };
            let success = transport_state.success;
            (
                success,
                ResultPayload::ChangePlaystate {
                    transport: transport_state,
                },
            )
        }
        JobKind::GetStatus { token } => {
            let path = protocol::request_path(&[
                cmd::SET_OPERATION_GET_OPEN_TABS,
                token.as_str(),
                cmd::GET_TABS,
                cmd::GET_ACTIVE_INDEX,
                cmd::TRANSPORT,
            ]);
            let (setlist, transport_state, ok) = match fetch(transport, &path).await {
                Some(body) => parse_status_batch(&body),
                None => Default::default(),
            };
            (
                ok,
                ResultPayload::Status {
                    setlist,
                    transport: transport_state,
                },
            )
        }
        JobKind::GetSessionToken => {
            let path = protocol::request_path(&[cmd::GET_SESSION_TOKEN]);
            let token = match fetch(transport, &path).await {
                Some(body) => protocol::parse_keyed_field(
                    &protocol::split_fields(&body),
                    cmd::SETLIST_NAMESPACE,
                    cmd::SESSION_TOKEN_KEY,
                )
                .map(crate::domain::SessionToken::new),
                None => None,
            };
            match token {
                Some(token) if token.is_acquired() => {
                    debug!(token = %token, "session token acquired");
                    (true, ResultPayload::SessionToken { token })
                }
                _ => (
                    false,
                    ResultPayload::SessionToken {
                        token: Default::default(),
                    },
                ),
            }
        }
        JobKind::GetTransport => {
            let path = protocol::request_path(&[cmd::TRANSPORT]);
            let transport_state = match fetch(transport, &path).await {
                Some(body) => protocol::parse_transport(&protocol::split_fields(&body)),
                None => Default::default(),
            };
            let success = transport_state.success;
            (
                success,
                ResultPayload::Transport {
                    transport: transport_state,
                },
            )
        }
    }
}

async fn execute_connect(transport: &dyn TransportPort) -> (bool, ResultPayload) {
    match transport.connect().await {
        Ok(address) => {
            debug!(address = %address, "connect probe succeeded");
            (
                true,
                ResultPayload::Connect {
                    connected: true,
                    address,
                },
            )
        }
        Err(err) => {
            warn!(error = %err, "connect probe failed");
            (
                false,
                ResultPayload::Connect {
                    connected: false,
                    address: String::new(),
                },
            )
        }
    }
}

/// One request, body on 2xx, None otherwise. HTTP-level failure
/// short-circuits parsing entirely - no partial data is produced.
async fn fetch(transport: &dyn TransportPort, path: &str) -> Option<String> {
    match transport.request(path).await {
        Ok(response) if response.is_ok() => Some(response.body),
        Ok(response) => {
            warn!(status = response.status, path, "request rejected");
            None
        }
        Err(TransportError::Timeout) => {
            warn!(path, "request timed out");
            None
        }
        Err(err) => {
            warn!(error = %err, path, "request failed");
            None
        }
    }
}

/// Parse the three records a status-shaped batch produces: tabs extstate,
/// active-index extstate, transport line - in that order.
fn parse_status_batch(body: &str) -> (SetlistState, crate::domain::TransportState, bool) {
    let records = protocol::split_records(body);
    if records.len() < 3 {
        warn!(
            record_count = records.len(),
            "status batch too short, expected 3 records"
        );
        return Default::default();
    }

    let transport_state = protocol::parse_transport(&protocol::split_fields(records[2]));

    let mut setlist = SetlistState::default();
    if let Some(tab_json) = protocol::parse_keyed_field(
        &protocol::split_fields(records[0]),
        cmd::SETLIST_NAMESPACE,
        cmd::TABS_KEY,
    ) {
        setlist.tabs = protocol::parse_tab_list(tab_json);
    }
    if let Some(raw_index) = protocol::parse_keyed_field(
        &protocol::split_fields(records[1]),
        cmd::SETLIST_NAMESPACE,
        cmd::ACTIVE_INDEX_KEY,
    ) {
        match raw_index.parse::<u32>() {
            Ok(index) => setlist.active_index = index,
            Err(_) => warn!(raw = raw_index, "unparseable active index"),
        }
    }
    setlist.success = true;

    (setlist, transport_state, true)
}
