// REAPER web-remote command constants (wire-exact, do not edit casually)

/// Base path of the control endpoint.
pub const BASE_PATH: &str = "/_";

// Transport commands
pub const TRANSPORT: &str = "TRANSPORT";
pub const PLAY: &str = "1007";
pub const STOP: &str = "1016";

// Tab navigation commands
pub const NEXT_TAB: &str = "40861";
pub const PREVIOUS_TAB: &str = "40862";

// ReaperSetlist commands
pub const GET_SESSION_TOKEN: &str = "GET/EXTSTATE/ReaperSetlist/ScriptActionId";
pub const SET_OPERATION_GET_OPEN_TABS: &str = "SET/EXTSTATE/ReaperSetlist/Operation/getOpenTabs";
pub const GET_TABS: &str = "GET/EXTSTATE/ReaperSetlist/tabs";
pub const GET_ACTIVE_INDEX: &str = "GET/EXTSTATE/ReaperSetlist/activeIndex";

// Response tags / key paths
pub const EXTSTATE_TAG: &str = "EXTSTATE";
pub const SETLIST_NAMESPACE: &str = "ReaperSetlist";
pub const SESSION_TOKEN_KEY: &str = "ScriptActionId";
pub const TABS_KEY: &str = "tabs";
pub const ACTIVE_INDEX_KEY: &str = "activeIndex";
