// Setlist Domain Model - open project tabs on the DAW side

/// One open project tab, as reported by the ReaperSetlist script.
#[derive(Debug, Clone, PartialEq)]
pub struct TabInfo {
    /// Project length in seconds.
    pub length_seconds: f64,
    /// Display name with any `.rpp`/`.RPP` suffix already stripped.
    pub name: String,
    /// Server-reported tab index.
    pub index: u32,
}

/// Ordered tab list plus the active tab index.
///
/// Order is the server-reported order; the list is never reindexed locally.
/// `active_index` may be out of bounds when `tabs` is empty - callers must
/// bounds-check before indexing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetlistState {
    pub tabs: Vec<TabInfo>,
    pub active_index: u32,
    pub success: bool,
}

impl SetlistState {
    /// The active tab, if the index currently points inside the list.
    pub fn active_tab(&self) -> Option<&TabInfo> {
        self.tabs.get(self.active_index as usize)
    }
}

/// Opaque identifier of the ReaperSetlist control script on the DAW.
///
/// Empty means "not yet acquired". Once acquired the token is cached; it is
/// only replaced when a later fetch returns a different non-empty value,
/// never invalidated by a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_acquired(&self) -> bool {
        !self.0.is_empty()
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
