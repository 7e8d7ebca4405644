use serde::{Deserialize, Serialize};

/// User's personal status for a list entry, in AniList's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchStatus {
    Current,
    Completed,
    Paused,
    Dropped,
    Planning,
}

impl WatchStatus {
    /// AniList wire form (`MediaListStatus`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "CURRENT",
            Self::Completed => "COMPLETED",
            Self::Paused => "PAUSED",
            Self::Dropped => "DROPPED",
            Self::Planning => "PLANNING",
        }
    }

    /// Case-insensitive parse. `REPEATING` folds into `Current` since the
    /// list model has no separate rewatch state.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CURRENT" | "REPEATING" => Some(Self::Current),
            "COMPLETED" => Some(Self::Completed),
            "PAUSED" => Some(Self::Paused),
            "DROPPED" => Some(Self::Dropped),
            "PLANNING" => Some(Self::Planning),
            _ => None,
        }
    }

    pub const ALL: &[WatchStatus] = &[
        Self::Current,
        Self::Completed,
        Self::Paused,
        Self::Dropped,
        Self::Planning,
    ];
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A list-view filter: either a single personal status or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Status(WatchStatus),
}

impl ListFilter {
    /// Case-insensitive parse; `"ALL"` selects everything, anything else
    /// must name a known status.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ALL") {
            return Some(Self::All);
        }
        WatchStatus::parse(s).map(Self::Status)
    }

    pub fn matches(&self, status: WatchStatus) -> bool {
        match self {
            Self::All => true,
            Self::Status(wanted) => *wanted == status,
        }
    }
}
