use serde::{Deserialize, Serialize};

/// The authenticated AniList viewer's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub about: String,
    pub avatar_url: Option<String>,
}
