use serde::Deserialize;

use hibari_core::models::{FuzzyDate, MediaEntry, Profile, RelatedMedia, SearchResult, WatchStatus};

// ── GraphQL envelope ─────────────────────────────────────────────

/// Every AniList response: `data` on success, `errors` on GraphQL-level
/// failure (which can arrive alongside a 200).
#[derive(Debug, Deserialize)]
pub struct GraphQLEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLErrorItem>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLErrorItem {
    pub message: String,
}

// ── Viewer ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    #[serde(rename = "Viewer")]
    pub viewer: RawViewer,
}

#[derive(Debug, Deserialize)]
pub struct RawViewer {
    pub id: u64,
    pub name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<RawAvatar>,
}

#[derive(Debug, Deserialize)]
pub struct RawAvatar {
    pub large: Option<String>,
}

impl RawViewer {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            name: self.name.unwrap_or_default(),
            about: self.about.unwrap_or_default(),
            avatar_url: self.avatar.and_then(|a| a.large),
        }
    }
}

// ── Watch list ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaListCollectionData {
    #[serde(rename = "MediaListCollection")]
    pub collection: RawMediaListCollection,
}

#[derive(Debug, Deserialize)]
pub struct RawMediaListCollection {
    pub lists: Vec<RawMediaListGroup>,
}

#[derive(Debug, Deserialize)]
pub struct RawMediaListGroup {
    pub entries: Vec<RawListEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RawListEntry {
    pub status: Option<String>,
    pub score: Option<f64>,
    pub media: RawMedia,
}

impl RawListEntry {
    pub fn into_entry(self) -> MediaEntry {
        let status = self
            .status
            .as_deref()
            .and_then(WatchStatus::parse)
            .unwrap_or(WatchStatus::Current);
        let score = self.score.map(|s| s.round() as u32);
        self.media.into_entry(status, score)
    }
}

// ── Media ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SingleMediaData {
    #[serde(rename = "Media")]
    pub media: RawMedia,
}

#[derive(Debug, Deserialize)]
pub struct RawMedia {
    pub id: u64,
    pub title: Option<RawTitle>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<RawCoverImage>,
    pub status: Option<String>,
    #[serde(rename = "nextAiringEpisode")]
    pub next_airing_episode: Option<RawAiringEpisode>,
    pub relations: Option<RawRelationConnection>,
}

#[derive(Debug, Deserialize)]
pub struct RawTitle {
    pub romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCoverImage {
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAiringEpisode {
    #[serde(rename = "airingAt")]
    pub airing_at: Option<i64>,
    pub episode: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RawRelationConnection {
    pub edges: Vec<RawRelationEdge>,
}

#[derive(Debug, Deserialize)]
pub struct RawRelationEdge {
    #[serde(rename = "relationType")]
    pub relation_type: String,
    pub node: RawRelationNode,
}

#[derive(Debug, Deserialize)]
pub struct RawRelationNode {
    pub id: u64,
    pub title: Option<RawTitle>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<RawCoverImage>,
    pub format: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<FuzzyDate>,
    #[serde(rename = "nextAiringEpisode")]
    pub next_airing_episode: Option<RawAiringEpisode>,
}

fn title_of(title: Option<RawTitle>) -> String {
    title.and_then(|t| t.romaji).unwrap_or_default()
}

fn cover_of(cover: Option<RawCoverImage>) -> String {
    cover.and_then(|c| c.large).unwrap_or_default()
}

impl RawMedia {
    /// Fold into a domain entry, injecting each relation edge's label into
    /// the related record it produced.
    pub fn into_entry(self, status: WatchStatus, score: Option<u32>) -> MediaEntry {
        let airing = self.next_airing_episode;
        let related = self
            .relations
            .map(|conn| {
                conn.edges
                    .into_iter()
                    .map(|edge| edge.node.into_related(edge.relation_type))
                    .collect()
            })
            .unwrap_or_default();

        MediaEntry {
            id: self.id,
            title: title_of(self.title),
            cover_url: cover_of(self.cover_image),
            airing_status: self.status.unwrap_or_default(),
            status,
            next_airing_at: airing.as_ref().and_then(|a| a.airing_at),
            next_episode: airing.as_ref().and_then(|a| a.episode),
            score,
            related,
        }
    }
}

impl RawRelationNode {
    fn into_related(self, relation_type: String) -> RelatedMedia {
        RelatedMedia {
            id: self.id,
            title: title_of(self.title),
            cover_url: cover_of(self.cover_image),
            format: self.format,
            status: self.status,
            start_date: self.start_date,
            relation_type,
            next_airing_at: self.next_airing_episode.and_then(|a| a.airing_at),
        }
    }
}

// ── Search / trending ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: RawPage,
}

#[derive(Debug, Deserialize)]
pub struct RawPage {
    pub media: Vec<RawSearchMedia>,
}

#[derive(Debug, Deserialize)]
pub struct RawSearchMedia {
    pub id: u64,
    pub title: Option<RawTitle>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<RawCoverImage>,
    pub status: Option<String>,
}

impl RawSearchMedia {
    pub fn into_search_result(self) -> SearchResult {
        SearchResult {
            id: self.id,
            title: title_of(self.title),
            cover_url: cover_of(self.cover_image),
            status: self.status,
        }
    }
}

// ── Mutations / lookups ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveEntryData {
    #[serde(rename = "SaveMediaListEntry")]
    pub entry: SavedEntry,
}

#[derive(Debug, Deserialize)]
pub struct SavedEntry {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEntryData {
    #[serde(rename = "DeleteMediaListEntry")]
    pub result: DeletedEntry,
}

#[derive(Debug, Deserialize)]
pub struct DeletedEntry {
    pub deleted: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct EntryLookupData {
    #[serde(rename = "Media")]
    pub media: EntryLookupMedia,
}

#[derive(Debug, Deserialize)]
pub struct EntryLookupMedia {
    #[serde(rename = "mediaListEntry")]
    pub media_list_entry: Option<SavedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SaveUserData {
    #[serde(rename = "SaveUser")]
    pub user: RawSavedUser,
}

#[derive(Debug, Deserialize)]
pub struct RawSavedUser {
    pub id: u64,
    pub name: Option<String>,
    pub about: Option<String>,
}

impl RawSavedUser {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            name: self.name.unwrap_or_default(),
            about: self.about.unwrap_or_default(),
            avatar_url: None,
        }
    }
}
