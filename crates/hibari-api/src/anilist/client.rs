use reqwest::Client;

use hibari_core::models::{MediaEntry, Profile, SearchResult, WatchStatus};

use super::error::AniListError;
use super::types::{
    DeleteEntryData, EntryLookupData, GraphQLEnvelope, MediaListCollectionData, PageData,
    SaveEntryData, SaveUserData, SingleMediaData, ViewerData,
};

const API_URL: &str = "https://graphql.anilist.co";

const VIEWER_QUERY: &str = r#"
query {
    Viewer {
        id
        name
        about
        avatar { large }
    }
}
"#;

const USER_LIST_QUERY: &str = r#"
query ($userId: Int) {
    MediaListCollection(userId: $userId, type: ANIME) {
        lists {
            entries {
                status
                score(format: POINT_100)
                media {
                    id
                    title { romaji }
                    coverImage { large }
                    status
                    nextAiringEpisode { airingAt episode }
                    relations {
                        edges {
                            relationType
                            node {
                                id
                                title { romaji }
                                coverImage { large }
                                format
                                status
                                startDate { year month day }
                                nextAiringEpisode { airingAt }
                            }
                        }
                    }
                }
            }
        }
    }
}
"#;

const SINGLE_MEDIA_QUERY: &str = r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        id
        title { romaji }
        coverImage { large }
        status
        nextAiringEpisode { airingAt episode }
        relations {
            edges {
                relationType
                node {
                    id
                    title { romaji }
                    coverImage { large }
                    format
                    status
                    startDate { year month day }
                    nextAiringEpisode { airingAt }
                }
            }
        }
    }
}
"#;

const SEARCH_QUERY: &str = r#"
query ($search: String, $perPage: Int) {
    Page(perPage: $perPage) {
        media(search: $search, type: ANIME) {
            id
            title { romaji }
            coverImage { large }
            status
        }
    }
}
"#;

const TRENDING_QUERY: &str = r#"
query ($perPage: Int) {
    Page(perPage: $perPage) {
        media(sort: TRENDING_DESC, type: ANIME) {
            id
            title { romaji }
            coverImage { large }
            status
        }
    }
}
"#;

const SAVE_ENTRY_MUTATION: &str = r#"
mutation ($mediaId: Int, $status: MediaListStatus, $score: Float, $progress: Int) {
    SaveMediaListEntry(mediaId: $mediaId, status: $status, score: $score, progress: $progress) {
        id
    }
}
"#;

const DELETE_ENTRY_MUTATION: &str = r#"
mutation ($id: Int) {
    DeleteMediaListEntry(id: $id) {
        deleted
    }
}
"#;

const ENTRY_LOOKUP_QUERY: &str = r#"
query ($mediaId: Int) {
    Media(id: $mediaId, type: ANIME) {
        mediaListEntry { id }
    }
}
"#;

const SAVE_USER_MUTATION: &str = r#"
mutation ($name: String, $about: String) {
    SaveUser(name: $name, about: $about) {
        id
        name
        about
    }
}
"#;

/// AniList GraphQL client.
///
/// Stateless beyond the HTTP connection pool: it never caches responses or
/// touches the watch list; callers apply results themselves. The bearer
/// token is optional — search and trending work unauthenticated.
pub struct AniListClient {
    http: Client,
    token: Option<String>,
}

impl AniListClient {
    /// Unauthenticated client (public queries only).
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            token: None,
        }
    }

    /// Authenticated client.
    pub fn with_token(token: String) -> Self {
        Self {
            http: Client::new(),
            token: Some(token),
        }
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let mut request = self
            .http
            .post(API_URL)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }));
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(AniListError::Api {
                status: status_code,
                message: body,
            });
        }

        let envelope: GraphQLEnvelope<T> = resp
            .json()
            .await
            .map_err(|e| AniListError::Parse(e.to_string()))?;

        if let Some(err) = envelope.errors.first() {
            tracing::warn!(operation, message = %err.message, "AniList GraphQL error");
            return Err(AniListError::Server(err.message.clone()));
        }

        envelope
            .data
            .ok_or_else(|| AniListError::Parse("response carried no data".into()))
    }

    /// Fetch the authenticated viewer's profile.
    pub async fn viewer(&self) -> Result<Profile, AniListError> {
        let data: ViewerData = self
            .graphql_request("Viewer", VIEWER_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.viewer.into_profile())
    }

    /// Fetch just the authenticated viewer's id.
    pub async fn viewer_id(&self) -> Result<u64, AniListError> {
        let data: ViewerData = self
            .graphql_request("Viewer", VIEWER_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.viewer.id)
    }

    /// Fetch the user's full anime list, flattened across list groups, with
    /// relation edges folded into each entry.
    pub async fn user_list(&self, user_id: u64) -> Result<Vec<MediaEntry>, AniListError> {
        let data: MediaListCollectionData = self
            .graphql_request(
                "UserList",
                USER_LIST_QUERY,
                serde_json::json!({ "userId": user_id }),
            )
            .await?;

        Ok(data
            .collection
            .lists
            .into_iter()
            .flat_map(|group| group.entries)
            .map(|entry| entry.into_entry())
            .collect())
    }

    /// Single-media lookup, used to refresh one entry after a mutation.
    /// The personal status defaults to Current until the next full list
    /// fetch says otherwise.
    pub async fn media(&self, id: u64) -> Result<MediaEntry, AniListError> {
        let data: SingleMediaData = self
            .graphql_request("GetMedia", SINGLE_MEDIA_QUERY, serde_json::json!({ "id": id }))
            .await?;
        Ok(data.media.into_entry(WatchStatus::Current, None))
    }

    /// Search the catalog by title.
    pub async fn search(&self, term: &str, limit: u32) -> Result<Vec<SearchResult>, AniListError> {
        let data: PageData = self
            .graphql_request(
                "Search",
                SEARCH_QUERY,
                serde_json::json!({ "search": term, "perPage": limit }),
            )
            .await?;
        Ok(data
            .page
            .media
            .into_iter()
            .map(|m| m.into_search_result())
            .collect())
    }

    /// Currently trending titles.
    pub async fn trending(&self, limit: u32) -> Result<Vec<SearchResult>, AniListError> {
        let data: PageData = self
            .graphql_request(
                "Trending",
                TRENDING_QUERY,
                serde_json::json!({ "perPage": limit }),
            )
            .await?;
        Ok(data
            .page
            .media
            .into_iter()
            .map(|m| m.into_search_result())
            .collect())
    }

    /// Create or update the list entry for a media. Returns the entry id.
    pub async fn save_entry(
        &self,
        media_id: u64,
        status: WatchStatus,
        score: Option<u32>,
        progress: Option<u32>,
    ) -> Result<u64, AniListError> {
        let vars = save_entry_variables(media_id, status, score, progress);
        let data: SaveEntryData = self
            .graphql_request("SaveEntry", SAVE_ENTRY_MUTATION, vars)
            .await?;
        Ok(data.entry.id)
    }

    /// Delete a list entry by its entry id (not the media id).
    pub async fn delete_entry(&self, entry_id: u64) -> Result<(), AniListError> {
        let _: DeleteEntryData = self
            .graphql_request(
                "DeleteEntry",
                DELETE_ENTRY_MUTATION,
                serde_json::json!({ "id": entry_id }),
            )
            .await?;
        Ok(())
    }

    /// Look up whether a media is already on the user's list; returns the
    /// entry id when it is. Absence is a plain `None`, never an error.
    pub async fn entry_exists(&self, media_id: u64) -> Result<Option<u64>, AniListError> {
        let data: EntryLookupData = self
            .graphql_request(
                "EntryLookup",
                ENTRY_LOOKUP_QUERY,
                serde_json::json!({ "mediaId": media_id }),
            )
            .await?;
        Ok(data.media.media_list_entry.map(|e| e.id))
    }

    /// Update the viewer's profile name/about.
    pub async fn save_user(&self, name: &str, about: &str) -> Result<Profile, AniListError> {
        let data: SaveUserData = self
            .graphql_request(
                "SaveUser",
                SAVE_USER_MUTATION,
                serde_json::json!({ "name": name, "about": about }),
            )
            .await?;
        Ok(data.user.into_profile())
    }
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build `SaveMediaListEntry` variables, leaving optional fields out
/// entirely — AniList treats an explicit null as "clear this field".
fn save_entry_variables(
    media_id: u64,
    status: WatchStatus,
    score: Option<u32>,
    progress: Option<u32>,
) -> serde_json::Value {
    let mut vars = serde_json::json!({
        "mediaId": media_id,
        "status": status.as_str(),
    });
    if let Some(score) = score {
        vars["score"] = serde_json::json!(score);
    }
    if let Some(progress) = progress {
        vars["progress"] = serde_json::json!(progress);
    }
    vars
}
