use serde::{Deserialize, Serialize};

use super::WatchStatus;

/// One title in the user's watch list with its personal tracking state.
///
/// Identity is the AniList media id; the [`crate::WatchList`] holds at most
/// one entry per id. The catalog-wide airing status is kept as the raw
/// uppercase API string (`RELEASING`, `FINISHED`, `NOT_YET_RELEASED`,
/// `CANCELLED`, `HIATUS`, or whatever the service sends) and compared
/// case-insensitively everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: u64,
    pub title: String,
    pub cover_url: String,
    pub airing_status: String,
    pub status: WatchStatus,
    /// Unix seconds of the next episode's airing, if the service knows it.
    pub next_airing_at: Option<i64>,
    pub next_episode: Option<u32>,
    pub score: Option<u32>,
    pub related: Vec<RelatedMedia>,
}

impl MediaEntry {
    pub fn is_releasing(&self) -> bool {
        self.airing_status.eq_ignore_ascii_case("RELEASING")
    }
}

/// A lightweight reference to another title reachable from an entry's
/// relation edges.
///
/// `relation_type` is a property of the edge that produced this record, not
/// of the referenced title: the same title may be a `SEQUEL` seen from one
/// entry and something else from another. Conflicting labels are never
/// merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedMedia {
    pub id: u64,
    pub title: String,
    pub cover_url: String,
    pub format: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<FuzzyDate>,
    pub relation_type: String,
    pub next_airing_at: Option<i64>,
}

impl RelatedMedia {
    pub fn is_sequel(&self) -> bool {
        self.relation_type == "SEQUEL"
    }

    fn status_is(&self, wanted: &str) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(wanted))
    }

    /// Sequel that is airing now or announced but not yet out.
    pub fn is_upcoming_sequel(&self) -> bool {
        self.is_sequel() && (self.status_is("RELEASING") || self.status_is("NOT_YET_RELEASED"))
    }

    /// Sequel that has finished airing.
    pub fn is_finished_sequel(&self) -> bool {
        self.is_sequel() && self.status_is("FINISHED")
    }
}

/// A catalog hit not yet tied to any list membership. Also the shape the
/// sequel derivations produce, hence the `Eq + Hash` for dedup by full
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    pub cover_url: String,
    pub status: Option<String>,
}

impl From<&RelatedMedia> for SearchResult {
    fn from(related: &RelatedMedia) -> Self {
        Self {
            id: related.id,
            title: related.title.clone(),
            cover_url: related.cover_url.clone(),
            status: related.status.clone(),
        }
    }
}

/// AniList partial date; any component may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// `YYYY-MM-DD` with missing month/day defaulting to 1; `None` without
    /// a year.
    pub fn to_string_opt(&self) -> Option<String> {
        let y = self.year?;
        let m = self.month.unwrap_or(1);
        let d = self.day.unwrap_or(1);
        Some(format!("{y:04}-{m:02}-{d:02}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn related(relation_type: &str, status: Option<&str>) -> RelatedMedia {
        RelatedMedia {
            id: 99,
            title: "Sequel Title".into(),
            cover_url: "https://img.example/99.png".into(),
            format: Some("TV".into()),
            status: status.map(Into::into),
            start_date: None,
            relation_type: relation_type.into(),
            next_airing_at: None,
        }
    }

    #[test]
    fn sequel_classification_is_case_insensitive_on_status() {
        assert!(related("SEQUEL", Some("releasing")).is_upcoming_sequel());
        assert!(related("SEQUEL", Some("Not_Yet_Released")).is_upcoming_sequel());
        assert!(related("SEQUEL", Some("finished")).is_finished_sequel());
        assert!(!related("SEQUEL", Some("FINISHED")).is_upcoming_sequel());
        assert!(!related("SEQUEL", None).is_upcoming_sequel());
    }

    #[test]
    fn prequel_is_never_a_sequel() {
        assert!(!related("PREQUEL", Some("RELEASING")).is_upcoming_sequel());
        assert!(!related("PREQUEL", Some("FINISHED")).is_finished_sequel());
    }

    #[test]
    fn relation_type_match_is_exact() {
        // Only the exact edge label counts; lowercase comes from nowhere
        // in the API but must not sneak through.
        assert!(!related("sequel", Some("RELEASING")).is_upcoming_sequel());
    }

    #[test]
    fn fuzzy_date_formats_with_defaults() {
        let d = FuzzyDate {
            year: Some(2024),
            month: None,
            day: None,
        };
        assert_eq!(d.to_string_opt(), Some("2024-01-01".into()));
        let none = FuzzyDate {
            year: None,
            month: Some(4),
            day: Some(2),
        };
        assert_eq!(none.to_string_opt(), None);
    }
}
