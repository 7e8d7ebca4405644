//! Derivation of local airing reminders.
//!
//! For every entry with a known next-airing time the app wants two nudges:
//! one an hour before the episode and one when it airs. Delivery belongs to
//! the platform; this module only computes which reminders are still worth
//! scheduling.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::MediaEntry;

/// A single reminder request handed to the platform notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Stable identifier, `{media_id}-1hr` or `{media_id}-airing`, so a
    /// re-schedule replaces rather than duplicates.
    pub key: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Reminders for one entry, keeping only instants still in the future.
/// Entries without a known airing time produce nothing.
pub fn for_entry(entry: &MediaEntry, now: DateTime<Utc>) -> Vec<Reminder> {
    let Some(airing_ts) = entry.next_airing_at else {
        return Vec::new();
    };
    let Some(airing_at) = Utc.timestamp_opt(airing_ts, 0).single() else {
        return Vec::new();
    };

    let episode = entry.next_episode.unwrap_or(0);
    let title = format!("{} Episode {}", entry.title, episode);
    let one_hour_before = airing_at - Duration::hours(1);

    let mut reminders = Vec::new();
    if one_hour_before > now {
        reminders.push(Reminder {
            key: format!("{}-1hr", entry.id),
            message: format!("{title} airs in 1 hour!"),
            at: one_hour_before,
        });
    }
    if airing_at > now {
        reminders.push(Reminder {
            key: format!("{}-airing", entry.id),
            message: format!("{title} is airing now!"),
            at: airing_at,
        });
    }
    reminders
}

/// Reminders across a whole list snapshot.
pub fn for_list(entries: &[MediaEntry], now: DateTime<Utc>) -> Vec<Reminder> {
    entries.iter().flat_map(|e| for_entry(e, now)).collect()
}
