mod media;
mod status;
mod user;

pub use media::{FuzzyDate, MediaEntry, RelatedMedia, SearchResult};
pub use status::{ListFilter, WatchStatus};
pub use user::Profile;
