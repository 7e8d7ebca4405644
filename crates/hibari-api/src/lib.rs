pub mod anilist;
pub mod session;

pub use anilist::{AniListClient, AniListError};
pub use session::{OAuthSession, SessionState, TokenExchange};
