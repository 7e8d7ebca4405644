use clap::{Parser, Subcommand};

use hibari_api::anilist::auth;
use hibari_api::session::HttpExchange;
use hibari_api::{AniListClient, OAuthSession};
use hibari_core::config::AppConfig;
use hibari_core::models::{MediaEntry, SearchResult};
use hibari_core::{reminders, TokenStore, WatchList};

type Error = Box<dyn std::error::Error>;

#[derive(Parser)]
#[command(name = "hibari")]
#[command(about = "Track your anime watch list on AniList from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to AniList via the browser
    Login,
    /// Forget the stored credential
    Logout,
    /// Show the logged-in profile
    Whoami,
    /// Show your watch list
    List {
        /// Personal status to filter by (CURRENT, COMPLETED, PAUSED,
        /// DROPPED, PLANNING, or ALL)
        #[arg(long, default_value = "ALL")]
        status: String,
        /// Only titles currently airing
        #[arg(long, conflicts_with = "status")]
        ongoing: bool,
    },
    /// Search the catalog by title
    Search {
        term: String,
    },
    /// Show currently trending titles
    Trending,
    /// Add a title to your list (or update its entry)
    Add {
        media_id: u64,
        #[arg(long, default_value = "PLANNING")]
        status: String,
        #[arg(long)]
        score: Option<u32>,
        #[arg(long)]
        progress: Option<u32>,
    },
    /// Remove a title from your list
    Remove {
        media_id: u64,
    },
    /// Recommend sequels of listed titles you haven't added yet
    Sequels {
        /// Finished sequels instead of airing/announced ones
        #[arg(long)]
        finished: bool,
    },
    /// Show pending episode-airing reminders
    Reminders,
    /// Update profile name and about text
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        about: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hibari=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let store = TokenStore::open(&AppConfig::ensure_db_path()?)?;
    let session = OAuthSession::open(store, config.anilist.clone());

    match cli.command {
        Commands::Login => login(&session, &config).await,
        Commands::Logout => {
            session.logout();
            println!("Logged out.");
            Ok(())
        }
        Commands::Whoami => whoami(&session).await,
        Commands::List { status, ongoing } => list(&session, &status, ongoing).await,
        Commands::Search { term } => search(&config, &term).await,
        Commands::Trending => trending(&config).await,
        Commands::Add {
            media_id,
            status,
            score,
            progress,
        } => add(&session, media_id, &status, score, progress).await,
        Commands::Remove { media_id } => remove(&session, media_id).await,
        Commands::Sequels { finished } => sequels(&session, finished).await,
        Commands::Reminders => show_reminders(&session).await,
        Commands::Profile { name, about } => profile(&session, name, about).await,
    }
}

fn authed_client(session: &OAuthSession<HttpExchange>) -> Result<AniListClient, Error> {
    match session.token() {
        Some(token) => Ok(AniListClient::with_token(token)),
        None => Err("not logged in; run `hibari login` first".into()),
    }
}

/// Full list fetch into a fresh aggregator.
async fn fetch_list(session: &OAuthSession<HttpExchange>) -> Result<WatchList, Error> {
    let client = authed_client(session)?;
    let user_id = client.viewer_id().await?;
    let entries = client.user_list(user_id).await?;
    tracing::debug!(count = entries.len(), "fetched user list");
    let mut list = WatchList::new();
    list.replace_all(entries);
    Ok(list)
}

async fn login(session: &OAuthSession<HttpExchange>, config: &AppConfig) -> Result<(), Error> {
    if config.anilist.client_id.is_empty() {
        return Err(format!(
            "no AniList client id configured; edit {}",
            AppConfig::config_path().display()
        )
        .into());
    }

    session.start_login()?;
    let redirect = auth::listen_for_redirect(&config.anilist)?;
    session.handle_redirect(&redirect).await?;

    match session.token() {
        Some(_) => {
            let profile = authed_client(session)?.viewer().await?;
            println!("Logged in as {} (id {}).", profile.name, profile.id);
            Ok(())
        }
        None => Err("login did not produce a credential".into()),
    }
}

async fn whoami(session: &OAuthSession<HttpExchange>) -> Result<(), Error> {
    let profile = authed_client(session)?.viewer().await?;
    println!("{} (id {})", profile.name, profile.id);
    if !profile.about.is_empty() {
        println!("{}", profile.about);
    }
    Ok(())
}

async fn list(
    session: &OAuthSession<HttpExchange>,
    status: &str,
    ongoing: bool,
) -> Result<(), Error> {
    let list = fetch_list(session).await?;
    let entries = if ongoing {
        list.ongoing()
    } else {
        list.filter_by_status(status)
    };

    if entries.is_empty() {
        println!("No entries.");
        return Ok(());
    }
    for entry in &entries {
        print_entry(entry);
    }
    Ok(())
}

async fn search(config: &AppConfig, term: &str) -> Result<(), Error> {
    let client = AniListClient::new();
    let results = client.search(term, config.search.per_page).await?;
    print_results(&results);
    Ok(())
}

async fn trending(config: &AppConfig) -> Result<(), Error> {
    let client = AniListClient::new();
    let results = client.trending(config.search.per_page).await?;
    print_results(&results);
    Ok(())
}

async fn add(
    session: &OAuthSession<HttpExchange>,
    media_id: u64,
    status: &str,
    score: Option<u32>,
    progress: Option<u32>,
) -> Result<(), Error> {
    let parsed = hibari_core::models::WatchStatus::parse(status)
        .ok_or_else(|| format!("unknown status: {status}"))?;

    let client = authed_client(session)?;
    client.save_entry(media_id, parsed, score, progress).await?;

    // Refresh the single entry the way the list screen would.
    let mut list = fetch_list(session).await?;
    let fresh = client.media(media_id).await?;
    list.upsert(fresh.clone());
    println!("Saved:");
    print_entry(&fresh);
    Ok(())
}

async fn remove(session: &OAuthSession<HttpExchange>, media_id: u64) -> Result<(), Error> {
    let client = authed_client(session)?;
    match client.entry_exists(media_id).await? {
        Some(entry_id) => {
            client.delete_entry(entry_id).await?;
            let mut list = fetch_list(session).await?;
            list.remove(media_id);
            println!("Removed media {media_id} from your list.");
        }
        None => println!("Media {media_id} is not on your list."),
    }
    Ok(())
}

async fn sequels(session: &OAuthSession<HttpExchange>, finished: bool) -> Result<(), Error> {
    let list = fetch_list(session).await?;
    let results = if finished {
        list.finished_sequels()
    } else {
        list.upcoming_sequels()
    };

    if results.is_empty() {
        println!("No sequel recommendations.");
        return Ok(());
    }
    print_results(&results);
    Ok(())
}

async fn show_reminders(session: &OAuthSession<HttpExchange>) -> Result<(), Error> {
    let list = fetch_list(session).await?;
    let pending = reminders::for_list(list.entries(), chrono::Utc::now());

    if pending.is_empty() {
        println!("Nothing airing soon.");
        return Ok(());
    }
    for reminder in &pending {
        println!("{}  {}", reminder.at.format("%Y-%m-%d %H:%M UTC"), reminder.message);
    }
    Ok(())
}

async fn profile(
    session: &OAuthSession<HttpExchange>,
    name: Option<String>,
    about: Option<String>,
) -> Result<(), Error> {
    let client = authed_client(session)?;
    let current = client.viewer().await?;
    let updated = client
        .save_user(
            name.as_deref().unwrap_or(&current.name),
            about.as_deref().unwrap_or(&current.about),
        )
        .await?;
    println!("Profile updated: {} (id {})", updated.name, updated.id);
    Ok(())
}

fn print_entry(entry: &MediaEntry) {
    let airing = entry
        .next_airing_at
        .map(|ts| format!("  next ep {} at {ts}", entry.next_episode.unwrap_or(0)))
        .unwrap_or_default();
    println!(
        "{:>8}  [{}] {} ({}){airing}",
        entry.id, entry.status, entry.title, entry.airing_status
    );
}

fn print_results(results: &[SearchResult]) {
    for r in results {
        let status = r.status.as_deref().unwrap_or("UNKNOWN");
        println!("{:>8}  {} ({status})", r.id, r.title);
    }
}
