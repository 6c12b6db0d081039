mod config;
mod mood;
mod session;
mod spotify;
#[cfg(test)]
mod tests;

use anyhow::Result;
use std::str::FromStr;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::Config,
    mood::{
        playlist::{PlaylistManager, DEFAULT_PLAYLIST_LIMIT, DEFAULT_TRACK_LIMIT},
        recommend::{Recommender, DEFAULT_LIMIT},
        Mood,
    },
    session::{Session, Track},
    spotify::session::SpotifySession,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("moodysongs=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load()?;

    // ── Authenticate ─────────────────────────────────────────────────────────
    let (client, auth_url) = spotify::build_spotify_client(&config).await?;
    if let Some(url) = auth_url {
        println!("Opening browser for Spotify login...");
        if open::that(&url).is_err() {
            println!("Could not open a browser. Visit this URL manually:\n{url}");
        }
        let auth = spotify::auth::wait_for_auth_code(&config.redirect_uri).await?;
        spotify::complete_auth(client.clone(), &auth.code).await?;
    }

    let session = Arc::new(SpotifySession::new(client));

    let result = run(session).await;
    if let Err(e) = &result {
        error!("App error: {e:?}");
        eprintln!("\n\x1b[31mmoodysongs failed:\x1b[0m {e}");
    }
    result
}

async fn run<S: Session>(session: Arc<S>) -> Result<()> {
    match session.current_user().await {
        Ok(user) => {
            let name = user.display_name.unwrap_or(user.id);
            println!("Logged in as {name}.\n");
        }
        Err(e) => error!("Could not fetch profile: {e:#}"),
    }

    let recommender = Recommender::new(session.clone());
    let playlists = PlaylistManager::new(session.clone()).await;

    let moods: Vec<String> = Mood::iter().map(|m| m.to_string()).collect();
    println!("Type a mood ({}) for recommendations,", moods.join(", "));
    println!("'playlists' to list your playlists, 'show <id>' to inspect one, or 'q' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "q" | "quit" => break,
            "playlists" => {
                for p in playlists.user_playlists(DEFAULT_PLAYLIST_LIMIT).await {
                    println!("  {}  {} ({} tracks)", p.id, p.name, p.tracks_total);
                }
            }
            _ if input.starts_with("show ") => {
                let id = input["show ".len()..].trim();
                let tracks = playlists.playlist_tracks(id, DEFAULT_TRACK_LIMIT).await;
                if tracks.is_empty() {
                    println!("No tracks found.");
                } else {
                    print_tracks(&tracks);
                }
            }
            label => {
                let tracks = recommender.tracks_for_mood(label, DEFAULT_LIMIT).await;
                if tracks.is_empty() {
                    println!("No recommendations found for this mood.");
                    continue;
                }
                print_tracks(&tracks);

                // Only parseable moods can name a playlist
                let Ok(mood) = Mood::from_str(label) else {
                    continue;
                };
                prompt(&format!("Create {mood} Playlist from these tracks? [y/N] ")).await?;
                let Some(answer) = lines.next_line().await? else {
                    break;
                };
                if answer.trim().eq_ignore_ascii_case("y") {
                    let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
                    match playlists.create_mood_playlist(mood, &ids).await {
                        Ok(id) => println!("Created playlist {id}"),
                        Err(e) => println!("{e}"),
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_tracks(tracks: &[Track]) {
    for (i, track) in tracks.iter().enumerate() {
        println!("  {:2}. {} - {}", i + 1, track.name, track.artist);
    }
}

async fn prompt(text: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
