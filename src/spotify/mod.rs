use anyhow::Result;
use rspotify::{
    clients::{BaseClient, OAuthClient},
    scopes, AuthCodePkceSpotify, Config as SpotifyConfig, Credentials, OAuth,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;

pub mod auth;
pub mod session;

/// Builds the PKCE client. Returns the client and, when no cached
/// token could be reused, the authorize URL the user has to visit.
pub async fn build_spotify_client(
    config: &Config,
) -> Result<(Arc<Mutex<AuthCodePkceSpotify>>, Option<String>)> {
    let creds = Credentials::new_pkce(&config.client_id);

    let scopes = scopes!(
        "user-top-read",
        "user-read-private",
        "playlist-read-private",
        "playlist-read-collaborative",
        "playlist-modify-public"
    );

    let oauth = OAuth {
        redirect_uri: config.redirect_uri.clone(),
        scopes,
        ..Default::default()
    };

    let sp_config = SpotifyConfig {
        token_cached: true,
        token_refreshing: true,
        ..Default::default()
    };

    let mut spotify = AuthCodePkceSpotify::with_config(creds, oauth, sp_config);

    // Reuse the file-cached token if it still refreshes
    if let Ok(Some(token)) = spotify.read_token_cache(true).await {
        info!("Loaded cached token");
        *spotify.token.lock().await.unwrap() = Some(token);

        match spotify.refetch_token().await {
            Ok(_) => {
                let client = Arc::new(Mutex::new(spotify));
                return Ok((client, None));
            }
            Err(e) => {
                tracing::warn!("Failed to refresh cached token ({e}), re-authenticating");
                *spotify.token.lock().await.unwrap() = None;
            }
        }
    }

    let url = spotify.get_authorize_url(None)?;
    info!("Auth URL generated, opening browser...");

    Ok((Arc::new(Mutex::new(spotify)), Some(url)))
}

pub async fn complete_auth(spotify: Arc<Mutex<AuthCodePkceSpotify>>, code: &str) -> Result<()> {
    let sp = spotify.lock().await;
    sp.request_token(code).await?;
    sp.write_token_cache().await.ok();
    info!("Token saved to cache");
    Ok(())
}
