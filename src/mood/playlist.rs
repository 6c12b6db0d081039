use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::mood::Mood;
use crate::session::{Playlist, Session, Track};

pub const DEFAULT_PLAYLIST_LIMIT: u32 = 50;
pub const DEFAULT_TRACK_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Precondition failure: no external call was made.
    #[error("Missing required data: {0}")]
    MissingData(&'static str),
    #[error("Failed to create playlist: {source:#}")]
    Create {
        #[source]
        source: anyhow::Error,
    },
    /// The playlist exists but is empty or partially filled; it is
    /// not deleted on this failure.
    #[error("Playlist {playlist_id} created, but adding tracks failed: {source:#}")]
    AddTracks {
        playlist_id: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Turns a chosen set of track ids into a named playlist on the
/// service, and exposes the read side of the user's playlists.
pub struct PlaylistManager<S: Session> {
    session: Arc<S>,
    user_id: Option<String>,
}

impl<S: Session> PlaylistManager<S> {
    /// Resolves the current user up front. If that fails the manager
    /// still constructs, but playlist creation will refuse to run.
    pub async fn new(session: Arc<S>) -> Self {
        let user_id = match session.current_user().await {
            Ok(user) => Some(user.id),
            Err(e) => {
                warn!("could not resolve current user: {e:#}");
                None
            }
        };
        PlaylistManager { session, user_id }
    }

    /// Creates a public "{Mood} Playlist" owned by the current user and
    /// fills it with the given tracks, in order. Creation and
    /// population are two service calls with no atomicity between
    /// them: if the second fails the playlist is left behind.
    pub async fn create_mood_playlist(
        &self,
        mood: Mood,
        track_ids: &[String],
    ) -> Result<String, PlaylistError> {
        let user_id = self
            .user_id
            .as_deref()
            .ok_or(PlaylistError::MissingData("no current user"))?;
        if track_ids.is_empty() {
            return Err(PlaylistError::MissingData("no tracks selected"));
        }

        let name = format!("{mood} Playlist");
        let description = format!("Generated {mood} playlist from MoodySongs App");
        let playlist_id = self
            .session
            .create_playlist(user_id, &name, true, &description)
            .await
            .map_err(|source| PlaylistError::Create { source })?;

        self.session
            .add_tracks(&playlist_id, track_ids)
            .await
            .map_err(|source| PlaylistError::AddTracks {
                playlist_id: playlist_id.clone(),
                source,
            })?;

        info!("created playlist {name:?} ({playlist_id}) with {} tracks", track_ids.len());
        Ok(playlist_id)
    }

    /// Current user's playlists; a service failure reads as "none".
    pub async fn user_playlists(&self, limit: u32) -> Vec<Playlist> {
        match self.session.user_playlists(limit).await {
            Ok(playlists) => playlists,
            Err(e) => {
                warn!("failed to fetch user playlists: {e:#}");
                vec![]
            }
        }
    }

    pub async fn playlist_tracks(&self, playlist_id: &str, limit: u32) -> Vec<Track> {
        match self.session.playlist_tracks(playlist_id, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("failed to fetch tracks of playlist {playlist_id}: {e:#}");
                vec![]
            }
        }
    }
}
