use anyhow::Result;
use async_trait::async_trait;
use rspotify::model::TimeRange;

use crate::mood::MoodParameters;

/// The slice of the streaming service this app reads and writes.
/// Kept as a trait so the workflow takes an explicit session handle
/// and tests can substitute a recording fake.
#[async_trait]
pub trait Session: Send + Sync {
    async fn current_user(&self) -> Result<UserProfile>;

    async fn top_tracks(&self, limit: u32, time_range: TimeRange) -> Result<Vec<Track>>;

    /// Single recommendation query. Empty `params` means no target
    /// constraints — the service falls back to its defaults.
    async fn recommendations(
        &self,
        seed_track_ids: &[String],
        params: &MoodParameters,
        limit: u32,
    ) -> Result<Vec<Track>>;

    /// Returns the new playlist's id.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<String>;

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    async fn user_playlists(&self, limit: u32) -> Result<Vec<Playlist>>;

    async fn playlist_tracks(&self, playlist_id: &str, limit: u32) -> Result<Vec<Track>>;
}

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

/// A track as this app sees it: an opaque id plus display fields.
/// Never mutated, only read and re-used as a seed or playlist entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks_total: u32,
}
