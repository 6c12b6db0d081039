use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use rspotify::{
    model::{
        ArtistId, FullTrack, PlayableItem, PlaylistId, RecommendationsAttribute, SimplifiedTrack,
        TimeRange, TrackId, UserId,
    },
    prelude::*,
    AuthCodePkceSpotify,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::mood::MoodParameters;
use crate::session::{Playlist, Session, Track, UserProfile};

/// `Session` backed by the real Spotify Web API.
pub struct SpotifySession {
    spotify: Arc<Mutex<AuthCodePkceSpotify>>,
}

impl SpotifySession {
    pub fn new(spotify: Arc<Mutex<AuthCodePkceSpotify>>) -> Self {
        SpotifySession { spotify }
    }
}

fn attributes(params: &MoodParameters) -> Vec<RecommendationsAttribute> {
    let mut attrs = Vec::new();
    if let Some(v) = params.valence {
        attrs.push(RecommendationsAttribute::TargetValence(v));
    }
    if let Some(e) = params.energy {
        attrs.push(RecommendationsAttribute::TargetEnergy(e));
    }
    if let Some(i) = params.instrumentalness {
        attrs.push(RecommendationsAttribute::TargetInstrumentalness(i));
    }
    attrs
}

fn from_full_track(track: FullTrack) -> Option<Track> {
    // Local files have no id and can't be used as seeds or added by id
    let id = track.id?;
    Some(Track {
        id: id.id().to_string(),
        name: track.name,
        artist: track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
    })
}

fn from_simplified_track(track: SimplifiedTrack) -> Option<Track> {
    let id = track.id?;
    Some(Track {
        id: id.id().to_string(),
        name: track.name,
        artist: track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
    })
}

#[async_trait]
impl Session for SpotifySession {
    async fn current_user(&self) -> Result<UserProfile> {
        let sp = self.spotify.lock().await;
        let user = sp.me().await.context("fetching current user")?;
        Ok(UserProfile {
            id: user.id.id().to_string(),
            display_name: user.display_name,
        })
    }

    async fn top_tracks(&self, limit: u32, time_range: TimeRange) -> Result<Vec<Track>> {
        let sp = self.spotify.lock().await;
        let page = sp
            .current_user_top_tracks_manual(Some(time_range), Some(limit), Some(0))
            .await
            .context("fetching top tracks")?;
        Ok(page.items.into_iter().filter_map(from_full_track).collect())
    }

    async fn recommendations(
        &self,
        seed_track_ids: &[String],
        params: &MoodParameters,
        limit: u32,
    ) -> Result<Vec<Track>> {
        let sp = self.spotify.lock().await;
        let seeds = seed_track_ids
            .iter()
            .map(|id| TrackId::from_id(id.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .context("parsing seed track ids")?;
        let recs = sp
            .recommendations(
                attributes(params),
                None::<Vec<ArtistId>>,
                None::<Vec<&str>>,
                Some(seeds),
                None,
                Some(limit),
            )
            .await
            .context("fetching recommendations")?;
        Ok(recs
            .tracks
            .into_iter()
            .filter_map(from_simplified_track)
            .collect())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<String> {
        let sp = self.spotify.lock().await;
        let uid = UserId::from_id(user_id).context("parsing user id")?;
        let playlist = sp
            .user_playlist_create(uid, name, Some(public), Some(false), Some(description))
            .await
            .context("creating playlist")?;
        Ok(playlist.id.id().to_string())
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let sp = self.spotify.lock().await;
        let pid = PlaylistId::from_id(playlist_id).context("parsing playlist id")?;
        let items = track_ids
            .iter()
            .map(|id| TrackId::from_id(id.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .context("parsing track ids")?;
        sp.playlist_add_items(pid, items.into_iter().map(PlayableId::Track), None)
            .await
            .context("adding tracks to playlist")?;
        Ok(())
    }

    async fn user_playlists(&self, limit: u32) -> Result<Vec<Playlist>> {
        let sp = self.spotify.lock().await;
        let playlists: Vec<_> = sp
            .current_user_playlists()
            .take(limit as usize)
            .try_collect()
            .await
            .context("fetching user playlists")?;
        Ok(playlists
            .into_iter()
            .map(|p| Playlist {
                id: p.id.id().to_string(),
                name: p.name,
                tracks_total: p.tracks.total,
            })
            .collect())
    }

    async fn playlist_tracks(&self, playlist_id: &str, limit: u32) -> Result<Vec<Track>> {
        let sp = self.spotify.lock().await;
        let pid = PlaylistId::from_id(playlist_id).context("parsing playlist id")?;
        let items: Vec<_> = sp
            .playlist_items(pid, None, None)
            .take(limit as usize)
            .try_collect()
            .await
            .context("fetching playlist tracks")?;
        Ok(items
            .into_iter()
            .filter_map(|item| match item.track {
                Some(PlayableItem::Track(t)) => from_full_track(t),
                _ => None,
            })
            .collect())
    }
}
