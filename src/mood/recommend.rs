use anyhow::Result;
use rspotify::model::TimeRange;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::mood::parameters_for_label;
use crate::session::{Session, Track};

const SEED_POOL_SIZE: u32 = 5;
const SEED_COUNT: usize = 2;

pub const DEFAULT_LIMIT: u32 = 20;

/// Seeds a recommendation query from the user's listening history and
/// biases it toward the requested mood. Stateless: every call
/// re-queries the service.
pub struct Recommender<S: Session> {
    session: Arc<S>,
}

impl<S: Session> Recommender<S> {
    pub fn new(session: Arc<S>) -> Self {
        Recommender { session }
    }

    /// Returns recommended tracks for a mood label, or an empty list.
    /// A user with no listening history has nothing to seed with, and
    /// any service failure is logged and reported as "no results" —
    /// the caller never sees an error from this path.
    pub async fn tracks_for_mood(&self, mood_label: &str, limit: u32) -> Vec<Track> {
        match self.query(mood_label, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("recommendation query for {mood_label:?} failed: {e:#}");
                vec![]
            }
        }
    }

    async fn query(&self, mood_label: &str, limit: u32) -> Result<Vec<Track>> {
        let top = self
            .session
            .top_tracks(SEED_POOL_SIZE, TimeRange::MediumTerm)
            .await?;
        if top.is_empty() {
            debug!("no top tracks for current user, skipping recommendation query");
            return Ok(vec![]);
        }

        // First two in service order, not re-sorted
        let seeds: Vec<String> = top
            .into_iter()
            .take(SEED_COUNT)
            .map(|t| t.id)
            .collect();

        let params = parameters_for_label(mood_label);
        self.session.recommendations(&seeds, &params, limit).await
    }
}
