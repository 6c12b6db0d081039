#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use rspotify::model::TimeRange;
    use strum::IntoEnumIterator;

    use crate::mood::playlist::{PlaylistError, PlaylistManager};
    use crate::mood::recommend::Recommender;
    use crate::mood::{parameters_for_label, Mood, MoodParameters};
    use crate::session::{Playlist, Session, Track, UserProfile};

    // ── Fake session ─────────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    struct CreatedPlaylist {
        user_id: String,
        name: String,
        public: bool,
        description: String,
    }

    #[derive(Default)]
    struct CallLog {
        top_tracks: Vec<u32>,
        recommendations: Vec<(Vec<String>, MoodParameters, u32)>,
        created: Vec<CreatedPlaylist>,
        added: Vec<(String, Vec<String>)>,
    }

    #[derive(Default)]
    struct FakeSession {
        user: Option<UserProfile>,
        top: Vec<Track>,
        recommended: Vec<Track>,
        fail_top_tracks: bool,
        fail_create: bool,
        fail_add: bool,
        fail_reads: bool,
        calls: Mutex<CallLog>,
    }

    impl FakeSession {
        fn with_user() -> Self {
            FakeSession {
                user: Some(UserProfile {
                    id: "user-1".into(),
                    display_name: Some("Tester".into()),
                }),
                ..Default::default()
            }
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            name: format!("Track {id}"),
            artist: "Some Artist".into(),
        }
    }

    #[async_trait]
    impl Session for FakeSession {
        async fn current_user(&self) -> Result<UserProfile> {
            self.user.clone().ok_or_else(|| anyhow!("no session"))
        }

        async fn top_tracks(&self, limit: u32, _time_range: TimeRange) -> Result<Vec<Track>> {
            self.calls.lock().unwrap().top_tracks.push(limit);
            if self.fail_top_tracks {
                return Err(anyhow!("service unavailable"));
            }
            Ok(self.top.clone())
        }

        async fn recommendations(
            &self,
            seed_track_ids: &[String],
            params: &MoodParameters,
            limit: u32,
        ) -> Result<Vec<Track>> {
            self.calls.lock().unwrap().recommendations.push((
                seed_track_ids.to_vec(),
                *params,
                limit,
            ));
            Ok(self.recommended.clone())
        }

        async fn create_playlist(
            &self,
            user_id: &str,
            name: &str,
            public: bool,
            description: &str,
        ) -> Result<String> {
            if self.fail_create {
                return Err(anyhow!("create rejected"));
            }
            self.calls.lock().unwrap().created.push(CreatedPlaylist {
                user_id: user_id.into(),
                name: name.into(),
                public,
                description: description.into(),
            });
            Ok("playlist-1".into())
        }

        async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
            if self.fail_add {
                return Err(anyhow!("add rejected"));
            }
            self.calls
                .lock()
                .unwrap()
                .added
                .push((playlist_id.into(), track_ids.to_vec()));
            Ok(())
        }

        async fn user_playlists(&self, _limit: u32) -> Result<Vec<Playlist>> {
            if self.fail_reads {
                return Err(anyhow!("service unavailable"));
            }
            Ok(vec![Playlist {
                id: "playlist-1".into(),
                name: "Chill Playlist".into(),
                tracks_total: 3,
            }])
        }

        async fn playlist_tracks(&self, _playlist_id: &str, _limit: u32) -> Result<Vec<Track>> {
            if self.fail_reads {
                return Err(anyhow!("service unavailable"));
            }
            Ok(vec![track("t1")])
        }
    }

    // ── Mood mapper ──────────────────────────────────────────────────────────

    #[test]
    fn test_every_mood_has_params_in_range() {
        for mood in Mood::iter() {
            let params = mood.parameters();
            assert!(!params.is_empty(), "{mood} has no parameters");
            for value in [params.valence, params.energy, params.instrumentalness]
                .into_iter()
                .flatten()
            {
                assert!((0.0..=1.0).contains(&value), "{mood}: {value} out of range");
            }
        }
    }

    #[test]
    fn test_unknown_label_maps_to_empty_params() {
        assert!(parameters_for_label("Unknown").is_empty());
        assert!(parameters_for_label("").is_empty());
    }

    #[test]
    fn test_mood_labels_parse_case_insensitively() {
        assert_eq!(Mood::from_str("Chill").unwrap(), Mood::Chill);
        assert_eq!(Mood::from_str("happy").unwrap(), Mood::Happy);
        assert!(Mood::from_str("Moody").is_err());
        assert_eq!(Mood::Energetic.to_string(), "Energetic");
    }

    #[test]
    fn test_focused_targets_instrumentalness() {
        let params = Mood::Focused.parameters();
        assert_eq!(params.instrumentalness, Some(0.5));
        assert_eq!(Mood::Chill.parameters().instrumentalness, None);
    }

    // ── Recommender ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_no_listening_history_skips_recommendation_query() {
        let session = Arc::new(FakeSession::with_user());
        let recommender = Recommender::new(session.clone());

        let tracks = recommender.tracks_for_mood("Happy", 20).await;

        assert!(tracks.is_empty());
        let calls = session.calls.lock().unwrap();
        assert_eq!(calls.top_tracks, vec![5]);
        assert!(calls.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_seeds_are_first_two_top_tracks() {
        let session = Arc::new(FakeSession {
            top: vec![track("t1"), track("t2"), track("t3")],
            recommended: vec![track("r1"), track("r2")],
            ..FakeSession::with_user()
        });
        let recommender = Recommender::new(session.clone());

        let tracks = recommender.tracks_for_mood("Chill", 10).await;

        assert_eq!(tracks, vec![track("r1"), track("r2")]);
        let calls = session.calls.lock().unwrap();
        let (seeds, params, limit) = &calls.recommendations[0];
        assert_eq!(seeds, &vec!["t1".to_string(), "t2".to_string()]);
        assert_eq!(params.valence, Some(0.5));
        assert_eq!(params.energy, Some(0.3));
        assert_eq!(params.instrumentalness, None);
        assert_eq!(*limit, 10);
    }

    #[tokio::test]
    async fn test_single_top_track_is_the_only_seed() {
        let session = Arc::new(FakeSession {
            top: vec![track("t1")],
            ..FakeSession::with_user()
        });
        let recommender = Recommender::new(session.clone());

        recommender.tracks_for_mood("Sad", 20).await;

        let calls = session.calls.lock().unwrap();
        assert_eq!(calls.recommendations[0].0, vec!["t1".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_mood_queries_without_targets() {
        let session = Arc::new(FakeSession {
            top: vec![track("t1"), track("t2")],
            ..FakeSession::with_user()
        });
        let recommender = Recommender::new(session.clone());

        recommender.tracks_for_mood("Unknown", 20).await;

        let calls = session.calls.lock().unwrap();
        assert!(calls.recommendations[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_top_tracks_failure_becomes_empty_result() {
        let session = Arc::new(FakeSession {
            fail_top_tracks: true,
            ..FakeSession::with_user()
        });
        let recommender = Recommender::new(session.clone());

        let tracks = recommender.tracks_for_mood("Happy", 20).await;

        assert!(tracks.is_empty());
        assert!(session.calls.lock().unwrap().recommendations.is_empty());
    }

    // ── Playlist manager ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_with_no_tracks_makes_no_calls() {
        let session = Arc::new(FakeSession::with_user());
        let manager = PlaylistManager::new(session.clone()).await;

        let result = manager.create_mood_playlist(Mood::Happy, &[]).await;

        assert!(matches!(result, Err(PlaylistError::MissingData(_))));
        let calls = session.calls.lock().unwrap();
        assert!(calls.created.is_empty());
        assert!(calls.added.is_empty());
    }

    #[tokio::test]
    async fn test_create_without_user_makes_no_calls() {
        let session = Arc::new(FakeSession::default());
        let manager = PlaylistManager::new(session.clone()).await;

        let result = manager
            .create_mood_playlist(Mood::Happy, &["t1".to_string()])
            .await;

        assert!(matches!(result, Err(PlaylistError::MissingData(_))));
        assert!(session.calls.lock().unwrap().created.is_empty());
    }

    #[tokio::test]
    async fn test_create_names_and_fills_playlist() {
        let session = Arc::new(FakeSession::with_user());
        let manager = PlaylistManager::new(session.clone()).await;
        let ids = vec!["t1".to_string(), "t2".to_string(), "t3".to_string()];

        let playlist_id = manager
            .create_mood_playlist(Mood::Chill, &ids)
            .await
            .unwrap();

        assert_eq!(playlist_id, "playlist-1");
        let calls = session.calls.lock().unwrap();
        let created = &calls.created[0];
        assert_eq!(created.user_id, "user-1");
        assert_eq!(created.name, "Chill Playlist");
        assert!(created.public);
        assert_eq!(
            created.description,
            "Generated Chill playlist from MoodySongs App"
        );
        assert_eq!(calls.added, vec![("playlist-1".to_string(), ids)]);
    }

    #[tokio::test]
    async fn test_create_failure_reports_create_step() {
        let session = Arc::new(FakeSession {
            fail_create: true,
            ..FakeSession::with_user()
        });
        let manager = PlaylistManager::new(session.clone()).await;

        let result = manager
            .create_mood_playlist(Mood::Sad, &["t1".to_string()])
            .await;

        assert!(matches!(result, Err(PlaylistError::Create { .. })));
        assert!(session.calls.lock().unwrap().added.is_empty());
    }

    #[tokio::test]
    async fn test_add_failure_leaves_created_playlist_behind() {
        let session = Arc::new(FakeSession {
            fail_add: true,
            ..FakeSession::with_user()
        });
        let manager = PlaylistManager::new(session.clone()).await;

        let result = manager
            .create_mood_playlist(Mood::Energetic, &["t1".to_string()])
            .await;

        match result {
            Err(PlaylistError::AddTracks { playlist_id, .. }) => {
                assert_eq!(playlist_id, "playlist-1");
            }
            other => panic!("expected AddTracks error, got {other:?}"),
        }
        // No rollback: the empty playlist stays on the service
        assert_eq!(session.calls.lock().unwrap().created.len(), 1);
    }

    #[tokio::test]
    async fn test_playlist_reads_swallow_service_failures() {
        let session = Arc::new(FakeSession {
            fail_reads: true,
            ..FakeSession::with_user()
        });
        let manager = PlaylistManager::new(session.clone()).await;

        assert!(manager.user_playlists(50).await.is_empty());
        assert!(manager.playlist_tracks("playlist-1", 100).await.is_empty());
    }

    #[tokio::test]
    async fn test_playlist_reads_return_service_data() {
        let session = Arc::new(FakeSession::with_user());
        let manager = PlaylistManager::new(session.clone()).await;

        let playlists = manager.user_playlists(50).await;
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].name, "Chill Playlist");

        let tracks = manager.playlist_tracks("playlist-1", 100).await;
        assert_eq!(tracks, vec![track("t1")]);
    }
}
