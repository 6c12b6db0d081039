pub mod playlist;
pub mod recommend;

use std::str::FromStr;

/// The closed set of moods the app understands. Adding one forces the
/// `parameters` match below to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString, strum_macros::EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Chill,
    Focused,
}

/// Target audio features sent with a recommendation query.
/// `None` fields are simply omitted from the request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoodParameters {
    pub valence: Option<f32>,
    pub energy: Option<f32>,
    pub instrumentalness: Option<f32>,
}

impl MoodParameters {
    pub fn is_empty(&self) -> bool {
        self.valence.is_none() && self.energy.is_none() && self.instrumentalness.is_none()
    }
}

impl Mood {
    pub fn parameters(self) -> MoodParameters {
        match self {
            Mood::Happy => MoodParameters {
                valence: Some(0.8),
                energy: Some(0.7),
                instrumentalness: None,
            },
            Mood::Sad => MoodParameters {
                valence: Some(0.2),
                energy: Some(0.3),
                instrumentalness: None,
            },
            Mood::Energetic => MoodParameters {
                valence: Some(0.6),
                energy: Some(0.9),
                instrumentalness: None,
            },
            Mood::Chill => MoodParameters {
                valence: Some(0.5),
                energy: Some(0.3),
                instrumentalness: None,
            },
            Mood::Focused => MoodParameters {
                valence: Some(0.5),
                energy: Some(0.5),
                instrumentalness: Some(0.5),
            },
        }
    }
}

/// Resolves a free-form label to its target parameters. Unrecognized
/// labels get an empty set, so the recommendation query runs
/// unconstrained instead of failing.
pub fn parameters_for_label(label: &str) -> MoodParameters {
    Mood::from_str(label)
        .map(Mood::parameters)
        .unwrap_or_default()
}
