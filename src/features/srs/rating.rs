use serde::Deserialize;

/// Self-assessment a user gives after seeing a flashcard.
///
/// Parsing never fails: unrecognised strings become [`Rating::Other`] and are
/// scheduled as a neutral pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Rating {
    Easy,
    Hard,
    Forgot,
    /// "mastered" or "instant": the "mark as known" shortcut
    Mastered,
    Other(String),
}

impl Rating {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "easy" => Rating::Easy,
            "hard" => Rating::Hard,
            "forgot" => Rating::Forgot,
            "mastered" | "instant" => Rating::Mastered,
            _ => Rating::Other(raw.to_string()),
        }
    }

    /// Multiplier applied to the elapsed interval, for ratings the interval calculator handles.
    pub fn interval_factor(&self) -> Option<f64> {
        match self {
            Rating::Easy => Some(1.3),
            Rating::Hard => Some(0.8),
            Rating::Other(_) => Some(1.0),
            Rating::Forgot | Rating::Mastered => None,
        }
    }
}

impl From<&str> for Rating {
    fn from(raw: &str) -> Self {
        Rating::parse(raw)
    }
}

impl From<String> for Rating {
    fn from(raw: String) -> Self {
        Rating::parse(&raw)
    }
}
