use std::fmt::Display;

use json::JsonValue;

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub win_probability: f64,
    pub model_version: String,
    pub details: Option<JsonValue>,
}

impl PredictionResult {
    /// Win probability as a whole percentage, rounded half away from zero.
    pub fn percent(&self) -> i64 {
        (self.win_probability * 100.0).round() as i64
    }
}

impl Display for PredictionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}% (model {})", self.percent(), self.model_version)
    }
}
