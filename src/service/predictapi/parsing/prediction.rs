use json::JsonValue;

use crate::model::prediction::PredictionResult;

use super::ParsingError;

pub fn parse_prediction(json: &JsonValue) -> Result<PredictionResult, ParsingError> {
    if let JsonValue::Object(obj) = json {
        let win_probability = obj["win_probability"]
            .as_f64()
            .ok_or(ParsingError::InvalidType("win_probability".into()))?;
        let model_version = obj["model_version"]
            .as_str()
            .ok_or(ParsingError::InvalidType("model_version".into()))?;

        // Free-form extras, only kept when the service sends an object
        let details = match obj["details"].is_object() {
            true => Some(obj["details"].clone()),
            false => None,
        };

        return Ok(PredictionResult {
            win_probability,
            model_version: model_version.to_string(),
            details,
        });
    }

    Err(ParsingError::InvalidType("root".into()))
}
