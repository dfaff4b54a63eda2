use json::JsonValue;

use crate::model::health::ServiceHealth;

use super::ParsingError;

pub fn parse_health(json: &JsonValue) -> Result<ServiceHealth, ParsingError> {
    if let JsonValue::Object(obj) = json {
        let status = obj["status"]
            .as_str()
            .ok_or(ParsingError::InvalidType("status".into()))?;
        let version = obj["version"]
            .as_str()
            .ok_or(ParsingError::InvalidType("version".into()))?;

        return Ok(ServiceHealth {
            status: status.to_string(),
            version: version.to_string(),
        });
    }

    Err(ParsingError::InvalidType("root".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_health() {
        let health = parse_health(&json::parse(r#"{"status":"ok","version":"0.1.0"}"#).unwrap()).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, "0.1.0");
        assert_eq!(health.to_string(), "ok (v0.1.0)");
    }

    #[test]
    fn test_parse_health_missing_version() {
        let err = parse_health(&json::parse(r#"{"status":"ok"}"#).unwrap()).unwrap_err();
        assert!(matches!(err, ParsingError::InvalidType(field) if field == "version"));
    }
}
