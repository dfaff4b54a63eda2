use std::fmt;

use once_cell::sync::OnceCell;
use reqwest::{
    blocking::Client,
    header::{self, HeaderValue},
};

use crate::model::{draft::NormalizedDraft, health::ServiceHealth, prediction::PredictionResult};

use super::{
    config::ClientConfig,
    parsing::{health::parse_health, prediction::parse_prediction, ParsingError},
    request::build_request_body,
};

pub struct PredictionClient {
    config: ClientConfig,
    client: OnceCell<Client>,
}

impl PredictionClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn http(&self) -> Result<&Client, PredictionError> {
        let client = self.client.get_or_try_init(|| {
            Client::builder()
                .timeout(self.config.timeout)
                .build()
        })?;
        Ok(client)
    }

    /// Sends one draft to `{base_url}/predict` and decodes the answer.
    ///
    /// Blocks until the service answers or the transport gives up. Nothing is retried.
    pub fn predict(&self, draft: &NormalizedDraft) -> Result<PredictionResult, PredictionError> {
        let client = self.http()?;

        let url = self.config.predict_url();
        let body = build_request_body(draft).dump();
        tracing::info!("Requesting prediction: {}", url);
        tracing::debug!("Request body: {}", body);

        let response = client
            .post(&url)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Prediction service answered with HTTP {}", status);
            return Err(PredictionError::InvalidResponse(
                status.as_u16(),
                response.text().unwrap_or_else(|_| "Unknown error".to_string()),
            ));
        }

        let text = response.text()?;
        let json = json::parse(text.as_str())?;
        let result = parse_prediction(&json)?;
        tracing::debug!("Received prediction {:?}", result);
        Ok(result)
    }

    /// Asks `{base_url}/health` whether the service is up.
    pub fn health(&self) -> Result<ServiceHealth, PredictionError> {
        let url = self.config.health_url();
        tracing::info!("Checking service health: {}", url);

        let response = self.http()?.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::InvalidResponse(
                status.as_u16(),
                response.text().unwrap_or_else(|_| "Unknown error".to_string()),
            ));
        }

        let text = response.text()?;
        let json = json::parse(text.as_str())?;
        Ok(parse_health(&json)?)
    }
}

#[derive(Debug)]
pub enum PredictionError {
    ClientFailed(reqwest::Error),
    InvalidResponse(u16, String),
    MalformedBody(json::Error),
    ParsingFailed(ParsingError),
}

impl PredictionError {
    /// The request never produced a usable HTTP answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::ClientFailed(_) | Self::InvalidResponse(..))
    }

    /// The service answered, but not with a prediction.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::MalformedBody(_) | Self::ParsingFailed(_))
    }
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PredictionError::ClientFailed(err) => write!(f, "Client error: {}", err),
            PredictionError::InvalidResponse(status, body) => {
                write!(f, "Prediction service returned error {}: {}", status, body)
            }
            PredictionError::MalformedBody(err) => write!(f, "Failed to parse JSON response: {}", err),
            PredictionError::ParsingFailed(err) => write!(f, "Unexpected response: {}", err),
        }
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(error: reqwest::Error) -> Self {
        Self::ClientFailed(error)
    }
}

impl From<json::Error> for PredictionError {
    fn from(error: json::Error) -> Self {
        Self::MalformedBody(error)
    }
}

impl From<ParsingError> for PredictionError {
    fn from(error: ParsingError) -> Self {
        Self::ParsingFailed(error)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net::TcpListener,
        sync::mpsc,
        thread,
    };

    use super::*;
    use crate::model::draft::RuneChoices;

    struct CapturedRequest {
        head: String,
        body: String,
    }

    /// Answers exactly one HTTP request on a loopback port, returns the base url and the
    /// channel the captured request is sent through.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                head.push_str(&line);
            }

            let mut body_buf = vec![0; content_length];
            reader.read_exact(&mut body_buf).unwrap();

            let mut stream = stream;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            let _ = tx.send(CapturedRequest {
                head,
                body: String::from_utf8(body_buf).unwrap(),
            });
        });

        (format!("http://127.0.0.1:{}/api/v1", port), rx)
    }

    fn sample_draft() -> NormalizedDraft {
        NormalizedDraft {
            champions: vec!["Ahri".to_string(), "Lee Sin".to_string()],
            lanes: vec!["mid".to_string(), "jungle".to_string()],
            runes: RuneChoices::from([("keystone".to_string(), "electrocute".to_string())]),
            patch: "14.10".to_string(),
            blue_side: true,
        }
    }

    #[test]
    fn test_predict_success() {
        let (base_url, captured) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"win_probability":0.73,"model_version":"v2.1"}"#,
        );
        let client = PredictionClient::new(ClientConfig::new(&base_url));

        let result = client.predict(&sample_draft()).unwrap();
        assert_eq!(result.win_probability, 0.73);
        assert_eq!(result.model_version, "v2.1");
        assert_eq!(result.to_string(), "73% (model v2.1)");

        let request = captured.recv().unwrap();
        assert!(request.head.starts_with("POST /api/v1/predict HTTP/1.1"));
        assert!(request
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/json"));

        let sent = json::parse(&request.body).unwrap();
        assert_eq!(sent["blue_side"].as_bool(), Some(true));
        assert_eq!(sent["champions"].len(), 2);
        assert_eq!(sent["runes"]["keystone"].as_str(), Some("electrocute"));
    }

    #[test]
    fn test_predict_missing_probability_fails() {
        let (base_url, _captured) = serve_once("HTTP/1.1 200 OK", r#"{"model_version":"v2.1"}"#);
        let client = PredictionClient::new(ClientConfig::new(&base_url));

        let err = client.predict(&sample_draft()).unwrap_err();
        assert!(matches!(err, PredictionError::ParsingFailed(_)));
        assert!(err.is_decode());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_predict_non_json_body_fails() {
        let (base_url, _captured) = serve_once("HTTP/1.1 200 OK", "<html>oops</html>");
        let client = PredictionClient::new(ClientConfig::new(&base_url));

        let err = client.predict(&sample_draft()).unwrap_err();
        assert!(matches!(err, PredictionError::MalformedBody(_)));
        assert!(err.is_decode());
    }

    #[test]
    fn test_predict_error_status_fails() {
        let (base_url, _captured) = serve_once(
            "HTTP/1.1 422 Unprocessable Entity",
            r#"{"detail":"champions: field required"}"#,
        );
        let client = PredictionClient::new(ClientConfig::new(&base_url));

        let err = client.predict(&sample_draft()).unwrap_err();
        match &err {
            PredictionError::InvalidResponse(status, body) => {
                assert_eq!(*status, 422);
                assert!(body.contains("field required"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_transport());
    }

    #[test]
    fn test_health() {
        let (base_url, captured) = serve_once("HTTP/1.1 200 OK", r#"{"status":"ok","version":"0.1.0"}"#);
        let client = PredictionClient::new(ClientConfig::new(&base_url));

        let health = client.health().unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, "0.1.0");

        let request = captured.recv().unwrap();
        assert!(request.head.starts_with("GET /api/v1/health HTTP/1.1"));
    }

    #[test]
    fn test_predict_connection_refused() {
        // Grab a free port, then close it again
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = PredictionClient::new(ClientConfig::new(&format!("http://127.0.0.1:{}/api/v1", port)));

        let err = client.predict(&sample_draft()).unwrap_err();
        assert!(matches!(err, PredictionError::ClientFailed(_)));
        assert!(err.is_transport());
        assert!(!err.is_decode());
    }
}
