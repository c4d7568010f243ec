use std::time::Duration;

use async_trait::async_trait;
use civicspend_core::insight::{GenerationError, TextGenerator};
use civicspend_shared::InsightsConfig;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Where the first candidate's text sits in a `generateContent` reply.
const CANDIDATE_TEXT: &str = "/candidates/0/content/parts/0/text";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text }],
            }],
        }
    }
}

/// Gemini `generateContent` client. Single attempt, no retries.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client. `timeout` bounds the whole request when set.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Builds a client from the insights config, or `None` when no API key is set.
    pub fn from_config(config: &InsightsConfig) -> Result<Option<Self>, GenerationError> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };
        Self::new(
            api_key,
            config.base_url.as_str(),
            config.model.as_str(),
            config.timeout_secs.map(Duration::from_secs),
        )
        .map(Some)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Transport(err.without_url().to_string())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::user(prompt))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), model = %self.model, "Gemini responded");

        if !status.is_success() {
            warn!(status = status.as_u16(), "Gemini returned an error status");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: Value = match serde_json::from_str(&body) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "Gemini returned malformed JSON");
                return Err(GenerationError::MalformedResponse { body });
            }
        };

        Ok(reply
            .pointer(CANDIDATE_TEXT)
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Bytes,
        http::{StatusCode, Uri},
    };
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Seen {
        uri: Option<String>,
        body: Option<Value>,
    }

    /// Serves `reply` for every request and records what it received.
    async fn fake_gemini(status: StatusCode, reply: &'static str) -> (String, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let recorder = seen.clone();
        let app = Router::new().fallback(move |uri: Uri, body: Bytes| {
            let recorder = recorder.clone();
            async move {
                let mut seen = recorder.lock().unwrap();
                seen.uri = Some(uri.to_string());
                seen.body = serde_json::from_slice(&body).ok();
                (status, reply)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1beta"), seen)
    }

    /// Accepts connections but answers only after `delay`.
    async fn slow_gemini(delay: Duration) -> String {
        let app = Router::new().fallback(move || async move {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, r#"{"candidates":[]}"#)
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1beta")
    }

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-key", base_url, "gemini-1.5-flash", None).unwrap()
    }

    #[tokio::test]
    async fn test_generate_extracts_first_candidate() {
        let (base, seen) = fake_gemini(
            StatusCode::OK,
            r#"{"candidates":[{"content":{"parts":[{"text":"Spending is on track."}]}}]}"#,
        )
        .await;

        let text = client(&base).generate("Summarise Parks").await.unwrap();
        assert_eq!(text.as_deref(), Some("Spending is on track."));

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.uri.as_deref(),
            Some("/v1beta/models/gemini-1.5-flash:generateContent?key=test-key")
        );
        let body = seen.body.as_ref().unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarise Parks");
    }

    #[tokio::test]
    async fn test_no_candidates_is_none() {
        let (base, _) = fake_gemini(StatusCode::OK, r#"{"candidates":[]}"#).await;
        assert_eq!(client(&base).generate("p").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_error_status_is_mirrored() {
        let (base, _) = fake_gemini(StatusCode::TOO_MANY_REQUESTS, "quota exceeded").await;
        let err = client(&base).generate("p").await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::Status {
                status: 429,
                body: "quota exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (base, _) = fake_gemini(StatusCode::OK, "<html>oops</html>").await;
        let err = client(&base).generate("p").await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::MalformedResponse {
                body: "<html>oops</html>".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let err = client("http://127.0.0.1:1/v1beta")
            .generate("p")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }

    #[tokio::test]
    async fn test_configured_timeout_expires() {
        let base = slow_gemini(Duration::from_secs(5)).await;
        let config = InsightsConfig {
            api_key: Some("test-key".to_string()),
            base_url: base,
            timeout_secs: Some(1),
            ..InsightsConfig::default()
        };

        let client = GeminiClient::from_config(&config).unwrap().unwrap();
        let err = client.generate("p").await.unwrap_err();
        assert_eq!(err, GenerationError::Timeout);
    }

    #[test]
    fn test_from_config_without_key() {
        let config = InsightsConfig::default();
        assert!(GeminiClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", client("http://localhost/v1beta/"));
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("http://localhost/v1beta\""));
    }
}
