//! LLM Client: the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call the upstream chat-completions API directly.
//! Chapter generation, verdict checks and customer summaries all go through `TextGenerator`.
//!
//! One attempt per call, bounded by the configured timeout. Retry policy belongs to the caller.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmSettings;

pub mod prompts;
#[cfg(test)]
pub mod testing;

/// Classified failure of a single generation call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The API key is not configured. Retrying cannot help.
    #[error("generation credential is not configured")]
    MissingCredential,

    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The service answered 2xx but without `choices[0].message.content`.
    #[error("malformed upstream response: {detail}")]
    MalformedResponse { detail: String },
}

/// The seam every report stage generates text through.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so tests can script responses.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<Value>,
}

/// OpenRouter-compatible chat-completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    async fn call(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(model = %self.settings.model, "Sending generation request");

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.settings.site_url)
            .header("X-Title", &self.settings.app_name)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                warn!(model = %self.settings.model, "Generation request failed: {e}");
                GenerationError::Transport {
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport {
                message: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            warn!(
                model = %self.settings.model,
                status = status.as_u16(),
                "Upstream returned an error status"
            );
            return Err(GenerationError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        debug!(model = %self.settings.model, status = status.as_u16(), "Generation call succeeded");
        extract_completion(&body)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        self.call(system, user).await
    }
}

/// Pulls `choices[0].message.content` out of a 2xx body.
///
/// Some providers return content as an array of text parts; those are joined.
fn extract_completion(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::MalformedResponse {
            detail: format!("body is not a chat completion: {e}"),
        })?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| GenerationError::MalformedResponse {
            detail: "missing choices[0].message.content".to_string(),
        })?;

    let text = match content {
        Value::String(s) => s,
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        other => {
            return Err(GenerationError::MalformedResponse {
                detail: format!("unexpected content type: {other}"),
            })
        }
    };

    if text.trim().is_empty() {
        return Err(GenerationError::MalformedResponse {
            detail: "completion content is empty".to_string(),
        });
    }

    Ok(text)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer, api_key: Option<&str>) -> LlmSettings {
        LlmSettings {
            api_url: format!("{}/api/v1/chat/completions", server.uri()),
            api_key: api_key.map(String::from),
            timeout: Duration::from_secs(5),
            ..LlmSettings::default()
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_completion_reads_first_choice() {
        let body = json!({"choices": [{"message": {"content": "第一章"}}]}).to_string();
        assert_eq!(extract_completion(&body).unwrap(), "第一章");
    }

    #[test]
    fn test_extract_completion_joins_content_parts() {
        let body = json!({
            "choices": [{"message": {"content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]}}]
        })
        .to_string();
        assert_eq!(extract_completion(&body).unwrap(), "ab");
    }

    #[test]
    fn test_extract_completion_missing_choices_is_malformed() {
        let err = extract_completion(r#"{"id": "x"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));
    }

    #[test]
    fn test_extract_completion_null_content_is_malformed() {
        let body = json!({"choices": [{"message": {"content": null}}]}).to_string();
        assert!(matches!(
            extract_completion(&body),
            Err(GenerationError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = LlmClient::new(settings_for(&server, None)).unwrap();
        let err = client.generate("sys", "user").await.unwrap_err();
        assert_eq!(err, GenerationError::MissingCredential);
    }

    #[tokio::test]
    async fn test_success_returns_completion_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("x-title", "Bazi Pro Calculator"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "### 命局格局"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(settings_for(&server, Some("test-key"))).unwrap();
        let text = client.generate("sys", "user").await.unwrap();
        assert_eq!(text, "### 命局格局");
    }

    #[tokio::test]
    async fn test_request_carries_both_messages_and_sampling_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(settings_for(&server, Some("k"))).unwrap();
        client.generate("SYSTEM TEXT", "USER TEXT").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "google/gemini-flash-1.5");
        assert_eq!(body["max_tokens"], 8192);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "SYSTEM TEXT");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "USER TEXT");
    }

    #[tokio::test]
    async fn test_non_2xx_preserves_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(settings_for(&server, Some("k"))).unwrap();
        let err = client.generate("sys", "user").await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::UpstreamHttp {
                status: 429,
                body: "rate limited".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_2xx_without_choices_is_malformed_not_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "oops"})))
            .mount(&server)
            .await;

        let client = LlmClient::new(settings_for(&server, Some("k"))).unwrap();
        let err = client.generate("sys", "user").await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_classified_as_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let settings = LlmSettings {
            timeout: Duration::from_millis(200),
            ..settings_for(&server, Some("k"))
        };
        let client = LlmClient::new(settings).unwrap();
        let err = client.generate("sys", "user").await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport() {
        let settings = LlmSettings {
            api_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
            api_key: Some("k".to_string()),
            timeout: Duration::from_secs(2),
            ..LlmSettings::default()
        };
        let client = LlmClient::new(settings).unwrap();
        let err = client.generate("sys", "user").await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport { .. }));
    }
}
