//! OpenAI-compatible chat-completions client (Groq by default).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::explainer::{Explainer, RetryPolicy};
use crate::request::{ExplanationRequest, InsightRequest};
use crate::result::{AiError, Explanation};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ChatCompletionsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the first choice's trimmed content from a response body.
pub(crate) fn parse_completion(body: &str) -> Result<String, AiError> {
    let resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| AiError::MalformedResponse("response has no choices".to_string()))?;

    let text = content.trim();
    if text.is_empty() {
        return Err(AiError::MalformedResponse("empty completion".to_string()));
    }
    Ok(text.to_string())
}

/// Explainer backed by a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsExplainer {
    client: reqwest::Client,
    config: ChatCompletionsConfig,
}

impl ChatCompletionsExplainer {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn call_once(&self, prompt: &str) -> Result<String, AiError> {
        let body = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [ChatMessage { role: "user", content: prompt }],
        });

        let res = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AiError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

impl ChatCompletionsExplainer {
    async fn complete(&self, prompt: &str) -> Result<Explanation, AiError> {
        let (text, attempts) = self.config.retry.run(|| self.call_once(prompt)).await?;

        tracing::debug!(model = %self.config.model, attempts, "completion generated");

        Ok(Explanation::new(text)
            .with_model(self.config.model.clone())
            .with_attempts(attempts))
    }
}

#[async_trait]
impl Explainer for ChatCompletionsExplainer {
    async fn explain(&self, request: &ExplanationRequest) -> Result<Explanation, AiError> {
        self.complete(&request.prompt()).await
    }

    async fn insight(&self, request: &InsightRequest) -> Result<Explanation, AiError> {
        self.complete(&request.prompt()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_and_trims() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Accepted: stock and staff ready.\n"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Accepted: stock and staff ready.");
    }

    #[test]
    fn missing_choices_is_malformed() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(AiError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"id":"x"}"#),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn blank_or_null_content_is_malformed() {
        assert!(parse_completion(r#"{"choices":[{"message":{"content":"   "}}]}"#).is_err());
        assert!(parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#).is_err());
        assert!(parse_completion("not json").is_err());
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let cfg = ChatCompletionsConfig::new("k").with_base_url("http://localhost:9/v1/");
        assert_eq!(cfg.endpoint(), "http://localhost:9/v1/chat/completions");
    }
}
