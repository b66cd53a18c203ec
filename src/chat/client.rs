use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::dto::ChatMessage;
use crate::config::ChatConfig;

/// Chat-completion backend: given the full transcript, returns the next
/// assistant turn.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<ChatMessage>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// OpenAI-compatible `/chat/completions` client (OpenRouter by default).
#[derive(Clone)]
pub struct OpenRouterClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    site_url: Option<String>,
    site_title: Option<String>,
}

impl OpenRouterClient {
    pub fn new(cfg: &ChatConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            site_url: cfg.site_url.clone(),
            site_title: cfg.site_title.clone(),
        }
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<ChatMessage> {
        let mut req = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
            });
        if let Some(url) = &self.site_url {
            req = req.header("HTTP-Referer", url);
        }
        if let Some(title) = &self.site_title {
            req = req.header("X-Title", title);
        }

        let resp = req.send().await.context("send completion request")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("completion API returned {status}: {body}");
        }

        let parsed: CompletionResponse = resp.json().await.context("decode completion response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .context("completion response has no choices")
    }
}
