//! OpenRouter chat-completions client used as the plan provider.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::domain::PlanProvider;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenRouterProvider {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.openrouter_url.clone(),
            config.openrouter_api_key.clone(),
            config.plan_model.clone(),
        )
    }
}

#[async_trait]
impl PlanProvider for OpenRouterProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OPENROUTER_API_KEY is not set"))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
        };

        info!("Requesting plan from {} ({})", self.url, self.model);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Plan provider request failed")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read plan provider response")?;

        if !status.is_success() {
            return Err(anyhow!("Plan provider returned {}: {}", status, text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .with_context(|| format!("Unexpected plan provider response: {}", text))?;

        let content = first_content(parsed).unwrap_or_else(|| "{}".to_string());
        debug!("Plan provider replied with {} characters", content.len());
        Ok(content)
    }
}

fn first_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
}
