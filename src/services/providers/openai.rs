/// OpenAI-backed suggestion oracle
///
/// Sends the liked-title list to the chat completions endpoint and expects
/// back a bare JSON array of TMDB ids. The model occasionally wraps its
/// answer in a markdown code fence, so parsing strips one if present.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    services::providers::SuggestionProvider,
};

/// Bounded so one hanging oracle call cannot stall a recommendation request
/// indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SUGGESTION_COUNT: usize = 5;

#[derive(Clone)]
pub struct OpenAiSuggester {
    http_client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiSuggester {
    pub fn new(api_key: String, api_url: String, model: String) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    fn build_prompt(liked_titles: &[String]) -> String {
        format!(
            "You are a movie expert. Given these movies that users liked: [{}], \
             recommend {} distinct movies that they would enjoy. Return ONLY a JSON \
             array of TMDB IDs as integers, nothing else. \
             Example format: [123, 456, 789, 101, 202]",
            liked_titles.join(", "),
            SUGGESTION_COUNT
        )
    }

    /// Parses the model's reply into a non-empty id list.
    fn parse_id_list(content: &str) -> AppResult<Vec<i64>> {
        let mut body = content.trim();
        if let Some(stripped) = body.strip_prefix("```") {
            // "```json\n[..]\n```" or plain "```\n[..]\n```"
            body = stripped
                .trim_start_matches("json")
                .trim_end_matches("```")
                .trim();
        }

        let ids: Vec<i64> = serde_json::from_str(body).map_err(|e| {
            AppError::ExternalApi(format!(
                "failed to parse TMDB ids from oracle response: {} (content: {})",
                e, content
            ))
        })?;

        if ids.is_empty() {
            return Err(AppError::ExternalApi(
                "oracle returned an empty id list".to_string(),
            ));
        }

        Ok(ids)
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for OpenAiSuggester {
    async fn suggest(&self, liked_titles: &[String]) -> AppResult<Vec<i64>> {
        if liked_titles.is_empty() {
            return Err(AppError::InvalidInput(
                "no liked titles provided".to_string(),
            ));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_prompt(liked_titles),
            }],
        };

        let url = format!("{}/chat/completions", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "oracle returned status {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| AppError::ExternalApi("oracle returned no choices".to_string()))?;

        let ids = Self::parse_id_list(content)?;

        tracing::info!(
            liked = liked_titles.len(),
            suggested = ids.len(),
            "Oracle suggestions received"
        );

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_titles_and_count() {
        let prompt = OpenAiSuggester::build_prompt(&[
            "Inception".to_string(),
            "The Matrix".to_string(),
        ]);
        assert!(prompt.contains("[Inception, The Matrix]"));
        assert!(prompt.contains("recommend 5 distinct movies"));
    }

    #[test]
    fn test_parse_plain_array() {
        let ids = OpenAiSuggester::parse_id_list("[123, 456, 789]").unwrap();
        assert_eq!(ids, vec![123, 456, 789]);
    }

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        let ids = OpenAiSuggester::parse_id_list("\n  [1, 2]  \n").unwrap();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_parse_code_fenced_array() {
        let ids = OpenAiSuggester::parse_id_list("```json\n[42, 7]\n```").unwrap();
        assert_eq!(ids, vec![42, 7]);
    }

    #[test]
    fn test_parse_rejects_prose() {
        let result = OpenAiSuggester::parse_id_list("Sure! Here are some movies you may like.");
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_parse_rejects_empty_array() {
        let result = OpenAiSuggester::parse_id_list("[]");
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
