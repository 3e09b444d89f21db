//! LLM-backed keyword extraction and answer synthesis.

use crate::keywords::parse_keyword_list;
use crate::pipeline::{AnswerSynthesizer, KeywordExtractor};
use docseek_core::AppResult;
use docseek_llm::{LlmClient, LlmRequest};
use docseek_prompt::{
    build_prompt, load_prompt, BuiltPrompt, PromptDefinition, ANSWER_PROMPT_ID, KEYWORDS_PROMPT_ID,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub use crate::pipeline::NOT_FOUND_ANSWER;

/// Number of keywords requested from the model.
pub const KEYWORD_LIMIT: usize = 15;

const ANSWER_TEMPERATURE: f32 = 0.2;

fn to_request(built: BuiltPrompt, model: &str) -> LlmRequest {
    let request = LlmRequest::new(built.user, model);
    match built.system {
        Some(system) => request.with_system(system),
        None => request,
    }
}

/// Asks the model for a keyword list and parses it without evaluating it.
pub struct LlmKeywordExtractor {
    client: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
}

impl LlmKeywordExtractor {
    /// Load the `keywords.extract` prompt (workspace override first).
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        workspace: &Path,
    ) -> AppResult<Self> {
        Ok(Self {
            client,
            model: model.into(),
            prompt: load_prompt(workspace, KEYWORDS_PROMPT_ID)?,
        })
    }

    async fn try_extract(&self, question: &str) -> AppResult<Vec<String>> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("limit".to_string(), KEYWORD_LIMIT.to_string());

        let built = build_prompt(&self.prompt, variables)?;
        let response = self.client.complete(&to_request(built, &self.model)).await?;

        tracing::debug!(
            "Keyword reply from {}: {}",
            self.client.provider_name(),
            response.content
        );
        Ok(parse_keyword_list(&response.content))
    }
}

#[async_trait::async_trait]
impl KeywordExtractor for LlmKeywordExtractor {
    async fn extract_keywords(&self, question: &str) -> Vec<String> {
        match self.try_extract(question).await {
            Ok(keywords) => {
                if keywords.is_empty() {
                    tracing::warn!("Model reply contained no keyword list");
                }
                keywords
            }
            Err(e) => {
                tracing::warn!("Keyword extraction failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Answers from snippet context with the `answer.grounded` prompt.
pub struct LlmAnswerSynthesizer {
    client: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
    temperature: f32,
}

impl LlmAnswerSynthesizer {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        workspace: &Path,
    ) -> AppResult<Self> {
        Ok(Self {
            client,
            model: model.into(),
            prompt: load_prompt(workspace, ANSWER_PROMPT_ID)?,
            temperature: ANSWER_TEMPERATURE,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait::async_trait]
impl AnswerSynthesizer for LlmAnswerSynthesizer {
    async fn synthesize(&self, question: &str, context: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("context".to_string(), context.to_string());
        variables.insert("not_found".to_string(), NOT_FOUND_ANSWER.to_string());

        let built = build_prompt(&self.prompt, variables)?;
        let request = to_request(built, &self.model).with_temperature(self.temperature);
        let response = self.client.complete(&request).await?;

        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseek_core::AppError;
    use docseek_llm::{LlmResponse, LlmUsage};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Replies with a canned string and records every request.
    struct CannedClient {
        reply: Result<String, String>,
        seen: Mutex<Vec<LlmRequest>>,
    }

    impl CannedClient {
        fn new(reply: Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for CannedClient {
        fn provider_name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(content) => Ok(LlmResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    usage: LlmUsage::default(),
                }),
                Err(e) => Err(AppError::Llm(e.clone())),
            }
        }
    }

    #[tokio::test]
    async fn test_keyword_extraction_parses_reply() {
        let temp = TempDir::new().unwrap();
        let client = CannedClient::new(Ok("Keywords: [\"meeting\", \"Tuesday\"]"));
        let extractor = LlmKeywordExtractor::new(client.clone(), "m", temp.path()).unwrap();

        let keywords = extractor.extract_keywords("When is the meeting?").await;
        assert_eq!(keywords, vec!["meeting", "Tuesday"]);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].prompt.contains("When is the meeting?"));
        assert!(seen[0].prompt.contains("top 15"));
        assert!(seen[0].system.is_some());
    }

    #[tokio::test]
    async fn test_keyword_extraction_failure_is_empty() {
        let temp = TempDir::new().unwrap();
        let client = CannedClient::new(Err("connection refused"));
        let extractor = LlmKeywordExtractor::new(client, "m", temp.path()).unwrap();

        assert!(extractor.extract_keywords("anything").await.is_empty());
    }

    #[tokio::test]
    async fn test_keyword_extraction_malformed_reply_is_empty() {
        let temp = TempDir::new().unwrap();
        let client = CannedClient::new(Ok("I think the keywords are meeting and room"));
        let extractor = LlmKeywordExtractor::new(client, "m", temp.path()).unwrap();

        assert!(extractor.extract_keywords("anything").await.is_empty());
    }

    #[tokio::test]
    async fn test_answer_synthesis_renders_context() {
        let temp = TempDir::new().unwrap();
        let client = CannedClient::new(Ok("  The meeting is at **3pm**.\n"));
        let synthesizer = LlmAnswerSynthesizer::new(client.clone(), "m", temp.path()).unwrap();

        let answer = synthesizer
            .synthesize("When?", "for 3pm on Tuesday in Room 204")
            .await
            .unwrap();
        assert_eq!(answer, "The meeting is at **3pm**.");

        let seen = client.seen.lock().unwrap();
        assert!(seen[0].prompt.contains("for 3pm on Tuesday in Room 204"));
        assert!(seen[0].prompt.contains(NOT_FOUND_ANSWER));
        assert_eq!(seen[0].temperature, Some(ANSWER_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_answer_synthesis_propagates_errors() {
        let temp = TempDir::new().unwrap();
        let client = CannedClient::new(Err("quota exceeded"));
        let synthesizer = LlmAnswerSynthesizer::new(client, "m", temp.path()).unwrap();

        assert!(synthesizer.synthesize("q", "ctx").await.is_err());
    }
}
