//! Mock LLM provider for testing
//!
//! Plays back a script of outcomes, one per call; the last outcome repeats
//! once the script runs out. Every request is recorded so tests can inspect
//! the prompts that were sent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

/// Outcome of a single scripted call
#[derive(Debug, Clone)]
pub enum MockReply {
    Content(String),
    RateLimited,
    Overloaded,
    Empty,
}

impl MockReply {
    fn into_result(self) -> Result<LlmResponse> {
        match self {
            Self::Content(content) => Ok(LlmResponse {
                content,
                model: "mock-model".to_string(),
                usage: None,
            }),
            Self::RateLimited => Err(LlmError::RateLimited { retry_after: None }),
            Self::Overloaded => Err(LlmError::ServerOverloaded {
                message: "overloaded (mock)".to_string(),
            }),
            Self::Empty => Err(LlmError::EmptyResponse {
                provider: "mock".to_string(),
            }),
        }
    }
}

pub struct MockProvider {
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<LlmRequest>>,
    name: &'static str,
}

impl MockProvider {
    /// Replies with each outcome in turn
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    pub fn always_succeeds(response: &str) -> Self {
        Self::scripted([MockReply::Content(response.to_string())])
    }

    pub fn always_fails(reply: MockReply) -> Self {
        Self::scripted([reply])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Prompt of the most recent request, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .ok()
            .and_then(|r| r.last().map(|req| req.prompt.clone()))
    }

    fn next_reply(&self) -> MockReply {
        let mut script = match self.script.lock() {
            Ok(script) => script,
            Err(poisoned) => poisoned.into_inner(),
        };
        if script.len() > 1 {
            script.pop_front().unwrap_or(MockReply::Empty)
        } else {
            script.front().cloned().unwrap_or(MockReply::Empty)
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.next_reply().into_result()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = MockProvider::always_succeeds("success");

        let result = provider.complete(LlmRequest::new("test")).await;
        assert_eq!(result.unwrap().content, "success");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_prompt().as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_always_fails() {
        let provider = MockProvider::always_fails(MockReply::Overloaded);

        for _ in 0..3 {
            let result = provider.complete(LlmRequest::new("test")).await;
            assert!(matches!(result, Err(LlmError::ServerOverloaded { .. })));
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_script_plays_in_order_then_repeats_last() {
        let provider = MockProvider::scripted([
            MockReply::RateLimited,
            MockReply::Content("first".into()),
            MockReply::Content("second".into()),
        ]);

        assert!(provider.complete(LlmRequest::new("a")).await.unwrap_err().is_rate_limit());
        assert_eq!(provider.complete(LlmRequest::new("b")).await.unwrap().content, "first");
        assert_eq!(provider.complete(LlmRequest::new("c")).await.unwrap().content, "second");
        assert_eq!(provider.complete(LlmRequest::new("d")).await.unwrap().content, "second");
        assert_eq!(provider.last_prompt().as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn test_empty_script_reports_empty_response() {
        let provider = MockProvider::scripted([]);
        let err = provider.complete(LlmRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { .. }));
    }
}
