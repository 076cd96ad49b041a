use cyberlaw_core::constants::messages;
use cyberlaw_core::{
    CompletionRequest, FetchError, LlmClient, LlmError, ResponseFetcher, RetryPolicy, Sleeper,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock LLM that replays a script of attempt results and records every request.
struct MockLlm {
    credential: bool,
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockLlm {
    fn new(script: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            credential: true,
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn without_credential() -> Arc<Self> {
        Arc::new(Self {
            credential: false,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    fn has_credential(&self) -> bool {
        self.credential
    }

    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push((
            request.prompt.to_string(),
            request.system_instruction.to_string(),
        ));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Network("script exhausted".into())))
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn fetcher(llm: Arc<MockLlm>, sleeper: Arc<RecordingSleeper>) -> ResponseFetcher {
    ResponseFetcher::new(llm).with_sleeper(sleeper)
}

fn transient() -> LlmError {
    LlmError::Api {
        status: 503,
        message: "The model is overloaded. Please try again later.".into(),
    }
}

#[tokio::test]
async fn test_first_attempt_success() {
    let llm = MockLlm::new(vec![Ok("The IT Act 2000 governs electronic commerce.".into())]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let answer = fetcher(llm.clone(), sleeper.clone())
        .fetch_response("What is the IT Act 2000?")
        .await
        .unwrap();

    assert_eq!(answer, "The IT Act 2000 governs electronic commerce.");
    assert_eq!(llm.calls(), 1);
    assert!(sleeper.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_carries_prompt_and_system_instruction() {
    let llm = MockLlm::new(vec![Ok("ok".into())]);
    let sleeper = Arc::new(RecordingSleeper::default());

    fetcher(llm.clone(), sleeper)
        .with_system_instruction("Answer in one line.")
        .fetch_response("Define cyber stalking")
        .await
        .unwrap();

    let requests = llm.requests.lock().unwrap();
    assert_eq!(
        requests[0],
        ("Define cyber stalking".to_string(), "Answer in one line.".to_string())
    );
}

#[tokio::test]
async fn test_recovers_after_transient_failures() {
    let llm = MockLlm::new(vec![Err(transient()), Err(transient()), Ok("third time".into())]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let answer = fetcher(llm.clone(), sleeper.clone())
        .fetch_response("q")
        .await
        .unwrap();

    assert_eq!(answer, "third time");
    assert_eq!(llm.calls(), 3);
    assert_eq!(
        *sleeper.delays.lock().unwrap(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test]
async fn test_exhausts_after_exactly_two_retries() {
    let llm = MockLlm::new(vec![
        Err(transient()),
        Err(LlmError::Network("connection reset".into())),
        Err(transient()),
        Ok("never reached".into()),
    ]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = fetcher(llm.clone(), sleeper.clone())
        .fetch_response("q")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Exhausted { attempts: 3, .. }));
    assert_eq!(err.to_string(), messages::RETRIES_EXHAUSTED);
    assert_eq!(llm.calls(), 3);
    assert_eq!(
        *sleeper.delays.lock().unwrap(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test]
async fn test_missing_credential_makes_no_attempt() {
    let llm = MockLlm::without_credential();
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = fetcher(llm.clone(), sleeper.clone())
        .fetch_response("q")
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Config);
    assert_eq!(err.to_string(), messages::MISSING_CREDENTIAL);
    assert_eq!(llm.calls(), 0);
    assert!(sleeper.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_content_policy_rejection_is_terminal_text() {
    let llm = MockLlm::new(vec![Err(LlmError::Api {
        status: 400,
        message: "Request contains an invalid argument.".into(),
    })]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let answer = fetcher(llm.clone(), sleeper.clone())
        .fetch_response("q")
        .await
        .unwrap();

    assert_eq!(answer, messages::CONTENT_POLICY_REFUSAL);
    assert_eq!(llm.calls(), 1);
    assert!(sleeper.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_blocked_prompt_maps_to_refusal() {
    let llm = MockLlm::new(vec![Err(LlmError::Blocked("SAFETY".into()))]);
    let answer = fetcher(llm, Arc::new(RecordingSleeper::default()))
        .fetch_response("q")
        .await
        .unwrap();
    assert_eq!(answer, messages::CONTENT_POLICY_REFUSAL);
}

#[tokio::test]
async fn test_invalid_credential_is_terminal_text() {
    let llm = MockLlm::new(vec![Err(LlmError::Api {
        status: 400,
        message: "API key not valid. Please pass a valid API key.".into(),
    })]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let answer = fetcher(llm.clone(), sleeper)
        .fetch_response("q")
        .await
        .unwrap();

    assert_eq!(answer, messages::CREDENTIAL_SUPPORT);
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_classification_after_transient_retry() {
    let llm = MockLlm::new(vec![Err(transient()), Err(LlmError::Blocked("OTHER".into()))]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let answer = fetcher(llm.clone(), sleeper.clone())
        .fetch_response("q")
        .await
        .unwrap();

    assert_eq!(answer, messages::CONTENT_POLICY_REFUSAL);
    assert_eq!(llm.calls(), 2);
    assert_eq!(*sleeper.delays.lock().unwrap(), vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn test_custom_policy_is_honoured() {
    let llm = MockLlm::new(vec![]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = fetcher(llm.clone(), sleeper.clone())
        .with_policy(RetryPolicy {
            max_retries: 0,
            base_delay: Duration::from_millis(5),
        })
        .fetch_response("q")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Exhausted { attempts: 1, .. }));
    assert!(sleeper.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_prompt_is_rejected_without_attempt() {
    let llm = MockLlm::new(vec![Ok("unused".into())]);
    let err = fetcher(llm.clone(), Arc::new(RecordingSleeper::default()))
        .fetch_response("   ")
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::EmptyPrompt);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_default_sleeper_waits_real_backoff() {
    let llm = MockLlm::new(vec![Err(transient()), Err(transient()), Ok("done".into())]);
    let start = tokio::time::Instant::now();

    let answer = ResponseFetcher::new(llm).fetch_response("q").await.unwrap();

    assert_eq!(answer, "done");
    assert!(start.elapsed() >= Duration::from_millis(3000));
}
