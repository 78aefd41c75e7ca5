use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use ragchat::models::ChatTurn;
use ragchat::models::Message;
use ragchat::rag::ChatPipeline;
use ragchat::rag::GenerateResponse;
use ragchat::rag::MessageStore;
use ragchat::rag::RetrieveContext;
use ragchat::PipelineStage;
use ragchat::RagChatError;
use ragchat::Result;
use uuid::Uuid;

/// Records which stages ran, in order, across all stub components
type StageLog = Arc<Mutex<Vec<&'static str>>>;

struct StubRetriever {
    context: String,
    fail: bool,
    log: StageLog,
}

#[async_trait]
impl RetrieveContext for StubRetriever {
    async fn retrieve(&self, _history: &[ChatTurn], _session_id: Uuid) -> Result<String> {
        self.log.lock().unwrap().push("retrieve");
        if self.fail {
            return Err(RagChatError::Embedding("embedding service down".to_string()));
        }
        Ok(self.context.clone())
    }
}

struct StubGenerator {
    reply: String,
    fail: bool,
    log: StageLog,
}

#[async_trait]
impl GenerateResponse for StubGenerator {
    async fn generate(&self, _history: &[ChatTurn], _context: &str) -> Result<String> {
        self.log.lock().unwrap().push("generate");
        if self.fail {
            return Err(RagChatError::Generation("model unavailable".to_string()));
        }
        Ok(self.reply.clone())
    }
}

struct MemoryStore {
    saved: Mutex<Vec<(Uuid, String, Option<String>)>>,
    fail: bool,
    log: StageLog,
}

impl MemoryStore {
    fn new(fail: bool, log: StageLog) -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail,
            log,
        }
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn save_assistant_message(
        &self,
        session_id: Uuid,
        content: &str,
        context: Option<&str>,
    ) -> Result<Message> {
        self.log.lock().unwrap().push("persist");
        if self.fail {
            return Err(RagChatError::Database(sqlx::Error::PoolClosed));
        }

        self.saved.lock().unwrap().push((
            session_id,
            content.to_string(),
            context.map(String::from),
        ));

        Ok(Message {
            id: Uuid::new_v4(),
            session_id,
            role: "assistant".to_string(),
            content: content.to_string(),
            context_chunks: context.map(String::from),
            created_at: Utc::now(),
        })
    }

    async fn load_history(&self, _session_id: Uuid, _limit: i64) -> Result<Vec<ChatTurn>> {
        Ok(Vec::new())
    }
}

struct Harness {
    pipeline: ChatPipeline,
    store: Arc<MemoryStore>,
    log: StageLog,
}

fn build_pipeline(
    context: &str,
    retriever_fails: bool,
    generator_fails: bool,
    store_fails: bool,
) -> Harness {
    let log: StageLog = Arc::new(Mutex::new(Vec::new()));
    let store = Arc::new(MemoryStore::new(store_fails, log.clone()));

    let pipeline = ChatPipeline::new(
        Arc::new(StubRetriever {
            context: context.to_string(),
            fail: retriever_fails,
            log: log.clone(),
        }),
        Arc::new(StubGenerator {
            reply: "The capital of France is Paris.".to_string(),
            fail: generator_fails,
            log: log.clone(),
        }),
        store.clone(),
    );

    Harness {
        pipeline,
        store,
        log,
    }
}

#[tokio::test]
async fn test_round_trip_persists_reply_with_context() -> Result<()> {
    let harness = build_pipeline("Paris is the capital of France.", false, false, false);
    let session_id = Uuid::new_v4();
    let history = vec![ChatTurn::user("What is the capital of France?")];

    let answer = harness.pipeline.handle_message(session_id, history).await?;
    assert_eq!(answer, "The capital of France is Paris.");

    let saved = harness.store.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, session_id);
    assert_eq!(saved[0].1, "The capital of France is Paris.");
    assert_eq!(
        saved[0].2.as_deref(),
        Some("Paris is the capital of France.")
    );

    let log = harness.log.lock().unwrap();
    assert_eq!(*log, vec!["retrieve", "generate", "persist"]);

    Ok(())
}

#[tokio::test]
async fn test_empty_context_is_stored_as_null() -> Result<()> {
    let harness = build_pipeline("", false, false, false);

    harness
        .pipeline
        .handle_message(Uuid::new_v4(), vec![ChatTurn::user("hello")])
        .await?;

    let saved = harness.store.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].2, None);

    Ok(())
}

#[tokio::test]
async fn test_retrieval_failure_skips_later_stages() {
    let harness = build_pipeline("unused", true, false, false);

    let err = harness
        .pipeline
        .handle_message(Uuid::new_v4(), vec![ChatTurn::user("hello")])
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(PipelineStage::Retrieve));

    let log = harness.log.lock().unwrap();
    assert_eq!(*log, vec!["retrieve"]);
    assert!(harness.store.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_generation_failure_persists_nothing() {
    let harness = build_pipeline("some context", false, true, false);

    let err = harness
        .pipeline
        .handle_message(Uuid::new_v4(), vec![ChatTurn::user("hello")])
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(PipelineStage::Generate));
    assert!(err.to_string().contains("model unavailable"));
    assert!(harness.store.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_fails_the_call() {
    let harness = build_pipeline("some context", false, false, true);

    let err = harness
        .pipeline
        .handle_message(Uuid::new_v4(), vec![ChatTurn::user("hello")])
        .await
        .unwrap_err();

    // The reply was generated but never stored, so the caller sees an error
    assert_eq!(err.stage(), Some(PipelineStage::Persist));

    let log = harness.log.lock().unwrap();
    assert_eq!(*log, vec!["retrieve", "generate", "persist"]);
    assert!(harness.store.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_messages_run_independently() -> Result<()> {
    let harness = Arc::new(build_pipeline("shared context", false, false, false));

    let first = {
        let harness = harness.clone();
        let session = Uuid::new_v4();
        tokio::spawn(async move {
            harness
                .pipeline
                .handle_message(session, vec![ChatTurn::user("one")])
                .await
        })
    };
    let second = {
        let harness = harness.clone();
        let session = Uuid::new_v4();
        tokio::spawn(async move {
            harness
                .pipeline
                .handle_message(session, vec![ChatTurn::user("two")])
                .await
        })
    };

    first.await.unwrap()?;
    second.await.unwrap()?;

    let saved = harness.store.saved.lock().unwrap();
    assert_eq!(saved.len(), 2);
    assert_ne!(saved[0].0, saved[1].0);

    Ok(())
}
