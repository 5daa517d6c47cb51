//! Service-level tests: generation through the gateway and saving results.

use autoagents_llm::LLMProvider;
use blogsmith_rs_config::BlogsmithConfig;
use blogsmith_rs_core::{Blogsmith, GENERATION_FAILED_MESSAGE, GenerationError};
use blogsmith_rs_history::{FileHistoryProvider, HistoryProvider, InMemoryHistoryProvider};
use blogsmith_rs_protocol::{ContentType, GenerationRequest};
use blogsmith_rs_test_utils::{EmptyResponseLLM, FailingLLM, RecordingChatLLM, user};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::tempdir;

fn service(llm: Arc<dyn LLMProvider>) -> Blogsmith {
    Blogsmith::new(
        BlogsmithConfig::default(),
        Arc::new(InMemoryHistoryProvider::new()),
        llm,
    )
}

fn cats_request() -> GenerationRequest {
    GenerationRequest::new(ContentType::Blog, "Medium", "Casual", "Write about cats")
}

/// A valid request reaches the model once and its text comes back verbatim.
#[tokio::test]
async fn generate_returns_model_text_verbatim() {
    let llm = Arc::new(RecordingChatLLM::new("  Cats are wonderful.\n"));
    let blogsmith = service(llm.clone());

    let text = blogsmith
        .gateway()
        .expect("gateway")
        .generate(&cats_request())
        .await
        .expect("generate");

    assert_eq!(text, "  Cats are wonderful.\n");
    assert_eq!(llm.calls(), 1);
}

/// A short prompt is rejected before the model is contacted.
#[tokio::test]
async fn short_prompt_never_reaches_model() {
    let llm = Arc::new(RecordingChatLLM::new("unused"));
    let blogsmith = service(llm.clone());
    let request = GenerationRequest::new(ContentType::Tweet, "Short", "Witty", "cats");

    let err = blogsmith
        .gateway()
        .expect("gateway")
        .generate(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidInput(_)));
    assert_eq!(llm.calls(), 0);
}

/// Model failures surface as the fixed user-facing message.
#[tokio::test]
async fn model_failure_maps_to_generation_failed() {
    for llm in [
        Arc::new(FailingLLM::new("quota exceeded")) as Arc<dyn LLMProvider>,
        Arc::new(EmptyResponseLLM),
    ] {
        let err = service(llm)
            .gateway()
            .expect("gateway")
            .generate(&cats_request())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::GenerationFailed {
                message: GENERATION_FAILED_MESSAGE.to_string()
            }
        );
    }
}

/// Generated content saved through one store is visible to a fresh store.
#[tokio::test]
async fn saved_generation_survives_new_session() {
    let temp = tempdir().expect("tempdir");
    let history: Arc<dyn HistoryProvider> =
        Arc::new(FileHistoryProvider::new(temp.path().join("history")).expect("provider"));
    let blogsmith = Blogsmith::new(
        BlogsmithConfig::default(),
        history,
        Arc::new(RecordingChatLLM::new("Cats are...")),
    );

    let request = cats_request();
    let text = blogsmith
        .gateway()
        .expect("gateway")
        .generate(&request)
        .await
        .expect("generate");
    let first = blogsmith.history_store(user("writer@example.com"));
    first.load().await.expect("load");
    let saved = first
        .append(request.into_content(text))
        .await
        .expect("append");
    first.abandon();

    let second = blogsmith.history_store(user("writer@example.com"));
    let entries = second.load().await.expect("load");
    assert_eq!(entries.len(), 1);
    assert_eq!(second.get(&saved.id), Some(saved.clone()));
    assert_eq!(saved.content.generated_content, "Cats are...");

    let stranger = blogsmith.history_store(user("stranger@example.com"));
    assert!(stranger.load().await.expect("load").is_empty());
}
