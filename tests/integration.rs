use std::path::Path;
use std::sync::Arc;

use neuromentor_core::config::Config;
use neuromentor_core::mentor::Mentor;
use neuromentor_core::search::{SearchError, SearchHit, WebSearch};
use neuromentor_core::wellness::OFF_TOPIC_MESSAGE;
use neuromentor_core::{Mood, Scope, analyze_mood};
use neuromentor_llm::mock::MockProvider;
use neuromentor_rag::{
    AnswerComposer, NO_CONTENT_MESSAGE, RagError, RetrievalConfig, Retriever, chunk_text,
};

// -- Deterministic embedding: letter histogram over a-z --

fn letters(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 26];
    for c in text.chars().filter(char::is_ascii_alphabetic) {
        let i = (c.to_ascii_lowercase() as u8 - b'a') as usize;
        v[i] += 1.0;
    }
    v
}

fn mentor_with(responses: &[&str]) -> (Arc<MockProvider>, Mentor<MockProvider>) {
    let provider = Arc::new(
        MockProvider::with_responses(responses.iter().map(|r| (*r).to_owned()).collect())
            .with_embed_fn(letters),
    );
    let mentor = Mentor::from_config(Arc::clone(&provider), &Config::default());
    (provider, mentor)
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// -- Document question answering --

#[tokio::test]
async fn ask_merged_documents_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let notes = write(dir.path(), "notes.txt", "Breathing exercises calm the body.");
    let plan = write(dir.path(), "plan.md", "# Plan\nSleep eight hours.");

    let (provider, mentor) = mentor_with(&["Slow breathing helps.\n"]);
    let document = mentor.load_files(&[notes, plan]).await.unwrap();
    assert_eq!(
        document,
        "Breathing exercises calm the body.\n\n# Plan\nSleep eight hours."
    );

    let answer = mentor
        .ask_document(&document, "How do I calm down?")
        .await
        .unwrap();
    assert_eq!(answer, "Slow breathing helps.");

    let prompt = provider.last_prompt().unwrap();
    assert!(prompt.starts_with("You are helping based on the following extracted document sections:"));
    assert!(prompt.contains("Section 1:\nBreathing exercises calm the body."));
    assert!(prompt.ends_with("Question: How do I calm down?\nAnswer:"));
}

#[tokio::test]
async fn empty_document_gets_no_content_message() {
    let dir = tempfile::tempdir().unwrap();
    let empty = write(dir.path(), "empty.txt", "");

    let (provider, mentor) = mentor_with(&[]);
    let document = mentor.load_files(&[empty]).await.unwrap();
    assert_eq!(
        mentor.ask_document(&document, "anything").await.unwrap(),
        NO_CONTENT_MESSAGE
    );
    assert_eq!(
        mentor.summarize_document(&document).await.unwrap(),
        NO_CONTENT_MESSAGE
    );
    assert_eq!(provider.chat_calls(), 0);
    assert_eq!(provider.embed_calls(), 0);
}

#[tokio::test]
async fn unsupported_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let image = write(dir.path(), "photo.png", "not text");
    let (_, mentor) = mentor_with(&[]);
    assert!(mentor.load_files(&[image]).await.is_err());
}

#[tokio::test]
async fn cat_and_mat_retrieves_a_single_original_chunk() {
    let doc = "A cat sat on a mat. ".repeat(400);
    let chunks = chunk_text(&doc, 300);
    assert_eq!(chunks.len(), 8);
    assert!(chunks.iter().all(|c| c.split_whitespace().count() == 300));

    let provider = Arc::new(MockProvider::default().with_embed_fn(letters));
    let composer = AnswerComposer::from_provider(Arc::clone(&provider), RetrievalConfig::default());
    let hits = composer
        .retriever()
        .retrieve_top(&doc, "What did the cat do?", 1)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!(chunks.contains(&hits[0].content));
}

#[tokio::test]
async fn retrieval_returns_k_distinct_chunks_in_distance_order() {
    let doc = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    let provider = Arc::new(MockProvider::default().with_embed_fn(letters));
    let retriever = Retriever::new(
        neuromentor_rag::ProviderEmbedder::new(Arc::clone(&provider)),
        RetrievalConfig {
            chunk_size: 2,
            top_k: 3,
        },
    );
    let hits = retriever.retrieve(doc, "eta theta").await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].content, "eta theta");
    assert!(hits[0].distance.abs() < f32::EPSILON);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    let mut positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
    positions.sort_unstable();
    positions.dedup();
    assert_eq!(positions.len(), 3);
}

#[tokio::test]
async fn failed_question_does_not_affect_the_next() {
    let provider = Arc::new(
        MockProvider::with_responses(vec!["second answer".into()]).with_embed_fn(letters),
    );
    let failing = AnswerComposer::from_provider(
        Arc::new(MockProvider::default().with_failing_embed()),
        RetrievalConfig::default(),
    );
    let err = failing.compose_answer("some text", "q").await.unwrap_err();
    assert!(matches!(err, RagError::Embedding(_)));

    let composer = AnswerComposer::from_provider(Arc::clone(&provider), RetrievalConfig::default());
    assert_eq!(
        composer.compose_answer("some text", "q").await.unwrap(),
        "second answer"
    );
}

#[tokio::test]
async fn blank_model_reply_is_not_an_answer() {
    let (_, mentor) = mentor_with(&["  \n  ", "\t"]);
    let err = mentor
        .ask_document("Breathing exercises calm the body.", "How do I calm down?")
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::Model(_)));
    assert!(mentor.summarize_document("Some notes.").await.is_err());
}

// -- Image analysis --

#[tokio::test]
async fn image_upload_gets_emotional_reading() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.png");
    std::fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();

    let (provider, mentor) = mentor_with(&["Warm, hopeful and quietly joyful."]);
    let reading = mentor.analyze_image(&photo).await.unwrap();
    assert_eq!(reading, "Warm, hopeful and quietly joyful.");

    let sent = &provider.recorded()[0][0];
    assert!(sent.content.contains("emotional atmosphere"));
    assert_eq!(sent.images[0].mime_type, "image/png");
}

// -- Wellness chat --

#[tokio::test]
async fn chat_relevant_then_off_topic() {
    let (provider, mentor) = mentor_with(&["relevant", "You've got this 🌱", "irrelevant"]);

    assert_eq!(mentor.chat("I'm nervous about my exam").await, "You've got this 🌱");
    assert_eq!(mentor.chat("best pizza in town?").await, OFF_TOPIC_MESSAGE);
    assert_eq!(provider.chat_calls(), 3);
}

#[tokio::test]
async fn classify_fails_closed_when_model_is_down() {
    let mentor = Mentor::from_config(Arc::new(MockProvider::failing()), &Config::default());
    assert_eq!(mentor.classify("I feel lost").await, Scope::Irrelevant);
}

#[test]
fn mood_heuristic() {
    assert_eq!(analyze_mood("So excited for the weekend!"), Mood::Happy);
    assert_eq!(analyze_mood("I feel tense"), Mood::Stressed);
}

// -- Web answers --

struct CannedSearch;

impl WebSearch for CannedSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        Ok(vec![
            SearchHit {
                title: "Sleep hygiene".into(),
                link: "https://example.org/sleep".into(),
                snippet: "Keep a regular bedtime.".into(),
            },
            SearchHit {
                title: "Naps".into(),
                link: "https://example.org/naps".into(),
                snippet: "Short naps are fine.".into(),
            },
        ])
    }
}

#[tokio::test]
async fn web_answer_with_references() {
    let (provider, mentor) = mentor_with(&["Go to bed at the same time each night."]);
    let mentor = mentor.with_web_search(CannedSearch, 3);

    let result = mentor.web_answer("How can I sleep better?").await.unwrap();
    assert_eq!(result.answer, "Go to bed at the same time each night.");
    assert_eq!(
        result.references,
        vec!["https://example.org/sleep", "https://example.org/naps"]
    );
    let prompt = provider.last_prompt().unwrap();
    assert!(prompt.contains("- Keep a regular bedtime.\n- Short naps are fine.\n"));
}
