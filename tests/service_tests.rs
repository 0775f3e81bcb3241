//! Service integration tests — writing modes, image resolution and
//! finalization with in-memory generators and checkers.
#![cfg(feature = "http")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use storybook_engine::assets::probe::{ProbeFailure, ReachabilityCheck};
use storybook_engine::config::StorybookConfig;
use storybook_engine::core::reconcile::ReconcileError;
use storybook_engine::external::generator::{GenerationError, TextGenerator};
use storybook_engine::schema::page::{PageImage, PageRequest, PageText};
use storybook_engine::schema::story::StoryMeta;
use storybook_engine::{GenerationBatch, StoryError, StoryService, WritingMode};

/// Returns the same answer to every prompt.
struct Canned(Result<String, GenerationError>);

#[async_trait]
impl TextGenerator for Canned {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.0.clone()
    }
}

/// Reachable unless the URL contains `deny`; counts calls.
struct Checker {
    deny: Option<String>,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl ReachabilityCheck for Checker {
    async fn check(&self, url: &str) -> Result<(), ProbeFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.deny {
            Some(marker) if url.contains(marker.as_str()) => Err(ProbeFailure::Timeout),
            _ => Ok(()),
        }
    }
}

fn build(
    answer: Result<String, GenerationError>,
    deny: Option<String>,
) -> (StoryService<Canned, Checker>, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let mut config = StorybookConfig::default();
    config.probe.backoff_step_ms = 1;
    let checker = Checker {
        deny,
        calls: Arc::clone(&calls),
    };
    (StoryService::new(Canned(answer), checker, config), calls)
}

fn batch() -> GenerationBatch {
    let meta = StoryMeta {
        hero: "토르".to_string(),
        world: "우주".to_string(),
        ..Default::default()
    };
    GenerationBatch::new(
        meta,
        vec![
            PageRequest::new(2, &["로켓"]),
            PageRequest::new(5, &["달"]),
            PageRequest::new(9, &["지구"]),
        ],
    )
    .unwrap()
}

#[test]
fn deserialized_batches_cannot_skip_validation() {
    let empty = serde_json::from_str::<GenerationBatch>(r#"{"meta": {}, "pages": []}"#);
    assert!(empty.unwrap_err().to_string().contains("no pages"));

    let repeated = serde_json::from_str::<GenerationBatch>(r#"{"pages": [{"index": 3}, {"index": 3}]}"#);
    assert!(repeated.unwrap_err().to_string().contains("duplicate page index 3"));
}

#[tokio::test]
async fn synthesized_mode_never_calls_the_generator() {
    let (service, _) = build(Err(GenerationError::NoApiKey), None);
    let out = service.write_pages(&batch(), WritingMode::Synthesized).await.unwrap();
    assert_eq!(out.pages.iter().map(|p| p.index).collect::<Vec<_>>(), vec![2, 5, 9]);
    assert_eq!(out.pages, service.synthesize_narrative(&batch()));
}

#[tokio::test]
async fn external_mode_surfaces_failures() {
    let (service, _) = build(Err(GenerationError::Api { status: 503, message: "busy".into() }), None);
    let err = service.write_pages(&batch(), WritingMode::External).await.unwrap_err();
    assert!(matches!(err, StoryError::ExternalGeneration(GenerationError::Api { status: 503, .. })));

    let (service, _) = build(Ok("[]".to_string()), None);
    let err = service.write_pages(&batch(), WritingMode::External).await.unwrap_err();
    assert!(matches!(err, StoryError::Reconciliation(ReconcileError::Empty)));
}

#[tokio::test]
async fn fallback_mode_synthesizes_on_failure() {
    let (service, _) = build(Err(GenerationError::Timeout), None);
    let out = service
        .write_pages(&batch(), WritingMode::ExternalWithFallback)
        .await
        .unwrap();
    assert_eq!(out.pages, service.synthesize_narrative(&batch()));
    assert!(out.unfilled.is_empty());
}

#[tokio::test]
async fn fallback_mode_fills_unwritten_pages() {
    let answer = r#"[{"index": 0, "text": "로켓 이야기"}, {"index": 1, "text": "달 이야기"}]"#;
    let (service, _) = build(Ok(answer.to_string()), None);
    let out = service
        .write_pages(&batch(), WritingMode::ExternalWithFallback)
        .await
        .unwrap();

    assert_eq!(out.pages.len(), 3);
    assert_eq!(out.pages[0].text, "로켓 이야기");
    assert_eq!(out.pages[1].text, "달 이야기");
    assert_eq!(out.pages[2], service.synthesize_narrative(&batch())[2]);
    assert!(out.unfilled.is_empty());
}

#[tokio::test]
async fn reconcile_external_output_validates_requested() {
    let (service, _) = build(Ok(String::new()), None);
    let out = service
        .reconcile_external_output(&[7], r#"[{"index": 0, "text": "x"}]"#)
        .unwrap();
    assert_eq!(out.pages, vec![PageText { index: 7, text: "x".to_string() }]);

    let err = service.reconcile_external_output(&[], "[]").unwrap_err();
    assert!(matches!(err, StoryError::Reconciliation(_)));
}

#[tokio::test]
async fn images_keep_order_and_fall_back_per_page() {
    let pages = vec![
        PageText { index: 3, text: "고래".to_string() },
        PageText { index: 1, text: "폭풍".to_string() },
        PageText { index: 8, text: "무지개".to_string() },
    ];
    let denied = urlencoding::encode("폭풍").into_owned();
    let (service, calls) = build(Ok(String::new()), Some(denied));

    let images = service.resolve_images(&pages, "").await;
    assert_eq!(images.iter().map(|i| i.index).collect::<Vec<_>>(), vec![3, 1, 8]);
    assert!(images[0].url.starts_with("https://image.pollinations.ai/prompt/"));
    assert_eq!(images[1].url, service.resolver().placeholder_url(1));
    assert!(images[2].url.contains("seed="));
    // One call each for the reachable pages, two for the denied one.
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn stable_images_repeat_and_regeneration_changes_seed() {
    let (service, _) = build(Ok(String::new()), None);
    let page = PageText { index: 0, text: "달빛 아래 토끼".to_string() };

    let first = service.resolve_image_for_page(&page, "연필 스케치").await;
    let second = service.resolve_image_for_page(&page, "연필 스케치").await;
    assert_eq!(first, second);

    let fresh = service.regenerate_image(&page, "연필 스케치").await;
    let strip = |url: &str| url.split('&').filter(|p| !p.starts_with("seed=")).collect::<Vec<_>>().join("&");
    let seed = |url: &str| url.split('&').find(|p| p.starts_with("seed=")).map(str::to_string);
    assert_eq!(strip(&fresh.url), strip(&first.url));
    assert!(seed(&first.url).is_some());
    assert_ne!(seed(&fresh.url), seed(&first.url));
}

#[tokio::test]
async fn translation_mismatch_keeps_text() {
    let pages = vec![
        PageText { index: 0, text: "하나".to_string() },
        PageText { index: 1, text: "둘".to_string() },
    ];

    let (service, _) = build(Ok(r#"["one"]"#.to_string()), None);
    assert_eq!(service.translate_pages(&pages).await.unwrap(), pages);

    let (service, _) = build(Ok(r#"["one", "two"]"#.to_string()), None);
    let translated = service.translate_pages(&pages).await.unwrap();
    assert_eq!(translated[1], PageText { index: 1, text: "two".to_string() });
}

#[tokio::test]
async fn finalize_pairs_by_index_with_placeholders() {
    let (service, _) = build(Ok(String::new()), None);
    let texts = vec![
        PageText { index: 4, text: "a".to_string() },
        PageText { index: 6, text: "b".to_string() },
    ];
    let images = vec![PageImage { index: 6, url: "https://img/6".to_string() }];

    let story = service.finalize(&texts, &images);
    assert_eq!(story[0].image_url, service.resolver().placeholder_url(4));
    assert_eq!(story[1].image_url, "https://img/6");
    assert_eq!(story[1].text, "b");
}

#[tokio::test]
async fn write_and_illustrate_end_to_end() {
    let (service, _) = build(Err(GenerationError::NoApiKey), None);
    let story = service
        .write_and_illustrate(&batch(), WritingMode::Synthesized, "")
        .await
        .unwrap();
    assert_eq!(story.iter().map(|p| p.index).collect::<Vec<_>>(), vec![2, 5, 9]);
    assert!(story.iter().all(|p| !p.text.is_empty() && p.image_url.contains("seed=")));
}
