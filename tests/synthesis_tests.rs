/// Synthesis integration tests — JSON batch in, staged Korean passages out.

use storybook_engine::core::josa::{inflect, Josa};
use storybook_engine::core::stage::{arc, stage_index};
use storybook_engine::core::synthesizer::synthesize;
use storybook_engine::schema::batch::BatchError;
use storybook_engine::schema::stage::Stage;
use storybook_engine::GenerationBatch;

fn load_batch() -> GenerationBatch {
    let contents = std::fs::read_to_string("tests/fixtures/space_batch.json").unwrap();
    let body: serde_json::Value = serde_json::from_str(&contents).unwrap();
    GenerationBatch::from_json(&body).unwrap()
}

#[test]
fn fixture_batch_is_normalized() {
    let batch = load_batch();
    assert_eq!(batch.requested_indices(), vec![0, 1, 2, 3]);
    assert_eq!(batch.meta().hero(), "토르");
    assert_eq!(batch.pages()[1].keywords, vec!["달", "토끼"]);
    assert_eq!(batch.pages()[2].keywords, vec!["블랙홀"]);
    assert!(batch.pages()[3].keywords.is_empty());
}

#[test]
fn fixture_batch_passages() {
    let batch = load_batch();
    let pages = synthesize(batch.meta(), batch.pages());
    let theme = "이 장면 속에서도 토르는 '용기'의 의미를 조금씩 깨닫고 있습니다.";

    let expected = [
        format!(
            "우주에서 토르는 로켓 속에서 하루하루를 보내며, 발사장에 대한 생각으로 가슴이 두근거리기 시작합니다. {} {}",
            Stage::Opening.sentence(),
            theme
        ),
        format!(
            "우주에서 토르는 달과 함께 토끼를 지나 조금 더 깊은 모험 속으로 발을 내딛습니다. {} {}",
            Stage::RisingAction.sentence(),
            theme
        ),
        format!(
            "우주에서 토르는 블랙홀 속에서 지금까지와는 비교할 수 없는 큰 위기에 맞섭니다. {} {}",
            Stage::Climax.sentence(),
            theme
        ),
        format!(
            "우주에서 토르는 긴 여정을 지나온 뒤, 조용히 숨을 고르며 마음을 정리합니다. {} {}",
            Stage::Resolution.sentence(),
            theme
        ),
    ];

    assert_eq!(pages.len(), expected.len());
    for (page, expected) in pages.iter().zip(expected.iter()) {
        assert_eq!(&page.text, expected, "page {}", page.index);
    }
}

#[test]
fn synthesis_is_byte_identical_across_calls() {
    let batch = load_batch();
    let first = synthesize(batch.meta(), batch.pages());
    let second = synthesize(batch.meta(), batch.pages());
    assert_eq!(first, second);
}

#[test]
fn particle_reference_table() {
    let table = [
        ("사과", "를"),
        ("나무", "를"),
        ("토끼", "를"),
        ("바다", "를"),
        ("사람", "을"),
        ("책", "을"),
        ("주인공", "을"),
        ("별", "을"),
        ("", "를"),
        ("rocket", "를"),
        ("3", "를"),
    ];
    for (word, particle) in table {
        assert_eq!(inflect(word), particle, "inflect({:?})", word);
    }
    assert_eq!(Josa::With.attach("달"), "달과");
    assert_eq!(Josa::Topic.attach("토르"), "토르는");
}

#[test]
fn stage_endpoints_and_monotonicity() {
    for total in 1..=40 {
        let stages: Vec<usize> = (0..total).map(|o| stage_index(o, total)).collect();
        assert_eq!(stages[0], 0);
        if total > 1 {
            assert_eq!(stages[total - 1], 4, "total {}", total);
        }
        assert!(stages.windows(2).all(|w| w[0] <= w[1]), "total {}", total);
        assert!(stages.iter().all(|&s| s <= 4));
    }
}

#[test]
fn even_page_counts_round_half_to_even() {
    // 3 pages: 1/2 * 4 = 2 exactly; 9 pages: 1/8 * 4 = 0.5 rounds to 0.
    assert_eq!(arc(3)[1], Stage::Disruption);
    assert_eq!(stage_index(1, 9), 0);
    assert_eq!(stage_index(3, 9), 2);
}

#[test]
fn invalid_batches_are_rejected_before_synthesis() {
    let cases = [
        (serde_json::json!({}), BatchError::NoPages),
        (serde_json::json!({"pages": []}), BatchError::NoPages),
        (serde_json::json!({"pages": {"index": 0}}), BatchError::PagesNotAList),
        (
            serde_json::json!({"pages": [1]}),
            BatchError::PageNotObject { position: 0 },
        ),
        (
            serde_json::json!({"pages": [{"index": 0}, {"index": 0}]}),
            BatchError::DuplicateIndex(0),
        ),
    ];
    for (body, expected) in cases {
        assert_eq!(GenerationBatch::from_json(&body).unwrap_err(), expected);
    }

    let err = GenerationBatch::from_json(&serde_json::json!({"pages": [{"index": 1.5}]})).unwrap_err();
    assert!(matches!(err, BatchError::InvalidIndex { position: 0, .. }));
}
