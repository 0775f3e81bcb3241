//! Writing passages with an external text model.
//!
//! The model is asked for a JSON list of `{index, text}` records, one per
//! requested page. Its answer is untrusted: it is parsed leniently and
//! then reconciled onto the requested indices.

use tracing::{debug, instrument, warn};

use crate::core::reconcile::{parse_passages, reconcile, Reconciliation};
use crate::core::stage;
use crate::error::StoryError;
use crate::external::generator::TextGenerator;
use crate::schema::batch::GenerationBatch;

/// Build the writing prompt for a batch.
///
/// Each page line carries its index, arc stage and keywords so the model
/// can pace the story the same way the local synthesizer does.
pub fn story_prompt(batch: &GenerationBatch) -> String {
    let meta = batch.meta();
    let total = batch.len();
    let mut prompt = String::from(
        "당신은 어린이 그림동화 작가입니다. 아래 정보로 각 페이지의 본문을 한국어로 2~3문장씩 써 주세요.\n\n",
    );

    let context = [
        ("제목", meta.title()),
        ("주인공", meta.hero()),
        ("장르", meta.genre()),
        ("배경", meta.world()),
        ("주제", meta.theme()),
    ];
    for (label, value) in context {
        if !value.is_empty() {
            prompt.push_str(&format!("{}: {}\n", label, value));
        }
    }

    prompt.push_str("\n페이지:\n");
    for (ordinal, page) in batch.pages().iter().enumerate() {
        let stage = stage::stage(ordinal, total);
        let keywords = page.clean_keywords();
        let keywords = if keywords.is_empty() {
            "(자유)".to_string()
        } else {
            keywords.join(", ")
        };
        prompt.push_str(&format!(
            "- index {}: [{}] 키워드: {}\n",
            page.index,
            stage.label(),
            keywords
        ));
    }

    prompt.push_str(
        "\n반드시 다음 형식의 JSON 배열만 출력하세요. 다른 설명은 쓰지 마세요.\n\
         [{\"index\": <페이지 index>, \"text\": \"<본문>\"}]\n",
    );
    prompt
}

/// Ask `generator` to write every page of `batch` and reconcile the
/// answer onto the requested indices.
///
/// Generator failures surface as [`StoryError::ExternalGeneration`];
/// unusable answers as [`StoryError::Reconciliation`]. Neither is
/// replaced with synthesized text here.
#[instrument(skip(generator, batch), fields(pages = batch.len()))]
pub async fn write_external<G>(generator: &G, batch: &GenerationBatch) -> Result<Reconciliation, StoryError>
where
    G: TextGenerator + ?Sized,
{
    let prompt = story_prompt(batch);
    let raw = generator.generate(&prompt).await.map_err(|e| {
        warn!(error = %e, "external writer failed");
        e
    })?;

    let passages = parse_passages(&raw)?;
    debug!(received = passages.len(), "parsed external passages");

    let requested = batch.requested_indices();
    let outcome = reconcile(&requested, passages)?;
    for (ordinal, &index) in requested.iter().enumerate() {
        if outcome.unfilled.contains(&index) {
            warn!(
                index,
                stage = stage::stage(ordinal, requested.len()).tag(),
                "page left unwritten by external generator"
            );
        }
    }
    Ok(outcome)
}
