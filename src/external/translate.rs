//! All-or-nothing batch translation.
//!
//! Every passage goes out in one request. If the model answers with a
//! different number of items, none of its answer is used and the
//! original passages come back unchanged.

use serde_json::Value;
use tracing::{instrument, warn};

use crate::core::extraction::extract_json;
use crate::external::generator::{GenerationError, TextGenerator};

/// Prompt asking for a JSON array of translations in input order.
pub fn translation_prompt(texts: &[String], target_language: &str) -> String {
    let payload = serde_json::to_string(texts).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Translate each string in the following JSON array into {}. \
         Keep the order and the number of items. \
         Reply with a JSON array of strings only.\n{}",
        target_language, payload
    )
}

/// Parse a translation answer into strings. Non-string items are kept as
/// their JSON text so the count is preserved.
pub fn parse_translations(raw: &str) -> Result<Vec<String>, GenerationError> {
    let json = extract_json(raw)
        .ok_or_else(|| GenerationError::Parse("no JSON array in translation".to_string()))?;
    let items: Vec<Value> =
        serde_json::from_str(&json).map_err(|e| GenerationError::Parse(e.to_string()))?;

    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

/// Translate `texts` in one request.
///
/// An empty input makes no request. A count mismatch returns `texts`
/// unchanged; transport and parse failures are errors.
#[instrument(skip(generator, texts), fields(items = texts.len()))]
pub async fn translate_batch<G>(
    generator: &G,
    texts: &[String],
    target_language: &str,
) -> Result<Vec<String>, GenerationError>
where
    G: TextGenerator + ?Sized,
{
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let raw = generator
        .generate(&translation_prompt(texts, target_language))
        .await?;
    let translated = parse_translations(&raw)?;

    if translated.len() != texts.len() {
        warn!(
            expected = texts.len(),
            received = translated.len(),
            "translation count mismatch, keeping originals"
        );
        return Ok(texts.to_vec());
    }
    Ok(translated)
}
