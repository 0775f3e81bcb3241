//! WASM bindings for storybook-engine — powers the in-browser editor.
//!
//! Everything crosses the boundary as JSON strings. Only the pure parts
//! are exposed: probing and external generation stay on the server.

use wasm_bindgen::prelude::*;

use storybook_engine::assets::resolver::{AssetResolver, SeedMode};
use storybook_engine::core::josa::Josa;
use storybook_engine::core::outline::suggest_outline;
use storybook_engine::core::reconcile::{parse_passages, reconcile};
use storybook_engine::core::stage::arc;
use storybook_engine::core::synthesizer::synthesize;
use storybook_engine::schema::page::PageText;
use storybook_engine::{GenerationBatch, StorybookConfig};

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct StageInfo {
    ordinal: usize,
    stage: usize,
    sentence: &'static str,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// StorybookDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StorybookDemo {
    resolver: AssetResolver,
}

#[wasm_bindgen]
impl StorybookDemo {
    /// Create an instance from an optional RON configuration string.
    #[wasm_bindgen(constructor)]
    pub fn new(config_ron: Option<String>) -> Result<StorybookDemo, JsError> {
        let config = match config_ron {
            Some(src) => StorybookConfig::parse_ron(&src)
                .map_err(|e| JsError::new(&format!("Config parse error: {e}")))?,
            None => StorybookConfig::default(),
        };
        Ok(StorybookDemo {
            resolver: AssetResolver::new(config.image),
        })
    }

    /// Synthesize passages for a batch.
    ///
    /// Expected JSON shape:
    /// ```json
    /// {
    ///   "meta": {"hero": "토르", "world": "우주", "theme": "용기"},
    ///   "pages": [{"index": 0, "keywords": ["로켓", "별"]}]
    /// }
    /// ```
    /// Returns a JSON array of `{index, text}`.
    pub fn synthesize(&self, batch_json: &str) -> Result<String, JsError> {
        let body: serde_json::Value = serde_json::from_str(batch_json)
            .map_err(|e| JsError::new(&format!("Invalid batch JSON: {e}")))?;
        let batch = GenerationBatch::from_json(&body)
            .map_err(|e| JsError::new(&format!("Invalid batch: {e}")))?;
        to_json(&synthesize(batch.meta(), batch.pages()))
    }

    /// Reconcile a raw model answer against a JSON array of requested
    /// indices. Returns `{pages, unfilled}`.
    pub fn reconcile(&self, requested_json: &str, raw: &str) -> Result<String, JsError> {
        let requested: Vec<u32> = serde_json::from_str(requested_json)
            .map_err(|e| JsError::new(&format!("Invalid index list: {e}")))?;
        let passages =
            parse_passages(raw).map_err(|e| JsError::new(&format!("Reconciliation error: {e}")))?;
        let outcome = reconcile(&requested, passages)
            .map_err(|e| JsError::new(&format!("Reconciliation error: {e}")))?;
        to_json(&outcome)
    }

    /// Renderer URL for a prompt. Without a seed a random one is drawn.
    pub fn resolve_url(&self, prompt: &str, style: &str, seed: Option<u64>) -> String {
        self.resolver.resolve_url(prompt, style, seed)
    }

    /// Stable (or, with `fresh`, re-rolled) URL for a page.
    pub fn page_url(&self, index: u32, text: &str, style: &str, fresh: bool) -> String {
        let page = PageText {
            index,
            text: text.to_string(),
        };
        let mode = if fresh { SeedMode::Fresh } else { SeedMode::Stable };
        self.resolver.page_url(&page, style, mode)
    }

    pub fn placeholder_url(&self, index: u32) -> String {
        self.resolver.placeholder_url(index)
    }

    /// Keyword gallery URLs as a JSON array.
    pub fn gallery(&self, keywords_json: &str, limit: usize, style: &str) -> Result<String, JsError> {
        let keywords: Vec<String> = serde_json::from_str(keywords_json)
            .map_err(|e| JsError::new(&format!("Invalid keyword list: {e}")))?;
        to_json(&self.resolver.urls_for_keywords(&keywords, limit, style))
    }

    /// Outline lines for an editor as a JSON array.
    pub fn outline(keywords_json: &str, page_count: usize) -> Result<String, JsError> {
        let keywords: Vec<String> = serde_json::from_str(keywords_json)
            .map_err(|e| JsError::new(&format!("Invalid keyword list: {e}")))?;
        to_json(&suggest_outline(&keywords, page_count))
    }

    /// Stage of every page of a `total`-page story as a JSON array.
    pub fn arc(total: usize) -> Result<String, JsError> {
        let stages: Vec<StageInfo> = arc(total)
            .into_iter()
            .enumerate()
            .map(|(ordinal, stage)| StageInfo {
                ordinal,
                stage: stage.index(),
                sentence: stage.sentence(),
            })
            .collect();
        to_json(&stages)
    }

    /// `word` with its object particle attached (사과 → 사과를).
    pub fn with_object_particle(word: &str) -> String {
        Josa::Object.attach(word)
    }
}
