//! Illustration URLs for pages.
//!
//! The renderer takes its prompt in the URL path and is steered by
//! query parameters. Identical prompts are cached upstream, so every
//! URL carries a seed: a stable one derived from the page content for
//! idempotent re-renders, or a random one when the caller explicitly
//! asks for a new picture.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::config::ImageConfig;
use crate::core::outline::{clamp_page_count, scene_label};
use crate::schema::page::PageText;

/// Quality suffix added to every prompt.
const QUALITY_BOOSTERS: &str = "high quality, detailed";

/// Look used when the style does not name a rendering medium.
const DEFAULT_LOOK: &str = "cute storybook illustration, soft colors, simple background";

/// Words that mark a style as naming its own rendering medium.
const MEDIUM_MARKERS: &[&str] = &[
    "스케치", "연필", "수채화", "파스텔", "벡터", "유화", "크레파스", "픽셀", "3d", "sketch",
    "pencil", "watercolor", "pastel", "vector", "oil", "crayon", "pixel", "anime", "photo",
];

/// How the seed of a page URL is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Derived from style, text and index: unchanged pages keep their picture.
    Stable,
    /// Random: forces a new picture for the same content.
    Fresh,
}

/// Whether `style` names a rendering medium of its own.
pub fn names_rendering_style(style: &str) -> bool {
    let style = style.trim().to_lowercase();
    !style.is_empty() && MEDIUM_MARKERS.iter().any(|marker| style.contains(marker))
}

/// Prepend the style preamble to a page prompt.
pub fn build_prompt(prompt: &str, style: &str) -> String {
    let preamble = if names_rendering_style(style) {
        format!("{}, {}", style.trim(), QUALITY_BOOSTERS)
    } else {
        format!("{}, {}", DEFAULT_LOOK, QUALITY_BOOSTERS)
    };
    format!("{}: {}", preamble, prompt.trim())
}

/// Stable seed for a page: the first 12 hex digits of
/// SHA-256(`"{style}|{text}|{index}"`).
pub fn page_seed(style: &str, text: &str, index: u32) -> u64 {
    let digest = Sha256::digest(format!("{}|{}|{}", style.trim(), text.trim(), index).as_bytes());
    digest[..6]
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

/// A fresh seed for explicit re-generation.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..=u64::from(u32::MAX))
}

/// Prompt for a page: its text, or "장면 n" when it has none.
pub fn page_prompt(page: &PageText) -> String {
    let text = page.text.trim();
    if text.is_empty() {
        scene_label(page.index as usize)
    } else {
        text.to_string()
    }
}

/// Builds renderer and placeholder URLs.
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    config: ImageConfig,
}

impl AssetResolver {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Renderer URL for `prompt` in `style`.
    ///
    /// With `Some(seed)` the result is a pure function of the inputs;
    /// with `None` a random seed is drawn.
    pub fn resolve_url(&self, prompt: &str, style: &str, seed: Option<u64>) -> String {
        let seed = seed.unwrap_or_else(random_seed);
        let encoded = urlencoding::encode(&build_prompt(prompt, style)).into_owned();
        format!(
            "{}{}?width={}&height={}&seed={}&model={}&nologo=true",
            self.config.base_url, encoded, self.config.width, self.config.height, seed, self.config.model
        )
    }

    /// Renderer URL for a page.
    pub fn page_url(&self, page: &PageText, style: &str, mode: SeedMode) -> String {
        let prompt = page_prompt(page);
        let seed = match mode {
            SeedMode::Stable => Some(page_seed(style, &page.text, page.index)),
            SeedMode::Fresh => None,
        };
        self.resolve_url(&prompt, style, seed)
    }

    /// Placeholder image for a page. Depends only on the index.
    pub fn placeholder_url(&self, index: u32) -> String {
        format!(
            "{}/{}x{}?text=Image%20{}",
            self.config.placeholder_base.trim_end_matches('/'),
            self.config.width,
            self.config.height,
            index
        )
    }

    /// One stable URL per keyword for a quick gallery; `limit` is clamped
    /// to the outline range and missing keywords become "장면 n".
    pub fn urls_for_keywords(&self, keywords: &[String], limit: usize, style: &str) -> Vec<String> {
        let keywords: Vec<&str> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        (0..clamp_page_count(limit))
            .map(|i| {
                let prompt = keywords
                    .get(i)
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| scene_label(i));
                let seed = page_seed(style, &prompt, i as u32);
                self.resolve_url(&prompt, style, Some(seed))
            })
            .collect()
    }
}
