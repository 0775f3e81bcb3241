//! The story operations callers use.
//!
//! [`StoryService`] owns a text generator, a reachability checker and the
//! configuration. It holds no per-story state: every operation takes the
//! pages it works on and returns new values.

use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::assets::probe::{AvailabilityProbe, HttpReachability, ReachabilityCheck};
use crate::assets::resolver::{AssetResolver, SeedMode};
use crate::config::StorybookConfig;
use crate::core::outline::suggest_outline;
use crate::core::reconcile::{parse_passages, reconcile, Reconciliation};
use crate::core::synthesizer::{synthesize, synthesize_page};
use crate::error::StoryError;
use crate::external::gemini::GeminiClient;
use crate::external::generator::TextGenerator;
use crate::external::translate::translate_batch;
use crate::external::writer::write_external;
use crate::schema::batch::GenerationBatch;
use crate::schema::page::{PageImage, PageText, StoryPage};

/// Where page passages come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritingMode {
    /// Rule-based synthesis only. Never fails.
    #[default]
    Synthesized,
    /// The external generator only. Its failures are returned.
    External,
    /// The external generator, with synthesized text for anything it
    /// fails to deliver.
    ExternalWithFallback,
}

pub struct StoryService<G, C> {
    generator: G,
    probe: AvailabilityProbe<C>,
    config: StorybookConfig,
}

impl StoryService<Option<GeminiClient>, HttpReachability> {
    /// Service backed by Gemini and plain HTTP probing.
    ///
    /// A missing `GEMINI_API_KEY` is not an error here; external writing
    /// then fails with
    /// [`crate::external::generator::GenerationError::NoApiKey`] when requested.
    pub fn from_config(config: StorybookConfig) -> Result<Self, reqwest::Error> {
        let generator = match GeminiClient::from_env(&config.generator) {
            Ok(client) => Some(client),
            Err(e) => {
                info!(error = %e, "external writer disabled");
                None
            }
        };
        let checker = HttpReachability::new(&config.probe)?;
        Ok(Self::new(generator, checker, config))
    }
}

impl<G, C> StoryService<G, C>
where
    G: TextGenerator,
    C: ReachabilityCheck,
{
    pub fn new(generator: G, checker: C, config: StorybookConfig) -> Self {
        let resolver = AssetResolver::new(config.image.clone());
        let probe = AvailabilityProbe::new(checker, resolver, &config.probe);
        Self {
            generator,
            probe,
            config,
        }
    }

    pub fn config(&self) -> &StorybookConfig {
        &self.config
    }

    pub fn resolver(&self) -> &AssetResolver {
        self.probe.resolver()
    }

    /// Rule-based passages for every page of `batch`, in order.
    pub fn synthesize_narrative(&self, batch: &GenerationBatch) -> Vec<PageText> {
        synthesize(batch.meta(), batch.pages())
    }

    /// Parse and reconcile a raw external answer against `requested`.
    pub fn reconcile_external_output(
        &self,
        requested: &[u32],
        raw: &str,
    ) -> Result<Reconciliation, StoryError> {
        let passages = parse_passages(raw)?;
        Ok(reconcile(requested, passages)?)
    }

    /// Write every page of `batch` according to `mode`.
    #[instrument(skip(self, batch), fields(pages = batch.len()))]
    pub async fn write_pages(
        &self,
        batch: &GenerationBatch,
        mode: WritingMode,
    ) -> Result<Reconciliation, StoryError> {
        match mode {
            WritingMode::Synthesized => Ok(Reconciliation {
                pages: self.synthesize_narrative(batch),
                unfilled: Vec::new(),
            }),
            WritingMode::External => write_external(&self.generator, batch).await,
            WritingMode::ExternalWithFallback => {
                match write_external(&self.generator, batch).await {
                    Ok(outcome) => Ok(fill_unwritten(batch, outcome)),
                    Err(e) => {
                        warn!(error = %e, "external writing failed, synthesizing instead");
                        Ok(Reconciliation {
                            pages: self.synthesize_narrative(batch),
                            unfilled: Vec::new(),
                        })
                    }
                }
            }
        }
    }

    /// Stable illustration for a page, probed; falls back to the page's
    /// placeholder.
    #[instrument(skip(self, page, style), fields(index = page.index))]
    pub async fn resolve_image_for_page(&self, page: &PageText, style: &str) -> PageImage {
        let url = self.resolver().page_url(page, style, SeedMode::Stable);
        PageImage {
            index: page.index,
            url: self.probe.ensure_reachable_default(&url, page.index).await,
        }
    }

    /// Resolve every page concurrently. Results keep input order.
    #[instrument(skip(self, pages, style), fields(pages = pages.len()))]
    pub async fn resolve_images(&self, pages: &[PageText], style: &str) -> Vec<PageImage> {
        join_all(pages.iter().map(|page| self.resolve_image_for_page(page, style))).await
    }

    /// A new illustration for an unchanged page: same prompt, fresh seed.
    #[instrument(skip(self, page, style), fields(index = page.index))]
    pub async fn regenerate_image(&self, page: &PageText, style: &str) -> PageImage {
        let url = self.resolver().page_url(page, style, SeedMode::Fresh);
        PageImage {
            index: page.index,
            url: self.probe.ensure_reachable_default(&url, page.index).await,
        }
    }

    /// Translate all passages in one request into the configured
    /// language. Count mismatches keep the originals.
    pub async fn translate_pages(&self, pages: &[PageText]) -> Result<Vec<PageText>, StoryError> {
        let texts: Vec<String> = pages.iter().map(|p| p.text.clone()).collect();
        let translated = translate_batch(
            &self.generator,
            &texts,
            &self.config.generator.target_language,
        )
        .await?;

        Ok(pages
            .iter()
            .zip(translated)
            .map(|(page, text)| PageText {
                index: page.index,
                text,
            })
            .collect())
    }

    /// Pair passages with their illustrations, in passage order. A page
    /// with no resolved image gets its placeholder.
    pub fn finalize(&self, texts: &[PageText], images: &[PageImage]) -> Vec<StoryPage> {
        texts
            .iter()
            .map(|page| {
                let image_url = images
                    .iter()
                    .find(|image| image.index == page.index)
                    .map(|image| image.url.clone())
                    .unwrap_or_else(|| self.resolver().placeholder_url(page.index));
                StoryPage {
                    index: page.index,
                    text: page.text.clone(),
                    image_url,
                }
            })
            .collect()
    }

    /// Numbered scene suggestions for an editor.
    pub fn outline(&self, keywords: &[String], page_count: usize) -> Vec<String> {
        suggest_outline(keywords, page_count)
    }

    /// Unprobed illustration URLs for a keyword gallery.
    pub fn gallery(&self, keywords: &[String], limit: usize, style: &str) -> Vec<String> {
        self.resolver().urls_for_keywords(keywords, limit, style)
    }

    pub async fn write_and_illustrate(
        &self,
        batch: &GenerationBatch,
        mode: WritingMode,
        style: &str,
    ) -> Result<Vec<StoryPage>, StoryError> {
        let written = self.write_pages(batch, mode).await?;
        let images = self.resolve_images(&written.pages, style).await;
        Ok(self.finalize(&written.pages, &images))
    }
}

/// Synthesize the pages an external answer left unwritten, keeping
/// submission order.
fn fill_unwritten(batch: &GenerationBatch, outcome: Reconciliation) -> Reconciliation {
    if outcome.unfilled.is_empty() {
        return outcome;
    }
    warn!(unfilled = ?outcome.unfilled, "synthesizing unwritten pages");

    let total = batch.len();
    let pages = batch
        .pages()
        .iter()
        .enumerate()
        .map(|(ordinal, request)| {
            outcome
                .pages
                .iter()
                .find(|page| page.index == request.index)
                .cloned()
                .unwrap_or_else(|| synthesize_page(batch.meta(), request, ordinal, total))
        })
        .collect();

    Reconciliation {
        pages,
        unfilled: Vec::new(),
    }
}
