use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::page::PageRequest;
use super::story::StoryMeta;

/// Reasons a request is rejected before any generation is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("no pages")]
    NoPages,
    #[error("`pages` must be a list")]
    PagesNotAList,
    #[error("page at position {position} is not an object")]
    PageNotObject { position: usize },
    #[error("page at position {position} has a non-integer index: {value}")]
    InvalidIndex { position: usize, value: String },
    #[error("duplicate page index {0}")]
    DuplicateIndex(u32),
}

/// One generation request: story context plus the pages to fill, in
/// submission order. Has no identity beyond the call that carries it.
///
/// A batch always has at least one page and no repeated index. Every
/// way of building one, deserialization included, goes through
/// [`GenerationBatch::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedBatch")]
pub struct GenerationBatch {
    meta: StoryMeta,
    pages: Vec<PageRequest>,
}

/// Wire form of a batch before validation.
#[derive(Deserialize)]
struct UncheckedBatch {
    #[serde(default)]
    meta: StoryMeta,
    #[serde(default)]
    pages: Vec<PageRequest>,
}

impl TryFrom<UncheckedBatch> for GenerationBatch {
    type Error = BatchError;

    fn try_from(raw: UncheckedBatch) -> Result<Self, Self::Error> {
        Self::new(raw.meta, raw.pages)
    }
}

impl GenerationBatch {
    /// Build a batch, enforcing a non-empty page list with unique indices.
    pub fn new(meta: StoryMeta, pages: Vec<PageRequest>) -> Result<Self, BatchError> {
        if pages.is_empty() {
            return Err(BatchError::NoPages);
        }
        ensure_unique(pages.iter().map(|p| p.index))?;
        Ok(Self { meta, pages })
    }

    /// Validate an untyped request body of the form
    /// `{"meta": {...}, "pages": [{"index": 0, "keywords": [...]}, ...]}`.
    ///
    /// A page without an index takes its position in the list. Indices
    /// given as numeric strings are accepted; anything else that is not
    /// a non-negative integer rejects the whole batch.
    pub fn from_json(body: &Value) -> Result<Self, BatchError> {
        let meta = body
            .get("meta")
            .and_then(Value::as_object)
            .map(meta_from_object)
            .unwrap_or_default();

        let raw_pages = match body.get("pages") {
            None | Some(Value::Null) => return Err(BatchError::NoPages),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(BatchError::PagesNotAList),
        };

        let mut pages = Vec::with_capacity(raw_pages.len());
        for (position, raw) in raw_pages.iter().enumerate() {
            let page = raw
                .as_object()
                .ok_or(BatchError::PageNotObject { position })?;
            let index = parse_index(page.get("index"), position)?;
            let keywords = parse_keywords(page.get("keywords"));
            pages.push(PageRequest { index, keywords });
        }

        Self::new(meta, pages)
    }

    pub fn meta(&self) -> &StoryMeta {
        &self.meta
    }

    /// Pages in submission order.
    pub fn pages(&self) -> &[PageRequest] {
        &self.pages
    }

    /// Indices in submission order.
    pub fn requested_indices(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.index).collect()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Reject the first repeated index in `indices`.
pub fn ensure_unique(indices: impl IntoIterator<Item = u32>) -> Result<(), BatchError> {
    let mut seen = FxHashSet::default();
    for index in indices {
        if !seen.insert(index) {
            return Err(BatchError::DuplicateIndex(index));
        }
    }
    Ok(())
}

fn meta_from_object(obj: &Map<String, Value>) -> StoryMeta {
    StoryMeta {
        title: text_field(obj, "title"),
        hero: text_field(obj, "hero"),
        genre: text_field(obj, "genre"),
        world: text_field(obj, "world"),
        theme: text_field(obj, "theme"),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_index(raw: Option<&Value>, position: usize) -> Result<u32, BatchError> {
    let invalid = |value: &Value| BatchError::InvalidIndex {
        position,
        value: value.to_string(),
    };

    match raw {
        None | Some(Value::Null) => {
            u32::try_from(position).map_err(|_| BatchError::InvalidIndex {
                position,
                value: position.to_string(),
            })
        }
        Some(value @ Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid(value)),
        Some(value @ Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid(value)),
        Some(other) => Err(invalid(other)),
    }
}

fn parse_keywords(raw: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
