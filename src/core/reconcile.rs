/// Reconciling externally generated passages with the requested pages.
///
/// A text model asked to write pages 2, 5 and 9 may answer with its own
/// numbering (often 0.., sometimes 1..), out of order, or with fewer
/// items than asked for. Its numbering is only trusted for ordering:
/// after sorting by the reported index, the n-th passage is assigned
/// the n-th requested index. Requested pages left without a passage are
/// reported in [`Reconciliation::unfilled`] and never invented.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::extraction::extract_json;
use crate::schema::batch::{ensure_unique, BatchError};
use crate::schema::page::PageText;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("generator returned no passages")]
    Empty,
    #[error("malformed generator payload: {0}")]
    Malformed(String),
    #[error("no page indices were requested")]
    NothingRequested,
    #[error("invalid requested indices: {0}")]
    InvalidRequest(#[from] BatchError),
}

/// One passage as the generator reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedPassage {
    /// The generator's own index, if it gave a usable one.
    pub index: Option<i64>,
    pub text: String,
}

impl ReceivedPassage {
    pub fn new(index: i64, text: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            text: text.into(),
        }
    }
}

/// Passages re-indexed onto the requested pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Filled pages, in requested order.
    pub pages: Vec<PageText>,
    /// Requested indices that received no passage.
    pub unfilled: Vec<u32>,
}

/// Parse a raw model response into passages.
///
/// Accepts a JSON array of `{index, text}` records or an object with a
/// `pages` array, optionally wrapped in a markdown fence or prose.
pub fn parse_passages(raw: &str) -> Result<Vec<ReceivedPassage>, ReconcileError> {
    let json = extract_json(raw).ok_or_else(|| {
        warn!(response_length = raw.len(), "no JSON found in generator response");
        ReconcileError::Malformed("no JSON found in response".to_string())
    })?;
    let value: Value =
        serde_json::from_str(&json).map_err(|e| ReconcileError::Malformed(e.to_string()))?;
    passages_from_value(&value)
}

/// Interpret an already-parsed payload as passages.
pub fn passages_from_value(value: &Value) -> Result<Vec<ReceivedPassage>, ReconcileError> {
    let records = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("pages") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ReconcileError::Malformed(
                    "object payload has no `pages` list".to_string(),
                ))
            }
        },
        other => {
            return Err(ReconcileError::Malformed(format!(
                "expected a list of passages, got {}",
                kind(other)
            )))
        }
    };

    if records.is_empty() {
        return Err(ReconcileError::Empty);
    }

    records
        .iter()
        .enumerate()
        .map(|(position, record)| passage_from_record(position, record))
        .collect()
}

fn passage_from_record(position: usize, record: &Value) -> Result<ReceivedPassage, ReconcileError> {
    let obj = record.as_object().ok_or_else(|| {
        ReconcileError::Malformed(format!("record {} is {}, not an object", position, kind(record)))
    })?;

    let text = match obj.get("text") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => {
            return Err(ReconcileError::Malformed(format!(
                "record {} has no text",
                position
            )))
        }
        // Structured passages are kept as their JSON text.
        Some(structured @ (Value::Object(_) | Value::Array(_))) => structured.to_string(),
        Some(scalar) => scalar.to_string(),
    };

    Ok(ReceivedPassage {
        index: obj.get("index").and_then(reported_index),
        text,
    })
}

fn reported_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Re-index `received` onto `requested`.
///
/// A single passage for a single requested page is pinned to that page
/// whatever index it reported. Otherwise passages are sorted by their
/// reported index (stable; passages without one keep arrival order after
/// the rest) and assigned requested indices positionally. Extra passages
/// are dropped; missing ones leave their requested index unfilled.
pub fn reconcile(
    requested: &[u32],
    mut received: Vec<ReceivedPassage>,
) -> Result<Reconciliation, ReconcileError> {
    if requested.is_empty() {
        return Err(ReconcileError::NothingRequested);
    }
    ensure_unique(requested.iter().copied())?;
    if received.is_empty() {
        return Err(ReconcileError::Empty);
    }

    if let ([only_requested], [only_received]) = (requested, received.as_slice()) {
        if only_received.index != Some(i64::from(*only_requested)) {
            debug!(
                requested = only_requested,
                reported = ?only_received.index,
                "pinning single passage to requested index"
            );
        }
        return Ok(Reconciliation {
            pages: vec![PageText {
                index: *only_requested,
                text: only_received.text.clone(),
            }],
            unfilled: Vec::new(),
        });
    }

    received.sort_by_key(|p| (p.index.is_none(), p.index.unwrap_or(0)));

    if received.len() > requested.len() {
        warn!(
            requested = requested.len(),
            received = received.len(),
            "dropping surplus passages"
        );
    }

    let pages: Vec<PageText> = requested
        .iter()
        .zip(received)
        .map(|(&index, passage)| PageText {
            index,
            text: passage.text,
        })
        .collect();
    let unfilled = requested[pages.len()..].to_vec();

    if !unfilled.is_empty() {
        warn!(?unfilled, "generator returned fewer passages than requested");
    }

    Ok(Reconciliation { pages, unfilled })
}
