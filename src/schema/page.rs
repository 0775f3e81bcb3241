use serde::{Deserialize, Serialize};

/// A page as submitted for generation: its caller-assigned index and
/// the keywords that seed its passage.
///
/// The first keyword is the page's focus; the rest are supporting
/// details woven into the same sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub index: u32,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PageRequest {
    pub fn new(index: u32, keywords: &[&str]) -> Self {
        Self {
            index,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Keywords with surrounding whitespace removed and blanks dropped.
    pub fn clean_keywords(&self) -> Vec<&str> {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// A page once its passage exists, either synthesized locally or
/// accepted from an external generator after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub index: u32,
    pub text: String,
}

/// The illustration resolved for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    pub index: u32,
    pub url: String,
}

/// A finished page, ready to hand to whatever stores the story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPage {
    pub index: u32,
    pub text: String,
    pub image_url: String,
}
