use serde::{Deserialize, Serialize};

/// Hero noun used when the caller leaves the hero blank.
pub const DEFAULT_HERO: &str = "주인공";

/// Story-level context shared by every page of one request.
///
/// All fields are free text used only as interpolation fragments; the
/// engine never interprets their content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub hero: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub world: String,
    #[serde(default)]
    pub theme: String,
}

impl StoryMeta {
    /// Hero for interpolation, falling back to [`DEFAULT_HERO`].
    pub fn hero(&self) -> &str {
        let hero = first_item(&self.hero);
        if hero.is_empty() {
            DEFAULT_HERO
        } else {
            hero
        }
    }

    pub fn title(&self) -> &str {
        first_item(&self.title)
    }

    pub fn genre(&self) -> &str {
        first_item(&self.genre)
    }

    pub fn world(&self) -> &str {
        first_item(&self.world)
    }

    pub fn theme(&self) -> &str {
        first_item(&self.theme)
    }
}

/// Editors often let users type several candidates separated by commas
/// ("바다, 숲속, 우주"); only the first non-blank one is used.
fn first_item(value: &str) -> &str {
    value
        .split(',')
        .map(str::trim)
        .find(|part| !part.is_empty())
        .unwrap_or("")
}
