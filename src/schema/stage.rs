use serde::{Deserialize, Serialize};

/// The five positions of the dramatic arc a page can occupy.
///
/// Pages are spread across the arc by their relative position in the
/// story, so a three-page book and a twelve-page book both open on
/// `Opening` and close on `Resolution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Opening,
    RisingAction,
    Disruption,
    Climax,
    Resolution,
}

impl Stage {
    /// All stages in arc order.
    pub const ALL: [Stage; 5] = [
        Stage::Opening,
        Stage::RisingAction,
        Stage::Disruption,
        Stage::Climax,
        Stage::Resolution,
    ];

    /// Build a stage from its arc index. Out-of-range values clamp to
    /// `Resolution`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Zero-based position in the arc (0..=4).
    pub fn index(&self) -> usize {
        match self {
            Self::Opening => 0,
            Self::RisingAction => 1,
            Self::Disruption => 2,
            Self::Climax => 3,
            Self::Resolution => 4,
        }
    }

    /// The fixed sentence appended to every page at this stage.
    pub fn sentence(&self) -> &'static str {
        match self {
            Self::Opening => "이제 막 이야기가 시작되는 순간입니다.",
            Self::RisingAction => "모험의 흐름이 조금씩 빨라지기 시작합니다.",
            Self::Disruption => "뜻밖의 사건으로 이야기가 크게 흔들립니다.",
            Self::Climax => "가장 긴장되는 장면이 펼쳐지고 있습니다.",
            Self::Resolution => "이야기는 서서히 따뜻한 결말을 향해 나아갑니다.",
        }
    }

    /// Short Korean name of the stage, as used in writing prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Opening => "발단",
            Self::RisingAction => "전개",
            Self::Disruption => "위기",
            Self::Climax => "절정",
            Self::Resolution => "결말",
        }
    }

    /// Returns the tag string for this stage (e.g., "stage:climax").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Opening => "stage:opening",
            Self::RisingAction => "stage:rising_action",
            Self::Disruption => "stage:disruption",
            Self::Climax => "stage:climax",
            Self::Resolution => "stage:resolution",
        }
    }
}
