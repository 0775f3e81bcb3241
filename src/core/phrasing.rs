/// Scene phrasing — the lead sentence of each page.
///
/// A page's lead sentence depends only on whether it opens the book and
/// which arc stage it sits at. That pair selects one of five scenes, and
/// each scene is a template function over the page's cues. Keeping the
/// scenes in a table indexed by [`Scene::slot`] means every reachable
/// `(is_first_page, stage)` combination has exactly one phrasing.

use crate::core::josa::Josa;
use crate::schema::stage::Stage;

/// The rhetorical pattern used for a page's lead sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    /// First page of the book: introduces the hero and the world.
    Opening,
    /// Later page early in the arc: the adventure deepens.
    EarlyDevelopment,
    /// Later page mid-arc: something unexpected happens.
    IncitingIncident,
    /// Later page near the peak: the biggest crisis.
    Climax,
    /// Final stretch: looking back.
    Denouement,
}

impl Scene {
    pub const ALL: [Scene; 5] = [
        Scene::Opening,
        Scene::EarlyDevelopment,
        Scene::IncitingIncident,
        Scene::Climax,
        Scene::Denouement,
    ];

    /// Select the scene for a page.
    pub fn for_page(is_first_page: bool, stage: Stage) -> Self {
        if is_first_page {
            return Self::Opening;
        }
        match stage {
            Stage::Opening | Stage::RisingAction => Self::EarlyDevelopment,
            Stage::Disruption => Self::IncitingIncident,
            Stage::Climax => Self::Climax,
            Stage::Resolution => Self::Denouement,
        }
    }

    /// Position of this scene in the phrasebook.
    pub fn slot(&self) -> usize {
        match self {
            Self::Opening => 0,
            Self::EarlyDevelopment => 1,
            Self::IncitingIncident => 2,
            Self::Climax => 3,
            Self::Denouement => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::EarlyDevelopment => "early_development",
            Self::IncitingIncident => "inciting_incident",
            Self::Climax => "climax",
            Self::Denouement => "denouement",
        }
    }

    /// Render the lead sentence for this scene.
    pub fn phrase(&self, cues: &SceneCues<'_>) -> String {
        PHRASEBOOK[self.slot()](cues)
    }
}

/// Everything a scene template may interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCues<'a> {
    pub world: &'a str,
    pub hero: &'a str,
    /// The page's first keyword.
    pub focus: Option<&'a str>,
    /// Remaining keywords, already joined ("A, B 그리고 C").
    pub supporting: Option<&'a str>,
}

impl SceneCues<'_> {
    /// "{world}에서 " or nothing when no world was given.
    fn setting(&self) -> String {
        if self.world.is_empty() {
            String::new()
        } else {
            format!("{}에서 ", self.world)
        }
    }

    fn hero_topic(&self) -> String {
        Josa::Topic.attach(self.hero)
    }
}

type Phrasing = fn(&SceneCues<'_>) -> String;

const PHRASEBOOK: [Phrasing; 5] = [
    opening,
    early_development,
    inciting_incident,
    climax,
    denouement,
];

fn opening(cues: &SceneCues<'_>) -> String {
    let setting = cues.setting();
    let hero = cues.hero_topic();
    match (cues.focus, cues.supporting) {
        (Some(focus), Some(rest)) => format!(
            "{setting}{hero} {focus} 속에서 하루하루를 보내며, {rest}에 대한 생각으로 가슴이 두근거리기 시작합니다."
        ),
        (Some(focus), None) => format!(
            "{setting}{hero} {} 바라보며 곧 특별한 모험이 시작될 것 같은 예감을 받습니다.",
            Josa::Object.attach(focus)
        ),
        (None, _) => format!(
            "{setting}{hero} 아직 이름 붙일 수 없는 무언가를 향해 조용히 마음이 끌리는 것을 느낍니다."
        ),
    }
}

fn early_development(cues: &SceneCues<'_>) -> String {
    let setting = cues.setting();
    let hero = cues.hero_topic();
    match (cues.focus, cues.supporting) {
        (Some(focus), Some(rest)) => format!(
            "{setting}{hero} {} 함께 {} 지나 조금 더 깊은 모험 속으로 발을 내딛습니다.",
            Josa::With.attach(focus),
            Josa::Object.attach(rest)
        ),
        (Some(focus), None) => format!(
            "{setting}{hero} {} 함께 조금 더 깊은 모험 속으로 발을 내딛습니다.",
            Josa::With.attach(focus)
        ),
        (None, _) => format!(
            "{setting}{}의 발걸음은 서서히 모험의 중심으로 향하고 있습니다.",
            cues.hero
        ),
    }
}

fn inciting_incident(cues: &SceneCues<'_>) -> String {
    let setting = cues.setting();
    match (cues.focus, cues.supporting) {
        (Some(focus), Some(rest)) => format!(
            "{setting}{} 앞에 {} {} 얽힌 예상치 못한 일이 벌어집니다.",
            cues.hero,
            Josa::With.attach(focus),
            Josa::Subject.attach(rest)
        ),
        (Some(focus), None) => format!(
            "{setting}{} 앞에 {focus} 때문에 예상치 못한 일이 벌어집니다.",
            cues.hero
        ),
        (None, _) => format!(
            "{setting}{} 갑작스러운 사건을 맞이해 당황하고 맙니다.",
            cues.hero_topic()
        ),
    }
}

fn climax(cues: &SceneCues<'_>) -> String {
    let setting = cues.setting();
    let hero = cues.hero_topic();
    match (cues.focus, cues.supporting) {
        (Some(focus), Some(rest)) => format!(
            "{setting}{hero} {focus} 속에서 {rest}까지 짊어진 채 지금까지와는 비교할 수 없는 큰 위기에 맞섭니다."
        ),
        (Some(focus), None) => format!(
            "{setting}{hero} {focus} 속에서 지금까지와는 비교할 수 없는 큰 위기에 맞섭니다."
        ),
        (None, _) => format!("{setting}{hero} 드디어 가장 큰 시련과 마주하게 됩니다."),
    }
}

fn denouement(cues: &SceneCues<'_>) -> String {
    let setting = cues.setting();
    let hero = cues.hero_topic();
    match (cues.focus, cues.supporting) {
        (Some(focus), Some(rest)) => format!(
            "{setting}{hero} {} 함께 긴 모험의 끝자락에 서서 {} 떠올리며 오늘을 되돌아봅니다.",
            Josa::With.attach(focus),
            Josa::Object.attach(rest)
        ),
        (Some(focus), None) => format!(
            "{setting}{hero} {} 함께 긴 모험의 끝자락에 서서 오늘을 되돌아봅니다.",
            Josa::With.attach(focus)
        ),
        (None, _) => format!(
            "{setting}{hero} 긴 여정을 지나온 뒤, 조용히 숨을 고르며 마음을 정리합니다."
        ),
    }
}
