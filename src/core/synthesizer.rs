/// Rule-based passage synthesis: page keywords + story context → text.
///
/// Each passage is the scene's lead sentence, the fixed sentence for the
/// page's arc stage, and (when the story has a theme) a closing line
/// about the theme, separated by single spaces. Nothing here is random:
/// the same request always yields byte-identical passages.

use tracing::debug;

use crate::core::josa::Josa;
use crate::core::phrasing::{Scene, SceneCues};
use crate::core::stage;
use crate::schema::page::{PageRequest, PageText};
use crate::schema::story::StoryMeta;

/// Connective placed before the last supporting keyword.
const FINAL_CONNECTIVE: &str = " 그리고 ";

/// A page's keywords split into its focus and the joined remainder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSplit {
    pub focus: Option<String>,
    pub supporting: Option<String>,
}

/// Split keywords into the focus (first) and the rest joined as
/// "A, B 그리고 C". Blank keywords are ignored.
pub fn split_keywords(keywords: &[String]) -> KeywordSplit {
    let cleaned: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();

    match cleaned.split_first() {
        None => KeywordSplit::default(),
        Some((focus, rest)) => KeywordSplit {
            focus: Some(focus.to_string()),
            supporting: join_supporting(rest),
        },
    }
}

fn join_supporting(rest: &[&str]) -> Option<String> {
    match rest {
        [] => None,
        [only] => Some(only.to_string()),
        [init @ .., last] => Some(format!("{}{}{}", init.join(", "), FINAL_CONNECTIVE, last)),
    }
}

/// Synthesize one passage per page, in submission order.
pub fn synthesize(meta: &StoryMeta, pages: &[PageRequest]) -> Vec<PageText> {
    let total = pages.len();
    pages
        .iter()
        .enumerate()
        .map(|(ordinal, page)| synthesize_page(meta, page, ordinal, total))
        .collect()
}

/// Synthesize the passage for the page at `ordinal` of `total`.
pub fn synthesize_page(
    meta: &StoryMeta,
    page: &PageRequest,
    ordinal: usize,
    total: usize,
) -> PageText {
    let split = split_keywords(&page.keywords);
    let stage = stage::stage(ordinal, total);
    let scene = Scene::for_page(ordinal == 0, stage);

    let cues = SceneCues {
        world: meta.world(),
        hero: meta.hero(),
        focus: split.focus.as_deref(),
        supporting: split.supporting.as_deref(),
    };

    let mut parts = vec![scene.phrase(&cues), stage.sentence().to_string()];
    if let Some(closing) = theme_sentence(meta) {
        parts.push(closing);
    }

    debug!(
        index = page.index,
        ordinal,
        stage = stage.tag(),
        scene = scene.name(),
        "synthesized page"
    );

    PageText {
        index: page.index,
        text: parts.join(" "),
    }
}

/// Closing line about the story's theme, if it has one.
fn theme_sentence(meta: &StoryMeta) -> Option<String> {
    let theme = meta.theme();
    if theme.is_empty() {
        return None;
    }
    Some(format!(
        "이 장면 속에서도 {} '{}'의 의미를 조금씩 깨닫고 있습니다.",
        Josa::Topic.attach(meta.hero()),
        theme
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::stage::Stage;

    fn meta() -> StoryMeta {
        StoryMeta {
            title: "우주여행1".to_string(),
            genre: "모험".to_string(),
            world: "우주".to_string(),
            theme: "용기".to_string(),
            hero: "토르".to_string(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_empty() {
        assert_eq!(split_keywords(&[]), KeywordSplit::default());
        assert_eq!(split_keywords(&strings(&["", "  "])), KeywordSplit::default());
    }

    #[test]
    fn split_single() {
        let split = split_keywords(&strings(&["로켓"]));
        assert_eq!(split.focus.as_deref(), Some("로켓"));
        assert_eq!(split.supporting, None);
    }

    #[test]
    fn split_two_and_many() {
        let split = split_keywords(&strings(&["로켓", "발사장"]));
        assert_eq!(split.supporting.as_deref(), Some("발사장"));

        let split = split_keywords(&strings(&["로켓", "별", "달", "지구"]));
        assert_eq!(split.focus.as_deref(), Some("로켓"));
        assert_eq!(split.supporting.as_deref(), Some("별, 달 그리고 지구"));
    }

    #[test]
    fn first_page_opening_text() {
        let page = PageRequest::new(0, &["로켓", "발사장"]);
        let out = synthesize_page(&meta(), &page, 0, 3);
        assert_eq!(
            out.text,
            "우주에서 토르는 로켓 속에서 하루하루를 보내며, 발사장에 대한 생각으로 가슴이 두근거리기 시작합니다. \
             이제 막 이야기가 시작되는 순간입니다. \
             이 장면 속에서도 토르는 '용기'의 의미를 조금씩 깨닫고 있습니다."
        );
    }

    #[test]
    fn no_theme_means_two_sentences() {
        let meta = StoryMeta {
            hero: "토르".to_string(),
            ..Default::default()
        };
        let out = synthesize_page(&meta, &PageRequest::new(5, &[]), 2, 3);
        assert_eq!(out.index, 5);
        assert_eq!(
            out.text,
            "토르는 긴 여정을 지나온 뒤, 조용히 숨을 고르며 마음을 정리합니다. \
             이야기는 서서히 따뜻한 결말을 향해 나아갑니다."
        );
    }

    #[test]
    fn synthesize_preserves_order_and_indices() {
        let pages = vec![
            PageRequest::new(9, &["숲"]),
            PageRequest::new(2, &["여우"]),
            PageRequest::new(4, &["달"]),
        ];
        let out = synthesize(&meta(), &pages);
        assert_eq!(out.iter().map(|p| p.index).collect::<Vec<_>>(), vec![9, 2, 4]);
        assert!(out[0].text.contains(Stage::Opening.sentence()));
        assert!(out[1].text.contains(Stage::Disruption.sentence()));
        assert!(out[2].text.contains(Stage::Resolution.sentence()));
    }

    #[test]
    fn synthesize_is_deterministic() {
        let pages: Vec<PageRequest> = (0..7)
            .map(|i| PageRequest::new(i, &["사과", "나무", "토끼"]))
            .collect();
        assert_eq!(synthesize(&meta(), &pages), synthesize(&meta(), &pages));
    }

    #[test]
    fn blank_hero_uses_default_noun() {
        let out = synthesize_page(&StoryMeta::default(), &PageRequest::new(0, &[]), 0, 1);
        assert!(out.text.starts_with("주인공은 "), "{}", out.text);
    }

    #[test]
    fn single_spaces_between_parts() {
        let out = synthesize(&meta(), &[PageRequest::new(0, &["별"])]);
        assert!(!out[0].text.contains("  "));
    }
}
