/// Local page outlines: one-line scene suggestions built from keywords,
/// used to prefill an editor before any passage exists.

use crate::core::josa::Josa;

/// Fewest and most pages an outline may suggest.
pub const MIN_OUTLINE_PAGES: usize = 1;
pub const MAX_OUTLINE_PAGES: usize = 5;

/// Clamp a requested page count into the outline range.
pub fn clamp_page_count(requested: usize) -> usize {
    requested.clamp(MIN_OUTLINE_PAGES, MAX_OUTLINE_PAGES)
}

/// Placeholder subject for a page with no keyword of its own.
pub fn scene_label(ordinal: usize) -> String {
    format!("장면 {}", ordinal + 1)
}

/// Suggest one numbered outline line per page.
///
/// Keyword `i` becomes the subject of page `i`; pages beyond the
/// keyword list fall back to "장면 n".
pub fn suggest_outline(keywords: &[String], page_count: usize) -> Vec<String> {
    let page_count = clamp_page_count(page_count);
    let keywords: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();

    (0..page_count)
        .map(|i| {
            let subject = keywords
                .get(i)
                .map(|k| k.to_string())
                .unwrap_or_else(|| scene_label(i));
            format!(
                "{}. '{}'{} 주제로 한 장면.",
                i + 1,
                subject,
                Josa::Object.for_word(&subject)
            )
        })
        .collect()
}
