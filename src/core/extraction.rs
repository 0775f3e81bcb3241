//! Pulling the JSON body out of a model response.
//!
//! Models wrap JSON in markdown fences or surround it with prose that may
//! itself contain brackets. Candidates are tried in order: `json`-tagged fences,
//! other fences, then every balanced array or object by position. The
//! first candidate that parses as JSON wins.

/// Extract a JSON document from `response`, or `None` if there is none.
///
/// When no candidate parses, the first one is returned so the caller can
/// report the parse error.
pub fn extract_json(response: &str) -> Option<String> {
    let blocks = code_blocks(response);
    let tagged = blocks
        .iter()
        .filter(|(tag, _)| tag.eq_ignore_ascii_case("json"))
        .map(|(_, body)| *body);
    let untagged = blocks
        .iter()
        .filter(|(tag, _)| !tag.eq_ignore_ascii_case("json"))
        .map(|(_, body)| *body);
    let balanced = response
        .char_indices()
        .filter(|&(_, ch)| ch == '[' || ch == '{')
        .filter_map(|(start, _)| extract_balanced(response, start));

    let mut first = None;
    for candidate in tagged.chain(untagged).chain(balanced) {
        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
            return Some(candidate.to_string());
        }
        first.get_or_insert(candidate);
    }
    first.map(str::to_string)
}

/// Every ``` fence as `(language tag, trimmed body)`, skipping empty
/// bodies. An unterminated fence (truncated response) runs to the end.
fn code_blocks(response: &str) -> Vec<(&str, &str)> {
    let mut blocks = Vec::new();
    let mut rest = response;

    while let Some(start) = rest.find("```") {
        let after_fence = &rest[start + 3..];
        let (tag, body_and_rest) = match after_fence.find('\n') {
            Some(n) => (after_fence[..n].trim(), &after_fence[n + 1..]),
            None => ("", after_fence),
        };
        let (body, next) = match body_and_rest.find("```") {
            Some(end) => (&body_and_rest[..end], &body_and_rest[end + 3..]),
            None => (body_and_rest, ""),
        };
        let body = body.trim();
        if !body.is_empty() {
            blocks.push((tag, body));
        }
        rest = next;
    }
    blocks
}

/// Text from the delimiter at byte `start` up to its matching close,
/// skipping delimiters inside JSON strings.
fn extract_balanced(response: &str, start: usize) -> Option<&str> {
    let open = response[start..].chars().next()?;
    let close = match open {
        '[' => ']',
        '{' => '}',
        _ => return None,
    };
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..start + i + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
