//! Mention parsing, resolution, and autocomplete.
//!
//! A mention is `@` followed by word or hyphen characters. Resolution is
//! case-insensitive against an agent's id, display name, or display name with
//! internal whitespace removed ("Bob Two" resolves from `@bobtwo`). Hyphens
//! are deliberately NOT normalised: the token `bob-2` never matches the name
//! "Bob Two" -- it resolves by id only. That asymmetry matches the shipped
//! behaviour and is pinned by tests; do not "fix" it here.

use std::sync::LazyLock;

use regex::Regex;

use mc_api_types::ApiAgent;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([\w-]+)").expect("mention regex"));

/// All `@token` occurrences in `text`, in order, without the `@`.
pub fn mention_tokens(text: &str) -> Vec<&str> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Resolve one token against the roster.
pub fn resolve_mention<'a>(token: &str, roster: &'a [ApiAgent]) -> Option<&'a ApiAgent> {
    let needle = token.to_lowercase();
    roster.iter().find(|agent| {
        agent.id.to_lowercase() == needle
            || agent.name.to_lowercase() == needle
            || agent
                .name
                .split_whitespace()
                .collect::<String>()
                .to_lowercase()
                == needle
    })
}

/// Every distinct agent mentioned in `text`, in first-mention order.
pub fn resolve_all<'a>(text: &str, roster: &'a [ApiAgent]) -> Vec<&'a ApiAgent> {
    let mut seen: Vec<&ApiAgent> = Vec::new();
    for token in mention_tokens(text) {
        if let Some(agent) = resolve_mention(token, roster) {
            if !seen.iter().any(|a| a.id == agent.id) {
                seen.push(agent);
            }
        }
    }
    seen
}

/// Pick the chat routing target for `text`: the single mentioned agent, or
/// `fallback` when zero or several agents matched.
pub fn route_target(text: &str, roster: &[ApiAgent], fallback: &str) -> String {
    let resolved = resolve_all(text, roster);
    match resolved.as_slice() {
        [only] => only.id.clone(),
        _ => fallback.to_string(),
    }
}

/// The mention token currently being typed, if any: the text after an `@`
/// that sits at input start or after whitespace, with no space typed since.
/// Returns the byte offset of the `@` and the partial token.
pub fn active_mention(input: &str) -> Option<(usize, &str)> {
    let at = input.rfind('@')?;
    if at > 0 {
        let before = input[..at].chars().next_back()?;
        if !before.is_whitespace() {
            return None;
        }
    }
    let partial = &input[at + 1..];
    if partial.contains(char::is_whitespace) {
        return None;
    }
    Some((at, partial))
}

/// Case-insensitive prefix-or-substring filter over the roster for the
/// autocomplete dropdown. An empty partial matches everyone.
pub fn suggestions<'a>(partial: &str, roster: &'a [ApiAgent]) -> Vec<&'a ApiAgent> {
    let needle = partial.to_lowercase();
    roster
        .iter()
        .filter(|agent| {
            agent.id.to_lowercase().contains(&needle)
                || agent.name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Move a dropdown selection by `delta`, wrapping around both ends.
pub fn wrap_index(len: usize, current: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    let next = (current as isize + delta).rem_euclid(len);
    next as usize
}

/// Handles the human operator goes by in chat.
const USER_HANDLES: [&str; 4] = ["@human", "@user", "@boss", "@everyone"];

/// Heuristic scan for "this message addresses the human": a literal match
/// against a fixed set of handles. This is an approximation, not a mention
/// parser -- it can over- and under-count, and is kept isolated here so a
/// better policy can replace it wholesale.
pub fn mentions_user(text: &str) -> bool {
    let lower = text.to_lowercase();
    USER_HANDLES.iter().any(|h| lower.contains(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, name: &str) -> ApiAgent {
        ApiAgent {
            id: id.to_string(),
            name: name.to_string(),
            ..ApiAgent::default()
        }
    }

    fn roster() -> Vec<ApiAgent> {
        vec![agent("alice", "Alice"), agent("bob-2", "Bob Two")]
    }

    #[test]
    fn test_tokens_include_hyphens() {
        assert_eq!(
            mention_tokens("ping @alice about @bob-2"),
            vec!["alice", "bob-2"]
        );
        assert!(mention_tokens("no mentions here").is_empty());
    }

    #[test]
    fn test_resolution_by_id() {
        let roster = roster();
        let ids: Vec<&str> = resolve_all("ping @alice about @bob-2", &roster)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["alice", "bob-2"]);
    }

    #[test]
    fn test_resolution_by_name_ignores_case_and_spaces() {
        let roster = roster();
        assert_eq!(resolve_mention("ALICE", &roster).unwrap().id, "alice");
        assert_eq!(resolve_mention("bobtwo", &roster).unwrap().id, "bob-2");
    }

    #[test]
    fn hyphenated_token_does_not_match_spaced_name() {
        // "bob-2" must resolve via the id only. With the id absent from the
        // roster there is no space-insensitive match for a hyphenated token.
        let roster = vec![agent("b2", "Bob Two")];
        assert!(resolve_mention("bob-2", &roster).is_none());
    }

    #[test]
    fn test_duplicate_mentions_resolve_once() {
        let roster = roster();
        assert_eq!(resolve_all("@alice @alice @Alice", &roster).len(), 1);
    }

    #[test]
    fn test_route_single_match() {
        assert_eq!(route_target("@alice hello", &roster(), "main"), "alice");
    }

    #[test]
    fn test_route_multiple_matches_falls_back() {
        assert_eq!(route_target("@alice @bob-2 hi", &roster(), "main"), "main");
    }

    #[test]
    fn test_route_no_match_falls_back() {
        assert_eq!(route_target("hello there", &roster(), "main"), "main");
        assert_eq!(route_target("@stranger hi", &roster(), "main"), "main");
    }

    #[test]
    fn test_active_mention_positions() {
        assert_eq!(active_mention("@al"), Some((0, "al")));
        assert_eq!(active_mention("hey @bo"), Some((4, "bo")));
        assert_eq!(active_mention("hey @"), Some((4, "")));
        // Embedded in a word, or already followed by a space: not active.
        assert_eq!(active_mention("mail@example"), None);
        assert_eq!(active_mention("@alice said"), None);
        assert_eq!(active_mention("plain text"), None);
    }

    #[test]
    fn test_suggestions_prefix_and_substring() {
        let roster = roster();
        let hits = suggestions("bo", &roster);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "bob-2");
        // Substring match on the display name.
        let hits = suggestions("two", &roster);
        assert_eq!(hits.len(), 1);
        // Empty partial lists the whole roster.
        assert_eq!(suggestions("", &roster).len(), 2);
    }

    #[test]
    fn test_wrap_index_both_directions() {
        assert_eq!(wrap_index(3, 2, 1), 0);
        assert_eq!(wrap_index(3, 0, -1), 2);
        assert_eq!(wrap_index(3, 1, 1), 2);
        assert_eq!(wrap_index(0, 0, 1), 0);
    }

    #[test]
    fn test_mentions_user_literal_handles() {
        assert!(mentions_user("hey @human, review please"));
        assert!(mentions_user("CC @USER"));
        assert!(!mentions_user("ping @alice"));
    }
}
