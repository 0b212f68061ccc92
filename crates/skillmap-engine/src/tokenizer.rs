//! Text tokenization and query keyword extraction.
//!
//! Tokens are runs of ASCII letters and digits, lowercased. Everything else
//! (punctuation, whitespace, non-ASCII) separates tokens.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Tokens this short never become keywords.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Filler words and domain nouns too generic to tell skills apart.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // articles, conjunctions, prepositions
        "the", "and", "for", "but", "nor", "yet", "with", "from", "into", "onto", "over",
        "under", "about", "after", "before", "between", "through", "without", "within",
        "via", "per", "than", "then", "also", "just", "only", "very", "too",
        // pronouns and determiners
        "you", "your", "yours", "our", "ours", "they", "them", "their", "its", "this",
        "that", "these", "those", "what", "which", "who", "whom", "whose", "some", "any",
        "all", "each", "every", "other", "such", "own", "same", "both", "more", "most",
        // auxiliaries
        "are", "was", "were", "been", "being", "has", "have", "had", "having", "does",
        "did", "doing", "can", "could", "should", "would", "will", "shall", "may",
        "might", "must", "not", "when", "where", "why", "how", "here", "there",
        // request verbs
        "add", "get", "set", "run", "use", "using", "make", "create", "want", "need",
        "needs", "help", "please", "like", "let", "put", "try", "new",
        // domain nouns
        "skill", "skills", "project", "projects", "code", "app", "application",
    ]
    .into_iter()
    .collect()
});

/// Split `text` into lowercase alphanumeric tokens, in source order.
///
/// The iterator borrows `text`; call again to restart.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Whether `token` is in the stop-word set. Expects a lowercase token.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Extract the query keyword set from `text`.
///
/// Drops tokens shorter than [`MIN_KEYWORD_LEN`] and stop-words; duplicates
/// collapse.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    tokenize(text)
        .filter(|token| token.len() >= MIN_KEYWORD_LEN && !is_stop_word(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_and_lowercases() {
        let tokens: Vec<String> = tokenize("ASP.NET Core -- Minimal_API v2!").collect();
        assert_eq!(tokens, vec!["asp", "net", "core", "minimal", "api", "v2"]);
    }

    #[test]
    fn tokenize_empty_and_separator_only() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize(" --- !!! ").count(), 0);
    }

    #[test]
    fn tokenize_is_restartable() {
        let text = "git-commit conventional";
        let first: Vec<String> = tokenize(text).collect();
        let second: Vec<String> = tokenize(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn keywords_drop_stop_words_and_short_tokens() {
        let keywords = extract_keywords("Add an ERP module");
        assert!(!keywords.contains("add"));
        assert!(!keywords.contains("an"));
        assert!(keywords.contains("erp"));
        assert!(keywords.contains("module"));
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn keywords_drop_domain_nouns() {
        let keywords = extract_keywords("Project skill for code review");
        assert_eq!(keywords, BTreeSet::from(["review".to_string()]));
    }

    #[test]
    fn keywords_collapse_duplicates() {
        let keywords = extract_keywords("docker Docker DOCKER compose");
        assert_eq!(
            keywords,
            BTreeSet::from(["compose".to_string(), "docker".to_string()])
        );
    }

    #[test]
    fn two_char_tokens_are_dropped() {
        assert!(extract_keywords("ui db js").is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tokens_are_lowercase_alphanumeric(text in any::<String>()) {
                for token in tokenize(&text) {
                    prop_assert!(!token.is_empty());
                    prop_assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
                }
            }

            #[test]
            fn retokenizing_joined_output_is_idempotent(text in any::<String>()) {
                let tokens: Vec<String> = tokenize(&text).collect();
                let joined = tokens.join(" ");
                let again: Vec<String> = tokenize(&joined).collect();
                prop_assert_eq!(tokens, again);
            }

            #[test]
            fn keywords_are_long_tokens(text in "[A-Za-z0-9 ,.-]{0,64}") {
                for keyword in extract_keywords(&text) {
                    prop_assert!(keyword.len() >= MIN_KEYWORD_LEN);
                    prop_assert!(!is_stop_word(&keyword));
                }
            }
        }
    }
}
