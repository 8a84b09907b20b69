// src/core/normalize.rs

/// Canonicalizes a single word: lowercase, ASCII letters only, then a minimal
/// English singularization.
///
/// "berries" -> "berry", "tomatoes" -> "tomato", "beans" -> "bean",
/// "glass" -> "glass". Never fails; the result may be empty.
pub fn normalize_word(word: &str) -> String {
    let mut token: String = word
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_lowercase)
        .collect();
    singularize(&mut token);
    token
}

fn singularize(token: &mut String) {
    if let Some(stem) = token.strip_suffix("ies") {
        let len = stem.len();
        token.truncate(len);
        token.push('y');
    } else if let Some(stem) = token.strip_suffix("oes") {
        let len = stem.len() + 1;
        token.truncate(len);
    } else if token.ends_with('s') && !token.ends_with("ss") {
        token.pop();
    }
}

/// Splits an ingredient name into normalized tokens.
///
/// Parenthetical annotations are dropped entirely, so "lime (kaffir)" and
/// "lime" produce the same tokens. Duplicates are kept; empty tokens are not.
pub fn extract_normalized_tokens(name: &str) -> Vec<String> {
    let lowered = name.to_lowercase();
    let stripped = strip_parentheticals(&lowered);
    let cleaned: String = stripped
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(normalize_word)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Removes every `(...)` run, from an opening paren to the first closing one.
/// An unmatched `(` is left in place.
fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("beans", "bean")]
    #[case("glass", "glass")]
    #[case("berries", "berry")]
    #[case("tomatoes", "tomato")]
    #[case("Tomato", "tomato")]
    #[case("Crème-Fraîche!", "crmefrache")]
    #[case("s", "")]
    #[case("", "")]
    fn normalizes_words(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_word(input), expected);
    }

    #[test]
    fn plural_and_singular_agree() {
        assert_eq!(normalize_word("tomatoes"), normalize_word("tomato"));
        assert_eq!(normalize_word("cherries"), normalize_word("cherry"));
    }

    #[test]
    fn parentheticals_are_dropped() {
        assert_eq!(
            extract_normalized_tokens("lime (kaffir)"),
            extract_normalized_tokens("lime")
        );
        assert_eq!(extract_normalized_tokens("Lime (Kaffir) leaves"), vec!["lime", "leave"]);
    }

    #[test]
    fn tokens_keep_duplicates_and_drop_punctuation() {
        assert_eq!(
            extract_normalized_tokens("Beans, beans & more beans"),
            vec!["bean", "bean", "more", "bean"]
        );
    }

    #[test]
    fn unmatched_paren_is_stripped_as_punctuation() {
        assert_eq!(extract_normalized_tokens("pepper (red"), vec!["pepper", "red"]);
        assert_eq!(extract_normalized_tokens("(a (b) c)"), vec!["c"]);
    }

    #[test]
    fn blank_names_produce_no_tokens() {
        assert!(extract_normalized_tokens("   ").is_empty());
        assert!(extract_normalized_tokens("(only a note)").is_empty());
    }

    proptest! {
        #[test]
        fn normalize_word_is_idempotent(word in "\\PC{0,24}") {
            let once = normalize_word(&word);
            prop_assert_eq!(normalize_word(&once), once);
        }
    }
}
