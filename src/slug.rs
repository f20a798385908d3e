//! Title to file-name slug conversion.
//!
//! Word characters are Unicode letters, combining marks and digits. They are kept as-is (only
//! lowercased), there is no transliteration: `"Crème Brûlée"` becomes `"crème-brûlée"`.

lazy_static::lazy_static! {
    // a lowercase letter or digit directly followed by a letter that lowercasing changes:
    // "barBaz", "v2Beta". Uppercase letters without a lowercase form ("ℂ") never start a word,
    // they would still look uppercase after the first pass.
    static ref CAMEL_BOUNDARY: regex::Regex =
        regex::Regex::new(r"([\p{Ll}\p{Nd}])(\p{Changes_When_Lowercased})")
            .expect("a valid regex pattern");

    static ref SEPARATORS: regex::Regex =
        regex::Regex::new(r"[^\p{L}\p{M}\p{N}]+").expect("a valid regex pattern");
}

/// Converts a human readable title into a lowercase, hyphen separated slug.
///
/// camelCase boundaries start a new word, and any run of characters that are not letters or
/// digits collapses into a single hyphen. Leading and trailing separators are dropped.
///
/// # Example
///
/// ```
/// assert_eq!(pluma::slug::dasherize("Foo barBaz"), "foo-bar-baz");
/// ```
pub fn dasherize(title: &str) -> String {
    let split = CAMEL_BOUNDARY.replace_all(title, "${1}-${2}");

    SEPARATORS
        .split(&split)
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dasherize_splits_spaces_and_camel_case() {
        assert_eq!(dasherize("Foo barBaz"), "foo-bar-baz");
    }

    #[test]
    fn test_dasherize_collapses_separator_runs() {
        assert_eq!(dasherize("  Hello,   World!! -- again  "), "hello-world-again");
        assert_eq!(dasherize("snake_case_title"), "snake-case-title");
        assert_eq!(dasherize("a/b\\c:d"), "a-b-c-d");
    }

    #[test]
    fn test_dasherize_keeps_digits() {
        assert_eq!(dasherize("Release 2024 notes"), "release-2024-notes");
        assert_eq!(dasherize("angular17Upgrade"), "angular17-upgrade");
    }

    #[test]
    fn test_dasherize_does_not_split_acronyms() {
        assert_eq!(dasherize("HTML tips"), "html-tips");
    }

    #[test]
    fn test_dasherize_keeps_unicode_letters() {
        assert_eq!(dasherize("Crème Brûlée"), "crème-brûlée");
        assert_eq!(dasherize("Привет Мир"), "привет-мир");
        assert_eq!(dasherize("日本語 タイトル"), "日本語-タイトル");
    }

    #[test]
    fn test_dasherize_keeps_uppercase_letters_without_lowercase_form() {
        assert_eq!(dasherize("Aℂ"), "aℂ");
        assert_eq!(dasherize("aℂ"), "aℂ");
    }

    #[test]
    fn test_dasherize_only_separators_is_empty() {
        assert_eq!(dasherize("!!! ???"), "");
        assert_eq!(dasherize(""), "");
    }

    #[test]
    fn test_dasherize_is_idempotent() {
        let titles = [
            "Foo barBaz",
            "  Hello,   World!! ",
            "Crème Brûlée",
            "angular17Upgrade",
            "already-a-slug",
            "MixedCASE and__under_scores",
            "Aℂ",
            "xϒ 𝐀bc",
            "aǅb",
        ];

        for title in titles {
            let once = dasherize(title);
            assert_eq!(dasherize(&once), once, "not idempotent for {title:?}");
        }
    }

    #[test]
    fn test_dasherize_is_deterministic() {
        assert_eq!(dasherize("Same Title"), dasherize("Same Title"));
    }
}
