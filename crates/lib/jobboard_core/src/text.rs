//! Text normalization for accent-insensitive search.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize text for matching.
///
/// Lowercases, decomposes accented characters and drops the combining marks
/// (`"café"` → `"cafe"`), turns every character outside `[a-z0-9 ]` into a
/// space, collapses whitespace runs and trims both ends.
///
/// The database's `search_normalize` folds only the letters listed in its
/// `translate` table and agrees with this function on every one of them.
/// Letters outside that table but with a canonical decomposition, such as
/// `ă č ď ě ğ ł ń ő ř ś ş š ť ů ű ź ż ž`, fold here and become spaces in SQL.
/// `ł` has no decomposition and is a space in both.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => ' ',
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize `text` and split it into search words.
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_portuguese_diacritics() {
        assert_eq!(
            normalize("Estágio em Programação"),
            "estagio em programacao"
        );
        assert_eq!(normalize("São Paulo, SP"), "sao paulo sp");
        assert_eq!(normalize("café"), "cafe");
    }

    #[test]
    fn replaces_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("  React/TypeScript -- Next.js  "), "react typescript next js");
        assert_eq!(normalize("a\t\tb\n\nc"), "a b c");
    }

    #[test]
    fn empty_and_symbol_only_inputs_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ... ???"), "");
        assert_eq!(normalize("•"), "");
    }

    #[test]
    fn uppercase_accented_letters_fold() {
        assert_eq!(normalize("ÁGIL ÇÃO"), "agil cao");
    }

    #[test]
    fn words_splits_normalized_text() {
        assert_eq!(words("React, Frontend!"), vec!["react", "frontend"]);
        assert!(words("   ").is_empty());
    }

    /// The `from`/`to` strings of the `translate` call in `search_normalize`.
    fn sql_translate_table() -> (Vec<char>, Vec<char>) {
        let sql = include_str!("../migrations/20250101000000_init.sql");
        let call = &sql[sql.find("translate(lower(input),").expect("translate call")..];
        let quoted: Vec<&str> = call.split('\'').skip(1).step_by(2).take(2).collect();
        (quoted[0].chars().collect(), quoted[1].chars().collect())
    }

    #[test]
    fn agrees_with_sql_translate_table() {
        let (from, to) = sql_translate_table();
        assert_eq!(from.len(), to.len());
        for (accented, plain) in from.iter().zip(&to) {
            assert_eq!(normalize(&accented.to_string()), plain.to_string(), "{accented}");
            assert_eq!(
                normalize(&accented.to_uppercase().to_string()),
                plain.to_string(),
                "{accented} uppercase"
            );
        }
    }

    #[test]
    fn letters_folded_only_in_rust() {
        let (from, _) = sql_translate_table();
        for (letter, plain) in [
            ('ă', "a"),
            ('č', "c"),
            ('ě', "e"),
            ('ő', "o"),
            ('ř', "r"),
            ('ş', "s"),
            ('ž', "z"),
        ] {
            assert!(!from.contains(&letter), "{letter} is in the SQL table");
            assert_eq!(normalize(&letter.to_string()), plain);
        }
        assert_eq!(normalize("ł"), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC{0,64}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn normalized_output_uses_only_the_search_alphabet(s in "\\PC{0,64}") {
            let out = normalize(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
