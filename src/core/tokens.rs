/// Lowercased "everything" tokens across the dashboard locales.
pub const ALL_TOKENS: [&str; 18] = [
    "all", "alle", "alles", "allt", "tous", "toutes", "tout", "todos", "todas", "todo", "tutti",
    "tutte", "kaikki", "wszystkie", "všechny", "все", "全部", "すべて",
];

/// Returns true when a selected value means "no restriction" on its dimension.
///
/// Matches a bare token (`All`, `alle`) or a token followed by a qualifier
/// (`All years`, `Alle Regionen`), case-insensitively.
#[must_use]
pub fn is_all_token(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    let head = lowered.split_whitespace().next().unwrap_or_default();
    ALL_TOKENS.contains(&head)
}

/// Returns true when any value in a selection is an all-token.
#[must_use]
pub fn contains_all_token<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().any(|value| is_all_token(value.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_locale_tokens_case_insensitively() {
        for token in ["All", "ALLE", "Tous", "todas", "全部", "Все"] {
            assert!(is_all_token(token), "{token} should be an all-token");
        }
        assert!(is_all_token("All regions"));
    }

    #[test]
    fn ordinary_values_are_not_all_tokens() {
        for value in ["Allentown", "Small", "2020", "", "Total"] {
            assert!(!is_all_token(value), "{value} should not be an all-token");
        }
    }
}
