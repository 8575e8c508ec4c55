use crate::catalog::ResponseCatalog;

/// Deterministic keyword fallback: first rule with any of its words
/// contained in the lowercased question wins; no scoring among later
/// matches. Returns the catalog default when nothing matches.
pub fn fallback_response<'a>(question: &str, catalog: &'a ResponseCatalog) -> &'a str {
    let question = question.to_lowercase();

    for rule in catalog.rules() {
        if rule.words.iter().any(|word| question.contains(word.as_str())) {
            return &rule.response;
        }
    }

    catalog.default_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ResponseCatalog {
        ResponseCatalog::parse(
            r#"{
                "rules": [
                    {"keywords": "fall_protection", "response": "Use harnesses."},
                    {"keywords": "electrical_hazard", "response": "De-energize circuits."}
                ],
                "default": "Ask supervisor."
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn matches_keyword_word_as_substring() {
        let catalog = catalog();
        let answer = fallback_response("What about falling hazards on scaffolding?", &catalog);
        assert_eq!(answer, "Use harnesses.");
    }

    #[test]
    fn unmatched_question_gets_default() {
        let catalog = catalog();
        let answer = fallback_response("Is it safe to use extension cords in rain?", &catalog);
        assert_eq!(answer, "Ask supervisor.");
    }

    #[test]
    fn first_matching_rule_wins() {
        // "hazard" belongs to the second rule but "fall" hits first.
        let catalog = catalog();
        let answer = fallback_response("fall hazard near the panel", &catalog);
        assert_eq!(answer, "Use harnesses.");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(fallback_response("ELECTRICAL work today", &catalog), "De-energize circuits.");
    }

    #[test]
    fn is_deterministic() {
        let catalog = catalog();
        let q = "loose wiring by the electrical room";
        assert_eq!(
            fallback_response(q, &catalog),
            fallback_response(q, &catalog)
        );
    }

    #[test]
    fn default_is_never_empty() {
        let catalog = catalog();
        assert!(!fallback_response("completely unrelated", &catalog).is_empty());
    }
}
