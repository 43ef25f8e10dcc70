//! Rule-based query analysis: keyword intent matching plus date and
//! currency entity extraction. Deliberately not a trained model — the
//! keyword tables and confidence formula are placeholder policy.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::types::{Entity, EntityType, Intent, QueryAnalysis};

/// Ordered intent table. Earlier entries win ties; `GeneralInfo` has no
/// keywords and is the default when nothing else scores.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::ArrestRights,
        &["arrest", "rights", "detained", "custody", "police"],
    ),
    (
        Intent::FirFiling,
        &["fir", "file", "complaint", "report", "police"],
    ),
    (
        Intent::PropertyRegistration,
        &["property", "registration", "sale deed", "real estate", "land"],
    ),
    (
        Intent::ConsumerComplaint,
        &["consumer", "complaint", "product", "service", "refund"],
    ),
    (
        Intent::LegalAid,
        &["legal aid", "free", "assistance", "lawyer", "advocate"],
    ),
    (Intent::GeneralInfo, &[]),
];

const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_PER_MATCH: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;

const DATE_PATTERN: &str = r"\d{1,2}/\d{1,2}/\d{2,4}|\d{1,2}-\d{1,2}-\d{2,4}";
const AMOUNT_PATTERN: &str = r"(?i)₹\s*\d+(?:,\d+)*(?:\.\d+)?|\d+(?:,\d+)*(?:\.\d+)?\s*rupees";

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(AMOUNT_PATTERN).expect("amount pattern"))
}

/// Classify a query into an intent and extract simple entities.
/// Pure and total: identical input always yields identical output, and
/// no input produces an error.
pub fn analyze(text: &str) -> QueryAnalysis {
    let lower = text.to_lowercase();

    let mut matched = Intent::GeneralInfo;
    let mut max_matches = 0usize;
    let mut confidence = BASE_CONFIDENCE;

    for (intent, keywords) in INTENT_KEYWORDS {
        let matches = keywords.iter().filter(|kw| lower.contains(*kw)).count();
        if matches > max_matches {
            matched = *intent;
            max_matches = matches;
            confidence =
                (BASE_CONFIDENCE + matches as f64 * CONFIDENCE_PER_MATCH).min(MAX_CONFIDENCE);
        }
    }

    QueryAnalysis {
        intent: matched,
        confidence,
        entities: extract_entities(text),
    }
}

/// Scan for date-like and currency-like substrings, in order of
/// appearance. Absence of matches yields empty lists, never an error.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    let mut entities = Vec::new();
    for m in date_re().find_iter(text) {
        entities.push(Entity {
            entity_type: EntityType::Date,
            value: m.as_str().to_string(),
        });
    }
    for m in amount_re().find_iter(text) {
        entities.push(Entity {
            entity_type: EntityType::Amount,
            value: m.as_str().to_string(),
        });
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fir_query_resolves_to_fir_filing() {
        let a = analyze("How do I file an FIR at the police station?");
        assert_eq!(a.intent, Intent::FirFiling);
        assert!(a.confidence > BASE_CONFIDENCE);
    }

    #[test]
    fn arrest_query_resolves_to_arrest_rights() {
        let a = analyze("What are my rights if I am arrested by police?");
        assert_eq!(a.intent, Intent::ArrestRights);
    }

    #[test]
    fn unmatched_query_defaults_to_general_info() {
        let a = analyze("banana smoothie recipe");
        assert_eq!(a.intent, Intent::GeneralInfo);
        assert_eq!(a.confidence, BASE_CONFIDENCE);
        assert!(a.entities.is_empty());
    }

    #[test]
    fn tie_keeps_earlier_table_entry() {
        // "police" alone matches both arrest_rights and fir_filing with
        // count 1; the earlier entry must win.
        let a = analyze("police");
        assert_eq!(a.intent, Intent::ArrestRights);
    }

    #[test]
    fn confidence_grows_per_keyword_and_caps() {
        let two = analyze("arrest rights");
        assert!((two.confidence - 0.7).abs() < 1e-9);

        let all = analyze("arrest rights detained custody police");
        assert!((all.confidence - MAX_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn extracts_date_and_amount_entities() {
        let a = analyze("Filed on 12/05/2023 for ₹1,50,000 refund");
        let dates: Vec<_> = a
            .entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Date)
            .collect();
        let amounts: Vec<_> = a
            .entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Amount)
            .collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].value, "12/05/2023");
        assert_eq!(amounts.len(), 1);
        assert!(amounts[0].value.starts_with('₹'));
    }

    #[test]
    fn keeps_multiple_matches_in_order() {
        let entities = extract_entities("between 1-2-2020 and 3/4/21, 500 rupees paid");
        let values: Vec<&str> = entities.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["1-2-2020", "3/4/21", "500 rupees"]);
    }

    #[test]
    fn analyze_is_idempotent() {
        let q = "consumer complaint about a product refund on 01/01/2024";
        let first = analyze(q);
        let second = analyze(q);
        assert_eq!(first.intent, second.intent);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.entities, second.entities);
    }
}
