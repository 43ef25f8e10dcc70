//! Response synthesis: fixed templates for matched intents, naive
//! extractive summarization for everything else.

use crate::templates::{self, FOLLOW_UP_PROMPT, NO_SOURCES_RESPONSE};
use crate::types::{QueryAnalysis, RetrievedDocument};

/// Max documents mined for the extractive answer.
const MAX_SUMMARY_DOCS: usize = 3;
/// Max sentences taken per document.
const MAX_SENTENCES_PER_DOC: usize = 2;
/// Sentences at or below this trimmed length are discarded as noise.
const MIN_SENTENCE_LEN: usize = 20;

/// Produce the answer text for a query.
///
/// With no supporting documents the answer is always the fixed apology —
/// the pipeline never fabricates an answer without at least one source.
/// Otherwise templated intents return their fixed body and the rest get
/// an extractive summary of the retrieved text.
pub fn synthesize(
    _query: &str,
    analysis: &QueryAnalysis,
    documents: &[RetrievedDocument],
) -> String {
    if documents.is_empty() {
        return NO_SOURCES_RESPONSE.to_string();
    }

    match templates::template_for(analysis.intent) {
        Some(body) => body.to_string(),
        None => extractive_summary(documents),
    }
}

/// Bullet up to two usable sentences from each of the first three
/// documents, then append the generic follow-up prompt.
fn extractive_summary(documents: &[RetrievedDocument]) -> String {
    let mut response = String::from("<p>Based on the information I have:</p><ul>");

    for doc in documents.iter().take(MAX_SUMMARY_DOCS) {
        for sentence in sentences(doc.best_text()).into_iter().take(MAX_SENTENCES_PER_DOC) {
            response.push_str("<li>");
            response.push_str(&sentence);
            response.push_str(".</li>");
        }
    }

    response.push_str("</ul>");
    response.push_str(FOLLOW_UP_PROMPT);
    response
}

/// Split on sentence terminators, keeping trimmed fragments longer than
/// `MIN_SENTENCE_LEN` characters.
fn sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_LEN)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Intent;

    fn analysis(intent: Intent) -> QueryAnalysis {
        QueryAnalysis {
            intent,
            confidence: 0.8,
            entities: Vec::new(),
        }
    }

    fn doc_with_content(content: &str) -> RetrievedDocument {
        RetrievedDocument {
            title: "t".into(),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_documents_yield_apology_regardless_of_intent() {
        for intent in [Intent::FirFiling, Intent::GeneralInfo, Intent::LegalAid] {
            let out = synthesize("q", &analysis(intent), &[]);
            assert_eq!(out, NO_SOURCES_RESPONSE);
        }
    }

    #[test]
    fn templated_intent_ignores_document_text() {
        let docs = vec![doc_with_content("This document text must not leak into the answer.")];
        let out = synthesize("how to file an fir", &analysis(Intent::FirFiling), &docs);
        assert!(out.contains("How to File an FIR in India"));
        assert!(!out.contains("must not leak"));
    }

    #[test]
    fn each_named_intent_has_a_template() {
        let docs = vec![doc_with_content("supporting source")];
        for intent in [
            Intent::ArrestRights,
            Intent::FirFiling,
            Intent::PropertyRegistration,
            Intent::ConsumerComplaint,
            Intent::LegalAid,
        ] {
            let out = synthesize("q", &analysis(intent), &docs);
            assert!(out.starts_with("<h3>"), "no template for {:?}", intent);
        }
    }

    #[test]
    fn general_info_extracts_sentences() {
        let docs = vec![doc_with_content(
            "The Consumer Protection Act establishes district commissions. Short. \
             Complaints must be filed within two years of the cause of action! tiny?",
        )];
        let out = synthesize("q", &analysis(Intent::GeneralInfo), &docs);
        assert!(out.contains("<li>The Consumer Protection Act establishes district commissions.</li>"));
        assert!(out.contains("within two years"));
        assert!(!out.contains("<li>Short.</li>"));
        assert!(out.contains(FOLLOW_UP_PROMPT));
    }

    #[test]
    fn extractive_summary_caps_docs_and_sentences() {
        let long = "This is a sufficiently long first sentence for the test. \
                    This is a sufficiently long second sentence for the test. \
                    This is a sufficiently long third sentence for the test.";
        let docs: Vec<_> = (0..5).map(|_| doc_with_content(long)).collect();
        let out = synthesize("q", &analysis(Intent::GeneralInfo), &docs);
        // 3 docs × 2 sentences each.
        assert_eq!(out.matches("<li>").count(), 6);
        assert!(!out.contains("third sentence"));
    }

    #[test]
    fn provider_results_without_content_use_snippet() {
        let docs = vec![RetrievedDocument {
            title: "web result".into(),
            snippet: Some("A snippet long enough to survive the length filter.".into()),
            ..Default::default()
        }];
        let out = synthesize("q", &analysis(Intent::GeneralInfo), &docs);
        assert!(out.contains("snippet long enough"));
    }
}
