//! Scoring engine
//!
//! Turns the aggregated text of a crawled site into a score and a confidence
//! band. The function is pure: the same text always yields the same result.

use crate::config::KeywordConfig;
use crate::state::ConfidenceBand;

/// Points per distinct scanner keyword
pub const PRIMARY_WEIGHT: u32 = 12;

/// Points per distinct digital dentistry keyword
pub const SECONDARY_WEIGHT: u32 = 4;

/// Points per evidence page, granted only when more than one page has evidence
pub const PAGE_DIVERSITY_WEIGHT: u32 = 3;

/// Scoring output for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub has_equipment: bool,
    pub band: ConfidenceBand,
    pub score: u32,
    pub evidence: String,
    pub reason: String,
}

/// Scores the aggregated text of one target
///
/// # Arguments
///
/// * `aggregated_text` - Text of every fetched page
/// * `page_evidence` - One entry per page on which scanner keywords were found
/// * `page_count` - Number of pages examined
/// * `keywords` - Primary and secondary keyword sets
///
/// # Scoring
///
/// | Component | Points |
/// |-----------|--------|
/// | Distinct primary keyword | 12 |
/// | Distinct secondary keyword | 4 |
/// | Evidence page, if more than one | 3 |
///
/// A keyword mentioned on several pages counts once.
pub fn score(
    aggregated_text: &str,
    page_evidence: &[String],
    page_count: u32,
    keywords: &KeywordConfig,
) -> Classification {
    let primary = find_matching_keywords(aggregated_text, &keywords.primary);
    let secondary = find_matching_keywords(aggregated_text, &keywords.secondary);

    let mut score = primary.len() as u32 * PRIMARY_WEIGHT + secondary.len() as u32 * SECONDARY_WEIGHT;
    if page_evidence.len() > 1 {
        score += page_evidence.len() as u32 * PAGE_DIVERSITY_WEIGHT;
    }

    let mut parts = Vec::new();
    if !primary.is_empty() {
        parts.push(format!("scanner: {}", primary.join(", ")));
    }
    if !secondary.is_empty() {
        parts.push(format!("digital: {}", secondary.join(", ")));
    }
    let matched_anything = !parts.is_empty();
    parts.push(format!("pages examined: {}", page_count));
    let evidence = parts.join(" | ");

    let reason = if matched_anything {
        evidence.clone()
    } else {
        format!("no equipment keywords found ({} pages examined)", page_count)
    };

    let band = ConfidenceBand::from_score(score);

    Classification {
        has_equipment: band.is_positive(),
        band,
        score,
        evidence,
        reason,
    }
}

/// Returns the keywords contained in `text`, each at most once, in list order
///
/// Matching is case-insensitive substring containment.
pub fn find_matching_keywords<'a>(text: &str, keywords: &'a [String]) -> Vec<&'a str> {
    let text = text.to_lowercase();
    let mut found: Vec<&str> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_str();
        if !found.contains(&keyword) && text.contains(&keyword.to_lowercase()) {
            found.push(keyword);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> KeywordConfig {
        KeywordConfig {
            primary: vec![
                "itero".to_string(),
                "trios".to_string(),
                "primescan".to_string(),
            ],
            secondary: vec!["cad/cam".to_string(), "digital dentistry".to_string()],
            ..KeywordConfig::default()
        }
    }

    #[test]
    fn test_no_keywords_single_page() {
        let result = score("welcome to our family clinic", &[], 1, &keywords());
        assert_eq!(result.score, 0);
        assert_eq!(result.band, ConfidenceBand::None);
        assert!(!result.has_equipment);
        assert_eq!(result.evidence, "pages examined: 1");
        assert_eq!(result.reason, "no equipment keywords found (1 pages examined)");
    }

    #[test]
    fn test_two_primary_one_secondary_is_low() {
        let text = "we scan with trios and primescan in a cad/cam workflow";
        let evidence = vec!["page[Home]: trios, primescan".to_string()];
        let result = score(text, &evidence, 1, &keywords());

        assert_eq!(result.score, 12 * 2 + 4);
        assert_eq!(result.band, ConfidenceBand::Low);
        assert!(result.has_equipment);
        assert_eq!(
            result.evidence,
            "scanner: trios, primescan | digital: cad/cam | pages examined: 1"
        );
        assert_eq!(result.reason, result.evidence);
    }

    #[test]
    fn test_multi_page_bonus_is_medium() {
        let text = "itero trios ... primescan";
        let evidence = vec![
            "page[Home]: itero, trios".to_string(),
            "page[Equipment]: primescan".to_string(),
        ];
        let result = score(text, &evidence, 5, &keywords());

        assert_eq!(result.score, 12 * 3 + 3 * 2);
        assert_eq!(result.band, ConfidenceBand::Medium);
    }

    #[test]
    fn test_single_evidence_page_gets_no_bonus() {
        let evidence = vec!["page[Home]: itero".to_string()];
        let result = score("itero", &evidence, 3, &keywords());
        assert_eq!(result.score, 12);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let once = score("itero", &[], 1, &keywords());
        let thrice = score("itero page one itero page two itero page three", &[], 1, &keywords());
        assert_eq!(once.score, thrice.score);
        assert_eq!(once.band, thrice.band);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let result = score("Our new iTero and TRIOS", &[], 1, &keywords());
        assert_eq!(result.score, 24);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let evidence = vec!["a".to_string(), "b".to_string()];
        let first = score("itero cad/cam digital dentistry", &evidence, 2, &keywords());
        let second = score("itero cad/cam digital dentistry", &evidence, 2, &keywords());
        assert_eq!(first, second);
    }

    #[test]
    fn test_high_band() {
        let evidence = vec!["p1".to_string(), "p2".to_string(), "p3".to_string()];
        let result = score(
            "itero trios primescan cad/cam digital dentistry",
            &evidence,
            3,
            &keywords(),
        );
        // 36 + 8 + 9
        assert_eq!(result.score, 53);
        assert_eq!(result.band, ConfidenceBand::High);
    }

    #[test]
    fn test_find_matching_keywords_preserves_list_order() {
        let list = keywords().primary;
        let found = find_matching_keywords("primescan then itero", &list);
        assert_eq!(found, vec!["itero", "primescan"]);
    }

    #[test]
    fn test_default_keywords_match_korean_text() {
        let defaults = KeywordConfig::default();
        let found = find_matching_keywords("저희 치과는 구강스캐너를 사용합니다", &defaults.primary);
        assert_eq!(found, vec!["구강스캐너"]);
    }
}
