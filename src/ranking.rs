use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::models::ApplicationRecord;

/// One screenful of results.
pub const DEFAULT_LIMIT: usize = 9;
pub const DEFAULT_MIN_SCORE: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMatch<'a> {
    pub record: &'a ApplicationRecord,
    pub score: i64,
    /// Position of the record in the enumeration that was ranked.
    pub order: usize,
}

/// Score every record against `query` and keep the best `limit` that reach
/// `min_score`, highest first. Equal scores keep enumeration order.
pub fn rank<'a>(
    records: &'a [ApplicationRecord],
    query: &str,
    min_score: i64,
    limit: usize,
) -> Vec<RankedMatch<'a>> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut ranked = BoundedRanking::new(limit);
    for (order, record) in records.iter().enumerate() {
        let Some(score) = score_record(&matcher, record, query) else {
            continue;
        };
        if score >= min_score {
            ranked.offer(RankedMatch {
                record,
                score,
                order,
            });
        }
    }
    ranked.into_vec()
}

fn score_record(matcher: &SkimMatcherV2, record: &ApplicationRecord, query: &str) -> Option<i64> {
    let name = score_field(matcher, &record.name, query);
    let search_name = score_field(matcher, &record.search_name, query);
    match (name, search_name) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Cap on how much a late first match can cost.
const MAX_POSITION_PENALTY: i64 = 16;

/// Subsequence score from the skim matcher, nudged towards exact and prefix
/// hits and away from long fields and late first matches.
pub fn score_field(matcher: &SkimMatcherV2, field: &str, query: &str) -> Option<i64> {
    let (fuzzy, indices) = matcher.fuzzy_indices(field, query)?;
    let field_lower = field.to_ascii_lowercase();
    let query_lower = query.to_ascii_lowercase();
    let mut score = fuzzy;

    if field_lower == query_lower {
        score += 30;
    } else if field_lower.starts_with(&query_lower) {
        score += 18;
    } else if field_lower.contains(&query_lower) {
        score += 8;
    }

    let field_len = field.chars().count();
    let query_len = query.chars().count();
    let length_penalty = field_len.saturating_sub(query_len) as i64 / 6;
    let position_penalty = indices
        .first()
        .map_or(0, |&first| (first as i64).min(MAX_POSITION_PENALTY));
    Some(score - length_penalty - position_penalty)
}

/// Descending-score list that never holds more than `capacity` entries.
struct BoundedRanking<'a> {
    capacity: usize,
    entries: Vec<RankedMatch<'a>>,
}

impl<'a> BoundedRanking<'a> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    fn offer(&mut self, candidate: RankedMatch<'a>) {
        if self.entries.len() == self.capacity {
            match self.entries.last() {
                Some(lowest) if candidate.score > lowest.score => {
                    self.entries.pop();
                }
                _ => return,
            }
        }
        // After every entry scoring at least as high, so ties keep arrival order.
        let position = self
            .entries
            .partition_point(|entry| entry.score >= candidate.score);
        self.entries.insert(position, candidate);
    }

    fn into_vec(self) -> Vec<RankedMatch<'a>> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ApplicationRecord {
        ApplicationRecord {
            name: name.to_string(),
            description: String::new(),
            desktop_file: format!("{name}.desktop"),
            search_name: name.to_string(),
        }
    }

    fn names<'a>(ranked: &[RankedMatch<'a>]) -> Vec<&'a str> {
        ranked.iter().map(|m| m.record.name.as_str()).collect()
    }

    #[test]
    fn test_exact_name_outranks_longer_name() {
        let records = vec![record("LibreOffice Calc"), record("Calc"), record("Keyboard")];
        let ranked = rank(&records, "calc", DEFAULT_MIN_SCORE, DEFAULT_LIMIT);
        assert_eq!(names(&ranked), vec!["Calc", "LibreOffice Calc"]);
    }

    #[test]
    fn test_non_subsequence_is_excluded() {
        let records = vec![record("john"), record("sandy")];
        assert!(rank(&records, "xyz", 0, DEFAULT_LIMIT).is_empty());
        assert!(rank(&records, "nhoj", 0, DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_search_name_widens_recall() {
        let mut scopes = record("Scopes");
        scopes.search_name = "Scopes unity8-dash".to_string();
        let records = vec![scopes, record("Calendar")];
        let ranked = rank(&records, "unity8", DEFAULT_MIN_SCORE, DEFAULT_LIMIT);
        assert_eq!(names(&ranked), vec!["Scopes"]);
    }

    #[test]
    fn test_earlier_match_scores_higher() {
        let records = vec![record("xxxxxxcalc"), record("xxcalcxxxx")];
        let ranked = rank(&records, "calc", 0, DEFAULT_LIMIT);
        assert_eq!(names(&ranked), vec!["xxcalcxxxx", "xxxxxxcalc"]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_word_start_match_scores_higher() {
        let records = vec![record("abxtermxx"), record("ab termxx")];
        let ranked = rank(&records, "term", 0, DEFAULT_LIMIT);
        assert_eq!(names(&ranked), vec!["ab termxx", "abxtermxx"]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let mut first = record("jane");
        first.desktop_file = "first.desktop".into();
        let mut second = record("jane");
        second.desktop_file = "second.desktop".into();
        let records = vec![first, second];

        let ranked = rank(&records, "jane", 0, DEFAULT_LIMIT);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].record.desktop_file, "first.desktop");
        assert_eq!(ranked[1].order, 1);
    }

    #[test]
    fn test_limit_keeps_best_entries() {
        let records = vec![record("jxaxnxe"), record("jane"), record("janet"), record("jan e")];
        let ranked = rank(&records, "jane", 0, 2);
        assert_eq!(names(&ranked), vec!["jane", "janet"]);
    }

    #[test]
    fn test_results_sorted_and_above_threshold() {
        let records: Vec<_> = ["john", "james", "o.jody", "jane", "Guake Terminal"]
            .into_iter()
            .map(record)
            .collect();
        let ranked = rank(&records, "j", 10, 3);
        assert!(ranked.len() <= 3);
        assert!(ranked.iter().all(|m| m.score >= 10));
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn test_blank_query_or_zero_limit_yields_nothing() {
        let records = vec![record("john")];
        assert!(rank(&records, "", 0, DEFAULT_LIMIT).is_empty());
        assert!(rank(&records, "  ", 0, DEFAULT_LIMIT).is_empty());
        assert!(rank(&records, "john", 0, 0).is_empty());
    }

    #[test]
    fn test_bounded_ranking_evicts_only_for_strictly_better() {
        let records = vec![record("a"), record("b"), record("c")];
        let mut ranking = BoundedRanking::new(2);
        ranking.offer(RankedMatch { record: &records[0], score: 5, order: 0 });
        ranking.offer(RankedMatch { record: &records[1], score: 3, order: 1 });
        ranking.offer(RankedMatch { record: &records[2], score: 3, order: 2 });
        let kept: Vec<_> = ranking.into_vec().iter().map(|m| m.order).collect();
        assert_eq!(kept, vec![0, 1]);
    }
}
