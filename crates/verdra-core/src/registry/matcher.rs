//! Fuzzy company-name matching.
//!
//! Registry exports rarely spell a company the way its own report does, so
//! matching is a normalized Levenshtein closeness ratio with a tunable accept
//! cutoff and candidate count. There is no canonical company-identity
//! resolution here; callers decide how much fuzz they tolerate.

/// Tunable matching parameters.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Minimum closeness ratio (0.0 - 1.0) for a candidate to be accepted.
    pub cutoff: f64,

    /// Maximum number of candidates returned.
    pub max_candidates: usize,
}

impl MatchConfig {
    /// Broad matching: up to three candidates above the default cutoff.
    pub fn broad() -> Self {
        Self {
            cutoff: 0.7,
            max_candidates: 3,
        }
    }

    /// Exact-target matching: the single best candidate only.
    pub fn exact() -> Self {
        Self {
            cutoff: 0.7,
            max_candidates: 1,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::broad()
    }
}

/// One accepted match candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// Index into the candidate list handed to [`NameMatcher::close_matches`].
    pub index: usize,

    /// The candidate name as it appears in the reference data.
    pub name: String,

    /// Closeness ratio in [0, 1].
    pub ratio: f64,
}

/// Fuzzy name matcher over a list of candidate names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameMatcher {
    config: MatchConfig,
}

impl NameMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    /// Accepted candidates, best first, at most `max_candidates`.
    pub fn close_matches(&self, query: &str, candidates: &[(usize, &str)]) -> Vec<MatchCandidate> {
        let norm_query = normalize(query);
        if norm_query.is_empty() {
            return Vec::new();
        }

        let mut accepted: Vec<MatchCandidate> = candidates
            .iter()
            .filter_map(|(index, name)| {
                let ratio = similarity(&norm_query, &normalize(name));
                if ratio >= self.config.cutoff {
                    Some(MatchCandidate {
                        index: *index,
                        name: (*name).to_string(),
                        ratio,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Best ratio first; ties keep table order so results are stable.
        accepted.sort_by(|a, b| {
            b.ratio
                .partial_cmp(&a.ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        accepted.truncate(self.config.max_candidates);
        accepted
    }

    /// The single best accepted candidate, if any.
    pub fn best_match(&self, query: &str, candidates: &[(usize, &str)]) -> Option<MatchCandidate> {
        self.close_matches(query, candidates).into_iter().next()
    }
}

/// Lowercase, collapse whitespace runs to a single space, trim.
fn normalize(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein closeness ratio: 1 - distance / max_len.
fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate().take(m + 1) {
        row[0] = i;
    }
    for (j, val) in dp[0].iter_mut().enumerate().take(n + 1) {
        *val = j;
    }
    for i in 1..=m {
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[m][n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates<'a>(names: &[&'a str]) -> Vec<(usize, &'a str)> {
        names.iter().copied().enumerate().collect()
    }

    #[test]
    fn exact_name_matches_with_full_ratio() {
        let matcher = NameMatcher::new(MatchConfig::exact());
        let names = candidates(&["Acme Industrial", "Globex Corp"]);
        let best = matcher.best_match("Acme Industrial", &names).unwrap();
        assert_eq!(best.index, 0);
        assert_eq!(best.ratio, 1.0);
    }

    #[test]
    fn casing_and_whitespace_are_ignored() {
        let matcher = NameMatcher::new(MatchConfig::exact());
        let names = candidates(&["ACME   industrial"]);
        let best = matcher.best_match("Acme Industrial", &names).unwrap();
        assert_eq!(best.ratio, 1.0);
    }

    #[test]
    fn near_miss_accepted_above_cutoff() {
        let matcher = NameMatcher::new(MatchConfig::exact());
        let names = candidates(&["Acme Industrials"]);
        let best = matcher.best_match("Acme Industrial", &names);
        assert!(best.is_some());
        assert!(best.unwrap().ratio > 0.9);
    }

    #[test]
    fn unrelated_name_rejected() {
        let matcher = NameMatcher::new(MatchConfig::broad());
        let names = candidates(&["Initech Holdings"]);
        assert!(matcher.best_match("Acme Industrial", &names).is_none());
    }

    #[test]
    fn broad_config_caps_candidates() {
        let matcher = NameMatcher::new(MatchConfig::broad());
        let names = candidates(&["Acme Industrial", "Acme Industria", "Acme Industrials", "Acme Industrial Inc"]);
        let matches = matcher.close_matches("Acme Industrial", &names);
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].index, 0); // exact first
    }

    #[test]
    fn cutoff_is_tunable() {
        let strict = NameMatcher::new(MatchConfig {
            cutoff: 0.95,
            max_candidates: 3,
        });
        let names = candidates(&["Acme Industries"]);
        assert!(strict.best_match("Acme Industrial", &names).is_none());

        let loose = NameMatcher::new(MatchConfig {
            cutoff: 0.5,
            max_candidates: 3,
        });
        assert!(loose.best_match("Acme Industrial", &names).is_some());
    }

    #[test]
    fn empty_query_matches_nothing() {
        let matcher = NameMatcher::new(MatchConfig::broad());
        let names = candidates(&["Acme"]);
        assert!(matcher.close_matches("  ", &names).is_empty());
    }
}
