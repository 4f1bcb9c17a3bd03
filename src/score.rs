use crate::{K_SOFT_LIMIT, QUERY_SOFT_LIMIT};
use std::fmt;

/// Scores at or above this count as full credit.
pub const FULL_CREDIT: f64 = 99.999;

/// `100 * min(1, sqrt(150 / K)) * min(1, (400 / Q)^1.5)`.
///
/// Only meaningful when every run passed. `max_queries == 0` saturates the query factor.
pub fn score(k: usize, max_queries: usize) -> f64 {
    let k_factor = (K_SOFT_LIMIT as f64 / k as f64).sqrt().min(1.0);
    let q_factor = (QUERY_SOFT_LIMIT as f64 / max_queries as f64)
        .powf(1.5)
        .min(1.0);
    100.0 * k_factor * q_factor
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Protocol error or the judge could not run.
    Error,
    /// Every run passed at full credit.
    Accepted,
    /// Every run passed, at partial credit.
    Partial,
    WrongAnswer,
}

impl Verdict {
    pub fn tag(self) -> &'static str {
        match self {
            Verdict::Error => "ER",
            Verdict::Accepted => "AC",
            Verdict::Partial => "OK",
            Verdict::WrongAnswer => "WA",
        }
    }

    /// Classifies a run set given whether all runs passed and the resulting score.
    pub fn classify(all_passed: bool, score: f64) -> Self {
        if !all_passed {
            Verdict::WrongAnswer
        } else if score >= FULL_CREDIT {
            Verdict::Accepted
        } else {
            Verdict::Partial
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One machine-readable summary line. `None` fields print as `-`.
pub fn summary_line(
    name: &str,
    verdict: Verdict,
    k: Option<usize>,
    max_queries: Option<usize>,
    runs: Option<(usize, usize)>,
    score: f64,
) -> String {
    let dash = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    let runs = runs.map_or_else(|| "-".to_string(), |(p, t)| format!("{}/{}", p, t));
    format!(
        "{:<28}  {:<2}  {:>5}  {:>5}  {:<7}  {:>6.2}",
        name,
        verdict.tag(),
        dash(k),
        dash(max_queries),
        runs,
        score
    )
}
