use serde::{Deserialize, Deserializer};
use std::{path::Path, time::Duration};

pub const DEFAULT_MAX_SOLUTIONS: usize = 10;
pub const DEFAULT_MAX_STATES: u64 = 10_000_000;

/// Stopping policy and exploration budget for a search.
///
/// The search stops with a solution as soon as either `target_length` or
/// `max_solutions` is satisfied. `max_states` and `time_limit` bound the
/// total work regardless of solutions. In JSON the time limit is given in whole
/// seconds as `time_limit_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolveConfig {
    /// Stop once the best solution is at most this many moves long.
    pub target_length: Option<usize>,
    /// Stop after this many winning layouts have been reached.
    pub max_solutions: Option<usize>,
    /// Seed for the tie-breaking shuffle. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Maximum number of moves to apply before giving up.
    pub max_states: Option<u64>,
    #[serde(rename = "time_limit_secs", deserialize_with = "deserialize_secs")]
    pub time_limit: Option<Duration>,
}

fn deserialize_secs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            target_length: None,
            max_solutions: Some(DEFAULT_MAX_SOLUTIONS),
            seed: None,
            max_states: Some(DEFAULT_MAX_STATES),
            time_limit: None,
        }
    }
}

impl SolveConfig {
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&content)?)
    }

    pub fn with_target_length(mut self, target_length: usize) -> Self {
        self.target_length = Some(target_length);
        self
    }

    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = Some(max_solutions);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_states(mut self, max_states: u64) -> Self {
        self.max_states = Some(max_states);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Drops both stopping conditions, so only the budget or exhaustion ends
    /// the search.
    pub fn unbounded(mut self) -> Self {
        self.target_length = None;
        self.max_solutions = None;
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// True when a best solution of `best_len` moves, found among
    /// `solutions_found` wins, ends the search.
    pub fn is_satisfied(&self, best_len: usize, solutions_found: usize) -> bool {
        self.target_length.is_some_and(|target| best_len <= target)
            || self.max_solutions.is_some_and(|max| solutions_found >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolveConfig::default();
        assert_eq!(config.max_solutions, Some(DEFAULT_MAX_SOLUTIONS));
        assert_eq!(config.max_states, Some(DEFAULT_MAX_STATES));
        assert_eq!(config.time_limit(), None);
        assert!(!config.is_satisfied(500, 1));
        assert!(config.is_satisfied(500, DEFAULT_MAX_SOLUTIONS));
    }

    #[test]
    fn test_config_from_json() {
        let config = SolveConfig::from_json_str(
            r#"{ "target_length": 120, "seed": 7, "time_limit_secs": 30 }"#,
        )
        .unwrap();
        assert_eq!(config.target_length, Some(120));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
        assert_eq!(config.max_solutions, Some(DEFAULT_MAX_SOLUTIONS));

        assert!(SolveConfig::from_json_str(r#"{ "targt_length": 1 }"#).is_err());
    }

    #[test]
    fn test_time_limit_keeps_subsecond_precision() {
        let config = SolveConfig::default().with_time_limit(Duration::from_millis(900));
        assert_eq!(config.time_limit(), Some(Duration::from_millis(900)));

        let config = SolveConfig::from_json_str(r#"{ "time_limit_secs": null }"#).unwrap();
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn test_stopping_conditions_are_independent() {
        let config = SolveConfig::default().unbounded().with_target_length(100);
        assert!(config.is_satisfied(100, 1));
        assert!(!config.is_satisfied(101, 1_000));

        let config = SolveConfig::default().unbounded().with_max_solutions(3);
        assert!(!config.is_satisfied(1, 2));
        assert!(config.is_satisfied(1_000, 3));

        let config = SolveConfig::default().unbounded();
        assert!(!config.is_satisfied(0, usize::MAX));
    }
}
