//! Simulator configuration read from the environment.

use std::path::PathBuf;

use handfoot_core::{Classifier, DiscardPolicy, GameError, MeldMethod, RuleSet};
use serde::Serialize;
use thiserror::Error;

/// Configuration problems found before the game starts
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{var} is not a valid seed: {value:?}")]
    BadSeed { var: &'static str, value: String },

    #[error("Cannot read rules from {path:?}: {source}")]
    RulesFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse rules from {path:?}: {source}")]
    RulesFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unknown discard policy {0:?}")]
    BadDiscard(String),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// A seat at the table: name, shuffle precision and shuffle speed
#[derive(Debug, Clone, Serialize)]
pub struct Seat {
    pub name: &'static str,
    pub precision: usize,
    pub speed: f64,
}

pub const SEATS: [Seat; 4] = [
    Seat { name: "J", precision: 5, speed: 1.2 },
    Seat { name: "S", precision: 10, speed: 1.0 },
    Seat { name: "L", precision: 7, speed: 1.0 },
    Seat { name: "A", precision: 15, speed: 0.9 },
];

/// Settings for one simulated game
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    pub seed: Option<u64>,
    pub rules: RuleSet,
    pub discard: DiscardPolicy,
    /// Turns allowed per round before the round is closed
    pub max_turns: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rules: RuleSet::default(),
            discard: DiscardPolicy::default(),
            max_turns: 1000,
        }
    }
}

impl SimConfig {
    /// Build the configuration from `HANDFOOT_*` variables
    pub fn from_env() -> Result<Self, SimError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SimError> {
        let mut config = SimConfig::default();

        if let Some(value) = lookup("HANDFOOT_SEED") {
            let seed = value.trim().parse().map_err(|_| SimError::BadSeed {
                var: "HANDFOOT_SEED",
                value: value.clone(),
            })?;
            config.seed = Some(seed);
        }

        if let Some(path) = lookup("HANDFOOT_RULES") {
            let path = PathBuf::from(path);
            let text = std::fs::read_to_string(&path).map_err(|source| SimError::RulesFile {
                path: path.clone(),
                source,
            })?;
            config.rules = serde_json::from_str(&text)
                .map_err(|source| SimError::RulesFormat { path, source })?;
        }

        if let Some(value) = lookup("HANDFOOT_MELD_METHOD") {
            let method: MeldMethod = value.parse()?;
            config.rules.classifier = Classifier::new(method, config.rules.classifier.wild_ranks);
        }

        if let Some(value) = lookup("HANDFOOT_DISCARD") {
            config.discard = parse_discard(&value)?;
        }

        config.rules.validate()?;
        Ok(config)
    }
}

fn parse_discard(value: &str) -> Result<DiscardPolicy, SimError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "smallest_meld" => Ok(DiscardPolicy::SmallestMeld),
        "desirability" => Ok(DiscardPolicy::Desirability),
        _ => Err(SimError::BadDiscard(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.rules, RuleSet::default());
        assert_eq!(config.discard, DiscardPolicy::SmallestMeld);
    }

    #[test]
    fn test_overrides() {
        let config = SimConfig::from_lookup(lookup(&[
            ("HANDFOOT_SEED", "42"),
            ("HANDFOOT_MELD_METHOD", "rank"),
            ("HANDFOOT_DISCARD", "desirability"),
        ]))
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.rules.classifier.method, MeldMethod::Rank);
        assert_eq!(
            config.rules.classifier.wild_ranks,
            Classifier::default().wild_ranks
        );
        assert_eq!(config.discard, DiscardPolicy::Desirability);
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            SimConfig::from_lookup(lookup(&[("HANDFOOT_SEED", "soon")])),
            Err(SimError::BadSeed { .. })
        ));
        assert!(matches!(
            SimConfig::from_lookup(lookup(&[("HANDFOOT_MELD_METHOD", "suit")])),
            Err(SimError::Game(GameError::InvalidMethod(_)))
        ));
        assert!(matches!(
            SimConfig::from_lookup(lookup(&[("HANDFOOT_DISCARD", "random")])),
            Err(SimError::BadDiscard(_))
        ));
        assert!(matches!(
            SimConfig::from_lookup(lookup(&[("HANDFOOT_RULES", "/nonexistent/rules.json")])),
            Err(SimError::RulesFile { .. })
        ));
    }
}
