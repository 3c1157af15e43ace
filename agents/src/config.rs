use crate::error::{AgentError, AgentResult};
use serde::{Deserialize, Serialize};

/// How the mobility term counts legal moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilityMode {
    /// White's legal-move count minus Black's, whoever is to move.
    #[default]
    Symmetric,
    /// Only the side to move is counted, signed by that side.
    SideToMove,
}

/// Tunables for search, evaluation and the anti-repetition guard.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Main search depth in plies.
    pub depth: u8,
    /// Extend leaves with a capture/check search instead of a static score.
    pub quiescence: bool,
    /// Extra plies the quiescence search may add.
    pub quiescence_depth: u8,
    /// Flip piece-square lookups for Black. Off by default: both colours
    /// read the tables with the raw square index.
    pub mirror_tables: bool,
    pub mobility: MobilityMode,
    /// The opening book is consulted while the full-move number is at most this.
    pub book_max_fullmove: u32,
    pub history_capacity: usize,
    /// How many of the most recent moves the repetition penalty looks at.
    pub repetition_window: usize,
    /// Penalty per recent occurrence, in centipawns.
    pub repetition_penalty: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth: 3,
            quiescence: true,
            quiescence_depth: 6,
            mirror_tables: false,
            mobility: MobilityMode::Symmetric,
            book_max_fullmove: 5,
            history_capacity: 20,
            repetition_window: 6,
            repetition_penalty: 100,
        }
    }
}

impl EngineConfig {
    pub fn with_depth(depth: u8) -> Self {
        EngineConfig {
            depth,
            ..Self::default()
        }
    }

    /// Parses a JSON document and validates the result.
    pub fn from_json(text: &str) -> AgentResult<Self> {
        let config: EngineConfig =
            serde_json::from_str(text).map_err(|e| AgentError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AgentResult<()> {
        if self.depth == 0 {
            return Err(AgentError::InvalidConfig {
                reason: "depth must be at least 1".to_string(),
            });
        }
        if self.history_capacity < self.repetition_window {
            return Err(AgentError::InvalidConfig {
                reason: format!(
                    "history_capacity ({}) is smaller than repetition_window ({})",
                    self.history_capacity, self.repetition_window
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.depth, 3);
        assert_eq!(config.quiescence_depth, 6);
        assert!(!config.mirror_tables);
        assert_eq!(config.history_capacity, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(r#"{"depth": 2, "mobility": "side_to_move"}"#).unwrap();
        assert_eq!(config.depth, 2);
        assert_eq!(config.mobility, MobilityMode::SideToMove);
        assert!(config.quiescence);
        assert_eq!(config.repetition_penalty, 100);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"depth": 0}"#),
            Err(AgentError::InvalidConfig { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"history_capacity": 4}"#),
            Err(AgentError::InvalidConfig { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json("{depth"),
            Err(AgentError::InvalidConfig { .. })
        ));
    }
}
