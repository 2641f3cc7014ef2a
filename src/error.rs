/// Errors surfaced by game states, actions and the game driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid action {action}: {reason}")]
    InvalidAction { action: String, reason: String },

    #[error("unsupported board dimension {0} (expected an even width in 2..=8)")]
    UnsupportedDimension(usize),

    #[error("{0} returned no action for an ongoing game")]
    NoAction(String),

    #[error("cannot parse move: {0}")]
    ParseMove(String),

    #[error("cannot parse board: {0}")]
    ParseBoard(String),
}

impl GameError {
    pub fn invalid_action(action: impl ToString, reason: impl Into<String>) -> Self {
        GameError::InvalidAction {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_action_display() {
        let err = GameError::invalid_action("d3", "not player two's turn");
        assert_eq!(err.to_string(), "invalid action d3: not player two's turn");
    }

    #[test]
    fn test_unsupported_dimension_display() {
        let err = GameError::UnsupportedDimension(9);
        assert_eq!(
            err.to_string(),
            "unsupported board dimension 9 (expected an even width in 2..=8)"
        );
    }
}
