use std::fmt;

use crate::model::House;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaError {
    // イベントの前提条件(手番, 所持牌など)が満たされていない
    // 一度発生したらレプリカは破棄してスナップショットから作り直すこと
    Desync { event: String, message: String },
    // 和了形でない, または0翻
    InvalidWin { house: House, message: String },
    // 初期スナップショットの不整合
    Snapshot { message: String },
}

impl ReplicaError {
    pub fn desync(event: &str, message: impl Into<String>) -> Self {
        ReplicaError::Desync {
            event: event.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_win(house: House, message: impl Into<String>) -> Self {
        ReplicaError::InvalidWin {
            house,
            message: message.into(),
        }
    }

    pub fn is_desync(&self) -> bool {
        matches!(self, ReplicaError::Desync { .. })
    }
}

impl fmt::Display for ReplicaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplicaError::Desync { event, message } => {
                write!(f, "Desync on '{}': {}", event, message)
            }
            ReplicaError::InvalidWin { house, message } => {
                write!(f, "Invalid win by {}: {}", house, message)
            }
            ReplicaError::Snapshot { message } => {
                write!(f, "Invalid snapshot: {}", message)
            }
        }
    }
}

impl std::error::Error for ReplicaError {}

pub type ReplicaResult<T> = Result<T, ReplicaError>;

#[test]
fn test_error_display() {
    let e = ReplicaError::desync("discard", "not your turn");
    assert!(e.is_desync());
    assert_eq!(e.to_string(), "Desync on 'discard': not your turn");

    let e = ReplicaError::invalid_win(House::W, "zero fan");
    assert!(!e.is_desync());
    assert_eq!(e.to_string(), "Invalid win by w: zero fan");
}
