//! Session-wide interaction mode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether mutation controls are interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Read-only browsing; collapse toggles still work.
    #[default]
    View,
    /// Nodes are draggable and expose add/delete/rename controls.
    Edit,
}

impl Mode {
    /// Parse mode from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            _ => None,
        }
    }

    /// Whether this is edit mode.
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Edit => write!(f, "edit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        for mode in [Mode::View, Mode::Edit] {
            assert_eq!(Mode::from_str(&mode.to_string()), Some(mode));
        }
        assert_eq!(Mode::from_str("EDIT"), Some(Mode::Edit));
        assert_eq!(Mode::from_str("draw"), None);
    }

    #[test]
    fn test_default_is_view() {
        assert_eq!(Mode::default(), Mode::View);
    }
}
