//! Control actions sent by a client.

use std::fmt;
use std::str::FromStr;

/// A single control input.
///
/// `None` means a control was released; every other variant is an
/// *effective* action that advances the session's frame counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    None,
    /// `W`
    Forward,
    /// `A`
    Left,
    /// `S`
    Brake,
    /// `D`
    Right,
}

impl Action {
    /// Wire spelling of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Forward => "W",
            Action::Left => "A",
            Action::Brake => "S",
            Action::Right => "D",
        }
    }

    /// Whether this action advances the frame counter.
    pub fn is_effective(&self) -> bool {
        !matches!(self, Action::None)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded action value outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid action {0:?}")]
pub struct InvalidAction(pub String);

impl FromStr for Action {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Action::None),
            "W" => Ok(Action::Forward),
            "A" => Ok(Action::Left),
            "S" => Ok(Action::Brake),
            "D" => Ok(Action::Right),
            other => Err(InvalidAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_spellings() {
        for action in [
            Action::None,
            Action::Forward,
            Action::Left,
            Action::Brake,
            Action::Right,
        ] {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn rejects_unknown_and_lowercase() {
        assert_eq!("w".parse::<Action>(), Err(InvalidAction("w".into())));
        assert!("jump".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn only_none_is_neutral() {
        assert!(!Action::None.is_effective());
        assert!(Action::Forward.is_effective());
        assert!(Action::Right.is_effective());
    }
}
