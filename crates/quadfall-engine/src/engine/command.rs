use std::str::FromStr;

/// Discrete commands injected into the game by collaborators.
///
/// The mapping from physical keys or buttons to commands lives outside the
/// engine; illegal commands for the current phase are silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
    Reset,
}

/// Error returned when a command name is not part of the vocabulary.
///
/// Malformed input must be ignored rather than propagated, so callers
/// typically drop this error on the floor.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unrecognized command name: {name}")]
pub struct UnknownCommand {
    name: String,
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move-left" => Ok(Command::MoveLeft),
            "move-right" => Ok(Command::MoveRight),
            "soft-drop" => Ok(Command::SoftDrop),
            "rotate" => Ok(Command::Rotate),
            "hard-drop" => Ok(Command::HardDrop),
            "pause-toggle" => Ok(Command::TogglePause),
            "reset" => Ok(Command::Reset),
            _ => Err(UnknownCommand { name: s.to_owned() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_command_names_parse() {
        assert_eq!("move-left".parse::<Command>().unwrap(), Command::MoveLeft);
        assert_eq!("move-right".parse::<Command>().unwrap(), Command::MoveRight);
        assert_eq!("soft-drop".parse::<Command>().unwrap(), Command::SoftDrop);
        assert_eq!("rotate".parse::<Command>().unwrap(), Command::Rotate);
        assert_eq!("hard-drop".parse::<Command>().unwrap(), Command::HardDrop);
        assert_eq!(
            "pause-toggle".parse::<Command>().unwrap(),
            Command::TogglePause,
        );
        assert_eq!("reset".parse::<Command>().unwrap(), Command::Reset);
    }

    #[test]
    fn test_unknown_command_names_are_errors() {
        for name in ["", "hold", "MOVE-LEFT", "move left", "drop"] {
            let err = name.parse::<Command>().unwrap_err();
            assert!(err.to_string().contains("unrecognized"), "{name}");
        }
    }
}
