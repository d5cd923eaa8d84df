use std::fmt;
use std::str::FromStr;

/// Whether a finished track gets put back into the queue, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    None,
    Song,
    Queue,
}

impl LoopMode {
    /// Next mode for the 🔁 reaction: none -> song -> queue -> none.
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::Song,
            Self::Song => Self::Queue,
            Self::Queue => Self::None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::None => "Loop mode disabled.",
            Self::Song => "Loop mode: repeating the current song.",
            Self::Queue => "Loop mode: repeating the whole queue.",
        }
    }
}

impl FromStr for LoopMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "song" => Ok(Self::Song),
            "queue" => Ok(Self::Queue),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Song => write!(f, "song"),
            Self::Queue => write!(f, "queue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("none".parse(), Ok(LoopMode::None));
        assert_eq!("SONG".parse(), Ok(LoopMode::Song));
        assert_eq!("Queue".parse(), Ok(LoopMode::Queue));
    }

    #[test]
    fn rejects_unknown_modes() {
        assert_eq!(LoopMode::from_str("track"), Err(()));
        assert_eq!(LoopMode::from_str(""), Err(()));
    }

    #[test]
    fn cycle_covers_all_modes() {
        assert_eq!(LoopMode::None.cycle(), LoopMode::Song);
        assert_eq!(LoopMode::Song.cycle(), LoopMode::Queue);
        assert_eq!(LoopMode::Queue.cycle(), LoopMode::None);
    }
}
