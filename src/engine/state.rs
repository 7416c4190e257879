use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CupSettings {
    pub cups: usize,
    pub shuffle_moves: u32,
    pub shuffle_speed_ms: u64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn pair_count(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 6,
            Difficulty::Hard => 8,
        }
    }

    pub fn cup_settings(self) -> CupSettings {
        match self {
            Difficulty::Easy => CupSettings {
                cups: 3,
                shuffle_moves: 10,
                shuffle_speed_ms: 300,
            },
            Difficulty::Medium => CupSettings {
                cups: 4,
                shuffle_moves: 15,
                shuffle_speed_ms: 250,
            },
            Difficulty::Hard => CupSettings {
                cups: 5,
                shuffle_moves: 20,
                shuffle_speed_ms: 200,
            },
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_token_or_default(token: &str) -> Self {
        token.parse().unwrap_or_else(|err: InputError| {
            log::warn!("{err}; using {}", Difficulty::default().token());
            Difficulty::default()
        })
    }
}

impl FromStr for Difficulty {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(InputError::UnknownDifficulty(value.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

pub fn format_mm_ss(total_secs: u32) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(InputError::UnknownDifficulty("expert".to_string()))
        );
    }

    #[test]
    fn unknown_token_falls_back_to_easy() {
        assert_eq!(Difficulty::from_token_or_default("insane"), Difficulty::Easy);
    }

    #[test]
    fn tables_follow_difficulty() {
        let pairs: Vec<usize> = Difficulty::ALL.iter().map(|d| d.pair_count()).collect();
        assert_eq!(pairs, vec![4, 6, 8]);
        assert_eq!(
            Difficulty::Medium.cup_settings(),
            CupSettings {
                cups: 4,
                shuffle_moves: 15,
                shuffle_speed_ms: 250,
            }
        );
        assert_eq!(Difficulty::Hard.cup_settings().cups, 5);
    }

    #[test]
    fn clock_format_pads_minutes_and_seconds() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(75), "01:15");
        assert_eq!(format_mm_ss(3600), "60:00");
    }
}
