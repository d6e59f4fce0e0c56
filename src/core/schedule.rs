//! Unattended-run schedule: channel pool, tone pool, posting window.

use chrono::Timelike;
use serde::Serialize;

use crate::domain::Tone;
use crate::error::ConfigError;

pub const DEFAULT_POST_LIMIT: usize = 3;
pub const DEFAULT_REPLY_LIMIT: usize = 5;
pub const DEFAULT_CHANNEL_ATTEMPTS: u32 = 3;

/// Local hours during which live posting is allowed.
/// Start is inclusive, end is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostingWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl PostingWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "posting hours must satisfy start < end <= 24, got {}..{}",
                start_hour, end_hour
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

impl Default for PostingWindow {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 18,
        }
    }
}

/// Source of the wall-clock hour
pub trait Clock: Send + Sync {
    fn current_hour(&self) -> u32;
}

/// The machine's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn current_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// A clock stuck at one hour
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_hour(&self) -> u32 {
        self.0
    }
}

/// Everything the unattended run draws from
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    /// Channels drawn uniformly at each attempt
    pub channels: Vec<String>,

    /// Operational tone subset, smaller than the full catalog
    pub tones: Vec<Tone>,

    pub window: PostingWindow,

    /// Channel attempts before giving up
    pub channel_attempts: u32,

    /// Posts fetched per channel
    pub post_limit: usize,

    /// Replies fetched as generation context
    pub reply_limit: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            tones: vec![Tone::Auto, Tone::Funny, Tone::Analytical, Tone::Controversial],
            window: PostingWindow::default(),
            channel_attempts: DEFAULT_CHANNEL_ATTEMPTS,
            post_limit: DEFAULT_POST_LIMIT,
            reply_limit: DEFAULT_REPLY_LIMIT,
        }
    }
}

pub fn default_channels() -> Vec<String> {
    ["AskReddit", "askmen", "YouShouldKnow", "programming", "todayilearned"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Schedule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::Invalid("channel list is empty".to_string()));
        }
        if self.channels.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "channel list contains a blank name".to_string(),
            ));
        }
        if self.tones.is_empty() {
            return Err(ConfigError::Invalid("tone list is empty".to_string()));
        }
        if self.channel_attempts == 0 {
            return Err(ConfigError::Invalid(
                "channel_attempts must be at least 1".to_string(),
            ));
        }
        if self.post_limit == 0 {
            return Err(ConfigError::Invalid(
                "post_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        let window = PostingWindow::default();
        assert!(!window.contains(8));
        assert!(window.contains(9));
        assert!(window.contains(17));
        assert!(!window.contains(18));
        assert!(!window.contains(23));
    }

    #[test]
    fn test_window_rejects_inverted_hours() {
        assert!(PostingWindow::new(18, 9).is_err());
        assert!(PostingWindow::new(9, 9).is_err());
        assert!(PostingWindow::new(0, 25).is_err());
        assert!(PostingWindow::new(0, 24).unwrap().contains(23));
    }

    #[test]
    fn test_default_schedule() {
        let schedule = Schedule::default();
        assert!(schedule.validate().is_ok());
        assert_eq!(schedule.channels.len(), 5);
        assert_eq!(schedule.channel_attempts, 3);
        assert!(!schedule.tones.contains(&Tone::Supportive));
    }

    #[test]
    fn test_validate_rejects_empty_pools() {
        let schedule = Schedule {
            channels: vec![],
            ..Default::default()
        };
        assert!(schedule.validate().is_err());

        let schedule = Schedule {
            tones: vec![],
            ..Default::default()
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_channel() {
        let schedule = Schedule {
            channels: vec!["".to_string(), "rust".to_string()],
            ..Default::default()
        };
        assert!(schedule.validate().is_err());

        let schedule = Schedule {
            channels: vec!["rust".to_string(), "  ".to_string()],
            ..Default::default()
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(13).current_hour(), 13);
        assert!(LocalClock.current_hour() < 24);
    }
}
