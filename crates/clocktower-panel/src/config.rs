//! Panel link settings and protocol timing.

use std::time::Duration;

/// Serial link settings.
#[derive(Debug, Clone)]
pub struct PanelSettings {
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Read timeout for a single serial read.
    pub read_timeout: Duration,
    /// Number of player slots on the panel.
    pub max_players: usize,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            read_timeout: Duration::from_millis(100),
            max_players: 15,
        }
    }
}

impl PanelSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Sets the read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the number of player slots.
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }
}

/// Fixed waits used by the protocol driver.
///
/// The firmware gives no acknowledgement, so these sleeps are the only
/// synchronisation between a command and its effects on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTiming {
    /// Wait after a command before draining buffered responses.
    pub settle_delay: Duration,
    /// Wait between the `day` signal and `enomin` when voting ends.
    pub nomination_end_pause: Duration,
}

impl Default for PanelTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
            nomination_end_pause: Duration::from_secs(1),
        }
    }
}

impl PanelTiming {
    /// No waits at all. Intended for tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            nomination_end_pause: Duration::ZERO,
        }
    }

    /// Sets the settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets the end-of-nominations pause.
    pub fn with_nomination_end_pause(mut self, pause: Duration) -> Self {
        self.nomination_end_pause = pause;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PanelSettings::default();
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.read_timeout, Duration::from_millis(100));
        assert_eq!(settings.max_players, 15);
    }

    #[test]
    fn test_default_timing() {
        let timing = PanelTiming::default();
        assert_eq!(timing.settle_delay, Duration::from_millis(500));
        assert_eq!(timing.nomination_end_pause, Duration::from_secs(1));
    }

    #[test]
    fn test_builders() {
        let settings = PanelSettings::new().with_baud_rate(9600).with_max_players(8);
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.max_players, 8);

        let timing = PanelTiming::immediate().with_nomination_end_pause(Duration::from_millis(20));
        assert_eq!(timing.settle_delay, Duration::ZERO);
        assert_eq!(timing.nomination_end_pause, Duration::from_millis(20));
    }
}
