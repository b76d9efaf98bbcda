//! Countdown timer shown in the controls bar

use std::time::{Duration, Instant};

/// 15 minutes
pub const DEFAULT_SECONDS: u32 = 900;

#[derive(Debug, Clone)]
pub struct Timer {
    remaining: u32,
    last_set: u32,
    running: bool,
    last_tick: Option<Instant>,
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new(DEFAULT_SECONDS)
    }
}

impl Timer {
    pub fn new(seconds: u32) -> Self {
        Timer {
            remaining: seconds,
            last_set: seconds,
            running: false,
            last_tick: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self, now: Instant) {
        if self.remaining > 0 {
            self.running = true;
            self.last_tick = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick = None;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.running {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Back to the last duration the user set, stopped
    pub fn reset(&mut self) {
        self.stop();
        self.remaining = self.last_set;
    }

    /// Set the duration from `m:ss` input
    pub fn set_from_input(&mut self, input: &str) {
        let seconds = parse_time_input(input);
        self.remaining = seconds;
        self.last_set = seconds;
    }

    /// Count down one second per whole second elapsed since the last tick
    pub fn tick(&mut self, now: Instant) {
        if !self.running {
            return;
        }
        let Some(mut last) = self.last_tick else {
            self.last_tick = Some(now);
            return;
        };

        while self.remaining > 0 && now.duration_since(last) >= Duration::from_secs(1) {
            self.remaining -= 1;
            last += Duration::from_secs(1);
        }
        self.last_tick = Some(last);

        if self.remaining == 0 {
            self.stop();
        }
    }

    pub fn display(&self) -> String {
        format_time(self.remaining)
    }
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parse `m:ss`. Any other shape gives the default; bad numbers count as 0.
pub fn parse_time_input(input: &str) -> u32 {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() != 2 {
        return DEFAULT_SECONDS;
    }
    let mins = leading_int(parts[0]);
    let secs = leading_int(parts[1]);
    mins.saturating_mul(60).saturating_add(secs)
}

/// Leading decimal digits after optional whitespace, 0 if there are none
fn leading_int(s: &str) -> u32 {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(900), "15:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn test_parse_time_input() {
        assert_eq!(parse_time_input("5:30"), 330);
        assert_eq!(parse_time_input("10:00"), 600);
        assert_eq!(parse_time_input("abc:10"), 10);
        assert_eq!(parse_time_input("7"), DEFAULT_SECONDS);
        assert_eq!(parse_time_input("1:2:3"), DEFAULT_SECONDS);
        assert_eq!(parse_time_input("2x:05"), 125);
    }

    #[test]
    fn test_tick_counts_down_while_running() {
        let start = Instant::now();
        let mut timer = Timer::new(10);
        timer.tick(start + Duration::from_secs(3));
        assert_eq!(timer.remaining(), 10);

        timer.start(start);
        timer.tick(start + Duration::from_millis(2500));
        assert_eq!(timer.remaining(), 8);
        timer.tick(start + Duration::from_millis(3100));
        assert_eq!(timer.remaining(), 7);
    }

    #[test]
    fn test_tick_stops_at_zero() {
        let start = Instant::now();
        let mut timer = Timer::new(2);
        timer.start(start);
        timer.tick(start + Duration::from_secs(30));
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_reset_restores_last_set_duration() {
        let start = Instant::now();
        let mut timer = Timer::default();
        timer.set_from_input("1:00");
        timer.start(start);
        timer.tick(start + Duration::from_secs(20));
        assert_eq!(timer.display(), "0:40");

        timer.reset();
        assert_eq!(timer.remaining(), 60);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_start_with_nothing_left_does_not_run() {
        let mut timer = Timer::new(0);
        timer.start(Instant::now());
        assert!(!timer.is_running());
    }
}
