//! In-world clock: converts elapsed real time into discrete minute ticks.
//!
//! The clock accumulates real seconds and emits one [`Tick`] for every
//! `real_seconds_per_minute` crossed, so a long frame never swallows ticks.
//! Minutes roll into hours and hours into days. Pausing discards the real
//! time that passes while paused; the partial accumulator from before the
//! pause survives.
//!
//! ```
//! use templanter_logic::clock::SimClock;
//! use templanter_logic::config::TimeConfig;
//!
//! let mut clock = SimClock::new(TimeConfig::default());
//! let ticks = clock.advance(2.5);
//! assert_eq!(ticks.len(), 2);
//! assert_eq!(clock.time_string(), "06:02 AM");
//! ```

use serde::{Deserialize, Serialize};

use crate::config::TimeConfig;
use crate::constants::time::{HOURS_PER_DAY, MINUTES_PER_HOUR};

/// One in-world minute that has just elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Total in-world minutes elapsed since the clock started, including this tick.
    pub index: u64,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    /// This tick rolled the hour over.
    pub hour_rolled: bool,
    /// This tick rolled the day over (midnight).
    pub day_rolled: bool,
}

/// Coarse label for the hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    config: TimeConfig,
    day: u32,
    hour: u32,
    minute: u32,
    elapsed_minutes: u64,
    /// Real seconds not yet converted into a tick.
    accumulator: f64,
    paused: bool,
}

impl SimClock {
    pub fn new(config: TimeConfig) -> Self {
        Self {
            day: 1,
            hour: config.day_start_hour,
            minute: 0,
            elapsed_minutes: 0,
            accumulator: 0.0,
            paused: false,
            config,
        }
    }

    /// Feed real elapsed seconds; returns the ticks that fired, oldest first.
    ///
    /// Ignored while paused, for negative or non-finite input, and when the
    /// configured seconds-per-minute is not a positive finite number.
    pub fn advance(&mut self, real_seconds: f32) -> Vec<Tick> {
        if self.paused || !real_seconds.is_finite() || real_seconds <= 0.0 {
            return Vec::new();
        }

        let threshold = f64::from(self.config.real_seconds_per_minute);
        if !threshold.is_finite() || threshold <= 0.0 {
            log::warn!("clock stalled: real_seconds_per_minute is {}", threshold);
            return Vec::new();
        }
        self.accumulator += f64::from(real_seconds);

        let mut ticks = Vec::new();
        while self.accumulator >= threshold {
            self.accumulator -= threshold;
            ticks.push(self.step());
        }
        ticks
    }

    /// Advance exactly one in-world minute, bypassing the real-time accumulator.
    pub fn step(&mut self) -> Tick {
        self.elapsed_minutes += 1;
        self.minute += 1;

        let mut hour_rolled = false;
        let mut day_rolled = false;
        if self.minute >= MINUTES_PER_HOUR {
            self.minute = 0;
            self.hour += 1;
            hour_rolled = true;

            if self.hour >= HOURS_PER_DAY {
                self.hour = 0;
                self.day += 1;
                day_rolled = true;
            }
        }

        Tick {
            index: self.elapsed_minutes,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            hour_rolled,
            day_rolled,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Monotonic in-world minute counter; plants stamp watering times with it.
    pub fn now(&self) -> u64 {
        self.elapsed_minutes
    }

    pub fn config(&self) -> &TimeConfig {
        &self.config
    }

    pub fn is_day(&self) -> bool {
        self.hour >= self.config.day_start_hour && self.hour < self.config.night_start_hour
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        match self.hour {
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=19 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// 12-hour clock string, e.g. `"01:05 PM"`.
    pub fn time_string(&self) -> String {
        let display_hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        let period = if self.hour < 12 { "AM" } else { "PM" };
        format!("{:02}:{:02} {}", display_hour, self.minute, period)
    }

    /// Restore a calendar position (used when loading a save).
    pub fn set_time(&mut self, day: u32, hour: u32, minute: u32, elapsed_minutes: u64) {
        self.day = day.max(1);
        self.hour = hour % HOURS_PER_DAY;
        self.minute = minute % MINUTES_PER_HOUR;
        self.elapsed_minutes = elapsed_minutes;
        self.accumulator = 0.0;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}
