//! Cyclical time of day and the lighting state derived from it.

use std::{f32::consts::TAU, time::Duration};

use glam::Vec3;

const HOURS_PER_DAY: f32 = 24.0;
const DAWN: f32 = 6.0;
const DUSK: f32 = 18.0;
const SUN_DISTANCE: f32 = 100.0;
const SUN_MIN_HEIGHT: f32 = 10.0;

/// Game clock measured in hours within `[0, 24)`.
#[derive(Clone, Debug)]
pub struct DayNightClock {
    hour: f32,
    hours_per_second: f32,
    is_day: bool,
}

impl DayNightClock {
    /// Creates a clock at `hour` advancing by `hours_per_second` of simulated time.
    #[must_use]
    pub fn starting_at(hour: f32, hours_per_second: f32) -> Self {
        let hour = wrap(hour);
        Self {
            hour,
            hours_per_second,
            is_day: is_day_at(hour),
        }
    }

    /// Current hour of the day.
    #[must_use]
    pub const fn hour(&self) -> f32 {
        self.hour
    }

    /// Whether the current hour lies strictly between dawn and dusk.
    #[must_use]
    pub const fn is_day(&self) -> bool {
        self.is_day
    }

    /// Advances the clock and returns the new day flag when it flipped.
    pub fn advance(&mut self, dt: Duration) -> Option<bool> {
        if self.hours_per_second == 0.0 {
            return None;
        }

        self.hour = wrap(self.hour + dt.as_secs_f32() * self.hours_per_second);
        let is_day = is_day_at(self.hour);
        if is_day == self.is_day {
            return None;
        }
        self.is_day = is_day;
        Some(is_day)
    }

    /// Position of the sun light source for the current hour.
    ///
    /// The sun rises in the east at 06:00, peaks at noon and never dips
    /// below a minimum height so that the scene keeps a usable shadow caster.
    #[must_use]
    pub fn sun_position(&self) -> Vec3 {
        let angle = (self.hour / HOURS_PER_DAY) * TAU - TAU / 4.0;
        let (sin, cos) = angle.sin_cos();
        Vec3::new(
            cos * SUN_DISTANCE,
            (sin * SUN_DISTANCE).max(SUN_MIN_HEIGHT),
            sin * SUN_DISTANCE,
        )
    }
}

fn wrap(hour: f32) -> f32 {
    if !hour.is_finite() {
        return 0.0;
    }
    let wrapped = hour.rem_euclid(HOURS_PER_DAY);
    // rem_euclid may round up to the modulus for tiny negative inputs.
    if wrapped >= HOURS_PER_DAY {
        0.0
    } else {
        wrapped
    }
}

fn is_day_at(hour: f32) -> bool {
    hour > DAWN && hour < DUSK
}
