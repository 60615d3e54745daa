//! Solar position for the sun/shadow overlay.
//!
//! Simplified model: declination from the day of year, equation-of-time
//! correction, then altitude/azimuth from the local hour angle. Azimuth is
//! measured from +Z toward +X, the same frame the renderer uses for the sun
//! light.

use chrono::{Datelike, Local, NaiveDate};
use glam::DVec3;

/// Below this `cos(altitude)` the azimuth is undefined and reported as 0
const ZENITH_EPSILON: f64 = 1e-9;

/// Sun angles in radians plus the unit direction toward the sun
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub altitude: f64,
    pub azimuth: f64,
    pub declination: f64,
    pub direction: DVec3,
}

impl SunPosition {
    /// Point on a sphere of `radius` around the origin where the sun is drawn
    pub fn world_position(&self, radius: f64) -> DVec3 {
        self.direction * radius
    }

    /// Sun is above the horizon
    pub fn is_day(&self) -> bool {
        self.altitude > 0.0
    }

    pub fn altitude_degrees(&self) -> f64 {
        self.altitude.to_degrees()
    }

    pub fn azimuth_degrees(&self) -> f64 {
        self.azimuth.to_degrees()
    }
}

/// Sun position for a location, day of year (1..=365) and UTC hour
pub fn sun_position(latitude: f64, longitude: f64, day_of_year: u16, utc_hour: f64) -> SunPosition {
    let b = (360.0 / 365.0 * (f64::from(day_of_year) - 81.0)).to_radians();
    let declination = (23.45 * b.sin()).to_radians();

    // Equation of time, minutes
    let eot = 9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin();
    let solar_time = utc_hour + longitude / 15.0 + eot / 60.0;
    let hour_angle = (15.0 * (solar_time - 12.0)).to_radians();

    let lat = latitude.to_radians();
    let sin_alt = lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    let cos_alt = altitude.cos();
    let azimuth = if cos_alt.abs() < ZENITH_EPSILON {
        0.0
    } else {
        let cos_az = (declination.sin() * lat.cos()
            - declination.cos() * lat.sin() * hour_angle.cos())
            / cos_alt;
        let az = cos_az.clamp(-1.0, 1.0).acos();
        // Afternoon
        if hour_angle.sin() > 0.0 {
            std::f64::consts::TAU - az
        } else {
            az
        }
    };

    let direction = DVec3::new(
        azimuth.sin() * cos_alt,
        altitude.sin(),
        azimuth.cos() * cos_alt,
    );

    SunPosition {
        altitude,
        azimuth,
        declination,
        direction,
    }
}

/// Sample the sun over one UTC day, keeping only samples above the horizon.
///
/// Returns `(utc_hour, position)` pairs in time order.
pub fn daily_path(
    latitude: f64,
    longitude: f64,
    day_of_year: u16,
    samples: usize,
) -> Vec<(f64, SunPosition)> {
    if samples < 2 {
        return Vec::new();
    }
    let step = 24.0 / (samples - 1) as f64;
    (0..samples)
        .map(|i| i as f64 * step)
        .map(|hour| (hour, sun_position(latitude, longitude, day_of_year, hour)))
        .filter(|(_, pos)| pos.is_day())
        .collect()
}

/// Day of year (1-based) of a calendar date
pub fn day_of_year(date: NaiveDate) -> u16 {
    date.ordinal() as u16
}

/// Calendar date of a day of year; `None` if the day does not exist in that year
pub fn date_from_day_of_year(year: i32, day: u16) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year, u32::from(day))
}

/// Calendar date of a day of year in the current local year
pub fn date_in_current_year(day: u16) -> Option<NaiveDate> {
    date_from_day_of_year(Local::now().year(), day)
}
