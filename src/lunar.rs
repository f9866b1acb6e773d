//! Moon phase, position & rise/set times (Schaefer 1985/1994 ephemeris)
//!
//! Low-precision lunar ephemeris from the Sky & Telescope BASIC programs
//! "MOONFX.BAS" (Apr 1994) and the original phase routine (Mar 1985).
//! Accuracy: ±1 day for the phase index; a few degrees for λ, β; ~6 % for Δ.
//!
//! On top of the ephemeris this module answers "where is the moon and how lit
//! is it" for an observer. Illumination is reported with the same sign
//! convention as rendering phases: negative while waxing, positive while waning.

use core::f64::consts::PI;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MoonError, Result};

/// Mean synodic month in days.
const SYNODIC_MONTH: f64 = 29.530_588_2;

/// Mean obliquity of the ecliptic (J2000), degrees.
const OBLIQUITY_DEG: f64 = 23.439_3;

/// Altitude of the moon's center at rise/set, degrees (parallax minus refraction).
const RISE_ALTITUDE_DEG: f64 = 0.125;

/// Step used when scanning a day for rise and set.
const SCAN_STEP_MINUTES: i64 = 10;

/// Everything Schaefer's 1994 routine computes.
#[derive(Debug, Clone, Copy)]
pub struct LunarEphemeris {
    /// Phase index 0 – 7 (0 = new, 4 = full).
    pub phase_index: u8,
    /// Age of the Moon in civil days since New.
    pub age_days: f64,
    /// Illuminated fraction (0–1).
    pub illum_frac: f64,
    /// Geocentric distance in Earth radii.
    pub distance_er: f64,
    /// Ecliptic longitude (deg, low precision).
    pub lon_deg: f64,
    /// Ecliptic latitude (deg, low precision).
    pub lat_deg: f64,
}

/// Compute Schaefer's phase & ephemeris for a proleptic-Gregorian Y-M-D.
///
/// `year` is astronomer's year (e.g. 2000).
/// `month` is 1 = Jan … 12 = Dec.
/// `day` can be fractional (UTC noon = 0.5).
pub fn schaefer_moon(year: i32, month: u32, day: f64) -> LunarEphemeris {
    // Jan/Feb count as months 13/14 of the previous year, then shift so Mar = 1
    let (mut y, mut m) = (year, month as i32);
    if m < 3 {
        y -= 1;
        m += 12;
    }
    m += 1;

    // Days since the 1900-01-00 12 UT new moon epoch
    let days = (365.25 * y as f64).floor() + (30.6 * m as f64).floor() + day - 694_039.09;

    // Fraction of the current synodic cycle
    let cycle = fraction(days / SYNODIC_MONTH);
    let phase_index = ((cycle * 8.0) + 0.5).floor() as u8 & 7;
    let age_days = cycle * SYNODIC_MONTH;
    let illum_frac = ((1.0 - (2.0 * PI * cycle).cos()) / 2.0).clamp(0.0, 1.0);
    let elongation = 2.0 * cycle * 2.0 * PI;

    // Anomalistic month → distance
    let dp = fraction((days + 2_451_550.1 - 2_451_562.2) / 27.554_549_88) * 2.0 * PI;
    let distance_er = 60.4 - 3.3 * dp.cos() - 0.6 * (elongation - dp).cos() - 0.5 * elongation.cos();

    // Draconic month → ecliptic latitude
    let np = fraction((days + 2_451_550.1 - 2_451_565.2) / 27.212_220_817) * 2.0 * PI;
    let lat_deg = 5.1 * np.sin();

    // Sidereal month → ecliptic longitude
    let rp = fraction((days + 2_451_550.1 - 2_451_555.8) / 27.321_582_241);
    let lon_deg = (360.0 * rp + 6.3 * dp.sin() + 1.3 * (elongation - dp).sin() + 0.7 * elongation.sin())
        .rem_euclid(360.0);

    LunarEphemeris {
        phase_index,
        age_days,
        illum_frac,
        distance_er,
        lon_deg,
        lat_deg,
    }
}

fn fraction(v: f64) -> f64 {
    v - v.floor()
}

/// Schaefer ephemeris at an instant, using the fractional UTC day.
pub fn ephemeris_at(when: DateTime<Utc>) -> LunarEphemeris {
    let day = when.day() as f64
        + (when.hour() as f64 + when.minute() as f64 / 60.0 + when.second() as f64 / 3600.0) / 24.0;
    schaefer_moon(when.year(), when.month(), day)
}

/// Named phase of the moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseCategory {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl PhaseCategory {
    /// Map Schaefer's 0–7 phase index.
    pub fn from_index(index: u8) -> Self {
        match index & 7 {
            0 => PhaseCategory::NewMoon,
            1 => PhaseCategory::WaxingCrescent,
            2 => PhaseCategory::FirstQuarter,
            3 => PhaseCategory::WaxingGibbous,
            4 => PhaseCategory::FullMoon,
            5 => PhaseCategory::WaningGibbous,
            6 => PhaseCategory::ThirdQuarter,
            _ => PhaseCategory::WaningCrescent,
        }
    }

    /// New moon through waxing gibbous count as the waxing half of the cycle.
    pub fn is_waxing(self) -> bool {
        matches!(
            self,
            PhaseCategory::NewMoon
                | PhaseCategory::WaxingCrescent
                | PhaseCategory::FirstQuarter
                | PhaseCategory::WaxingGibbous
        )
    }
}

/// Observer position on Earth, degrees (east and north positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let location = Self { latitude, longitude };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<()> {
        if (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude) {
            Ok(())
        } else {
            Err(MoonError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        // Portland, ME
        Location {
            latitude: 43.6591,
            longitude: -70.2568,
        }
    }
}

/// Where the moon is for an observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    /// Altitude above the horizon, degrees
    pub elevation: f64,
    /// Azimuth, degrees clockwise from north in [0, 360)
    pub azimuth: f64,
    /// Illuminated fraction (0–1)
    pub illuminated: f64,
    pub phase: PhaseCategory,
}

/// Source of lunar positions.
pub trait Ephemeris {
    fn position(&self, when: DateTime<Utc>, location: &Location) -> Result<MoonPosition>;
}

/// Built-in provider backed by [`schaefer_moon`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchaeferEphemeris;

impl Ephemeris for SchaeferEphemeris {
    fn position(&self, when: DateTime<Utc>, location: &Location) -> Result<MoonPosition> {
        location.validate()?;
        let eph = ephemeris_at(when);
        let (elevation, azimuth) = horizontal(&eph, when, location);
        Ok(MoonPosition {
            elevation,
            azimuth,
            illuminated: eph.illum_frac,
            phase: PhaseCategory::from_index(eph.phase_index),
        })
    }
}

/// Greenwich mean sidereal time in degrees.
fn sidereal_degrees(when: DateTime<Utc>) -> f64 {
    let julian_day = when.timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5;
    (280.460_618_37 + 360.985_647_366_29 * (julian_day - 2_451_545.0)).rem_euclid(360.0)
}

/// Ecliptic → equatorial → horizontal; returns (elevation, azimuth) in degrees.
fn horizontal(eph: &LunarEphemeris, when: DateTime<Utc>, location: &Location) -> (f64, f64) {
    let (lambda, beta) = (eph.lon_deg.to_radians(), eph.lat_deg.to_radians());
    let eps = OBLIQUITY_DEG.to_radians();

    let ra = (lambda.sin() * eps.cos() - beta.tan() * eps.sin()).atan2(lambda.cos());
    let dec = (beta.sin() * eps.cos() + beta.cos() * eps.sin() * lambda.sin()).asin();

    let hour_angle = (sidereal_degrees(when) + location.longitude).to_radians() - ra;
    let phi = location.latitude.to_radians();

    let elevation = (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos()).asin();
    // Meeus measures azimuth from south; shift to north-based
    let azimuth = hour_angle
        .sin()
        .atan2(hour_angle.cos() * phi.sin() - dec.tan() * phi.cos())
        .to_degrees()
        + 180.0;

    (elevation.to_degrees(), azimuth.rem_euclid(360.0))
}

/// Information about the moon for an observer.
///
/// `illumination` lies in [-1, 1]: the magnitude is the lit fraction, negative
/// while waxing (new moon through waxing gibbous) and positive otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Information {
    /// When the moon rises during the UTC day of the query, if it does
    pub moonrise: Option<DateTime<Utc>>,
    /// When the moon sets during the UTC day of the query, if it does
    pub moonset: Option<DateTime<Utc>>,
    /// Azimuth, degrees clockwise from north
    pub direction: f64,
    /// Altitude above the horizon, degrees
    pub elevation: f64,
    pub illumination: f64,
    pub phase: PhaseCategory,
}

/// Query `ephemeris` for the moon's state at `when` as seen from `location`.
pub fn information<E: Ephemeris>(
    ephemeris: &E,
    when: DateTime<Utc>,
    location: &Location,
) -> Result<Information> {
    let position = ephemeris.position(when, location)?;
    let (moonrise, moonset) = rise_and_set(ephemeris, when, location)?;

    let illumination = if position.phase.is_waxing() {
        -position.illuminated
    } else {
        position.illuminated
    };

    Ok(Information {
        moonrise,
        moonset,
        direction: position.azimuth,
        elevation: position.elevation,
        illumination,
        phase: position.phase,
    })
}

/// Scan the UTC day containing `when` for horizon crossings.
///
/// Samples every 10 minutes and interpolates linearly between samples.
pub fn rise_and_set<E: Ephemeris>(
    ephemeris: &E,
    when: DateTime<Utc>,
    location: &Location,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let midnight = Utc.from_utc_datetime(&when.date_naive().and_time(NaiveTime::MIN));
    let step = Duration::minutes(SCAN_STEP_MINUTES);
    let steps = 24 * 60 / SCAN_STEP_MINUTES;

    let mut rise = None;
    let mut set = None;
    let mut previous = (midnight, ephemeris.position(midnight, location)?.elevation);

    for i in 1..=steps {
        let t = midnight + step * i as i32;
        let elevation = ephemeris.position(t, location)?.elevation;
        let (t0, e0) = previous;
        let crossing = || {
            let frac = (RISE_ALTITUDE_DEG - e0) / (elevation - e0);
            t0 + Duration::seconds((frac * (SCAN_STEP_MINUTES * 60) as f64).round() as i64)
        };
        if rise.is_none() && e0 < RISE_ALTITUDE_DEG && elevation >= RISE_ALTITUDE_DEG {
            rise = Some(crossing());
        } else if set.is_none() && e0 >= RISE_ALTITUDE_DEG && elevation < RISE_ALTITUDE_DEG {
            set = Some(crossing());
        }
        previous = (t, elevation);
    }
    Ok((rise, set))
}
