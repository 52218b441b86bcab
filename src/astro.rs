//! Astronomical night window derivation
//!
//! Approximates astronomical twilight with fixed offsets: dusk is two hours
//! after sunset, dawn two hours before the following sunrise. The forecast
//! payload carries daily sunrise/sunset series in location-local time, so the
//! whole derivation works on naive datetimes.

use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;
use tracing::debug;

use crate::data::NightWindow;

/// Hours from sunset to the end of astronomical twilight
const DUSK_OFFSET_HOURS: i64 = 2;

/// Hours from the start of morning twilight to sunrise
const DAWN_OFFSET_HOURS: i64 = 2;

/// Errors that can occur when deriving the night window
#[derive(Debug, Error)]
pub enum AstroError {
    /// The daily sunset series carried no entries
    #[error("Daily sunset series is empty")]
    MissingSunset,

    /// Not enough sunrise entries to anchor the following dawn
    #[error("Need at least two sunrise entries to anchor dawn, got {0}")]
    TruncatedSunrise(usize),
}

/// Derives tonight's observation window from the daily sun series
///
/// The window runs from `sunset[0] + 2h` (tonight's dusk) to
/// `sunrise[1] - 2h` (the next morning's dawn). The pairing does not depend
/// on where `now` falls, so every call over the forecast day rederives the
/// identical window. At high latitudes in summer the dawn can precede the
/// dusk; the degenerate window is returned as-is and simply matches no
/// hourly records.
///
/// # Arguments
/// * `sunrise` - Daily sunrise instants, one per forecast day
/// * `sunset` - Daily sunset instants, one per forecast day
/// * `now` - Current wall-clock time, used to recognize an ongoing night
///
/// # Returns
/// * `Ok(NightWindow)` - The dusk/dawn pair
/// * `Err(AstroError)` - If the series are too short to anchor the window
pub fn compute_night_window(
    sunrise: &[NaiveDateTime],
    sunset: &[NaiveDateTime],
    now: NaiveDateTime,
) -> Result<NightWindow, AstroError> {
    let first_sunset = sunset.first().copied().ok_or(AstroError::MissingSunset)?;
    if sunrise.len() < 2 {
        return Err(AstroError::TruncatedSunrise(sunrise.len()));
    }

    let dusk = first_sunset + TimeDelta::hours(DUSK_OFFSET_HOURS);
    let dawn = sunrise[1] - TimeDelta::hours(DAWN_OFFSET_HOURS);

    // Strictly between the bounds counts as being inside the night
    if now > dusk && now < dawn {
        debug!(%dusk, %dawn, "currently inside the astronomical night");
    }

    Ok(NightWindow { dusk, dawn })
}
