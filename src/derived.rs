//! Physical quantities derived from the raw surface fields.
//!
//! Vapor pressures use the Magnus-Tetens approximation with the coefficients from the published
//! fog climatology, not the Bolton coefficients `metfor` uses, so relative humidity is computed
//! here rather than with `metfor::rh`.

use crate::sample::TimestepSample;
use metfor::{Celsius, CelsiusDiff, HectoPascal, MetersPSec, Quantity};

/// Magnus-Tetens coefficient, dimensionless.
pub const MAGNUS_A: f64 = 17.27;
/// Magnus-Tetens coefficient, degrees Celsius.
pub const MAGNUS_B: f64 = 237.7;
/// Vapor pressure at 0C in the Magnus-Tetens approximation.
pub const MAGNUS_E0: HectoPascal = HectoPascal(6.112);

/// Saturation vapor pressure over water at temperature `t`.
///
/// Called with the dew point this is the actual vapor pressure.
#[inline]
pub fn vapor_pressure(t: Celsius) -> HectoPascal {
    let t = t.unpack();
    HectoPascal(MAGNUS_E0.unpack() * (MAGNUS_A * t / (t + MAGNUS_B)).exp())
}

/// Relative humidity in percent.
///
/// The result is not clamped, the approximation can return values slightly over 100.
#[inline]
pub fn relative_humidity(t: Celsius, dp: Celsius) -> f64 {
    100.0 * vapor_pressure(dp).unpack() / vapor_pressure(t).unpack()
}

/// The fields the fog rule is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFields {
    /// Relative humidity in percent.
    pub relative_humidity: f64,
    /// Temperature minus dew point.
    pub temp_dew_spread: CelsiusDiff,
    /// Wind speed, always positive unless it is missing.
    pub wind_speed: MetersPSec,
    /// Net solar plus net thermal radiation in W/m^2, negative when the surface is losing energy.
    pub net_radiation: f64,
}

/// Derive the fields used by the fog rule from a sample.
///
/// Missing (NaN) inputs propagate as NaN.
pub fn derive_fields(sample: &TimestepSample) -> DerivedFields {
    let t = Celsius::from(sample.temperature);
    let dp = Celsius::from(sample.dew_point);

    let wind_speed = MetersPSec(sample.wind_u.unpack().hypot(sample.wind_v.unpack()));

    DerivedFields {
        relative_humidity: relative_humidity(t, dp),
        temp_dew_spread: CelsiusDiff(t.unpack() - dp.unpack()),
        wind_speed,
        net_radiation: sample.net_solar_radiation + sample.net_thermal_radiation,
    }
}

impl From<&TimestepSample> for DerivedFields {
    fn from(sample: &TimestepSample) -> Self {
        derive_fields(sample)
    }
}
