//! The fog rule.
//!
//! A pixel is foggy when the air is nearly saturated, the temperature is close to the dew point,
//! the wind is light, and either the surface is radiating energy away or moisture is being added
//! to the surface layer:
//!
//! ```text
//! fog = (rh > 95%) AND (spread < 2C) AND (wind < 5 m/s) AND (net_radiation < 0 OR lhf > 0)
//! ```
//!
//! Every comparison involving a missing (NaN) value is false, so incomplete data is never fog.

use crate::{
    derived::{derive_fields, DerivedFields},
    sample::TimestepSample,
};
use metfor::{CelsiusDiff, MetersPSec};
use std::fmt::Display;
use strum_macros::EnumIter;

/// Relative humidity must be greater than this, in percent.
pub const RH_THRESHOLD: f64 = 95.0;
/// The temperature-dew point spread must be less than this.
pub const SPREAD_THRESHOLD: CelsiusDiff = CelsiusDiff(2.0);
/// The wind speed must be less than this.
pub const WIND_THRESHOLD: MetersPSec = MetersPSec(5.0);
/// Net radiation below this, in W/m^2, counts as radiative cooling.
pub const NET_RADIATION_THRESHOLD: f64 = 0.0;
/// Latent heat flux above this, in W/m^2, counts as moistening.
pub const LATENT_HEAT_THRESHOLD: f64 = 0.0;

/// Thresholds for the fog rule. The default values are the ones published with the rule and
/// should only be changed for sensitivity testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogThresholds {
    /// Minimum relative humidity (exclusive), percent.
    pub min_relative_humidity: f64,
    /// Maximum temperature-dew point spread (exclusive).
    pub max_temp_dew_spread: CelsiusDiff,
    /// Maximum wind speed (exclusive).
    pub max_wind_speed: MetersPSec,
    /// Maximum net radiation (exclusive), W/m^2.
    pub max_net_radiation: f64,
    /// Minimum latent heat flux (exclusive), W/m^2.
    pub min_latent_heat_flux: f64,
}

impl Default for FogThresholds {
    fn default() -> Self {
        FogThresholds {
            min_relative_humidity: RH_THRESHOLD,
            max_temp_dew_spread: SPREAD_THRESHOLD,
            max_wind_speed: WIND_THRESHOLD,
            max_net_radiation: NET_RADIATION_THRESHOLD,
            min_latent_heat_flux: LATENT_HEAT_THRESHOLD,
        }
    }
}

/// The individual conditions that make up the fog rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Hash, PartialOrd, Ord)]
pub enum FogCondition {
    /// Relative humidity is above the threshold.
    NearSaturation,
    /// Temperature-dew point spread is below the threshold.
    SmallSpread,
    /// Wind speed is below the threshold.
    LightWind,
    /// Net radiation is negative or the latent heat flux is positive.
    CoolingOrMoistening,
}

impl Display for FogCondition {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        use FogCondition::*;

        let desc = match self {
            NearSaturation => "relative humidity",
            SmallSpread => "temperature-dew point spread",
            LightWind => "wind speed",
            CoolingOrMoistening => "net radiation or latent heat flux",
        };

        write!(formatter, "{}", desc)
    }
}

impl FogThresholds {
    /// Check a single condition of the rule.
    pub fn check(
        &self,
        condition: FogCondition,
        fields: &DerivedFields,
        latent_heat_flux: f64,
    ) -> bool {
        use FogCondition::*;

        match condition {
            NearSaturation => fields.relative_humidity > self.min_relative_humidity,
            SmallSpread => fields.temp_dew_spread < self.max_temp_dew_spread,
            LightWind => fields.wind_speed < self.max_wind_speed,
            CoolingOrMoistening => {
                fields.net_radiation < self.max_net_radiation
                    || latent_heat_flux > self.min_latent_heat_flux
            }
        }
    }

    /// Evaluate the fog rule on derived fields.
    pub fn is_fog(&self, fields: &DerivedFields, latent_heat_flux: f64) -> bool {
        fields.relative_humidity > self.min_relative_humidity
            && fields.temp_dew_spread < self.max_temp_dew_spread
            && fields.wind_speed < self.max_wind_speed
            && (fields.net_radiation < self.max_net_radiation
                || latent_heat_flux > self.min_latent_heat_flux)
    }

    /// Derive the fields from a sample and evaluate the fog rule on them.
    #[inline]
    pub fn is_fog_sample(&self, sample: &TimestepSample) -> bool {
        self.is_fog(&derive_fields(sample), sample.latent_heat_flux)
    }

    /// List the conditions that were not met, empty if and only if `is_fog` would be true.
    pub fn failed_conditions(
        &self,
        fields: &DerivedFields,
        latent_heat_flux: f64,
    ) -> Vec<FogCondition> {
        use strum::IntoEnumIterator;

        FogCondition::iter()
            .filter(|&cond| !self.check(cond, fields, latent_heat_flux))
            .collect()
    }
}

/// Evaluate the fog rule with the default thresholds.
#[inline]
pub fn is_fog(fields: &DerivedFields, latent_heat_flux: f64) -> bool {
    FogThresholds::default().is_fog(fields, latent_heat_flux)
}

/// Evaluate the fog rule for a sample with the default thresholds.
#[inline]
pub fn fog_flag(sample: &TimestepSample) -> bool {
    FogThresholds::default().is_fog_sample(sample)
}
