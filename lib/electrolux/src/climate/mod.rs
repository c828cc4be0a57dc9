mod convector;
pub use convector::ConvectorClimate;

mod dispatch;
pub use dispatch::Climate;

mod state;
pub use state::ClimateState;

mod thermostat;
pub use thermostat::ThermostatClimate;

use async_trait::async_trait;
use enumflags2::{bitflags, BitFlags};
use serde::{Deserialize, Serialize};
use str_derive::Str;

use crate::Result;

/// Category string a device reports in its `type` field.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
pub enum DeviceType {
    #[serde(rename = "convector24")]
    Convector24,
    #[serde(rename = "floor")]
    Floor,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Heat,
    Off,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    Heating,
    Idle,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Calendar,
    Manual,
    Comfort,
    Eco,
    NoFrost,
    Forsage,
    Vacation,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    #[serde(rename = "°C")]
    Celsius,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Precision {
    Tenths,
    Halves,
    Whole,
}

impl Precision {
    pub const fn value(self) -> f32 {
        match self {
            Precision::Tenths => 0.1,
            Precision::Halves => 0.5,
            Precision::Whole => 1.0,
        }
    }
}

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClimateFeature {
    TargetTemperature = 0b0000_0001,
    PresetMode = 0b0001_0000,
}

/// Arguments of a set temperature command. A missing temperature turns the
/// command into a no-op.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TemperaturePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl TemperaturePayload {
    pub fn new(temperature: f32) -> TemperaturePayload {
        TemperaturePayload {
            temperature: Some(temperature),
        }
    }
}

/// Thermostat-like entity as the home automation side sees it.
///
/// Getters return the snapshot taken by the last refresh. Commands await the
/// device and refresh the snapshot before returning.
#[async_trait]
pub trait ClimateEntity: Send {
    fn device_type(&self) -> DeviceType;
    fn unique_id(&self) -> &str;
    fn name(&self) -> Option<&str>;
    fn available(&self) -> bool;

    fn current_temperature(&self) -> Option<f32>;
    fn target_temperature(&self) -> Option<f32>;
    /// Lower setpoint bound; `None` when the bound is unset or zero.
    fn min_temp(&self) -> Option<f32>;
    /// Upper setpoint bound; `None` when the bound is unset or zero.
    fn max_temp(&self) -> Option<f32>;

    fn hvac_mode(&self) -> HvacMode;
    fn hvac_modes(&self) -> &'static [HvacMode] {
        &HvacMode::ALL
    }
    fn hvac_action(&self) -> HvacAction;

    fn preset_mode(&self) -> Option<Preset>;
    fn preset_modes(&self) -> &'static [Preset];

    fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Celsius
    }
    fn precision(&self) -> Option<Precision> {
        None
    }
    fn supported_features(&self) -> BitFlags<ClimateFeature> {
        ClimateFeature::TargetTemperature | ClimateFeature::PresetMode
    }

    /// Re-reads the device from the API and refreshes the snapshot.
    async fn update(&mut self) -> Result<()>;

    /// Toggles the heater. The requested mode is not inspected.
    async fn set_hvac_mode(&mut self, hvac_mode: HvacMode) -> Result<()>;
    async fn set_preset_mode(&mut self, preset_mode: &str) -> Result<()>;
    async fn set_temperature(&mut self, payload: TemperaturePayload) -> Result<()>;
}

fn hvac_mode(heating: bool) -> HvacMode {
    if heating {
        HvacMode::Heat
    } else {
        HvacMode::Off
    }
}

fn hvac_action(heating: bool) -> HvacAction {
    if heating {
        HvacAction::Heating
    } else {
        HvacAction::Idle
    }
}

/// Bounds of zero are reported as missing.
fn non_zero(value: f32) -> Option<f32> {
    if value != 0.0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_labels() {
        assert_eq!(DeviceType::Convector24.to_string(), "convector24");
        assert_eq!(DeviceType::from_str("floor").unwrap(), DeviceType::Floor);
        assert!(DeviceType::from_str("smart_thermostat").is_err());

        assert_eq!(Preset::NoFrost.to_string(), "no_frost");
        assert_eq!(Preset::from_str("forsage").unwrap(), Preset::Forsage);
        assert!(Preset::from_str("away").is_err());

        assert_eq!(HvacMode::ALL, [HvacMode::Heat, HvacMode::Off]);
        assert_eq!(HvacAction::Heating.to_string(), "heating");
        assert_eq!(TemperatureUnit::Celsius.to_string(), "°C");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(hvac_mode(true), HvacMode::Heat);
        assert_eq!(hvac_mode(false), HvacMode::Off);
        assert_eq!(hvac_action(true), HvacAction::Heating);
        assert_eq!(hvac_action(false), HvacAction::Idle);
        assert_eq!(non_zero(0.0), None);
        assert_eq!(non_zero(-2.0), Some(-2.0));
    }

    #[test]
    fn test_temperature_payload() {
        let payload: TemperaturePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, TemperaturePayload::default());

        let payload: TemperaturePayload =
            serde_json::from_str(r#"{ "temperature": 21.5 }"#).unwrap();
        assert_eq!(payload, TemperaturePayload::new(21.5));
    }

    #[test]
    fn test_supported_features_bits() {
        let features = ClimateFeature::TargetTemperature | ClimateFeature::PresetMode;
        assert_eq!(features.bits(), 17);
    }
}
