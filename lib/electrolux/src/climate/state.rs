use serde::{Deserialize, Serialize};

use super::{ClimateEntity, DeviceType, HvacAction, HvacMode, Preset, TemperatureUnit};

/// Snapshot of everything a climate entity presents, ready to be published.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClimateState {
    pub unique_id: String,
    pub device_type: DeviceType,
    pub name: Option<String>,
    pub available: bool,
    pub current_temperature: Option<f32>,
    pub target_temperature: Option<f32>,
    pub min_temp: Option<f32>,
    pub max_temp: Option<f32>,
    pub hvac_mode: HvacMode,
    pub hvac_modes: Vec<HvacMode>,
    pub hvac_action: HvacAction,
    pub preset_mode: Option<Preset>,
    pub preset_modes: Vec<Preset>,
    pub temperature_unit: TemperatureUnit,
    pub precision: Option<f32>,
    pub supported_features: u8,
}

impl ClimateState {
    pub fn new<E: ClimateEntity + ?Sized>(entity: &E) -> ClimateState {
        ClimateState {
            unique_id: entity.unique_id().to_string(),
            device_type: entity.device_type(),
            name: entity.name().map(str::to_string),
            available: entity.available(),
            current_temperature: entity.current_temperature(),
            target_temperature: entity.target_temperature(),
            min_temp: entity.min_temp(),
            max_temp: entity.max_temp(),
            hvac_mode: entity.hvac_mode(),
            hvac_modes: entity.hvac_modes().to_vec(),
            hvac_action: entity.hvac_action(),
            preset_mode: entity.preset_mode(),
            preset_modes: entity.preset_modes().to_vec(),
            temperature_unit: entity.temperature_unit(),
            precision: entity.precision().map(|precision| precision.value()),
            supported_features: entity.supported_features().bits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ConvectorMode, MockConvectorDevice};
    use crate::ConvectorClimate;
    use serde_json::json;

    #[test]
    fn test_serialization() {
        let mut device = MockConvectorDevice::new();
        device.expect_uid().return_const("10".to_string());
        device.expect_room().return_const(None);
        device.expect_online().return_const(true);
        device.expect_state().return_const(false);
        device.expect_mode().return_const(Some(ConvectorMode::NoFrost));
        device.expect_current_temp().return_const(Some(4.0f32));
        device.expect_temp_comfort().return_const(Some(24.0f32));
        device.expect_delta_eco().return_const(2.0f32);
        device.expect_temp_antifrost().return_const(Some(5.0f32));

        let climate = ConvectorClimate::with_device(device);
        let state = ClimateState::new(&climate);

        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "unique_id": "10",
                "device_type": "convector24",
                "name": null,
                "available": true,
                "current_temperature": 4.0,
                "target_temperature": 5.0,
                "min_temp": 3.0,
                "max_temp": 7.0,
                "hvac_mode": "off",
                "hvac_modes": ["heat", "off"],
                "hvac_action": "idle",
                "preset_mode": "no_frost",
                "preset_modes": ["comfort", "eco", "no_frost"],
                "temperature_unit": "°C",
                "precision": 1.0,
                "supported_features": 17,
            })
        );
    }
}
