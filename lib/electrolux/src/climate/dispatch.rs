use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use enumflags2::BitFlags;
use log::info;

use super::{
    ClimateEntity, ClimateFeature, ConvectorClimate, DeviceType, HvacAction, HvacMode, Precision,
    Preset, TemperaturePayload, TemperatureUnit, ThermostatClimate,
};
use crate::device::read_string;
use crate::{ApiInterface, DeviceData, Error, Result};

/// Climate entity of any supported device category.
pub enum Climate {
    Convector(ConvectorClimate),
    Thermostat(ThermostatClimate),
}

impl Climate {
    /// Builds the entity matching the `type` of already fetched device data.
    pub async fn new(api: Arc<dyn ApiInterface>, data: DeviceData) -> Result<Climate> {
        let uid = read_string(&data, "uid").ok_or(Error::MissingField("uid"))?;
        let device_type = read_string(&data, "type").ok_or(Error::MissingField("type"))?;

        let climate = match DeviceType::from_str(&device_type) {
            Ok(DeviceType::Convector24) => {
                Climate::Convector(ConvectorClimate::new(uid, api, Some(data)).await?)
            }
            Ok(DeviceType::Floor) => {
                Climate::Thermostat(ThermostatClimate::new(uid, api, Some(data)).await?)
            }
            Err(_) => return Err(Error::UnsupportedDevice(device_type)),
        };

        info!(
            "registered {} {}",
            climate.device_type(),
            climate.unique_id()
        );

        Ok(climate)
    }

    fn entity(&self) -> &dyn ClimateEntity {
        match self {
            Climate::Convector(climate) => climate,
            Climate::Thermostat(climate) => climate,
        }
    }

    fn entity_mut(&mut self) -> &mut dyn ClimateEntity {
        match self {
            Climate::Convector(climate) => climate,
            Climate::Thermostat(climate) => climate,
        }
    }
}

#[async_trait]
impl ClimateEntity for Climate {
    fn device_type(&self) -> DeviceType {
        self.entity().device_type()
    }

    fn unique_id(&self) -> &str {
        self.entity().unique_id()
    }

    fn name(&self) -> Option<&str> {
        self.entity().name()
    }

    fn available(&self) -> bool {
        self.entity().available()
    }

    fn current_temperature(&self) -> Option<f32> {
        self.entity().current_temperature()
    }

    fn target_temperature(&self) -> Option<f32> {
        self.entity().target_temperature()
    }

    fn min_temp(&self) -> Option<f32> {
        self.entity().min_temp()
    }

    fn max_temp(&self) -> Option<f32> {
        self.entity().max_temp()
    }

    fn hvac_mode(&self) -> HvacMode {
        self.entity().hvac_mode()
    }

    fn hvac_modes(&self) -> &'static [HvacMode] {
        self.entity().hvac_modes()
    }

    fn hvac_action(&self) -> HvacAction {
        self.entity().hvac_action()
    }

    fn preset_mode(&self) -> Option<Preset> {
        self.entity().preset_mode()
    }

    fn preset_modes(&self) -> &'static [Preset] {
        self.entity().preset_modes()
    }

    fn temperature_unit(&self) -> TemperatureUnit {
        self.entity().temperature_unit()
    }

    fn precision(&self) -> Option<Precision> {
        self.entity().precision()
    }

    fn supported_features(&self) -> BitFlags<ClimateFeature> {
        self.entity().supported_features()
    }

    async fn update(&mut self) -> Result<()> {
        self.entity_mut().update().await
    }

    async fn set_hvac_mode(&mut self, hvac_mode: HvacMode) -> Result<()> {
        self.entity_mut().set_hvac_mode(hvac_mode).await
    }

    async fn set_preset_mode(&mut self, preset_mode: &str) -> Result<()> {
        self.entity_mut().set_preset_mode(preset_mode).await
    }

    async fn set_temperature(&mut self, payload: TemperaturePayload) -> Result<()> {
        self.entity_mut().set_temperature(payload).await
    }
}
