use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::{
    hvac_action, hvac_mode, non_zero, ClimateEntity, DeviceType, HvacAction, HvacMode, Preset,
    TemperaturePayload,
};
use crate::device::{
    FloorThermostatDevice, Thermostat, ThermostatMode as WorkMode,
    THERMOSTAT_TEMP_MAX as TEMP_MAX, THERMOSTAT_TEMP_MIN as TEMP_MIN,
};
use crate::{ApiInterface, DeviceData, Result};

const PRESET_MODES: [Preset; 6] = [
    Preset::Calendar,
    Preset::Manual,
    Preset::Comfort,
    Preset::Eco,
    Preset::Forsage,
    Preset::Vacation,
];

const fn preset_for_mode(mode: WorkMode) -> Preset {
    match mode {
        WorkMode::Calendar => Preset::Calendar,
        WorkMode::Manual => Preset::Manual,
        WorkMode::Comfort => Preset::Comfort,
        WorkMode::Eco => Preset::Eco,
        WorkMode::Forsage => Preset::Forsage,
        WorkMode::Vacation => Preset::Vacation,
    }
}

const fn mode_for_preset(preset: Preset) -> Option<WorkMode> {
    match preset {
        Preset::Calendar => Some(WorkMode::Calendar),
        Preset::Manual => Some(WorkMode::Manual),
        Preset::Comfort => Some(WorkMode::Comfort),
        Preset::Eco => Some(WorkMode::Eco),
        Preset::Forsage => Some(WorkMode::Forsage),
        Preset::Vacation => Some(WorkMode::Vacation),
        Preset::NoFrost => None,
    }
}

fn resolve_preset(label: &str) -> WorkMode {
    Preset::from_str(label)
        .ok()
        .and_then(mode_for_preset)
        .unwrap_or(WorkMode::Comfort)
}

/// Converts degrees to the tenths the floor thermostat expects.
fn to_tenths(temperature: f32) -> i32 {
    (temperature * 10.0).round() as i32
}

/// Floor heating thermostat. The device reports no setpoint of its own, so
/// the target mirrors the floor temperature.
pub struct ThermostatClimate<D = Thermostat> {
    device: D,
    uid: String,
    name: Option<String>,
    available: bool,
    heating: bool,
    current_temp: Option<f32>,
    target_temp: Option<f32>,
    preset: Option<Preset>,
}

impl ThermostatClimate<Thermostat> {
    pub async fn new(
        uid: impl Into<String>,
        api: Arc<dyn ApiInterface>,
        data: Option<DeviceData>,
    ) -> Result<ThermostatClimate<Thermostat>> {
        let device = Thermostat::new(uid, api, data).await?;
        Ok(ThermostatClimate::with_device(device))
    }
}

impl<D: FloorThermostatDevice> ThermostatClimate<D> {
    pub const DEVICE_TYPE: DeviceType = DeviceType::Floor;

    pub fn with_device(device: D) -> ThermostatClimate<D> {
        let uid = device.uid();
        debug!("thermostat {uid}: init");

        let mut climate = ThermostatClimate {
            device,
            uid,
            name: None,
            available: false,
            heating: false,
            current_temp: None,
            target_temp: None,
            preset: None,
        };

        climate.refresh();
        climate
    }

    fn refresh(&mut self) {
        debug!("thermostat {}: refresh", self.uid);

        self.current_temp = self.device.floor_temp();
        self.heating = self.device.state();
        self.preset = self.device.mode().map(preset_for_mode);
        self.available = self.device.online();
        self.target_temp = self.current_temp;
        self.name = self.device.room();
    }
}

#[async_trait]
impl<D: FloorThermostatDevice> ClimateEntity for ThermostatClimate<D> {
    fn device_type(&self) -> DeviceType {
        Self::DEVICE_TYPE
    }

    fn unique_id(&self) -> &str {
        &self.uid
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn available(&self) -> bool {
        self.available
    }

    fn current_temperature(&self) -> Option<f32> {
        self.current_temp
    }

    fn target_temperature(&self) -> Option<f32> {
        self.target_temp
    }

    fn min_temp(&self) -> Option<f32> {
        non_zero(TEMP_MIN)
    }

    fn max_temp(&self) -> Option<f32> {
        non_zero(TEMP_MAX)
    }

    fn hvac_mode(&self) -> HvacMode {
        hvac_mode(self.heating)
    }

    fn hvac_action(&self) -> HvacAction {
        hvac_action(self.heating)
    }

    fn preset_mode(&self) -> Option<Preset> {
        self.preset
    }

    fn preset_modes(&self) -> &'static [Preset] {
        &PRESET_MODES
    }

    async fn update(&mut self) -> Result<()> {
        self.device.update().await?;
        self.refresh();

        Ok(())
    }

    async fn set_hvac_mode(&mut self, hvac_mode: HvacMode) -> Result<()> {
        debug!("thermostat {}: set hvac mode {hvac_mode}", self.uid);

        self.device.set_state(!self.heating).await?;
        self.refresh();

        Ok(())
    }

    async fn set_preset_mode(&mut self, preset_mode: &str) -> Result<()> {
        if self
            .preset
            .is_some_and(|preset| preset.to_string() == preset_mode)
        {
            return Ok(());
        }

        let mode = resolve_preset(preset_mode);
        debug!("thermostat {}: set preset {preset_mode} as {mode:?}", self.uid);

        self.device.set_mode(mode).await?;
        self.refresh();

        Ok(())
    }

    async fn set_temperature(&mut self, payload: TemperaturePayload) -> Result<()> {
        let Some(temperature) = payload.temperature else {
            return Ok(());
        };

        self.device.set_temp(to_tenths(temperature)).await?;
        self.refresh();

        Ok(())
    }
}
