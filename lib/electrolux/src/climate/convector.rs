use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::{
    hvac_action, hvac_mode, non_zero, ClimateEntity, DeviceType, HvacAction, HvacMode, Precision,
    Preset, TemperaturePayload,
};
use crate::device::{
    Convector2, ConvectorDevice, ConvectorMode as WorkMode, CONVECTOR_TEMP_MAX as TEMP_MAX,
    CONVECTOR_TEMP_MIN as TEMP_MIN, TEMP_ANTIFROST_MAX, TEMP_ANTIFROST_MIN,
};
use crate::{ApiInterface, DeviceData, Result};

const PRESET_MODES: [Preset; 3] = [Preset::Comfort, Preset::Eco, Preset::NoFrost];

const fn preset_for_mode(mode: WorkMode) -> Preset {
    match mode {
        WorkMode::Comfort => Preset::Comfort,
        WorkMode::Eco => Preset::Eco,
        WorkMode::NoFrost => Preset::NoFrost,
    }
}

const fn mode_for_preset(preset: Preset) -> Option<WorkMode> {
    match preset {
        Preset::Comfort => Some(WorkMode::Comfort),
        Preset::Eco => Some(WorkMode::Eco),
        Preset::NoFrost => Some(WorkMode::NoFrost),
        Preset::Calendar | Preset::Manual | Preset::Forsage | Preset::Vacation => None,
    }
}

/// Unknown labels fall back to comfort.
fn resolve_preset(label: &str) -> WorkMode {
    Preset::from_str(label)
        .ok()
        .and_then(mode_for_preset)
        .unwrap_or(WorkMode::Comfort)
}

/// Convector with comfort, eco and anti-frost presets.
///
/// Eco runs `delta_eco` degrees below the comfort setpoint, so in Eco the
/// target and the bounds are shifted down by the delta and a requested
/// temperature is shifted up before it reaches the device.
pub struct ConvectorClimate<D = Convector2> {
    device: D,
    uid: String,
    name: Option<String>,
    available: bool,
    heating: bool,
    current_temp: Option<f32>,
    target_temp: Option<f32>,
    preset: Option<Preset>,
    min_temp: f32,
    max_temp: f32,
}

impl ConvectorClimate<Convector2> {
    pub async fn new(
        uid: impl Into<String>,
        api: Arc<dyn ApiInterface>,
        data: Option<DeviceData>,
    ) -> Result<ConvectorClimate<Convector2>> {
        let device = Convector2::new(uid, api, data).await?;
        Ok(ConvectorClimate::with_device(device))
    }
}

impl<D: ConvectorDevice> ConvectorClimate<D> {
    pub const DEVICE_TYPE: DeviceType = DeviceType::Convector24;

    pub fn with_device(device: D) -> ConvectorClimate<D> {
        let uid = device.uid();
        debug!("convector {uid}: init");

        let mut climate = ConvectorClimate {
            device,
            uid,
            name: None,
            available: false,
            heating: false,
            current_temp: None,
            target_temp: None,
            preset: None,
            min_temp: TEMP_MIN,
            max_temp: TEMP_MAX,
        };

        climate.refresh();
        climate
    }

    fn refresh(&mut self) {
        debug!("convector {}: refresh", self.uid);

        let mode = self.device.mode();

        self.current_temp = self.device.current_temp();
        self.heating = self.device.state();
        self.preset = mode.map(preset_for_mode);
        self.available = self.device.online();
        self.name = self.device.room();

        match mode {
            Some(WorkMode::Comfort) => {
                self.target_temp = self.device.temp_comfort();
                self.min_temp = TEMP_MIN;
                self.max_temp = TEMP_MAX;
            }
            Some(WorkMode::Eco) => {
                let delta = self.device.delta_eco();

                self.target_temp = self.device.temp_comfort().map(|temp| temp - delta);
                self.min_temp = TEMP_MIN - delta;
                self.max_temp = TEMP_MAX - delta;
            }
            Some(WorkMode::NoFrost) => {
                self.target_temp = self.device.temp_antifrost();
                self.min_temp = TEMP_ANTIFROST_MIN;
                self.max_temp = TEMP_ANTIFROST_MAX;
            }
            None => {
                warn!("convector {}: unknown work mode", self.uid);

                self.target_temp = None;
                self.min_temp = TEMP_MIN;
                self.max_temp = TEMP_MAX;
            }
        }
    }
}

#[async_trait]
impl<D: ConvectorDevice> ClimateEntity for ConvectorClimate<D> {
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
        non_zero(self.min_temp)
    }

    fn max_temp(&self) -> Option<f32> {
        non_zero(self.max_temp)
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

    fn precision(&self) -> Option<Precision> {
        Some(Precision::Whole)
    }

    async fn update(&mut self) -> Result<()> {
        self.device.update().await?;
        self.refresh();

        Ok(())
    }

    async fn set_hvac_mode(&mut self, hvac_mode: HvacMode) -> Result<()> {
        debug!("convector {}: set hvac mode {hvac_mode}", self.uid);

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
        debug!("convector {}: set preset {preset_mode} as {mode:?}", self.uid);

        self.device.set_mode(mode).await?;
        self.refresh();

        Ok(())
    }

    async fn set_temperature(&mut self, payload: TemperaturePayload) -> Result<()> {
        let Some(temperature) = payload.temperature else {
            return Ok(());
        };

        match self.preset {
            Some(Preset::NoFrost) => self.device.set_temp_antifrost(temperature).await?,
            Some(Preset::Eco) => {
                let temperature = temperature + self.device.delta_eco();
                self.device.set_temp_comfort(temperature).await?
            }
            _ => self.device.set_temp_comfort(temperature).await?,
        }

        self.refresh();

        Ok(())
    }
}
