mod convector2;
pub use convector2::{
    Convector2, ConvectorDevice, WorkMode as ConvectorMode, TEMP_ANTIFROST_MAX,
    TEMP_ANTIFROST_MIN, TEMP_MAX as CONVECTOR_TEMP_MAX, TEMP_MIN as CONVECTOR_TEMP_MIN,
};
#[cfg(test)]
pub use convector2::MockConvectorDevice;

mod thermostat;
pub use thermostat::{
    FloorThermostatDevice, Thermostat, WorkMode as ThermostatMode,
    TEMP_MAX as THERMOSTAT_TEMP_MAX, TEMP_MIN as THERMOSTAT_TEMP_MIN,
};
#[cfg(test)]
pub use thermostat::MockFloorThermostatDevice;

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use serde_json::Value;

use crate::{ApiInterface, DeviceData, Result};

#[derive(Debug, PartialEq)]
pub struct UnknownWorkMode(pub u8);

impl fmt::Display for UnknownWorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Unknown work mode {}", self.0))
    }
}

impl Error for UnknownWorkMode {}

/// Local copy of a device's parameters together with the API handle used to
/// read and write them.
struct Remote {
    uid: String,
    api: Arc<dyn ApiInterface>,
    data: DeviceData,
}

impl Remote {
    async fn load(
        uid: String,
        api: Arc<dyn ApiInterface>,
        data: Option<DeviceData>,
    ) -> Result<Remote> {
        let data = match data {
            Some(data) => data,
            None => {
                debug!("fetching params of device {uid}");
                api.get_device_params(&uid).await?
            }
        };

        Ok(Remote { uid, api, data })
    }

    async fn update(&mut self) -> Result<()> {
        trace!("updating device {}", self.uid);

        self.data = self.api.get_device_params(&self.uid).await?;
        Ok(())
    }

    /// Pushes a single parameter and mirrors it locally once the API accepted it.
    async fn send(&mut self, key: &str, value: String) -> Result<()> {
        debug!("device {}: set {key} = {value}", self.uid);

        let mut params = DeviceData::new();
        params.insert(key.to_string(), Value::String(value));

        self.api.set_device_params(&self.uid, params.clone()).await?;
        self.data.extend(params);

        Ok(())
    }

    fn number(&self, key: &str) -> Option<f32> {
        read_number(&self.data, key)
    }

    fn flag(&self, key: &str) -> bool {
        read_flag(&self.data, key)
    }

    fn code(&self, key: &str) -> Option<u8> {
        let value = self.number(key)?;

        if value.fract() == 0.0 && (0.0..=u8::MAX as f32).contains(&value) {
            Some(value as u8)
        } else {
            None
        }
    }

    fn room(&self) -> Option<String> {
        read_string(&self.data, "room").filter(|room| !room.is_empty())
    }
}

pub fn read_number(data: &DeviceData, key: &str) -> Option<f32> {
    match data.get(key)? {
        Value::Number(number) => number.as_f64().map(|value| value as f32),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

pub fn read_flag(data: &DeviceData, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(value)) => *value,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
        Some(Value::String(value)) => matches!(value.trim(), "1" | "true"),
        _ => false,
    }
}

pub fn read_string(data: &DeviceData, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn encode_flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
