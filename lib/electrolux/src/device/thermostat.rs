use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{encode_flag, Remote, UnknownWorkMode};
use crate::{ApiInterface, DeviceData, Result};

pub const TEMP_MIN: f32 = 10.0;
pub const TEMP_MAX: f32 = 40.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkMode {
    Calendar,
    Manual,
    Comfort,
    Eco,
    Forsage,
    Vacation,
}

impl WorkMode {
    pub const fn code(self) -> u8 {
        match self {
            Self::Calendar => 0,
            Self::Manual => 1,
            Self::Comfort => 2,
            Self::Eco => 3,
            Self::Forsage => 4,
            Self::Vacation => 5,
        }
    }
}

impl TryFrom<u8> for WorkMode {
    type Error = UnknownWorkMode;

    fn try_from(code: u8) -> std::result::Result<Self, UnknownWorkMode> {
        match code {
            0 => Ok(Self::Calendar),
            1 => Ok(Self::Manual),
            2 => Ok(Self::Comfort),
            3 => Ok(Self::Eco),
            4 => Ok(Self::Forsage),
            5 => Ok(Self::Vacation),
            _ => Err(UnknownWorkMode(code)),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FloorThermostatDevice: Send {
    fn uid(&self) -> String;
    fn room(&self) -> Option<String>;
    fn online(&self) -> bool;
    fn state(&self) -> bool;
    fn mode(&self) -> Option<WorkMode>;
    fn floor_temp(&self) -> Option<f32>;

    async fn update(&mut self) -> Result<()>;
    async fn set_state(&mut self, state: bool) -> Result<()>;
    async fn set_mode(&mut self, mode: WorkMode) -> Result<()>;
    /// Setpoint in tenths of a degree.
    async fn set_temp(&mut self, tenths: i32) -> Result<()>;
}

pub struct Thermostat {
    remote: Remote,
}

impl Thermostat {
    pub async fn new(
        uid: impl Into<String>,
        api: Arc<dyn ApiInterface>,
        data: Option<DeviceData>,
    ) -> Result<Thermostat> {
        let remote = Remote::load(uid.into(), api, data).await?;
        Ok(Thermostat { remote })
    }
}

#[async_trait]
impl FloorThermostatDevice for Thermostat {
    fn uid(&self) -> String {
        self.remote.uid.clone()
    }

    fn room(&self) -> Option<String> {
        self.remote.room()
    }

    fn online(&self) -> bool {
        self.remote.flag("online")
    }

    fn state(&self) -> bool {
        self.remote.flag("state")
    }

    fn mode(&self) -> Option<WorkMode> {
        WorkMode::try_from(self.remote.code("mode")?).ok()
    }

    fn floor_temp(&self) -> Option<f32> {
        self.remote.number("floor_temp")
    }

    async fn update(&mut self) -> Result<()> {
        self.remote.update().await
    }

    async fn set_state(&mut self, state: bool) -> Result<()> {
        self.remote.send("state", encode_flag(state)).await
    }

    async fn set_mode(&mut self, mode: WorkMode) -> Result<()> {
        self.remote.send("mode", mode.code().to_string()).await
    }

    async fn set_temp(&mut self, tenths: i32) -> Result<()> {
        self.remote.send("set_temp", tenths.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiInterface;
    use serde_json::json;

    fn sample_data() -> DeviceData {
        serde_json::from_value(json!({
            "uid": "23987",
            "type": "floor",
            "room": "Bathroom",
            "online": 1,
            "state": 0,
            "mode": 4,
            "floor_temp": 27.5,
            "set_temp": 280,
        }))
        .unwrap()
    }

    #[test]
    fn test_work_mode_codes() {
        for code in 0..=5 {
            assert_eq!(WorkMode::try_from(code).unwrap().code(), code);
        }

        assert_eq!(WorkMode::try_from(6), Err(UnknownWorkMode(6)));
    }

    #[tokio::test]
    async fn test_reads_provided_data() {
        let api = Arc::new(MockApiInterface::new());
        let device = Thermostat::new("23987", api, Some(sample_data()))
            .await
            .unwrap();

        assert_eq!(device.uid(), "23987");
        assert_eq!(device.room().as_deref(), Some("Bathroom"));
        assert!(device.online());
        assert!(!device.state());
        assert_eq!(device.mode(), Some(WorkMode::Forsage));
        assert_eq!(device.floor_temp(), Some(27.5));
        assert_eq!(device.remote.number("set_temp"), Some(280.0));
    }

    #[tokio::test]
    async fn test_set_temp_sends_tenths() {
        let mut api = MockApiInterface::new();
        api.expect_set_device_params()
            .withf(|_, params| params.get("set_temp") == Some(&json!("215")))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut device = Thermostat::new("23987", Arc::new(api), Some(sample_data()))
            .await
            .unwrap();

        device.set_temp(215).await.unwrap();
        assert_eq!(device.remote.number("set_temp"), Some(215.0));
    }

    #[tokio::test]
    async fn test_set_mode_and_state() {
        let mut api = MockApiInterface::new();
        api.expect_set_device_params()
            .withf(|_, params| params.get("mode") == Some(&json!("5")))
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_set_device_params()
            .withf(|_, params| params.get("state") == Some(&json!("1")))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut device = Thermostat::new("23987", Arc::new(api), Some(sample_data()))
            .await
            .unwrap();

        device.set_mode(WorkMode::Vacation).await.unwrap();
        device.set_state(true).await.unwrap();

        assert_eq!(device.mode(), Some(WorkMode::Vacation));
        assert!(device.state());
    }
}
