use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{encode_flag, Remote, UnknownWorkMode};
use crate::{ApiInterface, DeviceData, Result};

pub const TEMP_MIN: f32 = 7.0;
pub const TEMP_MAX: f32 = 35.0;
pub const TEMP_ANTIFROST_MIN: f32 = 3.0;
pub const TEMP_ANTIFROST_MAX: f32 = 7.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkMode {
    Comfort,
    Eco,
    NoFrost,
}

impl WorkMode {
    pub const fn code(self) -> u8 {
        match self {
            Self::Comfort => 0,
            Self::Eco => 1,
            Self::NoFrost => 2,
        }
    }
}

impl TryFrom<u8> for WorkMode {
    type Error = UnknownWorkMode;

    fn try_from(code: u8) -> std::result::Result<Self, UnknownWorkMode> {
        match code {
            0 => Ok(Self::Comfort),
            1 => Ok(Self::Eco),
            2 => Ok(Self::NoFrost),
            _ => Err(UnknownWorkMode(code)),
        }
    }
}

/// Everything the convector climate entity needs from a convector.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConvectorDevice: Send {
    fn uid(&self) -> String;
    fn room(&self) -> Option<String>;
    fn online(&self) -> bool;
    /// Whether the convector is powered and heating.
    fn state(&self) -> bool;
    fn mode(&self) -> Option<WorkMode>;
    fn current_temp(&self) -> Option<f32>;
    fn temp_comfort(&self) -> Option<f32>;
    /// How many degrees Eco runs below the comfort setpoint.
    fn delta_eco(&self) -> f32;
    fn temp_antifrost(&self) -> Option<f32>;

    async fn update(&mut self) -> Result<()>;
    async fn set_state(&mut self, state: bool) -> Result<()>;
    async fn set_mode(&mut self, mode: WorkMode) -> Result<()>;
    async fn set_temp_comfort(&mut self, temp: f32) -> Result<()>;
    async fn set_temp_antifrost(&mut self, temp: f32) -> Result<()>;
}

pub struct Convector2 {
    remote: Remote,
}

impl Convector2 {
    pub async fn new(
        uid: impl Into<String>,
        api: Arc<dyn ApiInterface>,
        data: Option<DeviceData>,
    ) -> Result<Convector2> {
        let remote = Remote::load(uid.into(), api, data).await?;
        Ok(Convector2 { remote })
    }
}

#[async_trait]
impl ConvectorDevice for Convector2 {
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

    fn current_temp(&self) -> Option<f32> {
        self.remote.number("current_temp")
    }

    fn temp_comfort(&self) -> Option<f32> {
        self.remote.number("temp_comfort")
    }

    fn delta_eco(&self) -> f32 {
        self.remote.number("delta_eco").unwrap_or_default()
    }

    fn temp_antifrost(&self) -> Option<f32> {
        self.remote.number("temp_antifrost")
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

    async fn set_temp_comfort(&mut self, temp: f32) -> Result<()> {
        self.remote.send("temp_comfort", temp.to_string()).await
    }

    async fn set_temp_antifrost(&mut self, temp: f32) -> Result<()> {
        self.remote.send("temp_antifrost", temp.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiInterface;
    use serde_json::{json, Value};

    fn sample_data() -> DeviceData {
        serde_json::from_value(json!({
            "uid": "10",
            "type": "convector24",
            "room": "Bedroom",
            "online": "1",
            "state": "1",
            "mode": "1",
            "current_temp": "21",
            "temp_comfort": "24",
            "delta_eco": "2",
            "temp_antifrost": "5",
        }))
        .unwrap()
    }

    #[test]
    fn test_work_mode_codes() {
        for mode in [WorkMode::Comfort, WorkMode::Eco, WorkMode::NoFrost] {
            assert_eq!(WorkMode::try_from(mode.code()), Ok(mode));
        }

        assert_eq!(WorkMode::try_from(3), Err(UnknownWorkMode(3)));
    }

    #[tokio::test]
    async fn test_reads_provided_data() {
        let mut api = MockApiInterface::new();
        api.expect_get_device_params().never();

        let device = Convector2::new("10", Arc::new(api), Some(sample_data()))
            .await
            .unwrap();

        assert_eq!(device.uid(), "10");
        assert_eq!(device.room().as_deref(), Some("Bedroom"));
        assert!(device.online());
        assert!(device.state());
        assert_eq!(device.mode(), Some(WorkMode::Eco));
        assert_eq!(device.current_temp(), Some(21.0));
        assert_eq!(device.temp_comfort(), Some(24.0));
        assert_eq!(device.delta_eco(), 2.0);
        assert_eq!(device.temp_antifrost(), Some(5.0));
    }

    #[tokio::test]
    async fn test_fetches_missing_data() {
        let mut api = MockApiInterface::new();
        api.expect_get_device_params()
            .times(1)
            .returning(|_| Ok(sample_data()));

        let device = Convector2::new("10", Arc::new(api), None).await.unwrap();

        assert_eq!(device.mode(), Some(WorkMode::Eco));
    }

    #[tokio::test]
    async fn test_unknown_mode() {
        let mut data = sample_data();
        data.insert("mode".to_string(), json!("7"));

        let device = Convector2::new("10", Arc::new(MockApiInterface::new()), Some(data))
            .await
            .unwrap();

        assert_eq!(device.mode(), None);
    }

    #[tokio::test]
    async fn test_setters_push_and_mirror_params() {
        let mut api = MockApiInterface::new();
        api.expect_set_device_params()
            .withf(|_, params| params.get("state") == Some(&json!("0")))
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_set_device_params()
            .withf(|_, params| params.get("mode") == Some(&json!("2")))
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_set_device_params()
            .withf(|_, params| params.get("temp_comfort") == Some(&json!("25.5")))
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_set_device_params()
            .withf(|_, params| params.get("temp_antifrost") == Some(&json!("6")))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut device = Convector2::new("10", Arc::new(api), Some(sample_data()))
            .await
            .unwrap();

        device.set_state(false).await.unwrap();
        assert!(!device.state());

        device.set_mode(WorkMode::NoFrost).await.unwrap();
        assert_eq!(device.mode(), Some(WorkMode::NoFrost));

        device.set_temp_comfort(25.5).await.unwrap();
        assert_eq!(device.temp_comfort(), Some(25.5));

        device.set_temp_antifrost(6.0).await.unwrap();
        assert_eq!(device.temp_antifrost(), Some(6.0));
    }

    #[tokio::test]
    async fn test_failed_setter_keeps_local_data() {
        let mut api = MockApiInterface::new();
        api.expect_set_device_params()
            .times(1)
            .returning(|_, _| Err(crate::Error::Api("3".to_string(), None)));

        let mut device = Convector2::new("10", Arc::new(api), Some(sample_data()))
            .await
            .unwrap();

        assert!(device.set_state(false).await.is_err());
        assert!(device.state());
    }

    #[tokio::test]
    async fn test_update_replaces_data() {
        let mut api = MockApiInterface::new();
        api.expect_get_device_params().times(1).returning(|_| {
            let mut data = sample_data();
            data.insert("current_temp".to_string(), Value::from(19.5));
            Ok(data)
        });

        let mut device = Convector2::new("10", Arc::new(api), Some(sample_data()))
            .await
            .unwrap();

        device.update().await.unwrap();
        assert_eq!(device.current_temp(), Some(19.5));
    }
}
