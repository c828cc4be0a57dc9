mod http;
pub use http::{HttpApi, DEFAULT_URL};

use crate::Result;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Raw device parameters as the cloud reports them, keyed by parameter name.
pub type DeviceData = serde_json::Map<String, serde_json::Value>;

/// Remote side of every device: reads and writes device parameters by uid.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiInterface: Send + Sync {
    async fn get_device_params(&self, uid: &str) -> Result<DeviceData>;

    async fn set_device_params(&self, uid: &str, params: DeviceData) -> Result<()>;
}
