mod api;
pub use api::{ApiInterface, DeviceData, HttpApi, DEFAULT_URL};

pub mod climate;
pub use climate::{
    Climate, ClimateEntity, ClimateFeature, ClimateState, ConvectorClimate, DeviceType,
    HvacAction, HvacMode, Precision, Preset, TemperaturePayload, TemperatureUnit,
    ThermostatClimate,
};

pub mod device;

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
