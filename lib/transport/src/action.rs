use serde::{Deserialize, Serialize};

/// Command addressed to a single climate entity.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Action {
    pub uid: String,
    pub action: ActionType,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    SetHvacMode(String),
    SetPresetMode(String),
    SetTemperature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature: Option<f32>,
    },
}
