use std::collections::HashMap;
use std::str::FromStr;

use electrolux::{ClimateEntity, ClimateState, HvacMode, TemperaturePayload};
use transport::{Action, ActionType};

use log::{debug, info};
use tokio::signal::unix::{signal, SignalKind};

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Last published state of every entity, so unchanged snapshots are skipped.
#[derive(Default)]
pub struct Storage {
    states: HashMap<String, ClimateState>,
}

impl Storage {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    pub fn apply_state(&mut self, state: &ClimateState) -> bool {
        let old = self.states.get(&state.unique_id);

        if old != Some(state) {
            debug!("old state: {:?}", old);
            debug!("state changed: {:?}", state);

            self.states.insert(state.unique_id.clone(), state.clone());
            true
        } else {
            false
        }
    }
}

/// Applies an action payload to the addressed entity and returns its refreshed
/// state.
pub async fn perform_action<E: ClimateEntity>(
    payload: &[u8],
    climates: &mut [E],
) -> Result<ClimateState> {
    let Action { uid, action } = serde_json::from_slice(payload)?;

    let climate = climates
        .iter_mut()
        .find(|climate| climate.unique_id() == uid)
        .ok_or_else(|| Error::UnknownDevice(uid.clone()))?;

    info!("{uid}: {action:?}");

    match action {
        ActionType::SetHvacMode(mode) => {
            let mode = HvacMode::from_str(&mode).map_err(|_| Error::UnknownHvacMode(mode))?;
            climate.set_hvac_mode(mode).await?;
        }
        ActionType::SetPresetMode(preset) => climate.set_preset_mode(&preset).await?,
        ActionType::SetTemperature { temperature } => {
            climate
                .set_temperature(TemperaturePayload { temperature })
                .await?
        }
    }

    Ok(ClimateState::new(&*climate))
}

/// Resolves once the process receives SIGTERM. Fails if the handler can't be
/// installed.
pub async fn terminated() -> Result<()> {
    let mut sig = signal(SignalKind::terminate())?;
    sig.recv().await;

    Ok(())
}
