use elektra::{perform_action, terminated, Result, Storage};
use electrolux::{ApiInterface, Climate, ClimateEntity, ClimateState, Error, HttpApi, DEFAULT_URL};
use transport::{connect_mqtt, Topic};

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::StreamExt;
use log::{error, info, warn};
use paho_mqtt::{AsyncClient as MqClient, MessageBuilder, QOS_1};
use tokio::sync::Mutex;
use tokio::task;
use tokio::time::{self, interval};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    info!("elektra version {VERSION}");

    let url = std::env::var("ELECTROLUX_URL").unwrap_or(DEFAULT_URL.to_string());
    let username =
        std::env::var("ELECTROLUX_USERNAME").expect("set ENV variable ELECTROLUX_USERNAME");
    let password =
        std::env::var("ELECTROLUX_PASSWORD").expect("set ENV variable ELECTROLUX_PASSWORD");
    let poll_interval = std::env::var("POLL_INTERVAL")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(30);

    let api = HttpApi::login(&url, &username, &password).await?;
    info!("logged in to {url}");

    let devices = api.devices().await?;
    let api: Arc<dyn ApiInterface> = Arc::new(api);

    let mut climates = Vec::with_capacity(devices.len());
    for data in devices {
        match Climate::new(api.clone(), data).await {
            Ok(climate) => climates.push(climate),
            Err(Error::UnsupportedDevice(device_type)) => {
                warn!("skipping unsupported device {device_type}")
            }
            Err(err) => error!("Error loading device: {err}"),
        }
    }
    info!("loaded {} climate entities", climates.len());

    let climates = Arc::new(Mutex::new(climates));

    let mqtt_address = std::env::var("MQTT_ADDRESS").expect("set ENV variable MQTT_ADDRESS");
    let mqtt_username = std::env::var("MQTT_USER").expect("set ENV variable MQTT_USER");
    let mqtt_password = std::env::var("MQTT_PASS").expect("set ENV variable MQTT_PASS");
    let mqtt_client = connect_mqtt(mqtt_address, mqtt_username, mqtt_password, "elektra").await?;
    info!("connected mqtt");

    let storage = Arc::new(Mutex::new(Storage::new()));

    let action_handle = task::spawn(subscribe_actions(
        mqtt_client.clone(),
        climates.clone(),
        storage.clone(),
    ));
    let state_handle = task::spawn(subscribe_state(
        mqtt_client,
        climates,
        storage,
        Duration::from_secs(poll_interval),
    ));

    tokio::select! {
        result = action_handle => result??,
        result = state_handle => result??,
        result = task::spawn(terminated()) => {
            result??;
            info!("got SIGTERM, exiting...")
        },
    };

    Ok(())
}

async fn subscribe_actions(
    mut mqtt: MqClient,
    climates: Arc<Mutex<Vec<Climate>>>,
    storage: Arc<Mutex<Storage>>,
) -> Result<()> {
    let mut stream = mqtt.get_stream(None);

    mqtt.subscribe(Topic::Action.to_string(), QOS_1).await?;
    info!("Subscribed to topic: {}", Topic::Action);

    while let Some(msg_opt) = stream.next().await {
        if let Some(msg) = msg_opt {
            let mut climates = climates.lock().await;

            match perform_action(msg.payload(), climates.as_mut_slice()).await {
                Ok(state) => {
                    storage.lock().await.apply_state(&state);
                    publish(&mqtt, &state).await;
                }
                Err(err) => error!("Error performing action: {err}"),
            }
        } else {
            error!("Lost MQTT connection. Attempting reconnect.");
            while let Err(err) = mqtt.reconnect().await {
                error!("Error MQTT reconnecting: {err}");
                time::sleep(Duration::from_millis(1000)).await;
            }
        }
    }

    Ok(())
}

async fn subscribe_state(
    mqtt: MqClient,
    climates: Arc<Mutex<Vec<Climate>>>,
    storage: Arc<Mutex<Storage>>,
    period: Duration,
) -> Result<()> {
    let mut timer = interval(period);

    loop {
        timer.tick().await;
        let mut climates = climates.lock().await;

        for climate in climates.iter_mut() {
            if let Err(err) = climate.update().await {
                error!("Error updating {}: {err}", climate.unique_id());
                continue;
            }

            let state = ClimateState::new(&*climate);
            if storage.lock().await.apply_state(&state) {
                publish(&mqtt, &state).await;
            }
        }
    }
}

async fn publish(mqtt: &MqClient, state: &ClimateState) {
    let payload = match serde_json::to_vec(state) {
        Ok(payload) => payload,
        Err(err) => {
            error!("Error serializing state: {err}");
            return;
        }
    };

    let message = MessageBuilder::new()
        .topic(Topic::state(&state.unique_id).to_string())
        .payload(payload)
        .qos(QOS_1)
        .retained(true)
        .finalize();

    match mqtt.publish(message).await {
        Ok(()) => (),
        Err(err) => error!("Error publishing state of {}: {err}", state.unique_id),
    }
}
