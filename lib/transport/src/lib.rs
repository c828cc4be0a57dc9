mod action;
pub use action::{Action, ActionType};

mod topic;
pub use topic::Topic;

use std::time::Duration;

use log::debug;
use paho_mqtt::{AsyncClient, ConnectOptionsBuilder, CreateOptionsBuilder, SslOptions};

pub async fn connect_mqtt(
    address: String,
    username: String,
    password: String,
    client_id: &str,
) -> Result<AsyncClient, paho_mqtt::Error> {
    let create_opts = CreateOptionsBuilder::new_v3()
        .server_uri(address)
        .client_id(client_id)
        .finalize();

    let client = AsyncClient::new(create_opts)?;

    let conn_opts = ConnectOptionsBuilder::new_v3()
        .keep_alive_interval(Duration::from_secs(30))
        .clean_session(false)
        .ssl_options(SslOptions::new())
        .user_name(username)
        .password(password)
        .finalize();

    client.connect(conn_opts).await?;
    debug!("connected mqtt as {client_id}");

    Ok(client)
}
