use std::fmt;

#[derive(Debug)]
pub enum Error {
    Electrolux(electrolux::Error),
    Mqtt(paho_mqtt::Error),
    Json(serde_json::Error),
    Join(tokio::task::JoinError),
    Io(std::io::Error),
    UnknownDevice(String),
    UnknownHvacMode(String),
}

impl From<electrolux::Error> for Error {
    fn from(err: electrolux::Error) -> Self {
        Self::Electrolux(err)
    }
}

impl From<paho_mqtt::Error> for Error {
    fn from(err: paho_mqtt::Error) -> Self {
        Self::Mqtt(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Electrolux(err) => write!(f, "electrolux error: {err}"),
            Self::Mqtt(err) => write!(f, "mqtt error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Join(err) => write!(f, "join error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::UnknownDevice(uid) => write!(f, "unknown device {uid}"),
            Self::UnknownHvacMode(mode) => write!(f, "unknown hvac mode {mode}"),
        }
    }
}

impl std::error::Error for Error {}
