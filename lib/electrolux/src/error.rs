use std::fmt;

#[derive(Debug)]
pub enum Error {
    Http(chipp_http::Error),
    UrlParse(chipp_http::UrlParseError),
    Json(serde_json::Error),
    Api(String, Option<String>),
    MissingResult(&'static str),
    MissingField(&'static str),
    UnsupportedDevice(String),
}

impl From<chipp_http::Error> for Error {
    fn from(err: chipp_http::Error) -> Self {
        Self::Http(err)
    }
}

impl From<chipp_http::UrlParseError> for Error {
    fn from(err: chipp_http::UrlParseError) -> Self {
        Self::UrlParse(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "http error: {err}"),
            Self::UrlParse(err) => write!(f, "url parse error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Api(code, Some(message)) => write!(f, "api error {code}: {message}"),
            Self::Api(code, None) => write!(f, "api error {code}"),
            Self::MissingResult(action) => write!(f, "missing result for action `{action}`"),
            Self::MissingField(field) => write!(f, "missing device field `{field}`"),
            Self::UnsupportedDevice(device_type) => {
                write!(f, "unsupported device type {device_type}")
            }
        }
    }
}

impl std::error::Error for Error {}
