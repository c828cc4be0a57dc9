use crate::{DeviceData, Error, Result};

use super::ApiInterface;

use async_trait::async_trait;
use chipp_http::{HttpClient, HttpMethod, NoInterceptor};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_URL: &str = "https://dongle.rusklimat.ru";

/// Electrolux Remote cloud client. Every call is a JSON `POST /api` carrying
/// the action name and the session token.
pub struct HttpApi {
    client: HttpClient<NoInterceptor>,
    token: String,
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    error_code: Value,
    #[serde(default)]
    error_message: Option<String>,
    result: Option<T>,
}

impl<T> Response<T> {
    fn into_result(self) -> Result<Option<T>> {
        let succeeded = match &self.error_code {
            Value::String(code) => code == "0",
            code => code.as_i64() == Some(0),
        };

        if !succeeded {
            let code = match self.error_code {
                Value::String(code) => code,
                code => code.to_string(),
            };

            return Err(Error::Api(code, self.error_message));
        }

        Ok(self.result)
    }
}

impl HttpApi {
    pub async fn login(url: &str, username: &str, password: &str) -> Result<HttpApi> {
        #[derive(Deserialize)]
        struct LoginResult {
            token: String,
        }

        let client = HttpClient::new(url)?;

        let body = json!({
            "action": "login",
            "login": username,
            "password": password,
        });

        let result: LoginResult = perform(&client, "login", body)
            .await?
            .ok_or(Error::MissingResult("login"))?;
        debug!("logged in as {username}");

        Ok(HttpApi {
            client,
            token: result.token,
        })
    }

    pub async fn devices(&self) -> Result<Vec<DeviceData>> {
        let body = json!({
            "action": "getDevices",
            "token": self.token,
        });

        let devices: Vec<DeviceData> = perform(&self.client, "getDevices", body)
            .await?
            .unwrap_or_default();
        debug!("found {} devices", devices.len());

        Ok(devices)
    }
}

#[async_trait]
impl ApiInterface for HttpApi {
    async fn get_device_params(&self, uid: &str) -> Result<DeviceData> {
        let body = json!({
            "action": "getDeviceParams",
            "token": self.token,
            "uid": uid,
        });

        perform(&self.client, "getDeviceParams", body)
            .await?
            .ok_or(Error::MissingResult("getDeviceParams"))
    }

    async fn set_device_params(&self, uid: &str, params: DeviceData) -> Result<()> {
        let body = json!({
            "action": "setDeviceParams",
            "token": self.token,
            "uid": uid,
            "params": params,
        });

        let _: Option<Value> = perform(&self.client, "setDeviceParams", body).await?;

        Ok(())
    }
}

async fn perform<T: DeserializeOwned + Send + 'static>(
    client: &HttpClient<NoInterceptor>,
    action: &'static str,
    body: Value,
) -> Result<Option<T>> {
    trace!("performing {action}");

    let mut request = client.new_request(["api"]);
    request.set_json_body(&body);
    request.set_method(HttpMethod::Post);

    let response: Response<T> = client
        .perform_request(request, chipp_http::json::parse_json)
        .await?;

    response.into_result()
}
