//! MachineID device API client

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::{Config, ValidateMethod};
use crate::types::{DeviceReq, RegisterRes, ValidateRes};
use crate::{Error, Result};

const ORG_KEY_HEADER: &str = "x-org-key";

/// Thin client over the register and validate endpoints
#[derive(Clone)]
pub struct MachineIdClient {
    client: Client,
    org_key: String,
    register_url: String,
    validate_url: String,
}

impl MachineIdClient {
    /// Build a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            org_key: config.org_key.clone(),
            register_url: config.register_url(),
            validate_url: config.validate_url(),
        })
    }

    pub async fn register_device(&self, device_id: &str) -> Result<RegisterRes> {
        let data = self
            .post_json(&self.register_url, &DeviceReq { device_id })
            .await?;
        Ok(RegisterRes::from_value(data)?)
    }

    pub async fn validate_device(
        &self,
        device_id: &str,
        method: ValidateMethod,
    ) -> Result<ValidateRes> {
        let req = DeviceReq { device_id };
        let data = match method {
            ValidateMethod::Post => self.post_json(&self.validate_url, &req).await?,
            ValidateMethod::Get => self.get_json(&self.validate_url, &req).await?,
        };
        Ok(ValidateRes::from_value(data)?)
    }

    /// POST a JSON body and return the reply object.
    ///
    /// # Errors
    ///
    /// `Error::NonJson` if the body does not parse, `Error::Http` on
    /// transport failure. HTTP 4xx/5xx with a JSON body is not an error:
    /// it comes back as `{"status": "error", "http": .., "body": ..}`.
    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> Result<Value> {
        debug!(%url, "POST");
        self.send(self.client.post(url).json(payload)).await
    }

    /// GET with the payload encoded as query parameters.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post_json`].
    pub async fn get_json<T: Serialize + ?Sized>(&self, url: &str, query: &T) -> Result<Value> {
        debug!(%url, "GET");
        self.send(self.client.get(url).query(query)).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Value> {
        let resp = req
            .header(ORG_KEY_HEADER, &self.org_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let data: Value = serde_json::from_str(&text).map_err(|_| Error::NonJson {
            status: status.as_u16(),
            body: text.clone(),
        })?;

        if status.as_u16() >= 400 {
            warn!(http = status.as_u16(), "device api returned an error status");
            return Ok(json!({
                "status": "error",
                "http": status.as_u16(),
                "body": data,
            }));
        }
        Ok(data)
    }
}
