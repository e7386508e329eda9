use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::configs::Device;
use crate::error::TransportError;

/// One request/response exchange with the device.
///
/// Every failure below the application layer (unreachable host, timeout,
/// non-2xx status, a body that is not JSON) is a [`TransportError`].
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, TransportError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(device: &Device) -> Result<Self, TransportError> {
        let base_url = Url::parse(&device.base_url)
            .map_err(|e| TransportError::Endpoint(format!("{}: {}", device.base_url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(device.request_timeout())
            .connect_timeout(device.connect_timeout())
            .build()
            .map_err(|e| TransportError::from_reqwest("client_init", e))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::Endpoint(format!("{}: {}", path, e)))
    }

    async fn read_reply(path: &str, response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(path, e))?;

        serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(path, e))?;

        Self::read_reply(path, response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let url = self.url(path)?;
        debug!("POST {} {}", url, body);

        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(path, e))?;

        Self::read_reply(path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(base_url: &str) -> Device {
        Device {
            base_url: base_url.to_string(),
            request_timeout_ms: 1000,
            connect_timeout_ms: 500,
        }
    }

    #[test]
    fn test_url_join() {
        let transport = HttpTransport::new(&device("http://192.168.4.1")).unwrap();
        assert_eq!(
            transport.url("/getstatus").unwrap().as_str(),
            "http://192.168.4.1/getstatus"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            HttpTransport::new(&device("not a url")),
            Err(TransportError::Endpoint(_))
        ));
    }
}
