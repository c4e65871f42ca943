//! In-memory copy of the SVD device being edited.

use std::sync::RwLock;
use std::time::Duration;

use crate::svd::{Device, SvdError, SvdResult, parse_device};

/// Holds the device fetched from `svd_url`. The document is fetched on first
/// use; edits replace the copy and are never written back.
pub struct SvdStore {
    client: reqwest::Client,
    url: String,
    device: RwLock<Option<Device>>,
}

impl SvdStore {
    pub fn new(url: impl Into<String>, timeout: Duration) -> SvdResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SvdError::Fetch(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            device: RwLock::new(None),
        })
    }

    /// Store that already holds a device and never goes to the network.
    pub fn with_device(device: Device) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: String::new(),
            device: RwLock::new(Some(device)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn cached(&self) -> Option<Device> {
        match self.device.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the current copy, fetching and parsing the document if needed.
    pub async fn device(&self) -> SvdResult<Device> {
        if let Some(device) = self.cached() {
            return Ok(device);
        }
        let device = self.fetch().await?;
        self.replace(device.clone());
        Ok(device)
    }

    pub fn replace(&self, device: Device) {
        match self.device.write() {
            Ok(mut guard) => *guard = Some(device),
            Err(poisoned) => *poisoned.into_inner() = Some(device),
        }
    }

    /// Drops the copy so the next access refetches the document.
    pub fn clear(&self) {
        match self.device.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    async fn fetch(&self) -> SvdResult<Device> {
        log::info!("Fetching SVD document from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| SvdError::Fetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SvdError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| SvdError::Fetch(err.to_string()))?;
        parse_device(&body)
    }
}
