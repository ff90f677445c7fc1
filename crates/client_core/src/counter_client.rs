//! HTTP client for the counting server's per-location count endpoints.

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::LocationId,
    error::ApiError,
    protocol::{
        CountSnapshot, CurrentCountSnapshot, ResetCurrentForm, RunStatus, SaveCountForm,
        StatusResponse,
    },
};
use tracing::{info, warn};
use url::Url;

use crate::error::CounterError;

const AJAX_HEADER: &str = "X-Requested-With";
const AJAX_HEADER_VALUE: &str = "XMLHttpRequest";
/// Upper bound on one round trip, so a stalled server surfaces as a
/// transport error instead of hanging the caller.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait CounterApi: Send + Sync {
    async fn save_count(
        &self,
        correct_count: i64,
        defect_count: i64,
        custom_fields: &BTreeMap<String, String>,
    ) -> Result<CountSnapshot, CounterError>;
    async fn reset_count(&self) -> Result<CountSnapshot, CounterError>;
    async fn reset_count_current(
        &self,
        correct_count: i64,
        defect_count: i64,
        item_no: &str,
    ) -> Result<CurrentCountSnapshot, CounterError>;
    async fn start(&self) -> Result<RunStatus, CounterError>;
    async fn pause(&self) -> Result<RunStatus, CounterError>;
    async fn stop(&self) -> Result<RunStatus, CounterError>;
}

pub struct CounterClient {
    http: Client,
    server_url: Url,
    location: LocationId,
}

impl CounterClient {
    pub fn new(server_url: &str, location: LocationId) -> Result<Self, CounterError> {
        Self::with_timeout(server_url, location, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        server_url: &str,
        location: LocationId,
        timeout: Duration,
    ) -> Result<Self, CounterError> {
        let server_url =
            Url::parse(server_url).map_err(|_| CounterError::InvalidUrl(server_url.to_string()))?;
        if server_url.cannot_be_a_base() {
            return Err(CounterError::InvalidUrl(server_url.to_string()));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            server_url,
            location,
        })
    }

    pub fn location(&self) -> &LocationId {
        &self.location
    }

    /// `{server_url}/{action}/{location}`, keeping any base path.
    pub fn endpoint(&self, action: &str) -> Result<Url, CounterError> {
        let mut url = self.server_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CounterError::InvalidUrl(self.server_url.to_string()))?;
            segments
                .pop_if_empty()
                .push(action)
                .push(self.location.as_str());
        }
        Ok(url)
    }

    async fn get(&self, action: &str) -> Result<String, CounterError> {
        let res = self
            .http
            .get(self.endpoint(action)?)
            .header(AJAX_HEADER, AJAX_HEADER_VALUE)
            .send()
            .await?;
        read_body(action, res).await
    }

    async fn post_form<F: serde::Serialize + ?Sized>(
        &self,
        action: &str,
        form: &F,
    ) -> Result<String, CounterError> {
        let res = self
            .http
            .post(self.endpoint(action)?)
            .header(AJAX_HEADER, AJAX_HEADER_VALUE)
            .form(form)
            .send()
            .await?;
        read_body(action, res).await
    }

    async fn run_command(
        &self,
        action: &str,
        expected: RunStatus,
    ) -> Result<RunStatus, CounterError> {
        let body = self.get(action).await?;
        let status = match decode_or_default::<Option<StatusResponse>>(&body)? {
            Some(response) => response.status,
            None => expected,
        };
        info!(location = %self.location, ?status, "counter run state changed");
        Ok(status)
    }
}

#[async_trait]
impl CounterApi for CounterClient {
    async fn save_count(
        &self,
        correct_count: i64,
        defect_count: i64,
        custom_fields: &BTreeMap<String, String>,
    ) -> Result<CountSnapshot, CounterError> {
        let form = SaveCountForm {
            correct_count,
            defect_count,
            custom_fields: serde_json::to_string(custom_fields)?,
        };
        let body = self.post_form("save_count", &form).await?;
        let snapshot: CountSnapshot = decode_or_default(&body)?;
        info!(
            location = %self.location,
            total = snapshot.total_count,
            "saved count"
        );
        Ok(snapshot)
    }

    async fn reset_count(&self) -> Result<CountSnapshot, CounterError> {
        let body = self.get("reset_count").await?;
        decode_or_default(&body)
    }

    async fn reset_count_current(
        &self,
        correct_count: i64,
        defect_count: i64,
        item_no: &str,
    ) -> Result<CurrentCountSnapshot, CounterError> {
        let form = ResetCurrentForm {
            item_no: item_no.to_string(),
            correct_count,
            defect_count,
        };
        let body = self.post_form("reset_count_current", &form).await?;
        decode_or_default(&body)
    }

    async fn start(&self) -> Result<RunStatus, CounterError> {
        self.run_command("start_count", RunStatus::Started).await
    }

    async fn pause(&self) -> Result<RunStatus, CounterError> {
        self.run_command("pause_count", RunStatus::Paused).await
    }

    async fn stop(&self) -> Result<RunStatus, CounterError> {
        self.run_command("stop_count", RunStatus::Stopped).await
    }
}

async fn read_body(action: &str, res: Response) -> Result<String, CounterError> {
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        let error = ApiError::from_response(status.as_u16(), &body);
        warn!(
            action,
            status = status.as_u16(),
            "counting server error: {}",
            error.message
        );
        return Err(CounterError::Server(error.into()));
    }
    Ok(body)
}

/// An empty body or JSON `null` means "no data" and yields `T::default()`.
pub fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> Result<T, CounterError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str::<Option<T>>(body)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "tests/counter_client_tests.rs"]
mod tests;
