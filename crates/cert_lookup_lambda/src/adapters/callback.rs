use std::time::Duration;

use cert_lookup_core::contract::{CallbackResponse, CallbackTarget};
use reqwest::header::CONTENT_TYPE;

/// Delivers the terminal custom-resource response.
///
/// Implementations make one delivery attempt per call and never retry.
pub trait OutcomeNotifier {
    fn notify_outcome(
        &self,
        target: &CallbackTarget,
        response: &CallbackResponse,
    ) -> Result<(), String>;
}

/// PUTs the response body to the pre-signed `ResponseURL`.
#[derive(Debug, Clone)]
pub struct HttpCallbackNotifier {
    client: reqwest::Client,
}

impl HttpCallbackNotifier {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| format!("failed to build callback http client: {error}"))?;
        Ok(Self { client })
    }

    pub async fn send(
        &self,
        target: &CallbackTarget,
        response: &CallbackResponse,
    ) -> Result<(), String> {
        let body = serde_json::to_vec(response)
            .map_err(|error| format!("failed to serialize callback response: {error}"))?;

        // The pre-signed URL is computed without a content type.
        let reply = self
            .client
            .put(&target.response_url)
            .header(CONTENT_TYPE, "")
            .body(body)
            .send()
            .await
            .map_err(|error| format!("failed to deliver callback response: {error}"))?;

        let status = reply.status();
        if !status.is_success() {
            return Err(format!("callback endpoint responded with status {status}"));
        }
        Ok(())
    }
}

impl OutcomeNotifier for HttpCallbackNotifier {
    fn notify_outcome(
        &self,
        target: &CallbackTarget,
        response: &CallbackResponse,
    ) -> Result<(), String> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(self.send(target, response))
        })
    }
}
