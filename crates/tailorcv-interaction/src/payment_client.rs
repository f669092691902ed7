//! Payment-proof upload client.

use crate::wire::{error_message, file_part, form_from_fields, is_retryable_status};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::submission::{AttachedFile, SubmissionReceipt, SubmitGateway};

/// Uploads one payment screenshot as `multipart/form-data`.
///
/// The screenshot travels as the `screenshot` file part, alongside the
/// user's email and an RFC 3339 `timestamp` stamped at submit time.
/// Verification is manual on the backend side; any 2xx means "received for
/// review", so the receipt is empty.
#[derive(Clone)]
pub struct PaymentSubmitClient {
    client: Client,
    base_url: String,
    bearer: Option<String>,
}

impl PaymentSubmitClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            bearer: None,
        }
    }

    /// Attaches the current session token to every submission.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

#[async_trait]
impl SubmitGateway for PaymentSubmitClient {
    async fn submit(
        &self,
        fields: &BTreeMap<String, String>,
        file: Option<&AttachedFile>,
    ) -> Result<SubmissionReceipt> {
        let file = file.ok_or_else(|| {
            TailorCvError::validation("A payment screenshot is required")
        })?;

        let form = form_from_fields(fields)
            .text("timestamp", chrono::Utc::now().to_rfc3339())
            .part("screenshot", file_part(file)?);

        let mut request = self
            .client
            .post(format!("{}/api/payment/upload", self.base_url))
            .multipart(form);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            return Err(if is_retryable_status(status) {
                TailorCvError::transient(message)
            } else {
                TailorCvError::submission(message)
            });
        }

        Ok(SubmissionReceipt::default())
    }
}
