//! Resume-generation submit client.

use crate::wire::{error_message, file_part, form_from_fields, is_retryable_status};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::submission::{AttachedFile, SubmissionReceipt, SubmitGateway};

/// Posts one resume-generation request as `multipart/form-data`.
///
/// Fields travel as-is (`jobDescription`, optional `email`, optional
/// `linkedinUrl`); an attached PDF becomes the `resume` file part. When the
/// client carries a session token, it is attached as a bearer header so the
/// backend can credit the generation to the account.
#[derive(Clone)]
pub struct ResumeSubmitClient {
    client: Client,
    base_url: String,
    bearer: Option<String>,
}

impl ResumeSubmitClient {
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
impl SubmitGateway for ResumeSubmitClient {
    async fn submit(
        &self,
        fields: &BTreeMap<String, String>,
        file: Option<&AttachedFile>,
    ) -> Result<SubmissionReceipt> {
        let mut form = form_from_fields(fields);
        if let Some(file) = file {
            form = form.part("resume", file_part(file)?);
        }

        let mut request = self
            .client
            .post(format!("{}/api/generate-resume", self.base_url))
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

        let parsed: GenerateResponse = response.json().await?;
        let resume_url = parsed
            .resume_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TailorCvError::submission("Backend returned no resume URL"))?;

        Ok(SubmissionReceipt {
            resume_url: Some(resume_url),
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(rename = "resumeUrl")]
    resume_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_response_shape() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"success": true, "resumeUrl": "https://cdn.example.com/resume.pdf", "isPremium": false}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.resume_url.as_deref(),
            Some("https://cdn.example.com/resume.pdf")
        );
    }

    #[test]
    fn test_missing_resume_url_is_detected() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(parsed.resume_url.is_none());
    }
}
