//! Validation policy for submission workflows.
//!
//! A workflow is parameterized by the fields it requires, its file rule, and
//! an optional completeness predicate for constraints a flat required-field
//! list cannot express (the resume form accepts a LinkedIn URL *or* an
//! uploaded file).

use super::model::AttachedFile;
use crate::error::{Result, TailorCvError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Form field name for the pasted job description.
pub const FIELD_JOB_DESCRIPTION: &str = "jobDescription";
/// Form field name for the optional notification email.
pub const FIELD_EMAIL: &str = "email";
/// Form field name for the LinkedIn profile URL.
pub const FIELD_LINKEDIN_URL: &str = "linkedinUrl";

/// Resume uploads are capped at 10 MiB.
pub const RESUME_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
/// Payment screenshots are capped at 5 MiB.
pub const PAYMENT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Client-side constraints a file must satisfy before it is recorded.
#[derive(Debug, Clone)]
pub struct FilePolicy {
    /// Accepted MIME type prefixes (`application/pdf`, `image/`)
    pub allowed_mime_prefixes: Vec<String>,
    /// Upper bound on the file size in bytes
    pub max_size_bytes: u64,
}

impl FilePolicy {
    pub fn new(allowed_mime_prefixes: &[&str], max_size_bytes: u64) -> Self {
        Self {
            allowed_mime_prefixes: allowed_mime_prefixes
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_size_bytes,
        }
    }

    /// Checks `file` against this policy.
    ///
    /// Violations are `Validation` errors with a message ready for display;
    /// they never reach the network.
    pub fn check(&self, file: &AttachedFile) -> Result<()> {
        let type_ok = self
            .allowed_mime_prefixes
            .iter()
            .any(|prefix| file.mime_type.starts_with(prefix.as_str()));
        if !type_ok {
            return Err(TailorCvError::validation(format!(
                "Unsupported file type: {}",
                file.mime_type
            )));
        }
        if file.size_bytes() > self.max_size_bytes {
            return Err(TailorCvError::validation(format!(
                "File is too large ({} bytes, limit {} bytes)",
                file.size_bytes(),
                self.max_size_bytes
            )));
        }
        Ok(())
    }
}

/// Whether and how a workflow accepts a file.
#[derive(Debug, Clone)]
pub enum FileRule {
    /// The workflow takes no file
    Forbidden,
    /// A file may be attached, subject to the policy
    Optional(FilePolicy),
    /// Submission requires a file passing the policy
    Required(FilePolicy),
}

impl FileRule {
    pub fn policy(&self) -> Option<&FilePolicy> {
        match self {
            Self::Forbidden => None,
            Self::Optional(p) | Self::Required(p) => Some(p),
        }
    }
}

/// Extra completeness predicate over the whole request.
pub type CompletenessCheck =
    Arc<dyn Fn(&BTreeMap<String, String>, Option<&AttachedFile>) -> bool + Send + Sync>;

/// Everything a workflow needs to validate a request before submitting it.
#[derive(Clone)]
pub struct WorkflowPolicy {
    /// Fields that must be present and non-empty
    pub required_fields: Vec<String>,
    /// File acceptance rule
    pub file_rule: FileRule,
    /// Cross-field predicate; `None` means the flat rules are sufficient
    pub completeness: Option<CompletenessCheck>,
}

impl WorkflowPolicy {
    /// Policy for the resume-generation form: a job description plus either
    /// a LinkedIn URL or an uploaded PDF resume.
    pub fn resume() -> Self {
        Self {
            required_fields: vec![FIELD_JOB_DESCRIPTION.to_string()],
            file_rule: FileRule::Optional(FilePolicy::new(
                &["application/pdf"],
                RESUME_MAX_FILE_BYTES,
            )),
            completeness: Some(Arc::new(|fields, file| {
                let linkedin = fields
                    .get(FIELD_LINKEDIN_URL)
                    .map(|v| !v.trim().is_empty())
                    .unwrap_or(false);
                linkedin || file.is_some()
            })),
        }
    }

    /// Policy for the payment-proof form: an email and an image screenshot.
    pub fn payment() -> Self {
        Self {
            required_fields: vec![FIELD_EMAIL.to_string()],
            file_rule: FileRule::Required(FilePolicy::new(&["image/"], PAYMENT_MAX_FILE_BYTES)),
            completeness: None,
        }
    }

    /// True when the request may be submitted.
    pub fn is_complete(
        &self,
        fields: &BTreeMap<String, String>,
        file: Option<&AttachedFile>,
    ) -> bool {
        let fields_ok = self
            .required_fields
            .iter()
            .all(|name| fields.get(name).map(|v| !v.trim().is_empty()).unwrap_or(false));
        if !fields_ok {
            return false;
        }
        if matches!(self.file_rule, FileRule::Required(_)) && file.is_none() {
            return false;
        }
        match &self.completeness {
            Some(check) => (check.as_ref())(fields, file),
            None => true,
        }
    }
}

impl std::fmt::Debug for WorkflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowPolicy")
            .field("required_fields", &self.required_fields)
            .field("file_rule", &self.file_rule)
            .field("completeness", &self.completeness.is_some())
            .finish()
    }
}
