//! Submission request state types.

use serde::{Deserialize, Serialize};
use strum::Display;

/// A file the user attached to a submission.
///
/// Only ever constructed after passing the owning workflow's file policy;
/// the raw pick is validated before it is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedFile {
    /// Original file name, used for the multipart part
    pub file_name: String,
    /// Declared MIME type (e.g. `application/pdf`, `image/png`)
    pub mime_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Lifecycle of a single submission attempt.
///
/// Moves forward only: `Idle -> Validating -> Submitting -> Succeeded`, or
/// `Submitting -> Failed`. `Failed` is not terminal; the user returns to
/// `Idle` by editing and may resubmit. There is no path back out of
/// `Succeeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    /// True while a network call is in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    /// True in the states where the user may still edit the request.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

/// What a successful submission handed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Download reference for a generated resume; absent for uploads that
    /// produce nothing to fetch (payment proof)
    pub resume_url: Option<String>,
}
