//! Submit gateway trait.

use super::model::{AttachedFile, SubmissionReceipt};
use crate::error::Result;
use async_trait::async_trait;

/// The backend collaborator a submission workflow dispatches to.
///
/// One implementation per endpoint (resume generation, payment upload). The
/// workflow guarantees at most one in-flight `submit` per instance; the
/// gateway only has to bundle the fields and file into a single request and
/// classify the outcome.
#[async_trait]
pub trait SubmitGateway: Send + Sync {
    /// Sends one complete submission and resolves to its receipt.
    ///
    /// Transport failures are `Network` errors; a failure body from the
    /// backend is a `Submission` error carrying the server's message.
    async fn submit(
        &self,
        fields: &std::collections::BTreeMap<String, String>,
        file: Option<&AttachedFile>,
    ) -> Result<SubmissionReceipt>;
}
