use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::submission::{
    AttachedFile, SubmissionReceipt, SubmissionStatus, SubmitGateway, WorkflowPolicy,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A point-in-time view of the request for the UI.
#[derive(Debug, Clone)]
pub struct SubmissionSnapshot {
    pub status: SubmissionStatus,
    /// Display message for the most recent validation or submission failure
    pub last_error: Option<String>,
    /// Result payload once the request succeeded
    pub receipt: Option<SubmissionReceipt>,
    /// Whether the submit action should currently be enabled
    pub can_submit: bool,
}

/// One multi-field, optionally file-bearing submission attempt.
///
/// The workflow is a forward-only state machine (`Idle -> Validating ->
/// Submitting -> Succeeded`, with `Failed` looping back to `Idle` on edit)
/// parameterized by a [`WorkflowPolicy`] and a [`SubmitGateway`]. It owns
/// its request state exclusively; each form instance creates its own
/// workflow and discards it on teardown.
///
/// Guarantees:
/// - at most one network call in flight per instance; a `submit` while
///   already submitting is rejected without touching the gateway
/// - validation failures never reach the network
/// - after [`discard`](Self::discard), a late resolution is dropped instead
///   of mutating the dead instance
/// - no automatic retries; every retry is a user-initiated resubmission
pub struct SubmissionWorkflow {
    id: Uuid,
    policy: WorkflowPolicy,
    gateway: Arc<dyn SubmitGateway>,
    state: Mutex<RequestState>,
    cancel: CancellationToken,
}

struct RequestState {
    fields: BTreeMap<String, String>,
    file: Option<AttachedFile>,
    status: SubmissionStatus,
    last_error: Option<String>,
    receipt: Option<SubmissionReceipt>,
}

impl SubmissionWorkflow {
    pub fn new(policy: WorkflowPolicy, gateway: Arc<dyn SubmitGateway>) -> Self {
        Self {
            id: Uuid::new_v4(),
            policy,
            gateway,
            state: Mutex::new(RequestState {
                fields: BTreeMap::new(),
                file: None,
                status: SubmissionStatus::Idle,
                last_error: None,
                receipt: None,
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// Workflow for the resume-generation form.
    pub fn resume(gateway: Arc<dyn SubmitGateway>) -> Self {
        Self::new(WorkflowPolicy::resume(), gateway)
    }

    /// Workflow for the payment-proof form.
    pub fn payment(gateway: Arc<dyn SubmitGateway>) -> Self {
        Self::new(WorkflowPolicy::payment(), gateway)
    }

    pub fn snapshot(&self) -> SubmissionSnapshot {
        let state = self.state.lock().unwrap();
        SubmissionSnapshot {
            status: state.status,
            last_error: state.last_error.clone(),
            receipt: state.receipt.clone(),
            can_submit: state.status.is_editable()
                && self.policy.is_complete(&state.fields, state.file.as_ref()),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.lock().unwrap().status
    }

    /// Records a field value.
    ///
    /// Only meaningful while the request is editable; the first edit after
    /// a failure returns the request to `Idle` and clears the error.
    pub fn set_field(&self, name: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.status.is_editable() {
            tracing::debug!("[Submission {}] Ignored edit while {}", self.id, state.status);
            return;
        }
        Self::mark_edited(&mut state);
        state.fields.insert(name.to_string(), value.to_string());
    }

    /// Validates and records a file.
    ///
    /// The policy check is synchronous; a violation surfaces a validation
    /// error, leaves the current state otherwise untouched, and never
    /// reaches the network. Only a file that passed the check is recorded.
    pub fn set_file(&self, file: AttachedFile) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.status.is_editable() {
            return Err(TailorCvError::validation("A submission is in progress"));
        }

        let policy = match self.policy.file_rule.policy() {
            Some(policy) => policy,
            None => {
                let err = TailorCvError::validation("This form does not take a file");
                state.last_error = Some(err.display_message());
                return Err(err);
            }
        };

        if let Err(err) = policy.check(&file) {
            state.last_error = Some(err.display_message());
            return Err(err);
        }

        Self::mark_edited(&mut state);
        state.file = Some(file);
        Ok(())
    }

    /// Submits the request if it is complete and not already in flight.
    ///
    /// Returns the status after the attempt resolved (or the current status
    /// for the no-op cases). Exactly one gateway call is issued per valid
    /// submit; double-triggering while in flight performs nothing.
    pub async fn submit(&self) -> SubmissionStatus {
        let (fields, file) = {
            let mut state = self.state.lock().unwrap();
            match state.status {
                SubmissionStatus::Validating | SubmissionStatus::Submitting => {
                    tracing::debug!("[Submission {}] Already in flight", self.id);
                    return state.status;
                }
                SubmissionStatus::Succeeded => {
                    tracing::debug!("[Submission {}] Already succeeded", self.id);
                    return state.status;
                }
                SubmissionStatus::Idle | SubmissionStatus::Failed => {}
            }

            // Defensive re-validation; the caller should have disabled the
            // action already, so an incomplete request is a quiet no-op.
            let previous = state.status;
            state.status = SubmissionStatus::Validating;
            if !self.policy.is_complete(&state.fields, state.file.as_ref()) {
                state.status = previous;
                tracing::debug!("[Submission {}] Incomplete, not submitting", self.id);
                return previous;
            }

            state.status = SubmissionStatus::Submitting;
            (state.fields.clone(), state.file.clone())
        };

        tracing::info!("[Submission {}] Dispatching", self.id);
        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => {
                tracing::debug!("[Submission {}] Discarded mid-flight, dropping resolution", self.id);
                return SubmissionStatus::Submitting;
            }
            outcome = self.gateway.submit(&fields, file.as_ref()) => outcome,
        };

        let mut state = self.state.lock().unwrap();
        if self.cancel.is_cancelled() {
            // discarded while the gateway was resolving; leave the dead
            // instance untouched
            tracing::debug!("[Submission {}] Discarded, dropping resolution", self.id);
            return state.status;
        }
        match outcome {
            Ok(receipt) => {
                tracing::info!("[Submission {}] Succeeded", self.id);
                state.status = SubmissionStatus::Succeeded;
                state.receipt = Some(receipt);
                state.last_error = None;
            }
            Err(err) => {
                tracing::warn!("[Submission {}] Failed: {}", self.id, err);
                state.status = SubmissionStatus::Failed;
                state.last_error = Some(err.display_message());
            }
        }
        state.status
    }

    /// Detaches the workflow from its (torn down) owner.
    ///
    /// An in-flight resolution arriving after this point is dropped; the
    /// stale-response guard for discarded form instances.
    pub fn discard(&self) {
        self.cancel.cancel();
    }

    /// Failed -> Idle on the first edit; clears the stale error message.
    fn mark_edited(state: &mut RequestState) {
        if state.status == SubmissionStatus::Failed {
            state.status = SubmissionStatus::Idle;
            state.last_error = None;
        }
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
