//! Identity widget lifecycle controller.
//!
//! The sign-in affordance is rendered by an externally-loaded, stateful SDK
//! whose lifecycle (script fetch, initialization, render, credential
//! callback, teardown) the application does not control and which can race
//! with UI mount/unmount. The controller owns that lifecycle behind a small
//! capability interface (`start`, `stop`, state snapshot) and guards every
//! SDK callback with its own liveness, not the caller's.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strum::Display;
use tailorcv_core::error::{Result, TailorCvError};

/// Consumer of raw credentials coming out of the widget.
///
/// The credential is opaque; the controller forwards it without inspecting
/// its contents.
pub type CredentialSink = Arc<dyn Fn(String) + Send + Sync>;

/// The external sign-in SDK boundary.
///
/// A production implementation wraps the provider's script and DOM calls;
/// tests substitute a mock. `teardown` must remove every side effect the
/// other calls introduced and must be safe to call at any time.
#[async_trait]
pub trait IdentitySdk: Send + Sync {
    /// Fetches the external script.
    async fn load(&self) -> Result<()>;

    /// Initializes the SDK with the OAuth client id, registering the sink
    /// that will receive credentials at some arbitrary later time.
    async fn initialize(&self, client_id: &str, sink: CredentialSink) -> Result<()>;

    /// Renders the sign-in affordance into the given mount point.
    async fn render(&self, mount_id: &str) -> Result<()>;

    /// Removes all script/DOM side effects.
    fn teardown(&self);
}

/// Lifecycle phase of the external widget.
///
/// Transitions are monotonic within one `start` cycle; only an explicit
/// restart leaves `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WidgetPhase {
    Unloaded,
    Loading,
    Ready,
    Rendered,
    Error,
}

/// Snapshot of the widget state for the UI.
#[derive(Debug, Clone)]
pub struct IdentityWidgetState {
    pub phase: WidgetPhase,
    /// Most recent failure, if it is still within its display window
    pub last_error: Option<TailorCvError>,
}

/// Everything `start` needs.
pub struct WidgetConfig {
    /// OAuth client id; absence is a configuration error, not a crash
    pub client_id: Option<String>,
    /// DOM id of the element the sign-in button renders into
    pub mount_id: String,
    /// When a session is already active the affordance is not rendered
    pub session_active: bool,
    /// Receives credentials the provider hands back
    pub on_credential: CredentialSink,
}

/// How long a failure stays visible before it is cleared from the snapshot.
const ERROR_DISPLAY_WINDOW: Duration = Duration::from_secs(5);

/// Owns the external widget lifecycle independent of UI component lifetime.
#[derive(Clone)]
pub struct IdentityWidgetController {
    sdk: Arc<dyn IdentitySdk>,
    inner: Arc<Mutex<Inner>>,
    error_display: Duration,
}

struct Inner {
    phase: WidgetPhase,
    last_error: Option<TailorCvError>,
    /// Bumped by every accepted `start` and every `stop`; in-flight work
    /// and registered sinks carry the generation they were started under
    /// and go quiet when it no longer matches.
    generation: u64,
    /// Identifies the currently displayed error for the auto-clear timer.
    error_seq: u64,
}

impl IdentityWidgetController {
    pub fn new(sdk: Arc<dyn IdentitySdk>) -> Self {
        Self {
            sdk,
            inner: Arc::new(Mutex::new(Inner {
                phase: WidgetPhase::Unloaded,
                last_error: None,
                generation: 0,
                error_seq: 0,
            })),
            error_display: ERROR_DISPLAY_WINDOW,
        }
    }

    /// Overrides the error display window (tests use a short one).
    pub fn with_error_display(mut self, window: Duration) -> Self {
        self.error_display = window;
        self
    }

    pub fn phase(&self) -> WidgetPhase {
        self.inner.lock().unwrap().phase
    }

    pub fn state(&self) -> IdentityWidgetState {
        let inner = self.inner.lock().unwrap();
        IdentityWidgetState {
            phase: inner.phase,
            last_error: inner.last_error.clone(),
        }
    }

    /// Begins (or restarts after an error) the widget lifecycle.
    ///
    /// Idempotent while the widget is already Loading, Ready, or Rendered:
    /// no second script load, no double-registered sink. Without a client
    /// id the controller goes straight to `Error` and touches no SDK.
    pub fn start(&self, config: WidgetConfig) {
        let client_id = match config.client_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => {
                let generation = {
                    let mut inner = self.inner.lock().unwrap();
                    if matches!(
                        inner.phase,
                        WidgetPhase::Loading | WidgetPhase::Ready | WidgetPhase::Rendered
                    ) {
                        return;
                    }
                    inner.generation += 1;
                    inner.generation
                };
                self.record_failure(
                    generation,
                    TailorCvError::config("Google client id is not configured; sign-in is unavailable"),
                );
                return;
            }
        };

        let generation = {
            let mut inner = self.inner.lock().unwrap();
            if matches!(
                inner.phase,
                WidgetPhase::Loading | WidgetPhase::Ready | WidgetPhase::Rendered
            ) {
                tracing::debug!("[IdentityWidget] start ignored, already {}", inner.phase);
                return;
            }
            inner.generation += 1;
            inner.phase = WidgetPhase::Loading;
            inner.last_error = None;
            inner.generation
        };

        let controller = self.clone();
        tokio::spawn(async move {
            controller
                .drive(
                    generation,
                    client_id,
                    config.mount_id,
                    config.session_active,
                    config.on_credential,
                )
                .await;
        });
    }

    /// Tears the widget down from any phase.
    ///
    /// Removes SDK side effects, cancels pending callbacks (they carry a
    /// stale generation afterwards), and lands in `Unloaded`. Safe to call
    /// repeatedly.
    pub fn stop(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.generation += 1;
            inner.phase = WidgetPhase::Unloaded;
            inner.last_error = None;
        }
        self.sdk.teardown();
        tracing::debug!("[IdentityWidget] Stopped");
    }

    /// Runs one load → initialize → render cycle under `generation`.
    async fn drive(
        &self,
        generation: u64,
        client_id: String,
        mount_id: String,
        session_active: bool,
        on_credential: CredentialSink,
    ) {
        if let Err(e) = self.sdk.load().await {
            self.record_failure(
                generation,
                TailorCvError::transient(format!(
                    "Failed to load the sign-in script: {}",
                    e.display_message()
                )),
            );
            return;
        }
        if !self.is_live(generation) {
            return;
        }

        // The sink outlives this call by design; it checks the controller's
        // generation at fire time, not ours.
        let guard = self.clone();
        let sink: CredentialSink = Arc::new(move |credential: String| {
            if guard.is_live(generation) {
                (on_credential.as_ref())(credential);
            } else {
                tracing::debug!("[IdentityWidget] Dropped credential for a stopped widget");
            }
        });

        if let Err(e) = self.sdk.initialize(&client_id, sink).await {
            self.record_failure(generation, e);
            return;
        }
        if !self.advance(generation, WidgetPhase::Ready) {
            return;
        }

        if session_active {
            // Already signed in; a sign-in button would be redundant UI.
            tracing::debug!("[IdentityWidget] Session active, skipping render");
            return;
        }

        if let Err(e) = self.sdk.render(&mount_id).await {
            self.record_failure(generation, e);
            return;
        }
        self.advance(generation, WidgetPhase::Rendered);
    }

    fn is_live(&self, generation: u64) -> bool {
        self.inner.lock().unwrap().generation == generation
    }

    fn advance(&self, generation: u64, phase: WidgetPhase) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.generation != generation {
            return false;
        }
        inner.phase = phase;
        true
    }

    /// Records a failure and schedules its display-window expiry.
    ///
    /// Expiry only removes the message; the phase never regresses because a
    /// banner timed out.
    fn record_failure(&self, generation: u64, error: TailorCvError) {
        let seq = {
            let mut inner = self.inner.lock().unwrap();
            if inner.generation != generation {
                return;
            }
            tracing::warn!("[IdentityWidget] {}", error);
            inner.phase = WidgetPhase::Error;
            inner.last_error = Some(error);
            inner.error_seq += 1;
            inner.error_seq
        };

        let controller = self.clone();
        let window = self.error_display;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut inner = controller.inner.lock().unwrap();
            if inner.error_seq == seq {
                inner.last_error = None;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockSdk {
        load_calls: AtomicUsize,
        init_calls: AtomicUsize,
        render_calls: AtomicUsize,
        teardown_calls: AtomicUsize,
        fail_load: bool,
        sink: Mutex<Option<CredentialSink>>,
    }

    impl MockSdk {
        fn failing_load() -> Self {
            Self {
                fail_load: true,
                ..Default::default()
            }
        }

        fn fire_credential(&self, credential: &str) {
            let sink = self
                .sink
                .lock()
                .unwrap()
                .clone()
                .expect("no sink registered");
            (sink.as_ref())(credential.to_string());
        }
    }

    #[async_trait]
    impl IdentitySdk for MockSdk {
        async fn load(&self) -> Result<()> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_load {
                Err(TailorCvError::transient("script fetch failed"))
            } else {
                Ok(())
            }
        }

        async fn initialize(&self, _client_id: &str, sink: CredentialSink) -> Result<()> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            *self.sink.lock().unwrap() = Some(sink);
            Ok(())
        }

        async fn render(&self, _mount_id: &str) -> Result<()> {
            self.render_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn teardown(&self) {
            self.teardown_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn config_for(session_active: bool, received: Arc<AtomicUsize>) -> WidgetConfig {
        WidgetConfig {
            client_id: Some("client-123".to_string()),
            mount_id: "google-signin-button".to_string(),
            session_active,
            on_credential: Arc::new(move |_credential| {
                received.fetch_add(1, Ordering::SeqCst);
            }),
        }
    }

    async fn wait_for_phase(controller: &IdentityWidgetController, phase: WidgetPhase) {
        for _ in 0..200 {
            if controller.phase() == phase {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "widget never reached {}, stuck at {}",
            phase,
            controller.phase()
        );
    }

    #[tokio::test]
    async fn test_start_renders_sign_in() {
        let sdk = Arc::new(MockSdk::default());
        let controller = IdentityWidgetController::new(sdk.clone());

        controller.start(config_for(false, Arc::new(AtomicUsize::new(0))));
        wait_for_phase(&controller, WidgetPhase::Rendered).await;

        assert_eq!(sdk.load_calls.load(Ordering::SeqCst), 1);
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 1);
        assert_eq!(sdk.render_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_start_is_idempotent_while_loading() {
        let sdk = Arc::new(MockSdk::default());
        let controller = IdentityWidgetController::new(sdk.clone());
        let received = Arc::new(AtomicUsize::new(0));

        controller.start(config_for(false, received.clone()));
        controller.start(config_for(false, received));
        wait_for_phase(&controller, WidgetPhase::Rendered).await;

        assert_eq!(sdk.load_calls.load(Ordering::SeqCst), 1);
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_client_id_is_a_config_error_without_sdk_calls() {
        let sdk = Arc::new(MockSdk::default());
        let controller = IdentityWidgetController::new(sdk.clone());

        controller.start(WidgetConfig {
            client_id: None,
            mount_id: "google-signin-button".to_string(),
            session_active: false,
            on_credential: Arc::new(|_| {}),
        });

        let state = controller.state();
        assert_eq!(state.phase, WidgetPhase::Error);
        assert!(state.last_error.unwrap().is_config());
        assert_eq!(sdk.load_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_render_skipped_when_session_active() {
        let sdk = Arc::new(MockSdk::default());
        let controller = IdentityWidgetController::new(sdk.clone());

        controller.start(config_for(true, Arc::new(AtomicUsize::new(0))));
        wait_for_phase(&controller, WidgetPhase::Ready).await;

        assert_eq!(sdk.render_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_credential_forwarded_while_live_dropped_after_stop() {
        let sdk = Arc::new(MockSdk::default());
        let controller = IdentityWidgetController::new(sdk.clone());
        let received = Arc::new(AtomicUsize::new(0));

        controller.start(config_for(false, received.clone()));
        wait_for_phase(&controller, WidgetPhase::Rendered).await;

        sdk.fire_credential("credential-1");
        assert_eq!(received.load(Ordering::SeqCst), 1);

        controller.stop();
        sdk.fire_credential("credential-2");
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_twice_is_safe() {
        let sdk = Arc::new(MockSdk::default());
        let controller = IdentityWidgetController::new(sdk.clone());

        controller.start(config_for(false, Arc::new(AtomicUsize::new(0))));
        wait_for_phase(&controller, WidgetPhase::Rendered).await;

        controller.stop();
        controller.stop();

        assert_eq!(controller.phase(), WidgetPhase::Unloaded);
        assert_eq!(sdk.teardown_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_script_failure_auto_clears_but_phase_stays() {
        let sdk = Arc::new(MockSdk::failing_load());
        let controller =
            IdentityWidgetController::new(sdk).with_error_display(Duration::from_millis(50));

        controller.start(config_for(false, Arc::new(AtomicUsize::new(0))));
        wait_for_phase(&controller, WidgetPhase::Error).await;
        assert!(controller.state().last_error.unwrap().is_retryable());

        tokio::time::sleep(Duration::from_millis(120)).await;
        let state = controller.state();
        assert!(state.last_error.is_none());
        assert_eq!(state.phase, WidgetPhase::Error);
    }

    #[tokio::test]
    async fn test_restart_after_error_reaches_rendered() {
        let sdk = Arc::new(MockSdk::default());
        let controller = IdentityWidgetController::new(sdk.clone());

        // force an error phase via a missing client id, then restart with one
        controller.start(WidgetConfig {
            client_id: None,
            mount_id: "google-signin-button".to_string(),
            session_active: false,
            on_credential: Arc::new(|_| {}),
        });
        assert_eq!(controller.phase(), WidgetPhase::Error);

        controller.start(config_for(false, Arc::new(AtomicUsize::new(0))));
        wait_for_phase(&controller, WidgetPhase::Rendered).await;
        assert_eq!(sdk.load_calls.load(Ordering::SeqCst), 1);
    }
}
