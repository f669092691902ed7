pub mod auth_client;
pub mod identity_widget;
pub mod payment_client;
pub mod resume_client;

mod wire;

pub use crate::auth_client::AuthApiClient;
pub use crate::identity_widget::{
    CredentialSink, IdentitySdk, IdentityWidgetController, IdentityWidgetState, WidgetConfig,
    WidgetPhase,
};
pub use crate::payment_client::PaymentSubmitClient;
pub use crate::resume_client::ResumeSubmitClient;
