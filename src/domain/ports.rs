use super::payment::{PaymentProof, WidgetOptions, WidgetOutcome};
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Status and raw body of a backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// POSTs JSON bodies to paths relative to the merchant backend's base URL.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// The document hosting the gateway SDK script.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    /// Whether the SDK's global constructor is registered.
    fn sdk_present(&self) -> bool;
    /// Whether a script tag with this `src` is already in the document.
    fn script_present(&self, src: &str) -> bool;
    /// Appends an async script tag and resolves on its load event.
    /// The error event resolves to `Err` with a reason.
    async fn insert_script(&self, src: &str) -> std::result::Result<(), String>;
    fn remove_script(&self, src: &str);
}

/// The gateway SDK's checkout constructor plus `open()`.
pub trait CheckoutGateway: Send + Sync {
    /// Constructs the hosted checkout and opens it. Progress after this call is
    /// reported only through `hooks`.
    fn open(&self, options: WidgetOptions, hooks: WidgetHooks) -> std::result::Result<(), String>;
}

/// Where the UI goes next.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// The success and dismissal handlers attached to a widget.
///
/// Both handlers consume the hooks, so a widget resolves at most once.
#[derive(Debug)]
pub struct WidgetHooks {
    sender: oneshot::Sender<WidgetOutcome>,
}

impl WidgetHooks {
    pub fn new() -> (Self, oneshot::Receiver<WidgetOutcome>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Success handler: receives the payment proof.
    pub fn handler(self, proof: PaymentProof) {
        // The receiver is gone only if the attempt was abandoned.
        let _ = self.sender.send(WidgetOutcome::Paid(proof));
    }

    /// `modal.ondismiss`: the user closed the checkout without paying.
    pub fn on_dismiss(self) {
        let _ = self.sender.send(WidgetOutcome::Dismissed);
    }
}

pub type SharedTransport = Arc<dyn BackendTransport>;
pub type SharedScriptHost = Arc<dyn ScriptHost>;
pub type SharedGateway = Arc<dyn CheckoutGateway>;
pub type SharedNavigator = Arc<dyn Navigator>;
