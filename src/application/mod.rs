//! Application layer containing the checkout orchestration.
//!
//! `FlowStateTracker` is the entry point: it drives `OrderIntentCreator`,
//! `PaymentWidgetController` and `CallbackVerifier` strictly in sequence and
//! gates the whole flow on `GatewayReadiness`.

pub mod flow;
pub mod order_intent;
pub mod readiness;
pub mod routing;
pub mod verifier;
pub mod widget;
