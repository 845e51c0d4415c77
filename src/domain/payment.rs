use super::money::Amount;
use serde::{Deserialize, Serialize};

/// A gateway-side order identifier minted by the merchant backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderIntent {
    pub gateway_order_id: String,
    pub gateway_key: String,
    pub amount: Amount,
}

/// The bundle the gateway hands back after a successful payment.
///
/// Untrusted until the merchant backend has verified the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// The merchant backend's answer to a verification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    /// Status string reported by the backend, e.g. `SUCCESS`.
    pub status: String,
    /// Full response body, kept for audit display.
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetTheme {
    pub color: String,
}

/// Display data for the hosted checkout that is not part of the order intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMetadata {
    pub name: String,
    pub description: String,
    pub theme: WidgetTheme,
}

/// Options handed to the gateway's checkout constructor.
///
/// Event hooks travel separately as `WidgetHooks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    pub key: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub theme: WidgetTheme,
}

/// How a widget session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    Paid(PaymentProof),
    Dismissed,
}
