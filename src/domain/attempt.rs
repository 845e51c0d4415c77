use super::payment::{OrderIntent, PaymentProof, Verification};
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Observable states of a payment attempt.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    CreatingOrder,
    AwaitingWidget,
    Verifying,
    Succeeded,
    Failed,
    Cancelled,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CreatingOrder => "creating_order",
            Self::AwaitingWidget => "awaiting_widget",
            Self::Verifying => "verifying",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// One run of the payment flow, from "Pay Now" to a terminal state.
///
/// Mutated in place as each stage completes. The transition methods enforce the
/// state machine: a proof is never recorded without a gateway order id, and
/// `Succeeded` is only reachable with both a proof and a backend status.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct PaymentAttempt {
    pub id: u64,
    pub order_id: u64,
    pub amount: Decimal,
    pub state: FlowState,
    pub gateway_order_id: Option<String>,
    pub payment_proof: Option<PaymentProof>,
    pub backend_status: Option<String>,
    pub verification: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub redirect_to: Option<String>,
}

impl PaymentAttempt {
    pub fn new(id: u64, order_id: u64, amount: Decimal) -> Self {
        Self {
            id,
            order_id,
            amount,
            state: FlowState::Idle,
            gateway_order_id: None,
            payment_proof: None,
            backend_status: None,
            verification: None,
            error_message: None,
            redirect_to: None,
        }
    }

    fn expect_state(&self, expected: &[FlowState], action: &'static str) -> Result<()> {
        if expected.contains(&self.state) {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                from: self.state.to_string(),
                action,
            })
        }
    }

    /// Leaves the attempt idle with an inline message (validation, still loading).
    pub fn hold_idle(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// idle -> creating_order
    pub fn begin_order_creation(&mut self) -> Result<()> {
        self.expect_state(&[FlowState::Idle], "create an order")?;
        self.error_message = None;
        self.state = FlowState::CreatingOrder;
        Ok(())
    }

    /// creating_order -> awaiting_widget
    pub fn order_created(&mut self, intent: &OrderIntent) -> Result<()> {
        self.expect_state(&[FlowState::CreatingOrder], "record an order intent")?;
        self.gateway_order_id = Some(intent.gateway_order_id.clone());
        self.state = FlowState::AwaitingWidget;
        Ok(())
    }

    /// awaiting_widget -> verifying
    pub fn proof_received(&mut self, proof: PaymentProof) -> Result<()> {
        self.expect_state(&[FlowState::AwaitingWidget], "record a payment proof")?;
        if self.gateway_order_id.is_none() {
            return Err(CheckoutError::InvalidTransition {
                from: self.state.to_string(),
                action: "record a payment proof without a gateway order",
            });
        }
        self.payment_proof = Some(proof);
        self.state = FlowState::Verifying;
        Ok(())
    }

    /// awaiting_widget -> cancelled
    pub fn cancel(&mut self) -> Result<()> {
        self.expect_state(&[FlowState::AwaitingWidget], "cancel")?;
        self.error_message = Some("Payment cancelled".to_string());
        self.state = FlowState::Cancelled;
        Ok(())
    }

    /// verifying -> succeeded
    pub fn verified(&mut self, verification: Verification) -> Result<()> {
        self.expect_state(&[FlowState::Verifying], "complete")?;
        if self.payment_proof.is_none() {
            return Err(CheckoutError::InvalidTransition {
                from: self.state.to_string(),
                action: "complete without a payment proof",
            });
        }
        self.backend_status = Some(verification.status);
        self.verification = Some(verification.payload);
        self.state = FlowState::Succeeded;
        Ok(())
    }

    /// creating_order | awaiting_widget | verifying -> failed
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.expect_state(
            &[
                FlowState::CreatingOrder,
                FlowState::AwaitingWidget,
                FlowState::Verifying,
            ],
            "fail",
        )?;
        self.error_message = Some(message.into());
        self.state = FlowState::Failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use rust_decimal_macros::dec;

    fn intent() -> OrderIntent {
        OrderIntent {
            gateway_order_id: "order_abc".to_string(),
            gateway_key: "rzp_test".to_string(),
            amount: Amount::new(dec!(199)).unwrap(),
        }
    }

    fn proof() -> PaymentProof {
        PaymentProof {
            razorpay_order_id: "order_abc".to_string(),
            razorpay_payment_id: "pay_xyz".to_string(),
            razorpay_signature: "sig".to_string(),
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut attempt = PaymentAttempt::new(1, 1, dec!(199));
        attempt.begin_order_creation().unwrap();
        attempt.order_created(&intent()).unwrap();
        assert_eq!(attempt.state, FlowState::AwaitingWidget);
        attempt.proof_received(proof()).unwrap();
        assert_eq!(attempt.state, FlowState::Verifying);
        attempt
            .verified(Verification {
                status: "SUCCESS".to_string(),
                payload: serde_json::json!({"status": "SUCCESS"}),
            })
            .unwrap();
        assert_eq!(attempt.state, FlowState::Succeeded);
        assert_eq!(attempt.backend_status.as_deref(), Some("SUCCESS"));
    }

    #[test]
    fn test_proof_requires_gateway_order() {
        let mut attempt = PaymentAttempt::new(1, 1, dec!(199));
        attempt.begin_order_creation().unwrap();
        let result = attempt.proof_received(proof());
        assert!(matches!(
            result,
            Err(CheckoutError::InvalidTransition { .. })
        ));
        assert!(attempt.payment_proof.is_none());
    }

    #[test]
    fn test_cancel_only_from_awaiting_widget() {
        let mut attempt = PaymentAttempt::new(1, 1, dec!(199));
        assert!(attempt.cancel().is_err());
        attempt.begin_order_creation().unwrap();
        assert!(attempt.cancel().is_err());
        attempt.order_created(&intent()).unwrap();
        attempt.cancel().unwrap();
        assert_eq!(attempt.state, FlowState::Cancelled);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut attempt = PaymentAttempt::new(1, 1, dec!(199));
        attempt.begin_order_creation().unwrap();
        attempt.fail("boom").unwrap();
        assert!(attempt.state.is_terminal());
        assert!(attempt.begin_order_creation().is_err());
        assert!(attempt.fail("again").is_err());
        assert_eq!(attempt.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_idle_cannot_fail() {
        let mut attempt = PaymentAttempt::new(1, 0, dec!(199));
        attempt.hold_idle("Order ID is required");
        assert_eq!(attempt.state, FlowState::Idle);
        assert!(attempt.fail("x").is_err());
    }
}
