#![allow(dead_code)]

use razorpay_checkout::application::flow::FlowStateTracker;
use razorpay_checkout::application::readiness::GatewayReadiness;
use razorpay_checkout::config::CheckoutConfig;
use razorpay_checkout::domain::payment::PaymentProof;
use razorpay_checkout::infrastructure::in_memory::{
    InMemoryBackend, InMemoryScriptHost, RecordingNavigator, ScriptedGateway,
};
use serde_json::{Value, json};
use std::sync::Arc;

pub const CREATE_ORDER: &str = "/payment/create-razorpay-order";
pub const CREATE_ORDER_FALLBACK: &str = "/api/payment/create-razorpay-order";
pub const VERIFY: &str = "/payment/razorpay-callback";
pub const VERIFY_FALLBACK: &str = "/api/payment/razorpay-callback";
pub const SDK_SRC: &str = "https://checkout.razorpay.com/v1/checkout.js";

pub struct Harness {
    pub backend: InMemoryBackend,
    pub host: InMemoryScriptHost,
    pub gateway: ScriptedGateway,
    pub navigator: RecordingNavigator,
    pub tracker: Arc<FlowStateTracker>,
}

/// A tracker whose gateway SDK has not been loaded yet.
pub fn unloaded_harness(gateway: ScriptedGateway) -> Harness {
    build(InMemoryScriptHost::new(), gateway)
}

/// A tracker ready to take payments.
pub async fn harness(gateway: ScriptedGateway) -> Harness {
    let harness = build(InMemoryScriptHost::with_sdk(), gateway);
    harness
        .tracker
        .readiness()
        .ensure_loaded()
        .await
        .expect("SDK should load");
    harness
}

fn build(host: InMemoryScriptHost, gateway: ScriptedGateway) -> Harness {
    let backend = InMemoryBackend::new();
    let navigator = RecordingNavigator::new();
    let readiness = Arc::new(GatewayReadiness::new(Arc::new(host.clone()), SDK_SRC));
    let tracker = Arc::new(FlowStateTracker::new(
        CheckoutConfig::default(),
        Arc::new(backend.clone()),
        readiness,
        Arc::new(gateway.clone()),
        Arc::new(navigator.clone()),
    ));

    Harness {
        backend,
        host,
        gateway,
        navigator,
        tracker,
    }
}

pub fn order_created() -> Value {
    json!({"razorpayOrderId": "order_abc", "razorpayKey": "rzp_test", "amount": 199})
}

pub fn proof() -> PaymentProof {
    PaymentProof {
        razorpay_order_id: "order_abc".to_string(),
        razorpay_payment_id: "pay_xyz".to_string(),
        razorpay_signature: "sig".to_string(),
    }
}
