mod common;

use common::{CREATE_ORDER, CREATE_ORDER_FALLBACK, VERIFY, harness, proof};
use rand::Rng;
use razorpay_checkout::domain::attempt::FlowState;
use razorpay_checkout::infrastructure::in_memory::ScriptedGateway;
use rust_decimal::Decimal;
use serde_json::json;

fn random_order(rng: &mut impl Rng) -> (u64, Decimal) {
    let order_id = rng.gen_range(1..=1_000_000u64);
    let paise = rng.gen_range(1..=10_000_000i64);
    (order_id, Decimal::new(paise, 2))
}

#[tokio::test]
async fn test_valid_orders_always_reach_the_widget() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let (order_id, amount) = random_order(&mut rng);
        let h = harness(ScriptedGateway::dismissing()).await;
        h.backend.respond(
            CREATE_ORDER,
            200,
            json!({"razorpayOrderId": format!("order_{order_id}"), "razorpayKey": "rzp_test"}),
        );

        let attempt = h.tracker.start_payment(order_id, amount).await;

        // Cancelled is only reachable from awaiting_widget.
        assert_eq!(attempt.state, FlowState::Cancelled, "{order_id} / {amount}");
        let opened = h.gateway.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].order_id, format!("order_{order_id}"));
        assert_eq!(Decimal::from(opened[0].amount), amount * Decimal::from(100));
    }
}

#[tokio::test]
async fn test_fallback_only_ever_adds_one_call() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let (order_id, amount) = random_order(&mut rng);
        let primary_missing = rng.gen_bool(0.5);
        let h = harness(ScriptedGateway::paying(proof())).await;

        let order_path = if primary_missing {
            CREATE_ORDER_FALLBACK
        } else {
            CREATE_ORDER
        };
        h.backend.respond(
            order_path,
            200,
            json!({"razorpayOrderId": "order_abc", "razorpayKey": "rzp_test"}),
        );
        h.backend.respond(VERIFY, 200, json!({"status": "SUCCESS"}));

        let attempt = h.tracker.start_payment(order_id, amount).await;

        assert_eq!(attempt.state, FlowState::Succeeded);
        let expected_calls = if primary_missing { 3 } else { 2 };
        assert_eq!(h.backend.calls().len(), expected_calls);
    }
}
