use super::order_intent::OrderIntentCreator;
use super::readiness::GatewayReadiness;
use super::verifier::CallbackVerifier;
use super::widget::PaymentWidgetController;
use crate::config::{CheckoutConfig, REDIRECT_DELAY};
use crate::domain::attempt::PaymentAttempt;
use crate::domain::money::{Amount, OrderId};
use crate::domain::payment::{WidgetMetadata, WidgetOutcome};
use crate::domain::ports::{SharedGateway, SharedNavigator, SharedTransport};
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Orchestrates one payment attempt at a time:
/// order intent, hosted checkout, then backend verification.
///
/// Every stage converts its own failures into the attempt's `error_message`
/// and a state transition; `start_payment` never returns an error. Each
/// transition of the latest attempt is published on a `watch` channel.
pub struct FlowStateTracker {
    readiness: Arc<GatewayReadiness>,
    order_intents: OrderIntentCreator,
    widget: PaymentWidgetController,
    verifier: CallbackVerifier,
    navigator: SharedNavigator,
    config: CheckoutConfig,
    last_attempt_id: AtomicU64,
    current: watch::Sender<PaymentAttempt>,
}

impl FlowStateTracker {
    pub fn new(
        config: CheckoutConfig,
        transport: SharedTransport,
        readiness: Arc<GatewayReadiness>,
        gateway: SharedGateway,
        navigator: SharedNavigator,
    ) -> Self {
        let (current, _) = watch::channel(PaymentAttempt::new(0, 0, Decimal::ZERO));
        Self {
            order_intents: OrderIntentCreator::new(Arc::clone(&transport), &config),
            verifier: CallbackVerifier::new(transport),
            widget: PaymentWidgetController::new(Arc::clone(&readiness), gateway),
            readiness,
            navigator,
            config,
            last_attempt_id: AtomicU64::new(0),
            current,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PaymentAttempt> {
        self.current.subscribe()
    }

    /// Snapshot of the most recent attempt.
    pub fn current(&self) -> PaymentAttempt {
        self.current.borrow().clone()
    }

    pub fn readiness(&self) -> &Arc<GatewayReadiness> {
        &self.readiness
    }

    /// Starts a fresh attempt and drives it until it settles.
    ///
    /// Returns the attempt in its final state: a terminal state, or `Idle`
    /// with an inline message when the inputs were invalid or the gateway was
    /// not ready.
    #[tracing::instrument(skip(self))]
    pub async fn start_payment(&self, order_id: u64, amount: Decimal) -> PaymentAttempt {
        let id = self.last_attempt_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut attempt = PaymentAttempt::new(id, order_id, amount);
        self.publish(&attempt);

        if let Err(err) = self.run(&mut attempt).await {
            // Only an illegal transition can end up here.
            error!(error = %err, state = %attempt.state, "payment flow stopped unexpectedly");
        }
        attempt
    }

    async fn run(&self, attempt: &mut PaymentAttempt) -> Result<()> {
        let validated = OrderId::new(attempt.order_id)
            .and_then(|order_id| Amount::new(attempt.amount).map(|amount| (order_id, amount)));
        let (order_id, amount) = match validated {
            Ok(inputs) => inputs,
            Err(err) => {
                attempt.hold_idle(err.to_string());
                self.publish(attempt);
                return Ok(());
            }
        };

        if let Err(err) = self.readiness.check() {
            attempt.hold_idle(err.to_string());
            self.publish(attempt);
            return Ok(());
        }

        attempt.begin_order_creation()?;
        self.publish(attempt);

        let intent = match self
            .order_intents
            .create_order_intent(order_id.value(), amount.value())
            .await
        {
            Ok(intent) => intent,
            Err(err) => return self.fail(attempt, err.to_string()),
        };
        attempt.order_created(&intent)?;
        self.publish(attempt);

        let metadata = self.metadata(order_id);
        let outcome = match self.widget.open_widget(&intent, &metadata) {
            Ok(pending) => pending.outcome().await,
            Err(err) => Err(err),
        };
        let proof = match outcome {
            Ok(WidgetOutcome::Paid(proof)) => proof,
            Ok(WidgetOutcome::Dismissed) => {
                info!("checkout dismissed by user");
                attempt.cancel()?;
                self.publish(attempt);
                return Ok(());
            }
            Err(err) => return self.fail(attempt, err.to_string()),
        };

        if proof.razorpay_order_id != intent.gateway_order_id {
            warn!(
                expected = %intent.gateway_order_id,
                received = %proof.razorpay_order_id,
                "payment proof names a different gateway order"
            );
        }
        attempt.proof_received(proof.clone())?;
        self.publish(attempt);

        match self.verifier.verify(&proof, order_id, amount).await {
            Ok(verification) => {
                attempt.verified(verification)?;
                self.schedule_redirect(attempt);
                self.publish(attempt);
                Ok(())
            }
            Err(err @ CheckoutError::Unverified { .. }) => self.fail(
                attempt,
                format!("{err}. Please check your order status before paying again"),
            ),
            Err(err) => self.fail(attempt, err.to_string()),
        }
    }

    fn fail(&self, attempt: &mut PaymentAttempt, message: String) -> Result<()> {
        warn!(state = %attempt.state, %message, "payment attempt failed");
        attempt.fail(message)?;
        self.publish(attempt);
        Ok(())
    }

    fn metadata(&self, order_id: OrderId) -> WidgetMetadata {
        WidgetMetadata {
            name: self.config.merchant_name.clone(),
            description: format!("Order #{order_id}"),
            theme: self.config.theme(),
        }
    }

    fn schedule_redirect(&self, attempt: &mut PaymentAttempt) {
        let route = self.config.home_route.clone();
        attempt.redirect_to = Some(route.clone());

        let navigator = Arc::clone(&self.navigator);
        tokio::spawn(async move {
            tokio::time::sleep(REDIRECT_DELAY).await;
            navigator.navigate(&route);
        });
    }

    /// Publishes `attempt` unless a newer attempt has already started.
    fn publish(&self, attempt: &PaymentAttempt) {
        self.current.send_if_modified(|current| {
            if attempt.id >= current.id {
                *current = attempt.clone();
                true
            } else {
                false
            }
        });
    }
}
