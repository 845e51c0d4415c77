use super::readiness::GatewayReadiness;
use crate::config::CURRENCY;
use crate::domain::payment::{OrderIntent, WidgetMetadata, WidgetOptions, WidgetOutcome};
use crate::domain::ports::{SharedGateway, WidgetHooks};
use crate::error::{CheckoutError, Result};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// Drives the gateway's hosted checkout for one order intent.
pub struct PaymentWidgetController {
    readiness: Arc<GatewayReadiness>,
    gateway: SharedGateway,
}

impl PaymentWidgetController {
    pub fn new(readiness: Arc<GatewayReadiness>, gateway: SharedGateway) -> Self {
        Self { readiness, gateway }
    }

    pub fn widget_options(intent: &OrderIntent, metadata: &WidgetMetadata) -> Result<WidgetOptions> {
        Ok(WidgetOptions {
            key: intent.gateway_key.clone(),
            amount: intent.amount.to_minor_units()?,
            currency: CURRENCY.to_string(),
            name: metadata.name.clone(),
            description: metadata.description.clone(),
            order_id: intent.gateway_order_id.clone(),
            theme: metadata.theme.clone(),
        })
    }

    /// Opens the checkout. Requires the SDK to be loaded; never builds a widget
    /// against a missing SDK.
    #[tracing::instrument(skip_all, fields(gateway_order_id = %intent.gateway_order_id))]
    pub fn open_widget(
        &self,
        intent: &OrderIntent,
        metadata: &WidgetMetadata,
    ) -> Result<PendingWidget> {
        self.readiness.check()?;

        let options = Self::widget_options(intent, metadata)?;
        let (hooks, receiver) = WidgetHooks::new();
        self.gateway
            .open(options, hooks)
            .map_err(CheckoutError::Widget)?;

        debug!("checkout widget opened");
        Ok(PendingWidget { receiver })
    }
}

/// An open checkout waiting for the user.
#[derive(Debug)]
pub struct PendingWidget {
    receiver: oneshot::Receiver<WidgetOutcome>,
}

impl PendingWidget {
    /// Resolves once, with either the payment proof or the dismissal.
    pub async fn outcome(self) -> Result<WidgetOutcome> {
        self.receiver.await.map_err(|_| {
            CheckoutError::Widget("checkout closed without reporting a result".to_string())
        })
    }
}
