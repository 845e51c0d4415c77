use super::routing::EndpointRoute;
use crate::config::CheckoutConfig;
use crate::domain::money::{Amount, OrderId};
use crate::domain::payment::OrderIntent;
use crate::domain::ports::SharedTransport;
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    order_id: OrderId,
    amount: Amount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    razorpay_order_id: Option<String>,
    razorpay_key: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    amount: Option<Decimal>,
}

/// Asks the merchant backend to mint a gateway order for a merchant order.
pub struct OrderIntentCreator {
    transport: SharedTransport,
    route: EndpointRoute,
    fallback_key: Option<String>,
}

impl OrderIntentCreator {
    pub fn new(transport: SharedTransport, config: &CheckoutConfig) -> Self {
        Self {
            transport,
            route: EndpointRoute::create_order(),
            fallback_key: config.fallback_key.clone(),
        }
    }

    /// Validates the inputs, then POSTs `{orderId, amount}` to the order route.
    ///
    /// Fails with `HttpStatus` on any non-2xx answer and with
    /// `MalformedResponse` when a 2xx body lacks `razorpayOrderId`.
    #[tracing::instrument(skip(self))]
    pub async fn create_order_intent(&self, order_id: u64, amount: Decimal) -> Result<OrderIntent> {
        let order_id = OrderId::new(order_id)?;
        let amount = Amount::new(amount)?;

        let body = serde_json::to_value(CreateOrderRequest { order_id, amount })?;
        let response = self.route.post(self.transport.as_ref(), &body).await?;

        if !response.is_success() {
            return Err(CheckoutError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        let parsed: CreateOrderResponse = serde_json::from_str(&response.body).map_err(|e| {
            CheckoutError::MalformedResponse(format!("order response is not valid JSON: {e}"))
        })?;

        let gateway_order_id = parsed
            .razorpay_order_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                CheckoutError::MalformedResponse(
                    "order response is missing razorpayOrderId".to_string(),
                )
            })?;

        let gateway_key = parsed
            .razorpay_key
            .filter(|key| !key.is_empty())
            .or_else(|| self.fallback_key.clone())
            .ok_or_else(|| {
                CheckoutError::MalformedResponse(
                    "order response is missing razorpayKey".to_string(),
                )
            })?;

        let amount = match parsed.amount {
            Some(value) => Amount::new(value).map_err(|_| {
                CheckoutError::MalformedResponse(format!("order response has invalid amount {value}"))
            })?,
            None => amount,
        };

        info!(%gateway_order_id, "order intent created");
        Ok(OrderIntent {
            gateway_order_id,
            gateway_key,
            amount,
        })
    }
}
