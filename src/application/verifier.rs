use super::routing::EndpointRoute;
use crate::domain::money::{Amount, OrderId};
use crate::domain::payment::{PaymentProof, Verification};
use crate::domain::ports::SharedTransport;
use crate::error::{CheckoutError, Result};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    #[serde(flatten)]
    proof: &'a PaymentProof,
    #[serde(rename = "orderId")]
    order_id: OrderId,
    amount: Amount,
}

/// Has the merchant backend check a payment proof's signature and reconcile
/// the order.
///
/// Every failure after the request left the client is reported as
/// `Unverified`: the gateway has already taken the money. The one exception is
/// a verification route that does not exist on the backend at all, which is a
/// deployment problem and is reported as a plain `HttpStatus` 404.
pub struct CallbackVerifier {
    transport: SharedTransport,
    route: EndpointRoute,
}

impl CallbackVerifier {
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            transport,
            route: EndpointRoute::verify_payment(),
        }
    }

    #[tracing::instrument(
        skip(self, proof),
        fields(payment_id = %proof.razorpay_payment_id, gateway_order_id = %proof.razorpay_order_id)
    )]
    pub async fn verify(
        &self,
        proof: &PaymentProof,
        order_id: OrderId,
        amount: Amount,
    ) -> Result<Verification> {
        let body = serde_json::to_value(VerifyRequest {
            proof,
            order_id,
            amount,
        })?;

        let response = match self.route.post(self.transport.as_ref(), &body).await {
            Ok(response) => response,
            Err(CheckoutError::Transport(err)) => {
                warn!(error = %err, "verification request did not complete");
                return Err(CheckoutError::Unverified {
                    detail: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        if response.is_not_found() {
            return Err(CheckoutError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        if !response.is_success() {
            warn!(status = response.status, "backend rejected verification");
            return Err(CheckoutError::Unverified {
                detail: format!("backend returned status {}: {}", response.status, response.body),
            });
        }

        let payload: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| CheckoutError::Unverified {
                detail: format!("backend response is not valid JSON: {e}"),
            })?;

        let status = payload
            .get("status")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CheckoutError::Unverified {
                detail: "backend response is missing status".to_string(),
            })?
            .to_string();

        info!(%status, "payment verified");
        Ok(Verification { status, payload })
    }
}
