use crate::config::{CREATE_ORDER_PATHS, VERIFY_PAYMENT_PATHS};
use crate::domain::ports::{BackendTransport, HttpResponse};
use crate::error::{Result, TransportError};
use tracing::{debug, warn};

/// Ordered candidate paths for one backend operation.
///
/// A request moves on to the next candidate only when the current one answers
/// 404 or never answers at all. Any other response, including other error
/// statuses and timeouts, is final. When every candidate answers 404, the last
/// 404 is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRoute {
    candidates: Vec<String>,
}

impl EndpointRoute {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn create_order() -> Self {
        Self::new(CREATE_ORDER_PATHS.iter().copied())
    }

    pub fn verify_payment() -> Self {
        Self::new(VERIFY_PAYMENT_PATHS.iter().copied())
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    #[tracing::instrument(skip_all, fields(route = ?self.candidates))]
    pub async fn post(
        &self,
        transport: &dyn BackendTransport,
        body: &serde_json::Value,
    ) -> Result<HttpResponse> {
        for (index, path) in self.candidates.iter().enumerate() {
            let has_next = index + 1 < self.candidates.len();
            match transport.post_json(path, body).await {
                Ok(response) if response.is_not_found() && has_next => {
                    warn!(path = %path, "route not found, trying next candidate");
                }
                Err(TransportError::NoResponse(reason)) if has_next => {
                    warn!(path = %path, %reason, "no response, trying next candidate");
                }
                Ok(response) => {
                    debug!(path = %path, status = response.status, "backend answered");
                    return Ok(response);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(TransportError::NoResponse("no endpoint candidates configured".to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use crate::infrastructure::in_memory::InMemoryBackend;
    use serde_json::json;

    fn route() -> EndpointRoute {
        EndpointRoute::new(["/primary", "/secondary"])
    }

    #[tokio::test]
    async fn test_primary_success_makes_one_call() {
        let backend = InMemoryBackend::new();
        backend.respond("/primary", 200, json!({"ok": true}));

        let response = route().post(&backend, &json!({})).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(backend.call_paths(), vec!["/primary"]);
    }

    #[tokio::test]
    async fn test_not_found_falls_back_once() {
        let backend = InMemoryBackend::new();
        backend.respond("/secondary", 200, json!({"ok": true}));

        let response = route().post(&backend, &json!({"a": 1})).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(backend.call_paths(), vec!["/primary", "/secondary"]);
        let calls = backend.calls();
        assert_eq!(calls[0].body, calls[1].body);
    }

    #[tokio::test]
    async fn test_all_not_found_returns_last_404() {
        let backend = InMemoryBackend::new();

        let response = route().post(&backend, &json!({})).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_final() {
        let backend = InMemoryBackend::new();
        backend.respond("/primary", 500, json!({"error": "boom"}));
        backend.respond("/secondary", 200, json!({}));

        let response = route().post(&backend, &json!({})).await.unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(backend.call_paths(), vec!["/primary"]);
    }

    #[tokio::test]
    async fn test_no_response_falls_back_but_timeout_does_not() {
        let backend = InMemoryBackend::new();
        backend.fail("/primary", TransportError::NoResponse("refused".into()));
        backend.respond("/secondary", 200, json!({}));
        assert_eq!(route().post(&backend, &json!({})).await.unwrap().status, 200);

        let backend = InMemoryBackend::new();
        backend.fail("/primary", TransportError::Timeout("30s".into()));
        let result = route().post(&backend, &json!({})).await;
        assert!(matches!(
            result,
            Err(CheckoutError::Transport(TransportError::Timeout(_)))
        ));
        assert_eq!(backend.calls().len(), 1);
    }
}
