use crate::config::{SDK_LOAD_TIMEOUT, SDK_POLL_INTERVAL};
use crate::domain::ports::SharedScriptHost;
use crate::error::{CheckoutError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

/// Load state of the gateway SDK for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    NotLoaded,
    Loaded,
    /// Terminal: the session must be reloaded to try again.
    Failed(String),
}

/// Makes sure the gateway SDK is available before any payment attempt.
///
/// Loads the SDK at most once per instance. Concurrent `ensure_loaded` calls
/// queue behind a single load and all observe its outcome, so only one script
/// tag is ever inserted. The current state is published as a `watch` signal.
pub struct GatewayReadiness {
    host: SharedScriptHost,
    src: String,
    poll_interval: Duration,
    load_timeout: Duration,
    status: watch::Sender<Readiness>,
    load_gate: Mutex<()>,
    inserted: AtomicBool,
}

impl GatewayReadiness {
    pub fn new(host: SharedScriptHost, src: impl Into<String>) -> Self {
        let (status, _) = watch::channel(Readiness::NotLoaded);
        Self {
            host,
            src: src.into(),
            poll_interval: SDK_POLL_INTERVAL,
            load_timeout: SDK_LOAD_TIMEOUT,
            status,
            load_gate: Mutex::new(()),
            inserted: AtomicBool::new(false),
        }
    }

    /// Overrides the polling cadence used when a foreign script tag is found.
    pub fn with_timing(mut self, poll_interval: Duration, load_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.load_timeout = load_timeout;
        self
    }

    pub fn status(&self) -> Readiness {
        self.status.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        *self.status.borrow() == Readiness::Loaded
    }

    pub fn subscribe(&self) -> watch::Receiver<Readiness> {
        self.status.subscribe()
    }

    /// Fails unless the SDK is loaded. Never triggers a load.
    pub fn check(&self) -> Result<()> {
        match self.status() {
            Readiness::Loaded => Ok(()),
            Readiness::NotLoaded => Err(CheckoutError::GatewayNotReady),
            Readiness::Failed(reason) => Err(CheckoutError::GatewayLoadFailed(reason)),
        }
    }

    fn settled(&self) -> Option<Result<()>> {
        match self.status() {
            Readiness::NotLoaded => None,
            Readiness::Loaded => Some(Ok(())),
            Readiness::Failed(reason) => Some(Err(CheckoutError::GatewayLoadFailed(reason))),
        }
    }

    #[tracing::instrument(skip(self), fields(src = %self.src))]
    pub async fn ensure_loaded(&self) -> Result<()> {
        if let Some(outcome) = self.settled() {
            return outcome;
        }

        let _gate = self.load_gate.lock().await;
        // Another caller may have finished loading while we waited.
        if let Some(outcome) = self.settled() {
            return outcome;
        }

        match self.load().await {
            Ok(()) => {
                info!("gateway SDK ready");
                self.status.send_replace(Readiness::Loaded);
                Ok(())
            }
            Err(reason) => {
                warn!(%reason, "gateway SDK failed to load");
                self.status.send_replace(Readiness::Failed(reason.clone()));
                Err(CheckoutError::GatewayLoadFailed(reason))
            }
        }
    }

    async fn load(&self) -> std::result::Result<(), String> {
        if self.host.sdk_present() {
            return Ok(());
        }

        if self.host.script_present(&self.src) {
            debug!("SDK script tag already present, waiting for it to initialise");
            return self.wait_for_global().await;
        }

        debug!("inserting SDK script tag");
        self.inserted.store(true, Ordering::SeqCst);
        self.host.insert_script(&self.src).await
    }

    async fn wait_for_global(&self) -> std::result::Result<(), String> {
        let poll = async {
            let mut ticker = tokio::time::interval(self.poll_interval);
            loop {
                ticker.tick().await;
                if self.host.sdk_present() {
                    return;
                }
            }
        };

        tokio::time::timeout(self.load_timeout, poll)
            .await
            .map_err(|_| {
                format!(
                    "SDK did not initialise within {}ms",
                    self.load_timeout.as_millis()
                )
            })
    }

    /// Removes the script tag if, and only if, this loader inserted it.
    pub fn unmount(&self) {
        if self.inserted.swap(false, Ordering::SeqCst) {
            debug!(src = %self.src, "removing SDK script tag");
            self.host.remove_script(&self.src);
        }
    }
}

impl Drop for GatewayReadiness {
    fn drop(&mut self) {
        self.unmount();
    }
}
