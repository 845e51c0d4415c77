use crate::domain::payment::{PaymentProof, WidgetOptions};
use crate::domain::ports::{
    BackendTransport, CheckoutGateway, HttpResponse, Navigator, ScriptHost, WidgetHooks,
};
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

type Reply = Result<HttpResponse, TransportError>;

/// A request seen by `InMemoryBackend`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub path: String,
    pub body: serde_json::Value,
}

/// A scripted merchant backend.
///
/// Replies are queued per path; the last queued reply for a path repeats.
/// Paths with nothing queued answer 404, like a backend without that route.
/// Every request is recorded.
#[derive(Default, Clone)]
pub struct InMemoryBackend {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.respond_raw(path, status, &body.to_string())
    }

    pub fn respond_raw(&self, path: &str, status: u16, body: &str) -> &Self {
        self.enqueue(path, Ok(HttpResponse::new(status, body)))
    }

    pub fn fail(&self, path: &str, error: TransportError) -> &Self {
        self.enqueue(path, Err(error))
    }

    fn enqueue(&self, path: &str, reply: Reply) -> &Self {
        lock(&self.replies)
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_paths(&self) -> Vec<String> {
        lock(&self.calls).iter().map(|call| call.path.clone()).collect()
    }
}

#[async_trait]
impl BackendTransport for InMemoryBackend {
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Reply {
        lock(&self.calls).push(RecordedCall {
            path: path.to_string(),
            body: body.clone(),
        });

        let mut replies = lock(&self.replies);
        let Some(queue) = replies.get_mut(path) else {
            return Ok(HttpResponse::new(404, format!("Cannot POST {path}")));
        };
        // The last queued reply repeats for every later call.
        if queue.len() > 1 {
            if let Some(reply) = queue.pop_front() {
                return reply;
            }
        }
        match queue.front() {
            Some(reply) => reply.clone(),
            None => Ok(HttpResponse::new(404, format!("Cannot POST {path}"))),
        }
    }
}

/// What happens when `InMemoryScriptHost` is asked to insert the SDK script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadBehavior {
    Load,
    LoadAfter(Duration),
    Fail(String),
}

#[derive(Debug)]
struct HostState {
    sdk: AtomicBool,
    tags: Mutex<Vec<String>>,
    insertions: AtomicUsize,
    behavior: Mutex<LoadBehavior>,
}

/// A document with script tags and an SDK global.
#[derive(Debug, Clone)]
pub struct InMemoryScriptHost {
    state: Arc<HostState>,
}

impl Default for InMemoryScriptHost {
    fn default() -> Self {
        Self {
            state: Arc::new(HostState {
                sdk: AtomicBool::new(false),
                tags: Mutex::new(Vec::new()),
                insertions: AtomicUsize::new(0),
                behavior: Mutex::new(LoadBehavior::Load),
            }),
        }
    }
}

impl InMemoryScriptHost {
    /// Empty document; inserted scripts load successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// The SDK global is already registered.
    pub fn with_sdk() -> Self {
        let host = Self::default();
        host.set_sdk_present(true);
        host
    }

    /// Someone else already added the SDK tag, but it has not initialised yet.
    pub fn with_pending_tag(src: &str) -> Self {
        let host = Self::default();
        lock(&host.state.tags).push(src.to_string());
        host
    }

    pub fn set_sdk_present(&self, present: bool) {
        self.state.sdk.store(present, Ordering::SeqCst);
    }

    pub fn set_load_behavior(&self, behavior: LoadBehavior) {
        *lock(&self.state.behavior) = behavior;
    }

    pub fn insertions(&self) -> usize {
        self.state.insertions.load(Ordering::SeqCst)
    }

    pub fn tags(&self) -> Vec<String> {
        lock(&self.state.tags).clone()
    }
}

#[async_trait]
impl ScriptHost for InMemoryScriptHost {
    fn sdk_present(&self) -> bool {
        self.state.sdk.load(Ordering::SeqCst)
    }

    fn script_present(&self, src: &str) -> bool {
        lock(&self.state.tags).iter().any(|tag| tag == src)
    }

    async fn insert_script(&self, src: &str) -> Result<(), String> {
        self.state.insertions.fetch_add(1, Ordering::SeqCst);
        lock(&self.state.tags).push(src.to_string());

        let behavior = lock(&self.state.behavior).clone();
        match behavior {
            LoadBehavior::Load => tokio::task::yield_now().await,
            LoadBehavior::LoadAfter(delay) => tokio::time::sleep(delay).await,
            LoadBehavior::Fail(reason) => return Err(reason),
        }
        self.set_sdk_present(true);
        Ok(())
    }

    fn remove_script(&self, src: &str) {
        lock(&self.state.tags).retain(|tag| tag != src);
    }
}

/// How `ScriptedGateway` reacts when the checkout is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayBehavior {
    Pay(PaymentProof),
    Dismiss,
    /// Keep the hooks until the test fires `complete` or `dismiss`.
    Hold,
    /// Drop the hooks without firing either handler.
    Abandon,
    /// The constructor throws.
    Refuse(String),
}

/// A gateway SDK whose checkout outcome is decided up front.
#[derive(Clone)]
pub struct ScriptedGateway {
    behavior: GatewayBehavior,
    opened: Arc<Mutex<Vec<WidgetOptions>>>,
    held: Arc<Mutex<Option<WidgetHooks>>>,
    opened_signal: Arc<Notify>,
}

impl ScriptedGateway {
    pub fn new(behavior: GatewayBehavior) -> Self {
        Self {
            behavior,
            opened: Arc::default(),
            held: Arc::default(),
            opened_signal: Arc::new(Notify::new()),
        }
    }

    pub fn paying(proof: PaymentProof) -> Self {
        Self::new(GatewayBehavior::Pay(proof))
    }

    pub fn dismissing() -> Self {
        Self::new(GatewayBehavior::Dismiss)
    }

    pub fn holding() -> Self {
        Self::new(GatewayBehavior::Hold)
    }

    pub fn abandoning() -> Self {
        Self::new(GatewayBehavior::Abandon)
    }

    pub fn refusing(reason: &str) -> Self {
        Self::new(GatewayBehavior::Refuse(reason.to_string()))
    }

    pub fn opened(&self) -> Vec<WidgetOptions> {
        lock(&self.opened).clone()
    }

    /// Waits until a checkout has been opened.
    pub async fn wait_until_open(&self) {
        self.opened_signal.notified().await;
    }

    /// Fires the success handler of a held checkout.
    pub fn complete(&self, proof: PaymentProof) -> bool {
        match lock(&self.held).take() {
            Some(hooks) => {
                hooks.handler(proof);
                true
            }
            None => false,
        }
    }

    /// Fires the dismissal handler of a held checkout.
    pub fn dismiss(&self) -> bool {
        match lock(&self.held).take() {
            Some(hooks) => {
                hooks.on_dismiss();
                true
            }
            None => false,
        }
    }
}

impl CheckoutGateway for ScriptedGateway {
    fn open(&self, options: WidgetOptions, hooks: WidgetHooks) -> Result<(), String> {
        if let GatewayBehavior::Refuse(reason) = &self.behavior {
            return Err(reason.clone());
        }

        lock(&self.opened).push(options);
        match &self.behavior {
            GatewayBehavior::Pay(proof) => hooks.handler(proof.clone()),
            GatewayBehavior::Dismiss => hooks.on_dismiss(),
            GatewayBehavior::Hold => *lock(&self.held) = Some(hooks),
            GatewayBehavior::Abandon | GatewayBehavior::Refuse(_) => drop(hooks),
        }
        self.opened_signal.notify_one();
        Ok(())
    }
}

/// Records every navigation request.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        lock(&self.routes).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        lock(&self.routes).push(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_backend_repeats_last_reply() {
        let backend = InMemoryBackend::new();
        backend
            .respond("/a", 500, json!({}))
            .respond("/a", 200, json!({"ok": true}));

        assert_eq!(backend.post_json("/a", &json!({})).await.unwrap().status, 500);
        assert_eq!(backend.post_json("/a", &json!({})).await.unwrap().status, 200);
        assert_eq!(backend.post_json("/a", &json!({})).await.unwrap().status, 200);
        assert_eq!(backend.post_json("/b", &json!({})).await.unwrap().status, 404);
        assert_eq!(backend.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_script_host_failure_leaves_sdk_absent() {
        let host = InMemoryScriptHost::new();
        host.set_load_behavior(LoadBehavior::Fail("blocked".to_string()));

        assert_eq!(host.insert_script("sdk.js").await, Err("blocked".to_string()));
        assert!(!host.sdk_present());
        assert!(host.script_present("sdk.js"));
    }
}
