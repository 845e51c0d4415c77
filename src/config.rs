use crate::domain::payment::WidgetTheme;
use std::time::Duration;

/// Backend port used when the storefront runs on a developer machine.
pub const LOCAL_BACKEND_PORT: u16 = 5000;
/// Backend port on the storefront's own host.
pub const BACKEND_PORT: u16 = 5000;

pub const CREATE_ORDER_PATHS: &[&str] = &[
    "/payment/create-razorpay-order",
    "/api/payment/create-razorpay-order",
];
pub const VERIFY_PAYMENT_PATHS: &[&str] =
    &["/payment/razorpay-callback", "/api/payment/razorpay-callback"];

pub const SDK_SCRIPT_SRC: &str = "https://checkout.razorpay.com/v1/checkout.js";
pub const SDK_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const SDK_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// The only currency this checkout flow supports.
pub const CURRENCY: &str = "INR";
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);
pub const STOREFRONT_HOME: &str = "/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Picks the merchant backend for the host the storefront is served from.
pub fn resolve_base_url(hostname: &str) -> String {
    match hostname {
        "localhost" | "127.0.0.1" => format!("http://localhost:{LOCAL_BACKEND_PORT}"),
        other => format!("http://{other}:{BACKEND_PORT}"),
    }
}

/// Settings shared by every stage of the checkout flow.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub sdk_src: String,
    pub merchant_name: String,
    pub theme_color: String,
    /// Used when the backend's order response leaves out `razorpayKey`.
    pub fallback_key: Option<String>,
    pub home_route: String,
}

impl CheckoutConfig {
    pub fn for_host(hostname: &str) -> Self {
        Self {
            base_url: resolve_base_url(hostname),
            ..Self::default()
        }
    }

    pub fn theme(&self) -> WidgetTheme {
        WidgetTheme {
            color: self.theme_color.clone(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: resolve_base_url("localhost"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sdk_src: SDK_SCRIPT_SRC.to_string(),
            merchant_name: "Storefront".to_string(),
            theme_color: "#3399cc".to_string(),
            fallback_key: None,
            home_route: STOREFRONT_HOME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_hosts_use_local_port() {
        assert_eq!(resolve_base_url("localhost"), "http://localhost:5000");
        assert_eq!(resolve_base_url("127.0.0.1"), "http://localhost:5000");
    }

    #[test]
    fn test_remote_host_keeps_hostname() {
        assert_eq!(
            resolve_base_url("shop.example.com"),
            "http://shop.example.com:5000"
        );
        assert_eq!(
            CheckoutConfig::for_host("10.0.0.7").base_url,
            "http://10.0.0.7:5000"
        );
    }

    #[test]
    fn test_primary_path_comes_first() {
        assert_eq!(CREATE_ORDER_PATHS[0], "/payment/create-razorpay-order");
        assert_eq!(VERIFY_PAYMENT_PATHS[1], "/api/payment/razorpay-callback");
    }
}
