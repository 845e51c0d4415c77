use crate::domain::payment::{PaymentProof, WidgetOptions};
use crate::domain::ports::{CheckoutGateway, Navigator, ScriptHost, WidgetHooks};
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use tracing::info;

/// A terminal stand-in for the hosted checkout.
///
/// Prints the widget options, then reads one JSON payment proof from stdin.
/// An empty line, `cancel`, or end of input dismisses the checkout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleGateway;

impl ConsoleGateway {
    fn prompt(options: &WidgetOptions) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "checkout opened:")?;
        writeln!(
            stderr,
            "{}",
            serde_json::to_string_pretty(options).map_err(io::Error::other)?
        )?;
        writeln!(
            stderr,
            "paste the gateway response JSON (razorpay_order_id, razorpay_payment_id, razorpay_signature), or 'cancel':"
        )
    }

    fn read_outcome(hooks: WidgetHooks) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() || line.eq_ignore_ascii_case("cancel") {
                break;
            }
            match serde_json::from_str::<PaymentProof>(line) {
                Ok(proof) => {
                    hooks.handler(proof);
                    return;
                }
                Err(e) => eprintln!("not a payment response ({e}), try again or type 'cancel'"),
            }
        }
        hooks.on_dismiss();
    }
}

impl CheckoutGateway for ConsoleGateway {
    fn open(&self, options: WidgetOptions, hooks: WidgetHooks) -> Result<(), String> {
        Self::prompt(&options).map_err(|e| e.to_string())?;
        std::thread::spawn(move || Self::read_outcome(hooks));
        Ok(())
    }
}

/// A terminal has no document to load scripts into; the SDK is always there.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalHost;

#[async_trait]
impl ScriptHost for TerminalHost {
    fn sdk_present(&self) -> bool {
        true
    }

    fn script_present(&self, _src: &str) -> bool {
        false
    }

    async fn insert_script(&self, _src: &str) -> Result<(), String> {
        Ok(())
    }

    fn remove_script(&self, _src: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        info!(%route, "redirecting to storefront");
    }
}
