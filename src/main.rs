use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use razorpay_checkout::application::flow::FlowStateTracker;
use razorpay_checkout::application::order_intent::OrderIntentCreator;
use razorpay_checkout::application::readiness::GatewayReadiness;
use razorpay_checkout::application::verifier::CallbackVerifier;
use razorpay_checkout::config::{CheckoutConfig, REDIRECT_DELAY, resolve_base_url};
use razorpay_checkout::domain::attempt::FlowState;
use razorpay_checkout::domain::money::{Amount, OrderId};
use razorpay_checkout::domain::payment::PaymentProof;
use razorpay_checkout::infrastructure::http::HttpBackend;
use razorpay_checkout::interfaces::console::{ConsoleGateway, LogNavigator, TerminalHost};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Merchant backend base URL. Takes precedence over --host.
    #[arg(long, env = "CHECKOUT_BASE_URL")]
    base_url: Option<String>,

    /// Hostname the storefront is served from; selects the backend address.
    #[arg(long, env = "CHECKOUT_HOST", default_value = "localhost")]
    host: String,

    /// Per-request timeout for backend calls, in seconds.
    #[arg(long, env = "CHECKOUT_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Merchant name shown in the checkout.
    #[arg(long, env = "CHECKOUT_MERCHANT_NAME", default_value = "Storefront")]
    merchant_name: String,

    #[arg(long, env = "CHECKOUT_THEME_COLOR", default_value = "#3399cc")]
    theme_color: String,

    /// Gateway key to use when the backend does not return one.
    #[arg(long, env = "CHECKOUT_GATEWAY_KEY")]
    gateway_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct OrderArgs {
    /// Merchant order id
    #[arg(long)]
    order_id: u64,

    /// Amount in major currency units (e.g. 199.50)
    #[arg(long)]
    amount: Decimal,
}

#[derive(Subcommand)]
enum Command {
    /// Mint a gateway order for a merchant order.
    CreateOrder(OrderArgs),
    /// Ask the backend to verify a gateway payment response.
    Verify {
        #[command(flatten)]
        order: OrderArgs,
        #[arg(long)]
        gateway_order_id: String,
        #[arg(long)]
        payment_id: String,
        #[arg(long)]
        signature: String,
    },
    /// Run the full checkout with a terminal widget.
    Pay(OrderArgs),
}

impl Cli {
    fn config(&self) -> CheckoutConfig {
        CheckoutConfig {
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| resolve_base_url(&self.host)),
            request_timeout: Duration::from_secs(self.timeout_secs),
            merchant_name: self.merchant_name.clone(),
            theme_color: self.theme_color.clone(),
            fallback_key: self.gateway_key.clone(),
            ..CheckoutConfig::default()
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let backend = Arc::new(HttpBackend::new(&config).into_diagnostic()?);

    match cli.command {
        Command::CreateOrder(args) => {
            let creator = OrderIntentCreator::new(backend, &config);
            let intent = creator
                .create_order_intent(args.order_id, args.amount)
                .await
                .into_diagnostic()?;
            print_json(&intent)?;
        }
        Command::Verify {
            order,
            gateway_order_id,
            payment_id,
            signature,
        } => {
            let order_id = OrderId::new(order.order_id).into_diagnostic()?;
            let amount = Amount::new(order.amount).into_diagnostic()?;
            let proof = PaymentProof {
                razorpay_order_id: gateway_order_id,
                razorpay_payment_id: payment_id,
                razorpay_signature: signature,
            };
            let verification = CallbackVerifier::new(backend)
                .verify(&proof, order_id, amount)
                .await
                .into_diagnostic()?;
            print_json(&verification)?;
        }
        Command::Pay(args) => {
            let readiness = Arc::new(GatewayReadiness::new(
                Arc::new(TerminalHost),
                config.sdk_src.clone(),
            ));
            readiness.ensure_loaded().await.into_diagnostic()?;

            let tracker = FlowStateTracker::new(
                config,
                backend,
                readiness,
                Arc::new(ConsoleGateway),
                Arc::new(LogNavigator),
            );
            let attempt = tracker.start_payment(args.order_id, args.amount).await;
            print_json(&attempt)?;

            if attempt.state != FlowState::Succeeded {
                return Err(miette!(
                    "{}",
                    attempt
                        .error_message
                        .unwrap_or_else(|| format!("payment ended in state {}", attempt.state))
                ));
            }
            // Give the scheduled redirect a chance to run before exiting.
            tokio::time::sleep(REDIRECT_DELAY + Duration::from_millis(50)).await;
        }
    }

    Ok(())
}
