//! Checkout completion after the payment processor redirects back.

use clap::Subcommand;
use tradefood_cart::{CheckoutCompletion, CheckoutResult, PaymentOutcome};
use tradefood_core::AppConfig;

/// Sub-commands available under `checkout`.
#[derive(Debug, Subcommand)]
pub enum CheckoutCommands {
    /// Record a payment confirmation; clears the cart once it succeeded
    Confirm {
        /// Payment identifier from the processor
        #[arg(long)]
        payment_id: String,
        /// Redirect status reported by the processor
        #[arg(long, default_value = "succeeded")]
        redirect_status: String,
    },
}

pub(crate) async fn run_checkout(config: &AppConfig, command: CheckoutCommands) -> anyhow::Result<()> {
    let CheckoutCommands::Confirm {
        payment_id,
        redirect_status,
    } = command;

    let record_path = config.data_dir.join("payments.json");
    let mut record = CheckoutCompletion::load(&record_path);
    let mut cart = crate::open_cart(config).await?;

    let outcome = PaymentOutcome::from_redirect(&payment_id, &redirect_status);
    match record.confirm(&mut cart, outcome).await {
        CheckoutResult::Completed => {
            record.save(&record_path)?;
            println!("payment {payment_id} confirmed; cart cleared");
        }
        CheckoutResult::AlreadyCompleted => {
            println!("payment {payment_id} was already confirmed; nothing to do");
        }
        CheckoutResult::Pending => {
            println!("payment {payment_id} is still processing; cart kept");
        }
        CheckoutResult::Failed { reason } => {
            anyhow::bail!("payment {payment_id} failed ({reason}); cart kept");
        }
    }
    Ok(())
}
