//! Billing shell entry point.
//!
//! Runs one initialization against the native fallback session and prints the
//! resulting catalog as JSON lines.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use billing_shell::{ShellConfig, session};

    billing_observability::init();

    let config = ShellConfig::from_env()?;
    tracing::info!(
        products = config.products.len(),
        enable_cache = config.enable_cache,
        "starting billing shell"
    );

    let client = session::fallback_client(&config)?;
    let outcome = client
        .init(config.init_options(), session::logging_callbacks())
        .await?;
    tracing::info!(?outcome, "initialization finished");

    for product in client.products() {
        println!("{}", serde_json::to_string(&product)?);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
