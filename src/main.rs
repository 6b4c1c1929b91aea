//! chainpay
//!
//! ```text
//! chainpay [--env dev] --gateway [--port 8080]       market-data proxy
//! chainpay [--env dev] --demo [--chain 1] [--asset USDT|native]
//!                                                    one transfer against the mock wallet
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use chainpay::config::AppConfig;
use chainpay::gateway::{self, state::AppState};
use chainpay::market::CoinGeckoSource;
use chainpay::money;
use chainpay::registry::ChainRegistry;

fn arg_value(name: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == name && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().any(|a| a == name)
}

fn get_env() -> String {
    arg_value("--env")
        .or_else(|| arg_value("-e"))
        .unwrap_or_else(|| "dev".to_string())
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    arg_value("--port").and_then(|p| p.parse().ok())
}

fn log_invoice(registry: &ChainRegistry, recipient: &str) {
    info!(recipient = %recipient, "Invoice recipient");
    for chain in registry.list_chains() {
        for selection in chain.selections() {
            if let Some(spec) = chain.asset(&selection) {
                let units = money::parse_amount(&spec.fixed_amount, spec.decimals).unwrap_or(0);
                info!(
                    chain_id = chain.id,
                    chain = %chain.name,
                    asset = %spec.symbol,
                    amount = %spec.fixed_amount,
                    base_units = %units,
                    "Invoice option"
                );
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config =
        AppConfig::load(&env).with_context(|| format!("loading config for env {}", env))?;
    let _log_guard = chainpay::logging::init_logging(&app_config);

    info!(env = %env, "chainpay starting");

    let registry = Arc::new(app_config.invoice.registry()?);
    log_invoice(&registry, &app_config.invoice.recipient);

    let rt = tokio::runtime::Runtime::new()?;

    if has_flag("--gateway") {
        let port = get_port_override().unwrap_or(app_config.gateway.port);
        let market = &app_config.market;
        let source = CoinGeckoSource::new(
            market.upstream_base_url.clone(),
            Duration::from_millis(market.request_timeout_ms),
            Duration::from_millis(market.request_delay_ms),
        )?;
        let state = Arc::new(AppState::new(Arc::new(source)));
        rt.block_on(gateway::run_server(&app_config.gateway.host, port, state))
            .context("gateway server failed")?;
        return Ok(());
    }

    if has_flag("--demo") {
        return rt.block_on(demo::run(registry, app_config.invoice.recipient.clone()));
    }

    info!("Nothing to do: pass --gateway or --demo");
    Ok(())
}

#[cfg(feature = "mock-wallet")]
mod demo {
    use std::sync::Arc;

    use anyhow::{Context, bail};
    use tracing::info;

    use chainpay::registry::{AssetSelection, ChainRegistry};
    use chainpay::transfer::{StartOutcome, TransferOrchestrator, TransferState};
    use chainpay::wallet::{MockWallet, WalletSessionAdapter};

    /// One transfer from a disconnected mock wallet parked on the last
    /// registered chain, so every step of the FSM runs
    pub async fn run(registry: Arc<ChainRegistry>, recipient: String) -> anyhow::Result<()> {
        let parked_on = registry
            .list_chains()
            .last()
            .map(|c| c.id)
            .context("empty registry")?;
        let wallet = Arc::new(MockWallet::disconnected(parked_on));
        let orchestrator = Arc::new(TransferOrchestrator::new(
            registry,
            WalletSessionAdapter::new(wallet),
            recipient,
        )?);

        if let Some(chain) = super::arg_value("--chain") {
            let chain_id = chain.parse().context("--chain must be a numeric chain id")?;
            orchestrator.select_chain(chain_id)?;
        }
        if let Some(asset) = super::arg_value("--asset") {
            let selection = if asset.eq_ignore_ascii_case("native") {
                AssetSelection::Native
            } else {
                AssetSelection::token(asset.to_uppercase())
            };
            orchestrator.select_asset(selection)?;
        }

        let mut rx = orchestrator.events();
        let observer = tokio::spawn(async move {
            while let Ok(snapshot) = rx.recv().await {
                info!(attempt_id = snapshot.attempt_id, state = %snapshot.state, "[demo] state");
                if snapshot.state.is_terminal() {
                    break;
                }
            }
        });

        info!(
            asset = %orchestrator.display_symbol(),
            amount = %orchestrator.display_amount(),
            to = %orchestrator.short_recipient(),
            "[demo] paying invoice"
        );
        let outcome = orchestrator.start().await;
        let _ = observer.await;

        match outcome {
            StartOutcome::Finished {
                state: TransferState::Succeeded(hash),
                ..
            } => {
                info!(tx_hash = %hash, "[demo] transfer accepted for broadcast");
                Ok(())
            }
            StartOutcome::Finished { state, .. } => bail!("demo transfer ended in {}", state),
            StartOutcome::Ignored { .. } => bail!("demo transfer did not start"),
        }
    }
}

#[cfg(not(feature = "mock-wallet"))]
mod demo {
    use std::sync::Arc;

    use chainpay::registry::ChainRegistry;

    pub async fn run(_registry: Arc<ChainRegistry>, _recipient: String) -> anyhow::Result<()> {
        anyhow::bail!("--demo requires the mock-wallet feature")
    }
}
