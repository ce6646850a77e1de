#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Sequence sender for validium rollups backed by a Nubit DA network.
//!
//! Authors: Chainbound Developers <dev@chainbound.io>

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use seqs_chainio::validium::ValidiumSequencer;
use seqs_clients::{execution::ExecutionClient, gas_price::RpcGasPriceOracle, nubit::NubitClient};
use seqs_config::Opts;
use seqs_da::{DaBatcher, DaBatcherConfig, Namespace};
use seqs_primitives::shutdown::run_until_shutdown;
use seqs_sender::{
    SendTrigger, SequenceSender, SequenceSenderConfig, SyntheticBatchSource, spawn_stdin_trigger,
};
use seqs_txmgr::{GasPriceProvider, GasPricer, MonitoredTxStore, TxManager, TxManagerConfig};

mod allocator;
use allocator::{Allocator, new_allocator};

#[global_allocator]
static ALLOC: Allocator = new_allocator();

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        // Try from custom env file, and abort if it fails
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try from default .env file, and ignore if it fails. It might
        // be that the user isn't using it.
        dotenvy::dotenv().ok();
    }

    let opts = Opts::parse();

    let log_provider = opts.telemetry.setup(&opts.instance_name)?;

    info!("👨‍🚀 Sequence sender starting...");

    let l1 = ExecutionClient::new(opts.l1.el_url.clone(), opts.operator.private_key.clone()).await?;
    info!(chain_id = l1.chain_id(), sequencer = %l1.address(), "Connected to L1");

    // The L1 node is always a gas price source, next to the configured oracles.
    let mut providers: Vec<Arc<dyn GasPriceProvider>> = vec![Arc::new(l1.clone())];
    for url in &opts.l1.gas_price_urls {
        providers.push(Arc::new(RpcGasPriceOracle::new(url.clone())));
    }
    let gas_pricer =
        GasPricer::new(providers, opts.txmgr.gas_price_margin_factor, opts.txmgr.max_gas_price);

    let from = l1.address();
    let txmgr = TxManager::new(
        l1,
        gas_pricer,
        MonitoredTxStore::new(),
        TxManagerConfig {
            monitor_interval: opts.txmgr.monitor_interval(),
            wait_tx_mined_timeout: opts.txmgr.wait_tx_mined_timeout(),
            forced_gas: opts.txmgr.forced_gas,
            pending_poll_interval: opts.txmgr.pending_poll_interval(),
        },
    );
    let monitor = txmgr.start();

    let da = NubitClient::new(
        opts.da.rpc_url.clone(),
        opts.da.auth_token.as_deref(),
        opts.da.request_timeout(),
    )?;
    let batcher = DaBatcher::new(
        da,
        Namespace::from_name(&opts.da.namespace)?,
        opts.operator.da_signer(),
        DaBatcherConfig {
            max_blob_size: opts.da.max_blob_size,
            proof_max_retries: opts.da.proof_max_retries,
            proof_wait_period: opts.da.proof_wait_period(),
            min_commit_interval: opts.da.min_commit_interval(),
        },
    );

    let trigger = SendTrigger::new();
    let _stdin = spawn_stdin_trigger(trigger.clone());
    info!("Type `s` and press enter to send the next batches");

    let sender = SequenceSender::new(
        batcher,
        txmgr.clone(),
        ValidiumSequencer::new(opts.l1.validium_address, opts.l1.fork, opts.sender.l2_coinbase),
        Box::new(SyntheticBatchSource::new(opts.sender.max_batch_bytes)),
        trigger,
        SequenceSenderConfig {
            from,
            gas_offset: opts.sender.gas_offset,
            max_batches_per_l1_tx: opts.sender.max_batches_per_l1_tx,
            wait_period: opts.sender.wait_period(),
            idle_interval: opts.sender.idle_interval(),
        },
    );

    let on_shutdown = || {
        info!("👋 Sequence sender shutting down...");
        txmgr.stop();
    };

    let res = run_until_shutdown(
        async {
            sender.run().await;
            Ok::<_, eyre::Report>(())
        },
        on_shutdown,
    )
    .await;

    // Let an in-flight monitoring tick finish before the runtime goes away.
    if let Err(err) = monitor.await {
        error!(%err, "Monitored tx manager task failed");
    }
    log_provider.shutdown();

    res
}
