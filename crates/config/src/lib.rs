#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Configuration for the seqs sequence sender.

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Color, Style},
    },
};

mod l1;
pub use l1::L1Opts;

mod operator;
pub use operator::OperatorOpts;

mod da;
pub use da::DaOpts;

mod txmgr;
pub use txmgr::TxManagerOpts;

mod sender;
pub use sender::SenderOpts;

mod telemetry;
pub use telemetry::{LogProvider, TelemetryError, TelemetryOpts};

/// CLI options for the seqs sequence sender.
#[derive(Debug, Clone, Parser)]
#[command(author, version, styles = cli_styles(), about)]
pub struct Opts {
    /// A unique name for this instance, used in metrics and logs
    #[clap(long, env = "SEQS_INSTANCE_NAME", default_value = "seqs")]
    pub instance_name: String,
    /// L1-related configuration options
    #[clap(flatten)]
    pub l1: L1Opts,
    /// Operator-related configuration options
    #[clap(flatten)]
    pub operator: OperatorOpts,
    /// DA network configuration options
    #[clap(flatten)]
    pub da: DaOpts,
    /// Monitored transaction manager configuration options
    #[clap(flatten)]
    pub txmgr: TxManagerOpts,
    /// Sequence sender configuration options
    #[clap(flatten)]
    pub sender: SenderOpts,
    /// Telemetry-related configuration options
    #[clap(flatten)]
    pub telemetry: TelemetryOpts,
}

/// Styles for the CLI.
const fn cli_styles() -> Styles {
    Styles::styled()
        .usage(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .header(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .valid(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use seqs_primitives::ForkVersion;

    use super::Opts;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Opts::command().debug_assert()
    }

    #[test]
    fn test_defaults() {
        let opts = Opts::try_parse_from([
            "seqs",
            "--l1.el-url",
            "http://localhost:8545",
            "--l1.validium-address",
            "0x0000000000000000000000000000000000000001",
            "--operator.private-key",
            KEY,
            "--da.rpc-url",
            "http://localhost:26658",
        ])
        .unwrap();

        assert_eq!(opts.instance_name, "seqs");
        assert_eq!(opts.l1.fork, ForkVersion::Elderberry);
        assert!(opts.l1.gas_price_urls.is_empty());
        assert_eq!(opts.da.max_blob_size, 100 * 1024);
        assert_eq!(opts.da.proof_wait_period(), Duration::from_secs(5));
        assert_eq!(opts.txmgr.wait_tx_mined_timeout(), Duration::from_secs(120));
        assert_eq!(opts.sender.max_batches_per_l1_tx, 10);
        assert_eq!(opts.sender.gas_offset, 80_000);
        assert_eq!(opts.operator.da_signer().address(), opts.operator.private_key.address());
    }

    #[test]
    fn test_overrides() {
        let opts = Opts::try_parse_from([
            "seqs",
            "--l1.el-url",
            "http://localhost:8545",
            "--l1.gas-price-urls",
            "http://a:8545,http://b:8545",
            "--l1.validium-address",
            "0x0000000000000000000000000000000000000001",
            "--l1.fork",
            "etrog",
            "--operator.private-key",
            KEY,
            "--da.rpc-url",
            "http://localhost:26658",
            "--txmgr.gas-price-margin-factor",
            "1.25",
            "--telemetry.otlp-header",
            "authorization=Bearer abc",
        ])
        .unwrap();

        assert_eq!(opts.l1.fork, ForkVersion::Etrog);
        assert_eq!(opts.l1.gas_price_urls.len(), 2);
        assert!((opts.txmgr.gas_price_margin_factor - 1.25).abs() < f64::EPSILON);
        assert_eq!(
            opts.telemetry.otlp_headers,
            vec![("authorization".to_owned(), "Bearer abc".to_owned())]
        );
    }
}
