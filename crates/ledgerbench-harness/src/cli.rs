use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ledgerbench_core::TxKind;
use ledgerbench_runtime::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "ledgerbench", version, about = "Ledger gateway load generator")]
pub struct Cli {
    /// Log level, used when RUST_LOG is unset
    #[arg(long, global = true, env = "LEDGERBENCH_LOG", default_value = "info")]
    pub log: String,

    /// TOML file overriding or extending the built-in organization profiles
    #[arg(long, global = true, env = "LEDGERBENCH_PROFILES")]
    pub profiles_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a batch of transactions and report throughput
    Run(RunArgs),
    /// List the known organization profiles
    Profiles,
    /// Print a random alphanumeric payload
    Payload {
        /// Payload length in characters
        #[arg(long, default_value_t = 5120)]
        size: usize,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Organization profile to connect as
    #[arg(long, env = "LEDGERBENCH_ORG", default_value = "manufacturer")]
    pub org: String,

    #[arg(long, env = "LEDGERBENCH_CHANNEL", default_value = "autochannel")]
    pub channel: String,

    #[arg(long, env = "LEDGERBENCH_CHAINCODE", default_value = "KBA-Automobile")]
    pub chaincode: String,

    /// Contract name inside the chaincode; empty for the default contract
    #[arg(long, env = "LEDGERBENCH_CONTRACT", default_value = "CarContract")]
    pub contract: String,

    /// Transaction function to call
    #[arg(long = "txn", env = "LEDGERBENCH_TXN", default_value = "CreateCar")]
    pub transaction: String,

    /// invoke, query or private
    #[arg(long, env = "LEDGERBENCH_KIND", default_value = "invoke")]
    pub kind: TxKind,

    /// Transaction argument; `{key}` and `{payload}` are substituted per job
    #[arg(
        long = "arg",
        default_values_t = [
            "{key}".to_string(),
            "Tata".to_string(),
            "Harrier".to_string(),
            "Black".to_string(),
            "fac01".to_string(),
            "25/10/2024".to_string(),
        ]
    )]
    pub args: Vec<String>,

    /// Transient data entry for private transactions
    #[arg(long = "transient", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub transient: Vec<(String, String)>,

    #[arg(long, env = "LEDGERBENCH_KEY_PREFIX", default_value = "Car")]
    pub key_prefix: String,

    /// Length of the random `{payload}` argument
    #[arg(long, env = "LEDGERBENCH_PAYLOAD_SIZE", default_value_t = 0)]
    pub payload_size: usize,

    #[arg(long, env = "LEDGERBENCH_JOBS", default_value_t = 500)]
    pub jobs: u64,

    #[arg(long, env = "LEDGERBENCH_WORKERS", default_value_t = 100)]
    pub workers: usize,

    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub evaluate_timeout: u64,

    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub endorse_timeout: u64,

    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub submit_timeout: u64,

    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub commit_timeout: u64,

    /// Where the summary is written
    #[arg(long, env = "LEDGERBENCH_REPORT", default_value = "results.txt")]
    pub report: PathBuf,

    /// text or json
    #[arg(long, default_value = "text")]
    pub report_format: ReportFormat,

    /// Skip writing the report file
    #[arg(long)]
    pub no_report: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}
