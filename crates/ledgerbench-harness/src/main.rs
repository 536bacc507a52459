mod cli;
mod profiles;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Parser;
use cli::{Cli, Command, RunArgs};
use ledgerbench_core::{ConnectError, ConnectOptions, ContractTarget, ProfileTable, Timeouts};
use ledgerbench_gateway::{load_identity, EcdsaSigner, GrpcGateway};
use ledgerbench_runtime::{
    random_payload, render, BatchDriver, BatchError, BatchPlan, JobTemplate, ReportTarget,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let profiles = profiles::load(cli.profiles_file.as_deref())?;

    match cli.command {
        Command::Run(args) => run(args, &profiles).await,
        Command::Profiles => {
            for (name, profile) in profiles.iter() {
                println!(
                    "{name:<22} {:<16} {:<18} {}",
                    profile.msp_id, profile.peer_endpoint, profile.gateway_peer
                );
            }
            Ok(())
        }
        Command::Payload { size } => {
            println!("{}", random_payload(size));
            Ok(())
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves the organization's profile and credentials into everything a
/// gateway needs to connect.
fn connect_options(
    args: &RunArgs,
    profiles: &ProfileTable,
) -> Result<ConnectOptions, ConnectError> {
    let profile = profiles.lookup(&args.org)?;
    let identity = load_identity(&profile.msp_id, &profile.cert_path)?;
    let signer = EcdsaSigner::load(&profile.key_path)?;

    Ok(ConnectOptions {
        identity,
        signer: Arc::new(signer),
        endpoint: profile.endpoint(),
        timeouts: Timeouts {
            evaluate: Duration::from_secs(args.evaluate_timeout),
            endorse: Duration::from_secs(args.endorse_timeout),
            submit: Duration::from_secs(args.submit_timeout),
            commit_status: Duration::from_secs(args.commit_timeout),
        },
        target: ContractTarget {
            channel: args.channel.clone(),
            chaincode: args.chaincode.clone(),
            contract: args.contract.clone(),
        },
    })
}

async fn run(args: RunArgs, profiles: &ProfileTable) -> Result<()> {
    let options = connect_options(&args, profiles)
        .with_context(|| format!("preparing connection for {}", args.org))?;

    let template = JobTemplate::new(args.transaction, args.args)
        .with_kind(args.kind)
        .with_key_prefix(args.key_prefix)
        .with_payload_size(args.payload_size)
        .with_transient(
            args.transient
                .into_iter()
                .map(|(key, value)| (key, Bytes::from(value)))
                .collect(),
        );
    let report = (!args.no_report).then(|| ReportTarget {
        path: args.report,
        format: args.report_format,
    });
    let plan = BatchPlan {
        template,
        total_jobs: args.jobs,
        workers: args.workers,
        report,
    };

    let mut driver = BatchDriver::new(GrpcGateway::new(), plan);
    let result = match driver.run(options).await {
        Ok(result) => result,
        Err(BatchError::Report { result, source }) => {
            print!("{}", render(&result, args.report_format)?);
            return Err(source).context("batch finished but the report was not written");
        }
        Err(err) => return Err(err).context(format!("batch for {} failed", args.org)),
    };

    print!("{}", render(&result, args.report_format)?);
    Ok(())
}
