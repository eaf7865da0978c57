use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use pivnet_resource::commands::{CheckCommand, InCommand};
use pivnet_resource::concourse::{CheckRequest, InRequest, Source};
use pivnet_resource::config::{API_TOKEN_REDACTION, CHECK_LOG_PREFIX, IN_LOG_PREFIX, log_dir};
use pivnet_resource::logging::{LogSession, Sanitizer};
use pivnet_resource::pivnet::PivnetClient;

#[derive(Parser)]
#[command(name = "pivnet-resource")]
#[command(version, about = "Concourse resource for Pivotal Network releases")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report product versions released since the one in the request
    Check,
    /// Download the product files of the requested version
    In {
        /// Directory the product files are written to
        destination: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command))
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Check => {
            let request: CheckRequest = read_request()?;
            request.source.validate()?;

            let session = start_logging(CHECK_LOG_PREFIX, &request.source)?;
            let client = Arc::new(PivnetClient::new(
                request.source.endpoint(),
                &request.source.api_token,
            )?);

            let response = CheckCommand::new(client.clone(), client, session.path())
                .run(&request)
                .await
                .inspect_err(|e| error!("check failed: {}", e))?;

            write_response(&response)
        }
        Command::In { destination } => {
            let request: InRequest = read_request()?;
            request.source.validate()?;

            let _session = start_logging(IN_LOG_PREFIX, &request.source)?;
            let client = PivnetClient::new(request.source.endpoint(), &request.source.api_token)?;
            let http = client.http().clone();
            let authorization = client.authorization();

            let response = InCommand::new(Arc::new(client), http, &authorization, &destination)
                .run(&request)
                .await
                .inspect_err(|e| error!("in failed: {}", e))?;

            write_response(&response)
        }
    }
}

fn read_request<T: DeserializeOwned>() -> anyhow::Result<T> {
    serde_json::from_reader(io::stdin().lock()).context("Failed to parse request from stdin")
}

fn write_response<T: Serialize>(response: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    Ok(())
}

fn start_logging(prefix: &str, source: &Source) -> anyhow::Result<LogSession> {
    let sanitizer = Sanitizer::new(HashMap::from([(
        source.api_token.clone(),
        API_TOKEN_REDACTION.to_string(),
    )]));

    let session = LogSession::start(prefix, &log_dir(), Arc::new(sanitizer))
        .context("Failed to create log file")?;
    eprintln!("logging to {}", session.path().display());

    Ok(session)
}
