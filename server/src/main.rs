// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Context;
use clap::Parser;
use nimbusbackend::CloudCodeService;
use nimbusserver::{
    ServerRunParams, args::Args, configurations::get_configuration, logging::init_logging, run,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let configuration =
        get_configuration(&args.config_dir).context("Could not load configuration")?;

    // Cloud code is deployment specific; the stock binary starts with empty
    // registries and serves only structured not-found errors.
    let service = CloudCodeService::new();
    warn!("No cloud code registered; all calls will report unknown names");

    let listener = TcpListener::bind(configuration.application.listen)
        .await
        .context("Failed to bind")?;
    info!(listen = %configuration.application.listen, "Starting server");

    run(ServerRunParams { listener, service }).await?;
    Ok(())
}
