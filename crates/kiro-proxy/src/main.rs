//! `kiro-proxy` binary entrypoint.

use clap::Parser;
use kiro_proxy::commands::{Cli, Commands};
use kiro_proxy::{
    ui, ConfigStore, InitWizard, InstallFlow, InstallRequest, ProcessServer, Prompter,
    ProxyPaths, Result, ServeOutcome, StartFlow, StatusFlow,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Respect `RUST_LOG`; otherwise keep the CLI output free of log lines.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let result = match ProxyPaths::from_env() {
        Ok(paths) => run(cli.command, paths).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        let _ = ui::error(&mut io::stderr(), &err);
        std::process::exit(1);
    }
}

async fn run(command: Commands, paths: ProxyPaths) -> Result<()> {
    let mut out = io::stdout();

    match command {
        Commands::Install {
            credentials_file,
            ide,
            api_key,
        } => run_install(&mut out, &paths, credentials_file, ide, api_key),
        Commands::Start { port } => run_start(&mut out, &paths, port).await,
        Commands::Init => run_init(&paths).await,
        Commands::Status => run_status(&mut out, &paths),
    }
}

fn run_install(
    out: &mut impl Write,
    paths: &ProxyPaths,
    credentials_file: Option<PathBuf>,
    ide: bool,
    api_key: Option<String>,
) -> Result<()> {
    let _ = ui::banner(out, "Kiro Proxy");

    let flow = InstallFlow::new(paths);
    let outcome = flow.install(InstallRequest {
        credentials_file,
        ide,
        api_key,
    })?;

    let _ = ui::install_summary(out, &outcome, flow.store().path());
    Ok(())
}

async fn run_start(out: &mut impl Write, paths: &ProxyPaths, port: Option<u16>) -> Result<()> {
    let flow = StartFlow::new(ConfigStore::from_paths(paths), ProcessServer::from_env());
    let handoff = flow.prepare(port)?;

    let _ = ui::banner(out, "Kiro Proxy");
    let _ = ui::connection_info(out, &handoff);
    let _ = out.flush();

    match flow.launch(&handoff).await? {
        ServeOutcome::Interrupted => {
            let _ = ui::stopped(out);
        }
        ServeOutcome::Exited => {}
    }
    Ok(())
}

async fn run_init(paths: &ProxyPaths) -> Result<()> {
    let outcome = {
        let prompter = Prompter::new(io::stdin().lock(), io::stdout());
        InitWizard::new(paths.clone(), prompter).run()?
    };

    if outcome.start_now {
        let mut out = io::stdout();
        writeln!(out).ok();
        run_start(&mut out, paths, Some(outcome.port)).await?;
    }
    Ok(())
}

fn run_status(out: &mut impl Write, paths: &ProxyPaths) -> Result<()> {
    let _ = ui::banner(out, "Kiro Proxy");
    let report = StatusFlow::new(ConfigStore::from_paths(paths)).report();
    let _ = ui::status_report(out, &report);
    Ok(())
}
