//! Terminal output for the CLI.

use crate::error::{CredentialSourceError, ProxyError};
use crate::install::InstallOutcome;
use crate::start::Handoff;
use crate::status::StatusReport;
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

pub const ADVERTISED_MODELS: &str = "claude-sonnet-4.5, claude-sonnet-4, claude-haiku-4.5";

fn rule() -> String {
    format!("  {}", "─".repeat(45))
}

pub fn banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", format!("👻 {}", title).white().bold())?;
    writeln!(out)
}

pub fn connection_info(out: &mut impl Write, handoff: &Handoff) -> io::Result<()> {
    let base_url = handoff.base_url();

    writeln!(out)?;
    writeln!(out, "  {}", "✅ Kiro Proxy is running!".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out)?;
    writeln!(out, "  {}", "Connection Info:".white().bold())?;
    writeln!(out)?;
    writeln!(out, "    Base URL:  {}", base_url.cyan().bold())?;
    writeln!(out)?;
    writeln!(out, "    API Key:   {}", handoff.api_key.yellow())?;
    writeln!(out)?;
    writeln!(out, "    Models:    {}", ADVERTISED_MODELS.white())?;
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out)?;
    writeln!(out, "  {}", "Example (Python):".white().bold())?;
    writeln!(out)?;
    writeln!(out, "    from openai import OpenAI")?;
    writeln!(
        out,
        "    client = OpenAI(base_url=\"{}\", api_key=\"{}\")",
        base_url, handoff.api_key
    )?;
    writeln!(
        out,
        "    response = client.chat.completions.create(model=\"claude-sonnet-4.5\", ...)"
    )?;
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out)?;
    writeln!(out, "  {}", "Press Ctrl+C to stop".dimmed())?;
    writeln!(out)
}

pub fn stopped(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", "👋 Kiro Proxy stopped.".yellow())
}

pub fn install_summary(
    out: &mut impl Write,
    outcome: &InstallOutcome,
    config_file: &Path,
) -> io::Result<()> {
    if outcome.autodetected {
        writeln!(out, "  🔍 Searching for Kiro IDE credentials...")?;
        writeln!(
            out,
            "  {}",
            format!("✅ Found: {}", outcome.credentials_file.display()).green()
        )?;
    }
    writeln!(out, "  📄 Checking credentials file...")?;
    writeln!(
        out,
        "  {}",
        format!(
            "✅ Valid credentials file: {}",
            outcome.credentials_file.display()
        )
        .green()
    )?;

    if outcome.generated_key {
        generated_key(out, &outcome.api_key)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        format!("✅ Configuration saved to: {}", config_file.display()).green()
    )?;
    writeln!(out)?;
    writeln!(out, "  Now run:")?;
    writeln!(out, "    {}", "kiro-proxy start".cyan().bold())?;
    writeln!(out)
}

pub fn generated_key(out: &mut impl Write, api_key: &str) -> io::Result<()> {
    writeln!(out, "  🔑 Generated API Key: {}", api_key.yellow().bold())
}

pub fn status_report(out: &mut impl Write, report: &StatusReport) -> io::Result<()> {
    let status = match report {
        StatusReport::NotConfigured { .. } => {
            writeln!(out, "  {}", "❌ Not configured".red())?;
            writeln!(out)?;
            writeln!(out, "  Run:")?;
            writeln!(out, "    {}", "kiro-proxy install <credentials.json>".cyan())?;
            return writeln!(out);
        }
        StatusReport::Configured(status) => status,
    };

    writeln!(out, "  {}", "📋 Current Configuration:".white().bold())?;
    writeln!(out)?;

    let credentials = match &status.credentials_file {
        Some(path) if status.credentials_exist => path.display().to_string().green(),
        Some(path) => format!("{} (NOT FOUND)", path.display()).red(),
        None => "Not set (NOT FOUND)".red(),
    };
    writeln!(out, "    Credentials: {}", credentials)?;
    writeln!(
        out,
        "    API Key:     {}",
        status.api_key.as_deref().unwrap_or("Not set").yellow()
    )?;
    writeln!(out, "    Port:        {}", status.port.to_string().cyan())?;
    writeln!(
        out,
        "    Config File: {}",
        status.config_file.display().to_string().dimmed()
    )?;
    writeln!(out)
}

/// Print an error with whatever follow-up guidance applies to it.
pub fn error(out: &mut impl Write, err: &ProxyError) -> io::Result<()> {
    writeln!(out, "  {}", format!("❌ {}", err).red())?;

    match err {
        ProxyError::CredentialsMissing { .. } => {
            writeln!(
                out,
                "  Run 'kiro-proxy install <credentials.json>' to reconfigure."
            )?;
        }
        ProxyError::InvalidCredentialSource(CredentialSourceError::IdeCredentialsNotFound) => {
            writeln!(out)?;
            writeln!(out, "  Please ensure:")?;
            writeln!(out, "    1. Kiro IDE is installed: https://kiro.dev/")?;
            writeln!(out, "    2. You are logged in to Kiro IDE")?;
            writeln!(out)?;
            writeln!(out, "  Or specify the credentials file manually:")?;
            writeln!(out, "    {}", "kiro-proxy install <credentials.json>".cyan())?;
            writeln!(out)?;
        }
        ProxyError::InvalidCredentialSource(CredentialSourceError::NoSource) => {
            writeln!(out)?;
            writeln!(out, "  Usage:")?;
            writeln!(out, "    {}", "kiro-proxy install --ide".cyan())?;
            writeln!(out, "    {}", "kiro-proxy install <credentials.json>".cyan())?;
            writeln!(out)?;
        }
        ProxyError::InvalidCredentialSource(CredentialSourceError::CliSourceUnavailable) => {
            writeln!(out)?;
            writeln!(out, "  Please use Kiro IDE or manual file path instead.")?;
            writeln!(out)?;
        }
        _ => {}
    }
    Ok(())
}
