//! Interactive `init` wizard.
//!
//! Input and output are injected so the whole dialogue can be driven from a
//! byte buffer in tests.

use crate::credentials::{resolve_explicit, validate_credentials_file};
use crate::error::{CredentialSourceError, ProxyError, Result};
use crate::install::{generate_api_key, InstallFlow};
use crate::paths::ProxyPaths;
use crate::store::{GatewayConfig, DEFAULT_PORT};
use crate::ui;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask a question; an empty answer yields `default` when one is given.
    /// A closed input stream is an error.
    pub fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        let written = match default {
            Some(default) => write!(self.output, "  {} [{}]: ", question, default),
            None => write!(self.output, "  {}: ", question),
        };
        written
            .and_then(|_| self.output.flush())
            .map_err(ProxyError::Prompt)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(ProxyError::Prompt)?;
        if read == 0 {
            return Err(ProxyError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }

        let answer = line.trim();
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer.to_string()),
        }
    }

    /// Yes/no question. An empty answer takes the default; anything
    /// unrecognised asks again.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask(&format!("{} [{}]", question, hint), None)?;
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  {}", "Error: invalid input".red())
                    .map_err(ProxyError::Prompt)?,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardChoice {
    IdeAutoDetect,
    /// Reserved for kiro-cli credentials; not available.
    KiroCli,
    ManualPath,
}

impl WizardChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::IdeAutoDetect),
            "2" => Some(Self::KiroCli),
            "3" => Some(Self::ManualPath),
            _ => None,
        }
    }
}

/// Parse the port answer. Anything that is not a usable port number falls
/// back to [`DEFAULT_PORT`] rather than failing the wizard.
pub fn parse_port(input: &str) -> u16 {
    input
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}

#[derive(Debug, Clone)]
pub struct WizardOutcome {
    pub config: GatewayConfig,
    pub port: u16,
    pub start_now: bool,
}

pub struct InitWizard<R, W> {
    paths: ProxyPaths,
    install: InstallFlow,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> InitWizard<R, W> {
    pub fn new(paths: ProxyPaths, prompter: Prompter<R, W>) -> Self {
        Self {
            install: InstallFlow::new(&paths),
            paths,
            prompter,
        }
    }

    pub fn run(&mut self) -> Result<WizardOutcome> {
        self.show_menu().map_err(ProxyError::Prompt)?;

        let choice = loop {
            let answer = self.prompter.ask("Enter choice", Some("1"))?;
            if let Some(choice) = WizardChoice::parse(&answer) {
                break choice;
            }
            self.say(format!("  {}", "Please enter 1, 2, or 3".red()))?;
        };
        self.say("")?;

        let credentials_file = match choice {
            WizardChoice::IdeAutoDetect => self.detect_ide()?,
            WizardChoice::KiroCli => return Err(CredentialSourceError::CliSourceUnavailable.into()),
            WizardChoice::ManualPath => self.manual_path()?,
        };
        self.say("")?;

        let port = parse_port(&self.prompter.ask("? Server port", Some("8000"))?);
        self.say("")?;

        let api_key = generate_api_key();
        ui::generated_key(self.prompter.output(), &api_key).map_err(ProxyError::Prompt)?;

        let config = GatewayConfig::new(credentials_file, api_key, port);
        self.install.store().save(&config)?;
        self.show_saved().map_err(ProxyError::Prompt)?;

        let start_now = self.prompter.confirm("? Start server now", true)?;
        Ok(WizardOutcome {
            config,
            port,
            start_now,
        })
    }

    fn detect_ide(&mut self) -> Result<PathBuf> {
        self.say("  🔍 Searching for Kiro IDE credentials...")?;
        let found = self.install.detect_ide_credentials()?;
        self.say(format!("  {}", format!("✅ Found: {}", found.display()).green()))?;
        Ok(found)
    }

    fn manual_path(&mut self) -> Result<PathBuf> {
        self.say("  📄 Example paths:")?;
        self.say(format!(
            "     {}",
            "~/.aws/sso/cache/kiro-auth-token.json".dimmed()
        ))?;
        self.say(format!(
            "     {}",
            "C:\\Users\\xxx\\.aws\\sso\\cache\\kiro-auth-token.json".dimmed()
        ))?;
        self.say("")?;

        let answer = self.prompter.ask("Enter credentials file path", None)?;
        let path = resolve_explicit(&self.paths.expand_user(&answer))?;
        validate_credentials_file(&path)?;
        self.say(format!("  {}", "✅ Valid credentials file".green()))?;
        Ok(path)
    }

    fn show_menu(&mut self) -> io::Result<()> {
        let out = self.prompter.output();
        ui::banner(out, "Kiro Proxy Setup")?;
        writeln!(out, "  {}", "? Select credentials source:".white().bold())?;
        writeln!(out)?;
        writeln!(
            out,
            "    ❯ {}{}",
            "1. Kiro IDE ".cyan().bold(),
            "(auto-detect)".white()
        )?;
        writeln!(
            out,
            "      {}{}",
            "2. kiro-cli ".dimmed(),
            "(not available)".red()
        )?;
        writeln!(
            out,
            "      {}{}",
            "3. Manual file path ".cyan().bold(),
            "(e.g. ~/.aws/sso/cache/kiro-auth-token.json)".dimmed()
        )?;
        writeln!(out)
    }

    fn show_saved(&mut self) -> io::Result<()> {
        let config_file = self.install.store().path().display().to_string();
        let out = self.prompter.output();
        writeln!(out)?;
        writeln!(out, "  {}", "✅ Configuration saved!".green())?;
        writeln!(out)?;
        writeln!(out, "  {}", "─".repeat(45))?;
        writeln!(out)?;
        writeln!(out, "  {}", "📁 Config saved to:".white().bold())?;
        writeln!(out, "     {}", config_file.dimmed())?;
        writeln!(out)?;
        writeln!(out, "  💡 Forgot your API Key? Run:")?;
        writeln!(out, "     {}", "kiro-proxy status".cyan())?;
        writeln!(out)?;
        writeln!(out, "  {}", "─".repeat(45))?;
        writeln!(out)?;
        writeln!(out, "  {}", "Quick Start:".white().bold())?;
        writeln!(out)?;
        writeln!(out, "    {}", "kiro-proxy start".cyan().bold())?;
        writeln!(out)
    }

    fn say(&mut self, line: impl std::fmt::Display) -> Result<()> {
        writeln!(self.prompter.output(), "{}", line).map_err(ProxyError::Prompt)
    }
}
