use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (session masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring deskctl.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The session cookie is stored in plain text; protect your filesystem accordingly.");
    println!();

    let stdin = io::stdin();
    let mut wizard = Wizard::new(stdin.lock(), io::stdout());
    wizard.edit(&mut cfg)?;
    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Helpdesk URL: {}", or_unset(cfg.base_url.as_deref()));
    println!(
        "Session cookie name: {}",
        or_unset(cfg.session_cookie_name.as_deref())
    );
    println!("Session cookie value: {}", mask_session(cfg.session_value.as_deref()));
    println!(
        "Request timeout: {}",
        cfg.timeout_secs
            .map(|secs| format!("{secs}s"))
            .unwrap_or_else(|| "<default>".to_string())
    );

    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Field {
    BaseUrl,
    CookieName,
    SessionValue,
    TimeoutSecs,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::BaseUrl => "Helpdesk URL (e.g., http://helpdesk.local:5000)",
            Field::CookieName => "Session cookie name",
            Field::SessionValue => "Session cookie value",
            Field::TimeoutSecs => "Request timeout in seconds",
        }
    }

    fn is_secret(self) -> bool {
        matches!(self, Field::SessionValue)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Keep,
    Clear,
    Set(String),
}

impl Answer {
    fn parse(input: &str) -> Self {
        match input.trim() {
            "" => Answer::Keep,
            "-" => Answer::Clear,
            value => Answer::Set(value.to_string()),
        }
    }
}

/// Line-oriented editor for `StoredConfig`.
struct Wizard<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn edit(&mut self, cfg: &mut StoredConfig) -> AppResult<()> {
        self.edit_text(Field::BaseUrl, &mut cfg.base_url)?;
        self.edit_text(Field::CookieName, &mut cfg.session_cookie_name)?;
        self.edit_text(Field::SessionValue, &mut cfg.session_value)?;
        self.edit_timeout(&mut cfg.timeout_secs)
    }

    fn edit_text(&mut self, field: Field, target: &mut Option<String>) -> AppResult<()> {
        match self.ask(field, target.as_deref())? {
            Answer::Keep => {}
            Answer::Clear => *target = None,
            Answer::Set(value) => *target = Some(value),
        }
        Ok(())
    }

    /// Anything other than a positive number of seconds leaves the stored
    /// timeout untouched.
    fn edit_timeout(&mut self, target: &mut Option<u64>) -> AppResult<()> {
        let current = target.map(|secs| secs.to_string());
        match self.ask(Field::TimeoutSecs, current.as_deref())? {
            Answer::Keep => {}
            Answer::Clear => *target = None,
            Answer::Set(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => *target = Some(secs),
                _ => writeln!(
                    self.output,
                    "'{raw}' is not a positive number of seconds; timeout unchanged."
                )?,
            },
        }
        Ok(())
    }

    fn ask(&mut self, field: Field, current: Option<&str>) -> AppResult<Answer> {
        let label = field.label();
        match current {
            Some(_) if field.is_secret() => write!(
                self.output,
                "{label} [****] (Enter to keep, '-' to clear): "
            )?,
            Some(value) => write!(
                self.output,
                "{label} [{value}] (Enter to keep, '-' to clear): "
            )?,
            None => write!(self.output, "{label} (Enter to skip): ")?,
        }
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(Answer::parse(&line))
    }
}

fn or_unset(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("<not set>")
}

fn mask_session(value: Option<&str>) -> String {
    match value {
        Some(secret) if secret.chars().count() > 6 => {
            let chars = secret.chars().collect::<Vec<_>>();
            let prefix = chars[..3].iter().collect::<String>();
            let suffix = chars[chars.len() - 3..].iter().collect::<String>();
            format!("{prefix}***{suffix}")
        }
        Some(secret) if !secret.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
