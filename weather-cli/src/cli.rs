use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_core::{Config, Session, Theme, TimeOfDay, provider_from_config};

use crate::{render::render_dashboard, shell};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather by city name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and display preferences.
    Configure {
        /// API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,

        /// Theme new sessions start with: "light" or "dark".
        #[arg(long, value_parser = parse_theme)]
        theme: Option<Theme>,
    },

    /// Show current weather for a city.
    Show {
        /// City name, sent to the provider as typed.
        city: String,
    },

    /// Start an interactive dashboard session.
    #[command(alias = "i")]
    Interactive,
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    Theme::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { api_key, theme } => {
                let mut config = Config::load()?;

                let api_key = match api_key {
                    Some(key) => key,
                    None => Password::new("OpenWeather API key:")
                        .without_confirmation()
                        .with_display_mode(PasswordDisplayMode::Masked)
                        .prompt()
                        .context("Failed to read API key")?,
                };
                if api_key.trim().is_empty() {
                    bail!("API key must not be empty");
                }

                config.set_api_key(api_key.trim().to_string());
                if let Some(theme) = theme {
                    config.set_theme(theme);
                }

                let path = config.save()?;
                println!("Saved configuration to {}", path.display());
            }
            Command::Show { city } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;

                let mut session = Session::new(config.theme());
                session.search(provider.as_ref(), &city).await;
                println!("{}", render_dashboard(&session, TimeOfDay::now()));

                if session.error_message().is_some() {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Interactive => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;

                shell::run(Arc::from(provider), config.theme()).await?;
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}
