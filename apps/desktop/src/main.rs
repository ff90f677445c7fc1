use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    load_settings, Bounds, CounterApi, CounterClient, FieldSpec, FileStore, Keypad, PageContext,
    Settings, TracingNotifier,
};
use shared::domain::{FieldId, Theme};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tally", about = "Counting station client")]
struct Args {
    /// Config file (defaults to ./tally.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    location: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply keypad actions to one field, printing its display after each.
    Keypad {
        field: String,
        #[arg(long, allow_negative_numbers = true)]
        min: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        max: Option<i64>,
        /// Text the field starts with.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        text: String,
        /// increment, decrement, digit:N, negate, reset or freeTextChanged:TEXT
        #[arg(required = true)]
        actions: Vec<String>,
    },
    Save {
        #[arg(long, allow_negative_numbers = true)]
        correct: i64,
        #[arg(long, allow_negative_numbers = true)]
        defect: i64,
        /// Extra batch field as key=value; repeatable.
        #[arg(long = "custom", value_parser = parse_key_value)]
        custom: Vec<(String, String)>,
    },
    Reset,
    ResetCurrent {
        #[arg(long, allow_negative_numbers = true)]
        correct: i64,
        #[arg(long, allow_negative_numbers = true)]
        defect: i64,
        #[arg(long, default_value = "")]
        item_no: String,
    },
    Start,
    Pause,
    Stop,
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Runs `actions` against a field bound to a plain string surface and
/// returns the displayed text after each one. Flag bounds override the
/// configured ones side by side.
fn run_keypad(
    settings: &Settings,
    field: &str,
    min: Option<i64>,
    max: Option<i64>,
    text: &str,
    actions: &[String],
) -> Result<Vec<String>> {
    let id = FieldId::new(field);
    let configured = settings
        .field_spec(&id)
        .map(FieldSpec::bounds)
        .unwrap_or_default();
    let spec = FieldSpec::new(
        field,
        Bounds::new(min.or(configured.min), max.or(configured.max)),
    );

    let mut keypad = Keypad::<String>::new();
    keypad.bind(&spec, text.to_string());

    let mut displays = Vec::with_capacity(actions.len());
    for action in actions {
        keypad
            .dispatch_str(&id, action)
            .with_context(|| format!("failed to apply '{action}' to field '{id}'"))?;
        if let Some(handle) = keypad.field(&id) {
            displays.push(handle.surface().clone());
        }
    }
    Ok(displays)
}

fn apply_theme_action(settings: &Settings, action: ThemeAction) -> Result<Theme> {
    let store = FileStore::open(&settings.state_path).with_context(|| {
        format!(
            "failed to open state file '{}'",
            settings.state_path.display()
        )
    })?;
    let mut page = PageContext::init(store, TracingNotifier);
    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            page.toggle_theme();
        }
        ThemeAction::Light => page.set_theme(Theme::Light),
        ThemeAction::Dark => page.set_theme(Theme::Dark),
    }
    Ok(page.theme())
}

async fn run_server_command(settings: &Settings, command: Command) -> Result<String> {
    let client = CounterClient::new(&settings.server_url, settings.location_id())?;
    let output = match command {
        Command::Save {
            correct,
            defect,
            custom,
        } => {
            let custom: BTreeMap<String, String> = custom.into_iter().collect();
            serde_json::to_string_pretty(&client.save_count(correct, defect, &custom).await?)?
        }
        Command::Reset => serde_json::to_string_pretty(&client.reset_count().await?)?,
        Command::ResetCurrent {
            correct,
            defect,
            item_no,
        } => serde_json::to_string_pretty(
            &client.reset_count_current(correct, defect, &item_no).await?,
        )?,
        Command::Start => serde_json::to_string_pretty(&client.start().await?)?,
        Command::Pause => serde_json::to_string_pretty(&client.pause().await?)?,
        Command::Stop => serde_json::to_string_pretty(&client.stop().await?)?,
        Command::Keypad { .. } | Command::Theme { .. } => {
            anyhow::bail!("not a counting server command")
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(location) = args.location {
        settings.location = location;
    }

    match args.command {
        Command::Keypad {
            field,
            min,
            max,
            text,
            actions,
        } => {
            for display in run_keypad(&settings, &field, min, max, &text, &actions)? {
                println!("{display}");
            }
        }
        Command::Theme { action } => {
            println!("{}", apply_theme_action(&settings, action)?);
        }
        command => {
            tracing::debug!(
                server_url = %settings.server_url,
                location = %settings.location,
                "calling counting server"
            );
            println!("{}", run_server_command(&settings, command).await?);
        }
    }

    Ok(())
}
