use std::{path::PathBuf, str::FromStr};

use anyhow::{bail, Context, Result};
use clap::Parser;
use stratpanel::{PanelConfig, PanelSet};
use stratpanel_core::{settings::SettingsHandle, Role};
use stratpanel_protos::strategy_command::Command;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::JoinHandle,
};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

mod console;

use console::{apply, parse_line, Flow};

#[derive(Debug, Parser)]
#[command(name = "stratpanel")]
pub(crate) struct Args {
    /// JSON file the panel preferences are stored in.
    #[clap(long, short = 'f')]
    settings_file: Option<PathBuf>,

    /// Roles to create a panel for.
    #[clap(long, value_delimiter = ',', default_value = "blue,yellow")]
    roles: Vec<Role>,

    /// Keep auto-reload permanently enabled.
    #[clap(long, default_value = "false", action)]
    tournament: bool,

    /// Fall back to a recent TypeScript strategy when none was saved.
    #[clap(long, default_value = "false", action)]
    easy_mode: bool,

    #[clap(long, default_value = "false", action)]
    dark_colors: bool,

    #[clap(long, default_value = "info")]
    log_level: String,

    #[clap(long, default_value = "auto")]
    log_file: String,
}

impl Args {
    fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            tournament_mode: self.tournament,
            easy_mode: self.easy_mode,
            dark_colors: self.dark_colors,
        }
    }

    fn settings_path(&self) -> PathBuf {
        self.settings_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|p| p.join("stratpanel"))
                .unwrap_or_default()
                .join("settings.json")
        })
    }

    async fn log_file_path(&self) -> Result<PathBuf> {
        if self.log_file != "auto" {
            let path = PathBuf::from(&self.log_file);
            if path.exists() {
                bail!("Log file already exists: {}", path.display());
            }
            return Ok(path);
        }

        let time = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let filename = format!("stratpanel-{time}.log");
        let dir = dirs::data_local_dir()
            .map(|p| p.join("stratpanel"))
            .unwrap_or_default();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
        Ok(dir.join(filename))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up log file
    let log_file_path = args.log_file_path().await?;
    let log_dir = log_file_path.parent().map(PathBuf::from).unwrap_or_default();
    let log_file_name = log_file_path
        .file_name()
        .context("Log file path has no file name")?;
    let appender = tracing_appender::rolling::never(log_dir, log_file_name);
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);

    // Set up tracing, `log` records from the libraries are forwarded
    let log_level = tracing::Level::from_str(&args.log_level)
        .map_err(|_| anyhow::anyhow!("Invalid log level: {}", args.log_level))?;
    let stdout_layer = fmt::layer()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(log_level));
    let logfile_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking_appender);
    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(logfile_layer)
        .try_init()
        .context("Unable to set global tracing subscriber")?;

    tracing::info!("Saving logs to {}", log_file_path.display());

    let settings_path = args.settings_path();
    let settings = SettingsHandle::open_file(&settings_path)?;
    tracing::info!("Using settings file {}", settings_path.display());

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let printer = spawn_printer(command_rx);

    let mut panels = PanelSet::new(
        &args.roles,
        args.panel_config(),
        settings.clone(),
        command_tx,
    );
    panels.load();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{}", err);
                continue;
            }
        };
        match apply(&mut panels, command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => eprintln!("Error: {}", err),
        }
    }

    tracing::info!("Shutting down");
    panels.shutdown();
    // Dropping the panels closes the command channel and ends the printer
    drop(panels);
    printer.await.context("Command printer failed")?;
    settings.flush().await?;

    Ok(())
}

/// Prints every outbound command in protobuf text format.
fn spawn_printer(mut command_rx: mpsc::UnboundedReceiver<Command>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            println!("{}", protobuf::text_format::print_to_string(&command));
        }
    })
}
