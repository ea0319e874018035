// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;
mod output;

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands, OutputFormatArg};
use clap::Parser;
use ragchat_client::ChatBackend;
use ragchat_config::Config;
use ragchat_core::html::{render_transcript, RenderOptions};
use ragchat_core::{Completion, Transcript, TranscriptController};
use ragchat_tui::{App, AppOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let interactive = cli.command.is_none() && !cli.is_headless();
    let log_file = if interactive { Some(log_file_path(&cli)) } else { None };
    init_logging(cli.verbose, log_file.as_deref());

    // Handle subcommands first
    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Completions { shell } => {
                cli::print_completions(*shell);
                return Ok(());
            }
            Commands::ShowConfig => {
                let config = load_config(&cli)?;
                println!("{}", serde_yaml::to_string(&config)?);
                return Ok(());
            }
            Commands::ExportDemo { output } => {
                return export_demo(output.as_deref());
            }
            Commands::Ask { question, format } => {
                let config = load_config(&cli)?;
                return ask(&config, question, *format).await;
            }
        }
    }

    let config = load_config(&cli)?;

    if cli.is_headless() {
        run_pipe(&config).await
    } else {
        run_tui(cli, config).await
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = ragchat_config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    debug!(endpoint = %config.backend.endpoint_url, kind = %config.backend.kind, "configuration loaded");
    Ok(config)
}

/// Send one question and print the answer in the requested format.
async fn ask(config: &Config, question: &str, format: OutputFormatArg) -> anyhow::Result<()> {
    let backend = ragchat_client::from_config(&config.backend)?;
    let mut controller = TranscriptController::default();
    match controller.submit(backend.as_ref(), question).await? {
        Completion::Answered(idx) => {
            let turn = &controller.transcript().turns()[idx];
            print!("{}", output::format_turn(turn, format)?);
            Ok(())
        }
        _ => anyhow::bail!("no response from {}", backend.endpoint()),
    }
}

/// Headless mode: every non-empty stdin line is one question.  The exchange is
/// written to stdout as conversation markdown.
async fn run_pipe(config: &Config) -> anyhow::Result<()> {
    let backend = ragchat_client::from_config(&config.backend)?;
    let mut controller = TranscriptController::default();
    let mut stdout = io::stdout().lock();
    let mut asked = 0usize;
    let mut unanswered = 0usize;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading question from stdin")?;
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        asked += 1;
        let completion = controller.submit(backend.as_ref(), question).await?;
        if let Some(user) = controller.transcript().turns().iter().rev().find(|t| !t.sender.is_bot()) {
            writeln!(stdout, "{}", output::turn_markdown(user))?;
        }
        match completion {
            Completion::Answered(idx) => {
                let turn = &controller.transcript().turns()[idx];
                writeln!(stdout, "{}", output::turn_markdown(turn))?;
            }
            _ => unanswered += 1,
        }
        stdout.flush()?;
    }

    info!(asked, unanswered, "stdin exhausted");
    if unanswered > 0 {
        anyhow::bail!("{unanswered} of {asked} questions got no response");
    }
    Ok(())
}

fn export_demo(output: Option<&Path>) -> anyhow::Result<()> {
    let page = render_transcript(&Transcript::with_demo(), &RenderOptions::default());
    match output {
        Some(path) => fs::write(path, page)
            .with_context(|| format!("writing {}", path.display()))?,
        None => io::stdout().write_all(page.as_bytes())?,
    }
    Ok(())
}

async fn run_tui(cli: Cli, config: Config) -> anyhow::Result<()> {
    use ratatui::crossterm::{
        event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
        execute,
    };

    let backend: Arc<dyn ChatBackend> = Arc::from(ragchat_client::from_config(&config.backend)?);
    let mut opts = AppOptions::from_config(&config.tui);
    opts.initial_prompt = cli.prompt;

    let terminal = ratatui::init();
    let _ = execute!(std::io::stderr(), EnableMouseCapture, EnableBracketedPaste);

    let app = App::new(backend, opts);
    let result = app.run(terminal).await;

    let _ = execute!(std::io::stderr(), DisableBracketedPaste, DisableMouseCapture);
    ratatui::restore();

    result
}

fn log_file_path(cli: &Cli) -> PathBuf {
    cli.log_file.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("ragchat")
            .join("ragchat.log")
    })
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.  With `log_file` set (interactive UI) the
/// log goes there instead of stderr, which the terminal UI owns.
fn init_logging(verbosity: u8, log_file: Option<&Path>) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            // An unwritable log file silences logging rather than the UI.
            let Ok(file) = open_log_file(path) else { return };
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_with_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ragchat.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn export_demo_writes_a_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.html");
        export_demo(Some(&path)).unwrap();
        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains("<!DOCTYPE html>"));
        assert!(page.contains(r#"<div class="sources">"#));
    }

    #[tokio::test]
    async fn ask_against_mock_backend_succeeds() {
        let mut config = Config::default();
        config.backend.kind = ragchat_config::BackendKind::Mock;
        ask(&config, "hello", OutputFormatArg::Markdown).await.unwrap();
    }

    #[tokio::test]
    async fn ask_with_empty_question_fails() {
        let mut config = Config::default();
        config.backend.kind = ragchat_config::BackendKind::Mock;
        assert!(ask(&config, "  ", OutputFormatArg::Markdown).await.is_err());
    }
}
