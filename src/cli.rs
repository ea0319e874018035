// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use ragchat_config::{BackendKind, Config};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for one-shot answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormatArg {
    /// Conversation markdown (## Assistant, body, sources line).
    #[default]
    Markdown,
    /// HTML fragment as the chat widget renders it.
    Html,
    /// The bot turn as JSON: sender, content, sources.
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "ragchat",
    about = "Terminal chat client for a retrieval-augmented answer service",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Question submitted as soon as the chat opens
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Query endpoint URL, e.g. http://localhost:5000/chat
    #[arg(long, short = 'e', env = "RAGCHAT_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Backend implementation (http | mock)
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendKind>,

    /// Request timeout in seconds (0 = wait forever)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Seed the chat with the demo exchange
    #[arg(long)]
    pub demo: bool,

    /// Use plain ASCII borders and icons
    #[arg(long)]
    pub ascii: bool,

    /// Log file for the interactive UI (default: <data dir>/ragchat/ragchat.log)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask one question and print the answer
    Ask {
        /// The question to send
        #[arg(value_name = "QUESTION")]
        question: String,
        /// Output format (markdown | html | json)
        #[arg(long, short = 'f', value_enum, default_value = "markdown")]
        format: OutputFormatArg,
    },
    /// Render the demo exchange as a standalone HTML page
    ExportDemo {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns true when questions should be read from stdin instead of
    /// opening the interactive UI.
    pub fn is_headless(&self) -> bool {
        !std::io::stdin().is_terminal()
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.endpoint {
            config.backend.endpoint_url = url.clone();
        }
        if let Some(kind) = self.backend {
            config.backend.kind = kind;
        }
        if let Some(secs) = self.timeout {
            config.backend.timeout_secs = secs;
        }
        if self.demo {
            config.tui.seed_demo = true;
        }
        if self.ascii {
            config.tui.ascii_borders = true;
        }
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ragchat", &mut std::io::stdout());
}
