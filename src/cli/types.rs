use clap::{Parser, Subcommand};
use leadengine::completions::Shell;
use leadengine::models::sales_stage::SalesStage;
use leadengine::validation::{clap_id_validator, clap_stage_parser, clap_text_validator};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leadengine")]
#[command(about = "Sales funnel stage guard and lead store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing .leads/
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the .leads/ data directory
    Init,

    /// Inspect funnel stages and the transition table
    Stages {
        #[command(subcommand)]
        command: StagesCommands,
    },

    /// Manage leads
    Lead {
        #[command(subcommand)]
        command: LeadCommands,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum StagesCommands {
    /// List every stage with its ids
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a move between two stages is allowed
    Check {
        /// Current stage (id or English name)
        #[arg(value_parser = clap_stage_parser)]
        from: SalesStage,

        /// Requested stage (id or English name)
        #[arg(value_parser = clap_stage_parser)]
        to: SalesStage,
    },

    /// List the stages reachable in one move
    Next {
        #[arg(value_parser = clap_stage_parser)]
        stage: SalesStage,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum LeadCommands {
    /// Create a lead at the configured initial stage
    Create {
        /// Lead name (max 500 characters)
        #[arg(value_parser = clap_text_validator)]
        name: String,

        /// Lead ID (alphanumeric, dash, underscore only; generated if omitted)
        #[arg(long, value_parser = clap_id_validator)]
        id: Option<String>,

        /// Phone number, e-mail or other contact handle
        #[arg(long, value_parser = clap_text_validator)]
        contact: Option<String>,
    },

    /// Show a lead
    Show {
        #[arg(value_parser = clap_id_validator)]
        lead_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List leads
    List {
        /// Only leads currently at this stage
        #[arg(long, value_parser = clap_stage_parser)]
        stage: Option<SalesStage>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a lead to another stage
    Move {
        #[arg(value_parser = clap_id_validator)]
        lead_id: String,

        #[arg(value_parser = clap_stage_parser)]
        stage: SalesStage,

        /// UNSAFE: skip the transition table. Requires allow_forced_moves in config.toml.
        /// Use only for imports and data repair.
        #[arg(long = "force-unsafe")]
        force_unsafe: bool,

        /// Why the move is being forced (recorded in the lead history)
        #[arg(long, requires = "force_unsafe", value_parser = clap_text_validator)]
        reason: Option<String>,
    },

    /// Show a lead's stage history
    History {
        #[arg(value_parser = clap_id_validator)]
        lead_id: String,
    },
}
