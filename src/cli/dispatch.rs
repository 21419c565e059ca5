use anyhow::Result;
use clap::CommandFactory;
use leadengine::commands::{init, lead, stages};
use leadengine::completions::generate_completions;
use std::io;
use std::path::Path;

use super::types::{Cli, Commands, LeadCommands, StagesCommands};

pub fn dispatch(command: Commands, root: &Path) -> Result<()> {
    match command {
        Commands::Init => init::execute(root),
        Commands::Stages { command } => match command {
            StagesCommands::List { json } => stages::list(json),
            StagesCommands::Check { from, to } => stages::check(from, to),
            StagesCommands::Next { stage, json } => stages::next(stage, json),
        },
        Commands::Lead { command } => match command {
            LeadCommands::Create { name, id, contact } => {
                lead::create(root, name, id, contact).map(|_| ())
            }
            LeadCommands::Show { lead_id, json } => lead::show(root, &lead_id, json),
            LeadCommands::List { stage, json } => lead::list(root, stage, json).map(|_| ()),
            LeadCommands::Move {
                lead_id,
                stage,
                force_unsafe,
                reason,
            } => lead::move_stage(root, &lead_id, stage, force_unsafe, reason).map(|_| ()),
            LeadCommands::History { lead_id } => lead::history(root, &lead_id),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate_completions(&mut cmd, shell, &mut io::stdout());
            Ok(())
        }
    }
}
