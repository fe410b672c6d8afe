use clap::Args;
use serde::Serialize;

use mediacase::{LocalFs, PlanAction, PlannedRename, RenameEngine};

use crate::commands::{CmdResult, GlobalArgs, LibraryArgs};

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
}

#[derive(Serialize)]
#[serde(tag = "command", rename = "plan")]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub library: String,
    pub planned: Vec<PlannedRename>,
    pub blocked: usize,
}

pub fn run(args: PlanArgs, _global: &GlobalArgs) -> CmdResult<PlanOutput> {
    let mut library = args.library.open()?;
    let library_path = library.path().display().to_string();

    let fs = LocalFs::new();
    let planned = RenameEngine::new(&mut library, &fs).plan()?;

    let blocked = planned
        .iter()
        .filter(|p| matches!(p.action, PlanAction::TargetExists | PlanAction::NotFound))
        .count();

    Ok((
        PlanOutput {
            library: library_path,
            planned,
            blocked,
        },
        0,
    ))
}
