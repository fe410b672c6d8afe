use clap::Args;
use std::path::PathBuf;

use mediacase::defaults;
use mediacase::JsonLibrary;

pub type CmdResult<T> = mediacase::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

/// Shared `--library` argument for commands that operate on a media library.
#[derive(Args, Default, Debug)]
pub struct LibraryArgs {
    /// Media library manifest (default: config `library`, then ./media-library.json)
    #[arg(long, value_name = "PATH")]
    pub library: Option<PathBuf>,
}

impl LibraryArgs {
    /// Resolve the manifest path and open it.
    pub fn open(&self) -> mediacase::Result<JsonLibrary> {
        let config = defaults::load_config();
        let path = defaults::resolve_library(self.library.as_deref(), &config);
        JsonLibrary::open(&path)
    }
}

pub mod normalize;
pub mod plan;
pub mod rename;

pub(crate) fn run_markdown(
    command: crate::Commands,
    global: &GlobalArgs,
) -> mediacase::Result<(String, i32)> {
    match command {
        crate::Commands::Rename(args) => rename::run_markdown(args, global),
        _ => Err(mediacase::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support markdown output",
            None,
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run_json($args))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (mediacase::Result<serde_json::Value>, i32) {
    match command {
        // Commands without global context
        crate::Commands::Normalize(args) => dispatch!(args, normalize),

        // Commands with global context
        crate::Commands::Rename(args) => dispatch!(args, global, rename),
        crate::Commands::Plan(args) => dispatch!(args, global, plan),
    }
}
