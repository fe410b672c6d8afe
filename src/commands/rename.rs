use clap::Args;
use serde::Serialize;

use mediacase::{LocalFs, RenameEngine, RenameFailure, RenameOutcome, RenameSuccess, RenameSummary};

use crate::commands::{CmdResult, GlobalArgs, LibraryArgs};

#[derive(Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub library: LibraryArgs,

    /// Skip the confirmation prompt (required when not attached to a terminal)
    #[arg(short, long)]
    pub yes: bool,

    /// Print the results as markdown lists instead of JSON
    #[arg(long)]
    pub markdown: bool,
}

#[derive(Serialize)]
#[serde(tag = "command", rename = "rename")]
#[serde(rename_all = "camelCase")]
pub struct RenameOutput {
    pub library: String,
    pub successes: Vec<Entry<RenameSuccess>>,
    pub errors: Vec<Entry<RenameFailure>>,
    pub summary: RenameSummary,
}

/// A structured record plus its operator-facing message.
#[derive(Serialize)]
pub struct Entry<T: Serialize> {
    pub message: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T: Serialize + std::fmt::Display> From<T> for Entry<T> {
    fn from(record: T) -> Self {
        Self {
            message: record.to_string(),
            record,
        }
    }
}

pub fn run(args: RenameArgs, _global: &GlobalArgs) -> CmdResult<RenameOutput> {
    let (library, outcome) = execute(&args)?;
    let exit_code = exit_code(&outcome);
    let summary = outcome.summary();

    Ok((
        RenameOutput {
            library,
            successes: outcome.successes.into_iter().map(Entry::from).collect(),
            errors: outcome.errors.into_iter().map(Entry::from).collect(),
            summary,
        },
        exit_code,
    ))
}

pub fn run_markdown(args: RenameArgs, _global: &GlobalArgs) -> mediacase::Result<(String, i32)> {
    let (_library, outcome) = execute(&args)?;
    Ok((outcome.to_markdown(), exit_code(&outcome)))
}

fn execute(args: &RenameArgs) -> mediacase::Result<(String, RenameOutcome)> {
    let mut library = args.library.open()?;
    let library_path = library.path().display().to_string();

    authorize(args.yes, &library_path)?;

    crate::tty::status(&format!("Renaming media in {}...", library_path));
    let fs = LocalFs::new();
    let outcome = RenameEngine::new(&mut library, &fs).run()?;

    Ok((library_path, outcome))
}

/// The rename touches every file in the library, so it needs an explicit go-ahead.
fn authorize(yes: bool, library_path: &str) -> mediacase::Result<()> {
    if yes {
        return Ok(());
    }

    if !crate::tty::is_stdin_tty() {
        return Err(mediacase::Error::validation_invalid_argument(
            "yes",
            "Renaming requires confirmation; pass --yes when not running in a terminal",
            None,
        ));
    }

    let message = format!(
        "Rename all media files in {} to skeleton case?",
        library_path
    );
    if crate::tty::confirm(&message)? {
        Ok(())
    } else {
        Err(mediacase::Error::validation_invalid_argument(
            "yes",
            "Rename cancelled by operator",
            None,
        ))
    }
}

fn exit_code(outcome: &RenameOutcome) -> i32 {
    if outcome.is_clean() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn run_renames_and_reports_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("My File.png"), "png").unwrap();
        fs::write(dir.path().join("My File-150x150.png"), "thumb").unwrap();
        let manifest = dir.path().join("media-library.json");
        fs::write(
            &manifest,
            r#"{"assets": [{"id": 1, "file": "My File.png",
                "metadata": {"sizes": {"thumbnail": {"file": "My File-150x150.png"}}}}]}"#,
        )
        .unwrap();

        let args = RenameArgs {
            library: LibraryArgs {
                library: Some(manifest.clone()),
            },
            yes: true,
            markdown: false,
        };
        let (output, exit_code) = run(args, &GlobalArgs {}).unwrap();

        assert_eq!(exit_code, 0);
        assert_eq!(output.successes.len(), 2);
        assert!(output.errors.is_empty());
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["command"], "rename");
        assert_eq!(json["successes"][1]["variant"], "thumbnail");
        assert!(json["successes"][0]["message"]
            .as_str()
            .unwrap()
            .starts_with("Renamed: "));
        assert!(dir.path().join("my-file.png").exists());
        assert!(dir.path().join("my-file-150x150.png").exists());
    }

    #[test]
    fn run_reports_errors_with_exit_code_one() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("media-library.json");
        fs::write(&manifest, r#"{"assets": [{"id": 3, "file": "gone.png"}]}"#).unwrap();

        let args = RenameArgs {
            library: LibraryArgs {
                library: Some(manifest),
            },
            yes: true,
            markdown: true,
        };
        let (markdown, exit_code) = run_markdown(args, &GlobalArgs {}).unwrap();

        assert_eq!(exit_code, 1);
        assert!(markdown.contains("## Errors"));
        assert!(markdown.contains("File not found: "));
    }

    #[test]
    fn missing_library_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = RenameArgs {
            library: LibraryArgs {
                library: Some(dir.path().join("absent.json")),
            },
            yes: true,
            markdown: false,
        };
        let err = run(args, &GlobalArgs {}).err().unwrap();
        assert_eq!(err.code, mediacase::ErrorCode::LibraryNotFound);
    }
}
