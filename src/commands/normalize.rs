use clap::Args;
use serde::Serialize;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Text to convert (each argument is converted separately)
    #[arg(required = true)]
    pub input: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command", rename = "normalize")]
pub struct NormalizeOutput {
    pub results: Vec<NormalizedName>,
}

#[derive(Serialize)]
pub struct NormalizedName {
    pub input: String,
    pub normalized: String,
}

pub fn run_json(args: NormalizeArgs) -> CmdResult<NormalizeOutput> {
    let results = args
        .input
        .into_iter()
        .map(|input| NormalizedName {
            normalized: mediacase::normalize(&input),
            input,
        })
        .collect();

    Ok((NormalizeOutput { results }, 0))
}
