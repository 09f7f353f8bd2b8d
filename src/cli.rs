use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "flownode", about = "Flowboard node executor", version)]
pub struct Cli {
    /// JSON invocation payload: a single object with at least `nodeId` and
    /// `operation`, plus operation-specific fields (`inputData`,
    /// `dimensions`, `vizType`, `vizParams`, `outputDir`, `filenamePattern`,
    /// `counter`, `seed`, `size`). When omitted, the payload is read from
    /// stdin if it is piped.
    #[arg(value_name = "PARAMS")]
    pub params: Option<String>,

    /// Read the JSON payload from a file instead of the command line.
    #[arg(long = "params-file", value_name = "PATH", conflicts_with = "params")]
    pub params_file: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
