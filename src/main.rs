use std::io::{self, Read};

use is_terminal::IsTerminal;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use flownode::request::Request;
use flownode::{cli, invoke};

fn main() {
    // Logs go to stderr; stdout carries only the JSON protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    std::process::exit(run());
}

fn run() -> i32 {
    let args = cli::Cli::parse();

    let payload = match read_payload(&args) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            eprintln!(
                "{}",
                json!({ "error": "Invalid JSON parameters: no payload provided" })
            );
            return 1;
        }
        Err(err) => {
            eprintln!(
                "{}",
                json!({ "error": format!("Invalid JSON parameters: {}", err) })
            );
            return 1;
        }
    };

    let request: Request = match serde_json::from_str(&payload) {
        Ok(request) => request,
        Err(err) => {
            eprintln!(
                "{}",
                json!({ "error": format!("Invalid JSON parameters: {}", err) })
            );
            return 1;
        }
    };

    let (envelope, to_stdout) = invoke(&request);
    let rendered = serde_json::to_string_pretty(&envelope)
        .unwrap_or_else(|_| envelope.to_string());
    if to_stdout {
        println!("{}", rendered);
        0
    } else {
        eprintln!("{}", rendered);
        1
    }
}

/// Payload precedence: positional argument, `--params-file`, piped stdin.
fn read_payload(args: &cli::Cli) -> io::Result<Option<String>> {
    if let Some(params) = &args.params {
        return Ok(Some(params.clone()));
    }
    if let Some(path) = &args.params_file {
        return std::fs::read_to_string(path).map(Some);
    }
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        if !buf.trim().is_empty() {
            return Ok(Some(buf));
        }
    }
    Ok(None)
}
