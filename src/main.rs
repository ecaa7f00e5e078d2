use std::io::Read;
use std::process::ExitCode;

use pulse_core::{error_envelope, AppError};
use pulseflow::{build_orchestrator, logging, AppConfig};
use tracing::error;

const USAGE: &str = "uso: pulseflow \"<pregunta>\"  (o la pregunta por stdin)";

fn read_input() -> std::io::Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    if matches!(std::env::args().nth(1).as_deref(), Some("-h") | Some("--help")) {
        eprintln!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "configuration error");
            println!("{}", error_envelope(&AppError::unexpected(e.to_string())).to_json_string(true));
            return ExitCode::from(2);
        }
    };

    let input = match read_input() {
        Ok(i) => i,
        Err(e) => {
            error!(error = %e, "failed to read stdin");
            println!("{}", error_envelope(&AppError::validation(format!("could not read input: {e}"))).to_json_string(true));
            return ExitCode::from(1);
        }
    };

    let envelope = build_orchestrator(&config).run_input(&input).await;
    println!("{}", envelope.to_json_string(true));
    if envelope.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
