use exceltotable::app::{self, RunError};
use exceltotable::config::{LOG_ENV_VAR, ToolConfig, load_tool_config};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_PROGRAM_NAME: &str = "exceltotable";

fn init_logging(config: &ToolConfig) {
    // The environment wins over the config file; both fall back to `warn`.
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .ok()
        .or_else(|| config.log.as_deref().and_then(|directives| EnvFilter::try_new(directives).ok()))
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .init();
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string())
}

fn print_usage(program: &str, config: &ToolConfig) {
    match app::usage(program, config) {
        Ok(banner) => print!("{banner}"),
        Err(err) => println!("Error: {err}"),
    }
}

fn main() -> ExitCode {
    let lookup = std::env::current_dir()
        .map(|cwd| load_tool_config(&[cwd]))
        .unwrap_or_default();
    let config = lookup.config.clone().unwrap_or_default();
    init_logging(&config);
    lookup.report();

    let program = program_name();
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    if args.is_empty() {
        print_usage(&program, &config);
        return ExitCode::from(1);
    }

    match app::run(args, &config) {
        Ok(report) => {
            if let Some(summary) = report.summary() {
                println!("{summary}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let RunError::Usage(_) = err {
                println!("Error: {err}");
                println!();
                print_usage(&program, &config);
            } else {
                println!("{err}");
            }
            tracing::debug!("Exiting with status {}", err.exit_code());
            ExitCode::from(err.exit_code())
        }
    }
}
