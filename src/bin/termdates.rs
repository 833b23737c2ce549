use std::env;
use std::path::Path;
use std::process::ExitCode;
use termdates::cli::{CliArgs, print_help};
use termdates::context::StandardContext;
use termdates::{controller, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'termdates --help' for usage.");
            return ExitCode::from(2);
        }
    };
    if cli.help {
        print_help("termdates");
        return ExitCode::SUCCESS;
    }

    let ctx = StandardContext::new(cli.root.clone());
    let (config, log_path) = cli.prepare(&ctx);
    if let Err(e) = logging::init(&log_path, cli.verbose) {
        eprintln!("Warning: {:#}; errors will not be written to a log file.", e);
    }
    let config = match config {
        Ok(config) => config,
        Err(err) => return fail(&err, &log_path),
    };

    if cli.init_config {
        return match config.save(&ctx) {
            Ok(path) => {
                println!("Wrote {}", path.display());
                ExitCode::SUCCESS
            }
            Err(err) => fail(&err, &log_path),
        };
    }

    let source = cli.source(&config);
    let target = cli.target(&config);
    match controller::run(&ctx, &config, &source, &target).await {
        Ok(summary) => {
            let message = format!(
                "Created {} with {} term dates events.",
                summary.destination, summary.events
            );
            // Keep stdout clean for the calendar itself.
            if cli.stdout {
                eprintln!("{}", message);
            } else {
                println!("{}", message);
            }
            if summary.rejected_lines > 0 {
                eprintln!(
                    "{} line(s) could not be parsed. Check {} for details.",
                    summary.rejected_lines,
                    log_path.display()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err, &log_path),
    }
}

/// Full error to the log file, short message to the terminal.
fn fail(err: &anyhow::Error, log_path: &Path) -> ExitCode {
    log::error!("{:#}", err);
    println!("{}", controller::user_message(err, log_path));
    ExitCode::FAILURE
}
