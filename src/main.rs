//! SQLean - an interactive SQL tutor.

use sqlean::check::check_course;
use sqlean::cli::{Cli, Command};
use sqlean::config::Config;
use sqlean::content::Course;
use sqlean::db::DatasetStore;
use sqlean::error::Result;
use sqlean::history::{history_path_for, InputHistory};
use sqlean::logging::{self, LogTarget};
use sqlean::progress::ProgressStore;
use sqlean::tutor::{Console, Tutor};
use sqlean::validation::Validator;
use tokio::io::BufReader;
use tracing::{error, info};

const DEFAULT_WIDTH: usize = 80;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();
    let interactive = cli.is_interactive();

    if let Err(e) = logging::init(&LogTarget::for_session(interactive)) {
        eprintln!("Warning: logging disabled: {e}");
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            // The tutor logs to a file, so the terminal needs its own copy
            if interactive {
                eprintln!("{}: {}", e.category(), e);
            }
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    let datasets = DatasetStore::new(&config.paths.datasets_dir);
    let progress = ProgressStore::new(&config.paths.progress_file);

    match cli.command {
        Some(Command::Schema { dataset }) => {
            println!("{}", datasets.schema_text(&dataset).await?);
            Ok(0)
        }
        Some(Command::Reset) => {
            progress.reset()?;
            println!("Progress reset.");
            Ok(0)
        }
        Some(Command::Check) => {
            let course = Course::load(&config.paths.content_dir)?;
            let report = check_course(&course, &Validator::new(datasets)).await?;

            for line in &report {
                println!("{line}");
            }
            let failures = report.iter().filter(|c| !c.is_ok()).count();
            println!("{} lesson(s) checked, {failures} problem(s)", report.len());
            Ok(if failures == 0 { 0 } else { 1 })
        }
        None => {
            let course = Course::load(&config.paths.content_dir)?;
            let width = crossterm::terminal::size()
                .map(|(w, _)| w as usize)
                .unwrap_or(DEFAULT_WIDTH);
            let console = Console::new(
                std::io::stdout(),
                config.display.color,
                width,
                config.display.max_rows,
            );

            let history = InputHistory::load(history_path_for(&config.paths.progress_file));

            let mut tutor = Tutor::new(
                course,
                Validator::new(datasets),
                progress,
                BufReader::new(tokio::io::stdin()),
                console,
            )
            .with_history(history);
            tutor.run().await?;
            Ok(0)
        }
    }
}
