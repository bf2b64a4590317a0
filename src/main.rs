//! Main CLI application for the Mastermind deduction engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mastermind_sat::{
    config::{CliOverrides, OutputFormat, RowTermination, Settings},
    deduction::DeductionProblem,
    mastermind::{all_guesses, create_example_fixtures, guess_space_size},
    utils::{ColorOutput, ReportFormatter},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "mastermind_sat")]
#[command(about = "Mastermind SAT Deduction Engine")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduce what the board reveals about the hidden answer
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Fixture file with preset guesses and feedback (overrides config)
        #[arg(short, long)]
        fixture: Option<PathBuf>,

        /// Maximum models to enumerate per count (overrides config)
        #[arg(short, long)]
        max_solutions: Option<u64>,

        /// Time budget per solver query in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Output format (overrides config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show encoding statistics without solving
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Fixture file (overrides config)
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },

    /// List repeat-free guesses over the configured palette
    Guesses {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Maximum number of guesses to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Create example configuration and fixture files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config, fixture, max_solutions, timeout, format, verbose
        } => {
            let overrides = CliOverrides {
                max_solutions,
                timeout_seconds: timeout,
                fixture_file: fixture,
                format,
            };
            solve_command(config, overrides, verbose)
        }
        Commands::Analyze { config, fixture } => {
            analyze_command(config, fixture)
        }
        Commands::Guesses { config, limit } => {
            guesses_command(config, limit)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
    }
}

/// Load settings, falling back to defaults when the file is missing
fn load_settings(config_path: &Path, announce: bool) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        if announce {
            eprintln!("{}", ColorOutput::warning(&format!(
                "Config file {} not found, using defaults", config_path.display()
            )));
        }
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    let mut settings = load_settings(&config_path, true)?;
    settings.merge_with_cli(&overrides);

    settings.validate()
        .context("Configuration validation failed")?;

    let text = settings.output.format == OutputFormat::Text;

    if text {
        println!("{}", ColorOutput::info("Starting Mastermind deduction"));
    }

    if verbose && text {
        println!("Configuration:");
        println!("  Board: {} columns x {} rows", settings.board.columns, settings.board.rows);
        println!("  Palette: {}", settings.board.palette.join(", "));
        println!("  Distinct guess colours: {}", settings.encoding.distinct_guess_colours);
        println!("  Distinct answer colours: {}", settings.encoding.distinct_answer_colours);
        println!("  Row termination: {:?}", settings.encoding.row_termination);
        println!("  Max solutions: {:?}", settings.solver.max_solutions);
        println!("  Timeout: {:?}s", settings.solver.timeout_seconds);
        println!();
    }

    let start_time = Instant::now();
    let problem = DeductionProblem::new(settings)
        .context("Failed to create deduction problem")?;

    if verbose && text {
        if let Some(fixture) = problem.fixture() {
            println!("Preset board:");
            println!("{}", ReportFormatter::format_fixture(fixture));
        }
    }

    let report = problem.analyze()
        .context("Failed to analyse board")?;

    if !text {
        println!("{}", report.to_json().context("Failed to serialize report")?);
        return Ok(());
    }

    println!("\n{}", ReportFormatter::format_report(&report));

    if !report.satisfiable {
        println!("{}", ColorOutput::warning("No answer is consistent with this board"));
    } else if let Some(answer) = report.determined_answer() {
        let labels: Vec<_> = answer.iter().map(|c| c.label()).collect();
        println!("{}", ColorOutput::success(&format!("Answer determined: {}", labels.join(" "))));
    } else {
        println!("{}", ColorOutput::info("Answer not yet determined"));
    }

    if verbose {
        println!("Total time: {:.3}s", start_time.elapsed().as_secs_f64());
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, fixture: Option<PathBuf>) -> Result<()> {
    println!("{}", ColorOutput::info("Analysing encoding..."));

    let mut settings = load_settings(&config_path, true)?;
    settings.merge_with_cli(&CliOverrides {
        fixture_file: fixture,
        ..CliOverrides::default()
    });

    let problem = DeductionProblem::new(settings)
        .context("Failed to create problem for analysis")?;

    let dims = problem.dimensions();
    println!("Board: {} columns x {} rows, {} colours", dims.columns, dims.rows, problem.palette().len());
    println!("Guess space: {}", problem.guess_space());

    if let Some(fixture) = problem.fixture() {
        println!("\nPreset board:");
        println!("{}", ReportFormatter::format_fixture(fixture));
    }

    let stats = problem.encoding_statistics()?;
    println!("{}", ReportFormatter::format_statistics(&stats));

    Ok(())
}

fn guesses_command(config_path: PathBuf, limit: usize) -> Result<()> {
    let settings = load_settings(&config_path, true)?;
    let palette = settings.palette().context("Invalid palette")?;
    let columns = settings.board.columns;

    let total = guess_space_size(palette.len(), columns);
    println!("{}", ColorOutput::info(&format!(
        "{} repeat-free guesses of {} columns over {} colours", total, columns, palette.len()
    )));

    for guess in all_guesses(&palette, columns).take(limit) {
        let labels: Vec<_> = guess.iter().map(|c| c.label()).collect();
        println!("  {}", labels.join(" "));
    }

    if total > limit as u128 {
        println!("  ... {} more", total - limit as u128);
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let fixture_dir = directory.join("input/fixtures");

    for dir in [&config_dir, &fixture_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_fixtures(&fixture_dir)
        .context("Failed to create example fixtures")?;
    println!("Created example fixtures in: {}", fixture_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    // One preset row
    let mut one_row = Settings::default();
    one_row.input.fixture_file = Some(fixture_dir.join("two_blacks.yaml"));
    one_row.to_file(&examples_dir.join("two_blacks.yaml"))?;

    // Two preset rows, last one still open
    let mut two_rows = Settings::default();
    two_rows.board.rows = 2;
    two_rows.encoding.row_termination = RowTermination::FinalRowOnly;
    two_rows.input.fixture_file = Some(fixture_dir.join("two_rows.yaml"));
    two_rows.to_file(&examples_dir.join("two_rows.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own boards to {}", fixture_dir.display());
    println!("3. Run: cargo run -- solve --config config/examples/two_rows.yaml");

    Ok(())
}
