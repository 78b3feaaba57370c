// src/main.rs
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shiftsheet_core::{AppConfig, Employee, EmployeeSelection, Roster, ScheduleCheck, ScheduleRules, Timesheet};

#[derive(Parser)]
#[command(name = "shiftsheet")]
#[command(about = "Turns a pasted biweekly schedule into timesheets and schedule warnings", long_about = None)]
struct Cli {
    /// Roster JSON file (defaults to SHIFTSHEET_ROSTER_PATH, then the bundled roster)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Schedule rules JSON file (defaults to SHIFTSHEET_RULES_PATH, then built-in rules)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one employee's timesheet from a schedule paste
    Timesheet {
        /// Tab-delimited schedule file, or "-" for stdin
        #[arg(long, default_value = "-")]
        schedule: String,

        /// Full roster name, e.g. "Sue Santiago"
        #[arg(long, conflicts_with = "custom_name")]
        employee: Option<String>,

        /// Name as written in the schedule, for someone not on the roster
        #[arg(long, requires_all = ["custom_abbrev", "custom_gender"])]
        custom_name: Option<String>,

        #[arg(long)]
        custom_abbrev: Option<String>,

        /// "M" or "F"
        #[arg(long)]
        custom_gender: Option<String>,

        /// Statutory holidays in the period
        #[arg(long, default_value_t = 0)]
        holidays: i64,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Check every roster employee against a schedule paste
    Check {
        /// Tab-delimited schedule file, or "-" for stdin
        #[arg(long, default_value = "-")]
        schedule: String,

        #[arg(long, default_value_t = 0)]
        holidays: i64,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List the employees on the roster
    Roster,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Tsv,
    Json,
}

fn read_schedule(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read schedule from stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(source).with_context(|| format!("Failed to read schedule file {source}"))
}

fn load_roster(path: Option<&Path>) -> Result<Roster> {
    match path {
        Some(path) => Roster::from_json_file(path).with_context(|| format!("Failed to load roster {}", path.display())),
        None => Roster::bundled().context("Bundled roster is invalid"),
    }
}

fn load_rules(path: Option<&Path>) -> Result<ScheduleRules> {
    match path {
        Some(path) => {
            ScheduleRules::from_json_file(path).with_context(|| format!("Failed to load rules {}", path.display()))
        }
        None => Ok(ScheduleRules::default()),
    }
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::from_env().context("Invalid SHIFTSHEET_* environment")?;

    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.as_str().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let roster_path = cli.roster.or(config.roster_path);
    let rules_path = cli.rules.or(config.rules_path);
    let roster = load_roster(roster_path.as_deref())?;
    let rules = load_rules(rules_path.as_deref())?;
    info!("Roster has {} employees", roster.len());

    match cli.command {
        Commands::Timesheet {
            schedule,
            employee,
            custom_name,
            custom_abbrev,
            custom_gender,
            holidays,
            format,
        } => {
            let selection = match (employee, custom_name) {
                (Some(name), None) => EmployeeSelection::Roster(name),
                (None, Some(name)) => EmployeeSelection::Custom(Employee::custom(
                    &name,
                    custom_abbrev.as_deref().unwrap_or_default(),
                    custom_gender.as_deref().unwrap_or_default(),
                )?),
                _ => bail!("Pass either --employee or --custom-name"),
            };

            let raw = read_schedule(&schedule)?;
            let sheet = Timesheet::build(&raw, &selection, holidays, &roster, &rules)?;
            if !sheet.warnings.is_clean() {
                warn!("Timesheet has conflicts that need review");
            }

            match format {
                Format::Text => print!("{}", sheet.render_text()),
                Format::Tsv => print!("{}", sheet.to_tsv()?),
                Format::Json => println!("{}", serde_json::to_string_pretty(&sheet)?),
            }
        }
        Commands::Check {
            schedule,
            holidays,
            format,
        } => {
            let raw = read_schedule(&schedule)?;
            let check = ScheduleCheck::run(&raw, holidays, &roster, &rules)?;
            match format {
                Format::Text => print!("{}", check.render_text()),
                Format::Json => println!("{}", serde_json::to_string_pretty(&check)?),
                Format::Tsv => bail!("TSV output is only available for timesheets"),
            }
        }
        Commands::Roster => {
            for (name, employee) in roster.iter() {
                let gender = employee.gender.map(|g| format!("{g:?}")).unwrap_or_else(|| "-".to_string());
                println!("{name}\t{}\t{}\t{gender}", employee.str_alias, employee.abbrev);
            }
        }
    }

    Ok(())
}
