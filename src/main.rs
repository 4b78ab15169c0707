//! NexVer - hardware verification project workspace.
//!
//! Drives the workspace core from the command line against the in-memory
//! sample backend.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nexver::core::{Config, OperationKind, Role, SheetName, Simulator, SimulatorSettings};
use nexver::service::{InMemoryProjectRepository, SampleGenerationService};
use nexver::{OperationUpdate, UploadedFile, Workspace, WorkspaceError};

/// Hardware verification project workspace
#[derive(Parser)]
#[command(name = "nexver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session: create, upload, plan, testbench, simulate
    Demo {
        /// Name of the project to create
        #[arg(short, long, default_value = "PicoCPU")]
        project: String,

        /// Specification files to upload
        #[arg(short, long, default_value = "spec.pdf")]
        spec: Vec<String>,

        /// Seed for simulation progress and outcome
        #[arg(long)]
        seed: Option<u64>,

        /// Simulator to run with
        #[arg(long, value_enum)]
        simulator: Option<SimulatorArg>,

        /// Edit the first feature name of the plan before continuing
        #[arg(long)]
        rename_feature: Option<String>,

        /// Start and cancel plan generation once before the real run
        #[arg(long)]
        cancel_first: bool,

        /// Skip backend delays and use a fast simulation clock
        #[arg(long)]
        fast: bool,
    },

    /// List sample projects
    Projects {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the verification plan columns
    Columns {
        /// Only show this sheet (e.g. "Test Cases")
        sheet: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SimulatorArg {
    Vcs,
    Questasim,
    Other,
}

impl From<SimulatorArg> for Simulator {
    fn from(arg: SimulatorArg) -> Self {
        match arg {
            SimulatorArg::Vcs => Self::Vcs,
            SimulatorArg::Questasim => Self::QuestaSim,
            SimulatorArg::Other => Self::Other,
        }
    }
}

struct DemoOptions {
    project: String,
    spec: Vec<String>,
    seed: Option<u64>,
    simulator: Option<SimulatorArg>,
    rename_feature: Option<String>,
    cancel_first: bool,
    fast: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match cli.command {
        Commands::Demo { project, spec, seed, simulator, rename_feature, cancel_first, fast } => {
            let options =
                DemoOptions { project, spec, seed, simulator, rename_feature, cancel_first, fast };
            cmd_demo(options)?;
        }
        Commands::Projects { format } => {
            cmd_projects(&format)?;
        }
        Commands::Columns { sheet } => {
            cmd_columns(sheet.as_deref())?;
        }
        Commands::Config { path } => {
            cmd_config(path)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Run a scripted workspace session.
fn cmd_demo(options: DemoOptions) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_demo(options))
}

async fn run_demo(options: DemoOptions) -> Result<()> {
    let mut config = Config::load()?;
    if options.seed.is_some() {
        config.simulation.seed = options.seed;
    }
    let generator = if options.fast {
        config.simulation.tick_interval_ms = 5;
        config.simulation.finalize_delay_ms = 5;
        SampleGenerationService::instant()
    } else {
        SampleGenerationService::default()
    };
    let mut repository = InMemoryProjectRepository::with_samples(&config.general.projects_dir);
    if !options.fast {
        repository = repository.with_latency(Duration::from_millis(300));
    }
    let mut workspace = Workspace::new(config, Arc::new(repository), Arc::new(generator));

    if let Some(simulator) = options.simulator {
        workspace.update_settings(SimulatorSettings {
            simulator: simulator.into(),
            ..workspace.settings().clone()
        });
    }

    workspace.select_role(Role::User);
    workspace.login()?;

    workspace.create_project(&options.project).await?;
    println!("Created project {} [{}]", options.project, workspace.status());

    let files = options.spec.iter().map(|name| UploadedFile::spec(name.as_str())).collect();
    workspace.upload_spec_files(files).await?;
    println!("Uploaded {} [{}]", options.spec.join(", "), workspace.status());

    if options.cancel_first {
        workspace.generate_plan()?;
        workspace.cancel_plan_generation();
        match workspace.wait_for(OperationKind::PlanGeneration).await {
            Err(WorkspaceError::Cancelled(_)) => {
                println!("Plan generation cancelled [{}]", workspace.status());
            }
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
    }

    workspace.generate_plan()?;
    println!("Generating verification plan...");
    workspace.wait_for(OperationKind::PlanGeneration).await?;
    if let Some(sheets) = workspace.active_sheets() {
        for sheet in sheets.iter() {
            println!("  {:<30} {} rows", sheet.name.as_str(), sheet.rows.len());
        }
    }
    println!("Verification plan ready [{}]", workspace.status());

    if let Some(name) = options.rename_feature {
        workspace.edit_cell(SheetName::VerificationPlan, 0, 1, name)?;
        workspace.save_draft()?;
        println!("Plan edits saved");
    }

    workspace.generate_testbench()?;
    println!("Generating testbench...");
    workspace.wait_for(OperationKind::TestbenchGeneration).await?;
    println!("Testbench ready [{}]", workspace.status());

    workspace.run_simulation()?;
    let mut stdout = io::stdout();
    while let Some(update) = workspace.next_update().await {
        match update {
            OperationUpdate::Progress { kind, percent } => {
                let elapsed = workspace.elapsed(kind).unwrap_or_default();
                write!(stdout, "\rSimulating... {:>3}% ({:.1}s)", percent, elapsed.as_secs_f64())?;
                stdout.flush()?;
            }
            OperationUpdate::Succeeded(OperationKind::Simulation) => {
                writeln!(stdout)?;
                break;
            }
            OperationUpdate::Failed { message, .. } => {
                writeln!(stdout)?;
                anyhow::bail!("Simulation failed: {message}");
            }
            _ => {}
        }
    }
    println!("Report ready [{}]", workspace.status());

    workspace.save_project().await?;

    if let Some(project) = workspace.project() {
        println!();
        println!("History:");
        for entry in &project.history {
            println!("  [{}] {}", entry.timestamp.format("%H:%M:%S"), entry.event);
        }
        println!();
        println!("Log:");
        for entry in &project.logs {
            println!("  {}", entry.display_line());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct ProjectSummary<'a> {
    name: &'a str,
    location: String,
    spec_files: Vec<&'a str>,
    has_plan: bool,
}

/// List sample projects.
fn cmd_projects(format: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let mut workspace = Workspace::with_samples(Config::load()?);
    let projects = rt.block_on(workspace.list_projects())?;

    match format {
        "json" => {
            let summaries: Vec<_> = projects
                .iter()
                .map(|p| ProjectSummary {
                    name: &p.name,
                    location: p.location.display().to_string(),
                    spec_files: p.spec_files.iter().map(|f| f.name.as_str()).collect(),
                    has_plan: p.has_plan(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        "text" => {
            for project in projects {
                let plan = if project.has_plan() { "plan" } else { "no plan" };
                println!(
                    "{:<30} {} spec file(s), {}",
                    project.name,
                    project.spec_files.len(),
                    plan
                );
            }
        }
        _ => anyhow::bail!("Unknown format: {format}. Supported: text, json"),
    }

    Ok(())
}

/// Show the plan column catalogue.
fn cmd_columns(sheet: Option<&str>) -> Result<()> {
    let sheets = match sheet {
        Some(name) => vec![name.parse::<SheetName>()?],
        None => SheetName::ALL.to_vec(),
    };

    for sheet in sheets {
        println!("{sheet}");
        for (header, description) in sheet.columns() {
            println!("  {:<45} {}", header, description);
        }
        println!();
    }

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "nexver", &mut io::stdout());
}

/// Show configuration.
fn cmd_config(show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = Config::load()?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}
