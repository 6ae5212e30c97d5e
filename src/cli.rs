use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use chrono::{Local, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use itertools::Itertools;

use crate::{
    config::Config,
    constants::{APP_NAME, RESET_PROMPT},
    domain::{Roadmap, TaskId, Tracker},
    error::{Error, Result},
    export,
    progress::FileSlot,
    stats::Stats,
    storage,
};

#[derive(Parser, Debug)]
#[command(name = "roadmap")]
#[command(about = "Checklist progress tracking for a phased roadmap", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "ROADMAP_DATA_DIR",
        help = "Directory holding progress.json"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "ROADMAP_FILE",
        help = "Roadmap definition (JSON) to track instead of the built-in one"
    )]
    pub roadmap: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "List tasks with their ids and status")]
    List {
        #[arg(long, short, help = "Only show this phase (1-based)")]
        phase: Option<usize>,
    },

    #[command(about = "Mark tasks as completed")]
    Check {
        #[arg(required = true, help = "Task ids, e.g. task_0")]
        ids: Vec<String>,
    },

    #[command(about = "Mark tasks as pending")]
    Uncheck {
        #[arg(required = true, help = "Task ids, e.g. task_0")]
        ids: Vec<String>,
    },

    #[command(about = "Flip the completion state of tasks")]
    Toggle {
        #[arg(required = true, help = "Task ids, e.g. task_0")]
        ids: Vec<String>,
    },

    #[command(about = "Show progress statistics")]
    Stats {
        #[arg(long, help = "Print statistics as JSON")]
        json: bool,
    },

    #[command(about = "Export progress")]
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv, help = "Export format")]
        format: ExportFormat,

        #[arg(long, short, help = "Output path [default: <data-dir>/exports/]")]
        out: Option<PathBuf>,
    },

    #[command(about = "Generate a standalone HTML progress report")]
    Report {
        #[arg(long, short, help = "Output path [default: <data-dir>/exports/]")]
        out: Option<PathBuf>,
    },

    #[command(about = "Erase all saved progress")]
    Reset {
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy)]
enum Change {
    Check,
    Uncheck,
    Toggle,
}

fn open_tracker(config: &Config) -> Result<Tracker<FileSlot>> {
    let roadmap = Roadmap::load(config.roadmap_file.as_deref())?;
    Ok(Tracker::open(roadmap, FileSlot::new(config.progress_path())))
}

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn format_stats(stats: &Stats) -> String {
    format!("{:>3}% ({}/{})", stats.percent, stats.completed, stats.total)
}

pub fn list(config: &Config, phase_filter: Option<usize>) -> Result<()> {
    let tracker = open_tracker(config)?;
    let roadmap = tracker.roadmap();

    println!("{}", roadmap.title);
    for phase in &roadmap.phases {
        if phase_filter.is_some_and(|index| index != phase.index) {
            continue;
        }
        let stats = tracker
            .dashboard()
            .phase(phase.index)
            .copied()
            .unwrap_or_default();
        println!();
        println!("{}  {}", phase.title, format_stats(&stats));
        for month in &phase.months {
            println!("  {}", month.title);
            for task in &month.tasks {
                let marker = if task.kind.is_milestone() { " ★" } else { "" };
                println!(
                    "    {} {:<8} {}{}",
                    checkbox(task.completed),
                    task.id,
                    task.text,
                    marker
                );
            }
        }
    }
    Ok(())
}

fn apply_change(config: &Config, ids: &[String], change: Change) -> Result<()> {
    let mut tracker = open_tracker(config)?;

    let ids: Vec<TaskId> = ids.iter().map(TaskId::new).collect();
    if let Some(unknown) = ids.iter().find(|id| tracker.roadmap().task(id).is_none()) {
        return Err(Error::UnknownTask(unknown.to_string()));
    }

    for id in &ids {
        let completed = match change {
            Change::Check => {
                tracker.set_task_state(id, true)?;
                true
            }
            Change::Uncheck => {
                tracker.set_task_state(id, false)?;
                false
            }
            Change::Toggle => tracker.toggle(id)?,
        };
        let text = tracker
            .roadmap()
            .task(id)
            .map(|task| task.text.as_str())
            .unwrap_or_default();
        println!("{} {} {}", checkbox(completed), id, text);
    }

    let notice = tracker.save()?;
    tracing::info!(
        changed = ids.len(),
        path = %tracker.store().slot().path().display(),
        "{notice}"
    );
    println!(
        "Overall progress: {}",
        format_stats(&tracker.dashboard().overall)
    );
    Ok(())
}

pub fn stats(config: &Config, as_json: bool) -> Result<()> {
    let tracker = open_tracker(config)?;
    let dashboard = tracker.dashboard();

    if as_json {
        println!("{}", serde_json::to_string_pretty(dashboard)?);
        return Ok(());
    }

    println!("{}", tracker.roadmap().title);
    println!("{}", "-".repeat(48));
    println!("{:32} {}", "Overall", format_stats(&dashboard.overall));
    println!("{:32} {}", "Milestones", format_stats(&dashboard.milestones));
    println!("{}", "-".repeat(48));
    for phase in &dashboard.phases {
        println!("{:32} {}", phase.title, format_stats(&phase.stats));
    }

    let last_saved = tracker
        .snapshot()
        .last_saved
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!("{}", "-".repeat(48));
    println!("Last saved: {}", last_saved);
    Ok(())
}

pub fn export_progress(
    config: &Config,
    format: ExportFormat,
    out_path: Option<PathBuf>,
) -> Result<()> {
    let tracker = open_tracker(config)?;
    let today = Local::now().date_naive();

    let content = match format {
        ExportFormat::Csv => export::render_csv(tracker.roadmap(), today)?,
        ExportFormat::Json => export::render_json(
            tracker.roadmap(),
            tracker.snapshot(),
            tracker.dashboard(),
            Utc::now(),
        )?,
    };

    match (format, out_path) {
        (_, Some(path)) => {
            storage::write_text_file(&path, &content)?;
            println!("Exported to {}", path.display());
        }
        (ExportFormat::Csv, None) => {
            let path = config.exports_dir().join(export::csv_file_name(today));
            storage::write_text_file(&path, &content)?;
            println!("Exported to {}", path.display());
        }
        (ExportFormat::Json, None) => println!("{}", content),
    }

    Ok(())
}

pub fn report(config: &Config, out_path: Option<PathBuf>) -> Result<()> {
    let tracker = open_tracker(config)?;
    let today = Local::now().date_naive();
    let html = export::render_report(tracker.roadmap(), tracker.dashboard(), today);

    let path =
        out_path.unwrap_or_else(|| config.exports_dir().join(export::report_file_name(today)));
    storage::write_text_file(&path, &html)?;

    let dashboard = tracker.dashboard();
    println!(
        "Overall {} · {}",
        format_stats(&dashboard.overall),
        dashboard
            .phases
            .iter()
            .map(|phase| format!("P{} {}%", phase.index, phase.stats.percent))
            .join(" · ")
    );
    println!("Report written to {}", path.display());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().map_err(|e| Error::io("<stdout>", e))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| Error::io("<stdin>", e))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

pub fn reset(config: &Config, skip_confirm: bool) -> Result<()> {
    if !skip_confirm && !confirm(RESET_PROMPT)? {
        println!("Reset cancelled");
        return Ok(());
    }

    let mut tracker = open_tracker(config)?;
    let notice = tracker.reset()?;
    println!("{}", notice);
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<()> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(Error::UnsupportedShell(shell.to_string())),
    };
    clap_complete::generate(shell, &mut Cli::command(), APP_NAME, &mut io::stdout());
    Ok(())
}

pub fn run_command(command: Command, config: &Config) {
    let result = match command {
        Command::List { phase } => list(config, phase),
        Command::Check { ids } => apply_change(config, &ids, Change::Check),
        Command::Uncheck { ids } => apply_change(config, &ids, Change::Uncheck),
        Command::Toggle { ids } => apply_change(config, &ids, Change::Toggle),
        Command::Stats { json } => stats(config, json),
        Command::Export { format, out } => export_progress(config, format, out),
        Command::Report { out } => report(config, out),
        Command::Reset { yes } => reset(config, yes),
        Command::Completions { shell } => print_completions(&shell),
    };

    if let Err(e) = result {
        tracing::debug!("command failed: {e:?}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
