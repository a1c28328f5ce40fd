//! Command-line viewer for a review tracker data file.
//!
//! # Responsibility
//! - Load one JSON payload through `revtrack_core` and print its projections.
//! - Keep output plain text so it can be diffed in quick local checks.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::error;
use revtrack_core::views::{AgendaDay, AssignmentFilter, YearMonth};
use revtrack_core::{
    core_version, init_logging, local_today, DataStore, DisplayStatus, Document, FileSource,
    ReviewService, ServiceError, TrackerConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "revtrack", version, about = "Inspect review assignments")]
struct Cli {
    /// JSON data file (overrides the config's `data_path`).
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference date as YYYY-MM-DD; defaults to the local date.
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upcoming and overdue open reviews.
    Dashboard,
    /// Overdue reviews and reviews due within the window.
    Reminders {
        /// Look-ahead in days; must be at least 1.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        window: Option<u32>,
    },
    /// Open reviews from today on, grouped by date.
    Agenda,
    /// Month grid with due reviews per day.
    Calendar {
        /// Month as YYYY-MM; defaults to the month of `--today`.
        #[arg(long, value_parser = parse_month)]
        month: Option<YearMonth>,
    },
    /// Filterable assignment list.
    Assignments {
        #[arg(long)]
        reviewer: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// One review with its derived status.
    Show { id: String },
    /// Registered reviewers.
    Users,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_month(value: &str) -> Result<YearMonth, String> {
    YearMonth::parse(value).ok_or_else(|| format!("expected YYYY-MM, got `{value}`"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match TrackerConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("revtrack: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => TrackerConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("revtrack: logging disabled: {err}");
        }
    }

    let today = cli.today.unwrap_or_else(local_today);
    let store = Arc::new(DataStore::new(FileSource::new(config.data_path.clone())));
    let service = ReviewService::new(store).with_reminder_window(config.reminder_window_days);

    match run(&service, cli.command, today).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={}", err);
            eprintln!("revtrack {}: {err}", core_version());
            ExitCode::FAILURE
        }
    }
}

async fn run(service: &ReviewService, command: Command, today: NaiveDate) -> Result<(), ServiceError> {
    match command {
        Command::Dashboard => {
            let dashboard = service.dashboard(today).await?;
            print_section("Upcoming", &dashboard.upcoming, today);
            print_section("Overdue", &dashboard.overdue, today);
        }
        Command::Reminders { window } => {
            let service = match window {
                Some(days) => service.clone().with_reminder_window(days),
                None => service.clone(),
            };
            let reminders = service.reminders(today).await?;
            print_section("Overdue", &reminders.overdue, today);
            print_section("Due soon", &reminders.due_soon, today);
        }
        Command::Agenda => print_agenda(&service.agenda(today).await?, today),
        Command::Calendar { month } => {
            let month = month.unwrap_or_else(|| YearMonth::containing(today));
            let view = service.month(month, today).await?;
            println!("{}", view.month);
            for day in view.days.iter().filter(|day| !day.documents.is_empty()) {
                let marker = if day.is_today { " (today)" } else { "" };
                println!("  {}{}", day.date, marker);
                for document in &day.documents {
                    println!("    {}", describe(document, today));
                }
            }
        }
        Command::Assignments { reviewer, status } => {
            let filter = AssignmentFilter {
                reviewer,
                status: status.map(DisplayStatus::from),
            };
            let rows = service.assignments(&filter, today).await?;
            if rows.is_empty() {
                println!("No assignments found.");
            }
            for row in rows {
                println!(
                    "{}  {}  {}  [{}]",
                    row.document.due_date,
                    row.document.title,
                    row.document.reviewer_name,
                    row.display_status
                );
            }
        }
        Command::Show { id } => {
            let detail = service.review_detail(&id, today).await?;
            let document = &detail.document;
            println!("id:        {}", document.id);
            println!("title:     {}", document.title);
            println!("reviewer:  {}", document.reviewer_name);
            println!("due:       {}", document.due_date);
            println!("status:    {}", detail.display_status);
            if let Some(start) = &document.start_date {
                println!("started:   {start}");
            }
            if let Some(done) = &document.completion_date {
                println!("completed: {done}");
            }
        }
        Command::Users => {
            for user in service.store().get_users().await? {
                println!("{}  {}", user.id, user.name);
            }
        }
    }
    Ok(())
}

fn describe(document: &Document, today: NaiveDate) -> String {
    format!(
        "{}  {}  {}  [{}]",
        document.due_date,
        document.title,
        document.reviewer_name,
        revtrack_core::effective_status(document, today)
    )
}

fn print_section(heading: &str, documents: &[Document], today: NaiveDate) {
    println!("{heading} ({})", documents.len());
    for document in documents {
        println!("  {}", describe(document, today));
    }
}

fn print_agenda(agenda: &[AgendaDay], today: NaiveDate) {
    if agenda.is_empty() {
        println!("No upcoming reviews.");
        return;
    }
    for day in agenda {
        println!("{}", day.date);
        for document in &day.documents {
            println!("  {}", describe(document, today));
        }
    }
}
