//! Fern dashboard CLI.
//!
//! Usage:
//!   fern-dashboard runs [--pages N]
//!   fern-dashboard groups
//!   fern-dashboard heatmap
//!   fern-dashboard summary [--project <name>]
//!   fern-dashboard preference
//!   fern-dashboard timezones
//!   fern-dashboard --health-check

use std::env;

use fern_dashboard_lib::AppState;
use fern_dashboard_lib::config::Config;
use fern_dashboard_lib::error::AppError;
use fern_dashboard_lib::services::{
    FetchOutcome, colored_unique_tags, fetch_project_history, fetch_project_names, group_options,
    run_duration, spec_run_ratio, status_counts, timezone_options,
};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Pages fetched by `runs` when `--pages` is not given.
const DEFAULT_PAGES: usize = 1;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // Check for --health-check flag (configuration must load)
    if args.iter().any(|arg| arg == "--health-check") {
        std::process::exit(if Config::from_env().is_ok() { 0 } else { 1 });
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, FERN_REPORTER_BASE_URL and FERN_REPORTER_GRAPHQL_BASE_URL must be set");
            std::process::exit(1);
        }
    };

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode against {}", config.api_base_url);
    }

    let state = match AppState::connect(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to create backend client: {}", e);
            std::process::exit(1);
        }
    };

    let command = args[1].as_str();
    let result = match command {
        "runs" => list_runs(&state, parse_pages_arg(&args)).await,
        "groups" => list_groups(&state).await,
        "heatmap" => show_heatmap(&state).await,
        "summary" => match parse_flag(&args, "--project") {
            Some(project) => show_summary(&state, &project).await,
            None => list_projects(&state).await,
        },
        "preference" => show_preference(&state).await,
        "timezones" => {
            for option in timezone_options() {
                println!("{}", option.value);
            }
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e.notice());
        std::process::exit(1);
    }
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let mut i = 2;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn parse_pages_arg(args: &[String]) -> usize {
    match parse_flag(args, "--pages") {
        Some(value) => match value.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                eprintln!("Error: --pages must be a positive number");
                std::process::exit(1);
            }
        },
        None => DEFAULT_PAGES,
    }
}

async fn list_runs(state: &AppState, pages: usize) -> Result<(), AppError> {
    let pager = state.test_run_pager();
    for _ in 0..pages {
        if let FetchOutcome::Skipped(_) = pager.fetch_next().await? {
            break;
        }
    }

    let snapshot = pager.snapshot();
    println!();
    println!(
        "{:<8} {:<32} {:<8} {:<8} {:<8} {:<8} {:<16}",
        "ID", "PROJECT", "PASSED", "FAILED", "SKIPPED", "RATIO", "DURATION"
    );
    println!("{}", "-".repeat(94));

    for run in &snapshot.records {
        let counts = status_counts(run);
        println!(
            "{:<8} {:<32} {:<8} {:<8} {:<8} {:<8} {:<16}",
            run.id,
            truncate(&run.test_project_name, 30),
            counts.passed,
            counts.failed,
            counts.skipped,
            spec_run_ratio(run),
            run_duration(run).unwrap_or_else(|| "-".to_string()),
        );

        let tags = colored_unique_tags(run.spec_runs());
        if !tags.is_empty() {
            let rendered: Vec<String> = tags
                .iter()
                .map(|t| format!("{} ({})", t.name, t.color))
                .collect();
            println!("         tags: {}", rendered.join(", "));
        }
    }

    println!();
    println!(
        "Showing {} of {} test runs{}",
        snapshot.records.len(),
        snapshot.total_count,
        if snapshot.has_more { " (more available)" } else { "" }
    );
    Ok(())
}

async fn list_groups(state: &AppState) -> Result<(), AppError> {
    let mut manager = state.group_manager();
    let groups = manager.fetch_groups().await?;

    if groups.is_empty() {
        println!("No project groups found.");
        return Ok(());
    }

    println!();
    for group in groups {
        let id = group
            .group_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("[{}] {} ({} projects)", id, group.group_name, group.projects.len());
        for project in &group.projects {
            println!("    {}  {}", project.uuid, project.name);
        }
    }

    println!();
    let options: Vec<String> = group_options(groups)
        .into_iter()
        .map(|o| format!("{}={}", o.label, o.value))
        .collect();
    println!("Options: {}", options.join(", "));
    Ok(())
}

async fn show_heatmap(state: &AppState) -> Result<(), AppError> {
    let heatmaps = state.heatmap_builder().build_group_heatmaps().await?;

    for heatmap in heatmaps {
        println!();
        println!(
            "{} ({}x{})",
            heatmap.group_name, heatmap.grid.rows, heatmap.grid.cols
        );
        for row in heatmap.tiles.chunks(heatmap.grid.cols.max(1)) {
            let cells: Vec<String> = row
                .iter()
                .map(|tile| format!("{:<10}", truncate(&tile.status, 10)))
                .collect();
            println!("  {}", cells.join(" "));
        }
    }
    Ok(())
}

async fn list_projects(state: &AppState) -> Result<(), AppError> {
    let projects = fetch_project_names(state.api.as_ref()).await?;

    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    println!();
    for project in &projects {
        println!("  {}", project);
    }
    println!();
    println!("{} projects. Use --project <name> for a run history.", projects.len());
    Ok(())
}

async fn show_summary(state: &AppState, project: &str) -> Result<(), AppError> {
    let history = fetch_project_history(state.api.as_ref(), project).await?;

    if history.is_empty() {
        println!("No test data available.");
        return Ok(());
    }

    println!();
    println!(
        "Total tests: {}  Passed: {}  Failed: {}",
        history.total, history.passed, history.failed
    );
    for entry in &history.entries {
        println!(
            "  {:<8} {:<32} {}",
            entry.suite_run_id,
            truncate(&entry.suite_name, 30),
            entry.pass_label()
        );
    }
    Ok(())
}

async fn show_preference(state: &AppState) -> Result<(), AppError> {
    let preference = state.preferences.load().await?;
    info!("Preference loaded");
    println!(
        "Theme: {}  Timezone: {}",
        if preference.is_dark { "dark" } else { "light" },
        preference.timezone
    );
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: fern-dashboard <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  runs [--pages N]            List test runs, N pages at a time");
    eprintln!("  groups                      List project groups");
    eprintln!("  heatmap                     Show each group's latest-run heatmap");
    eprintln!("  summary                     List projects with reported runs");
    eprintln!("  summary --project <name>    Show a project's run history");
    eprintln!("  preference                  Show theme and timezone");
    eprintln!("  timezones                   List selectable timezones");
    eprintln!("  help                        Show this help");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --health-check              Exit 0 if configuration loads");
    eprintln!();
}
