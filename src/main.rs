use clap::Parser;
use hangar_coordinator::replay::{self, ReplayTransport, Scenario, StepReport};
use hangar_coordinator::runtime::{
    CookieJar, HostEffect, HttpTransport, Page, RecordingHost, ScriptedTransport,
    SimulatedScheduler,
};
use hangar_coordinator::ui::render_text;
use hangar_coordinator::{initialize, Config, Result};
use std::path::PathBuf;
use std::process::ExitCode;

/// Replays a scripted page session against the coordinator.
#[derive(Parser, Debug)]
#[command(name = "hangar-replay", version)]
struct Cli {
    /// Scenario file (TOML).
    scenario: PathBuf,

    /// Coordinator config file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Send requests to this server. Without it, `respond` steps answer them.
    #[arg(long)]
    base_url: Option<String>,

    /// Cookie string the CSRF token is read from, e.g. `csrftoken=abc`.
    #[arg(long, default_value = "")]
    cookie: String,

    /// Tracing filter, overrides the config file.
    #[arg(long)]
    trace_level: Option<String>,

    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hangar-replay: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.trace_level.is_some() {
        config.trace_level.clone_from(&cli.trace_level);
    }

    let scenario = Scenario::from_file(&cli.scenario)?;
    let csrf = CookieJar::new(cli.cookie.as_str(), config.csrf_cookie.as_str());
    let state = initialize(&config, scenario.layout.clone());

    match &cli.base_url {
        Some(base_url) => replay_with(
            cli,
            &config,
            &scenario,
            Page::new(
                state,
                HttpTransport::new(base_url)?,
                SimulatedScheduler::new(),
                csrf,
                RecordingHost::new(),
                &config,
            ),
        ),
        None => replay_with(
            cli,
            &config,
            &scenario,
            Page::new(
                state,
                ScriptedTransport::new(),
                SimulatedScheduler::new(),
                csrf,
                RecordingHost::new(),
                &config,
            ),
        ),
    }
}

fn replay_with<T: ReplayTransport>(
    cli: &Cli,
    config: &Config,
    scenario: &Scenario,
    mut page: Page<T, SimulatedScheduler, CookieJar, RecordingHost>,
) -> Result<()> {
    tracing::info!(
        steps = scenario.steps.len(),
        mount_path = %config.mount_path,
        "replaying scenario"
    );

    let reports = replay::run(&mut page, scenario)?;
    let search_field = page
        .state()
        .filter_form()
        .map_or_else(|| "q".to_string(), |form| form.search_field.clone());
    for report in &reports {
        print_report(report, &search_field);
    }

    let view = page.state().compute_viewmodel();
    println!();
    print!("{}", render_text(&view, !cli.no_color));
    Ok(())
}

fn print_report(report: &StepReport, search_field: &str) {
    match &report.action {
        Some(action) => println!("[{:>6} ms] {action}", report.at_ms),
        None => println!("[{:>6} ms] end", report.at_ms),
    }
    for effect in &report.effects {
        let line = match effect {
            HostEffect::Reload => "reload page".to_string(),
            HostEffect::Navigate(url) => format!("navigate to {url}"),
            HostEffect::Confirm { prompt, answer } => format!("confirm {prompt:?} -> {answer}"),
            HostEffect::Submit { query, origin } => {
                format!("submit filter ({origin:?}) {:?}", query.to_pairs(search_field))
            }
            HostEffect::Spinner(visible) => {
                format!("spinner {}", if *visible { "shown" } else { "hidden" })
            }
        };
        println!("             {line}");
    }
    if report.requests_in_flight > 0 {
        println!("             {} request(s) in flight", report.requests_in_flight);
    }
}
