use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use trackcheck_browsers::scenario::{self, Policy, Scenario, Seed, Site};
use trackcheck_core::adsplog::AdspLog;
use trackcheck_core::config::{config_path, load_config, HarnessConfig};
use trackcheck_core::device_id::extract_device_ids;

mod output;

const BROWSERS: [&str; 2] = ["chromium", "firefox"];

#[derive(Parser)]
#[command(
    name = "trackcheck",
    about = "trackcheck — cookie-policy verification harness for the tracking pipeline"
)]
#[command(version)]
struct Cli {
    /// Path to the harness configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the scenario matrix
    List {
        /// Restrict to one browser (chromium, firefox)
        #[arg(short, long)]
        browser: Option<String>,
    },

    /// Run scenarios against the live browsers
    Run {
        /// Browser to run (runs both if omitted)
        #[arg(short, long)]
        browser: Option<String>,

        /// Restrict to one site (publisher, click_to_advertiser)
        #[arg(long)]
        site: Option<String>,

        /// Restrict to one policy (all, only_1, nothing, only_3)
        #[arg(long)]
        policy: Option<String>,

        /// Restrict to one seed (all_empty, first_only, third_only,
        /// same_device, different_devices)
        #[arg(long)]
        seed: Option<String>,
    },

    /// Flush cookie stores, restore preferences and clear blacklists
    Reset {
        /// Browser to reset (resets both if omitted)
        browser: Option<String>,
    },

    /// Run the device-id extractor over a literal cookie value
    Extract {
        /// Raw cookie value
        value: String,
    },

    /// Show the device ids from the latest tracking-log line
    Log,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { browser }) => cmd_list(browser.as_deref()),
        Some(Commands::Run {
            browser,
            site,
            policy,
            seed,
        }) => {
            let config = load(&cli.config)?;
            cmd_run(&config, browser.as_deref(), site, policy, seed)
        }
        Some(Commands::Reset { browser }) => {
            let config = load(&cli.config)?;
            cmd_reset(&config, browser.as_deref())
        }
        Some(Commands::Extract { value }) => cmd_extract(&value),
        Some(Commands::Log) => {
            let config = load(&cli.config)?;
            cmd_log(&config)
        }
        None => cmd_list(None),
    }
}

fn load(explicit: &Option<PathBuf>) -> Result<HarnessConfig> {
    load_config(&config_path(explicit.as_deref()))
}

fn browser_names(filter: Option<&str>) -> Result<Vec<&'static str>> {
    match filter {
        None => Ok(BROWSERS.to_vec()),
        Some(name) => match BROWSERS.iter().find(|b| **b == name) {
            Some(found) => Ok(vec![found]),
            None => {
                eprintln!("Unknown browser: {name}");
                eprintln!("Known browsers: {}", BROWSERS.join(", "));
                std::process::exit(1);
            }
        },
    }
}

fn cmd_list(browser: Option<&str>) -> Result<()> {
    for name in browser_names(browser)? {
        let scenarios = scenario::all_scenarios(name);
        output::print_scenario_table(name, &scenarios);
    }
    Ok(())
}

fn cmd_run(
    config: &HarnessConfig,
    browser: Option<&str>,
    site: Option<String>,
    policy: Option<String>,
    seed: Option<String>,
) -> Result<()> {
    let site: Option<Site> = site.as_deref().map(str::parse).transpose()?;
    let policy: Option<Policy> = policy.as_deref().map(str::parse).transpose()?;
    let seed: Option<Seed> = seed.as_deref().map(str::parse).transpose()?;

    let matches = |s: &Scenario| {
        site.map_or(true, |v| v == s.site)
            && policy.map_or(true, |v| v == s.policy)
            && seed.map_or(true, |v| v == s.seed)
    };

    let mut outcomes = Vec::new();
    for name in browser_names(browser)? {
        let Some(target) = trackcheck_browsers::get_browser(name, config) else {
            continue;
        };

        println!();
        println!("  {}", "trackcheck".bold());
        println!("  {}", format_args!("{name} scenarios").dimmed());

        for s in scenario::all_scenarios(name).into_iter().filter(matches) {
            match scenario::run_scenario(target.as_ref(), config, &s) {
                Ok(report) => {
                    output::print_report(&report);
                    outcomes.push(output::RunOutcome::from_report(report));
                }
                Err(e) => {
                    eprintln!("Error running {name} {s}: {e:#}");
                    outcomes.push(output::RunOutcome::errored(name, s, &e));
                }
            }
        }
    }

    if outcomes.is_empty() {
        eprintln!("No scenarios matched the given filters.");
        std::process::exit(1);
    }

    output::print_run_summary(&outcomes);

    if outcomes.iter().any(|o| !o.passed()) {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_reset(config: &HarnessConfig, browser: Option<&str>) -> Result<()> {
    for name in browser_names(browser)? {
        let Some(target) = trackcheck_browsers::get_browser(name, config) else {
            continue;
        };

        print!("  {} {name}: ", "▸".bold());

        match target.open_cookies().and_then(|store| {
            store.flush()?;
            store.close()
        }) {
            Ok(()) => print!("{}", "store flushed".green()),
            Err(e) => print!("{}", format_args!("store flush failed ({e})").red()),
        }

        // A missing backup just means no run ever changed the prefs.
        match target.prefs().restore() {
            Ok(()) => print!(", {}", "prefs restored".green()),
            Err(e) => print!(", {}", format_args!("prefs not restored ({e})").yellow()),
        }

        match target.flush_blacklist() {
            Ok(()) => println!(", {}", "blacklist cleared".green()),
            Err(e) => println!(", {}", format_args!("blacklist not cleared ({e})").red()),
        }
    }
    Ok(())
}

fn cmd_extract(value: &str) -> Result<()> {
    let ids = extract_device_ids(value);
    if ids.is_empty() {
        println!("(no device ids)");
    } else {
        for id in ids {
            println!("{id}");
        }
    }
    Ok(())
}

fn cmd_log(config: &HarnessConfig) -> Result<()> {
    let adsplog = AdspLog::for_hour(&config.adsp_log_dir, Local::now());
    let line = adsplog.last_line()?;
    let ids = adsplog.device_ids(&line)?;

    println!("{}", line.dimmed());
    if ids.is_empty() {
        println!("(no device ids)");
    } else {
        for id in ids {
            println!("{id}");
        }
    }
    Ok(())
}
