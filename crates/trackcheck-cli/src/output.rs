use anyhow::Error;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;

use trackcheck_browsers::scenario::{expectations, Scenario, ScenarioReport};

/// Terminal state of one scenario run.
pub enum RunStatus {
    Passed,
    Failed(Vec<String>),
    Errored(String),
}

pub struct RunOutcome {
    pub browser: String,
    pub scenario: Scenario,
    pub status: RunStatus,
}

impl RunOutcome {
    pub fn from_report(report: ScenarioReport) -> Self {
        let status = if report.failures.is_empty() {
            RunStatus::Passed
        } else {
            RunStatus::Failed(report.failures)
        };
        Self {
            browser: report.browser,
            scenario: report.scenario,
            status,
        }
    }

    pub fn errored(browser: &str, scenario: Scenario, error: &Error) -> Self {
        Self {
            browser: browser.to_string(),
            scenario,
            status: RunStatus::Errored(format!("{error:#}")),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self.status, RunStatus::Passed)
    }
}

/// Print the scenario matrix for one browser.
pub fn print_scenario_table(browser: &str, scenarios: &[Scenario]) {
    println!();
    println!("  {}", "trackcheck".bold());
    println!("  {}", format_args!("{browser} scenario matrix").dimmed());
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Site", "Policy", "Seed", "Checks"]);

    for scenario in scenarios {
        let checks = expectations(browser, scenario)
            .map(|c| c.len())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(scenario.site.as_str()),
            Cell::new(scenario.policy.as_str()),
            Cell::new(scenario.seed.as_str()),
            Cell::new(checks),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} scenarios", scenarios.len().to_string().bold());
    println!();
}

/// Print one finished scenario as it completes.
pub fn print_report(report: &ScenarioReport) {
    let verdict = if report.passed() {
        " PASS ".on_green().black().to_string()
    } else {
        " FAIL ".on_red().white().bold().to_string()
    };

    println!();
    println!(
        "  {} {} {verdict}",
        "▸".bold(),
        format_args!("{} {}", report.browser, report.scenario).bold(),
    );
    for failure in &report.failures {
        println!("    {} {failure}", "✗".red());
    }
}

/// Print the final pass/fail table over all runs.
pub fn print_run_summary(outcomes: &[RunOutcome]) {
    println!();
    println!("  {}", "Results".bold());
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Browser", "Scenario", "Result", "Detail"]);

    for outcome in outcomes {
        let (result_cell, detail) = match &outcome.status {
            RunStatus::Passed => (Cell::new("pass").fg(Color::Green), String::new()),
            RunStatus::Failed(failures) => (
                Cell::new(format!("fail ({})", failures.len())).fg(Color::Red),
                failures.first().cloned().unwrap_or_default(),
            ),
            RunStatus::Errored(message) => {
                (Cell::new("error").fg(Color::DarkYellow), message.clone())
            }
        };
        table.add_row(vec![
            Cell::new(&outcome.browser),
            Cell::new(outcome.scenario.to_string()),
            result_cell,
            Cell::new(detail),
        ]);
    }

    println!("{table}");

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed()).count();
    println!();
    if passed == total {
        println!(
            "  {} scenarios, {}",
            total.to_string().bold(),
            "all passed".green().bold()
        );
    } else {
        println!(
            "  {} scenarios, {} passed, {}",
            total.to_string().bold(),
            passed.to_string().green(),
            format_args!("{} failed", total - passed).red().bold()
        );
    }
    println!();
}
