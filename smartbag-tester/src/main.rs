mod glyphs;
mod guide;
mod logic;
mod render;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use smartbag_engine::constants::DEFAULT_SESSION_SEED;
use smartbag_engine::{BaggingConfig, BaggingSession, Catalog};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{LogicTester, ScenarioResult, get_scenario, list_scenarios};
use util::{load_catalog, load_config, split_csv};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TestMode {
    /// Scan a checkout item by item and show the bags
    Simulate,
    /// Run scenario checks against the engine
    Scenarios,
    /// Simulate a checkout, then run scenarios
    Both,
}

impl TestMode {
    const fn simulates(self) -> bool {
        matches!(self, Self::Simulate | Self::Both)
    }

    const fn runs_scenarios(self) -> bool {
        matches!(self, Self::Scenarios | Self::Both)
    }

    /// Whether the checkout transcript goes to `--output`. When scenarios
    /// also run, the report owns that target and the transcript goes to
    /// stdout.
    const fn transcript_to_output(self) -> bool {
        matches!(self, Self::Simulate)
    }
}

#[derive(Debug, Parser)]
#[command(name = "smartbag-tester", version)]
#[command(about = "Checkout bagging simulator and scenario runner for the smart bagging engine")]
struct Args {
    /// Simulate a checkout, run scenarios, or both
    #[arg(long, value_enum, default_value_t = TestMode::Simulate)]
    mode: TestMode,

    /// Items to scan in simulate mode (defaults to the config value, 20)
    #[arg(long)]
    total_items: Option<usize>,

    /// Session seed for simulate mode and the first scenario iteration
    #[arg(long, default_value_t = DEFAULT_SESSION_SEED)]
    seed: u64,

    /// JSON catalog to scan from instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON bagging config (items_per_bag, duplicate_cap, initial_bags, total_items)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenarios to run (comma-separated, "all" for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Number of iterations per scenario
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write output instead of stdout (in both mode, only
    /// the scenario report)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the bagging best-practices guide and exit
    #[arg(long)]
    guide: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? || maybe_print_guide(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let mut output_target = OutputTarget::new(args.output.clone())?;

    if args.mode.simulates() {
        let catalog = load_catalog(args.catalog.as_deref())?;
        let config = load_config(args.config.as_deref())?;
        if args.mode.transcript_to_output() {
            run_simulation(&args, &catalog, &config, &mut output_target)?;
        } else {
            let mut transcript = BufWriter::new(stdout());
            run_simulation(&args, &catalog, &config, &mut transcript)?;
            transcript.flush()?;
        }
    }

    let results = run_logic_scenarios(&args, &expand_scenarios(&args.scenarios));
    if args.mode.runs_scenarios() {
        write_reports(&args, &mut output_target, &results, start_time)?;
    }
    output_target.flush_inner()?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn maybe_print_guide(args: &Args) -> Result<bool> {
    if !args.guide {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    guide::write_guide(output_target.writer())?;
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🛍 Smart Bagging Tester".bright_cyan().bold());
    println!("{}", "=======================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        scenarios.extend(list_scenarios().into_iter().map(|(key, _)| key.to_string()));
    }
    scenarios
}

/// Scan every item of a fresh session, printing each toast and the final bags.
fn run_simulation(
    args: &Args,
    catalog: &Catalog,
    config: &BaggingConfig,
    out: &mut dyn Write,
) -> Result<()> {
    let config = match args.total_items {
        Some(total_items) => config.clone().with_total_items(total_items),
        None => config.clone(),
    };
    let mut session = BaggingSession::new(catalog, &config, args.seed)
        .context("could not start a bagging session")?;
    let items_per_bag = session.limits().items_per_bag;

    writeln!(out, "{}", "🛒 Simulated Checkout".bright_green().bold())?;
    writeln!(out, "{}", "-".repeat(30).green())?;

    loop {
        if let Some(item) = session.peek_next() {
            render::write_scan(out, item)?;
        }
        match session.place_next() {
            Ok(step) => {
                render::write_toast(out, &step.event)?;
                session = step.session;
                render::write_progress(out, session.progress())?;
                render::write_next_item(out, session.peek_next())?;
                if args.verbose {
                    render::write_bags(out, session.bags(), items_per_bag)?;
                }
            }
            Err(err) if err.is_exhausted() => {
                render::write_exhausted(out, &err)?;
                break;
            }
            Err(err) => return Err(err).context("bagging step failed"),
        }
    }

    writeln!(out)?;
    render::write_bags(out, session.bags(), items_per_bag)?;
    render::write_progress(out, session.progress())?;
    Ok(())
}

fn run_logic_scenarios(args: &Args, scenarios: &[String]) -> Vec<ScenarioResult> {
    let mut results: Vec<ScenarioResult> = Vec::new();
    if !args.mode.runs_scenarios() {
        return results;
    }

    println!("{}", "🧠 Running Scenario Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.verbose);

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, &[args.seed], args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(
    args: &Args,
    output_target: &mut OutputTarget,
    results: &[ScenarioResult],
    start_time: Instant,
) -> Result<()> {
    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    output_target,
                    "# Smart Bagging Scenario Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(output_target)?;
            writeln!(output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            mode: TestMode::Simulate,
            total_items: None,
            seed: 1337,
            catalog: None,
            config: None,
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            iterations: 1,
            report: "json".to_string(),
            output: None,
            guide: false,
            verbose: false,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("smartbag-{label}-{}", std::process::id()))
    }

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Smoke Test".to_string(),
            seed: 1337,
            passed,
            iterations_run: 3,
            successful_iterations: if passed { 3 } else { 2 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["failure".to_string()]
            },
            average_duration: Duration::from_millis(10),
            performance_data: vec![Duration::from_millis(10)],
        }
    }

    fn report_text(args: &Args, results: &[ScenarioResult], label: &str) -> String {
        let path = temp_path(label);
        let mut target = OutputTarget::new(Some(path.clone())).unwrap();
        write_reports(args, &mut target, results, Instant::now()).unwrap();
        std::fs::read_to_string(path).unwrap()
    }

    fn simulate(args: &Args) -> String {
        let catalog = Catalog::load_default().unwrap();
        let mut buffer = Vec::new();
        run_simulation(args, &catalog, &BaggingConfig::default(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let expanded = expand_scenarios("all,smoke");
        assert!(expanded.contains(&"smoke".to_string()));
        assert!(expanded.contains(&"shared-session".to_string()));
        assert!(!expanded.contains(&"all".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        let expanded = expand_scenarios("overflow, smoke");
        assert_eq!(expanded, vec!["overflow".to_string(), "smoke".to_string()]);
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_path("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("chemical-isolation"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn maybe_print_guide_writes_tips() {
        let temp = temp_path("guide.txt");
        let args = Args {
            guide: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_print_guide(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Separate Chemicals"));
    }

    #[test]
    fn simulation_prints_toasts_until_exhausted() {
        let text = simulate(&base_args());
        assert!(text.contains("Barcode scanned successfully"));
        assert!(text.contains("Bagged: Milk"));
        assert!(text.contains("Placed in Bag 1 at bottom position"));
        assert!(text.contains("Opened Bag 4"));
        assert!(text.contains("All items processed"));
        assert!(text.contains("20 of 20 items bagged"));
        assert!(text.contains("Bag 5"));
    }

    #[test]
    fn simulation_honors_total_items_override() {
        let args = Args {
            total_items: Some(3),
            ..base_args()
        };
        let text = simulate(&args);
        assert!(text.contains("3 of 3 items bagged"));
        assert!(!text.contains("Bag 4"));
    }

    #[test]
    fn only_simulate_mode_sends_transcript_to_output() {
        assert!(TestMode::Simulate.transcript_to_output());
        assert!(!TestMode::Both.transcript_to_output());
        assert!(!TestMode::Scenarios.transcript_to_output());
    }

    #[test]
    fn run_logic_scenarios_skips_in_simulate_mode() {
        let results = run_logic_scenarios(&base_args(), &["smoke".to_string()]);
        assert!(results.is_empty());
    }

    #[test]
    fn run_logic_scenarios_runs_known_and_skips_unknown() {
        let args = Args {
            mode: TestMode::Scenarios,
            ..base_args()
        };
        let results =
            run_logic_scenarios(&args, &["smoke".to_string(), "nonexistent".to_string()]);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{:?}", results[0].failures);
    }

    #[test]
    fn write_reports_emits_json_output() {
        let content = report_text(&base_args(), &[], "empty.json");
        assert!(content.contains("[]"));
    }

    #[test]
    fn write_reports_emits_json_for_results() {
        let content = report_text(&base_args(), &[sample_result(true)], "full.json");
        assert!(content.contains("scenario_name"));
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let args = Args {
            report: "markdown".to_string(),
            ..base_args()
        };
        let content = report_text(&args, &[], "empty.md");
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_emits_markdown_report() {
        let args = Args {
            report: "markdown".to_string(),
            ..base_args()
        };
        let content = report_text(&args, &[sample_result(false)], "full.md");
        assert!(content.contains("# Smart Bagging Scenario Results"));
        assert!(content.contains("failure"));
    }

    #[test]
    fn write_reports_emits_console_report() {
        let args = Args {
            report: "console".to_string(),
            ..base_args()
        };
        let content = report_text(&args, &[sample_result(true)], "console.txt");
        assert!(content.contains("Scenario Results Summary"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
