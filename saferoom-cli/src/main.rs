mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdin, stdout};
use std::path::PathBuf;

use logic::{
    AnalysisReport, ReportFormat, run_session, run_simulations, write_analysis, write_simulations,
};
use saferoom_core::{
    AdvisorSession, RoomCatalog, TransitionTable, analyze, parse_recent_rooms, parse_room_list,
};
use util::{load_catalog, load_deception_log, load_stats, resolve_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Score one recent window and list every room's safety
    Analyze,
    /// Feed observed rooms line by line and get live advice
    Session,
    /// Replay a seeded synthetic killer against the advisor
    Simulate,
}

#[derive(Debug, Parser)]
#[command(name = "saferoom", version)]
#[command(about = "Safe-room advisor - danger scoring, suggestions and wager sizing")]
struct Args {
    /// What to run: analyze (one-shot), session (interactive) or simulate (seeded)
    #[arg(long, value_enum, default_value_t = Mode::Analyze)]
    mode: Mode,

    /// Recent rooms, oldest first (exactly ten for analyze)
    #[arg(long)]
    recent: Option<String>,

    /// Inline stats JSON keyed by room id, e.g. {"1": 12, ...}
    #[arg(long)]
    stats: Option<String>,

    /// Path to a stats JSON file (ignored when --stats is given)
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// Path to a room catalog JSON replacing the bundled room names
    #[arg(long)]
    rooms_file: Option<PathBuf>,

    /// Path to the external deception detector's log
    #[arg(long)]
    deception_log: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seeds to simulate (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Rounds per simulated seed
    #[arg(long, default_value_t = 200)]
    rounds: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.report == ReportFormat::Console || args.mode == Mode::Session {
        announce_banner();
    }

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.mode {
        Mode::Analyze => run_analyze(&args, output_target.writer())?,
        Mode::Session => run_interactive(&args, &mut output_target)?,
        Mode::Simulate => run_simulate(&args, output_target.writer())?,
    }
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🚪 Saferoom Advisor".bright_cyan().bold());
    println!("{}", "===================".cyan());
}

fn run_analyze(args: &Args, out: &mut dyn Write) -> Result<()> {
    let Some(recent_arg) = args.recent.as_deref() else {
        bail!("--recent is required in analyze mode");
    };
    let recent = parse_recent_rooms(recent_arg).context("parsing --recent")?;
    let catalog = load_catalog(args.rooms_file.as_deref())?;
    let stats = load_stats(args.stats.as_deref(), args.stats_file.as_deref())?;
    let deception_log = load_deception_log(args.deception_log.as_deref())?;

    let mut table = TransitionTable::new();
    let analysis = analyze(&catalog, &recent, &stats, &mut table);
    let report = AnalysisReport::new(&catalog, &analysis, deception_log.as_ref());
    write_analysis(out, args.report, &report)
}

fn build_session(args: &Args, catalog: RoomCatalog) -> Result<AdvisorSession> {
    let stats = load_stats(args.stats.as_deref(), args.stats_file.as_deref())?;
    let recent = match args.recent.as_deref() {
        Some(raw) => parse_room_list(raw).context("parsing --recent")?,
        None => Vec::new(),
    };
    Ok(AdvisorSession::seeded(catalog, &recent, stats))
}

fn run_interactive(args: &Args, output_target: &mut OutputTarget) -> Result<()> {
    let catalog = load_catalog(args.rooms_file.as_deref())?;
    let mut session = build_session(args, catalog)?;
    let summary = run_session(&mut session, stdin().lock(), output_target)?;
    log::info!(
        "session closed after {} rounds ({} rejected, {} resets)",
        summary.rounds,
        summary.rejected,
        summary.resets
    );
    writeln!(output_target, "🏁 {} rounds advised", summary.rounds)?;
    Ok(())
}

fn run_simulate(args: &Args, out: &mut dyn Write) -> Result<()> {
    let catalog = load_catalog(args.rooms_file.as_deref())?;
    let seeds = resolve_seeds(&split_csv(&args.seeds))?;
    let results = run_simulations(&catalog, &seeds, args.rounds);
    write_simulations(out, args.report, &results)
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

    fn base_args() -> Args {
        Args {
            mode: Mode::Analyze,
            recent: Some("1 2 3 4 5 6 7 8 1 2".to_string()),
            stats: None,
            stats_file: None,
            rooms_file: None,
            deception_log: None,
            report: ReportFormat::Json,
            output: None,
            seeds: "1337".to_string(),
            rounds: 20,
            verbose: false,
        }
    }

    #[test]
    fn analyze_writes_json_report() {
        let mut buffer = Vec::new();
        run_analyze(&base_args(), &mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["safest"]["id"], 3);
        assert_eq!(json["rooms"].as_array().map(Vec::len), Some(8));
    }

    #[test]
    fn analyze_requires_ten_rooms() {
        let mut args = base_args();
        args.recent = Some("1 2 3".to_string());
        let err = run_analyze(&args, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("exactly 10"));

        args.recent = None;
        assert!(run_analyze(&args, &mut Vec::new()).is_err());
    }

    #[test]
    fn session_seeding_accepts_short_windows() {
        let mut args = base_args();
        args.recent = Some("4,4".to_string());
        let session = build_session(&args, RoomCatalog::numbered()).unwrap();
        assert_eq!(session.state().recent.len(), 2);
    }

    #[test]
    fn simulate_reports_each_seed() {
        let mut args = base_args();
        args.mode = Mode::Simulate;
        args.seeds = "1,2,3".to_string();
        let mut buffer = Vec::new();
        run_simulate(&args, &mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(3));
        assert_eq!(json[0]["rounds"], 20);
    }
}
