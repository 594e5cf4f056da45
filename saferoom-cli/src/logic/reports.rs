use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use saferoom_core::numbers::round_even_f64_to_i64;
use saferoom_core::{Analysis, DeceptionLog, RoomCatalog};

use super::simulation::SimulationResult;
use crate::util::deception_timestamp;

const BAR_WIDTH: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomLine {
    pub id: u8,
    pub name: String,
    pub danger: f64,
    pub safety: f64,
    pub adjustments: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalDeception {
    pub detected_at: String,
    pub clusters: Vec<&'static str>,
}

/// Presentation view of one analysis, rooms ordered safest first.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub safest: RoomLine,
    pub deception: bool,
    pub external_deception: Option<ExternalDeception>,
    pub rooms: Vec<RoomLine>,
}

impl AnalysisReport {
    #[must_use]
    pub fn new(
        catalog: &RoomCatalog,
        analysis: &Analysis,
        deception_log: Option<&DeceptionLog>,
    ) -> Self {
        let rooms: Vec<RoomLine> = analysis
            .ranked()
            .into_iter()
            .map(|(room, danger)| RoomLine {
                id: room.get(),
                name: catalog.name(room).to_string(),
                danger,
                safety: analysis.safety_of(room),
                adjustments: analysis
                    .breakdown
                    .iter()
                    .find(|score| score.room == room)
                    .map(|score| score.adjustments.iter().map(|adj| adj.key()).collect())
                    .unwrap_or_default(),
            })
            .collect();
        let safest = rooms
            .iter()
            .find(|line| line.id == analysis.safest.get())
            .cloned()
            .unwrap_or_else(|| RoomLine {
                id: analysis.safest.get(),
                name: catalog.name(analysis.safest).to_string(),
                danger: analysis.danger_of(analysis.safest),
                safety: analysis.safety,
                adjustments: Vec::new(),
            });
        let external_deception = deception_log.filter(|log| log.has_detection()).map(|log| {
            ExternalDeception {
                detected_at: deception_timestamp(log).map_or_else(
                    || log.last_deception_detected.trim().to_string(),
                    |at| at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ),
                clusters: log.clusters().into_iter().map(|c| c.key()).collect(),
            }
        });
        Self {
            safest,
            deception: analysis.deception,
            external_deception,
            rooms,
        }
    }
}

/// Safety as a bar of up to twenty blocks.
#[must_use]
pub fn safety_bar(safety: f64) -> String {
    let blocks = round_even_f64_to_i64(safety / 5.0).clamp(0, BAR_WIDTH);
    let filled = usize::try_from(blocks).unwrap_or_default();
    let empty = usize::try_from(BAR_WIDTH - blocks).unwrap_or_default();
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

pub fn write_analysis(
    out: &mut dyn Write,
    format: ReportFormat,
    report: &AnalysisReport,
) -> Result<()> {
    match format {
        ReportFormat::Console => generate_analysis_console(out, report),
        ReportFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
            Ok(())
        }
        ReportFormat::Markdown => generate_analysis_markdown(out, report),
    }
}

fn generate_analysis_console(out: &mut dyn Write, report: &AnalysisReport) -> Result<()> {
    writeln!(out, "{}", "🛡️  Room Safety".bright_cyan().bold())?;
    writeln!(out, "{}", "==============".cyan())?;
    for line in &report.rooms {
        let label = format!("{} {}", line.id, line.name);
        let bar = safety_bar(line.safety);
        let bar = if line.id == report.safest.id {
            bar.green()
        } else if line.safety < 50.0 {
            bar.red()
        } else {
            bar.yellow()
        };
        writeln!(out, "{label:24} {bar} {:>6.2}%", line.safety)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Safest room: {} ({:.2}% safe)",
        format!("{} {}", report.safest.id, report.safest.name).green().bold(),
        report.safest.safety
    )?;
    if report.deception {
        writeln!(out, "{}", "⚠️  Deception pattern: newest room broke cluster".yellow())?;
    }
    if let Some(external) = &report.external_deception {
        writeln!(
            out,
            "Detector flagged deception at {} (clusters: {})",
            external.detected_at,
            external.clusters.join(", ")
        )?;
    }
    Ok(())
}

fn generate_analysis_markdown(out: &mut dyn Write, report: &AnalysisReport) -> Result<()> {
    writeln!(out, "# Saferoom Analysis\n")?;
    writeln!(
        out,
        "**Safest room**: {} {} ({:.2}% safe)\n",
        report.safest.id, report.safest.name, report.safest.safety
    )?;
    writeln!(out, "| Room | Name | Danger | Safety | Adjustments |")?;
    writeln!(out, "|------|------|--------|--------|-------------|")?;
    for line in &report.rooms {
        writeln!(
            out,
            "| {} | {} | {:.2} | {:.2} | {} |",
            line.id,
            line.name,
            line.danger,
            line.safety,
            line.adjustments.join(", ")
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "- **Deception pattern**: {}",
        if report.deception { "yes" } else { "no" }
    )?;
    if let Some(external) = &report.external_deception {
        writeln!(out, "- **Detector flagged**: {}", external.detected_at)?;
    }
    Ok(())
}

pub fn write_simulations(
    out: &mut dyn Write,
    format: ReportFormat,
    results: &[SimulationResult],
) -> Result<()> {
    match format {
        ReportFormat::Console => generate_simulation_console(out, results),
        ReportFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(results)?)?;
            Ok(())
        }
        ReportFormat::Markdown => generate_simulation_markdown(out, results),
    }
}

fn generate_simulation_console(out: &mut dyn Write, results: &[SimulationResult]) -> Result<()> {
    writeln!(out, "{}", "📊 Simulation Results".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    if results.is_empty() {
        writeln!(out, "No seeds simulated.")?;
        return Ok(());
    }
    for result in results {
        let net = result.net();
        let net_label = if net >= 0 {
            format!("+{net}").green()
        } else {
            net.to_string().red()
        };
        writeln!(out, "{} {}", "Seed".bold(), result.seed.to_string().bold())?;
        writeln!(
            out,
            "   Escapes: {} / Catches: {} ({:.1}% escape rate)",
            result.escapes.to_string().green(),
            result.catches.to_string().red(),
            result.escape_rate()
        )?;
        writeln!(out, "   Longest escape streak: {}", result.longest_escape_streak)?;
        writeln!(
            out,
            "   Substitutions: {}  Camping rounds: {}",
            result.substitutions, result.gim_rounds
        )?;
        writeln!(
            out,
            "   Wagered: {}  Won: {}  Lost: {}  Net: {net_label}",
            result.wagered, result.won, result.lost
        )?;
        writeln!(out)?;
    }
    let total_net: i64 = results.iter().map(SimulationResult::net).sum();
    writeln!(out, "Total net across {} seeds: {total_net}", results.len())?;
    Ok(())
}

fn generate_simulation_markdown(out: &mut dyn Write, results: &[SimulationResult]) -> Result<()> {
    writeln!(out, "# Saferoom Simulation Results\n")?;
    if results.is_empty() {
        writeln!(out, "_No seeds simulated._")?;
        return Ok(());
    }
    writeln!(
        out,
        "| Seed | Rounds | Escapes | Catches | Escape % | Streak | Wagered | Net |"
    )?;
    writeln!(
        out,
        "|------|--------|---------|---------|----------|--------|---------|-----|"
    )?;
    for result in results {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.1} | {} | {} | {} |",
            result.seed,
            result.rounds,
            result.escapes,
            result.catches,
            result.escape_rate(),
            result.longest_escape_streak,
            result.wagered,
            result.net()
        )?;
    }
    Ok(())
}
