use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

use saferoom_core::{AdvisorSession, GimLevel, RoundAdvice, parse_room};

/// One parsed line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Observe(String),
    Reset,
    State,
    Quit,
    Blank,
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Self::Blank,
            "reset" => Self::Reset,
            "state" => Self::State,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Observe(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds: usize,
    pub rejected: usize,
    pub resets: usize,
}

/// Drive `session` from line input until `quit` or end of input. Bad room
/// ids are reported and the loop keeps going.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut AdvisorSession,
    input: R,
    out: &mut W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();
    writeln!(
        out,
        "Enter the room the killer entered (1-8), `reset`, `state` or `quit`."
    )?;

    for line in input.lines() {
        match Command::parse(&line?) {
            Command::Blank => {}
            Command::Quit => break,
            Command::Reset => {
                session.reset();
                summary.resets += 1;
                writeln!(out, "🔄 Session reset")?;
            }
            Command::State => {
                writeln!(out, "{}", serde_json::to_string(session.state())?)?;
            }
            Command::Observe(token) => match parse_room(&token) {
                Ok(room) => {
                    let advice = session.observe(room);
                    summary.rounds += 1;
                    write_advice(out, session, &advice)?;
                }
                Err(err) => {
                    summary.rejected += 1;
                    writeln!(out, "❌ {err}")?;
                }
            },
        }
        out.flush()?;
    }
    Ok(summary)
}

fn write_advice<W: Write>(
    out: &mut W,
    session: &AdvisorSession,
    advice: &RoundAdvice,
) -> Result<()> {
    let name = session.catalog().name(advice.suggestion);
    writeln!(
        out,
        "➡️  Hide in {} ({:.2}% safe), build {}",
        format!("{} {name}", advice.suggestion).green().bold(),
        advice.safety,
        advice.build().to_string().bold()
    )?;
    if advice.substituted {
        writeln!(
            out,
            "   {} was suggested too often; switched",
            advice.candidate
        )?;
    }
    match advice.gim {
        GimLevel::Triple => writeln!(out, "   {}", "Killer camping: wager pinned".red())?,
        GimLevel::Double => writeln!(out, "   {}", "Killer lingering: wager capped".yellow())?,
        GimLevel::None => {}
    }
    if advice.deception {
        writeln!(out, "   {}", "Deception pattern detected".yellow())?;
    }
    Ok(())
}
