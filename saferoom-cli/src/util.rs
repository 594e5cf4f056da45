use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

use saferoom_core::{DeceptionLog, RecentStats, RoomCatalog, parse_stats_json};

const DECEPTION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds; negative values fold to their magnitude.
pub fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else {
            bail!("invalid seed `{token}`: expected an integer");
        }
    }
    if seeds.is_empty() {
        bail!("no seeds supplied");
    }
    Ok(seeds)
}

/// Stats from inline JSON, a file, or the flat default, in that order.
pub fn load_stats(inline: Option<&str>, file: Option<&Path>) -> Result<RecentStats> {
    if let Some(json) = inline {
        return parse_stats_json(json).context("parsing --stats");
    }
    if let Some(path) = file {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read stats file {}", path.display()))?;
        return parse_stats_json(&json)
            .with_context(|| format!("parsing stats file {}", path.display()));
    }
    Ok(RecentStats::default())
}

pub fn load_catalog(file: Option<&Path>) -> Result<RoomCatalog> {
    let Some(path) = file else {
        return Ok(RoomCatalog::default_catalog().clone());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read room catalog {}", path.display()))?;
    RoomCatalog::from_json(&json).with_context(|| format!("loading room catalog {}", path.display()))
}

/// A missing deception log is not an error; the detector may not have run yet.
pub fn load_deception_log(file: Option<&Path>) -> Result<Option<DeceptionLog>> {
    let Some(path) = file else {
        return Ok(None);
    };
    if !path.exists() {
        log::warn!("deception log {} not found", path.display());
        return Ok(None);
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read deception log {}", path.display()))?;
    let parsed = DeceptionLog::from_json(&json)
        .with_context(|| format!("parsing deception log {}", path.display()))?;
    Ok(Some(parsed))
}

/// Detection time from the log, when it carries a well-formed timestamp.
pub fn deception_timestamp(log: &DeceptionLog) -> Option<NaiveDateTime> {
    if !log.has_detection() {
        return None;
    }
    let raw = log.last_deception_detected.trim();
    match NaiveDateTime::parse_from_str(raw, DECEPTION_TIMESTAMP_FORMAT) {
        Ok(at) => Some(at),
        Err(err) => {
            log::warn!("unreadable deception timestamp `{raw}`: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn temp_file(label: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "saferoom-util-{label}-{}",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn split_csv_trims_and_drops_empty_tokens() {
        assert_eq!(split_csv(" 1, 2,,3 "), vec!["1", "2", "3"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn seeds_accept_signed_values() {
        let seeds = resolve_seeds(&split_csv("7,-9,1337")).unwrap();
        assert_eq!(seeds, vec![7, 9, 1337]);
        assert!(resolve_seeds(&split_csv("seven")).is_err());
        assert!(resolve_seeds(&[]).is_err());
    }

    #[test]
    fn inline_stats_win_over_files() {
        let path = temp_file("stats", r#"{"1":1,"2":1,"3":1,"4":1,"5":1,"6":1,"7":1,"8":1}"#);
        let inline = r#"{"1":2,"2":2,"3":2,"4":2,"5":2,"6":2,"7":2,"8":2}"#;
        let stats = load_stats(Some(inline), Some(&path)).unwrap();
        assert!((stats.total() - 16.0).abs() < 1e-9);

        let from_file = load_stats(None, Some(&path)).unwrap();
        assert!((from_file.total() - 8.0).abs() < 1e-9);
        assert_eq!(load_stats(None, None).unwrap(), RecentStats::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_stats_carry_context() {
        let err = load_stats(Some("[]"), None).unwrap_err();
        assert!(format!("{err:#}").contains("--stats"));
    }

    #[test]
    fn deception_log_is_optional() {
        let missing = std::env::temp_dir().join("saferoom-util-no-such-log.json");
        assert!(load_deception_log(Some(&missing)).unwrap().is_none());
        assert!(load_deception_log(None).unwrap().is_none());

        let path = temp_file(
            "deception",
            r#"{"last_deception_detected":"2024-05-01 21:14:09","recent_clusters":["left"]}"#,
        );
        let log = load_deception_log(Some(&path)).unwrap().unwrap();
        let at = deception_timestamp(&log).unwrap();
        assert_eq!((at.year(), at.month(), at.day()), (2024, 5, 1));
        assert_eq!(at.hour(), 21);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unreadable_timestamps_are_skipped() {
        let log = DeceptionLog {
            last_deception_detected: "yesterday".to_string(),
            recent_clusters: Vec::new(),
        };
        assert!(deception_timestamp(&log).is_none());
        assert!(deception_timestamp(&DeceptionLog::default()).is_none());
    }
}
