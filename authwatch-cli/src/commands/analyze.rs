//! `authwatch analyze` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use authwatch_analyzer::{AuthLogParser, IncidentSummary, RuleEngine};
use authwatch_core::config::AuthwatchConfig;
use authwatch_core::types::{Event, Incident, Severity};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Path that selects stdin instead of a file.
const STDIN_PATH: &str = "-";

/// Execute the `analyze` command.
///
/// Reads every input in order, parses each into events, then runs the rule
/// engine once over the concatenated event list.
///
/// # Errors
///
/// * `CliError::Io` if an input cannot be read
/// * `CliError::Analyzer` if the parser or rule engine cannot be built from config
/// * `CliError::IncidentsFound` if `--fail-on` is set and the threshold is reached
pub async fn execute(
    args: AnalyzeArgs,
    config: &AuthwatchConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let parser = AuthLogParser::from_config(&config.analyzer)?;
    let engine = RuleEngine::from_config(&config.analyzer)?;

    let mut events: Vec<Event> = Vec::new();
    let mut sources = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let content = read_input(path).await?;
        let parsed = parser.parse_content(&content);
        debug!(path = %path.display(), events = parsed.len(), "input parsed");
        events.extend(parsed);
        sources.push(path.display().to_string());
    }

    let incidents = engine.analyze(&events);
    info!(
        files = sources.len(),
        events = events.len(),
        incidents = incidents.len(),
        "analysis complete"
    );

    let threshold_hits = args
        .fail_on
        .map(Severity::from)
        .map(|threshold| (threshold, count_at_or_above(&incidents, threshold)));

    let min_severity = args.min_severity.map(Severity::from).unwrap_or_default();
    let reported: Vec<Incident<'_>> = incidents
        .into_iter()
        .filter(|incident| incident.severity >= min_severity)
        .collect();

    let summary = args
        .summary
        .then(|| IncidentSummary::from_incidents(&reported));

    let report = AnalyzeReport {
        sources,
        events: events.len(),
        incidents: reported,
        summary,
    };
    writer.render(&report)?;

    if let Some((threshold, count)) = threshold_hits {
        if count > 0 {
            return Err(CliError::IncidentsFound { count, threshold });
        }
    }

    Ok(())
}

/// Read one input to a string. `-` reads stdin to EOF.
async fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new(STDIN_PATH) {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        return Ok(content);
    }

    tokio::fs::read_to_string(path).await.map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

fn count_at_or_above(incidents: &[Incident<'_>], threshold: Severity) -> usize {
    incidents
        .iter()
        .filter(|incident| incident.severity >= threshold)
        .count()
}

/// Result of an `analyze` run.
#[derive(Serialize)]
pub struct AnalyzeReport<'a> {
    /// Inputs in the order they were read
    pub sources: Vec<String>,
    /// Number of parsed events across all inputs
    pub events: usize,
    /// Incidents after the `--min-severity` filter
    pub incidents: Vec<Incident<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<IncidentSummary>,
}

impl Render for AnalyzeReport<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Analyzed {} event(s) from {} input(s): {} incident(s)",
            self.events.to_string().bold(),
            self.sources.len(),
            self.incidents.len().to_string().bold()
        )?;

        if !self.incidents.is_empty() {
            writeln!(w)?;
            render_incident_table(w, &self.incidents)?;
        }

        if let Some(ref summary) = self.summary {
            writeln!(w)?;
            render_summary(w, summary)?;
        }

        Ok(())
    }
}

/// Write incidents as an aligned table. Shared with `generate --analyze`.
pub(crate) fn render_incident_table(
    w: &mut dyn Write,
    incidents: &[Incident<'_>],
) -> std::io::Result<()> {
    use colored::Colorize;

    writeln!(
        w,
        "{:<8} {:<24} {:<6} {:<20} {:<16} {:<12} Description",
        "Severity", "Type", "Conf", "Time", "Source IP", "User"
    )?;
    writeln!(w, "{}", "-".repeat(110))?;

    for incident in incidents {
        let severity = format!("{:<8}", incident.severity.to_string());
        let severity = match incident.severity {
            Severity::High => severity.red().bold(),
            Severity::Medium => severity.yellow(),
            Severity::Low => severity.normal(),
        };
        let time = incident
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_owned());

        writeln!(
            w,
            "{} {:<24} {:<6.2} {:<20} {:<16} {:<12} {}",
            severity,
            incident.incident_type.as_str(),
            incident.confidence,
            time,
            incident.source_ip.as_deref().unwrap_or("-"),
            incident.affected_user.as_deref().unwrap_or("-"),
            incident.description
        )?;
    }

    Ok(())
}

fn render_summary(w: &mut dyn Write, summary: &IncidentSummary) -> std::io::Result<()> {
    use colored::Colorize;

    writeln!(w, "{}", "Summary".bold())?;
    writeln!(
        w,
        "  Total: {} (high: {}, medium: {}, low: {})",
        summary.total,
        summary.by_severity.high,
        summary.by_severity.medium,
        summary.by_severity.low
    )?;

    for (incident_type, count) in &summary.by_type {
        writeln!(w, "  {:<24} {}", incident_type.as_str(), count)?;
    }

    if !summary.top_source_ips.is_empty() {
        writeln!(w, "  Top source IPs:")?;
        for ranked in &summary.top_source_ips {
            writeln!(w, "    {:<16} {}", ranked.value, ranked.count)?;
        }
    }

    if !summary.top_users.is_empty() {
        writeln!(w, "  Top users:")?;
        for ranked in &summary.top_users {
            writeln!(w, "    {:<16} {}", ranked.value, ranked.count)?;
        }
    }

    Ok(())
}
