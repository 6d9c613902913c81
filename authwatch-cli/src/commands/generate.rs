//! `authwatch generate` command handler

use std::io::Write;

use chrono::Datelike;
use serde::Serialize;
use tracing::info;

use authwatch_analyzer::{
    AuthLogParser, RuleEngine, Scenario, ScenarioGenerator, ScenarioKind, ScenarioMetadata,
};
use authwatch_core::config::AuthwatchConfig;
use authwatch_core::types::{Event, Incident};

use crate::cli::{GenerateArgs, OutputFormat};
use crate::commands::analyze::render_incident_table;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `generate` command.
///
/// Log lines go to `--out` when given, otherwise to stdout. With `--analyze`
/// the generated text is parsed with the scenario's own year pinned and the
/// incidents are appended to the report.
pub async fn execute(
    args: GenerateArgs,
    config: &AuthwatchConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut generator = match args.seed {
        Some(seed) => {
            ScenarioGenerator::seeded(seed).with_hostname(config.generator.hostname.clone())
        }
        None => ScenarioGenerator::from_config(&config.generator),
    };

    let kind = ScenarioKind::from(args.kind);
    let scenario = generator.generate(kind, args.count, args.minutes);
    info!(
        kind = %kind,
        lines = scenario.metadata.line_count,
        "scenario generated"
    );

    let output = match args.out {
        Some(ref path) => {
            tokio::fs::write(path, scenario.to_text()).await.map_err(|e| {
                CliError::Io(std::io::Error::new(
                    e.kind(),
                    format!("{}: {}", path.display(), e),
                ))
            })?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let events = if args.analyze {
        analyze_scenario(&scenario, config)?
    } else {
        Vec::new()
    };
    let incidents = if args.analyze {
        Some(RuleEngine::from_config(&config.analyzer)?.analyze(&events))
    } else {
        None
    };

    // Text mode without --out: stdout is the log itself, so only lines are printed.
    let show_metadata = output.is_some() || writer.format() == OutputFormat::Json;

    let report = GenerateReport {
        metadata: show_metadata.then_some(&scenario.metadata),
        output,
        lines: args.out.is_none().then_some(&scenario.lines),
        incidents,
    };
    writer.render(&report)?;

    Ok(())
}

/// Parse generated text with the scenario's start year pinned.
fn analyze_scenario(scenario: &Scenario, config: &AuthwatchConfig) -> Result<Vec<Event>, CliError> {
    let mut analyzer_config = config.analyzer.clone();
    analyzer_config.year = Some(scenario.metadata.start.year());
    let parser = AuthLogParser::from_config(&analyzer_config)?;
    Ok(parser.parse_content(&scenario.to_text()))
}

/// Result of a `generate` run.
#[derive(Serialize)]
pub struct GenerateReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a ScenarioMetadata>,
    /// File the lines were written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Generated lines when no output file was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<&'a Vec<String>>,
    /// Incidents from `--analyze`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents: Option<Vec<Incident<'a>>>,
}

impl Render for GenerateReport<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(lines) = self.lines {
            for line in lines {
                writeln!(w, "{}", line)?;
            }
        }

        if let Some(metadata) = self.metadata {
            if let Some(ref output) = self.output {
                writeln!(
                    w,
                    "Wrote {} line(s) to {}",
                    metadata.line_count.to_string().bold(),
                    output.bold()
                )?;
            }
            writeln!(w, "  Scenario: {}", metadata.kind)?;
            writeln!(
                w,
                "  Window: {} .. {}",
                metadata.start.format("%Y-%m-%d %H:%M:%S"),
                metadata.end.format("%Y-%m-%d %H:%M:%S")
            )?;
            if !metadata.attacker_ips.is_empty() {
                writeln!(w, "  Attacker IPs: {}", metadata.attacker_ips.join(", "))?;
            }
            if !metadata.usernames.is_empty() {
                writeln!(w, "  Users: {}", metadata.usernames.join(", "))?;
            }
            let expected: Vec<&str> = metadata
                .expected_incidents
                .iter()
                .map(|t| t.as_str())
                .collect();
            writeln!(
                w,
                "  Expected incidents: {}",
                if expected.is_empty() {
                    "none".to_owned()
                } else {
                    expected.join(", ")
                }
            )?;
        }

        if let Some(ref incidents) = self.incidents {
            writeln!(w)?;
            writeln!(
                w,
                "Detected {} incident(s)",
                incidents.len().to_string().bold()
            )?;
            if !incidents.is_empty() {
                render_incident_table(w, incidents)?;
            }
        }

        Ok(())
    }
}
