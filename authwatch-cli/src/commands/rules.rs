//! `authwatch rules` command handler

use std::io::Write;

use serde::Serialize;

use authwatch_analyzer::{RuleEngine, RuleInfo};
use authwatch_core::config::AuthwatchConfig;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `rules` command.
///
/// Lists every built-in rule with its policy; rules named in
/// `[analyzer] disabled_rules` are shown as disabled.
pub fn execute(config: &AuthwatchConfig, writer: &OutputWriter) -> Result<(), CliError> {
    // Unknown names in disabled_rules are a config error here too.
    RuleEngine::from_config(&config.analyzer)?;

    let rules = RuleEngine::catalog(&config.analyzer);
    let report = RuleListReport {
        total: rules.len(),
        enabled: rules.iter().filter(|r| r.enabled).count(),
        rules,
    };

    writer.render(&report)?;

    Ok(())
}

#[derive(Serialize)]
pub struct RuleListReport {
    pub total: usize,
    pub enabled: usize,
    pub rules: Vec<RuleInfo>,
}

impl Render for RuleListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Detection Rules ({} total, {} enabled)",
            self.total.to_string().bold(),
            self.enabled
        )?;
        writeln!(w)?;
        writeln!(
            w,
            "{:<22} {:<24} {:<8} {:<6} {:<8} Status",
            "Name", "Incident", "Severity", "Conf", "Window"
        )?;
        writeln!(w, "{}", "-".repeat(80))?;

        for r in &self.rules {
            let window = r
                .window_minutes
                .map(|m| format!("{}m", m))
                .unwrap_or_else(|| "-".to_owned());
            let status = if r.enabled {
                "enabled".green()
            } else {
                "disabled".yellow()
            };

            writeln!(
                w,
                "{:<22} {:<24} {:<8} {:<6.2} {:<8} {}",
                r.name,
                r.incident_type.as_str(),
                r.severity.to_string(),
                r.confidence,
                window,
                status
            )?;
        }

        Ok(())
    }
}
