use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use dtr_prune::{PruneReport, RetentionOutcome};

use crate::error::CliResult;

#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn describe_outcome(outcome: Option<RetentionOutcome>) -> String {
    match outcome {
        None => "skipped".to_string(),
        Some(RetentionOutcome::NothingExpired) => "nothing expired".to_string(),
        Some(RetentionOutcome::AllExpiredRemovable) => "all expired".to_string(),
        Some(RetentionOutcome::FloorProtectsAll) => "kept by floor".to_string(),
        Some(RetentionOutcome::FloorLimited { removable }) => {
            format!("oldest {removable} only")
        }
    }
}

pub fn render_report(report: &PruneReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            let mut out = String::new();
            let mode = if report.dry_run { "dry run" } else { "prune" };
            out.push_str(&format!(
                "Namespace: {} ({}, reference date {})\n",
                report.namespace, mode, report.reference_date
            ));

            if let Some(error) = &report.error {
                out.push_str(&format!("Could not list repositories: {error}\n"));
                return Ok(out);
            }

            let removed_header = if report.dry_run {
                "Would Remove"
            } else {
                "Removed"
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header([
                    "Repository",
                    "Timestamped",
                    "Expired",
                    "Decision",
                    removed_header,
                    "Failed",
                ]);

            for repo in &report.repositories {
                let removed = if report.dry_run {
                    &repo.would_delete
                } else {
                    &repo.deleted
                };
                let decision = match &repo.error {
                    Some(error) => format!("skipped: {error}"),
                    None => describe_outcome(repo.outcome),
                };
                table.add_row([
                    repo.repository.clone(),
                    repo.total.to_string(),
                    repo.expired.to_string(),
                    decision,
                    removed.join("\n"),
                    repo.failed.join("\n"),
                ]);
            }

            out.push_str(&format!("{table}\n"));

            if report.dry_run {
                out.push_str(&format!(
                    "Total: {} tags would be removed from {} repositories",
                    report.would_delete_count(),
                    report.repositories.len()
                ));
            } else {
                out.push_str(&format!(
                    "Total: {} removed, {} failed across {} repositories",
                    report.deleted_count(),
                    report.failed_count(),
                    report.repositories.len()
                ));
            }

            Ok(out)
        }
    }
}
