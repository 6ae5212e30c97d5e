use std::{fmt::Write as _, io};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    domain::Roadmap,
    error::Result,
    progress::ProgressSnapshot,
    stats::{Dashboard, phase_stats},
};

pub const CSV_HEADER: [&str; 6] = ["Phase", "Month", "Task", "Type", "Status", "Completion Date"];

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("roadmap_progress_{}.csv", date.format("%Y-%m-%d"))
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("roadmap_report_{}.html", date.format("%Y-%m-%d"))
}

/// One row per task, every field quoted. No per-task completion time is
/// tracked, so completed rows carry the export date.
pub fn write_csv<W: io::Write>(roadmap: &Roadmap, exported_on: NaiveDate, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(CSV_HEADER)?;

    let date = exported_on.format("%Y-%m-%d").to_string();
    for phase in &roadmap.phases {
        for month in &phase.months {
            for task in &month.tasks {
                writer.write_record([
                    phase.title.as_str(),
                    month.title.as_str(),
                    task.text.as_str(),
                    task.kind.as_str(),
                    task.status_label(),
                    if task.completed { date.as_str() } else { "" },
                ])?;
            }
        }
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn render_csv(roadmap: &Roadmap, exported_on: NaiveDate) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(roadmap, exported_on, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressExport<'a> {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub title: &'a str,
    pub progress: &'a ProgressSnapshot,
    pub stats: &'a Dashboard,
}

pub fn render_json(
    roadmap: &Roadmap,
    snapshot: &ProgressSnapshot,
    dashboard: &Dashboard,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let export = ProgressExport {
        schema_version: 1,
        exported_at,
        title: &roadmap.title,
        progress: snapshot,
        stats: dashboard,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

const REPORT_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
.header { background: #2c3e50; color: white; padding: 20px; text-align: center; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 20px 0; }
.stat-card { background: #f8f9fa; padding: 20px; border-radius: 10px; text-align: center; }
.phase { margin: 20px 0; border: 1px solid #ddd; border-radius: 10px; }
.phase-header { background: #34495e; color: white; padding: 15px; }
.task-list { padding: 15px; }
.completed { color: green; }
.pending { color: red; }
";

/// Standalone HTML summary of the roadmap at the moment of generation.
pub fn render_report(roadmap: &Roadmap, dashboard: &Dashboard, generated_on: NaiveDate) -> String {
    let title = escape_html(&format!("{} Progress Report", roadmap.title));
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{REPORT_STYLE}</style>\n</head>\n<body>\n"
    );
    let _ = write!(
        html,
        "<div class=\"header\">\n<h1>{title}</h1>\n<p>Generated on {}</p>\n</div>\n",
        generated_on.format("%Y-%m-%d")
    );

    html.push_str("<div class=\"stats\">\n");
    for (value, label) in [
        (dashboard.overall.total.to_string(), "Total Tasks"),
        (dashboard.overall.completed.to_string(), "Completed Tasks"),
        (format!("{}%", dashboard.overall.percent), "Overall Progress"),
        (
            format!(
                "{}/{}",
                dashboard.milestones.completed, dashboard.milestones.total
            ),
            "Milestones",
        ),
    ] {
        let _ = write!(
            html,
            "<div class=\"stat-card\">\n<h3>{value}</h3>\n<p>{label}</p>\n</div>\n"
        );
    }
    html.push_str("</div>\n");

    for phase in &roadmap.phases {
        let stats = phase_stats(phase);
        let _ = write!(
            html,
            "<div class=\"phase\">\n<div class=\"phase-header\">\n<h3>{}</h3>\n<p>Progress: {}% ({}/{})</p>\n</div>\n<div class=\"task-list\">\n",
            escape_html(&phase.title),
            stats.percent,
            stats.completed,
            stats.total
        );

        for task in phase.tasks() {
            let (class, label) = if task.completed {
                ("completed", "✅ Completed")
            } else {
                ("pending", "⏳ Pending")
            };
            let _ = writeln!(
                html,
                "<p class=\"{class}\"><strong>{label}:</strong> {}</p>",
                escape_html(&task.text)
            );
        }

        html.push_str("</div>\n</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{TaskId, sample_roadmap};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let mut roadmap = sample_roadmap();
        roadmap.set_completed(&TaskId::new("task_1"), true);

        let csv = render_csv(&roadmap, day()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "\"Phase\",\"Month\",\"Task\",\"Type\",\"Status\",\"Completion Date\""
        );
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[1],
            "\"One\",\"Jan\",\"a\",\"task\",\"Pending\",\"\""
        );
        assert_eq!(
            lines[2],
            "\"One\",\"Jan\",\"b\",\"milestone\",\"Completed\",\"2026-04-02\""
        );
        assert_eq!(lines[5], "\"Two\",\"Mar\",\"e\",\"task\",\"Pending\",\"\"");
    }

    #[test]
    fn test_csv_escapes_embedded_quotes() {
        let mut roadmap = sample_roadmap();
        roadmap.phases[0].months[0].tasks[0].text = "say \"hi\", then go".to_string();

        let csv = render_csv(&roadmap, day()).unwrap();
        assert!(csv.contains("\"say \"\"hi\"\", then go\""));
    }

    #[test]
    fn test_report_lists_phase_progress_and_tasks() {
        let mut roadmap = sample_roadmap();
        roadmap.set_completed(&TaskId::new("task_0"), true);
        roadmap.phases[1].months[0].tasks[0].text = "<script>".to_string();
        let dashboard = Dashboard::compute(&roadmap);

        let html = render_report(&roadmap, &dashboard, day());

        assert!(html.contains("Generated on 2026-04-02"));
        assert!(html.contains("<h3>20%</h3>"));
        assert!(html.contains("Progress: 33% (1/3)"));
        assert!(html.contains("Progress: 0% (0/2)"));
        assert!(html.contains("<strong>✅ Completed:</strong> a"));
        assert!(html.contains("<strong>⏳ Pending:</strong> &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_json_export_embeds_snapshot_and_stats() {
        let roadmap = sample_roadmap();
        let mut snapshot = ProgressSnapshot::default();
        snapshot.set(TaskId::new("task_3"), true);
        let dashboard = Dashboard::compute(&roadmap);
        let at = Utc.with_ymd_and_hms(2026, 4, 2, 8, 30, 0).unwrap();

        let json = render_json(&roadmap, &snapshot, &dashboard, at).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["progress"]["tasks"]["task_3"], true);
        assert_eq!(value["stats"]["overall"]["total"], 5);
        assert_eq!(value["stats"]["phases"][1]["index"], 2);
    }

    #[test]
    fn test_file_names_carry_the_date() {
        assert_eq!(csv_file_name(day()), "roadmap_progress_2026-04-02.csv");
        assert_eq!(report_file_name(day()), "roadmap_report_2026-04-02.html");
    }
}
