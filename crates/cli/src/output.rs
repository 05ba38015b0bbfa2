//! Plain-text rendering for one-shot commands.

use chrono::Utc;
use flowdeck_types::{ExecutionRecord, Notification, Severity, StatusFilter};
use flowdeck_util::{format_relative_age, format_timestamp};

const ID_WIDTH: usize = 14;
const WORKFLOW_WIDTH: usize = 28;
const STATUS_WIDTH: usize = 10;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

pub fn format_table(records: &[ExecutionRecord], filter: StatusFilter) -> String {
    if records.is_empty() {
        return match filter {
            StatusFilter::All => "No executions found.\n".to_string(),
            StatusFilter::Only(status) => format!("No {status} executions found.\n"),
        };
    }
    let now = Utc::now();
    let mut out = format!(
        "{:<ID_WIDTH$}  {:<WORKFLOW_WIDTH$}  {:<STATUS_WIDTH$}  {:>7}  {:<10}  {}\n",
        "ID", "WORKFLOW", "STATUS", "STEPS", "STARTED", "DURATION"
    );
    for record in records {
        let started = record
            .started_at
            .as_ref()
            .map(|ts| format_relative_age(ts, now))
            .unwrap_or_else(|| "-".into());
        out.push_str(&format!(
            "{:<ID_WIDTH$}  {:<WORKFLOW_WIDTH$}  {:<STATUS_WIDTH$}  {:>7}  {:<10}  {}\n",
            clip(&record.id, ID_WIDTH),
            clip(&record.workflow_name, WORKFLOW_WIDTH),
            record.status.as_str(),
            record.progress_label(),
            started,
            record.duration_label().unwrap_or_else(|| "-".into()),
        ));
    }
    out
}

pub fn print_table(records: &[ExecutionRecord], filter: StatusFilter) {
    print!("{}", format_table(records, filter));
}

pub fn print_record(record: &ExecutionRecord) {
    println!("ID:        {}", record.id);
    println!("Workflow:  {}", record.workflow_name);
    println!("Status:    {}", record.status);
    println!("Steps:     {}", record.progress_label());
    println!(
        "Started:   {}",
        record.started_at.as_ref().map(format_timestamp).unwrap_or_else(|| "-".into())
    );
    println!("Duration:  {}", record.duration_label().unwrap_or_else(|| "-".into()));
}

/// Success and info go to stdout; warnings and errors to stderr.
pub fn print_notifications(notifications: Vec<Notification>) {
    for notification in notifications {
        match notification.severity {
            Severity::Info | Severity::Success => println!("{}", notification.message),
            Severity::Warning => eprintln!("warning: {}", notification.message),
            Severity::Error => eprintln!("error: {}", notification.message),
        }
    }
}
