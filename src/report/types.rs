use crate::runner::state::{LogEntry, Summary};
use chrono::{DateTime, Local};

/// Everything the report renderer needs from a logging session
#[derive(Debug, Clone)]
pub struct ReportData<'a> {
    pub suite_name: &'a str,
    pub started_at: DateTime<Local>,
    pub ended_at: Option<DateTime<Local>>,
    pub summary: Summary,
    pub entries: &'a [LogEntry],
}
