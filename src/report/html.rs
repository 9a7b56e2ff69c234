use super::types::ReportData;
use crate::runner::state::Category;
use std::time::Duration;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the full HTML report
pub fn generate_html(data: &ReportData<'_>) -> String {
    let summary = &data.summary;

    let end_time = data
        .ended_at
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "In Progress".to_string());
    let duration = summary
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "N/A".to_string());

    let rows = [
        ("Test Suite", html_escape(data.suite_name)),
        ("Start Time", data.started_at.format(TIME_FORMAT).to_string()),
        ("End Time", end_time),
        ("Duration", duration),
        ("Total Tests", summary.total_tests.to_string()),
        ("Passed", summary.passed.to_string()),
        ("Failed", summary.failed.to_string()),
        ("Warnings", summary.warnings.to_string()),
        ("Info Messages", summary.info.to_string()),
    ];
    let summary_rows: String = rows
        .iter()
        .map(|(label, value)| format!("<tr><th>{}</th><td>{}</td></tr>\n", label, value))
        .collect();

    let pass_rate_html = if summary.total_tests > 0 {
        format!(
            r#"<h2 class="pass-rate">Pass Rate: {:.1}%</h2>
        <div class="progress-bar"><div class="progress-fill" style="width: {:.1}%"></div></div>"#,
            summary.pass_rate, summary.pass_rate
        )
    } else {
        String::new()
    };

    let mut groups_html = String::new();
    for category in Category::REPORT_ORDER {
        let entries: Vec<_> = data
            .entries
            .iter()
            .filter(|e| e.category == category)
            .collect();
        if entries.is_empty() {
            continue;
        }

        let items: String = entries
            .iter()
            .map(|e| {
                format!(
                    r#"<li><span class="ts">[{}]</span> {}</li>"#,
                    e.formatted_time(),
                    html_escape(&e.message)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        groups_html.push_str(&format!(
            r#"
        <section class="group {class}">
            <h3>{name} Messages ({count})</h3>
            <ul>
{items}
            </ul>
        </section>"#,
            class = category.as_str().to_lowercase(),
            name = category,
            count = entries.len(),
            items = items
        ));
    }

    // Machine-readable copy of the summary for tooling that scrapes reports
    let summary_json = serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>RavenCode Frontend Test Report</title>
    <style>
        :root {{
            --bg-primary: #0a0f1d;
            --bg-secondary: #141b2d;
            --border: #374151;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --green: #10b981;
            --red: #ef4444;
            --yellow: #f59e0b;
            --blue: #3b82f6;
        }}

        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}

        body {{
            font-family: 'Inter', system-ui, -apple-system, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.5;
            padding: 3rem 1rem;
        }}

        .container {{
            max-width: 1100px;
            margin: 0 auto;
        }}

        h1 {{
            font-size: 2.25rem;
            font-weight: 800;
            margin-bottom: 2rem;
        }}

        h2 {{
            font-size: 1.25rem;
            margin: 2rem 0 1rem;
        }}

        table {{
            border-collapse: collapse;
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            min-width: 420px;
        }}

        th, td {{
            text-align: left;
            padding: 0.5rem 1rem;
            border: 1px solid var(--border);
        }}

        th {{ color: var(--text-secondary); font-weight: 600; }}

        .progress-bar {{
            background: var(--bg-secondary);
            height: 12px;
            border-radius: 6px;
            overflow: hidden;
            border: 1px solid var(--border);
        }}

        .progress-fill {{
            height: 100%;
            background: linear-gradient(90deg, var(--green), #34d399);
        }}

        .group {{
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 1rem;
            padding: 1rem 1.5rem;
            margin-bottom: 1.5rem;
        }}

        .group ul {{ list-style: none; }}
        .group li {{ padding: 0.25rem 0; font-family: 'JetBrains Mono', monospace; font-size: 0.875rem; }}
        .ts {{ color: var(--text-secondary); }}

        .group.fail h3 {{ color: var(--red); }}
        .group.pass h3 {{ color: var(--green); }}
        .group.warn h3 {{ color: var(--yellow); }}
        .group.info h3 {{ color: var(--blue); }}
    </style>
</head>
<body>
    <div class="container">
        <h1>RavenCode Frontend Test Report</h1>

        <h2>Test Summary</h2>
        <table>
{summary_rows}        </table>

        {pass_rate_html}

        <h2>Detailed Test Logs</h2>
{groups_html}
    </div>
    <script type="application/json" id="summary-data">{summary_json}</script>
</body>
</html>"#,
        summary_rows = summary_rows,
        pass_rate_html = pass_rate_html,
        groups_html = groups_html,
        summary_json = summary_json.replace("</", "<\\/"),
    )
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub(crate) fn format_duration(d: Duration) -> String {
    let ms = d.as_millis() as u64;
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) as f64 / 1000.0;
        format!("{}m {:.0}s", minutes, seconds)
    }
}
