//! Server-rendered HTML pages for the upload form

use crate::split::{SplitOutput, Table};

/// Rows of the uploaded data shown on the result page
const ORIGINAL_PREVIEW_ROWS: usize = 5;

/// Rows of the daily split shown on the result page
const DAILY_PREVIEW_ROWS: usize = 20;

/// File name offered for the generated workbook
pub const DOWNLOAD_FILE_NAME: &str = "reservations_with_daily_split.xlsx";

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 70rem; padding: 0 1rem; color: #222; }
h1 { margin-bottom: 0.25rem; }
.lead { color: #555; margin-top: 0; }
form { border: 1px dashed #999; border-radius: 6px; padding: 1.5rem; margin: 1.5rem 0; }
button, .download { background: #0b6bcb; color: #fff; border: 0; border-radius: 4px; padding: 0.5rem 1rem; text-decoration: none; display: inline-block; }
pre { background: #f6f8fa; padding: 0.75rem; overflow-x: auto; font-size: 0.85rem; }
.error { border-left: 4px solid #c62828; padding-left: 1rem; }
.warning { border-left: 4px solid #ef8f00; padding-left: 1rem; }
.info { color: #555; }
"#;

/// Upload form
pub fn index_page(max_upload_bytes: usize) -> String {
    layout(
        "Daily Split Tool",
        &format!(
            r#"<p class="lead">Upload a reservations file (.xlsx or .csv) and this tool will:</p>
<ul>
    <li>Split each booking into daily rows</li>
    <li>Calculate base and total revenue per night</li>
    <li>Return an Excel file with two sheets: Original Data + Daily Split Data</li>
</ul>
<form action="/split" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept=".xlsx,.csv" required>
    <button type="submit">Split</button>
    <p class="info">Maximum file size: {max_mb:.1} MB</p>
</form>"#,
            max_mb = max_upload_bytes as f64 / (1024.0 * 1024.0),
        ),
    )
}

/// Result page with previews and a download link for the workbook
pub fn result_page(file_name: &str, output: &SplitOutput, download_base64: &str) -> String {
    let mut body = format!(
        r#"<p class="lead">{file}: {reservations} reservations split into {nights} nightly rows.</p>
<p><a class="download" download="{download_name}" href="data:{mime};base64,{data}">Download Excel (Original + Daily Split)</a></p>"#,
        file = escape_html(file_name),
        reservations = output.reservation_count(),
        nights = output.daily.len(),
        download_name = DOWNLOAD_FILE_NAME,
        mime = XLSX_MIME,
        data = download_base64,
    );

    if !output.skipped.is_empty() {
        body.push_str(&format!(
            r#"<section class="warning"><h2>Skipped rows ({})</h2><p>These rows are kept in Original Data but have no daily rows.</p>{}</section>"#,
            output.skipped.len(),
            list(output.skipped.iter().map(|e| e.to_string())),
        ));
    }

    if !output.warnings.is_empty() {
        body.push_str(&format!(
            r#"<section class="warning"><h2>Warnings ({})</h2>{}</section>"#,
            output.warnings.len(),
            list(output.warnings.iter().map(|w| w.to_string())),
        ));
    }

    body.push_str(&format!(
        "<h2>Preview of uploaded data</h2>{}",
        preview(&output.original, ORIGINAL_PREVIEW_ROWS)
    ));
    body.push_str(&format!(
        "<h2>Preview of daily split (first {} rows)</h2>{}",
        DAILY_PREVIEW_ROWS,
        preview(&output.daily_table(), DAILY_PREVIEW_ROWS)
    ));
    body.push_str(r#"<p><a href="/">Split another file</a></p>"#);

    layout("Daily Split Tool", &body)
}

/// Error page naming the file and every problem found
pub fn error_page(file_name: Option<&str>, summary: &str, details: &[String]) -> String {
    let heading = match file_name {
        Some(name) => format!("Could not split {}", escape_html(name)),
        None => "Could not split the upload".to_string(),
    };
    layout(
        "Daily Split Tool",
        &format!(
            r#"<section class="error"><h2>{heading}</h2><p>{summary}</p>{details}</section>
<p><a href="/">Try another file</a></p>"#,
            heading = heading,
            summary = escape_html(summary),
            details = list(details.iter().cloned()),
        ),
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <h1>{title}</h1>
{body}
</body>
</html>"#,
        title = title,
        css = CSS,
        body = body,
    )
}

fn preview(table: &Table, rows: usize) -> String {
    format!("<pre>{}</pre>", escape_html(&table.render_text(rows)))
}

fn list(items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items
        .map(|item| format!("<li>{}</li>", escape_html(&item)))
        .collect();
    if items.is_empty() {
        String::new()
    } else {
        format!("<ul>{}</ul>", items.join(""))
    }
}

/// Escape text for HTML element and attribute content
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
