use serde_json::Value;

use crate::views::table;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

// one rendered page, ready for export
#[derive(Clone, Debug)]
pub struct ExportView<'a> {
    pub title: &'a str,
    pub headers: &'a [&'a str],
    pub rows: &'a [Vec<String>],
    pub pager_text: &'a str,
    pub pager_html: &'a str,
    pub items: &'a [Value],
}

pub fn render(view: &ExportView<'_>, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(view),
        OutputFormat::Json => render_json(view),
        OutputFormat::Html => render_html(view),
    }
}

pub fn render_text(view: &ExportView<'_>) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(view.title);
    out.push('\n');
    for line in table::render(view.headers, view.rows) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(view.pager_text);
    out.push('\n');
    out.into_bytes()
}

// the raw records of the page, as the server sent them
pub fn render_json(view: &ExportView<'_>) -> Vec<u8> {
    serde_json::to_vec_pretty(view.items).unwrap_or_else(|_| b"[]\n".to_vec())
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_html(view: &ExportView<'_>) -> Vec<u8> {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"utf-8\"/>\n");
    out.push_str(&format!("  <title>{}</title>\n", escape_html(view.title)));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h2>{}</h2>\n", escape_html(view.title)));
    out.push_str("<table>\n  <thead>\n    <tr>");
    for header in view.headers {
        out.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    out.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for row in view.rows {
        out.push_str("    <tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out.push_str(&format!(
        "<ul class=\"pagination\">{}</ul>\n",
        view.pager_html
    ));
    out.push_str("</body>\n</html>\n");
    out.into_bytes()
}
