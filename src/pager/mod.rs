use colored::Colorize;
use itertools::Itertools;
use serde::Deserialize;

// the pagination envelope returned by every search endpoint; iter_pages
// carries null entries where the server compressed the window
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub iter_pages: Vec<Option<u64>>,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Prev { target: u64 },
    Number { page: u64, active: bool },
    Gap,
    Next { target: u64 },
}

impl Control {
    // the page a control navigates to; None for gaps and the active page
    pub fn target(&self) -> Option<u64> {
        match self {
            Control::Prev { target } | Control::Next { target } => Some(*target),
            Control::Number { page, active: false } => Some(*page),
            Control::Number { active: true, .. } | Control::Gap => None,
        }
    }
}

pub fn controls<T>(page: &Page<T>) -> Vec<Control> {
    let mut out = Vec::new();
    if page.has_prev {
        out.push(Control::Prev {
            target: page.page.saturating_sub(1).max(1),
        });
    }
    for entry in &page.iter_pages {
        match entry {
            Some(number) => out.push(Control::Number {
                page: *number,
                active: *number == page.page,
            }),
            None => out.push(Control::Gap),
        }
    }
    if page.has_next {
        out.push(Control::Next {
            target: page.page + 1,
        });
    }
    out
}

pub fn label(page: u64, pages: u64) -> String {
    format!("page ( {page}/{pages} )")
}

pub fn render_line(controls: &[Control], label: &str) -> String {
    let rendered = controls
        .iter()
        .map(|control| match control {
            Control::Prev { .. } => "«".bold().white().to_string(),
            Control::Number { page, active: true } => format!("[{page}]").bold().green().to_string(),
            Control::Number { page, .. } => page.to_string().cyan().to_string(),
            Control::Gap => "…".dimmed().to_string(),
            Control::Next { .. } => "»".bold().white().to_string(),
        })
        .join(" ");
    if rendered.is_empty() {
        label.to_string()
    } else {
        format!("{rendered}  {label}")
    }
}

pub fn render_plain(controls: &[Control], label: &str) -> String {
    let rendered = controls
        .iter()
        .map(|control| match control {
            Control::Prev { .. } => "«".to_string(),
            Control::Number { page, active: true } => format!("[{page}]"),
            Control::Number { page, .. } => page.to_string(),
            Control::Gap => "…".to_string(),
            Control::Next { .. } => "»".to_string(),
        })
        .join(" ");
    if rendered.is_empty() {
        label.to_string()
    } else {
        format!("{rendered}  {label}")
    }
}

// the widget as markup, for HTML export
pub fn render_html(controls: &[Control], label: &str) -> String {
    let mut html = String::new();
    for control in controls {
        match control {
            Control::Prev { target } => html.push_str(&format!(
                "<li><a href=\"javascript:void(0);\" data-id=\"{target}\">&laquo;</a></li>"
            )),
            Control::Number { page, active: true } => {
                html.push_str(&format!("<li class=\"active\"><a href=\"#\">{page}</a></li>"))
            }
            Control::Number { page, .. } => html.push_str(&format!(
                "<li><a href=\"javascript:void(0);\" data-id=\"{page}\">{page}</a></li>"
            )),
            Control::Gap => {
                html.push_str("<li class=\"disabled\"><a href=\"#\">&hellip;</a></li>")
            }
            Control::Next { target } => html.push_str(&format!(
                "<li><a href=\"javascript:void(0);\" data-id=\"{target}\">&raquo;</a></li>"
            )),
        }
    }
    html.push_str(&format!("<li><span>{label}</span></li>"));
    html
}

// maps a console token onto the rendered controls; only targets that are
// actually present can be navigated to, mirroring what a click could reach
pub fn resolve_target(controls: &[Control], token: &str) -> Option<u64> {
    match token {
        "n" => controls.iter().find_map(|c| match c {
            Control::Next { target } => Some(*target),
            _ => None,
        }),
        "p" => controls.iter().find_map(|c| match c {
            Control::Prev { target } => Some(*target),
            _ => None,
        }),
        other => {
            let wanted: u64 = other.parse().ok()?;
            controls.iter().find_map(|c| match c {
                Control::Number { page, active: false } if *page == wanted => Some(*page),
                _ => None,
            })
        }
    }
}
