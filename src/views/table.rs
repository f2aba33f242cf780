// column cells wider than this get cut with a trailing ellipsis, the
// way the original view clipped exception messages and remarks
pub const MAX_CELL_WIDTH: usize = 40;

pub fn ordinal(page_size: u64, page: u64, index: usize) -> u64 {
    page_size * page.saturating_sub(1) + index as u64 + 1
}

pub fn truncate_cell(value: &str, max: usize) -> String {
    let flat = value.replace(['\r', '\n'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// plain aligned text lines: header row first, then a dash rule, then one
// line per row; callers add color when printing to a terminal
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    let clipped: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| truncate_cell(cell, MAX_CELL_WIDTH))
                .collect()
        })
        .collect();
    for row in &clipped {
        for (i, cell) in row.iter().enumerate().take(columns) {
            let len = cell.chars().count();
            if len > widths[i] {
                widths[i] = len;
            }
        }
    }

    let mut lines = Vec::with_capacity(clipped.len() + 2);
    lines.push(format_row(
        &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
        &widths,
    ));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &clipped {
        lines.push(format_row(row, &widths));
    }
    lines
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::new();
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        out.push_str(cell);
        if i + 1 < widths.len() {
            out.push_str(&" ".repeat(pad));
            out.push_str("  ");
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::{ordinal, render, truncate_cell};

    #[test]
    fn ordinal_counts_from_page_offset() {
        assert_eq!(ordinal(10, 2, 0), 11);
        assert_eq!(ordinal(10, 1, 0), 1);
        assert_eq!(ordinal(25, 3, 4), 55);
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_cell("short", 10), "short");
        let cut = truncate_cell("abcdefghij", 5);
        assert_eq!(cut.chars().count(), 5);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn render_aligns_columns() {
        let lines = render(
            &["Index", "Name"],
            &[
                vec!["1".to_string(), "alpha".to_string()],
                vec!["2".to_string(), "b".to_string()],
            ],
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Index"));
        assert!(lines[2].contains("alpha"));
    }
}
