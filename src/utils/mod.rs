use regex::Regex;

pub fn parse_page_size(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    let size: u64 = trimmed
        .parse()
        .map_err(|_| format!("invalid page size '{trimmed}'"))?;
    if size == 0 || size > 500 {
        return Err("page size must be between 1 and 500".to_string());
    }
    Ok(size)
}

pub fn parse_interval_seconds(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    let (digits, unit) = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => trimmed.split_at(idx),
        None => (trimmed, ""),
    };
    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("invalid interval '{trimmed}'"))?;
    let seconds = match unit.trim() {
        "" | "s" | "sec" | "secs" => amount,
        "m" | "min" | "mins" => amount * 60,
        "h" => amount * 3600,
        other => return Err(format!("invalid interval unit '{other}'")),
    };
    if seconds == 0 {
        return Err("interval must be positive".to_string());
    }
    Ok(seconds)
}

// Five whitespace-separated cron fields, numbers with the usual
// step/range/list operators. Enough to catch typos before the master
// rejects the plan.
pub fn is_cron_expression(value: &str) -> bool {
    let fields: Vec<&str> = value.split_whitespace().collect();
    if fields.len() != 5 {
        return false;
    }
    let field =
        match Regex::new(r"^(\*|[0-9]+)(-[0-9]+)?(/[0-9]+)?(,(\*|[0-9]+)(-[0-9]+)?(/[0-9]+)?)*$") {
            Ok(re) => re,
            Err(_) => return false,
        };
    fields.iter().all(|f| field.is_match(f))
}

pub fn tail_lines(text: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}
