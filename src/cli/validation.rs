use crate::cli::args::{CliArgs, Command, ListArgs};
use crate::output::OutputFormat;
use crate::utils;
use crate::views::JobStatus;

fn validate_list(list: &ListArgs) -> Result<(), String> {
    if let Some(raw) = list.page_size {
        utils::parse_page_size(&raw.to_string())
            .map_err(|e| format!("invalid --page-size '{raw}': {e}"))?;
    }
    if let Some(page) = list.page {
        if page == 0 {
            return Err("invalid --page, pages start at 1".to_string());
        }
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --format '{raw}', expected text, json, or html"
            ));
        }
    }
    if let Some(master) = args.master.as_deref() {
        let trimmed = master.trim();
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(format!("invalid --master '{master}', expected an http(s) url"));
        }
    }
    match &args.command {
        Command::Jobs(list_args) => {
            validate_list(&list_args.list)?;
            if let Some(raw) = list_args.status.as_deref() {
                if JobStatus::parse(raw).is_none() {
                    return Err(format!(
                        "invalid --status '{raw}', expected pending, running, finished, or canceled"
                    ));
                }
            }
        }
        Command::Nodes(list_args) => validate_list(list_args)?,
        Command::Plans(list_args) => validate_list(list_args)?,
        Command::Projects(list_args) => validate_list(list_args)?,
        Command::Exceptions(exception_args) => {
            validate_list(&exception_args.list)?;
            let scope = exception_args.scope.trim().to_lowercase();
            if !matches!(scope.as_str(), "job" | "node" | "system") {
                return Err(format!(
                    "invalid --scope '{}', expected job, node, or system",
                    exception_args.scope
                ));
            }
        }
        Command::System(system_args) => {
            if let Some(raw) = system_args.interval.as_deref() {
                utils::parse_interval_seconds(raw)
                    .map_err(|e| format!("invalid --interval '{raw}': {e}"))?;
            }
        }
    }
    Ok(())
}
