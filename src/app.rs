use std::io::Write;

use clap::Parser;

use crate::cli::args::{CliArgs, Command, ListArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::console::{self, Console, ConsoleError, Options, TermPrompt};
use crate::output::OutputFormat;
use crate::utils;
use crate::views::{JobStatus, ListKind};

fn print_banner() {
    const BANNER: &str = r#"
   _________  (_)___/ /__  _________/ /__  _____/ /__
  / ___/ __ \/ / __  / _ \/ ___/ __  / _ \/ ___/ //_/
 (__  ) /_/ / / /_/ /  __/ /  / /_/ /  __/ /__/ ,<
/____/ .___/_/\__,_/\___/_/   \__,_/\___/\___/_/|_|
    /_/
       v0.2.1 - terminal console for the spider platform
    "#;
    let _ = write!(&mut rainbowcoat::stdout(), "{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn list_settings(list: &ListArgs, cfg: &ConfigFile) -> (u64, u64, String, bool) {
    let page = list.page.unwrap_or(1);
    let page_size = list.page_size.or(cfg.page_size).unwrap_or(10);
    let keywords = list
        .keywords
        .clone()
        .or_else(|| cfg.keywords.clone())
        .unwrap_or_default();
    (page, page_size, keywords, list.batch)
}

fn build_options(args: CliArgs, cfg: ConfigFile) -> Result<Options, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let master = args
        .master
        .or(cfg.master.clone())
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    let proxy = args.proxy.or(cfg.proxy.clone());
    let output = args.output.or(cfg.output.clone());
    let output_format = match args.format.or(cfg.output_format.clone()) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        ),
        None => None,
    };
    let log_tail = cfg.log_tail.unwrap_or(40);

    let mut options = Options {
        master,
        timeout_seconds,
        proxy,
        output,
        output_format,
        no_color,
        log_tail,
        verbose: args.verbose,
        ..Options::default()
    };

    match args.command {
        Command::Jobs(jobs_args) => {
            let (page, page_size, keywords, batch) = list_settings(&jobs_args.list, &cfg);
            let status_raw = jobs_args.status.or(cfg.job_status);
            options.kind = ListKind::Jobs;
            options.page = page;
            options.page_size = page_size;
            options.keywords = keywords;
            options.batch = batch;
            options.job_status = match status_raw {
                Some(raw) => JobStatus::parse(&raw)
                    .ok_or_else(|| format!("invalid job status '{raw}'"))?,
                None => JobStatus::Running,
            };
        }
        Command::Nodes(list_args) => {
            let (page, page_size, keywords, batch) = list_settings(&list_args, &cfg);
            options.kind = ListKind::Nodes;
            options.page = page;
            options.page_size = page_size;
            options.keywords = keywords;
            options.batch = batch;
        }
        Command::Plans(list_args) => {
            let (page, page_size, keywords, batch) = list_settings(&list_args, &cfg);
            options.kind = ListKind::Plans;
            options.page = page;
            options.page_size = page_size;
            options.keywords = keywords;
            options.batch = batch;
        }
        Command::Projects(list_args) => {
            let (page, page_size, keywords, batch) = list_settings(&list_args, &cfg);
            options.kind = ListKind::Projects;
            options.page = page;
            options.page_size = page_size;
            options.keywords = keywords;
            options.batch = batch;
        }
        Command::Exceptions(exception_args) => {
            let (page, page_size, keywords, batch) = list_settings(&exception_args.list, &cfg);
            options.kind = match exception_args.scope.trim().to_lowercase().as_str() {
                "node" => ListKind::NodeExceptions,
                "system" => ListKind::SystemExceptions,
                _ => ListKind::JobExceptions,
            };
            options.page = page;
            options.page_size = page_size;
            options.keywords = keywords;
            options.batch = batch;
            options.show_closed = exception_args.closed;
            options.data_id = exception_args.node_id;
        }
        Command::System(system_args) => {
            options.system = true;
            options.watch = system_args.watch;
            let interval_raw = system_args
                .interval
                .or(cfg.interval)
                .unwrap_or_else(|| "5s".to_string());
            options.interval_seconds = utils::parse_interval_seconds(&interval_raw)
                .map_err(|e| format!("invalid interval '{interval_raw}': {e}"))?;
        }
    }
    Ok(options)
}

async fn run_async(options: Options) -> Result<(), ConsoleError> {
    if options.system {
        return console::run_system(options).await;
    }
    let mut console = Console::new(options, TermPrompt)?;
    console.run().await
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => {
                config::ensure_default_config_file(&path)?;
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let options = build_options(args, cfg)?;
    if options.no_color {
        colored::control::set_override(false);
    }
    if !options.batch && !options.system {
        print_banner();
    }
    if options.verbose > 0 {
        format_kv_line("master", &options.master);
        format_kv_line("timeout", &format!("{}s", options.timeout_seconds));
        if let Some(proxy) = &options.proxy {
            format_kv_line("proxy", proxy);
        }
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;
    rt.block_on(run_async(options)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn jobs_status_defaults_to_running() {
        let args = CliArgs::parse_from(["spiderdeck", "jobs"]);
        let options = build_options(args, ConfigFile::default()).unwrap();
        assert_eq!(options.job_status, JobStatus::Running);
        assert_eq!(options.kind, ListKind::Jobs);
    }

    #[test]
    fn cli_status_overrides_config() {
        let args = CliArgs::parse_from(["spiderdeck", "jobs", "-t", "pending"]);
        let cfg = ConfigFile {
            job_status: Some("finished".to_string()),
            ..ConfigFile::default()
        };
        let options = build_options(args, cfg).unwrap();
        assert_eq!(options.job_status, JobStatus::Pending);
    }

    #[test]
    fn exception_scope_selects_list_kind() {
        let args = CliArgs::parse_from(["spiderdeck", "exceptions", "-s", "node", "--closed"]);
        let options = build_options(args, ConfigFile::default()).unwrap();
        assert_eq!(options.kind, ListKind::NodeExceptions);
        assert!(options.show_closed);
    }

    #[test]
    fn page_size_falls_back_to_config() {
        let args = CliArgs::parse_from(["spiderdeck", "plans", "--batch"]);
        let cfg = ConfigFile {
            page_size: Some(25),
            ..ConfigFile::default()
        };
        let options = build_options(args, cfg).unwrap();
        assert_eq!(options.page_size, 25);
        assert!(options.batch);
    }

    #[test]
    fn invalid_watch_interval_is_rejected() {
        let args = CliArgs::parse_from(["spiderdeck", "system", "--watch", "-i", "0s"]);
        assert!(build_options(args, ConfigFile::default()).is_err());
    }
}
