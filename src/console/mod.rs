use std::time::Duration;

use colored::Colorize;
use governor::{Quota, RateLimiter};
use indicatif::{ProgressBar, ProgressDrawTarget};
use serde_json::Value;
use thiserror::Error;

use crate::client::{ClientError, ClientOptions, MasterClient};
use crate::output::{self, OutputFormat};
use crate::pager::{self, Control, Page};
use crate::status;
use crate::utils;
use crate::views::{self, table, ExceptionRecord, JobStatus, ListKind, NodeRecord, PlanRecord};
use crate::views::{ProjectRecord, SPIDER_DETAIL_HEADERS};

#[derive(Clone, Debug)]
pub struct Options {
    pub master: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub kind: ListKind,
    pub page: u64,
    pub page_size: u64,
    pub keywords: String,
    pub job_status: JobStatus,
    pub show_closed: bool,
    pub data_id: Option<String>,
    pub batch: bool,
    pub system: bool,
    pub watch: bool,
    pub interval_seconds: u64,
    pub log_tail: usize,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub no_color: bool,
    pub verbose: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            master: "http://127.0.0.1:5000".to_string(),
            timeout_seconds: 10,
            proxy: None,
            kind: ListKind::Jobs,
            page: 1,
            page_size: 10,
            keywords: String::new(),
            job_status: JobStatus::Running,
            show_closed: false,
            data_id: None,
            batch: false,
            system: false,
            watch: false,
            interval_seconds: 5,
            log_tail: 40,
            output: None,
            output_format: None,
            no_color: false,
            verbose: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("no master url provided (set --master or the config file)")]
    MissingMaster,

    #[error("invalid page size {value}, expected 1-500")]
    InvalidPageSize { value: u64 },

    #[error("invalid watch interval {seconds}, expected positive seconds")]
    InvalidInterval { seconds: u64 },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to write output '{path}': {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Copy, Debug)]
pub enum FlashLevel {
    Info,
    Success,
    Warning,
    Danger,
}

pub fn flash(message: &str, level: FlashLevel) {
    let tag = match level {
        FlashLevel::Info => "INF".bold().blue(),
        FlashLevel::Success => "OK".bold().green(),
        FlashLevel::Warning => "WRN".bold().yellow(),
        FlashLevel::Danger => "ERR".bold().red(),
    };
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        tag,
        "]".bold().white(),
        message.bold().white()
    );
}

// blocking error surface: status text first, then the cause chain
pub fn alert(context: &str, error: &dyn std::error::Error) {
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        "ERR".bold().red(),
        "]".bold().white(),
        context.bold().white()
    );
    eprintln!("    {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("    {cause}");
        source = cause.source();
    }
}

// answers come from a terminal in production and from a script in tests
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
    fn input(&mut self, label: &str, initial: &str) -> Option<String>;
    fn select(&mut self, label: &str, options: &[String], default: usize) -> Option<usize>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TermPrompt;

impl Prompt for TermPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn input(&mut self, label: &str, initial: &str) -> Option<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .ok()
    }

    fn select(&mut self, label: &str, options: &[String], default: usize) -> Option<usize> {
        dialoguer::Select::new()
            .with_prompt(label)
            .items(options)
            .default(default.min(options.len().saturating_sub(1)))
            .interact()
            .ok()
    }
}

// what a rendered row keeps for its action controls: the record key plus
// the record snapshot used to prefill edit forms
#[derive(Clone, Debug, Default)]
pub struct RowRef {
    pub key: String,
    pub wrap: Value,
}

impl RowRef {
    fn from_item(kind: ListKind, item: &Value) -> Self {
        let field = match kind {
            ListKind::Projects => "project_name",
            _ => "vc_md5",
        };
        let key = item
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            key,
            wrap: item.clone(),
        }
    }
}

// the last applied render; replaced wholesale, never patched
#[derive(Clone, Debug, Default)]
pub struct Screen {
    pub seq: u64,
    pub page: u64,
    pub pages: u64,
    pub page_size: u64,
    pub controls: Vec<Control>,
    pub label: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub refs: Vec<RowRef>,
}

pub fn build_screen(
    seq: u64,
    kind: ListKind,
    job_status: JobStatus,
    show_closed: bool,
    page_size: u64,
    envelope: &Page<Value>,
) -> Screen {
    let controls = pager::controls(envelope);
    Screen {
        seq,
        page: envelope.page,
        pages: envelope.pages,
        page_size,
        label: pager::label(envelope.page, envelope.pages),
        headers: views::headers_for(kind, job_status, show_closed),
        rows: views::rows_for(
            kind,
            job_status,
            show_closed,
            envelope.page,
            page_size,
            &envelope.items,
        ),
        refs: envelope
            .items
            .iter()
            .map(|item| RowRef::from_item(kind, item))
            .collect(),
        controls,
    }
}

// picks the index of the record's current value when the server still
// offers it, otherwise the first option
pub fn preselect(options: &[String], current: Option<&str>) -> usize {
    current
        .and_then(|value| options.iter().position(|option| option == value))
        .unwrap_or(0)
}

pub struct Console<P: Prompt> {
    client: MasterClient,
    options: Options,
    prompt: P,
    screen: Screen,
    seq: u64,
    local_filter: Option<String>,
}

pub type TermConsole = Console<TermPrompt>;

impl<P: Prompt> Console<P> {
    pub fn new(options: Options, prompt: P) -> Result<Self, ConsoleError> {
        if options.master.trim().is_empty() {
            return Err(ConsoleError::MissingMaster);
        }
        if options.page_size == 0 || options.page_size > 500 {
            return Err(ConsoleError::InvalidPageSize {
                value: options.page_size,
            });
        }
        let client = MasterClient::new(&ClientOptions {
            master: options.master.clone(),
            timeout_seconds: options.timeout_seconds,
            proxy: options.proxy.clone(),
        })?;
        Ok(Self {
            client,
            options,
            prompt,
            screen: Screen::default(),
            seq: 0,
            local_filter: None,
        })
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn search_form(&self, page: u64) -> Vec<(&'static str, String)> {
        // absent/zero page asks for the first one
        let page = if page == 0 { 1 } else { page };
        let mut form = vec![
            ("pageNum", page.to_string()),
            ("pageSize", self.options.page_size.to_string()),
        ];
        let data_type = match self.options.kind {
            ListKind::Jobs => self.options.job_status.as_param().to_string(),
            kind if kind.is_exceptions() => {
                if self.options.show_closed { "1" } else { "0" }.to_string()
            }
            _ => String::new(),
        };
        if !data_type.is_empty() {
            form.push(("dataType", data_type));
        }
        if let Some(data_id) = &self.options.data_id {
            form.push(("dataID", data_id.clone()));
        }
        form.push(("keywords", self.options.keywords.clone()));
        form
    }

    // a stale response (older sequence) must never clobber newer content,
    // and an empty payload leaves the previous screen alone
    pub fn apply_response(&mut self, seq: u64, response: Option<Page<Value>>) {
        let Some(envelope) = response else { return };
        if seq < self.screen.seq {
            return;
        }
        self.screen = build_screen(
            seq,
            self.options.kind,
            self.options.job_status,
            self.options.show_closed,
            self.options.page_size,
            &envelope,
        );
    }

    pub async fn refresh(&mut self, page: u64) -> Result<(), ConsoleError> {
        self.seq += 1;
        let seq = self.seq;
        let spinner = self.spinner("fetching");
        let result = self
            .client
            .search(self.options.kind.search_path(), &self.search_form(page))
            .await;
        spinner.finish_and_clear();
        match result {
            Ok(response) => {
                self.apply_response(seq, response);
                Ok(())
            }
            Err(error) => {
                if self.options.batch {
                    Err(error.into())
                } else {
                    alert("failed to fetch data", &error);
                    Ok(())
                }
            }
        }
    }

    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        self.refresh(self.options.page).await?;
        if self.options.batch {
            self.print_screen();
            if let Some(path) = self.options.output.clone() {
                self.export(&path)?;
            }
            return Ok(());
        }
        loop {
            self.print_screen();
            let Some(line) = self.prompt.input("spiderdeck", "") else {
                break;
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix('/') {
                let rest = rest.trim();
                self.local_filter = if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                };
                continue;
            }
            let (command, rest) = line
                .split_once(' ')
                .map(|(head, tail)| (head, tail.trim()))
                .unwrap_or((line.as_str(), ""));
            match command {
                "q" | "quit" | "exit" => break,
                "h" | "help" | "?" => self.print_help(),
                "r" => {
                    let page = self.screen.page;
                    self.refresh(page).await?;
                }
                "s" => {
                    self.options.keywords = rest.to_string();
                    self.refresh(1).await?;
                }
                "z" => match utils::parse_page_size(rest) {
                    Ok(size) => {
                        self.options.page_size = size;
                        self.refresh(1).await?;
                    }
                    Err(message) => flash(&message, FlashLevel::Warning),
                },
                "t" => {
                    if self.switch_filter(rest) {
                        self.refresh(1).await?;
                    }
                }
                "d" => self.delete_command(rest).await?,
                "x" => self.stop_command(rest).await?,
                "c" => self.close_exception_command(rest).await?,
                "e" => self.edit_command(rest).await?,
                "a" => self.add_command().await?,
                "v" => self.project_detail_command(rest).await?,
                "g" => self.start_spider_command(rest).await?,
                "i" => self.probe_nodes_command().await?,
                "l" => self.log_command(rest).await?,
                "o" => {
                    if rest.is_empty() {
                        flash("usage: o <file>", FlashLevel::Warning);
                    } else if let Err(error) = self.export(rest) {
                        alert("failed to export page", &error);
                    }
                }
                other => match pager::resolve_target(&self.screen.controls, other) {
                    Some(target) => self.refresh(target).await?,
                    None => flash("unknown command (h for help)", FlashLevel::Warning),
                },
            }
        }
        Ok(())
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if self.options.batch {
            spinner.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            spinner.set_draw_target(ProgressDrawTarget::stderr());
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message(message.to_string());
        spinner
    }

    fn view_summary(&self) -> String {
        let mut parts = vec![format!("size={}", self.options.page_size)];
        match self.options.kind {
            ListKind::Jobs => parts.push(format!("status={}", self.options.job_status.as_param())),
            kind if kind.is_exceptions() => parts.push(format!(
                "showing={}",
                if self.options.show_closed {
                    "closed"
                } else {
                    "open"
                }
            )),
            _ => {}
        }
        if !self.options.keywords.trim().is_empty() {
            parts.push(format!("keywords={}", self.options.keywords.trim()));
        }
        parts.join(" :: ")
    }

    fn visible_rows(&self) -> Vec<Vec<String>> {
        match &self.local_filter {
            None => self.screen.rows.clone(),
            Some(needle) => {
                let needle = needle.to_lowercase();
                self.screen
                    .rows
                    .iter()
                    .filter(|row| {
                        row.iter()
                            .any(|cell| cell.to_lowercase().contains(&needle))
                    })
                    .cloned()
                    .collect()
            }
        }
    }

    pub fn print_screen(&self) {
        println!();
        println!(
            "{} {} {} {}",
            "::".bold().white(),
            self.options.kind.title().bold().white(),
            "::".bold().white(),
            self.view_summary()
        );
        let rows = self.visible_rows();
        let lines = table::render(&self.screen.headers, &rows);
        if let Some((header, rest)) = lines.split_first() {
            println!("{}", header.bold());
            for line in rest {
                println!("{line}");
            }
        }
        println!("{}", pager::render_line(&self.screen.controls, &self.screen.label));
        if let Some(needle) = &self.local_filter {
            println!(
                "{}",
                format!(
                    "local filter '{}' ({}/{} rows)",
                    needle,
                    rows.len(),
                    self.screen.rows.len()
                )
                .dimmed()
            );
        }
    }

    fn print_help(&self) {
        println!("n/p/<num>   go to the previous/next/selected page");
        println!("s <text>    search keywords on the server (back to page 1)");
        println!("z <size>    change the page size");
        println!("t <value>   jobs: pending|running|finished|canceled; exceptions: open|closed");
        println!("/<text>     filter the rendered rows locally; bare / clears");
        println!("d <index>   delete the record (asks for confirmation)");
        println!("x <index>   stop a running job (asks for confirmation)");
        println!("c <index>   close an open exception with a remark");
        println!("e <index>   edit the plan/node behind the row");
        println!("a           create a new plan/node");
        println!("v <index>   project detail with per-spider statistics");
        println!("g <project> <spider> <version>   start a spider run");
        println!("i           probe the performance of every node on the page");
        println!("l <index>   tail the job log");
        println!("o <file>    export the current page (text/json/html by extension)");
        println!("r           refresh, q quit");
    }

    fn switch_filter(&mut self, value: &str) -> bool {
        match self.options.kind {
            ListKind::Jobs => match JobStatus::parse(value) {
                Some(status) => {
                    self.options.job_status = status;
                    true
                }
                None => {
                    flash(
                        "expected one of: pending, running, finished, canceled",
                        FlashLevel::Warning,
                    );
                    false
                }
            },
            kind if kind.is_exceptions() => match value.trim().to_lowercase().as_str() {
                "open" => {
                    self.options.show_closed = false;
                    true
                }
                "closed" => {
                    self.options.show_closed = true;
                    true
                }
                _ => {
                    flash("expected open or closed", FlashLevel::Warning);
                    false
                }
            },
            _ => {
                flash("this list has no status filter", FlashLevel::Warning);
                false
            }
        }
    }

    fn row_index(&self, token: &str) -> Option<usize> {
        let wanted: u64 = token.trim().parse().ok()?;
        let first = table::ordinal(self.screen.page_size, self.screen.page, 0);
        let index = wanted.checked_sub(first)? as usize;
        if index < self.screen.refs.len() {
            Some(index)
        } else {
            None
        }
    }

    fn row_ref(&self, token: &str) -> Option<RowRef> {
        self.row_index(token)
            .and_then(|index| self.screen.refs.get(index))
            .cloned()
    }

    // resolves a delete command to the link it would follow; declining
    // the confirmation resolves to nothing and no request is made
    pub fn pending_delete(&mut self, token: &str) -> Option<String> {
        let row = self.row_ref(token)?;
        if row.key.is_empty() {
            return None;
        }
        if !self.prompt.confirm("Delete this record? Please confirm!") {
            return None;
        }
        Some(self.options.kind.delete_path(&row.key))
    }

    pub fn pending_stop(&mut self, token: &str) -> Option<String> {
        let row = self.row_ref(token)?;
        if row.key.is_empty() {
            return None;
        }
        if !self.prompt.confirm("Stop this job? Please confirm!") {
            return None;
        }
        Some(format!("job/stop/{}", row.key))
    }

    async fn delete_command(&mut self, token: &str) -> Result<(), ConsoleError> {
        if self.options.kind == ListKind::Jobs && !self.options.job_status.is_terminal() {
            flash(
                "only finished/canceled jobs can be deleted (x stops a running one)",
                FlashLevel::Warning,
            );
            return Ok(());
        }
        if self.options.kind.is_exceptions() && !self.options.show_closed {
            flash(
                "open exceptions are closed first (c), closed ones can be deleted",
                FlashLevel::Warning,
            );
            return Ok(());
        }
        let Some(path) = self.pending_delete(token) else {
            return Ok(());
        };
        match self.client.follow_link(&path).await {
            Ok(()) => {
                flash("Delete success!", FlashLevel::Success);
                self.refresh(1).await?;
            }
            Err(error) => alert("failed to delete record", &error),
        }
        Ok(())
    }

    async fn stop_command(&mut self, token: &str) -> Result<(), ConsoleError> {
        if self.options.kind != ListKind::Jobs || self.options.job_status != JobStatus::Running {
            flash("stop applies to running jobs", FlashLevel::Warning);
            return Ok(());
        }
        let Some(path) = self.pending_stop(token) else {
            return Ok(());
        };
        match self.client.follow_link(&path).await {
            Ok(()) => {
                flash("Cancel success!", FlashLevel::Success);
                self.refresh(1).await?;
            }
            Err(error) => alert("failed to stop job", &error),
        }
        Ok(())
    }

    async fn close_exception_command(&mut self, token: &str) -> Result<(), ConsoleError> {
        let Some(update_path) = self.options.kind.exception_update_path() else {
            flash("close applies to exception lists", FlashLevel::Warning);
            return Ok(());
        };
        if self.options.show_closed {
            flash("these exceptions are already closed", FlashLevel::Warning);
            return Ok(());
        }
        let Some(row) = self.row_ref(token) else {
            flash("no such row", FlashLevel::Warning);
            return Ok(());
        };
        let record: ExceptionRecord = serde_json::from_value(row.wrap.clone()).unwrap_or_default();
        let Some(remark) = self
            .prompt
            .input("remark", record.remark.as_deref().unwrap_or(""))
        else {
            return Ok(());
        };
        let form = vec![
            ("id", row.key.clone()),
            ("is_closed", "1".to_string()),
            ("remark", remark),
        ];
        match self.client.submit(update_path, &form).await {
            Ok(()) => {
                flash("Update success!", FlashLevel::Success);
                self.refresh(1).await?;
            }
            Err(error) => alert("failed to update exception", &error),
        }
        Ok(())
    }

    async fn edit_command(&mut self, token: &str) -> Result<(), ConsoleError> {
        match self.options.kind {
            ListKind::Plans => {
                let Some(row) = self.row_ref(token) else {
                    flash("no such row", FlashLevel::Warning);
                    return Ok(());
                };
                let record: PlanRecord =
                    serde_json::from_value(row.wrap.clone()).unwrap_or_default();
                self.plan_form(Some(record)).await
            }
            ListKind::Nodes => {
                let Some(row) = self.row_ref(token) else {
                    flash("no such row", FlashLevel::Warning);
                    return Ok(());
                };
                let record: NodeRecord =
                    serde_json::from_value(row.wrap.clone()).unwrap_or_default();
                self.node_form(Some(record)).await
            }
            _ => {
                flash("edit applies to plans and nodes", FlashLevel::Warning);
                Ok(())
            }
        }
    }

    async fn add_command(&mut self) -> Result<(), ConsoleError> {
        match self.options.kind {
            ListKind::Plans => self.plan_form(None).await,
            ListKind::Nodes => self.node_form(None).await,
            _ => {
                flash("create applies to plans and nodes", FlashLevel::Warning);
                Ok(())
            }
        }
    }

    // the plan form walks the cascading option endpoints the same way the
    // original modal repopulated its dependent dropdowns
    async fn plan_form(&mut self, existing: Option<PlanRecord>) -> Result<(), ConsoleError> {
        let act = if existing.is_some() { "upd" } else { "add" };
        let projects = self.client.option_values("plan/projects", &[]).await?;
        if projects.is_empty() {
            flash("no projects available", FlashLevel::Warning);
            return Ok(());
        }
        let current_project = existing.as_ref().and_then(|r| r.project_name.as_deref());
        let Some(pick) = self.prompt.select(
            "project",
            &projects,
            preselect(&projects, current_project),
        ) else {
            return Ok(());
        };
        let project_name = projects[pick].clone();

        let versions = self
            .client
            .option_values(
                "plan/versions",
                &[("projectName", project_name.clone())],
            )
            .await?;
        if versions.is_empty() {
            flash("project has no versions", FlashLevel::Warning);
            return Ok(());
        }
        let current_version = existing.as_ref().and_then(|r| r.version_name.as_deref());
        let Some(pick) = self.prompt.select(
            "version",
            &versions,
            preselect(&versions, current_version),
        ) else {
            return Ok(());
        };
        let version_name = versions[pick].clone();

        let spiders = self
            .client
            .option_values(
                "plan/spiders",
                &[
                    ("projectName", project_name.clone()),
                    ("versionName", version_name.clone()),
                ],
            )
            .await?;
        if spiders.is_empty() {
            flash("version has no spiders", FlashLevel::Warning);
            return Ok(());
        }
        let current_spider = existing.as_ref().and_then(|r| r.spider_name.as_deref());
        let Some(pick) =
            self.prompt
                .select("spider", &spiders, preselect(&spiders, current_spider))
        else {
            return Ok(());
        };
        let spider_name = spiders[pick].clone();

        let mut hosts = vec!["auto".to_string()];
        hosts.extend(self.client.option_values("plan/clients", &[]).await?);
        let current_host = existing.as_ref().and_then(|r| r.host_port.as_deref());
        let Some(pick) = self
            .prompt
            .select("node", &hosts, preselect(&hosts, current_host))
        else {
            return Ok(());
        };
        let host_port = hosts[pick].clone();

        let plan_name = match &existing {
            // the plan name is the record key and stays read-only on update
            Some(record) => record.plan_name.clone().unwrap_or_default(),
            None => match self.prompt.input("plan name", "") {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => {
                    flash("a plan needs a name", FlashLevel::Warning);
                    return Ok(());
                }
            },
        };
        let Some(exec_args) = self.prompt.input(
            "exec args",
            existing
                .as_ref()
                .and_then(|r| r.exec_args.as_deref())
                .unwrap_or(""),
        ) else {
            return Ok(());
        };
        let priority_initial = existing
            .as_ref()
            .map(|r| r.priority.to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "0".to_string());
        let Some(priority) = self.prompt.input("priority", &priority_initial) else {
            return Ok(());
        };
        let Some(cron_exp) = self.prompt.input(
            "cron expression",
            existing
                .as_ref()
                .and_then(|r| r.cron_exp.as_deref())
                .unwrap_or(""),
        ) else {
            return Ok(());
        };
        if !cron_exp.trim().is_empty() && !utils::is_cron_expression(&cron_exp) {
            flash("invalid cron expression, expected 5 fields", FlashLevel::Warning);
            return Ok(());
        }
        let enabled = self.prompt.confirm("enable the plan?");

        let mut form = vec![
            ("act", act.to_string()),
            ("plan_name", plan_name),
            ("project_name", project_name),
            ("version_name", version_name),
            ("spider_name", spider_name),
            ("host_port", host_port),
            ("exec_args", exec_args),
            ("priority", priority.trim().to_string()),
            ("cron_exp", cron_exp.trim().to_string()),
        ];
        if enabled {
            form.push(("is_enabled", "1".to_string()));
        }
        match self.client.submit("plan/merge", &form).await {
            Ok(()) => {
                flash(&format!("{act} success!"), FlashLevel::Success);
                self.refresh(1).await?;
            }
            Err(error) => alert("failed to save plan", &error),
        }
        Ok(())
    }

    async fn node_form(&mut self, existing: Option<NodeRecord>) -> Result<(), ConsoleError> {
        let act = if existing.is_some() { "upd" } else { "add" };
        let host_port = match &existing {
            // the address is the record key and stays read-only on update
            Some(record) => record.host_port.clone().unwrap_or_default(),
            None => match self.prompt.input("host:port", "") {
                Some(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => {
                    flash("a node needs an address", FlashLevel::Warning);
                    return Ok(());
                }
            },
        };
        let Some(group_name) = self.prompt.input(
            "group",
            existing
                .as_ref()
                .and_then(|r| r.group_name.as_deref())
                .unwrap_or(""),
        ) else {
            return Ok(());
        };
        let Some(username) = self.prompt.input(
            "username",
            existing
                .as_ref()
                .and_then(|r| r.username.as_deref())
                .unwrap_or(""),
        ) else {
            return Ok(());
        };
        let Some(password) = self.prompt.input(
            "password",
            existing
                .as_ref()
                .and_then(|r| r.password.as_deref())
                .unwrap_or(""),
        ) else {
            return Ok(());
        };
        let Some(recipients) = self.prompt.input(
            "alert recipients",
            existing
                .as_ref()
                .and_then(|r| r.recipients.as_deref())
                .unwrap_or(""),
        ) else {
            return Ok(());
        };
        let form = vec![
            ("act", act.to_string()),
            ("host_port", host_port),
            ("group_name", group_name),
            ("username", username),
            ("password", password),
            ("recipients", recipients),
        ];
        match self.client.submit("node/merge", &form).await {
            Ok(()) => {
                flash(&format!("{act} success!"), FlashLevel::Success);
                self.refresh(1).await?;
            }
            Err(error) => alert("failed to save node", &error),
        }
        Ok(())
    }

    async fn project_detail_command(&mut self, token: &str) -> Result<(), ConsoleError> {
        if self.options.kind != ListKind::Projects {
            flash("detail applies to the projects list", FlashLevel::Warning);
            return Ok(());
        }
        let Some(row) = self.row_ref(token) else {
            flash("no such row", FlashLevel::Warning);
            return Ok(());
        };
        let record: ProjectRecord = serde_json::from_value(row.wrap.clone()).unwrap_or_default();
        let data_id = record.vc_md5.clone();
        let spinner = self.spinner("fetching detail");
        let detail: Result<Option<Vec<ProjectRecord>>, ClientError> = self
            .client
            .fetch_status(
                "project/detail/search",
                &[
                    ("keywords", self.options.keywords.clone()),
                    ("dataID", data_id),
                ],
            )
            .await;
        spinner.finish_and_clear();
        match detail {
            Ok(Some(versions)) => {
                for version in &versions {
                    println!();
                    println!(
                        "{} {} {} {}",
                        "::".bold().white(),
                        version.project_name.as_deref().unwrap_or("-").bold().white(),
                        "::".bold().white(),
                        version.version_name.as_deref().unwrap_or("-")
                    );
                    let rows = views::spider_detail_rows(&version.spiders);
                    for line in table::render(&SPIDER_DETAIL_HEADERS, &rows) {
                        println!("  {line}");
                    }
                }
                println!(
                    "{}",
                    "g <project> <spider> <version> starts a run".dimmed()
                );
            }
            Ok(None) => {}
            Err(error) => alert("failed to fetch project detail", &error),
        }
        Ok(())
    }

    async fn start_spider_command(&mut self, rest: &str) -> Result<(), ConsoleError> {
        if self.options.kind != ListKind::Projects {
            flash("start applies to the projects list", FlashLevel::Warning);
            return Ok(());
        }
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let [project, spider, version] = parts.as_slice() else {
            flash("usage: g <project> <spider> <version>", FlashLevel::Warning);
            return Ok(());
        };
        let path = format!("project/start/{project}/{spider}/{version}");
        match self.client.follow_link(&path).await {
            Ok(()) => flash("Start success!", FlashLevel::Success),
            Err(error) => alert("failed to start spider", &error),
        }
        Ok(())
    }

    async fn probe_nodes_command(&mut self) -> Result<(), ConsoleError> {
        if self.options.kind != ListKind::Nodes {
            flash("probe applies to the nodes list", FlashLevel::Warning);
            return Ok(());
        }
        let nodes: Vec<(String, String)> = self
            .screen
            .refs
            .iter()
            .filter(|row| !row.key.is_empty())
            .map(|row| {
                let label = row
                    .wrap
                    .get("host_port")
                    .and_then(Value::as_str)
                    .unwrap_or(&row.key)
                    .to_string();
                (label, row.key.clone())
            })
            .collect();
        if nodes.is_empty() {
            flash("no nodes on this page", FlashLevel::Warning);
            return Ok(());
        }
        let spinner = self.spinner("probing nodes");
        let probes = status::probe_nodes(&self.client, &nodes).await;
        spinner.finish_and_clear();
        let mut headers = vec!["Node"];
        headers.extend(status::PERFORMANCE_HEADERS);
        let rows: Vec<Vec<String>> = probes
            .iter()
            .map(|(label, outcome)| {
                let mut row = vec![label.clone()];
                match outcome {
                    Ok(Some(performance)) => row.extend(status::performance_row(performance)),
                    Ok(None) => row.push("offline".to_string()),
                    Err(error) => row.push(format!("error: {error}")),
                }
                row
            })
            .collect();
        for line in table::render(&headers, &rows) {
            println!("{line}");
        }
        Ok(())
    }

    async fn log_command(&mut self, token: &str) -> Result<(), ConsoleError> {
        if self.options.kind != ListKind::Jobs {
            flash("logs apply to the jobs list", FlashLevel::Warning);
            return Ok(());
        }
        if self.options.job_status == JobStatus::Pending {
            flash("pending jobs have no log yet", FlashLevel::Warning);
            return Ok(());
        }
        let Some(row) = self.row_ref(token) else {
            flash("no such row", FlashLevel::Warning);
            return Ok(());
        };
        let spinner = self.spinner("fetching log");
        let log = self.client.fetch_text(&format!("job/log/{}", row.key)).await;
        spinner.finish_and_clear();
        match log {
            Ok(text) => {
                for line in utils::tail_lines(&text, self.options.log_tail) {
                    println!("{line}");
                }
            }
            Err(error) => alert("failed to fetch job log", &error),
        }
        Ok(())
    }

    pub fn export(&self, path: &str) -> Result<(), ConsoleError> {
        let format = self
            .options
            .output_format
            .or_else(|| output::infer_format_from_path(path))
            .unwrap_or(OutputFormat::Text);
        let items: Vec<Value> = self.screen.refs.iter().map(|row| row.wrap.clone()).collect();
        let pager_text = pager::render_plain(&self.screen.controls, &self.screen.label);
        let pager_html = pager::render_html(&self.screen.controls, &self.screen.label);
        let view = output::ExportView {
            title: self.options.kind.title(),
            headers: &self.screen.headers,
            rows: &self.screen.rows,
            pager_text: &pager_text,
            pager_html: &pager_html,
            items: &items,
        };
        let rendered = output::render(&view, format);
        std::fs::write(path, rendered).map_err(|source| ConsoleError::OutputWrite {
            path: path.to_string(),
            source,
        })?;
        flash(&format!("wrote {path}"), FlashLevel::Success);
        Ok(())
    }
}

// the master status view; --watch turns it into a paced polling loop
pub async fn run_system(options: Options) -> Result<(), ConsoleError> {
    if options.master.trim().is_empty() {
        return Err(ConsoleError::MissingMaster);
    }
    let client = MasterClient::new(&ClientOptions {
        master: options.master.clone(),
        timeout_seconds: options.timeout_seconds,
        proxy: options.proxy.clone(),
    })?;
    if !options.watch {
        match status::fetch_master(&client).await {
            Ok(Some(performance)) => print_performance(&performance),
            Ok(None) => flash("master returned no status, try again", FlashLevel::Info),
            Err(error) => return Err(error.into()),
        }
        return Ok(());
    }

    let quota = Quota::with_period(Duration::from_secs(options.interval_seconds)).ok_or(
        ConsoleError::InvalidInterval {
            seconds: options.interval_seconds,
        },
    )?;
    let limiter = RateLimiter::direct(quota);
    loop {
        limiter.until_ready().await;
        match status::fetch_master(&client).await {
            Ok(Some(performance)) => print_performance(&performance),
            Ok(None) => {}
            Err(error) => alert("failed to fetch system status", &error),
        }
    }
}

fn print_performance(performance: &status::Performance) {
    let rows = vec![status::performance_row(performance)];
    let lines = table::render(&status::PERFORMANCE_HEADERS, &rows);
    println!();
    if let Some((header, rest)) = lines.split_first() {
        println!("{}", header.bold());
        for line in rest {
            println!("{line}");
        }
    }
}
