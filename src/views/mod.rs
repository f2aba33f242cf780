pub mod table;

use serde::Deserialize;

use crate::client::WireValue;
use self::table::ordinal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Jobs,
    Nodes,
    Plans,
    Projects,
    JobExceptions,
    NodeExceptions,
    SystemExceptions,
}

impl ListKind {
    pub fn search_path(&self) -> &'static str {
        match self {
            ListKind::Jobs => "job/search",
            ListKind::Nodes => "node/search",
            ListKind::Plans => "plan/search",
            ListKind::Projects => "project/search",
            ListKind::JobExceptions => "job/exception/search",
            ListKind::NodeExceptions => "node/exception/search",
            ListKind::SystemExceptions => "system/exception/search",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListKind::Jobs => "Jobs",
            ListKind::Nodes => "Nodes",
            ListKind::Plans => "Plans",
            ListKind::Projects => "Projects",
            ListKind::JobExceptions => "Job Exceptions",
            ListKind::NodeExceptions => "Node Exceptions",
            ListKind::SystemExceptions => "System Exceptions",
        }
    }

    // destructive endpoints are navigable links keyed by the record's
    // content hash (projects are keyed by name instead)
    pub fn delete_path(&self, key: &str) -> String {
        match self {
            ListKind::Jobs => format!("job/delete/{key}"),
            ListKind::Nodes => format!("node/delete/{key}"),
            ListKind::Plans => format!("plan/delete/{key}"),
            ListKind::Projects => format!("project/delete/{key}"),
            ListKind::JobExceptions => format!("job/exception/delete/{key}"),
            ListKind::NodeExceptions => format!("node/exception/delete/{key}"),
            ListKind::SystemExceptions => format!("system/exception/delete/{key}"),
        }
    }

    pub fn exception_update_path(&self) -> Option<&'static str> {
        match self {
            ListKind::JobExceptions => Some("job/exception/update"),
            ListKind::NodeExceptions => Some("node/exception/update"),
            ListKind::SystemExceptions => Some("system/exception/update"),
            _ => None,
        }
    }

    pub fn is_exceptions(&self) -> bool {
        self.exception_update_path().is_some()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    #[default]
    Running,
    Finished,
    Canceled,
}

impl JobStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "finished" => Some(Self::Finished),
            "canceled" | "cancelled" => Some(Self::Canceled),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Canceled)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub vc_md5: String,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub host_port: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub spider_name: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub waiting_time: WireValue,
    #[serde(default)]
    pub running_time: WireValue,
    #[serde(default)]
    pub job_status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub vc_md5: String,
    #[serde(default)]
    pub host_port: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub recipients: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pending: WireValue,
    #[serde(default)]
    pub running: WireValue,
    #[serde(default)]
    pub finished: WireValue,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlanRecord {
    #[serde(default)]
    pub vc_md5: String,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub version_name: Option<String>,
    #[serde(default)]
    pub spider_name: Option<String>,
    #[serde(default)]
    pub host_port: Option<String>,
    #[serde(default, alias = "job_args")]
    pub exec_args: Option<String>,
    #[serde(default)]
    pub priority: WireValue,
    #[serde(default)]
    pub cron_exp: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub vc_md5: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub version_name: Option<String>,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub spiders: Vec<SpiderRecord>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SpiderRecord {
    #[serde(default)]
    pub spider_name: Option<String>,
    #[serde(default)]
    pub start_time_last: Option<String>,
    #[serde(default)]
    pub waiting_time_avg: WireValue,
    #[serde(default)]
    pub running_time_avg: WireValue,
    #[serde(default)]
    pub runs_num: WireValue,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExceptionRecord {
    #[serde(default)]
    pub vc_md5: String,
    #[serde(default)]
    pub host_port: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub spider_name: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub exc_time: Option<String>,
    #[serde(default)]
    pub exc_level: Option<String>,
    #[serde(default)]
    pub exc_message: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub is_closed: Option<bool>,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn headers_for(kind: ListKind, job_status: JobStatus, show_closed: bool) -> Vec<&'static str> {
    match kind {
        ListKind::Jobs => {
            let mut headers = vec!["Index", "JobID", "Node", "Project", "Spider", "Plan"];
            match job_status {
                JobStatus::Pending => headers.extend(["CreateTime", "WaitingTime"]),
                JobStatus::Running => {
                    headers.extend(["StartTime", "RunningTime", "Log", "Operation"])
                }
                _ => headers.extend(["EndTime", "RunningTime", "Log", "Operation"]),
            }
            headers
        }
        ListKind::Nodes => vec![
            "Index",
            "Group",
            "Node",
            "Name",
            "User",
            "Status",
            "Pending",
            "Running",
            "Finished",
            "Operation",
        ],
        ListKind::Plans => vec![
            "Index",
            "Plan",
            "Project",
            "Spider",
            "Node",
            "Priority",
            "Cron",
            "Enabled",
            "Operation",
        ],
        ListKind::Projects => vec![
            "Index",
            "Project",
            "Version",
            "Versions",
            "Spiders",
            "Operation",
        ],
        ListKind::JobExceptions => vec![
            "Index",
            "Node",
            "Project",
            "Spider",
            "JobID",
            "ExcTime",
            "ExcLevel",
            "Remark",
            "Operation",
        ],
        ListKind::NodeExceptions | ListKind::SystemExceptions => {
            let _ = show_closed;
            vec![
                "Index",
                "Node",
                "ExcTime",
                "ExcLevel",
                "ExcMessage",
                "Remark",
                "Operation",
            ]
        }
    }
}

pub fn rows_for(
    kind: ListKind,
    job_status: JobStatus,
    show_closed: bool,
    page: u64,
    page_size: u64,
    items: &[serde_json::Value],
) -> Vec<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let index_cell = ordinal(page_size, page, index).to_string();
            match kind {
                ListKind::Jobs => {
                    let record: JobRecord =
                        serde_json::from_value(item.clone()).unwrap_or_default();
                    job_row(index_cell, &record, job_status)
                }
                ListKind::Nodes => {
                    let record: NodeRecord =
                        serde_json::from_value(item.clone()).unwrap_or_default();
                    vec![
                        index_cell,
                        text(&record.group_name),
                        text(&record.host_port),
                        text(&record.node_name),
                        text(&record.username),
                        text(&record.status),
                        record.pending.to_string(),
                        record.running.to_string(),
                        record.finished.to_string(),
                        "edit delete".to_string(),
                    ]
                }
                ListKind::Plans => {
                    let record: PlanRecord =
                        serde_json::from_value(item.clone()).unwrap_or_default();
                    vec![
                        index_cell,
                        text(&record.plan_name),
                        text(&record.project_name),
                        text(&record.spider_name),
                        text(&record.host_port),
                        record.priority.to_string(),
                        text(&record.cron_exp),
                        record.is_enabled.unwrap_or(false).to_string(),
                        "edit delete".to_string(),
                    ]
                }
                ListKind::Projects => {
                    let record: ProjectRecord =
                        serde_json::from_value(item.clone()).unwrap_or_default();
                    vec![
                        index_cell,
                        text(&record.project_name),
                        text(&record.version_name),
                        record.versions.len().to_string(),
                        record.spiders.len().to_string(),
                        "detail delete".to_string(),
                    ]
                }
                ListKind::JobExceptions => {
                    let record: ExceptionRecord =
                        serde_json::from_value(item.clone()).unwrap_or_default();
                    vec![
                        index_cell,
                        text(&record.host_port),
                        text(&record.project_name),
                        text(&record.spider_name),
                        text(&record.job_id),
                        text(&record.exc_time),
                        text(&record.exc_level),
                        text(&record.remark),
                        exception_operation(show_closed),
                    ]
                }
                ListKind::NodeExceptions | ListKind::SystemExceptions => {
                    let record: ExceptionRecord =
                        serde_json::from_value(item.clone()).unwrap_or_default();
                    vec![
                        index_cell,
                        text(&record.host_port),
                        text(&record.exc_time),
                        text(&record.exc_level),
                        text(&record.exc_message),
                        text(&record.remark),
                        exception_operation(show_closed),
                    ]
                }
            }
        })
        .collect()
}

fn job_row(index_cell: String, record: &JobRecord, job_status: JobStatus) -> Vec<String> {
    let mut row = vec![
        index_cell,
        text(&record.job_id),
        text(&record.host_port),
        text(&record.project_name),
        text(&record.spider_name),
        text(&record.plan_name),
    ];
    match job_status {
        JobStatus::Pending => {
            row.push(text(&record.create_time));
            row.push(record.waiting_time.to_string());
        }
        JobStatus::Running => {
            row.push(text(&record.start_time));
            row.push(record.running_time.to_string());
            row.push("log".to_string());
            row.push("stop".to_string());
        }
        _ => {
            row.push(text(&record.end_time));
            row.push(record.running_time.to_string());
            row.push("log".to_string());
            row.push("delete".to_string());
        }
    }
    row
}

// open exceptions offer close-with-remark, closed ones can be deleted
fn exception_operation(show_closed: bool) -> String {
    if show_closed {
        "delete".to_string()
    } else {
        "close".to_string()
    }
}

pub const SPIDER_DETAIL_HEADERS: [&str; 6] = [
    "Index",
    "SpiderName",
    "StartTime(Last)",
    "WaitingTime(Avg)",
    "RunningTime(Avg)",
    "RunsNum",
];

pub fn spider_detail_rows(spiders: &[SpiderRecord]) -> Vec<Vec<String>> {
    spiders
        .iter()
        .enumerate()
        .map(|(index, spider)| {
            vec![
                (index + 1).to_string(),
                text(&spider.spider_name),
                text(&spider.start_time_last),
                spider.waiting_time_avg.to_string(),
                spider.running_time_avg.to_string(),
                spider.runs_num.to_string(),
            ]
        })
        .collect()
}
