use serde_json::json;

use crate::client::WireValue;
use crate::console::{preselect, Console, Options, Prompt};
use crate::output::{self, ExportView, OutputFormat};
use crate::pager::{self, Control, Page};
use crate::views::{self, JobStatus, ListKind};

struct ScriptedPrompt {
    confirm_answer: bool,
}

impl ScriptedPrompt {
    fn answering(confirm_answer: bool) -> Self {
        Self { confirm_answer }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, _message: &str) -> bool {
        self.confirm_answer
    }

    fn input(&mut self, _label: &str, initial: &str) -> Option<String> {
        Some(initial.to_string())
    }

    fn select(&mut self, _label: &str, _options: &[String], default: usize) -> Option<usize> {
        Some(default)
    }
}

fn page_envelope(
    page: u64,
    pages: u64,
    has_prev: bool,
    has_next: bool,
    window: Vec<Option<u64>>,
    items: Vec<serde_json::Value>,
) -> Page<serde_json::Value> {
    Page {
        has_prev,
        iter_pages: window,
        page,
        pages,
        has_next,
        items,
    }
}

fn plans_console(prompt: ScriptedPrompt) -> Console<ScriptedPrompt> {
    let options = Options {
        kind: ListKind::Plans,
        ..Options::default()
    };
    Console::new(options, prompt).unwrap()
}

#[test]
fn pager_omits_prev_when_first_page() {
    let envelope = page_envelope(1, 3, false, true, vec![Some(1), Some(2), Some(3)], vec![]);
    let controls = pager::controls(&envelope);
    assert!(!controls.iter().any(|c| matches!(c, Control::Prev { .. })));
    assert!(controls.iter().any(|c| matches!(c, Control::Next { .. })));
}

#[test]
fn pager_omits_next_when_last_page() {
    let envelope = page_envelope(3, 3, true, false, vec![Some(1), Some(2), Some(3)], vec![]);
    let controls = pager::controls(&envelope);
    assert!(controls.iter().any(|c| matches!(c, Control::Prev { .. })));
    assert!(!controls.iter().any(|c| matches!(c, Control::Next { .. })));
}

#[test]
fn pager_gap_markers_are_not_interactive() {
    let envelope = page_envelope(
        5,
        20,
        true,
        true,
        vec![Some(1), Some(2), None, Some(4), Some(5), Some(6), None, Some(20)],
        vec![],
    );
    let controls = pager::controls(&envelope);
    let gaps: Vec<&Control> = controls
        .iter()
        .filter(|c| matches!(c, Control::Gap))
        .collect();
    assert_eq!(gaps.len(), 2);
    assert!(gaps.iter().all(|c| c.target().is_none()));
}

#[test]
fn pager_active_page_is_not_clickable() {
    let envelope = page_envelope(2, 3, true, true, vec![Some(1), Some(2), Some(3)], vec![]);
    let controls = pager::controls(&envelope);
    let active = controls
        .iter()
        .find(|c| matches!(c, Control::Number { active: true, .. }))
        .unwrap();
    assert_eq!(active.target(), None);
    assert_eq!(pager::resolve_target(&controls, "2"), None);
    assert_eq!(pager::resolve_target(&controls, "3"), Some(3));
}

#[test]
fn pager_navigation_tokens_follow_available_controls() {
    let first = pager::controls(&page_envelope(
        1,
        2,
        false,
        true,
        vec![Some(1), Some(2)],
        vec![],
    ));
    assert_eq!(pager::resolve_target(&first, "p"), None);
    assert_eq!(pager::resolve_target(&first, "n"), Some(2));

    let last = pager::controls(&page_envelope(
        2,
        2,
        true,
        false,
        vec![Some(1), Some(2)],
        vec![],
    ));
    assert_eq!(pager::resolve_target(&last, "n"), None);
    assert_eq!(pager::resolve_target(&last, "p"), Some(1));
}

#[test]
fn pager_empty_window_renders_only_the_label() {
    let envelope: Page<serde_json::Value> = page_envelope(0, 0, false, false, vec![], vec![]);
    let controls = pager::controls(&envelope);
    assert!(controls.is_empty());
    let line = pager::render_plain(&controls, &pager::label(0, 0));
    assert_eq!(line, "page ( 0/0 )");
}

#[test]
fn pager_html_marks_active_and_disabled_entries() {
    let envelope = page_envelope(
        2,
        9,
        true,
        true,
        vec![Some(1), Some(2), None, Some(9)],
        vec![],
    );
    let controls = pager::controls(&envelope);
    let html = pager::render_html(&controls, &pager::label(2, 9));
    assert!(html.contains("<li class=\"active\"><a href=\"#\">2</a></li>"));
    assert!(html.contains("<li class=\"disabled\"><a href=\"#\">&hellip;</a></li>"));
    assert!(html.contains("data-id=\"1\""));
    assert!(html.contains("data-id=\"3\""));
    assert!(html.contains("page ( 2/9 )"));
}

#[test]
fn first_ordinal_on_second_page_is_eleven() {
    let items = vec![json!({"vc_md5": "a", "plan_name": "p"})];
    let rows = views::rows_for(ListKind::Plans, JobStatus::Running, false, 2, 10, &items);
    assert_eq!(rows[0][0], "11");
}

#[test]
fn job_headers_follow_the_status_filter() {
    let pending = views::headers_for(ListKind::Jobs, JobStatus::Pending, false);
    assert!(pending.contains(&"CreateTime"));
    assert!(pending.contains(&"WaitingTime"));
    assert!(!pending.contains(&"Operation"));

    let running = views::headers_for(ListKind::Jobs, JobStatus::Running, false);
    assert!(running.contains(&"StartTime"));
    assert!(running.contains(&"RunningTime"));
    assert!(running.contains(&"Log"));

    let finished = views::headers_for(ListKind::Jobs, JobStatus::Finished, false);
    assert!(finished.contains(&"EndTime"));
    let canceled = views::headers_for(ListKind::Jobs, JobStatus::Canceled, false);
    assert_eq!(finished, canceled);
}

#[test]
fn exception_rows_offer_close_then_delete() {
    let items = vec![json!({"vc_md5": "e1", "host_port": "slave:6800"})];
    let open = views::rows_for(ListKind::NodeExceptions, JobStatus::Running, false, 1, 10, &items);
    assert_eq!(open[0].last().unwrap(), "close");
    let closed = views::rows_for(ListKind::NodeExceptions, JobStatus::Running, true, 1, 10, &items);
    assert_eq!(closed[0].last().unwrap(), "delete");
}

#[test]
fn empty_response_leaves_previous_screen_unchanged() {
    let mut console = plans_console(ScriptedPrompt::answering(true));
    let items = vec![json!({"vc_md5": "abc", "plan_name": "nightly"})];
    console.apply_response(
        1,
        Some(page_envelope(1, 1, false, false, vec![Some(1)], items)),
    );
    let rows_before = console.screen().rows.clone();
    assert_eq!(rows_before.len(), 1);

    console.apply_response(2, None);
    assert_eq!(console.screen().rows, rows_before);
    assert_eq!(console.screen().seq, 1);
}

#[test]
fn stale_response_never_overwrites_newer_content() {
    let mut console = plans_console(ScriptedPrompt::answering(true));
    let newer = page_envelope(
        3,
        5,
        true,
        true,
        vec![Some(2), Some(3), Some(4)],
        vec![json!({"vc_md5": "new", "plan_name": "fresh"})],
    );
    let older = page_envelope(
        1,
        5,
        false,
        true,
        vec![Some(1), Some(2)],
        vec![json!({"vc_md5": "old", "plan_name": "stale"})],
    );
    console.apply_response(2, Some(newer));
    console.apply_response(1, Some(older));
    assert_eq!(console.screen().page, 3);
    assert_eq!(console.screen().refs[0].key, "new");
}

#[test]
fn declined_confirmation_resolves_no_request() {
    let mut console = plans_console(ScriptedPrompt::answering(false));
    console.apply_response(
        1,
        Some(page_envelope(
            1,
            1,
            false,
            false,
            vec![Some(1)],
            vec![json!({"vc_md5": "abc", "plan_name": "nightly"})],
        )),
    );
    assert_eq!(console.pending_delete("1"), None);
}

#[test]
fn accepted_confirmation_resolves_the_delete_link() {
    let mut console = plans_console(ScriptedPrompt::answering(true));
    console.apply_response(
        1,
        Some(page_envelope(
            1,
            1,
            false,
            false,
            vec![Some(1)],
            vec![json!({"vc_md5": "abc", "plan_name": "nightly"})],
        )),
    );
    assert_eq!(
        console.pending_delete("1").as_deref(),
        Some("plan/delete/abc")
    );
}

#[test]
fn search_form_carries_the_jobs_status_filter() {
    let options = Options {
        kind: ListKind::Jobs,
        job_status: JobStatus::Pending,
        keywords: "books".to_string(),
        ..Options::default()
    };
    let console = Console::new(options, ScriptedPrompt::answering(true)).unwrap();
    let form = console.search_form(2);
    assert!(form.contains(&("pageNum", "2".to_string())));
    assert!(form.contains(&("dataType", "pending".to_string())));
    assert!(form.contains(&("keywords", "books".to_string())));
}

#[test]
fn search_form_flags_closed_exceptions_and_node_scope() {
    let options = Options {
        kind: ListKind::NodeExceptions,
        show_closed: true,
        data_id: Some("node-md5".to_string()),
        ..Options::default()
    };
    let console = Console::new(options, ScriptedPrompt::answering(true)).unwrap();
    let form = console.search_form(0);
    // a falsy page asks for the first one
    assert!(form.contains(&("pageNum", "1".to_string())));
    assert!(form.contains(&("dataType", "1".to_string())));
    assert!(form.contains(&("dataID", "node-md5".to_string())));
}

#[test]
fn preselect_prefers_the_current_value() {
    let options = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
    assert_eq!(preselect(&options, Some("beta")), 1);
    assert_eq!(preselect(&options, Some("missing")), 0);
    assert_eq!(preselect(&options, None), 0);
}

#[test]
fn project_delete_links_use_the_project_name() {
    let mut console = {
        let options = Options {
            kind: ListKind::Projects,
            ..Options::default()
        };
        Console::new(options, ScriptedPrompt::answering(true)).unwrap()
    };
    console.apply_response(
        1,
        Some(page_envelope(
            1,
            1,
            false,
            false,
            vec![Some(1)],
            vec![json!({"vc_md5": "md5", "project_name": "books"})],
        )),
    );
    assert_eq!(
        console.pending_delete("1").as_deref(),
        Some("project/delete/books")
    );
}

#[test]
fn page_envelope_deserializes_null_gap_markers() {
    let raw = json!({
        "has_prev": true,
        "iter_pages": [1, 2, null, 9, 10],
        "page": 2,
        "pages": 10,
        "has_next": true,
        "items": [{"vc_md5": "x"}]
    });
    let envelope: Page<serde_json::Value> = serde_json::from_value(raw).unwrap();
    assert_eq!(envelope.iter_pages[2], None);
    let controls = pager::controls(&envelope);
    assert!(controls.iter().any(|c| matches!(c, Control::Gap)));
}

#[test]
fn wire_values_render_like_the_original_cells() {
    let number: WireValue = serde_json::from_value(json!(3.0)).unwrap();
    assert_eq!(number.to_string(), "3");
    let speed: WireValue = serde_json::from_value(json!("1.2 MB/s")).unwrap();
    assert_eq!(speed.to_string(), "1.2 MB/s");
    let missing: WireValue = serde_json::from_value(json!(null)).unwrap();
    assert_eq!(missing.to_string(), "");
    let fraction: WireValue = serde_json::from_value(json!(12.5)).unwrap();
    assert_eq!(fraction.to_string(), "12.5");
}

#[test]
fn html_export_contains_table_and_pager_markup() {
    let controls = pager::controls(&page_envelope(
        1,
        2,
        false,
        true,
        vec![Some(1), Some(2)],
        vec![],
    ));
    let pager_html = pager::render_html(&controls, &pager::label(1, 2));
    let rows = vec![vec!["1".to_string(), "nightly & daily".to_string()]];
    let items = vec![json!({"plan_name": "nightly & daily"})];
    let view = ExportView {
        title: "Plans",
        headers: &["Index", "Plan"],
        rows: &rows,
        pager_text: "1 2",
        pager_html: &pager_html,
        items: &items,
    };
    let html = String::from_utf8(output::render(&view, OutputFormat::Html)).unwrap();
    assert!(html.contains("<th>Plan</th>"));
    assert!(html.contains("<td>nightly &amp; daily</td>"));
    assert!(html.contains("class=\"pagination\""));
    assert!(html.contains("<li class=\"active\">"));
}

#[test]
fn output_format_inference_follows_the_extension() {
    assert_eq!(
        output::infer_format_from_path("./page.json"),
        Some(OutputFormat::Json)
    );
    assert_eq!(
        output::infer_format_from_path("./page.HTML"),
        Some(OutputFormat::Html)
    );
    assert_eq!(output::infer_format_from_path("./page.csv"), None);
}

#[test]
fn cron_validation_accepts_five_fields_only() {
    assert!(crate::utils::is_cron_expression("*/5 * * * *"));
    assert!(crate::utils::is_cron_expression("0 3,15 1-7 * 1"));
    assert!(!crate::utils::is_cron_expression("* * * *"));
    assert!(!crate::utils::is_cron_expression("every five minutes"));
}

#[test]
fn interval_parsing_handles_units() {
    assert_eq!(crate::utils::parse_interval_seconds("5").unwrap(), 5);
    assert_eq!(crate::utils::parse_interval_seconds("5s").unwrap(), 5);
    assert_eq!(crate::utils::parse_interval_seconds("2m").unwrap(), 120);
    assert!(crate::utils::parse_interval_seconds("0s").is_err());
    assert!(crate::utils::parse_interval_seconds("fast").is_err());
}

#[test]
fn page_size_bounds_are_enforced() {
    assert!(crate::utils::parse_page_size("10").is_ok());
    assert!(crate::utils::parse_page_size("0").is_err());
    assert!(crate::utils::parse_page_size("1000").is_err());
}

#[test]
fn config_aliases_and_fields_parse() {
    let cfg: crate::config::ConfigFile = serde_yaml::from_str(
        "master_url: http://master:5000\npage_size: 25\njob_status: pending\n",
    )
    .unwrap();
    assert_eq!(cfg.master.as_deref(), Some("http://master:5000"));
    assert_eq!(cfg.page_size, Some(25));
    assert_eq!(cfg.job_status.as_deref(), Some("pending"));
}

#[test]
fn job_status_parser_accepts_both_spellings_of_canceled() {
    assert_eq!(JobStatus::parse("canceled"), Some(JobStatus::Canceled));
    assert_eq!(JobStatus::parse("cancelled"), Some(JobStatus::Canceled));
    assert_eq!(JobStatus::parse("sleeping"), None);
    assert!(JobStatus::Finished.is_terminal());
    assert!(!JobStatus::Running.is_terminal());
}
