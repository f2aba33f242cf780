use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "spiderdeck",
    version,
    about = "terminal admin console for a spider platform master",
    long_about = "Spiderdeck is a terminal console for a distributed spider platform master: it browses the paginated job, node, plan, project and exception lists, shows system performance, and drives the same search, edit and delete endpoints as the web dashboard.\n\nExamples:\n  spiderdeck jobs\n  spiderdeck -m http://master:5000 jobs -t pending\n  spiderdeck exceptions --scope node --closed\n  spiderdeck system --watch --interval 5s\n\nTip: settings persist in ~/.spiderdeck/config.yml so invocations stay short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Export the fetched page to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long = "fmt",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Export format: text, json, or html (inferred from the file extension by default)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'm',
        long = "ms",
        visible_alias = "master",
        value_name = "URL",
        help_heading = "Connection",
        help = "Master base url, e.g. http://127.0.0.1:5000."
    )]
    pub master: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Connection",
        help = "Path to config file (defaults to ~/.spiderdeck/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Connection",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        help_heading = "Connection",
        help = "Route requests through an HTTP proxy."
    )]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Browse the job list (columns follow the status filter)
    Jobs(JobsArgs),
    /// Browse and manage slave nodes
    Nodes(ListArgs),
    /// Browse and manage scheduled plans
    Plans(ListArgs),
    /// Browse deployed projects and their spiders
    Projects(ListArgs),
    /// Browse job/node/system exception lists
    Exceptions(ExceptionArgs),
    /// Show master performance metrics
    System(SystemArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Listing",
        help = "Page to fetch first (default 1)."
    )]
    pub page: Option<u64>,

    #[arg(
        short = 'z',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Listing",
        help = "Rows per page."
    )]
    pub page_size: Option<u64>,

    #[arg(
        short = 'k',
        long = "kw",
        visible_alias = "keywords",
        value_name = "TEXT",
        help_heading = "Listing",
        help = "Free-text search keywords."
    )]
    pub keywords: Option<String>,

    #[arg(
        short = 'b',
        long = "batch",
        help_heading = "Listing",
        help = "Fetch one page, print it, and exit (no interactive console)."
    )]
    pub batch: bool,
}

#[derive(Args, Debug, Clone)]
pub struct JobsArgs {
    #[arg(
        short = 't',
        long = "st",
        visible_alias = "status",
        value_name = "STATUS",
        help_heading = "Listing",
        help = "Job status filter: pending, running, finished, or canceled."
    )]
    pub status: Option<String>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ExceptionArgs {
    #[arg(
        short = 's',
        long = "scope",
        value_name = "SCOPE",
        default_value = "job",
        help_heading = "Listing",
        help = "Exception list to browse: job, node, or system."
    )]
    pub scope: String,

    #[arg(
        long = "closed",
        help_heading = "Listing",
        help = "Show closed exceptions instead of open ones."
    )]
    pub closed: bool,

    #[arg(
        long = "node-id",
        value_name = "ID",
        help_heading = "Listing",
        help = "Limit node/system exceptions to one node."
    )]
    pub node_id: Option<String>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SystemArgs {
    #[arg(
        short = 'w',
        long = "watch",
        help_heading = "Status",
        help = "Keep polling the status endpoint."
    )]
    pub watch: bool,

    #[arg(
        short = 'i',
        long = "iv",
        visible_alias = "interval",
        value_name = "DURATION",
        help_heading = "Status",
        help = "Polling interval for --watch, e.g. 5s or 1m."
    )]
    pub interval: Option<String>,
}
