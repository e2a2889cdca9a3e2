use clap::{Parser, Subcommand};
use nu_plugin_instacheck::algo::classify;
use nu_plugin_instacheck::algo::report::{self, ExportFormat};
use nu_plugin_instacheck::ops;

#[derive(Parser)]
#[command(
    name = "instacheck",
    version,
    about = "Find who does not follow you back, from an Instagram data export"
)]
struct Cli {
    /// Start as an MCP (Model Context Protocol) server on stdio.
    /// AI assistants (Claude Desktop, Cursor, etc.) connect via JSON-RPC.
    #[cfg(feature = "mcp")]
    #[arg(long, exclusive = true)]
    mcp: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an export archive (.zip) or loose JSON files
    Analyze {
        /// Export archive or JSON files
        #[arg(required = true)]
        files: Vec<String>,
        /// Print a single list: not-following-back, not-followed-back, mutuals, followers, following
        #[arg(short, long)]
        view: Option<String>,
        /// Sort for --view: asc, desc, len, len-desc
        #[arg(short, long, default_value = "asc")]
        sort: String,
        /// Keep handles containing this text (with --view)
        #[arg(short = 'F', long)]
        filter: Option<String>,
        /// Output: json, csv, mentions (csv/mentions require --view)
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Path to a classification rules JSON file
        #[arg(short, long)]
        rules: Option<String>,
    },
    /// Canonicalize usernames, @mentions, or profile URLs
    Handle {
        /// Raw handles
        #[arg(required = true)]
        raw: Vec<String>,
    },
    /// Print the effective classification rules as JSON
    Rules {
        /// Print the embedded defaults, ignoring overrides
        #[arg(long)]
        embedded: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    // ── MCP server mode ─────────────────────────────────────────────────
    #[cfg(feature = "mcp")]
    if cli.mcp {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => fail(&format!("failed to create tokio runtime: {e}")),
        };
        rt.block_on(async {
            if let Err(e) = nu_plugin_instacheck::mcp::serve_stdio().await {
                fail(&format!("MCP server error: {e}"));
            }
        });
        return;
    }

    // ── Normal subcommand dispatch ──────────────────────────────────────
    let command = cli.command.unwrap_or_else(|| {
        fail("No subcommand provided. Run `instacheck --help` for usage.");
    });

    match command {
        Commands::Analyze {
            files,
            view,
            sort,
            filter,
            format,
            rules,
        } => cmd_analyze(
            &files,
            view.as_deref(),
            &sort,
            filter.as_deref(),
            &format,
            rules.as_deref(),
        ),
        Commands::Handle { raw } => print_json(&ops::op_canonicalize(&raw)),
        Commands::Rules { embedded } => cmd_rules(embedded),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(&format!("failed to serialize output: {e}")),
    }
}

fn cmd_analyze(
    files: &[String],
    view: Option<&str>,
    sort: &str,
    filter: Option<&str>,
    format: &str,
    rules: Option<&str>,
) {
    let config = ops::load_config(rules).unwrap_or_else(|e| fail(&e));
    let analysis = ops::op_analyze_files(files, &config).unwrap_or_else(|e| fail(&e));

    let Some(view) = view else {
        if format != "json" {
            fail("--format csv/mentions needs a single list; pass --view");
        }
        print_json(&ops::analysis_to_json(&analysis));
        return;
    };

    let handles = ops::op_view(&analysis, view, sort, filter).unwrap_or_else(|e| fail(&e));
    if format == "json" {
        let list: Vec<&str> = handles.iter().map(|h| h.as_str()).collect();
        print_json(&serde_json::json!(list));
        return;
    }

    let export = ExportFormat::from_str(format).unwrap_or_else(|| {
        fail(&format!(
            "Unknown format '{format}'. Use: json, {}",
            ExportFormat::all_names().join(", ")
        ))
    });
    println!("{}", report::render(&handles, export));
}

fn cmd_rules(embedded: bool) {
    let set = if embedded {
        classify::parse_rules(classify::embedded_default_json())
            .unwrap_or_else(|e| fail(&e.to_string()))
    } else {
        classify::default_rules()
    };
    match serde_json::to_value(&set) {
        Ok(value) => print_json(&value),
        Err(e) => fail(&format!("failed to serialize rules: {e}")),
    }
}
