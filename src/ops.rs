//! Shared operation wrappers for all interfaces (CLI, MCP, plugin).
//!
//! Each `op_*` function is a synchronous wrapper around the `algo`
//! pipeline. Input and output are plain Rust / `serde_json::Value` — no
//! dependency on rmcp, clap, or nu-plugin. Errors are rendered to
//! human-readable strings for the surface to display.

use serde_json::{json, Value};

use crate::algo::extract::{EntryMap, FileInput};
use crate::algo::handle::Handle;
use crate::algo::pipeline::{self, PipelineConfig};
use crate::algo::relations::Analysis;
use crate::algo::report::{self, ExportFormat};
use crate::algo::view::{self, SortOrder, ViewKind};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Pipeline configuration: an explicit rules file if given, otherwise the
/// environment / XDG / embedded resolution chain.
pub fn load_config(rules_path: Option<&str>) -> Result<PipelineConfig, String> {
    match rules_path {
        Some(path) => PipelineConfig::with_rules_file(path),
        None => PipelineConfig::from_env(),
    }
    .map_err(|e| e.to_string())
}

fn strings(handles: &[Handle]) -> Vec<&str> {
    handles.iter().map(Handle::as_str).collect()
}

/// The full analysis as JSON: five sorted lists plus counts.
pub fn analysis_to_json(analysis: &Analysis) -> Value {
    let mut out = serde_json::Map::new();
    for kind in ViewKind::ALL {
        out.insert(
            kind.key().to_string(),
            json!(strings(&view::select(analysis, kind))),
        );
    }
    out.insert("counts".into(), json!(analysis.counts()));
    Value::Object(out)
}

// ── Operations ───────────────────────────────────────────────────────────────

/// Read files from disk and run the pipeline.
pub fn op_analyze_files(paths: &[String], config: &PipelineConfig) -> Result<Analysis, String> {
    let files = paths
        .iter()
        .map(FileInput::read)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    pipeline::analyze(&files, config).map_err(|e| e.to_string())
}

pub fn op_analyze_paths(paths: &[String], config: &PipelineConfig) -> Result<Value, String> {
    op_analyze_files(paths, config).map(|a| analysis_to_json(&a))
}

/// Analyze an inline `{path: json}` object, skipping the extraction step.
pub fn op_analyze_entries(entries: &Value, config: &PipelineConfig) -> Result<Value, String> {
    let map: EntryMap = match entries {
        Value::Object(obj) => obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => return Err("Expected an object mapping file paths to JSON payloads".into()),
    };
    if map.is_empty() {
        return Err(crate::InstacheckError::NoJson.to_string());
    }
    pipeline::analyze_entries(&map, config)
        .map(|a| analysis_to_json(&a))
        .map_err(|e| e.to_string())
}

/// One view of an analysis, sorted and filtered for display.
pub fn op_view(
    analysis: &Analysis,
    view_name: &str,
    sort: &str,
    filter: Option<&str>,
) -> Result<Vec<Handle>, String> {
    let kind = ViewKind::from_str(view_name).ok_or_else(|| {
        format!(
            "Unknown view '{view_name}'. Use: {}",
            ViewKind::all_names().join(", ")
        )
    })?;
    let order = SortOrder::from_str(sort).ok_or_else(|| {
        format!(
            "Unknown sort '{sort}'. Use: {}",
            SortOrder::all_names().join(", ")
        )
    })?;
    Ok(view::prepare(&view::select(analysis, kind), order, filter))
}

/// Canonicalize raw handles. Rejected inputs get a `null` handle.
pub fn op_canonicalize(raws: &[String]) -> Value {
    let rows: Vec<Value> = raws
        .iter()
        .map(|raw| {
            let handle = Handle::parse(raw).map(Handle::into_string);
            json!({"original": raw, "handle": handle})
        })
        .collect();
    Value::Array(rows)
}

/// Render handles as CSV or a mention list. Inputs are canonicalized first;
/// rejected ones are dropped, order is kept.
pub fn op_export(raws: &[String], format: &str) -> Result<String, String> {
    let format = ExportFormat::from_str(format).ok_or_else(|| {
        format!(
            "Unknown format '{format}'. Use: {}",
            ExportFormat::all_names().join(", ")
        )
    })?;
    let handles: Vec<Handle> = raws.iter().filter_map(|r| Handle::parse(r)).collect();
    Ok(report::render(&handles, format))
}
