use std::path::Path;

use nu_plugin::EngineInterface;
use nu_protocol::{LabeledError, PipelineData, Record, Span, Value};

use crate::algo::handle::Handle;
use crate::algo::relations::Analysis;
use crate::algo::view::{self, ViewKind};

/// Collect strings from any PipelineData.
///
/// Handles:
///   - List of strings → each string
///   - Single string → [s]
///   - List of records → each record's `handle` / `username` column
///   - Empty/Nothing → []
///
/// Values that cannot be turned into a string are skipped.
pub fn input_strings(input: PipelineData) -> Vec<String> {
    let values: Vec<Value> = match input {
        PipelineData::Value(Value::List { vals, .. }, _) => vals,
        PipelineData::Value(Value::Nothing { .. }, _) => vec![],
        PipelineData::Value(value, _) => vec![value],
        other => other.into_iter().collect(),
    };
    values.into_iter().filter_map(value_string).collect()
}

fn value_string(value: Value) -> Option<String> {
    match value {
        Value::Record { val, .. } => ["handle", "username"]
            .iter()
            .find_map(|col| val.get(*col).and_then(|v| v.coerce_string().ok())),
        Value::Nothing { .. } => None,
        other => other.coerce_string().ok(),
    }
}

/// Resolve plugin arguments against the caller's working directory.
pub fn resolve_paths(
    engine: &EngineInterface,
    paths: Vec<String>,
) -> Result<Vec<String>, LabeledError> {
    let cwd = engine.get_current_dir()?;
    Ok(paths
        .into_iter()
        .map(|p| {
            if Path::new(&p).is_absolute() {
                p
            } else {
                Path::new(&cwd).join(p).to_string_lossy().into_owned()
            }
        })
        .collect())
}

pub fn handles_to_value(handles: &[Handle], span: Span) -> Value {
    Value::list(
        handles
            .iter()
            .map(|h| Value::string(h.as_str(), span))
            .collect(),
        span,
    )
}

/// Full analysis as a record of five lists plus counts.
pub fn analysis_to_record(analysis: &Analysis, span: Span) -> Value {
    let counts = analysis.counts();

    let mut count_record = Record::new();
    count_record.push("followers", Value::int(counts.followers as i64, span));
    count_record.push("following", Value::int(counts.following as i64, span));
    count_record.push(
        "not_following_back",
        Value::int(counts.not_following_back as i64, span),
    );
    count_record.push(
        "not_followed_back",
        Value::int(counts.not_followed_back as i64, span),
    );
    count_record.push("mutuals", Value::int(counts.mutuals as i64, span));

    let mut record = Record::new();
    for kind in ViewKind::ALL {
        record.push(kind.key(), handles_to_value(&view::select(analysis, kind), span));
    }
    record.push("counts", Value::record(count_record, span));

    Value::record(record, span)
}
