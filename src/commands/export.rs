use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type, Value,
};

use crate::algo::report::ExportFormat;
use crate::ops;
use crate::InstacheckPlugin;

use super::util::input_strings;

pub struct Export;

impl PluginCommand for Export {
    type Plugin = InstacheckPlugin;

    fn name(&self) -> &str {
        "instacheck export"
    }

    fn description(&self) -> &str {
        "Render a list of handles as CSV or as an @mention list"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::List(Box::new(Type::String)), Type::String),
                (Type::table(), Type::String),
            ])
            .named(
                "format",
                SyntaxShape::String,
                "Output format: csv, mentions (default: csv)",
                Some('f'),
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["instagram", "csv", "export", "clipboard", "mentions"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: "instacheck analyze export.zip --view not-following-back | instacheck export | save not_following_back.csv",
                description: "Save accounts that do not follow back as CSV",
                result: None,
            },
            Example {
                example: "[amy bob] | instacheck export --format mentions",
                description: "One @handle per line",
                result: Some(Value::test_string("@amy\n@bob")),
            },
        ]
    }

    fn run(
        &self,
        _plugin: &InstacheckPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let head = call.head;
        let format: String = call
            .get_flag::<String>("format")?
            .unwrap_or_else(|| "csv".into());
        if ExportFormat::from_str(&format).is_none() {
            return Err(LabeledError::new(format!(
                "Unknown format '{format}'. Use: {}",
                ExportFormat::all_names().join(", ")
            ))
            .with_label("invalid format", head));
        }

        let raws = input_strings(input);
        let rendered = ops::op_export(&raws, &format).map_err(LabeledError::new)?;

        Ok(PipelineData::Value(Value::string(rendered, head), None))
    }
}
