use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type,
};

use crate::ops;
use crate::InstacheckPlugin;

use super::util::{analysis_to_record, handles_to_value, resolve_paths};

pub struct Analyze;

impl PluginCommand for Analyze {
    type Plugin = InstacheckPlugin;

    fn name(&self) -> &str {
        "instacheck analyze"
    }

    fn description(&self) -> &str {
        "Analyze an Instagram data export: followers, following, and who does not follow back"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::Nothing, Type::record()),
                (Type::Nothing, Type::List(Box::new(Type::String))),
            ])
            .rest(
                "files",
                SyntaxShape::Filepath,
                "Export archive (.zip) or loose JSON files",
            )
            .named(
                "view",
                SyntaxShape::String,
                "Return a single list: not-following-back, not-followed-back, mutuals, followers, following",
                Some('v'),
            )
            .named(
                "sort",
                SyntaxShape::String,
                "Sort for --view: asc, desc, len, len-desc (default: asc)",
                Some('s'),
            )
            .named(
                "filter",
                SyntaxShape::String,
                "Keep handles containing this text (with --view)",
                Some('f'),
            )
            .named(
                "rules",
                SyntaxShape::Filepath,
                "Path to a classification rules JSON file",
                Some('r'),
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["instagram", "followers", "following", "unfollow", "mutuals", "export"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: "instacheck analyze instagram-export.zip",
                description: "Analyze a complete export archive",
                result: None,
            },
            Example {
                example: "instacheck analyze followers_1.json following.json --view not-following-back",
                description: "List accounts you follow that do not follow you back",
                result: None,
            },
            Example {
                example: "instacheck analyze export.zip --view mutuals --sort len --filter ana",
                description: "Mutual follows containing 'ana', shortest first",
                result: None,
            },
        ]
    }

    fn run(
        &self,
        _plugin: &InstacheckPlugin,
        engine: &EngineInterface,
        call: &EvaluatedCall,
        _input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let head = call.head;
        let files: Vec<String> = call.rest(0)?;
        let view: Option<String> = call.get_flag("view")?;
        let sort: String = call
            .get_flag::<String>("sort")?
            .unwrap_or_else(|| "asc".into());
        let filter: Option<String> = call.get_flag("filter")?;
        let rules: Option<String> = call.get_flag("rules")?;

        let files = resolve_paths(engine, files)?;
        let rules = match rules {
            Some(path) => Some(resolve_paths(engine, vec![path])?.remove(0)),
            None => None,
        };

        let config = ops::load_config(rules.as_deref()).map_err(LabeledError::new)?;
        let analysis = ops::op_analyze_files(&files, &config).map_err(LabeledError::new)?;

        let value = match view {
            Some(view) => {
                let handles = ops::op_view(&analysis, &view, &sort, filter.as_deref())
                    .map_err(LabeledError::new)?;
                handles_to_value(&handles, head)
            }
            None => analysis_to_record(&analysis, head),
        };

        Ok(PipelineData::Value(value, None))
    }
}
