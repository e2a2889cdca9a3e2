use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, PipelineData, Record, Signature, SyntaxShape, Type, Value,
};

use crate::algo::handle::Handle;
use crate::InstacheckPlugin;

pub struct HandleCmd;

impl PluginCommand for HandleCmd {
    type Plugin = InstacheckPlugin;

    fn name(&self) -> &str {
        "instacheck handle"
    }

    fn description(&self) -> &str {
        "Canonicalize an Instagram username, @mention, or profile URL"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_type(Type::Nothing, Type::record())
            .required("raw", SyntaxShape::String, "Username, @mention, or profile URL")
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["instagram", "username", "handle", "normalize", "canonical"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: r#"instacheck handle "@Foo""#,
                description: "Strip the mention prefix and lowercase",
                result: None,
            },
            Example {
                example: r#"instacheck handle "https://www.instagram.com/José.Silva/?hl=en""#,
                description: "Reduce a profile URL to its handle",
                result: None,
            },
        ]
    }

    fn run(
        &self,
        _plugin: &InstacheckPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        _input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let raw: String = call.req(0)?;
        let head = call.head;

        let handle = match Handle::parse(&raw) {
            Some(h) => Value::string(h.into_string(), head),
            None => Value::nothing(head),
        };

        let mut result = Record::new();
        result.push("original", Value::string(&raw, head));
        result.push("handle", handle);

        Ok(PipelineData::Value(Value::record(result, head), None))
    }
}
