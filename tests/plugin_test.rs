//! Plugin command tests driven through an in-process Nushell engine.

#![cfg(feature = "plugin")]

use nu_plugin_instacheck::commands::{Export, HandleCmd};
use nu_plugin_instacheck::InstacheckPlugin;
use nu_plugin_test_support::PluginTest;
use nu_protocol::{ShellError, Span, Value};

fn plugin_test() -> Result<PluginTest, ShellError> {
    PluginTest::new("instacheck", InstacheckPlugin.into())
}

#[test]
fn export_examples() -> Result<(), ShellError> {
    plugin_test()?.test_command_examples(&Export)
}

#[test]
fn handle_examples() -> Result<(), ShellError> {
    plugin_test()?.test_command_examples(&HandleCmd)
}

#[test]
fn handle_strips_mention() -> Result<(), ShellError> {
    let value = plugin_test()?
        .eval(r#"instacheck handle "@Foo" | get handle"#)?
        .into_value(Span::test_data())?;
    assert_eq!(value, Value::test_string("foo"));
    Ok(())
}

#[test]
fn handle_rejected_is_nothing() -> Result<(), ShellError> {
    let value = plugin_test()?
        .eval(r#"instacheck handle "@" | get handle"#)?
        .into_value(Span::test_data())?;
    assert!(value.is_nothing());
    Ok(())
}

#[test]
fn export_csv_from_list() -> Result<(), ShellError> {
    let value = plugin_test()?
        .eval(r#"["@Amy"] | instacheck export"#)?
        .into_value(Span::test_data())?;
    assert_eq!(
        value.as_str()?,
        "username,profile_url\n\"amy\",\"https://instagram.com/amy\""
    );
    Ok(())
}
