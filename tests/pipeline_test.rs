//! End-to-end behaviour of the export pipeline: files in, sets and views out.

use std::io::{Cursor, Write};

use nu_plugin_instacheck::algo::extract::{self, ExtractConfig, FileInput};
use nu_plugin_instacheck::algo::handle::{canonicalize, Handle};
use nu_plugin_instacheck::algo::normalize;
use nu_plugin_instacheck::algo::pipeline::{analyze, analyze_entries, PipelineConfig};
use nu_plugin_instacheck::algo::classify::Classifier;
use nu_plugin_instacheck::InstacheckError;
use serde_json::json;
use zip::write::SimpleFileOptions;

fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn strs(handles: &[Handle]) -> Vec<&str> {
    handles.iter().map(Handle::as_str).collect()
}

fn set_strs<'a>(handles: impl IntoIterator<Item = &'a Handle>) -> Vec<&'a str> {
    handles.into_iter().map(Handle::as_str).collect()
}

const FOLLOWERS_ALICE: &str =
    r#"{"relationships_followers":[{"string_list_data":[{"value":"Alice"}]}]}"#;
const FOLLOWING_BOB: &str =
    r#"{"relationships_following":[{"string_list_data":[{"value":"bob"}]}]}"#;

#[test]
fn loose_files_disjoint_relationships() {
    let files = vec![
        FileInput::from_text("followers.json", FOLLOWERS_ALICE),
        FileInput::from_text("following.json", FOLLOWING_BOB),
    ];
    let a = analyze(&files, &PipelineConfig::default()).unwrap();

    assert_eq!(set_strs(&a.followers), vec!["alice"]);
    assert_eq!(set_strs(&a.following), vec!["bob"]);
    assert_eq!(strs(&a.views.not_following_back), vec!["bob"]);
    assert_eq!(strs(&a.views.not_followed_back), vec!["alice"]);
    assert!(a.views.mutuals.is_empty());
}

#[test]
fn mention_and_plain_forms_are_mutual() {
    let files = vec![
        FileInput::from_text(
            "followers.json",
            r#"[{"string_list_data":[{"value":"@Carol"}]}]"#,
        ),
        FileInput::from_text(
            "following.json",
            r#"[{"string_list_data":[{"value":"carol"}]}]"#,
        ),
    ];
    let a = analyze(&files, &PipelineConfig::default()).unwrap();

    assert_eq!(strs(&a.views.mutuals), vec!["carol"]);
    assert!(a.views.not_following_back.is_empty());
    assert!(a.views.not_followed_back.is_empty());
}

#[test]
fn archive_without_json_is_no_json() {
    let bytes = zip_of(&[("media/photo.jpg", "jpeg"), ("index.html", "<html>")]);
    let err = analyze(
        &[FileInput::new("export.zip", bytes)],
        &PipelineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, InstacheckError::NoJson), "got {err}");
}

#[test]
fn archive_with_unrelated_json_is_no_relationship_data() {
    let bytes = zip_of(&[
        ("personal_information/personal_information.json", r#"{"profile_user":[{"title":"me"}]}"#),
        ("ads_information/ads_interests.json", r#"{"topics":["rust"]}"#),
    ]);
    let err = analyze(
        &[FileInput::new("export.zip", bytes)],
        &PipelineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, InstacheckError::NoRelationshipData), "got {err}");
}

#[test]
fn not_followed_back_is_sorted() {
    let files = vec![FileInput::from_text(
        "followers.json",
        r#"[{"string_list_data":[{"value":"zoe"}]},{"string_list_data":[{"value":"amy"}]}]"#,
    )];
    let a = analyze(&files, &PipelineConfig::default()).unwrap();
    assert_eq!(strs(&a.views.not_followed_back), vec!["amy", "zoe"]);
    assert!(a.following.is_empty());
}

#[test]
fn realistic_archive_layout() {
    let bytes = zip_of(&[
        (
            "connections/followers_and_following/followers_1.json",
            r#"[
                {"title":"","media_list_data":[],"string_list_data":[{"href":"https://www.instagram.com/amy","value":"amy","timestamp":1700000000}]},
                {"title":"","media_list_data":[],"string_list_data":[{"href":"https://www.instagram.com/dan","value":"dan","timestamp":1700000001}]}
            ]"#,
        ),
        (
            "connections/followers_and_following/following.json",
            r#"{"relationships_following":[
                {"title":"amy","string_list_data":[{"href":"https://www.instagram.com/_u/amy","timestamp":1700000002}]},
                {"title":"zed","string_list_data":[{"href":"https://www.instagram.com/_u/zed","timestamp":1700000003}]}
            ]}"#,
        ),
        (
            "connections/followers_and_following/close_friends.json",
            r#"{"relationships_close_friends":[{"string_list_data":[{"value":"eve"}]}]}"#,
        ),
        (
            "connections/followers_and_following/following_hashtags.json",
            r#"{"relationships_following_hashtags":[{"string_list_data":[{"value":"rustlang"}]}]}"#,
        ),
        ("connections/followers_and_following/broken.json", "{"),
        ("media/posts_1.json", r#"[{"media":[{"uri":"x.jpg"}]}]"#),
    ]);

    let a = analyze(
        &[FileInput::new("instagram-me-2024.zip", bytes)],
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(set_strs(&a.followers), vec!["amy", "dan"]);
    assert_eq!(set_strs(&a.following), vec!["amy", "zed"]);
    assert_eq!(strs(&a.views.mutuals), vec!["amy"]);
    assert_eq!(strs(&a.views.not_following_back), vec!["zed"]);
    assert_eq!(strs(&a.views.not_followed_back), vec!["dan"]);
}

#[test]
fn malformed_entry_does_not_change_result() {
    let valid = vec![
        FileInput::from_text("followers.json", FOLLOWERS_ALICE),
        FileInput::from_text("following.json", FOLLOWING_BOB),
    ];
    let mut with_broken = valid.clone();
    with_broken.push(FileInput::from_text("followers_2.json", r#"[{"string_list_data": "#));

    let config = PipelineConfig::default();
    assert_eq!(
        analyze(&valid, &config).unwrap(),
        analyze(&with_broken, &config).unwrap()
    );
}

#[test]
fn rerun_is_identical() {
    let entries = extract::extract(
        &[
            FileInput::from_text("followers.json", FOLLOWERS_ALICE),
            FileInput::from_text("following.json", FOLLOWING_BOB),
        ],
        &ExtractConfig::default(),
    )
    .unwrap();
    let classifier = Classifier::default();

    assert_eq!(
        normalize::normalize(&entries, &classifier),
        normalize::normalize(&entries, &classifier)
    );
    let config = PipelineConfig::default();
    assert_eq!(
        analyze_entries(&entries, &config).unwrap(),
        analyze_entries(&entries, &config).unwrap()
    );
}

#[test]
fn structural_fallback_end_to_end() {
    let entries = [(
        "backup/relations.json".to_string(),
        json!({
            "followers": [{"username": "Ann"}, {"username": "ben"}],
            "following": [{"username": "ann"}]
        }),
    )]
    .into_iter()
    .collect();

    let a = analyze_entries(&entries, &PipelineConfig::default()).unwrap();
    assert_eq!(strs(&a.views.mutuals), vec!["ann"]);
    assert_eq!(strs(&a.views.not_followed_back), vec!["ben"]);
}

#[test]
fn canonicalization_properties() {
    let samples = [
        "@Foo",
        "https://instagram.com/foo",
        "instagram.com/foo/",
        "FOO",
        "  @@https://WWW.instagram.com/Foo/?utm=1#top  ",
    ];
    for raw in samples {
        assert_eq!(canonicalize(raw), "foo", "input: {raw}");
        let once = canonicalize(raw);
        assert_eq!(canonicalize(&once), once);
    }
}
