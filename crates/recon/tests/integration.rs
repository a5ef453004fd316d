use std::io::{Cursor, Write};
use std::path::PathBuf;

use followcheck_recon::engine::{load, run};
use followcheck_recon::model::{Outcome, RawUpload, UploadFile};
use followcheck_recon::{Limits, ReconError, ReconOptions};
use zip::write::SimpleFileOptions;

const EXPORT_DIR: &str = "export/connections/followers_and_following";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> Vec<u8> {
    let path = fixtures_dir().join(EXPORT_DIR).join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn loose(names: &[&str]) -> RawUpload {
    RawUpload::Loose(names.iter().map(|n| UploadFile::new(*n, fixture(n))).collect())
}

fn zip_of(entries: &[(&str, Vec<u8>)]) -> RawUpload {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    RawUpload::Archive(UploadFile::new("instagram-export.zip", bytes))
}

fn export_zip() -> RawUpload {
    let member = |n: &str| (format!("connections/followers_and_following/{n}"), fixture(n));
    let entries = [
        member("close_friends.json"),
        member("following.json"),
        member("followers_1.json"),
        member("followers_2.json"),
        ("media/posts_1.json".to_string(), b"[]".to_vec()),
        ("index.html".to_string(), b"<html></html>".to_vec()),
    ];
    let borrowed: Vec<(&str, Vec<u8>)> = entries.iter().map(|(n, d)| (n.as_str(), d.clone())).collect();
    zip_of(&borrowed)
}

// -------------------------------------------------------------------------
// Loose files
// -------------------------------------------------------------------------

#[test]
fn loose_export_files() {
    let upload = loose(&["following.json", "followers_1.json", "followers_2.json", "close_friends.json"]);
    let result = run(upload, &ReconOptions::default()).unwrap();

    assert_eq!(result.not_following_back, vec!["bakery_on_5th", "dev_null"]);
    assert_eq!(result.you_dont_follow_back, vec!["eli_runs", "fran.k"]);
    assert_eq!(result.outcome, Outcome::Mixed);
    assert!(result.message.is_none());

    // chris.m appears twice in following.json
    assert_eq!(result.warnings, vec!["We cleaned up a few duplicates before comparing."]);
    assert_eq!(result.stats.following, 4);
    assert_eq!(result.stats.followers, 4);
    assert_eq!(result.stats.followers_files, 2);
    assert_eq!(result.stats.duplicates_removed, 1);
}

#[test]
fn loose_upload_order_drives_followers_order() {
    let upload = loose(&["followers_2.json", "following.json", "followers_1.json"]);
    let result = run(upload, &ReconOptions::default()).unwrap();
    assert_eq!(result.you_dont_follow_back, vec!["fran.k", "eli_runs"]);
}

#[test]
fn load_reports_per_file_sequences() {
    let upload = loose(&["following.json", "followers_1.json"]);
    let validated = load(upload, &ReconOptions::default()).unwrap();
    assert_eq!(validated.following.file, "following.json");
    assert_eq!(validated.following.usernames.len(), 5);
    assert_eq!(validated.following.skipped_entries, 1);
    assert_eq!(validated.followers.len(), 1);
    assert_eq!(validated.followers[0].usernames, vec!["ana.lopes", "eli_runs"]);
}

// -------------------------------------------------------------------------
// Archives
// -------------------------------------------------------------------------

#[test]
fn archive_export_matches_loose_result() {
    let from_zip = run(export_zip(), &ReconOptions::default()).unwrap();
    let from_loose = run(
        loose(&["following.json", "followers_1.json", "followers_2.json"]),
        &ReconOptions::default(),
    )
    .unwrap();

    assert_eq!(from_zip.not_following_back, from_loose.not_following_back);
    assert_eq!(from_zip.you_dont_follow_back, from_loose.you_dont_follow_back);
    assert_eq!(from_zip.warnings, from_loose.warnings);
}

#[test]
fn archive_without_export_members_is_format_error() {
    let upload = zip_of(&[
        ("media/posts_1.json", b"[]".to_vec()),
        ("personal_information.json", b"{}".to_vec()),
    ]);
    let err = run(upload, &ReconOptions::default()).unwrap_err();
    assert!(matches!(err, ReconError::Format(_)), "{err:?}");
}

#[test]
fn archive_without_json_is_format_error() {
    let upload = zip_of(&[("index.html", b"<html></html>".to_vec())]);
    assert!(matches!(run(upload, &ReconOptions::default()), Err(ReconError::Format(_))));
}

#[test]
fn archive_missing_followers() {
    let upload = zip_of(&[("x/following.json", fixture("following.json"))]);
    assert_eq!(run(upload, &ReconOptions::default()).unwrap_err(), ReconError::MissingFollowers);
}

#[test]
fn archive_member_over_limit() {
    let options = ReconOptions {
        limits: Limits { max_file_bytes: 400, max_entries: 100 },
        ..ReconOptions::default()
    };
    let err = run(export_zip(), &options).unwrap_err();
    match err {
        ReconError::SizeLimit { file, .. } => {
            assert!(file.ends_with(".json"), "{file}");
        }
        other => panic!("expected size limit, got {other:?}"),
    }
}

#[test]
fn archive_entry_count_limit() {
    let options = ReconOptions {
        limits: Limits { max_file_bytes: 1024 * 1024, max_entries: 2 },
        ..ReconOptions::default()
    };
    // close_friends.json is not counted
    let err = run(export_zip(), &options).unwrap_err();
    assert!(matches!(err, ReconError::SizeLimit { ref file, .. } if file.ends_with("followers_2.json")));
}

#[test]
fn archive_parse_error_names_member() {
    let upload = zip_of(&[
        ("a/following.json", fixture("following.json")),
        ("a/followers_1.json", b"[{\"string_list_data\": [".to_vec()),
    ]);
    let err = run(upload, &ReconOptions::default()).unwrap_err();
    assert_eq!(err.file(), Some("a/followers_1.json"));
    assert_eq!(err.kind(), "parse_error");
}

#[test]
fn archive_schema_error_names_member() {
    let upload = zip_of(&[
        ("a/following.json", b"{\"relationships_followers\": []}".to_vec()),
        ("a/followers_1.json", fixture("followers_1.json")),
    ]);
    let err = run(upload, &ReconOptions::default()).unwrap_err();
    assert!(matches!(err, ReconError::Schema { ref file, .. } if file == "a/following.json"));
}

// -------------------------------------------------------------------------
// Edge messages
// -------------------------------------------------------------------------

#[test]
fn empty_following_message() {
    let upload = RawUpload::Loose(vec![
        UploadFile::new("following.json", b"{\"relationships_following\": []}".to_vec()),
        UploadFile::new("followers_1.json", fixture("followers_1.json")),
    ]);
    let result = run(upload, &ReconOptions::default()).unwrap();
    assert_eq!(result.outcome, Outcome::EmptyFollowing);
    assert!(result.not_following_back.is_empty());
    assert!(result.you_dont_follow_back.is_empty());
    assert_eq!(
        result.message.as_deref(),
        Some("You aren't following anyone yet. Nothing to check here.")
    );
}

#[test]
fn empty_followers_message() {
    let upload = RawUpload::Loose(vec![
        UploadFile::new("following.json", fixture("following.json")),
        UploadFile::new("followers_1.json", b"[]".to_vec()),
    ]);
    let result = run(upload, &ReconOptions::default()).unwrap();
    assert_eq!(result.outcome, Outcome::EmptyFollowers);
    assert!(result.not_following_back.is_empty());
    assert!(result.you_dont_follow_back.is_empty());
    assert_eq!(result.message.as_deref(), Some("No one follows you yet. Clean slate, clean feed."));
}

#[test]
fn mutual_message_with_subtext() {
    let upload = RawUpload::Loose(vec![
        UploadFile::new("following.json", fixture("following.json")),
        UploadFile::new("followers_1.json", fixture("following.json")),
    ]);
    // followers_1.json holding an object is a schema error, not a match
    assert!(matches!(
        run(upload, &ReconOptions::default()),
        Err(ReconError::Schema { .. })
    ));

    let followers = br#"[
        {"string_list_data": [{"value": "dev_null"}]},
        {"string_list_data": [{"value": "chris.m"}]},
        {"string_list_data": [{"value": "bakery_on_5th"}]},
        {"string_list_data": [{"value": "ana.lopes"}]}
    ]"#;
    let upload = RawUpload::Loose(vec![
        UploadFile::new("following.json", fixture("following.json")),
        UploadFile::new("followers_1.json", followers.to_vec()),
    ]);
    let result = run(upload, &ReconOptions::default()).unwrap();
    assert_eq!(result.outcome, Outcome::Mutual);
    assert!(result.message.is_some());
    assert!(result.subtext.is_some());
}

#[test]
fn large_following_with_single_followers_file_warns() {
    let entries: Vec<serde_json::Value> = (0..1001)
        .map(|i| serde_json::json!({"string_list_data": [{"value": format!("user{i}")}]}))
        .collect();
    let following = serde_json::to_vec(&serde_json::json!({"relationships_following": entries})).unwrap();
    let upload = RawUpload::Loose(vec![
        UploadFile::new("following.json", following),
        UploadFile::new("followers_1.json", fixture("followers_1.json")),
    ]);
    let result = run(upload, &ReconOptions::default()).unwrap();
    assert_eq!(result.not_following_back.len(), 1001);
    assert!(result.warnings.iter().any(|w| w.contains("followers_2.json")));
}
