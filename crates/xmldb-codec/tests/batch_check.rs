use std::fs;

use xmldb_codec::{rewrite, BatchSummary, Codec, MissingPolicy, Outcome};

const FORUM: &str = include_str!("fixtures/forum_install.xml");
const BLOCK: &str = include_str!("fixtures/block_install.xml");

#[test]
fn one_bad_file_does_not_hide_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let forum = dir.path().join("forum.xml");
    let broken = dir.path().join("broken.xml");
    let block = dir.path().join("block.xml");
    fs::write(&forum, FORUM).unwrap();
    fs::write(&broken, FORUM.replace("</TABLES>", "")).unwrap();
    fs::write(&block, BLOCK).unwrap();

    let reports = Codec::default().check_files(&[&forum, &broken, &block], MissingPolicy::Fail);

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].path, forum);
    assert!(matches!(reports[0].outcome, Outcome::Canonical));
    match &reports[1].outcome {
        Outcome::Invalid(e) => assert!(e.is_malformed()),
        other => panic!("expected invalid, got {other}"),
    }
    assert!(matches!(reports[2].outcome, Outcome::Canonical));

    let summary = BatchSummary::from_reports(&reports);
    assert_eq!(summary.canonical, 2);
    assert_eq!(summary.failed, 1);
    assert!(!summary.is_success());
}

#[test]
fn deeply_nested_file_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested.xml");
    let block = dir.path().join("block.xml");
    fs::write(&nested, "<A>".repeat(100_000)).unwrap();
    fs::write(&block, BLOCK).unwrap();

    let reports = Codec::default().check_files(&[&nested, &block], MissingPolicy::Fail);

    match &reports[0].outcome {
        Outcome::Invalid(e) => assert!(e.to_string().contains("nested more than")),
        other => panic!("expected invalid, got {other}"),
    }
    assert!(matches!(reports[1].outcome, Outcome::Canonical));
}

#[test]
fn missing_files_fail_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("install.xml");
    fs::write(&present, BLOCK).unwrap();
    let absent = dir.path().join("nowhere").join("install.xml");
    let paths = [present, absent];
    let codec = Codec::default();

    let strict = codec.check_files(&paths, MissingPolicy::default());
    assert!(matches!(strict[1].outcome, Outcome::Missing));
    assert!(!BatchSummary::from_reports(&strict).is_success());

    let lenient = codec.check_files(&paths, MissingPolicy::Skip);
    assert!(matches!(lenient[1].outcome, Outcome::Skipped));
    assert!(BatchSummary::from_reports(&lenient).is_success());
}

#[test]
fn rewrite_makes_file_canonical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("install.xml");
    let untidy = BLOCK.replace("      <FIELDS>", "    <FIELDS>").replace("\n", "\r\n");
    fs::write(&path, &untidy).unwrap();
    let codec = Codec::default();

    let report = codec.check_file(&path, MissingPolicy::Fail);
    match &report.outcome {
        Outcome::Mismatch(m) => assert_eq!(m.line, 1),
        other => panic!("expected mismatch, got {other}"),
    }
    assert!(rewrite(&report).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), BLOCK);
    assert!(matches!(
        codec.check_file(&path, MissingPolicy::Fail).outcome,
        Outcome::Canonical
    ));
}
