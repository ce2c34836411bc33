//! CLI tests for `actor-lines`.
//!
//! Spawns the binary against scratch trees and checks exit codes, standard
//! output and what is left on disk.

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

fn actor_lines(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_actor-lines"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run actor-lines")
}

fn touch(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, content).expect("write file");
}

fn sorted_names(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(directory)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn populate(root: &Path) {
    touch(&root.join("english_1/new_order_en_1_lines_numbered.txt"), "1. Hi.\n");
    touch(&root.join("english_1/new_order_en_1_lines.docx"), "");
    touch(&root.join("english_1/raw/takes/take_1.wav"), "");
    touch(
        &root.join("french_female_2/new_order_tag_match_fr_f_lines_numbered.txt"),
        "1. Salut.\n2. *** a revoir\n",
    );
    touch(&root.join("french_female_2/new_order_fr_f_lines.txt"), "");
    touch(&root.join("french_female_2/old/new_order_tag_match_fr_f.txt"), "");
}

#[test]
fn prune_leaves_only_retained_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    populate(temp.path());
    let root = temp.path().to_str().expect("utf8 path");

    let output = actor_lines(&["prune", "--root", root]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        sorted_names(&temp.path().join("english_1")),
        vec!["new_order_en_1_lines_numbered.txt"]
    );
    assert_eq!(
        sorted_names(&temp.path().join("french_female_2")),
        vec!["new_order_tag_match_fr_f_lines_numbered.txt"]
    );
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("(english)"));
    assert!(stdout.contains("(non-english)"));
    assert!(stdout.contains("Removed 2 directories and 2 files (0 failures)"));
}

#[test]
fn prune_twice_reports_nothing_the_second_time() {
    let temp = tempfile::tempdir().expect("tempdir");
    populate(temp.path());
    let root = temp.path().to_str().expect("utf8 path");
    actor_lines(&["prune", "--root", root]);

    let output = actor_lines(&["prune", "--root", root]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(!stdout.contains("Removing"));
    assert!(stdout.contains("Removed 0 directories and 0 files (0 failures)"));
}

#[test]
fn prune_with_missing_root_exits_with_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    populate(temp.path());
    let missing = temp.path().join("not_there");

    let output = actor_lines(&["prune", "--root", missing.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("does not exist"));
    assert!(temp.path().join("english_1/raw").is_dir());
}

#[test]
fn dry_run_changes_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    populate(temp.path());
    let root = temp.path().to_str().expect("utf8 path");

    let output = actor_lines(&["prune", "--root", root, "--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("Would remove 2 directories and 2 files"));
    assert!(temp.path().join("english_1/raw/takes/take_1.wav").is_file());
    assert!(temp.path().join("french_female_2/new_order_fr_f_lines.txt").is_file());
}

#[test]
fn search_uses_default_pattern() {
    let temp = tempfile::tempdir().expect("tempdir");
    populate(temp.path());
    let root = temp.path().to_str().expect("utf8 path");

    let output = actor_lines(&["search", "--root", root]);

    assert_eq!(output.status.code(), Some(0));
    let file = temp
        .path()
        .join("french_female_2/new_order_tag_match_fr_f_lines_numbered.txt");
    let expected = format!("==> {} <==\n2:2. *** a revoir\n\n", file.display());
    assert_eq!(String::from_utf8(output.stdout).expect("utf8"), expected);
}

#[test]
fn search_with_missing_root_exits_with_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("not_there");

    let output = actor_lines(&["search", "--root", missing.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn config_file_supplies_root_and_marker() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("tree");
    touch(&root.join("en_gb/new_order_en_gb.txt"), "");
    touch(&root.join("en_gb/new_order_tag_match_en_gb_lines_numbered.txt"), "*** x\n");
    let config = temp.path().join("actor-lines.json");
    fs::write(
        &config,
        format!(
            r#"{{ "root": {:?}, "english_marker": "en_", "search_pattern": "x" }}"#,
            root.to_str().expect("utf8 path")
        ),
    )
    .expect("write config");
    let config = config.to_str().expect("utf8 path");

    let prune = actor_lines(&["--config", config, "prune"]);
    let search = actor_lines(&["search", "--config", config]);

    assert_eq!(prune.status.code(), Some(0));
    assert!(root.join("en_gb/new_order_en_gb.txt").is_file());
    let stdout = String::from_utf8(search.stdout).expect("utf8");
    assert!(stdout.contains("1:*** x"));
}

#[test]
fn tags_reports_unlisted_end_tags() {
    let temp = tempfile::tempdir().expect("tempdir");
    touch(
        &temp.path().join("english_1/new_order_en_1_lines_numbered.txt"),
        "1. Hi. [pause]\n2. Oh. [sighs]\n",
    );
    let root = temp.path().to_str().expect("utf8 path");

    let output = actor_lines(&["tags", "--root", root]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("1: [pause]"));
    assert!(!stdout.contains("[sighs]"));
    assert!(stdout.contains("Found 1 unlisted end tags (1 unique)"));
}

#[test]
fn removal_log_drives_propagation_to_translations() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("tree");
    touch(
        &root.join("english_1/new_order_en_1_lines_numbered.txt"),
        "1. Hi. [pause]\n2. Oh. [sighs]\n",
    );
    let translated = root.join("hindi_male/new_order_tag_match_hi_m_lines.txt");
    touch(&translated, "1. Namaste. [whispers]\n2. Haan. [sighs]\n");
    let log = temp.path().join("removed.txt");
    let root = root.to_str().expect("utf8 path");
    let log = log.to_str().expect("utf8 path");

    let tags = actor_lines(&["tags", "--root", root, "--remove", "--log", log]);
    let propagate = actor_lines(&["propagate", "--root", root, "--log", log]);

    assert_eq!(tags.status.code(), Some(0));
    assert_eq!(propagate.status.code(), Some(0));
    assert_eq!(
        fs::read_to_string(&translated).expect("read"),
        "1. Namaste.\n2. Haan. [sighs]\n"
    );
    let stdout = String::from_utf8(propagate.stdout).expect("utf8");
    assert!(stdout.contains("Removed 1 end tags from 1 files in 1 language directories"));
}

#[test]
fn log_without_remove_is_a_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().to_str().expect("utf8 path");

    let output = actor_lines(&["tags", "--root", root, "--log", "removed.txt"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!temp.path().join("removed.txt").exists());
}

#[test]
fn start_tags_are_listed_and_silent_ones_removed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("english_1/new_order_en_1_lines.txt");
    touch(&file, "1. [nodding] Yes.\n2. [laughs] No.\n");
    let root = temp.path().to_str().expect("utf8 path");

    let listed = actor_lines(&["start-tags", "--root", root]);
    let removed = actor_lines(&["silent-tags", "--root", root]);

    assert_eq!(listed.status.code(), Some(0));
    let stdout = String::from_utf8(listed.stdout).expect("utf8");
    assert!(stdout.contains("Found 2 start tags (2 unique) in 1 files"));
    assert_eq!(removed.status.code(), Some(0));
    assert_eq!(
        fs::read_to_string(&file).expect("read"),
        "1. Yes.\n2. [laughs] No.\n"
    );
}

#[test]
fn tidy_rewrites_a_file_and_rejects_output_for_a_folder() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("lines.txt");
    touch(&file, "1. One\n\ncontinued\n2. Two\n");
    let folder = temp.path().to_str().expect("utf8 path");

    let tidy = actor_lines(&["tidy", file.to_str().expect("utf8 path")]);
    let rejected = actor_lines(&["tidy", folder, "--output", "out.txt"]);

    assert_eq!(tidy.status.code(), Some(0));
    assert_eq!(
        fs::read_to_string(&file).expect("read"),
        "1. One continued\n2. Two\n"
    );
    assert_eq!(rejected.status.code(), Some(1));
    let stderr = String::from_utf8(rejected.stderr).expect("utf8");
    assert!(stderr.contains("Cannot write a single output file"));
}
