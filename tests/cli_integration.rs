// CLI integration tests for the minimal clean flows.
use std::fs;
use std::path::Path;
use std::process::Command;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_geoscrub");
    Command::new(exe)
}

fn write_fixture(path: &Path, lines: &[&str]) {
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(path, body).expect("write fixture");
}

fn entry_count(dir: &Path) -> usize {
    fs::read_dir(dir).expect("read dir").count()
}

#[test]
fn clean_flow_decodes_filters_and_joins_records() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("features.geojson");
    let output = temp.path().join("cleaned.geojson");
    write_fixture(
        &input,
        &[
            "[",
            r#"{"type":"Feature","properties":{"name":"A &amp; B","note":"","visits":0,"tags":[]},"geometry":null},"#,
            r#"{"type":"Feature","properties":{"desc":"line one\nline two"}},"#,
            "]",
        ],
    );

    let run = cmd()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .output()
        .expect("run");
    assert!(run.status.success());

    let cleaned = fs::read_to_string(&output).expect("read output");
    assert_eq!(
        cleaned,
        concat!(
            "[",
            r#"{"type":"Feature","properties":{"name":"A & B","tags":[]},"geometry":null}"#,
            ",",
            r#"{"type":"Feature","properties":{"desc":"line oneline two"}}"#,
            "]",
        )
    );
}

#[test]
fn default_output_name_derives_from_the_input() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(&temp.path().join("data.geojson"), &[r#"{"a":1},"#]);

    let run = cmd()
        .current_dir(temp.path())
        .arg("data.geojson")
        .output()
        .expect("run");
    assert!(run.status.success());

    let cleaned = fs::read_to_string(temp.path().join("data-cleaned.geojson"))
        .expect("derived output exists");
    assert_eq!(cleaned, r#"{"a":1}"#);
}

#[test]
fn default_output_name_without_extension_gets_geojson() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(&temp.path().join("data"), &[r#"{"a":1},"#]);

    let run = cmd()
        .current_dir(temp.path())
        .arg("data")
        .output()
        .expect("run");
    assert!(run.status.success());
    assert!(temp.path().join("data-cleaned.geojson").exists());
}

#[test]
fn default_output_name_collapses_multi_dot_inputs() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(&temp.path().join("a.b.c.geojson"), &[r#"{"a":1},"#]);

    let run = cmd()
        .current_dir(temp.path())
        .arg("a.b.c.geojson")
        .output()
        .expect("run");
    assert!(run.status.success());
    assert!(temp.path().join("a-cleaned.b").exists());
}

#[test]
fn second_run_fails_and_leaves_the_first_output_intact() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("features.geojson");
    let output = temp.path().join("cleaned.geojson");
    write_fixture(&input, &[r#"{"a":1},"#]);

    let first = cmd()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .output()
        .expect("first run");
    assert!(first.status.success());
    let first_bytes = fs::read(&output).expect("first output");

    let second = cmd()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .output()
        .expect("second run");
    assert_eq!(second.status.code().unwrap(), 1);
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("already exists"));
    assert_eq!(fs::read(&output).expect("output survives"), first_bytes);
}

#[test]
fn missing_input_exits_one_and_creates_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");

    let run = cmd()
        .current_dir(temp.path())
        .arg("absent.geojson")
        .output()
        .expect("run");
    assert_eq!(run.status.code().unwrap(), 1);
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("does not exist"));
    assert_eq!(entry_count(temp.path()), 0);
}

#[test]
fn zero_arguments_exit_one_without_writing() {
    let temp = tempfile::tempdir().expect("tempdir");

    let run = cmd().current_dir(temp.path()).output().expect("run");
    assert_eq!(run.status.code().unwrap(), 1);
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("provide a path"));
    assert_eq!(entry_count(temp.path()), 0);
}

#[test]
fn extra_arguments_exit_one_without_writing() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(&temp.path().join("data.geojson"), &[r#"{"a":1},"#]);

    let run = cmd()
        .current_dir(temp.path())
        .args(["data.geojson", "out.geojson", "surplus"])
        .output()
        .expect("run");
    assert_eq!(run.status.code().unwrap(), 1);
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("Too many arguments"));
    assert_eq!(entry_count(temp.path()), 1);
}

#[test]
fn junk_lines_pass_through_without_a_leading_comma() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("features.geojson");
    let output = temp.path().join("cleaned.geojson");
    write_fixture(&input, &["[", r#"{"a":1},"#, "not json", r#"{"b":2},"#, "]"]);

    let run = cmd()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .output()
        .expect("run");
    assert!(run.status.success());
    assert_eq!(
        fs::read_to_string(&output).expect("read output"),
        r#"[{"a":1}not json,{"b":2}]"#
    );
}

#[test]
fn help_exits_zero() {
    let run = cmd().arg("--help").output().expect("run");
    assert!(run.status.success());
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("geoscrub"));
}
