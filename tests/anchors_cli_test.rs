use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_kryon-anchors"))
        .args(args)
        .output()
        .expect("Failed to execute kryon-anchors")
}

#[test]
fn test_toolbar_script_json() {
    let path = fixture("toolbar.anchors");
    let output = run(&[path.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "kryon-anchors failed: {}", String::from_utf8_lossy(&output.stderr));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 12);

    let find = |target: &str| {
        rows.iter()
            .find(|row| row["target"] == target)
            .unwrap_or_else(|| panic!("no row for {}", target))
    };

    assert_eq!(find("toolbar.height")["source"], serde_json::Value::Null);
    assert_eq!(find("toolbar.height")["offset"], 44.0);
    assert_eq!(find("logo.leading")["source"], "toolbar.leading");
    assert_eq!(find("logo.leading")["offset"], 16.0);
    assert_eq!(find("title.baseline")["offset"], -6.0);
    assert_eq!(find("title.baseline")["priority"], 750);
    assert_eq!(find("title.width")["multiplier"], 0.5);
    assert_eq!(find("title.width")["priority"], 250);
    assert_eq!(find("title.centerY")["source"], "logo.centerY");
}

#[test]
fn test_text_output_and_default_priority() {
    let path = fixture("toolbar.anchors");
    let output = run(&[path.to_str().unwrap(), "--priority", "900"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("logo.leading = toolbar.leading + 16  (priority 900)"));
    assert!(stdout.contains("title.width = toolbar.width * 0.5  (priority 250)"));
    assert!(!stdout.contains("title.centerY = toolbar.centerY"));
    assert!(stdout.contains("title.centerY = logo.centerY"));
}

#[test]
fn test_broken_script_reports_line() {
    let path = fixture("broken.anchors");
    let output = run(&[path.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
}

#[test]
fn test_missing_script() {
    let output = run(&["does/not/exist.anchors"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Anchor script not found"));
}

#[test]
fn test_trace_sink_and_debug_logging() {
    let path = fixture("toolbar.anchors");
    let output = run(&[path.to_str().unwrap(), "--trace-sink", "--debug"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let activated: Vec<&str> = stderr.lines().filter(|line| line.starts_with("+ [")).collect();
    let deactivated: Vec<&str> = stderr.lines().filter(|line| line.starts_with("- [")).collect();

    assert_eq!(activated.len(), 13, "stderr: {}", stderr);
    assert!(activated.iter().any(|line| line.ends_with("toolbar.height = 44")));
    assert!(activated.iter().any(|line| line.ends_with("title.centerY = logo.centerY")));
    assert_eq!(deactivated.len(), 1, "stderr: {}", stderr);
    assert!(deactivated[0].ends_with("title.centerY = toolbar.centerY (Superseded)"));

    assert!(stderr.contains("Registered constraint"));
    assert!(stderr.contains("Superseded constraint"));
}

#[test]
fn test_no_trace_without_flags() {
    let path = fixture("toolbar.anchors");
    let output = run(&[path.to_str().unwrap()]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.lines().any(|line| line.starts_with("+ [") || line.starts_with("- [")));
    assert!(!stderr.contains("Registered constraint"));
}

#[test]
fn test_axis_warning_logged_once() {
    let path = fixture("skewed.anchors");
    let output = run(&[path.to_str().unwrap()]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("axis mismatch").count(), 1, "stderr: {}", stderr);
}
