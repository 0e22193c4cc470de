//! Smoke tests for the sercat binary's startup and exit behaviour.
use std::process::{Command, Output};

fn sercat(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sercat"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run binary")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn invalid_format_exits_with_message() {
    let output = sercat(&["/dev/null", "115200", "8X1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("invalid parity 'X'"),
        "stderr was: {}",
        stderr(&output)
    );
}

#[test]
fn short_format_exits_with_message() {
    let output = sercat(&["/dev/null", "9600", "61"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid format '61'"));
}

#[test]
fn unopenable_port_names_the_port() {
    let output = sercat(&["/dev/sercat-does-not-exist"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("failed to open port '/dev/sercat-does-not-exist'"),
        "stderr was: {}",
        stderr(&output)
    );
}

#[test]
fn invalid_baud_rate_is_rejected() {
    for baud in ["fast", "0", "-9600"] {
        let output = sercat(&["/dev/sercat-does-not-exist", baud]);
        assert!(!output.status.success(), "baud {baud} should be rejected");
        assert!(!stderr(&output).contains("failed to open port"));
    }
}

#[test]
fn missing_port_is_a_usage_error() {
    let output = sercat(&[]);
    assert!(!output.status.success());
}

#[test]
fn format_completion_lists_every_combination() {
    let output = sercat(&["--complete", "3"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let formats: Vec<&str> = stdout.lines().collect();
    assert_eq!(formats.len(), 60);
    assert_eq!(formats.first(), Some(&"5N1"));
    assert!(formats.contains(&"7E1.5"));
}

#[test]
fn speed_completion_lists_common_rates() {
    let output = sercat(&["--complete", "2"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|line| line == "115200"));
    assert_eq!(stdout.lines().count(), 14);
}

#[test]
fn version_is_reported() {
    let output = sercat(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("sercat "));
}
