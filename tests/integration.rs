//! End-to-end tests for the spec relay
//!
//! These tests verify the complete flow by:
//! 1. Replaying recorded callback fixtures through the library
//! 2. Running the relay binary against the same fixtures
//! 3. Checking the event stream, failure counts, and cleaned traces

use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use relay::reporter::RecordingSink;
use relay::stack::{is_noise_line, sanitize_error};
use relay::testing::{load_scenario, run_scenario, Callback};
use relay::{FailureRecord, LifecycleAdapter, LifecycleListener, ReporterOptions, SpecInfo, SuiteInfo};

/// Test context with paths and cleanup
struct TestContext {
    /// Temporary directory for this test
    temp_dir: PathBuf,
    /// Config directory (XDG_CONFIG_HOME)
    config_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context
    fn new(test_name: &str) -> Self {
        let temp_dir = env::temp_dir().join("spec-relay-tests").join(test_name);

        // Clean up any previous test artifacts
        let _ = fs::remove_dir_all(&temp_dir);
        let config_dir = temp_dir.join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            temp_dir,
            config_dir,
        }
    }

    /// Write a config file for the test
    fn create_config(&self, content: &str) {
        let config_path = self.config_dir.join("spec-relay").join("config.toml");
        fs::create_dir_all(config_path.parent().unwrap()).expect("Failed to create config dir");
        fs::write(&config_path, content).expect("Failed to write config");
    }

    /// Write a file into the temp directory
    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Run a relay command
    fn run_relay(&self, args: &[&str], stdin: Option<&str>) -> RelayOutput {
        let mut child = Command::new(env!("CARGO_BIN_EXE_relay"))
            .args(args)
            .env("XDG_CONFIG_HOME", &self.config_dir)
            .env("RUST_LOG", "off")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to run relay");

        if let Some(mut pipe) = child.stdin.take() {
            // relay may exit before reading (e.g. bad config)
            let _ = pipe.write_all(stdin.unwrap_or_default().as_bytes());
        }

        let output = child.wait_with_output().expect("Failed to wait for relay");
        RelayOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.temp_dir);
    }
}

/// Output from a relay command
#[derive(Debug)]
struct RelayOutput {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

impl RelayOutput {
    /// Parse stdout as JSON lines
    fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
            .collect()
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn replay(name: &str) -> (relay::testing::ReplaySummary, RecordingSink) {
    let scenario = load_scenario(&fixture(name)).expect("fixture parses");
    let options = ReporterOptions::new(scenario.cid.clone().unwrap_or_default())
        .with_specs(scenario.specs.clone())
        .with_capabilities(scenario.capabilities.clone());
    run_scenario(scenario, options, Default::default(), RecordingSink::new())
}

// ============== Library ==============

#[test]
fn test_login_fixture_event_stream() {
    let (summary, sink) = replay("login.yaml");

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.unclosed_suites, 0);
    assert_eq!(
        sink.event_names(),
        vec![
            "suite:start",
            "test:start",
            "test:pass",
            "test:end",
            "test:start",
            "test:fail",
            "test:end",
            "suite:end",
        ]
    );

    let fail = sink.payloads_for("test:fail")[0];
    assert_eq!(fail.full_title.as_deref(), Some("login page rejects a bad password"));
    assert_eq!(fail.specs, serde_json::json!(["/app/test/login.spec.js"]));
    let stack = fail.error.as_ref().unwrap().stack.as_deref().unwrap();
    assert!(stack.split('\n').all(|line| !is_noise_line(line)));
    assert!(stack.contains("login.spec.js:14:33"));
    assert_eq!(fail.errors.as_ref().unwrap()[0].extra["matcherName"], "toBe");
}

#[test]
fn test_nested_fixture_event_stream() {
    let (summary, sink) = replay("nested.yaml");

    assert_eq!(summary.failed, 1);
    assert_eq!(
        sink.event_names(),
        vec![
            "suite:start",
            "suite:start",
            "test:start",
            "test:pass",
            "test:end",
            "test:start",
            "test:pending",
            "test:end",
            "suite:end",
            "suite:start",
            "test:start",
            "test:fail",
            "test:end",
            "suite:end",
            "suite:end",
        ]
    );

    let pending = sink.payloads_for("test:pending")[0];
    assert!(pending.pending);
    assert_eq!(pending.parent.as_deref(), Some("with couponsuite2"));

    let placeholder = sink.payloads_for("test:fail")[0];
    assert_eq!(placeholder.title, relay::reporter::UNKNOWN_TEST);
    assert_eq!(placeholder.parent.as_deref(), Some("without couponsuite3"));

    let suite_ends = sink.payloads_for("suite:end");
    assert_eq!(suite_ends[2].uid, "checkoutsuite1");
    assert_eq!(suite_ends[2].parent, None);
}

#[test]
fn test_start_and_end_counts_balance() {
    for name in ["login.yaml", "nested.yaml"] {
        let (_, sink) = replay(name);
        let count = |event: &str| sink.payloads_for(event).len();
        assert_eq!(count("suite:start"), count("suite:end"), "{name}");
        assert_eq!(count("test:start"), count("test:end"), "{name}");
    }
}

#[test]
fn test_parent_matches_innermost_open_suite() {
    let scenario = load_scenario(&fixture("nested.yaml")).unwrap();
    let mut adapter = LifecycleAdapter::new(RecordingSink::new(), ReporterOptions::new("0-1"));
    let mut open: Vec<String> = Vec::new();

    for step in scenario.steps {
        if let Callback::SuiteDone(_) = &step {
            open.pop();
        }
        let expected_parent = open.last().cloned();
        let pushed = match &step {
            Callback::SuiteStarted(suite) => Some(format!("{}{}", suite.description, suite.id)),
            _ => None,
        };

        step.deliver(&mut adapter);
        let last = &adapter.sink().published().last().unwrap().payload;
        assert_eq!(last.parent, expected_parent, "{}", last.event);

        open.extend(pushed);
    }
}

#[test]
fn test_manual_callback_sequence() {
    let mut adapter = LifecycleAdapter::new(RecordingSink::new(), ReporterOptions::new("0-0"));

    adapter.suite_started(SuiteInfo::new("login", "s1"));
    adapter.spec_started(SpecInfo::new("works", "t1"));
    adapter.spec_done(
        SpecInfo::new("works", "t1")
            .with_status("failed")
            .with_failures(vec![FailureRecord::new("nope").with_stack(
                "Error: nope\n    at /app/node_modules/expect/build/index.js:1:1\n    at spec (/app/a.spec.js:1:1)",
            )]),
    );
    adapter.suite_done(SuiteInfo::new("login", "s1"));

    assert_eq!(adapter.failed_count(), 1);
    let sink = adapter.into_sink();
    assert_eq!(
        sink.event_names(),
        vec!["suite:start", "test:start", "test:fail", "test:end", "suite:end"]
    );
    let errors = sink.payloads_for("test:end")[0].errors.clone().unwrap();
    assert_eq!(errors[0].stack.as_deref(), Some("Error: nope\n    at spec (/app/a.spec.js:1:1)"));
}

#[test]
fn test_sanitize_error_dedups_in_order() {
    let saved = FailureRecord::new("").with_stack("A\nB\nA");
    let merged = sanitize_error(FailureRecord::new("boom"), &saved).unwrap();
    assert_eq!(merged.stack.as_deref(), Some("A\nB"));
}

// ============== Binary ==============

#[test]
fn test_cli_replay_json() {
    let ctx = TestContext::new("replay_json");
    let output = ctx.run_relay(&["replay", fixture("login.yaml").to_str().unwrap()], None);

    assert_eq!(output.code, Some(1), "stderr: {}", output.stderr);
    let events = output.events();
    assert_eq!(events.len(), 8);
    assert_eq!(events[0]["event"], "suite:start");
    assert_eq!(events[0]["payload"]["cid"], "0-0");
    assert_eq!(events[5]["event"], "test:fail");
    assert_eq!(events[5]["payload"]["type"], "test");
    assert_eq!(events[5]["payload"]["parent"], "login pagesuite1");
}

#[test]
fn test_cli_replay_overrides() {
    let ctx = TestContext::new("replay_overrides");
    ctx.create_config("[reporter]\ncid = \"4-2\"\n");
    let scenario = ctx.write_file(
        "passing.yaml",
        "name: passing\nsteps:\n  - action: suite_started\n    description: a\n    id: s1\n  - action: suite_done\n    description: a\n    id: s1\n",
    );

    let output = ctx.run_relay(&["replay", scenario.to_str().unwrap()], None);
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(output.events()[0]["payload"]["cid"], "4-2");

    let output = ctx.run_relay(&["replay", scenario.to_str().unwrap(), "--cid", "7-7"], None);
    assert_eq!(output.events()[0]["payload"]["cid"], "7-7");
}

#[test]
fn test_cli_replay_keeps_noise_when_asked() {
    let ctx = TestContext::new("replay_no_clean");
    let output = ctx.run_relay(
        &["replay", fixture("login.yaml").to_str().unwrap(), "--no-clean-stack"],
        None,
    );

    let events = output.events();
    let stack = events[5]["payload"]["error"]["stack"].as_str().unwrap();
    assert!(stack.contains("node_modules"));
}

#[test]
fn test_cli_replay_pretty() {
    let ctx = TestContext::new("replay_pretty");
    let output = ctx.run_relay(
        &["replay", fixture("nested.yaml").to_str().unwrap(), "--format", "pretty"],
        None,
    );

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("checkout"));
    assert!(output.stdout.contains("applies discount"));
    assert!(output.stdout.contains("<unknown test>"));
    assert!(output.stdout.contains("FAILED"));
}

#[test]
fn test_cli_clean_stack_from_stdin() {
    let ctx = TestContext::new("clean_stack");
    let output = ctx.run_relay(
        &["clean-stack"],
        Some("Error: x\n    at /app/node_modules/a/b.js:1:1\n- - - - -\n    at spec (/app/a.spec.js:1:1)\n"),
    );

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "Error: x\n    at spec (/app/a.spec.js:1:1)\n");
}

#[test]
fn test_cli_clean_stack_uses_configured_patterns() {
    let ctx = TestContext::new("clean_stack_config");
    ctx.create_config("[stack]\nextra_noise_patterns = [\"node:internal\"]\n");
    let trace = ctx.write_file(
        "trace.txt",
        "Error: x\n    at node:internal/timers:1:1\n    at spec (/app/a.spec.js:1:1)\n",
    );

    let output = ctx.run_relay(&["clean-stack", trace.to_str().unwrap()], None);
    assert_eq!(output.stdout, "Error: x\n    at spec (/app/a.spec.js:1:1)\n");
}

#[test]
fn test_cli_merge_stack() {
    let ctx = TestContext::new("merge_stack");
    let saved = ctx.write_file(
        "saved.txt",
        "Error: call site\n    at spec (/app/a.spec.js:5:3)\n    at /app/node_modules/@wdio/sync/build/index.js:1:1",
    );
    let command = ctx.write_file(
        "command.txt",
        "NoSuchElementError: NoSuchElementError: gone\n    at find (/app/lib/find.js:2:2)",
    );

    let output = ctx.run_relay(
        &[
            "merge-stack",
            "--saved",
            saved.to_str().unwrap(),
            "--command",
            command.to_str().unwrap(),
            "--name",
            "NoSuchElementError",
            "--message",
            "gone",
        ],
        None,
    );

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(
        output.stdout,
        "NoSuchElementError: gone\n    at find (/app/lib/find.js:2:2)\n    at spec (/app/a.spec.js:5:3)\n"
    );
}

#[test]
fn test_cli_merge_stack_requires_saved_trace() {
    let ctx = TestContext::new("merge_stack_empty");
    let saved = ctx.write_file("saved.txt", "");

    let output = ctx.run_relay(&["merge-stack", "--saved", saved.to_str().unwrap()], None);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("no stack trace"));
}

#[test]
fn test_cli_bad_config_is_reported() {
    let ctx = TestContext::new("bad_config");
    ctx.create_config("[stack]\nextra_noise_patterns = [\"(\"]\n");

    let output = ctx.run_relay(&["clean-stack"], Some("Error: x\n"));
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Invalid stack filter pattern"));
}
