//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn biasprobe() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("biasprobe").unwrap()
}

/// A scratch directory with a low-iteration config, so hashing stays fast.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("biasprobe.toml"),
            "data_dir = \"data\"\npbkdf2_iterations = 1000\n",
        )
        .unwrap();
        Self { dir }
    }

    /// Command reading the workspace config, with no data-dir override.
    fn config_only(&self) -> Command {
        let mut cmd = biasprobe();
        cmd.current_dir(self.dir.path())
            .env_remove("BIASPROBE_DATA_DIR")
            .arg("--config")
            .arg(self.dir.path().join("biasprobe.toml"));
        cmd
    }

    fn cmd(&self) -> Command {
        let mut cmd = self.config_only();
        cmd.arg("--data-dir").arg(self.dir.path().join("data"));
        cmd
    }

    fn path(&self, rel: &str) -> std::path::PathBuf {
        self.dir.path().join(rel)
    }

    fn signed_in(name: &str) -> Self {
        let ws = Self::new();
        ws.cmd()
            .args(["register", "--username", name, "--password", "hunter22"])
            .assert()
            .success();
        ws
    }
}

#[test]
fn help_output() {
    biasprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI bias checklist runner"))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn version_output() {
    biasprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("biasprobe"));
}

#[test]
fn register_login_logout_cycle() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["register", "--username", "ada", "--password", "hunter22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered and signed in as ada"));

    ws.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ada ("));

    ws.cmd()
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out."));

    ws.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));

    ws.cmd()
        .args(["login", "--username", "ada", "--password", "hunter22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as ada"));
}

#[test]
fn password_is_not_stored_in_plaintext() {
    let ws = Workspace::signed_in("ada");
    let users = std::fs::read_to_string(ws.dir.path().join("data").join("users.json")).unwrap();
    assert!(users.contains("ada"));
    assert!(!users.contains("hunter22"));
}

#[test]
fn login_with_wrong_password_fails() {
    let ws = Workspace::signed_in("ada");
    ws.cmd().arg("logout").assert().success();

    ws.cmd()
        .args(["login", "--username", "ada", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    ws.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}

#[test]
fn duplicate_registration_fails() {
    let ws = Workspace::signed_in("ada");
    ws.cmd()
        .args(["register", "--username", "ada", "--password", "other-pass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ada"));
}

#[test]
fn templates_lists_catalog() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("GENDER"))
        .stdout(predicate::str::contains("Cultural Bias"))
        .stdout(predicate::str::contains("Privacy Compliance"));
}

#[test]
fn resources_lists_library() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("Research Library"))
        .stdout(predicate::str::contains("UNESCO AI Education Guidelines"))
        .stdout(predicate::str::contains("EU AI Act (Education Provisions)"))
        .stdout(predicate::str::contains("https://oecd.ai/en/ai-principles"));
}

#[test]
fn config_file_sets_data_dir() {
    let ws = Workspace::new();
    ws.config_only()
        .args(["register", "--username", "ada", "--password", "hunter22"])
        .assert()
        .success();
    assert!(ws.path("data/users.json").exists());
}

#[test]
fn env_data_dir_overrides_config_file() {
    let ws = Workspace::new();
    ws.config_only()
        .env("BIASPROBE_DATA_DIR", ws.path("from-env"))
        .args(["register", "--username", "ada", "--password", "hunter22"])
        .assert()
        .success();

    assert!(ws.path("from-env/users.json").exists());
    assert!(!ws.path("data").exists());
}

#[test]
fn data_dir_flag_overrides_env() {
    let ws = Workspace::new();
    ws.config_only()
        .env("BIASPROBE_DATA_DIR", ws.path("from-env"))
        .arg("--data-dir")
        .arg(ws.path("from-flag"))
        .args(["register", "--username", "ada", "--password", "hunter22"])
        .assert()
        .success();

    assert!(ws.path("from-flag/users.json").exists());
    assert!(!ws.path("from-env").exists());
    assert!(!ws.path("data").exists());
}

#[test]
fn library_events_are_logged_by_default() {
    let ws = Workspace::new();
    ws.cmd()
        .env_remove("RUST_LOG")
        .args(["report", "--inline", r#"{"results": {"GENDER": "PASS"}}"#])
        .assert()
        .success()
        .stderr(predicate::str::contains("record store initialized"));
}

#[test]
fn evaluate_requires_sign_in() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["evaluate", "--app", "Tutor", "--result", "GENDER=pass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));
}

#[test]
fn evaluate_text_report() {
    let ws = Workspace::signed_in("ada");
    ws.cmd()
        .args([
            "evaluate",
            "--app",
            "Tutor",
            "--result",
            "GENDER=pass",
            "--result",
            "CULTURE=pass",
            "--result",
            "PRIVACY=fail",
            "--note",
            "PRIVACY=keeps chat logs",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("App: Tutor"))
        .stdout(predicate::str::contains("Score: 6.7/10 (moderate)"))
        .stdout(predicate::str::contains("keeps chat logs"))
        .stderr(predicate::str::contains("Recorded test #1 (3/3 protocols)"))
        .stdout(predicate::str::contains("Methodology:"));
}

#[test]
fn evaluate_text_to_nested_file() {
    let ws = Workspace::signed_in("ada");
    let path = ws.path("reports/2024/tutor.txt");
    ws.cmd()
        .args(["evaluate", "--app", "Tutor", "--result", "GENDER=pass", "--output"])
        .arg(&path)
        .assert()
        .success();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Score: 10.0/10 (good)"));
}

#[test]
fn evaluate_json_report() {
    let ws = Workspace::signed_in("ada");
    let output = ws
        .cmd()
        .args([
            "evaluate",
            "--app",
            "Tutor",
            "--result",
            "GENDER=pass",
            "--result",
            "PRIVACY=fail",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["app_name"], "Tutor");
    assert_eq!(report["score"], 5.0);
    assert_eq!(report["lines"].as_array().unwrap().len(), 2);
}

#[test]
fn evaluate_markdown_to_file() {
    let ws = Workspace::signed_in("ada");
    let path = ws.dir.path().join("out").join("tutor.md");
    ws.cmd()
        .args(["evaluate", "--app", "Tutor", "--result", "GENDER=pass"])
        .args(["--format", "markdown", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved to"));

    let md = std::fs::read_to_string(&path).unwrap();
    assert!(md.contains("**Score:** 10.0 / 10 (good)"));
    assert!(md.contains("1 of 1 protocols met standards."));
}

#[test]
fn evaluate_rejects_unknown_protocol() {
    let ws = Workspace::signed_in("ada");
    ws.cmd()
        .args(["evaluate", "--app", "Tutor", "--result", "AGE=pass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AGE"));
}

#[test]
fn inline_report() {
    let ws = Workspace::new();
    ws.cmd()
        .args([
            "report",
            "--inline",
            r#"{"results": {"GENDER": "PASS", "CULTURE": "FAIL"}}"#,
            "--format",
            "markdown",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Score:** 5.0 / 10 (moderate)"))
        .stdout(predicate::str::contains("| Cultural Bias | FAIL | Potential Issues Found |"));
}

#[test]
fn inline_report_rejects_bad_json() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["report", "--inline", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid inline results"));
}

#[test]
fn shell_session_shares_one_store() {
    let ws = Workspace::signed_in("ada");
    ws.cmd()
        .arg("shell")
        .write_stdin(
            "review X 4 \"good\"\n\
             review X 2 \"bad\"\n\
             average X\n\
             evaluate Tutor --result GENDER=pass\n\
             recent\n\
             review X 9 \"too high\"\n\
             quit\n\
             average X\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Added review #2."))
        .stdout(predicate::str::contains("Average rating for X: 3.00"))
        .stdout(predicate::str::contains("Tutor"))
        .stdout(predicate::str::contains("Error:"));
}

#[test]
fn shell_requires_sign_in() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("shell")
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));
}

#[test]
fn init_creates_then_skips() {
    let dir = TempDir::new().unwrap();

    biasprobe()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created biasprobe.toml"));
    assert!(dir.path().join("biasprobe.toml").exists());

    biasprobe()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
