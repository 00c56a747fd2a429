use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness for running the CLI against a throwaway database
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// A `planner` command isolated from the developer's config and logging
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("planner").expect("Failed to find planner binary");
        cmd.current_dir(self.temp_dir.path())
            .env("PLANNER_DATABASE_PATH", &self.db_path)
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// All tasks as returned by `list --json`
    pub fn list_json(&self) -> Vec<serde_json::Value> {
        let output = self.run_success(&["list", "--json"]).get_output().stdout.clone();
        serde_json::from_slice(&output).expect("list --json must print a JSON array")
    }

    /// Id of the single task with the given title
    pub fn task_id(&self, title: &str) -> String {
        self.list_json()
            .into_iter()
            .find(|t| t["title"] == title)
            .and_then(|t| t["id"].as_str().map(String::from))
            .unwrap_or_else(|| panic!("no task titled {title}"))
    }
}

/// Common assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error:").or(predicate::str::contains("Invalid:"))
    }

    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Date"))
    }
}
