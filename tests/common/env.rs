//! Test environment for isolated berth runs.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use berth::domain::ports::FileSystem;
use berth::infrastructure::LocalFs;
use tempfile::TempDir;

/// Result of running the berth CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parsed NDJSON lines from stdout
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| l.starts_with('{'))
            .map(|l| serde_json::from_str(l).expect("stdout line is JSON"))
            .collect()
    }
}

/// Isolated project directory and user config directory
pub struct TestEnv {
    pub project_root: TempDir,
    pub config_home: TempDir,
    bin: PathBuf,
}

const INHERITED_VARS: &[&str] = &[
    "BERTH_PORT",
    "BERTH_INTERPRETER",
    "BERTH_INDEX",
    "BERTH_UNBUFFERED",
    "BERTH_NO_CACHE",
    "BERTH_STARTUP_TIMEOUT",
    "BERTH_LOG",
    "GITHUB_ACTIONS",
    "FORCE_COLOR",
];

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().expect("project dir"),
            config_home: tempfile::tempdir().expect("config dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_berth")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = self.command(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute berth");
        to_result(output)
    }

    /// The berth command with the isolated environment applied, not yet started
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("BERTH_CONFIG_HOME", self.config_home.path())
            .env("NO_COLOR", "1")
            .env("TERM", "dumb");
        for var in INHERITED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        write(&self.path(relative), content);
    }

    pub fn write_user_config(&self, content: &str) {
        write(&self.config_home.path().join("config.toml"), content);
    }

    pub fn read_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
    }

    /// Unpack a package into the wheelhouse and return its tree digest.
    pub fn add_package(&self, name: &str, version: &str, files: &[(&str, &str)]) -> String {
        let root = self.path(&format!("wheelhouse/{}/{}", name, version));
        for (rel, content) in files {
            write(&root.join(rel), content);
        }
        LocalFs::new()
            .tree_digest(&root)
            .expect("digest")
            .to_string()
    }

    pub fn write_lock(&self, packages: &[(&str, &str, &str)]) {
        let mut lock = String::from("version = 1\n");
        for (name, version, hash) in packages {
            lock.push_str(&format!(
                "\n[[package]]\nname = \"{}\"\nversion = \"{}\"\nhash = \"{}\"\n",
                name, version, hash
            ));
        }
        self.write_file("berth.lock", &lock);
    }

    /// Parsed `build/image/berth-image.toml`
    pub fn image_manifest(&self) -> toml::Table {
        self.read_file("build/image/berth-image.toml")
            .parse()
            .expect("manifest is TOML")
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dirs");
    }
    std::fs::write(path, content).expect("write file");
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
