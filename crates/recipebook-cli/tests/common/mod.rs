use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;
use url::Url;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse";

/// A file-backed service plus an isolated HOME for session storage.
pub struct Sandbox {
    _dir: TempDir,
    home: PathBuf,
    service: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let home = dir.path().join("home");
        let store = dir.path().join("store");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(&store).unwrap();
        let service = Url::from_directory_path(&store)
            .expect("Failed to convert path to file URL")
            .to_string();
        Self {
            _dir: dir,
            home,
            service,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_recipebook"));
        cmd.args(args);
        cmd.env("HOME", &self.home);
        cmd.env("XDG_DATA_HOME", self.home.join("data"));
        cmd.env("RECIPEBOOK_SERVICE", &self.service);
        cmd.env_remove("RECIPEBOOK_PASSWORD");
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Run the CLI with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute CLI")
    }

    /// Run the CLI with `input` on stdin.
    pub fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute CLI");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        child.wait_with_output().expect("Failed to wait for CLI")
    }

    /// Run the CLI and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Register the default account and sign in with it.
    pub fn signed_in() -> Self {
        let sandbox = Self::new();
        sandbox.run_success(&[
            "register",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--email",
            EMAIL,
            "--password",
            PASSWORD,
        ]);
        sandbox.run_success(&["login", "--email", EMAIL, "--password", PASSWORD]);
        sandbox
    }

    /// Create a recipe and return its id.
    pub fn create_recipe(&self, name: &str) -> String {
        self.run_success(&[
            "create",
            "--name",
            name,
            "--serves",
            "4",
            "--ingredient",
            "2 eggs",
            "--ingredient",
            "200g flour",
            "--instruction",
            "Mix and bake.",
        ]);
        let page = self.list_json();
        page["contents"]
            .as_array()
            .unwrap()
            .iter()
            .find(|recipe| recipe["name"] == name)
            .and_then(|recipe| recipe["uuid"].as_str())
            .expect("created recipe is listed")
            .to_string()
    }

    pub fn list_json(&self) -> serde_json::Value {
        let stdout = self.run_success(&["list", "--json", "--size", "50"]);
        serde_json::from_str(&stdout).expect("list --json prints JSON")
    }
}
