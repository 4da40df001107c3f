#![allow(dead_code)]

pub mod cli {
    use assert_cmd::Command;
    use std::ffi::OsStr;
    use std::fs;
    use std::path::PathBuf;
    use std::process::ExitStatus;
    use tempfile::TempDir;

    /// A temporary directory to run `roster` in.
    pub struct RosterWorkspace {
        _temp: TempDir,
        pub root: PathBuf,
    }

    impl RosterWorkspace {
        pub fn new() -> Self {
            let temp = TempDir::new().expect("temp dir");
            let root = temp.path().to_path_buf();
            Self { _temp: temp, root }
        }

        /// Workspace with `roster init` already run (staff user `admin`).
        pub fn initialized() -> Self {
            let workspace = Self::new();
            let output = run_roster(&workspace, ["init"], "init");
            assert!(output.status.success(), "init failed: {}", output.stderr);
            workspace
        }

        pub fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.root.join(name);
            fs::write(&path, content).expect("write fixture");
            path
        }

        pub fn read(&self, name: &str) -> String {
            fs::read_to_string(self.root.join(name)).expect("read output")
        }
    }

    pub struct RunOutput {
        pub status: ExitStatus,
        pub stdout: String,
        pub stderr: String,
    }

    impl RunOutput {
        pub fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.stdout)
                .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
        }
    }

    /// Run the binary in `workspace`; `label` tags the captured output in
    /// failure messages.
    pub fn run_roster<I, S>(workspace: &RosterWorkspace, args: I, label: &str) -> RunOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::cargo_bin("roster")
            .expect("roster binary")
            .args(args)
            .current_dir(&workspace.root)
            .env_remove("ROSTER_USER")
            .env_remove("ROSTER_STORE")
            .env_remove("RUST_LOG")
            .output()
            .unwrap_or_else(|e| panic!("{label}: failed to run roster: {e}"));

        RunOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
