//! Common test utilities

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary directory holding the database file for one test
pub struct TestStore {
    pub dir: TempDir,
    pub database_url: String,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let database_url = format!("sqlite://{}", dir.path().join("users.db").display());
        Self { dir, database_url }
    }

    /// Build a `user-cli` invocation pointed at this store
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("user-cli").unwrap();
        cmd.current_dir(self.dir.path())
            .env("DATABASE_URL", &self.database_url)
            .env_remove("RUST_LOG")
            .args(args);
        cmd
    }
}
