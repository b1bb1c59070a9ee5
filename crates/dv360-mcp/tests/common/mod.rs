//! Common test utilities for DV360 MCP integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Path to the dv360-mcp binary
pub fn bin_path() -> PathBuf {
    env!("CARGO_BIN_EXE_dv360-mcp").into()
}

/// Isolated working directory with no DV360 variables inherited
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            temp_dir: tempdir()?,
        })
    }

    /// Command running inside the test directory, so only its `.env` is seen
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(bin_path());
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("DV360_SERVICE_ACCOUNT");
        cmd.env_remove("DV360_PARTNER_ID");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Write a `.env` file into the test directory
    pub fn write_env_file(&self, contents: &str) -> anyhow::Result<()> {
        std::fs::write(self.temp_dir.path().join(".env"), contents)?;
        Ok(())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}
