//! Build script for jobsh-repl.
//!
//! Stamps the binary with the git revision and build date shown by `jobsh -V`.

use std::path::Path;
use std::process::Command;

fn git_revision() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "--short", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    // Source tarballs ship without .git
    if Path::new("../../.git").exists() {
        println!("cargo::rerun-if-changed=../../.git/HEAD");
    }

    let revision = git_revision().unwrap_or_else(|| "unknown".to_string());
    let date = chrono::Utc::now().date_naive();

    println!("cargo:rustc-env=JOBSH_GIT_HASH={revision}");
    println!("cargo:rustc-env=JOBSH_BUILD_DATE={date}");
}
