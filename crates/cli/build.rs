use std::env;
use std::process::Command;

/// Abbreviated HEAD commit, or `None` outside a git checkout.
fn head_commit() -> Option<String> {
    let out = Command::new("git")
        .args(["log", "-1", "--format=%h", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let hash = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!hash.is_empty()).then_some(hash)
}

fn main() {
    for watched in ["../../.git/HEAD", "../../.git/refs/heads"] {
        println!("cargo:rerun-if-changed={watched}");
    }

    let commit = head_commit().unwrap_or_else(|| "unknown".into());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".into());

    // read back by long_version() in main.rs
    println!("cargo:rustc-env=GIT_COMMIT_HASH={commit}");
    println!("cargo:rustc-env=TARGET={target}");
}
