// Injects HEATGRID_VERSION from `git describe`, falling back to the crate version

use std::process::Command;

fn main() {
    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=HEATGRID_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

/// Map `git describe` output onto a version string
///
/// `v0.2.0` and `v0.2.0-3-gabc123` both yield `0.2.0`; an untagged
/// `abc123[-dirty]` is appended to the crate version.
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    if described.is_empty() {
        return None;
    }

    match described.strip_prefix('v') {
        Some(tagged) => Some(tagged.split('-').next().unwrap_or(tagged).to_string()),
        None => Some(format!("{}-{}", env!("CARGO_PKG_VERSION"), described)),
    }
}
