// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=RGBD_MESH_VERSION");

    // Packaged builds pin the version explicitly
    let version = match std::env::var("RGBD_MESH_VERSION") {
        Ok(v) => v,
        Err(_) => describe_version(),
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version from `git describe`, formatted as `<tag>-<hash>` or
/// `<tag>-dirty-<hash>` when HEAD is past the last tag.
fn describe_version() -> String {
    let pkg_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());

    let described = git(&["describe", "--tags", "--always", "--match", "v*"]);
    let hash = git(&["rev-parse", "--short", "HEAD"]);

    match (described, hash) {
        (Some(described), Some(hash)) => {
            let described = described.strip_prefix('v').unwrap_or(&described).to_string();
            let parts: Vec<&str> = described.rsplitn(3, '-').collect();
            if parts.len() >= 3 {
                format!("{}-dirty-{}", parts[2], hash)
            } else if described == hash {
                // No tags yet, describe fell back to the bare hash
                format!("{}-{}", pkg_version, hash)
            } else {
                format!("{}-{}", described, hash)
            }
        }
        _ => pkg_version,
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
