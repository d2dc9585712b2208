use std::process::Command;

fn main() {
    // Short commit hash reported by GET /health; "unknown" outside a git checkout.
    let sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=REELBOT_GIT_SHA={sha}");

    // Rebuild when HEAD moves so /health never reports a stale commit.
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");
    println!("cargo:rerun-if-changed=build.rs");
}
