use std::process::Command;

/// Short commit hash of the working tree, or "unknown" outside a git checkout
fn short_commit() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    // Reported by `rummikub-client --version` and the WASM `get_build_commit`
    println!("cargo:rustc-env=BUILD_COMMIT={}", short_commit());
    println!("cargo:rerun-if-changed=.git/HEAD");
}
