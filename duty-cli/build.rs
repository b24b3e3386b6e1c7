use std::path::Path;
use std::process::Command;

/// `git describe` of the workspace, e.g. `a1b2c3d` or `a1b2c3d-dirty`.
fn describe(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let workspace = Path::new(&manifest_dir).join("..");

    println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());
    println!(
        "cargo:rustc-env=DUTY_BUILD_SHA={}",
        describe(&workspace).unwrap_or_else(|| "unknown".into())
    );
}
