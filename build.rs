use std::process::Command;

/// Run a git command and return its trimmed stdout, or `None` outside a checkout.
fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let build = if git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some() {
        version.to_string()
    } else {
        match git(&["rev-parse", "--short", "HEAD"]) {
            Some(hash) if !hash.is_empty() => format!("{version}-dev@{hash}"),
            _ => format!("{version}-dev"),
        }
    };

    println!("cargo:rustc-env=STITCHSTRIP_BUILD={build}");
}
