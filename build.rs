use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let git_hash = run_trimmed("git", &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    let git_status = match run_trimmed("git", &["status", "--porcelain"]) {
        Some(status) if status.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rustc = run_trimmed("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string());

    emit("CARTERA_BUILD_HASH", &git_hash);
    emit("CARTERA_BUILD_STATUS", git_status);
    emit("CARTERA_BUILD_TIMESTAMP", &timestamp);
    emit("CARTERA_BUILD_TARGET", &env_or_unknown("TARGET"));
    emit("CARTERA_BUILD_PROFILE", &env_or_unknown("PROFILE"));
    emit("CARTERA_BUILD_RUSTC", &rustc);
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={key}={value}");
}

fn env_or_unknown(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| "unknown".to_string())
}

/// Runs a command and returns its trimmed stdout, or `None` when it fails.
/// An empty stdout is returned as `Some("")` so callers can tell "clean" from "failed".
fn run_trimmed(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
