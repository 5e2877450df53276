use std::process::Command;

fn main() {
  println!("cargo:rerun-if-changed=.git/HEAD");

  println!(
    "cargo:rustc-env=GIT_BRANCH={}",
    git(&["rev-parse", "--abbrev-ref", "HEAD"])
  );
  println!(
    "cargo:rustc-env=GIT_COMMIT_SHORT={}",
    git(&["rev-parse", "--short", "HEAD"])
  );

  let rustc = Command::new("rustc")
    .arg("--version")
    .output()
    .ok()
    .and_then(|o| String::from_utf8(o.stdout).ok())
    .map(|s| s.trim().to_string())
    .unwrap_or_else(|| "unknown".to_string());
  println!("cargo:rustc-env=RUST_VERSION={}", rustc);
}

fn git(args: &[&str]) -> String {
  Command::new("git")
    .args(args)
    .output()
    .ok()
    .filter(|o| o.status.success())
    .and_then(|o| String::from_utf8(o.stdout).ok())
    .map(|s| s.trim().to_string())
    .unwrap_or_else(|| "unknown".to_string())
}
