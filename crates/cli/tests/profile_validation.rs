use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/common_catalog.json")
}

#[allow(deprecated)]
fn dex() -> Command {
    let mut cmd = Command::cargo_bin("dex").expect("binary");
    cmd.env_remove("DEX_PROFILE").arg("--catalog").arg(catalog());
    cmd
}

#[test]
fn profile_reports_unknown_fields_with_paths() {
    let temp = tempdir().unwrap();
    let profile = temp.path().join("bad.toml");
    fs::write(&profile, "schema_version = 1\n\n[weights]\nname = 50.0\nnmae = 10.0\n").unwrap();

    dex()
        .arg("--profile")
        .arg(&profile)
        .args(["search", "mew"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("weights.nmae"));
}

#[test]
fn profile_from_env_changes_ranking() {
    let temp = tempdir().unwrap();
    let profile = temp.path().join("names.toml");
    fs::write(&profile, "[weights]\nname = 60.0\n").unwrap();

    let output = dex()
        .env("DEX_PROFILE", &profile)
        .args(["search", "mew", "--json", "--limit", "1"])
        .output()
        .expect("search run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["data"][0]["name"], "mew");
}

#[test]
fn builtin_profile_name_is_accepted() {
    let output = dex()
        .args(["--profile", "default", "search", "mew", "--json", "--limit", "1"])
        .output()
        .expect("search run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["data"][0]["name"], "mew");
}
