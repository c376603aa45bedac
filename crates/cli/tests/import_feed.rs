use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn dex() -> Command {
    let mut cmd = Command::cargo_bin("dex").expect("binary");
    cmd.env_remove("DEX_CATALOG")
        .env_remove("DEX_PROFILE")
        .env_remove("DEX_TEXT_INDEX");
    cmd
}

#[test]
fn imported_catalog_is_searchable() {
    let temp = tempdir().unwrap();
    let feed = temp.path().join("feed.json");
    let out = temp.path().join("data/catalog.json");

    let entries = json!([
        {
            "name": "eevee", "height": 3, "weight": 65,
            "types": [{"slot": 1, "type": {"name": "normal"}}],
            "stats": [
                {"base_stat": 55, "stat": {"name": "hp"}},
                {"base_stat": 55, "stat": {"name": "attack"}},
                {"base_stat": 50, "stat": {"name": "defense"}},
                {"base_stat": 55, "stat": {"name": "speed"}}
            ]
        },
        {
            "name": "vaporeon", "height": 10, "weight": 290,
            "types": [{"slot": 1, "type": {"name": "water"}}],
            "stats": [{"base_stat": 130, "stat": {"name": "hp"}}]
        },
        {"height": 1}
    ]);
    fs::write(&feed, serde_json::to_vec(&entries).unwrap()).unwrap();

    let output = dex()
        .args(["import", "--json", "--from"])
        .arg(&feed)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("import run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["records"], 2);
    assert_eq!(report["skipped"], 1);

    let saved: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(saved["schema_version"], 1);
    assert_eq!(saved["records"][0]["searchText"], "eevee normal");
    assert_eq!(saved["records"][1]["stats"]["attack"], 0);

    let output = dex()
        .arg("--catalog")
        .arg(&out)
        .args(["search", "--min-hp", "100", "--json"])
        .output()
        .expect("search run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "vaporeon");
}

#[test]
fn missing_feed_fails() {
    let temp = tempdir().unwrap();
    dex()
        .args(["import", "--from"])
        .arg(temp.path().join("absent.json"))
        .arg("--out")
        .arg(temp.path().join("catalog.json"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read feed"));
}
