use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn viewer_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("invoice-viewer"))
}

fn init(config_path: &Path) {
    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();
}

#[test]
fn test_help() {
    viewer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Browse invoices"));
}

#[test]
fn test_version() {
    viewer_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("invoice-viewer"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized invoice viewer config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("mock").join("facturas.json").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");

    init(&config_path);

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_list_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_first_list_fetches_and_caches() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pendiente de pago"))
        .stdout(predicate::str::contains("162.32 €"))
        .stdout(predicate::str::contains("Invoices: 6"));

    assert!(config_path.join("cache").join("invoices.json").exists());
}

#[test]
fn test_list_by_status() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "list",
            "--status",
            "paid",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pagada"))
        .stdout(predicate::str::contains("Anulada").not())
        .stdout(predicate::str::contains("Invoices: 2"))
        .stdout(predicate::str::contains("Filters applied"));
}

#[test]
fn test_list_by_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "list",
            "--from",
            "01/01/2019",
            "--to",
            "06/02/2019",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("05/02/2019"))
        .stdout(predicate::str::contains("08/01/2019"))
        .stdout(predicate::str::contains("Invoices: 2"));
}

#[test]
fn test_list_filters_excluding_everything() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list", "--min", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No hay facturas que coincidan con los filtros seleccionados",
        ));
}

#[test]
fn test_list_clear_spans_whole_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.56 €"))
        .stdout(predicate::str::contains("162.32 €"))
        .stdout(predicate::str::contains("Invoices: 6"));
}

#[test]
fn test_list_clear_with_max() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "list",
            "--clear",
            "--max",
            "30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("25.14 €"))
        .stdout(predicate::str::contains("35.16 €").not())
        .stdout(predicate::str::contains("162.32 €").not())
        .stdout(predicate::str::contains("Invoices: 4"));
}

#[test]
fn test_list_with_empty_payload() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);
    fs::write(
        config_path.join("mock").join("facturas.json"),
        r#"{"numFacturas":0,"facturas":[]}"#,
    )
    .unwrap();

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No hay facturas disponibles"));
}

#[test]
fn test_list_fails_when_refresh_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);
    fs::remove_file(config_path.join("mock").join("facturas.json")).unwrap();

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mock payload not found"));
}

#[test]
fn test_refresh_then_status() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "refresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Refreshed: 6 invoices"));

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cached invoices:  6"))
        .stdout(predicate::str::contains("Amount range:     1 - 163"))
        .stdout(predicate::str::contains("Pagada: 2"));
}

#[test]
fn test_refresh_replaces_cache() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "refresh"])
        .assert()
        .success();

    fs::write(
        config_path.join("mock").join("facturas.json"),
        r#"{"numFacturas":1,"facturas":[{"descEstado":"Anulada","importeOrdenacion":7.5,"fecha":"01/01/2024"}]}"#,
    )
    .unwrap();

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "refresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Refreshed: 1 invoices"));

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7.50 €"))
        .stdout(predicate::str::contains("Invoices: 1"));
}

#[test]
fn test_status_before_any_refresh() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cached invoices:  0"))
        .stdout(predicate::str::contains("no data"));
}

#[test]
fn test_invalid_status_value() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("viewer-config");
    init(&config_path);

    viewer_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "list",
            "--status",
            "refunded",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
