//! Integration tests for the velo CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd. Each
//! test points `VELO_CONFIG` at a temp directory so the user's own
//! configuration never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get an isolated velo command
fn velo(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("velo").unwrap();
    cmd.env("VELO_CONFIG", tmp.path().join("config.yaml"))
        .env_remove("VELO_FORMAT")
        .env_remove("VELO_CURRENCY")
        .env_remove("VELO_CATALOG")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json_of(cmd: &mut Command) -> serde_json::Value {
    serde_json::from_str(&stdout_of(cmd)).unwrap()
}

/// Helper to write a catalog file into the temp directory
fn write_catalog(tmp: &TempDir, contents: &str) -> PathBuf {
    let path = tmp.path().join("catalog.yaml");
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("part"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("velo"));
}

// ============================================================================
// Projects
// ============================================================================

#[test]
fn test_project_list_default_table() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1985 Trek 720 Touring Bike"))
        .stdout(predicate::str::contains("6 project(s) found"))
        .stdout(predicate::str::contains("Totals:"));
}

#[test]
fn test_project_list_status_filter_sorted_by_title() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "list", "--status", "in-progress", "--format", "id"])
        .assert()
        .success()
        .stdout("5\n1\n");
}

#[test]
fn test_project_list_unknown_status_means_all() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "list", "--status", "finished", "--count"])
        .assert()
        .success()
        .stdout("6\n")
        .stderr(predicate::str::contains("ignoring unrecognised filter value"));
}

#[test]
fn test_project_list_sort_by_target_date() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "list", "--sort", "target-date", "-f", "short-id"])
        .assert()
        .success()
        .stdout("PROJ@3\nPROJ@4\nPROJ@1\nPROJ@5\nPROJ@2\nPROJ@6\n");

    velo(&tmp)
        .args(["project", "list", "--sort", "target-date", "--desc", "--limit", "2", "-f", "id"])
        .assert()
        .success()
        .stdout("6\n2\n");
}

#[test]
fn test_project_list_wrap_and_quiet() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "list", "--wrap", "12", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Touring"))
        .stdout(predicate::str::contains("project(s) found").not())
        .stdout(predicate::str::contains("Totals:").not());
}

#[test]
fn test_project_list_search() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "list", "--search", "ROAD BIKE", "-f", "id"])
        .assert()
        .success()
        .stdout("5\n3\n");
}

#[test]
fn test_project_show_detail() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "show", "PROJ@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1985 Trek 720 Touring Bike"))
        .stdout(predicate::str::contains("John Smith"))
        .stdout(predicate::str::contains("Frame Restoration"))
        .stdout(predicate::str::contains("Brake Cable Set"))
        .stdout(predicate::str::contains("Frame after paint stripping"));
}

#[test]
fn test_project_show_json_includes_related() {
    let tmp = TempDir::new().unwrap();
    let detail = json_of(velo(&tmp).args(["project", "show", "rockhopper", "-f", "json"]));
    assert_eq!(detail["id"], "2");
    assert_eq!(detail["parts"].as_array().unwrap().len(), 1);
    assert_eq!(detail["costs"]["parts_total"], 15.0);
}

#[test]
fn test_project_show_unknown_is_not_found() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found: 42"));
}

#[test]
fn test_project_show_ambiguous_title() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "show", "bike"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matches more than one project"));
}

#[test]
fn test_project_new_with_subs_and_parts() {
    let tmp = TempDir::new().unwrap();
    let created = json_of(velo(&tmp).args([
        "project",
        "new",
        "--title",
        "1988 Cinelli Supercorsa",
        "--description",
        "Full strip and rebuild of a classic race frame",
        "--start",
        "2024-05-01",
        "--target",
        "2024-08-01",
        "--sub",
        "Frame Prep:6",
        "--part",
        "Headset:Frame & Fork:89.00",
        "-f",
        "json",
    ]));

    assert_eq!(created["project"]["title"], "1988 Cinelli Supercorsa");
    assert_eq!(created["project"]["status"], "not-started");
    assert_eq!(created["sub_projects"][0]["estimated_hours"], 6.0);
    assert_eq!(created["parts"][0]["category"], "Frame & Fork");
    assert_eq!(created["parts"][0]["cost"], 89.0);
    assert_eq!(created["parts"][0]["project_id"], created["project"]["id"]);
}

#[test]
fn test_project_new_validation_blocks_creation() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "new", "--title", "  ", "--description", "too short"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Created").not())
        .stderr(predicate::str::contains("Project title is required"))
        .stderr(predicate::str::contains("Description must be at least 10 characters"));
}

#[test]
fn test_project_new_rejects_bad_date_and_part() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args([
            "project",
            "new",
            "--title",
            "Tandem",
            "--description",
            "A long-wheelbase touring tandem",
            "--start",
            "01/05/2024",
            "--part",
            "Boom tube",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Start date must be a date in YYYY-MM-DD format"))
        .stderr(predicate::str::contains("Category is required"));
}

#[test]
fn test_project_edit_and_delete() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["project", "edit", "PROJ@2", "--status", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated project PROJ@2"))
        .stdout(predicate::str::contains("in-progress"));

    velo(&tmp)
        .args(["project", "delete", "PROJ@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 project(s) remain"))
        .stdout(predicate::str::contains("3 part(s) and 3 sub-project(s) still reference"));
}

#[test]
fn test_project_edit_keeps_missing_description() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(
        &tmp,
        "projects:\n  - id: a\n    title: Frame only\n    start_date: 2024-02-01\n    target_date: 2024-04-30\n",
    );

    velo(&tmp)
        .args(["project", "edit", "a", "--status", "completed", "--catalog"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated project PROJ@1"));

    velo(&tmp)
        .args(["project", "edit", "a", "--description", "short", "--catalog"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Description must be at least 10 characters"));
}

#[test]
fn test_project_edit_records_costs_and_progress() {
    let tmp = TempDir::new().unwrap();
    let project = json_of(velo(&tmp).args([
        "project",
        "edit",
        "PROJ@2",
        "--actual-cost",
        "120",
        "--work-started",
        "2024-02-05",
        "--notes",
        "Frame is straight",
        "-f",
        "json",
    ]));
    assert_eq!(project["actual_cost"], 120.0);
    assert_eq!(project["work_started"], "2024-02-05");
    assert_eq!(project["notes"], "Frame is straight");

    velo(&tmp)
        .args(["project", "edit", "PROJ@2", "--work-started", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dates use YYYY-MM-DD format"));
}

// ============================================================================
// Parts
// ============================================================================

#[test]
fn test_part_list_status_count() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["part", "list", "--status", "ordered", "--count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_part_list_category_is_exact() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["part", "list", "--category", "Drivetrain", "-f", "id"])
        .assert()
        .success()
        .stdout("4\n2\n");

    velo(&tmp)
        .args(["part", "list", "--category", "drivetrain", "--count"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_part_list_totals_cover_all_parts() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["part", "list", "--status", "needed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 part(s) found"))
        .stdout(predicate::str::contains("10 part(s)"))
        .stdout(predicate::str::contains("4 on order"))
        .stdout(predicate::str::contains("1 installed"));
}

#[test]
fn test_part_list_for_project_json() {
    let tmp = TempDir::new().unwrap();
    let parts = json_of(velo(&tmp).args(["part", "list", "--project", "PROJ@1", "-f", "json"]));
    let parts = parts.as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert!(parts
        .iter()
        .all(|p| p["project_title"] == "1985 Trek 720 Touring Bike"));
}

#[test]
fn test_part_new_and_status_patch() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args([
            "part", "new", "--project", "PROJ@4", "--name", "Track Cog", "--category", "Drivetrain",
            "--cost", "$22.00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created part PART@11"))
        .stdout(predicate::str::contains("3 part(s) on this project"));

    velo(&tmp)
        .args(["part", "edit", "PART@3", "--status", "ordered", "--ordered", "2024-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated part PART@3"))
        .stdout(predicate::str::contains("needed → ordered"));
}

#[test]
fn test_part_edit_keeps_numeric_cost() {
    let tmp = TempDir::new().unwrap();
    let part = json_of(velo(&tmp).args([
        "part",
        "edit",
        "PART@4",
        "--status",
        "received",
        "--description",
        "Period-correct 53/42 rings",
        "-f",
        "json",
    ]));
    assert_eq!(part["cost"], 450.0);
    assert_eq!(part["status"], "received");
    assert_eq!(part["description"], "Period-correct 53/42 rings");
}

#[test]
fn test_part_new_requires_name() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["part", "new", "--project", "PROJ@1", "--ordered", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Part name is required"))
        .stderr(predicate::str::contains("Dates use YYYY-MM-DD format"));
}

#[test]
fn test_part_for_unknown_project() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["part", "new", "--project", "PROJ@42", "--name", "Bell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found"));
}

// ============================================================================
// Sub-projects and photos
// ============================================================================

#[test]
fn test_sub_list_for_project() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["sub", "list", "--project", "PROJ@1", "--sort", "estimated-hours", "-f", "id"])
        .assert()
        .success()
        .stdout("3\n2\n1\n");
}

#[test]
fn test_sub_new_rejects_negative_hours() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["sub", "new", "--project", "PROJ@1", "--title", "Polish", "--estimated=-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Hours cannot be negative"));
}

#[test]
fn test_photo_inspiration_gallery() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["photo", "list", "--inspiration", "-f", "id"])
        .assert()
        .success()
        .stdout("4\n5\n6\n");
}

#[test]
fn test_photo_add_validates_image() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["photo", "add", "receipt.pdf", "--project", "PROJ@1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("receipt.pdf is not a valid image file"));

    velo(&tmp)
        .args(["photo", "add", "shots/headbadge.PNG", "--project", "PROJ@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added photo PHOTO@7"))
        .stdout(predicate::str::contains("4 photo(s)"));
}

// ============================================================================
// Dashboard, search, export
// ============================================================================

#[test]
fn test_dashboard_sections() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["dashboard", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PROJECTS"))
        .stdout(predicate::str::contains("ON ORDER (4)"))
        .stdout(predicate::str::contains("+2 more"))
        .stdout(predicate::str::contains("COST SUMMARY"))
        .stdout(predicate::str::contains("Final costs $467.00"))
        .stdout(predicate::str::contains("$362.01 over"))
        .stdout(predicate::str::contains("17%"));
}

#[test]
fn test_dashboard_json() {
    let tmp = TempDir::new().unwrap();
    let dashboard = json_of(velo(&tmp).args(["dashboard", "-f", "json"]));
    assert_eq!(dashboard["completion_rate"], 17);
    assert_eq!(dashboard["projects"]["in-progress"], 2);
    assert_eq!(dashboard["parts"]["on_order"], 4);

    let totals = &dashboard["cost_totals"];
    assert!((totals["parts_value"].as_f64().unwrap() - 1424.99).abs() < 1e-6);
    assert!((totals["parts_total"].as_f64().unwrap() - 1424.99).abs() < 1e-6);
    assert_eq!(totals["final_total"], 467.0);
    assert_eq!(dashboard["costs"][0]["over_budget"], true);
}

#[test]
fn test_search_across_entities() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["search", "frame", "--count"])
        .assert()
        .success()
        .stdout("3\n");

    velo(&tmp)
        .args(["search", "chain reaction"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Continental Grand Prix 5000 Tires"));
}

#[test]
fn test_export_json() {
    let tmp = TempDir::new().unwrap();
    let catalog = json_of(velo(&tmp).args(["export", "-f", "json"]));
    assert_eq!(catalog["projects"].as_array().unwrap().len(), 6);
    assert_eq!(catalog["parts"].as_array().unwrap().len(), 10);
    assert_eq!(catalog["photos"].as_array().unwrap().len(), 6);
}

#[test]
fn test_export_rejects_table_formats() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["export", "-f", "csv"])
        .assert()
        .failure();
}

// ============================================================================
// Catalog files
// ============================================================================

#[test]
fn test_exported_yaml_loads_as_catalog() {
    let tmp = TempDir::new().unwrap();
    let yaml = stdout_of(velo(&tmp).arg("export"));
    let path = write_catalog(&tmp, &yaml);

    velo(&tmp)
        .args(["project", "list", "--count", "--catalog"])
        .arg(&path)
        .assert()
        .success()
        .stdout("6\n");
}

#[test]
fn test_custom_catalog_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(
        &tmp,
        r#"
projects:
  - id: a
    title: Raleigh Chopper
    description: Seventies icon, needs everything
    status: on-hold
    start_date: 2024-06-01
    target_date: 2024-09-01
parts:
  - id: p1
    project_id: a
    name: Sissy bar
    status: needed
    cost: 40
"#,
    );

    velo(&tmp)
        .args(["part", "list", "-f", "csv", "--catalog"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sissy bar"))
        .stdout(predicate::str::contains("Raleigh Chopper"));

    velo(&tmp)
        .env("VELO_CATALOG", &path)
        .args(["project", "list", "-f", "id"])
        .assert()
        .success()
        .stdout("a\n");
}

#[test]
fn test_invalid_catalog_is_reported() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(
        &tmp,
        "projects:\n  - id: a\n    title: Broken\n    status: finished\n    start_date: 2024-01-01\n    target_date: 2024-02-01\n",
    );
    velo(&tmp)
        .args(["project", "list", "--catalog"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid catalog YAML"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(
        &tmp,
        "parts:\n  - id: x\n    project_id: a\n    name: One\n  - id: x\n    project_id: a\n    name: Two\n",
    );
    velo(&tmp)
        .args(["part", "list", "--catalog"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate part id 'x'"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_set_show_unset() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["config", "set", "currency_symbol", "€"])
        .assert()
        .success();
    assert!(tmp.path().join("config.yaml").exists());

    velo(&tmp)
        .args(["config", "show", "currency_symbol"])
        .assert()
        .success()
        .stdout("€\n");

    velo(&tmp)
        .args(["part", "list", "--project", "PROJ@3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€450.00"));

    velo(&tmp)
        .args(["config", "unset", "currency_symbol"])
        .assert()
        .success();
    velo(&tmp)
        .args(["config", "show", "currency_symbol"])
        .assert()
        .failure();
}

#[test]
fn test_config_rejects_unknown_key_and_format() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));

    velo(&tmp)
        .args(["config", "set", "default_format", "xml"])
        .assert()
        .failure();
}

#[test]
fn test_default_format_from_config_and_env() {
    let tmp = TempDir::new().unwrap();
    velo(&tmp)
        .args(["config", "set", "default_format", "id"])
        .assert()
        .success();
    velo(&tmp)
        .args(["photo", "list", "--inspiration"])
        .assert()
        .success()
        .stdout("4\n5\n6\n");

    // Environment beats the config file; the flag beats both
    velo(&tmp)
        .env("VELO_FORMAT", "short-id")
        .args(["photo", "list", "--inspiration"])
        .assert()
        .success()
        .stdout("PHOTO@4\nPHOTO@5\nPHOTO@6\n");
    velo(&tmp)
        .env("VELO_FORMAT", "short-id")
        .args(["part", "list", "--status", "installed", "-f", "id"])
        .assert()
        .success()
        .stdout("6\n");
}
