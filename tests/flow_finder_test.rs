//! Source scanning e2e tests
//!
//! Fixtures: tests/fixtures/flows/{prefect,airflow}/

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use portal_flow_finder::discovery::DiagnosticStage;
use portal_flow_finder::{FlowDetails, FlowFilter, FlowFinder, ObjType, ParentType, SourceFlowFinder};

fn fixtures_path(platform: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("flows")
        .join(platform)
}

fn by_id<'a>(flows: &'a [FlowDetails], id: &str) -> &'a FlowDetails {
    flows
        .iter()
        .find(|f| f.id == id)
        .unwrap_or_else(|| panic!("no flow with id {id}"))
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// =============================================================================
// prefect fixtures
// =============================================================================

#[test]
fn test_prefect_fixture_catalog() {
    let outcome = SourceFlowFinder::prefect(fixtures_path("prefect")).scan().unwrap();
    let flows = outcome.catalog.into_flows();

    let ids: Vec<_> = flows.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["hello-world_0", "plain_1", "team-a--etl_2", "run_3"]);
    assert_eq!(outcome.report.files_scanned, 4);
}

#[test]
fn test_prefect_named_flow() {
    let flows = SourceFlowFinder::prefect(fixtures_path("prefect")).scan_flows().unwrap();
    let hello = by_id(&flows, "hello-world_0");

    assert_eq!(hello.name, "hello_world");
    assert_eq!(hello.original_name, "hello-world");
    assert_eq!(hello.description, "Greets the world");
    assert_eq!(hello.obj_type, ObjType::Function);
    assert_eq!(hello.obj_name, "hello");
    assert_eq!(hello.obj_parent_type, ParentType::Module);
    assert_eq!(hello.obj_parent, "example");
    assert_eq!(hello.module, "example");
    assert_eq!(hello.source_relative, "example.py");
    assert_eq!(hello.import_path, "prefect.example");
    assert_eq!(hello.line_number, Some(6));
    assert!(hello.grouping.is_empty());
    assert!(Path::new(&hello.source_path).is_absolute());
    assert_eq!(
        hello.child_attributes["kwargs"],
        json!({ "name": "hello-world", "description": "Greets the world", "retries": 2 })
    );
    assert_eq!(hello.child_attributes["platform"], "prefect");
}

#[test]
fn test_prefect_bare_decorator_uses_docstring() {
    let flows = SourceFlowFinder::prefect(fixtures_path("prefect")).scan_flows().unwrap();
    let plain = by_id(&flows, "plain_1");

    assert_eq!(plain.name, "plain");
    assert_eq!(plain.description, "Say hello.\n\nMore detail.");
    assert!(plain.child_attributes.get("kwargs").is_none());
}

#[test]
fn test_prefect_nested_and_class_flows() {
    let flows = SourceFlowFinder::prefect(fixtures_path("prefect")).scan_flows().unwrap();

    let etl = by_id(&flows, "team-a--etl_2");
    assert_eq!(etl.name, "team_a__etl");
    assert_eq!(etl.grouping, vec!["subflows"]);
    assert_eq!(etl.import_path, "prefect.subflows.nested");
    assert_eq!(etl.child_attributes["kwargs"]["log_prints"], true);

    // The f-string name is not a literal, so the method name is used.
    let run = by_id(&flows, "run_3");
    assert_eq!(run.obj_type, ObjType::Method);
    assert_eq!(run.obj_parent_type, ParentType::Class);
    assert_eq!(run.obj_parent, "Pipelines");
    assert_eq!(run.description, "Runs the pipeline.");
}

#[test]
fn test_prefect_broken_file_is_diagnosed() {
    let outcome = SourceFlowFinder::prefect(fixtures_path("prefect")).scan().unwrap();

    assert_eq!(outcome.report.diagnostics.len(), 1);
    let diagnostic = &outcome.report.diagnostics[0];
    assert_eq!(diagnostic.stage, DiagnosticStage::Parse);
    assert!(diagnostic.path.ends_with("broken.py"));
    assert!(outcome.catalog.iter().all(|f| f.name != "never_seen"));
}

#[test]
fn test_prefect_group_filter() {
    let finder = SourceFlowFinder::prefect(fixtures_path("prefect"));
    let flows = finder.find_flows(&FlowFilter::groups(["subflows"])).unwrap();

    let names: Vec<_> = flows.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["team_a__etl", "run"]);
}

// =============================================================================
// airflow fixtures
// =============================================================================

#[test]
fn test_airflow_fixture_catalog() {
    let flows = SourceFlowFinder::airflow(fixtures_path("airflow")).scan_flows().unwrap();

    let ids: Vec<_> = flows.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "team-a--etl_0",
            "my_pipeline_1",
            "legacy_2",
            "proj--main--etl--dev_3",
            "report_4",
        ]
    );
}

#[test]
fn test_airflow_instantiated_dag() {
    let flows = SourceFlowFinder::airflow(fixtures_path("airflow")).scan_flows().unwrap();
    let etl = by_id(&flows, "team-a--etl_0");

    assert_eq!(etl.obj_type, ObjType::Object);
    assert_eq!(etl.obj_name, "etl_dag");
    assert_eq!(etl.description, "Nightly ETL");
    assert_eq!(etl.grouping, vec!["team_a"]);
    assert_eq!(etl.import_path, "airflow.team_a.etl");
    assert_eq!(etl.line_number, Some(5));
    assert_eq!(
        etl.child_attributes["kwargs"],
        json!({ "dag_id": "team-a--etl", "description": "Nightly ETL", "catchup": false })
    );

    let untitled = by_id(&flows, "my_pipeline_1");
    assert_eq!(untitled.original_name, "my_pipeline");
    assert_eq!(untitled.child_attributes["kwargs"], json!({ "schedule": null }));
}

#[test]
fn test_airflow_decorated_dag() {
    let flows = SourceFlowFinder::airflow(fixtures_path("airflow")).scan_flows().unwrap();
    let etl = by_id(&flows, "proj--main--etl--dev_3");

    assert_eq!(etl.name, "proj__main__etl__dev");
    assert_eq!(etl.original_name, "proj--main--etl--dev");
    assert_eq!(etl.obj_type, ObjType::Function);
    assert_eq!(etl.obj_name, "etl_pipeline");
    assert_eq!(etl.child_attributes["kwargs"]["max_active_runs"], 1);

    let report = by_id(&flows, "report_4");
    assert_eq!(report.description, "Daily report.");
}

#[test]
fn test_airflow_ignores_dags_built_inside_functions() {
    let flows = SourceFlowFinder::airflow(fixtures_path("airflow")).scan_flows().unwrap();
    assert!(flows.iter().all(|f| f.original_name != "built-at-runtime"));
}

// =============================================================================
// scan properties
// =============================================================================

#[test]
fn test_repeated_scans_are_identical() {
    let finder = SourceFlowFinder::airflow(fixtures_path("airflow"));
    let first = finder.scan_flows().unwrap();
    let second = finder.scan_flows().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_plain_code_yields_empty_catalog() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "pkg/plain.py",
        "class Thing:\n    def method(self):\n        return 1\n\n\ndef helper():\n    pass\n",
    );

    let outcome = SourceFlowFinder::airflow(temp_dir.path()).scan().unwrap();
    assert!(outcome.catalog.is_empty());
    assert!(outcome.report.is_clean());
    assert_eq!(outcome.report.files_scanned, 1);
}

#[test]
fn test_same_name_in_one_file_gets_distinct_ids() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "dup.py",
        "from prefect import flow\n\n@flow(name=\"etl\")\ndef a():\n    pass\n\n@flow(name=\"etl\")\ndef b():\n    pass\n",
    );

    let flows = SourceFlowFinder::prefect(temp_dir.path()).scan_flows().unwrap();
    let ids: Vec<_> = flows.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["etl_0", "etl_1"]);
    assert!(flows.iter().all(|f| f.name == "etl"));
}

#[test]
fn test_scan_honors_config_exclusions() {
    let temp_dir = TempDir::new().unwrap();
    let flow = "from prefect import flow\n\n@flow\ndef f():\n    pass\n";
    write(temp_dir.path(), "keep/a.py", flow);
    write(temp_dir.path(), "vendor/b.py", flow);
    write(temp_dir.path(), "scripts/c.pyw", flow);

    let config = portal_flow_finder::ScanConfig::from_yaml_str(
        "excluded_dirs: [vendor]\nextensions: [py, pyw]\n",
        Path::new("inline.yaml"),
    )
    .unwrap();
    let flows = SourceFlowFinder::prefect(temp_dir.path())
        .with_config(config)
        .scan_flows()
        .unwrap();

    let groups: Vec<_> = flows.iter().map(|f| f.grouping[0].as_str()).collect();
    assert_eq!(groups, vec!["keep", "scripts"]);
}
