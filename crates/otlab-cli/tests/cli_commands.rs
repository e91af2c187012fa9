use otlab_cli::{cli, commands, Lab, LabConfig, OutputFormat};
use otlab_core::{ScenarioId, SourceRevisionInfo};
use otlab_resolve::{OverrideField, Overrides, ResolveError};
use otlab_test_utils::{builtin_registry, sample_revision, SAMPLE_REGISTRY_YAML};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn lab() -> Lab {
    Lab::new(builtin_registry(), LabConfig::default(), sample_revision())
}

fn run(lab: &Lab, argv: &[&str]) -> anyhow::Result<String> {
    let matches = cli::command().try_get_matches_from(argv.iter().copied())?;
    let (name, args) = matches.subcommand().unwrap();
    cli::run_with(lab, name, args)
}

#[test]
fn metadata_for_service_includes_wiring() {
    let out = run(
        &lab(),
        &["otlab", "metadata", "scenario1", "--service", "api-service", "--json"],
    )
    .unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["labels"]["scenario"], "scenario1");
    assert_eq!(json["labels"]["git-repository-url"], "github.com_acme_otel-lab");
    assert_eq!(json["annotations"]["git-repository-url"], "github.com/acme/otel-lab");

    let env: Vec<(String, String)> = json["environment"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| {
            (
                v["name"].as_str().unwrap().to_string(),
                v["value"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert!(env.contains(&("OTEL_SERVICE_NAME".into(), "datadog-api-service".into())));
    assert!(env.contains(&(
        "DATABASE_SERVICE_URL".into(),
        "http://datadog-database-service:5002".into()
    )));
}

#[test]
fn metadata_without_revision_reports_unknown() {
    let lab = Lab::new(builtin_registry(), LabConfig::default(), SourceRevisionInfo::unknown());
    let out = run(&lab, &["otlab", "metadata", "2"]).unwrap();
    assert!(out.contains("git-commit-sha=unknown"));
    assert!(out.contains("git-repository-url=unknown"));
    assert!(!out.contains("environment:"));
}

#[test]
fn invalid_endpoint_flag_names_the_field() {
    let err = run(
        &lab(),
        &["otlab", "resolve", "scenario2", "--endpoint", "otel-collector:4318"],
    )
    .unwrap_err();

    let resolve = err.downcast_ref::<ResolveError>().unwrap();
    assert_eq!(resolve.override_field(), Some(OverrideField::Endpoint));
    assert!(format!("{err:#}").contains("invalid endpoint override"));
}

#[test]
fn plan_all_covers_every_scenario() {
    let out = run(&lab(), &["otlab", "plan", "--all"]).unwrap();
    let headers: Vec<&str> = out.lines().filter(|l| l.starts_with("# ")).collect();
    assert_eq!(headers, vec!["# scenario1", "# scenario2", "# scenario3"]);
    assert!(out.contains("helm upgrade --install ddot-frontend-service ./charts/frontend-service"));
}

#[test]
fn plan_without_target_is_an_error() {
    assert!(run(&lab(), &["otlab", "plan"]).is_err());
}

#[test]
fn yaml_values_nest_keys() {
    let out = run(&lab(), &["otlab", "values", "scenario3", "--format", "yaml"]).unwrap();
    assert!(out.contains("global:"));
    assert!(out.contains("servicePrefix: ddot"));
}

#[test]
fn config_file_supplies_registry_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("registry.yaml"), SAMPLE_REGISTRY_YAML).unwrap();
    std::fs::write(
        dir.path().join("otlab.yaml"),
        "registry_file: registry.yaml\n\
         charts_dir: /srv/charts\n\
         readiness_timeout_secs: 90\n\
         default_overrides:\n  endpoint: http://collector.lab:4318\n",
    )
    .unwrap();

    let config = LabConfig::discover(dir.path())
        .unwrap()
        .with_repository_root(dir.path());
    assert_eq!(config.registry_file, Some(dir.path().join("registry.yaml")));

    let lab = Lab::load(config).unwrap();
    let listed = commands::list(&lab, OutputFormat::Text).unwrap();
    assert!(listed.lines().next().unwrap().starts_with("scenario2"));

    let resolved = commands::resolve(
        &lab,
        ScenarioId::Scenario1,
        &Overrides::none(),
        OutputFormat::Json,
    )
    .unwrap();
    let json: Value = serde_json::from_str(&resolved).unwrap();
    assert_eq!(json["namespace"], "lab-agent");
    assert_eq!(json["telemetry_endpoint"], "http://collector.lab:4318");

    let plan = commands::plan(&lab, &[ScenarioId::Scenario1], &Overrides::none(), OutputFormat::Text)
        .unwrap();
    assert!(plan.contains("/srv/charts/api-service"));
    assert!(plan.contains("--timeout=90s"));

    let err = commands::describe(&lab, ScenarioId::Scenario3, OutputFormat::Text).unwrap_err();
    assert!(err.to_string().contains("scenario3"));
}

#[test]
fn missing_registry_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = LabConfig::new()
        .with_registry_file(dir.path().join("absent.yaml"))
        .with_repository_root(dir.path());
    let err = Lab::load(config).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}
