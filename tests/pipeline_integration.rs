// file: tests/pipeline_integration.rs
// description: end-to-end runs against shell scripts standing in for tap, selector and target
// reference: exercises real subprocesses and file handoff

#![cfg(unix)]

use pretty_assertions::assert_eq;
use singer_pipeline::{
    ArtifactKind, Config, PipelineError, PipelineOrchestrator, Step, Target,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATALOG: &str = r#"{"streams": [{"tap_stream_id": "taxes", "schema": {"type": "object"}, "metadata": [{"breadcrumb": [], "metadata": {"selected": false}}]}, {"tap_stream_id": "suppliers", "schema": {"type": "object"}, "metadata": []}]}"#;

const SELECTED: &str = r#"{"streams": [{"tap_stream_id": "taxes", "schema": {"type": "object"}, "metadata": [{"breadcrumb": [], "metadata": {"selected": true}}]}]}"#;

const RECORDS: &str = r#"printf '%s\n' '{"type": "SCHEMA", "stream": "taxes", "schema": {}, "key_properties": ["id"]}'
printf '%s\n' '{"type": "RECORD", "stream": "taxes", "record": {"id": 1, "name": "VAT"}}'
printf '%s\n' '{"type": "RECORD", "stream": "taxes", "record": {"id": 2, "name": "GST"}}'
printf '%s\n' '{"type": "STATE", "value": {"bookmarks": {}}}'"#;

const TAP: &str = r#"echo "tap $*" >> '@LOG@'
while [ $# -gt 0 ]; do
  case "$1" in
    --config) shift; [ -f "$1" ] || exit 3 ;;
    --discover) printf '%s\n' '@CATALOG@'; exit 0 ;;
    --catalog)
      shift
      grep -q '"selected": *true' "$1" || exit 4
      @RUN@
      exit 0 ;;
  esac
  shift
done
exit 64
"#;

const SELECTOR: &str = r#"echo "select $*" >> '@LOG@'
while [ $# -gt 0 ]; do
  case "$1" in
    --input) shift; input="$1" ;;
    --output) shift; output="$1" ;;
  esac
  shift
done
grep -q tap_stream_id "$input" || exit 5
printf '%s\n' '@SELECTED@' > "$output"
"#;

const TARGET: &str = r#"echo "transfer $*" >> '@LOG@'
cat > '@DIR@/received.jsonl'
"#;

/// Temp workspace with script tools run through `sh`, so nothing freshly
/// written is exec'd directly.
struct Harness {
    dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self::with_run_body(RECORDS)
    }

    fn with_run_body(run_body: &str) -> Self {
        let harness = Self {
            dir: TempDir::new().unwrap(),
        };

        harness.write_tool("tap.sh", &TAP.replace("@CATALOG@", CATALOG).replace("@RUN@", run_body));
        harness.write_tool("selector.sh", &SELECTOR.replace("@SELECTED@", SELECTED));
        harness.write_tool("target.sh", TARGET);
        fs::write(
            harness.path().join("config.json"),
            r#"{"auth_token": "token", "email": "ops@example.com"}"#,
        )
        .unwrap();

        harness
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_tool(&self, name: &str, body: &str) {
        let script = body
            .replace("@LOG@", &self.log_path().to_string_lossy())
            .replace("@DIR@", &self.path().to_string_lossy());
        fs::write(self.path().join(name), script).unwrap();
    }

    fn log_path(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    fn config(&self) -> Config {
        let script = |name: &str| vec![self.path().join(name).to_string_lossy().into_owned()];

        let mut config = Config::default_config();
        config.tools.tap = "sh".to_string();
        config.tools.tap_args = script("tap.sh");
        config.tools.selector = "sh".to_string();
        config.tools.selector_args = script("selector.sh");
        config.tools.target = "sh".to_string();
        config.tools.target_args = script("target.sh");
        config.artifacts.working_dir = self.path().to_path_buf();
        config.pipeline.show_progress = false;
        config
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn call_names(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|line| line.split_whitespace().next().unwrap_or("").to_string())
            .collect()
    }
}

#[tokio::test]
async fn test_all_runs_each_step_once_in_order() {
    let harness = Harness::new();
    let orchestrator = PipelineOrchestrator::new(harness.config());

    let stats = orchestrator.run_target(Target::All).await.unwrap();

    assert_eq!(harness.call_names(), vec!["tap", "select", "tap", "transfer"]);
    let calls = harness.calls();
    assert!(calls[0].ends_with("--discover"));
    assert!(calls[2].contains("--catalog"));
    assert_eq!(stats.steps_completed, 4);
    assert_eq!(stats.records_extracted, 2);

    let artifacts = orchestrator.artifacts();
    assert_eq!(fs::read_to_string(&artifacts.catalog).unwrap().trim(), CATALOG);
    assert_eq!(
        fs::read_to_string(&artifacts.selected_catalog).unwrap().trim(),
        SELECTED
    );
    assert_eq!(
        fs::read_to_string(harness.path().join("received.jsonl")).unwrap(),
        fs::read_to_string(&artifacts.data).unwrap()
    );
}

#[tokio::test]
async fn test_individual_steps_chain_through_files() {
    let harness = Harness::new();
    let orchestrator = PipelineOrchestrator::new(harness.config());

    let report = orchestrator.run_step(Step::Discover).await.unwrap();
    let catalog = report.output.unwrap().catalog.unwrap();
    assert_eq!(catalog.stream_count(), 2);
    assert_eq!(catalog.selected_count(), 0);

    let report = orchestrator.run_step(Step::Select).await.unwrap();
    let selected = report.output.unwrap().catalog.unwrap();
    assert_eq!(selected.selected_ids(), vec!["taxes"]);

    let report = orchestrator.run_step(Step::Run).await.unwrap();
    let messages = report.output.unwrap().messages.unwrap();
    assert_eq!(messages.record_messages, 2);
    assert_eq!(messages.state_messages, 1);

    orchestrator.run_step(Step::Transfer).await.unwrap();
    assert!(harness.path().join("received.jsonl").exists());
}

#[tokio::test]
async fn test_failing_tap_halts_before_transfer() {
    let harness = Harness::with_run_body(
        r#"printf '%s\n' '{"type": "STATE", "value": {}}'
      exit 2"#,
    );
    let orchestrator = PipelineOrchestrator::new(harness.config());

    let err = orchestrator.run_target(Target::All).await.unwrap_err();

    match err {
        PipelineError::StepFailed { step, status, .. } => {
            assert_eq!(step, Step::Run);
            assert_eq!(status, "exit code 2");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(harness.call_names(), vec!["tap", "select", "tap"]);
    assert!(!orchestrator.artifacts().data.exists());
    assert!(!harness.path().join("received.jsonl").exists());
}

#[tokio::test]
async fn test_missing_tool_fails_immediately() {
    let harness = Harness::new();
    let mut config = harness.config();
    config.tools.target = "target-csv-not-installed".to_string();
    config.tools.target_args.clear();
    let orchestrator = PipelineOrchestrator::new(config);

    let err = orchestrator.run_target(Target::All).await.unwrap_err();

    assert!(matches!(err, PipelineError::ToolNotFound { .. }));
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_missing_tool_without_preflight_discards_output() {
    let harness = Harness::new();
    let mut config = harness.config();
    config.tools.tap = "tap-not-installed".to_string();
    config.tools.tap_args.clear();
    config.pipeline.preflight = false;
    let orchestrator = PipelineOrchestrator::new(config);

    let err = orchestrator.run_target(Target::All).await.unwrap_err();

    assert!(matches!(err, PipelineError::ToolNotFound { .. }));
    assert!(!orchestrator.artifacts().catalog.exists());
}

#[tokio::test]
async fn test_run_without_selected_catalog_is_refused() {
    let harness = Harness::new();
    let orchestrator = PipelineOrchestrator::new(harness.config());

    let err = orchestrator.run_target(Target::Run).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MissingArtifact {
            kind: ArtifactKind::SelectedCatalog,
            ..
        }
    ));
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_clean_leaves_other_files_untouched() {
    let harness = Harness::new();
    let orchestrator = PipelineOrchestrator::new(harness.config());
    orchestrator.run_target(Target::All).await.unwrap();

    let stats = orchestrator.run_target(Target::Clean).await.unwrap();

    assert_eq!(stats.artifacts_removed, 3);
    let mut left: Vec<String> = fs::read_dir(harness.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(
        left,
        vec![
            "calls.log",
            "config.json",
            "received.jsonl",
            "selector.sh",
            "tap.sh",
            "target.sh"
        ]
    );

    let again = orchestrator.run_target(Target::Clean).await.unwrap();
    assert_eq!(again.artifacts_removed, 0);
}

#[tokio::test]
async fn test_select_fails_when_selector_writes_nothing() {
    let harness = Harness::new();
    harness.write_tool("selector.sh", "echo \"select $*\" >> '@LOG@'\nexit 0\n");
    let orchestrator = PipelineOrchestrator::new(harness.config());
    fs::write(&orchestrator.artifacts().catalog, CATALOG).unwrap();
    fs::write(
        &orchestrator.artifacts().selected_catalog,
        SELECTED.replace("taxes", "old"),
    )
    .unwrap();

    let err = orchestrator.run_step(Step::Select).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MissingArtifact {
            kind: ArtifactKind::SelectedCatalog,
            ..
        }
    ));
    assert_eq!(harness.call_names(), vec!["select"]);
    assert!(!orchestrator.artifacts().selected_catalog.exists());
}
