use ar_trace_studio::commands::{execute_analyze, validate_report_file, AnalyzeArgs};
use ar_trace_studio::correlate::CorrelationKind;
use ar_trace_studio::output::read_report;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn sample_payload() -> serde_json::Value {
    json!({
        "entries": [
            {
                "id": "api-1",
                "timestamp": "2024-03-01T10:00:00Z",
                "type": "API",
                "duration": 200,
                "thread_id": "T1",
                "trace_id": "trace-1",
                "user": "Demo",
                "queue": "Fast"
            },
            {
                "entry_id": "fltr-1",
                "timestamp": "2024-03-01T10:00:00.010Z",
                "log_type": "FLTR",
                "duration_ms": 190,
                "thread_id": "T1",
                "trace_id": "trace-1",
                "filter_level": 1
            },
            {
                "entry_id": "sql-1",
                "timestamp": "2024-03-01T10:00:00.020Z",
                "log_type": "SQL",
                "duration_ms": 180,
                "thread_id": "T1",
                "trace_id": "trace-1",
                "error_message": "ARWARN 9296"
            },
            {
                "entry_id": "other-trace",
                "timestamp": "2024-03-01T10:00:01Z",
                "log_type": "API",
                "duration_ms": 5,
                "thread_id": "T9",
                "trace_id": "trace-2"
            },
            { "broken": true }
        ]
    })
}

#[test]
fn test_analyze_file_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("entries.json");
    let output = dir.path().join("report.json");
    fs::write(&input, sample_payload().to_string()).unwrap();

    let args = AnalyzeArgs {
        input: Some(input),
        trace: Some("trace-1".to_string()),
        output_json: output.clone(),
        ..Default::default()
    };

    let analysis = execute_analyze(&args).unwrap();
    assert_eq!(analysis.correlation, CorrelationKind::TraceId);
    assert_eq!(analysis.critical_path, vec!["api-1", "fltr-1", "sql-1"]);

    let report = read_report(&output).unwrap();
    assert_eq!(report.summary.span_count, 3);
    assert_eq!(report.summary.root_count, 1);
    assert_eq!(report.summary.total_duration_ms, 200);
    assert_eq!(report.summary.error_count, 1);
    assert_eq!(report.summary.primary_user.as_deref(), Some("Demo"));
    assert_eq!(report.spans[2].parent_id.as_deref(), Some("fltr-1"));
    assert_eq!(report.spans[2].contribution_pct, 90.0);

    assert!(validate_report_file(output).is_ok());
}

#[test]
fn test_analyze_with_toml_config() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("entries.json");
    let config = dir.path().join("analysis.toml");
    let output = dir.path().join("report.json");
    fs::write(&input, sample_payload().to_string()).unwrap();
    fs::write(
        &config,
        "summary_rows = 5\n\n[correlation]\nprecedence = [\"thread_id\"]\n",
    )
    .unwrap();

    let args = AnalyzeArgs {
        input: Some(input),
        trace: Some("T9".to_string()),
        output_json: output,
        config_path: Some(config),
        ..Default::default()
    };

    let analysis = execute_analyze(&args).unwrap();
    assert_eq!(analysis.correlation, CorrelationKind::ThreadId);
    assert_eq!(analysis.critical_path, vec!["other-trace"]);
}

#[test]
fn test_analyze_unknown_trace_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("entries.json");
    fs::write(&input, sample_payload().to_string()).unwrap();

    let args = AnalyzeArgs {
        input: Some(input),
        trace: Some("missing".to_string()),
        output_json: dir.path().join("report.json"),
        ..Default::default()
    };

    assert!(execute_analyze(&args).is_err());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn test_analyze_missing_input_fails() {
    let dir = tempdir().unwrap();

    let args = AnalyzeArgs {
        input: Some(dir.path().join("nope.json")),
        output_json: dir.path().join("report.json"),
        ..Default::default()
    };

    assert!(execute_analyze(&args).is_err());
}

#[test]
fn test_validate_rejects_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(validate_report_file(path).is_err());
}
