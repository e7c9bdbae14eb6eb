//! Integration test: config load, feed normalization, artifacts, full pipeline run.

use jobrisk::{
    config::{ModelConfig, PathsConfig, PipelineConfig},
    ingest::{read_executions, write_executions, Status},
    pipeline::Pipeline,
    storage::{load_artifacts, save_artifacts},
    synthetic::{self, SyntheticConfig},
    Error, ErrorKind,
};
use std::path::Path;

fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn fast_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        paths: PathsConfig::under(root),
        model: ModelConfig {
            epochs: 10,
            ..ModelConfig::default()
        },
        ..PipelineConfig::default()
    }
}

#[test]
fn config_load_default() {
    let c = PipelineConfig::load(Path::new("nonexistent.json")).unwrap();
    assert_eq!(c.model.hidden_units, 32);
    assert_eq!(c.model.batch_size, 64);
    assert_eq!(c.model.seed, 42);
    assert_eq!(c.report.max_hotspots, 50);
    assert!(!c.preprocessing.binarize);
}

#[test]
fn config_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobrisk.json");
    write_file(&path, r#"{"model": {"epochs": 5}, "log": {"json": false}}"#);
    let c = PipelineConfig::load(&path).unwrap();
    assert_eq!(c.model.epochs, 5);
    assert_eq!(c.model.learning_rate, 0.01);
    assert!(!c.log.json);

    write_file(&path, "{not json");
    assert!(matches!(PipelineConfig::load(&path), Err(Error::Json(_))));
}

#[test]
fn feed_aliases_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.csv");
    write_file(
        &path,
        "\u{feff}Projeto;Job_Name;exec_id;Inicio;Status;duracao_s\n\
         infra;backup;e1;05/03/2024 02:15:00;succeeded;12,5\n\
         infra;backup;e2;2024-03-06T02:15:00;ERROR;-4\n\
         infra;backup;;2024-03-07 02:15;weird;abc\n",
    );
    let records = read_executions(&path).unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].project.as_deref(), Some("infra"));
    assert_eq!(records[0].job, "backup");
    assert_eq!(records[0].status, Status::Success);
    assert_eq!(records[0].duration_seconds, Some(12.5));
    assert_eq!(records[0].start_time_iso().as_deref(), Some("2024-03-05T02:15:00"));

    assert_eq!(records[1].status, Status::Failed);
    assert_eq!(records[1].duration_seconds, Some(0.0));

    assert_eq!(records[2].status, Status::Unknown);
    assert_eq!(records[2].duration_seconds, None);
    assert_eq!(records[2].exec_id.len(), 16);
    assert!(records[2].exec_id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn feed_derives_duration_from_end_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.csv");
    write_file(
        &path,
        "project,job,execution_id,start_time,end_time,status\n\
         bi,load,1,2024-01-01T10:00:00,2024-01-01T10:05:30,done\n",
    );
    let records = read_executions(&path).unwrap();
    assert_eq!(records[0].exec_id, "1");
    assert_eq!(records[0].duration_seconds, Some(330.0));
}

#[test]
fn feed_missing_required_column_is_schema_violation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.csv");
    write_file(&path, "project,job,exec_id,start_time,duration_sec\nx,y,1,2024-01-01,10\n");
    let err = read_executions(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    assert!(err.to_string().contains("status"));

    let err = read_executions(&dir.path().join("absent.csv")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingInput);

    write_file(&path, "project,job,exec_id,start_time,status,duration_sec\n");
    let err = read_executions(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
}

#[test]
fn synthetic_feed_roundtrips_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("execucoes.csv");
    let records = synthetic::generate(&SyntheticConfig {
        days: 3,
        ..SyntheticConfig::default()
    });
    assert_eq!(records.len(), 3 * 8 * 3);
    write_executions(&path, &records).unwrap();
    assert_eq!(read_executions(&path).unwrap(), records);
}

#[test]
fn artifacts_roundtrip_and_refuse_tampering() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    write_executions(
        &config.paths.executions,
        &synthetic::generate(&SyntheticConfig {
            days: 10,
            ..SyntheticConfig::default()
        }),
    )
    .unwrap();
    let pipeline = Pipeline::new(config.clone());
    pipeline.build_features().unwrap();
    let run = pipeline.train().unwrap();
    assert_eq!(run.rows, 10 * 8 * 3);
    let trained = run.trained;

    let loaded = load_artifacts(&config.paths).unwrap();
    assert_eq!(loaded, trained);

    let scaler_path = config.paths.scaler_path();
    let mut doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&scaler_path).unwrap()).unwrap();
    doc["schema_fingerprint"] = serde_json::json!("0000000000000000");
    std::fs::write(&scaler_path, doc.to_string()).unwrap();
    let err = load_artifacts(&config.paths).unwrap_err();
    assert!(matches!(err, Error::IncompatibleArtifact(_)));
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);

    save_artifacts(&config.paths, &trained).unwrap();
    let model_path = config.paths.model_path();
    let mut doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&model_path).unwrap()).unwrap();
    doc["format_version"] = serde_json::json!(99);
    std::fs::write(&model_path, doc.to_string()).unwrap();
    assert!(matches!(
        load_artifacts(&config.paths),
        Err(Error::IncompatibleArtifact(_))
    ));

    std::fs::remove_file(&model_path).unwrap();
    assert_eq!(
        load_artifacts(&config.paths).unwrap_err().kind(),
        ErrorKind::MissingInput
    );
}

#[test]
fn scoring_without_artifacts_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    write_executions(
        &config.paths.executions,
        &synthetic::generate(&SyntheticConfig {
            days: 2,
            ..SyntheticConfig::default()
        }),
    )
    .unwrap();
    let pipeline = Pipeline::new(config.clone());
    pipeline.build_features().unwrap();

    let err = pipeline.score().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingInput);
    assert!(!config.paths.scores.exists());
}

#[test]
fn full_pipeline_on_ninety_days() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let records = synthetic::generate(&SyntheticConfig::default());
    assert_eq!(records.len(), 8 * 90 * 3);
    write_executions(&config.paths.executions, &records).unwrap();

    let report = Pipeline::new(config.clone()).run().unwrap();

    assert_eq!(report.summary.total_count, records.len());
    let p95 = report.summary.global_p95_re.unwrap();
    assert!(p95.is_finite() && p95 >= 0.0);
    assert_eq!(report.per_job_risk.len(), 8);
    assert!(report
        .per_job_risk
        .windows(2)
        .all(|w| w[0].re_p95 >= w[1].re_p95));
    assert_eq!(report.hotspots.len(), 50);
    assert_eq!(report.sampled_hotspots, report.hotspots);

    for path in [
        &config.paths.features,
        &config.paths.scaler_path(),
        &config.paths.model_path(),
        &config.paths.scores,
        &config.paths.report,
    ] {
        assert!(path.exists(), "{} missing", path.display());
    }
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.paths.report).unwrap()).unwrap();
    assert_eq!(doc["resumo"]["total_execucoes"], 2160);
    assert!(doc["resumo"]["re_p95_global"].as_f64().unwrap() >= 0.0);
    assert!(doc["risco_p95_por_job"].as_array().unwrap().len() <= 200);
    assert!(doc["top_amostras"].as_array().unwrap().len() <= 50);
}
