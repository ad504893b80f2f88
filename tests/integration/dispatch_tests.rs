//! Request resolution and capability dispatch

#[cfg(test)]
mod tests {
    use crate::common::{TestWorkspace, mount_search, read_csv};
    use serde_json::json;
    use shipment_updater::cli::{RunStatus, run};
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_stdin_request_runs_batch() {
        let server = MockServer::start().await;
        mount_search(&server, "PO1", r#"{"shipments":[]}"#).await;

        let ws = TestWorkspace::new();
        let input = ws.write_input(&["1,PO1,20240115,093000,A"]);
        let config = ws.write_config(&server);

        let request = json!({
            "capability": "la_shipment_update",
            "args": {
                "csv_path": input,
                "type_operation": "update",
                "output_path": ws.output_dir(),
                "config_path": config
            }
        });

        let report = run(vec![], Some(request.to_string()), &ws.resolver()).await;

        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(report.capability.as_deref(), Some("la_shipment_update"));
        assert_eq!(read_csv(&ws.output_file()).len(), 2);
    }

    #[tokio::test]
    async fn test_flags_run_batch() {
        let ws = TestWorkspace::new();
        let input = ws.write_input(&[]);
        let argv = vec![
            "-source".to_string(),
            input.display().to_string(),
            "-type".to_string(),
            "create".to_string(),
            "-output".to_string(),
            ws.output_dir().display().to_string(),
        ];

        let report = run(argv, None, &ws.resolver()).await;

        assert!(report.is_success());
        assert!(ws.output_file().exists());
    }

    #[tokio::test]
    async fn test_unknown_capability_rejected() {
        let ws = TestWorkspace::new();
        let report = run(
            vec![],
            Some(r#"{"capability":"la_shipment_delete","args":{}}"#.to_string()),
            &ws.resolver(),
        )
        .await;

        assert_eq!(report.status, RunStatus::Error);
        assert_eq!(report.capability.as_deref(), Some("la_shipment_delete"));
        assert_eq!(
            report.error.as_deref(),
            Some("Unknown capability: la_shipment_delete")
        );
    }

    #[tokio::test]
    async fn test_missing_capability_is_null() {
        let ws = TestWorkspace::new();
        let report = run(vec![], Some(r#"{"args":{}}"#.to_string()), &ws.resolver()).await;

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "error");
        assert!(value["capability"].is_null());
    }
}
