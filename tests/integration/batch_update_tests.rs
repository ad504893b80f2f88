//! Batch runs against a mocked shipment API
//!
//! Each test drives `process_shipment_update` end to end: config file,
//! input CSV, search and update calls, output file and status report.

#[cfg(test)]
mod tests {
    use crate::common::{TestWorkspace, mount_search, mount_update, read_csv};
    use shipment_updater::cli::{RequestArgs, RunStatus, process_shipment_update};
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UPDATE_JSON: &str = r#"{"dates": {"delivery_appointment_date": "2024-01-15", "delivery_time_from": "09:30:00", "delivery_appointment": "APT123"}}"#;

    fn request_args(ws: &TestWorkspace, input: &std::path::Path, config: Option<String>) -> RequestArgs {
        RequestArgs {
            csv_path: Some(input.display().to_string()),
            type_operation: Some("update".to_string()),
            output_path: Some(ws.output_dir().display().to_string()),
            config_path: config,
        }
    }

    #[tokio::test]
    async fn test_found_shipment_is_updated() {
        let server = MockServer::start().await;
        mount_search(&server, "po", r#"{"shipments":[{"shipment_id":"SHIP1"}]}"#).await;
        Mock::given(method("PATCH"))
            .and(path("/api/SHIP1"))
            .and(header("x-api-key", "test-api-key"))
            .and(body_string(UPDATE_JSON))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let ws = TestWorkspace::new();
        let input = ws.write_input(&["id,po,20240115,093000,APT123"]);
        let config = ws.write_config(&server);

        let report = process_shipment_update(
            &request_args(&ws, &input, Some(config.display().to_string())),
            &ws.resolver(),
        )
        .await;

        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(report.message.as_deref(), Some("Processed 1 records"));
        assert_eq!(
            report.output_file.as_deref(),
            Some(ws.output_file().display().to_string().as_str())
        );

        let rows = read_csv(&ws.output_file());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                "po",
                "Shipment Number",
                "Notification Reason",
                "API Response",
                "Request Json",
                "Response Json"
            ]
        );
        assert_eq!(
            rows[1],
            vec!["po", "SHIP1", "", "", UPDATE_JSON, r#"{"ok":true}"#]
        );
    }

    #[tokio::test]
    async fn test_not_found_skips_update() {
        let server = MockServer::start().await;
        mount_search(&server, "PO404", r#"{"shipments":[]}"#).await;
        mount_update(&server, "SHIP1", "{}", 0).await;

        let ws = TestWorkspace::new();
        let input = ws.write_input(&["7,PO404,20240115,093000,APT1"]);
        let config = ws.write_config(&server);

        let report = process_shipment_update(
            &request_args(&ws, &input, Some(config.display().to_string())),
            &ws.resolver(),
        )
        .await;

        assert!(report.is_success());
        let rows = read_csv(&ws.output_file());
        assert_eq!(
            rows[1],
            vec![
                "PO404",
                "",
                "",
                "",
                r#"{"purchase_order": "PO404"}"#,
                r#"{"shipments":[]}"#
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_rows_excluded_and_order_kept() {
        let server = MockServer::start().await;
        mount_search(&server, "B", r#"{"shipments":[{"shipment_id":"SB"}]}"#).await;
        mount_search(&server, "A", r#"{"shipments":[{"id":"no-shipment-id"}]}"#).await;
        mount_update(&server, "SB", r#"{"ok":true}"#, 1).await;

        let ws = TestWorkspace::new();
        let input = ws.write_input(&[
            "1,B,20240115,093000,APT1",
            "2,short",
            "3,   ,20240115,093000,APT3",
            "4,A,20240115,093000,APT4",
        ]);
        let config = ws.write_config(&server);

        let report = process_shipment_update(
            &request_args(&ws, &input, Some(config.display().to_string())),
            &ws.resolver(),
        )
        .await;

        assert_eq!(report.message.as_deref(), Some("Processed 2 records"));
        let rows = read_csv(&ws.output_file());
        let pos: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(pos, vec!["B", "A"]);
        assert_eq!(rows[1][1], "SB");
        assert_eq!(rows[2][1], "");
    }

    #[tokio::test]
    async fn test_api_error_status_recorded_in_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
            .mount(&server)
            .await;

        let ws = TestWorkspace::new();
        let input = ws.write_input(&["1,PO1,20240115,093000,APT1"]);
        let config = ws.write_config(&server);

        let report = process_shipment_update(
            &request_args(&ws, &input, Some(config.display().to_string())),
            &ws.resolver(),
        )
        .await;

        assert!(report.is_success());
        let rows = read_csv(&ws.output_file());
        assert_eq!(rows[1][1], "");
        assert_eq!(rows[1][5], "upstream failure");
    }

    #[tokio::test]
    async fn test_missing_source_writes_nothing() {
        let ws = TestWorkspace::new();
        let missing = ws.path().join("missing.csv");

        let report = process_shipment_update(&request_args(&ws, &missing, None), &ws.resolver()).await;

        assert_eq!(report.status, RunStatus::Error);
        assert_eq!(
            report.error,
            Some(format!("CSV file not found: {}", missing.display()))
        );
        assert!(report.output_file.is_none());
        assert!(!ws.output_file().exists());
    }

    #[tokio::test]
    async fn test_header_only_input_writes_header() {
        let ws = TestWorkspace::new();
        let input = ws.write_input(&[]);

        let report = process_shipment_update(&request_args(&ws, &input, None), &ws.resolver()).await;

        assert!(report.is_success());
        assert_eq!(report.message.as_deref(), Some("No data rows found in CSV"));
        let rows = read_csv(&ws.output_file());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "po");
    }

    #[tokio::test]
    async fn test_output_write_failure_keeps_success() {
        let ws = TestWorkspace::new();
        let input = ws.write_input(&["1,PO1"]);
        let blocker = ws.write_file("blocker", "not a directory");

        let args = RequestArgs {
            output_path: Some(blocker.display().to_string()),
            ..request_args(&ws, &input, None)
        };
        let report = process_shipment_update(&args, &ws.resolver()).await;

        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(report.message.as_deref(), Some("Processed 0 records"));
        assert_eq!(
            report.output_file,
            Some(blocker.join("output.csv").display().to_string())
        );
        assert!(!blocker.join("output.csv").exists());
        assert!(blocker.is_file());
    }

    #[tokio::test]
    async fn test_all_rows_invalid_still_writes_header() {
        let ws = TestWorkspace::new();
        let input = ws.write_input(&["1,PO1", "2,,20240115,093000,A"]);

        let report = process_shipment_update(&request_args(&ws, &input, None), &ws.resolver()).await;

        assert_eq!(report.message.as_deref(), Some("Processed 0 records"));
        assert_eq!(read_csv(&ws.output_file()).len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_run_fails_per_row() {
        let ws = TestWorkspace::new();
        let input = ws.write_input(&["1,PO1,20240115,093000,A", "2,PO2,20240115,093000,B"]);

        let report = process_shipment_update(&request_args(&ws, &input, None), &ws.resolver()).await;

        assert!(report.is_success());
        let rows = read_csv(&ws.output_file());
        assert_eq!(rows.len(), 3);
        for row in &rows[1..] {
            assert_eq!(row[1], "");
            assert!(row[5].starts_with("Invalid URL"));
        }
    }

    #[tokio::test]
    async fn test_fallback_config_used_without_explicit_path() {
        let server = MockServer::start().await;
        mount_search(&server, "PO1", r#"{"shipments":[{"shipment_id":"S1"}]}"#).await;
        mount_update(&server, "S1", r#"{"ok":true}"#, 1).await;

        let ws = TestWorkspace::new();
        let config = std::fs::read_to_string(ws.write_config(&server)).unwrap();
        ws.write_file("la-aws-data.bin", &format!("{}\n", config));
        let input = ws.write_input(&["1,PO1,20240115,093000,A"]);

        let report = process_shipment_update(&request_args(&ws, &input, None), &ws.resolver()).await;

        assert!(report.is_success());
        assert_eq!(read_csv(&ws.output_file())[1][1], "S1");
    }
}
