//! Test fixtures and mock API helpers

use serde_json::json;
use shipment_updater::config::ConfigResolver;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Header line used by every input fixture
pub const INPUT_HEADER: &str = "id,po,delApptDate,delApptTime,delApptNo";

/// Temporary directory holding input, config and output for one test
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an input CSV with the standard header followed by `rows`
    pub fn write_input(&self, rows: &[&str]) -> PathBuf {
        let mut contents = String::from(INPUT_HEADER);
        contents.push('\n');
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        self.write_file("input.csv", &contents)
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    /// Write a config document pointing at `server`
    pub fn write_config(&self, server: &MockServer) -> PathBuf {
        let config = json!({
            "region": "us-east-1",
            "service": "execute-api",
            "baseUrl": format!("{}/api/", server.uri()),
            "apiKey": "test-api-key",
            "accessKey": "AKIATEST",
            "secretKey": "testsecret"
        });
        self.write_file("config.json", &config.to_string())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn output_file(&self) -> PathBuf {
        self.output_dir().join("output.csv")
    }

    /// Resolver whose fallback file lives (and is absent) inside the workspace
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new().with_fallback_path(self.dir.path().join("la-aws-data.bin"))
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Read every record of a CSV file, header included
pub fn read_csv(path: &Path) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .expect("failed to open csv")
        .records()
        .map(|r| r.expect("bad csv record").iter().map(str::to_string).collect())
        .collect()
}

/// Answer the search for `po` with `body`
pub async fn mount_search(server: &MockServer, po: &str, body: &str) {
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(json!({ "purchase_order": po })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Answer the update of `shipment_id` with `body`, expecting `times` calls
pub async fn mount_update(server: &MockServer, shipment_id: &str, body: &str, times: u64) {
    Mock::given(method("PATCH"))
        .and(path(format!("/api/{}", shipment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}
