use embassy_watch::domain::model::{EmbassyRecord, FailureCause, SiteState};
use embassy_watch::{EmbassyPipeline, EtlEngine, HttpTransport, LocalStorage, TomlConfig};
use httpmock::prelude::*;
use tempfile::TempDir;

fn config_for(server: &MockServer, output_path: &str) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.sources.base_url = Some(server.url("/data/"));
    config.sources.directory = "embassies.json".to_string();
    config.fetch.max_attempts = 2;
    config.fetch.backoff_base_ms = 0;
    config.fetch.timeout_seconds = 2;
    config.fetch.relays = vec![server.url("/relay?url=")];
    config.output.path = output_path.to_string();
    config
}

#[tokio::test]
async fn test_end_to_end_embassy_map_with_real_http() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let directory = serde_json::json!([
        {
            "Nom": "Ambassade de France (Allemagne)",
            "Site internet": server.url("/sites/de"),
            "Latitude": 52.5163,
            "Longitude": 13.3777
        },
        {
            "Nom": "Ambassade de France en Inde",
            "Site internet": server.url("/sites/in"),
            "Latitude": "28,6",
            "Longitude": "77,2"
        }
    ]);

    let directory_mock = server.mock(|when, then| {
        when.method(GET).path("/data/embassies.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(directory);
    });
    let scores_mock = server.mock(|when, then| {
        when.method(GET).path("/data/cyber_scores.json");
        then.status(200)
            .json_body(serde_json::json!({"Germany": 98.52, "India": 98.49}));
    });
    let rss_mock = server.mock(|when, then| {
        when.method(GET).path("/data/rss_feeds.json");
        then.status(200).json_body(serde_json::json!({
            "Germany": {
                "title": "BSI warnt vor Phishing",
                "pubDate": "Tue, 08 Oct 2024 10:00:00 +0000",
                "link": "https://bsi.example/news",
                "description": "..."
            },
            "India": { "error": true }
        }));
    });
    let online_site = server.mock(|when, then| {
        when.method(GET).path("/sites/de");
        then.status(200).body("<html>Botschaft</html>");
    });
    let offline_site = server.mock(|when, then| {
        when.method(GET).path("/sites/in");
        then.status(500);
    });
    let relay = server.mock(|when, then| {
        when.method(GET).path("/relay");
        then.status(502);
    });

    let config = config_for(&server, &output_path);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline =
        EmbassyPipeline::new(storage, &config, config.http_transport().unwrap()).unwrap();

    let result = EtlEngine::new(pipeline).run().await.unwrap();
    assert_eq!(result, format!("{}/index.html", output_path));

    directory_mock.assert();
    scores_mock.assert();
    rss_mock.assert();
    online_site.assert();
    // 兩次嘗試都失敗，每次都經過中繼
    offline_site.assert_hits(2);
    relay.assert_hits(2);

    let html = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    assert!(html.contains("Ambassade de France (Allemagne)"));
    assert!(html.contains("BSI warnt vor Phishing"));
    assert!(html.contains("Publié le : 08/10/2024"));
    assert!(html.contains("98,52"));
    assert!(html.contains(r#"data-country="India""#));
    assert!(html.contains("/marker-icon-red.png"));

    let json = std::fs::read(temp_dir.path().join("embassies.json")).unwrap();
    let records: Vec<EmbassyRecord> = serde_json::from_slice(&json).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].website_status.status, SiteState::Online);
    assert_eq!(records[0].website_status.code, 200);
    assert_eq!(records[1].website_status.status, SiteState::Offline);
    assert_eq!(records[1].website_status.code, 404);
    assert_eq!(
        records[1].website_status.cause,
        Some(FailureCause::HttpStatus(502))
    );
    assert!(records[1].website_status.error.is_some());
    assert_eq!(records[1].latitude, 28.6);
}

#[tokio::test]
async fn test_unreachable_directory_produces_empty_map() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let directory_mock = server.mock(|when, then| {
        when.method(GET).path("/data/embassies.json");
        then.status(503);
    });
    server.mock(|when, then| {
        when.method(GET).path("/relay");
        then.status(502);
    });

    let config = config_for(&server, &output_path);
    let pipeline = EmbassyPipeline::new(
        LocalStorage::new(output_path.clone()),
        &config,
        config.http_transport().unwrap(),
    )
    .unwrap();

    let result = EtlEngine::new(pipeline).run().await;
    assert!(result.is_ok());
    directory_mock.assert_hits(2);

    let html = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    assert!(html.contains("Aucune ambassade à afficher."));
    let json = std::fs::read_to_string(temp_dir.path().join("embassies.json")).unwrap();
    assert_eq!(json.trim(), "[]");
}

#[tokio::test]
async fn test_local_data_files_with_remote_sites() {
    let data_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let site = server.mock(|when, then| {
        when.method(GET).path("/jp");
        then.status(200).body("ok");
    });

    let directory = serde_json::json!([{
        "Nom": "Ambassade de France (Japon)",
        "Site internet": server.url("/jp"),
        "Latitude": 35.652,
        "Longitude": 139.727
    }]);
    std::fs::write(data_dir.path().join("embassies.json"), directory.to_string()).unwrap();
    std::fs::write(data_dir.path().join("cyber_scores.json"), r#"{"Japan": 97.82}"#).unwrap();
    // 非物件格式：RSS 被忽略，但其他資料照常顯示
    std::fs::write(data_dir.path().join("rss_feeds.json"), "[]").unwrap();

    let mut config = TomlConfig::default();
    config.sources.directory = data_dir.path().join("embassies.json").display().to_string();
    config.sources.cyber_scores = data_dir.path().join("cyber_scores.json").display().to_string();
    config.sources.rss_feeds = data_dir.path().join("rss_feeds.json").display().to_string();
    config.fetch.relays.clear();
    config.output.path = output_path.clone();

    let pipeline = EmbassyPipeline::new(
        LocalStorage::new(output_path),
        &config,
        HttpTransport::with_defaults().unwrap(),
    )
    .unwrap();

    EtlEngine::new(pipeline).run().await.unwrap();
    site.assert();

    let html = std::fs::read_to_string(output_dir.path().join("index.html")).unwrap();
    assert!(html.contains("Ambassade de France (Japon)"));
    assert!(html.contains("97,82"));
    assert!(html.contains("/marker-icon-green.png"));
    assert!(html.contains("Aucune actualité disponible"));
}
