use chrono::{DateTime, Utc};
use std::fs;
use tempfile::TempDir;
use tracing::info;
use xrate::core::config::AppConfig;
use xrate::core::resolver::RateOrigin;
use xrate::{AppCommand, build_resolver, run_command};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Pair endpoint for `from`/`to` under the `test-key` API key.
    pub async fn create_pair_mock_server(
        from: &str,
        to: &str,
        status: u16,
        mock_response: &str,
        expected_calls: u64,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/test-key/pair/{from}/{to}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn config_yaml(fiat_base_url: &str, data_path: &str, offline_rates: &str) -> String {
        format!(
            r#"
        base_currency: "USD"
        data_path: "{data_path}"
        providers:
          exchange_rate:
            base_url: "{fiat_base_url}"
            api_key: "test-key"
            timeout_secs: 2
          coingecko:
            enabled: false
          offline:
            reference_table: false
            rates: {offline_rates}
        holdings:
          - currency: "EUR"
            amount: 100.0
            purchase_rate: 1.1
        fee_schedules:
          - country_code: "DEU"
            country_name: "Germany"
            currency_code: "EUR"
            exchange_tax_rate: 0.0
            service_fee_rate: 2.0
            minimum_fee: 3.0
            maximum_fee: 50.0
    "#
        )
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn load_config(dir: &TempDir, yaml: &str) -> AppConfig {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, yaml).expect("Failed to write config file");
    AppConfig::load_from_path(&config_path).expect("Failed to load config")
}

#[test_log::test(tokio::test)]
async fn test_offline_fallback_is_recorded_then_served_from_cache() {
    // The live provider is down and must only be asked once.
    let mock_server = test_utils::create_pair_mock_server("USD", "EUR", 500, "", 1).await;
    let data_dir = TempDir::new().unwrap();
    let yaml = test_utils::config_yaml(
        &mock_server.uri(),
        data_dir.path().join("data").to_str().unwrap(),
        r#"[{ from: "USD", to: "EUR", rate: 0.92 }]"#,
    );
    let config = load_config(&data_dir, &yaml);
    let resolver = build_resolver(&config).unwrap();

    let first = resolver.resolve("USD", "EUR").await;
    assert_eq!(first.rate, 0.92);
    assert_eq!(first.origin, RateOrigin::OfflineForward);

    let second = resolver.resolve("USD", "EUR").await;
    assert_eq!(second.rate, 0.92);
    assert_eq!(second.origin, RateOrigin::Cache);

    let samples = resolver
        .store()
        .samples_since("USD", "EUR", epoch())
        .await
        .unwrap();
    info!(?samples, "Recorded samples");
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].rate, 0.92);
}

#[test_log::test(tokio::test)]
async fn test_inverted_offline_rate_is_recorded() {
    let mock_server = test_utils::create_pair_mock_server("EUR", "USD", 503, "", 1).await;
    let data_dir = TempDir::new().unwrap();
    let yaml = test_utils::config_yaml(
        &mock_server.uri(),
        data_dir.path().join("data").to_str().unwrap(),
        r#"[{ from: "USD", to: "EUR", rate: 0.8 }]"#,
    );
    let config = load_config(&data_dir, &yaml);
    let resolver = build_resolver(&config).unwrap();

    let resolution = resolver.resolve("EUR", "USD").await;
    assert_eq!(resolution.rate, 1.25);
    assert_eq!(resolution.origin, RateOrigin::OfflineInverse);

    let latest = resolver
        .store()
        .latest_ever("EUR", "USD")
        .await
        .unwrap()
        .expect("inverted rate should be recorded");
    assert_eq!(latest.rate, 1.25);
}

#[test_log::test(tokio::test)]
async fn test_live_rate_survives_restart() {
    let mock_response = r#"{"result": "success", "conversion_rate": 0.79}"#;
    let mock_server = test_utils::create_pair_mock_server("USD", "GBP", 200, mock_response, 1).await;
    let data_dir = TempDir::new().unwrap();
    let yaml = test_utils::config_yaml(
        &mock_server.uri(),
        data_dir.path().join("data").to_str().unwrap(),
        "[]",
    );
    let config = load_config(&data_dir, &yaml);

    {
        let resolver = build_resolver(&config).unwrap();
        assert_eq!(resolver.resolve_rate("USD", "GBP").await, 0.79);
    }

    let resolver = build_resolver(&config).unwrap();
    let resolution = resolver.resolve("USD", "GBP").await;
    assert_eq!(resolution.rate, 0.79);
    assert_eq!(resolution.origin, RateOrigin::Cache);
}

#[test_log::test(tokio::test)]
async fn test_unknown_pair_falls_back_to_unit_rate() {
    let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
    let mock_server = test_utils::create_pair_mock_server("USD", "XAF", 200, mock_response, 1).await;
    let data_dir = TempDir::new().unwrap();
    let yaml = test_utils::config_yaml(
        &mock_server.uri(),
        data_dir.path().join("data").to_str().unwrap(),
        "[]",
    );
    let config = load_config(&data_dir, &yaml);
    let resolver = build_resolver(&config).unwrap();

    let resolution = resolver.resolve("USD", "XAF").await;
    assert_eq!(resolution.rate, 1.0);
    assert!(resolution.is_approximated());

    let samples = resolver
        .store()
        .samples_since("USD", "XAF", epoch())
        .await
        .unwrap();
    assert!(samples.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_run_command_flows() {
    let mock_server = wiremock::MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let yaml = test_utils::config_yaml(
        &mock_server.uri(),
        data_dir.path().join("data").to_str().unwrap(),
        r#"[{ from: "USD", to: "EUR", rate: 0.9 }, { from: "EUR", to: "USD", rate: 1.1 }]"#,
    );
    let config_path = data_dir.path().join("config.yaml");
    fs::write(&config_path, yaml).expect("Failed to write config file");
    let config_path = config_path.to_str().unwrap();

    let commands = vec![
        AppCommand::Rate {
            from: "usd".to_string(),
            to: "eur".to_string(),
        },
        AppCommand::Convert {
            amount: 1000.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        AppCommand::History {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            days: 7,
        },
        AppCommand::History {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            days: u32::MAX,
        },
        AppCommand::Fees {
            amount: 1000.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
            country: "deu".to_string(),
        },
        AppCommand::Portfolio,
    ];

    for command in commands {
        let result = run_command(command.clone(), Some(config_path)).await;
        assert!(
            result.is_ok(),
            "{command:?} failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_run_command_rejects_invalid_input() {
    let data_dir = TempDir::new().unwrap();
    let yaml = test_utils::config_yaml(
        "http://127.0.0.1:9",
        data_dir.path().join("data").to_str().unwrap(),
        "[]",
    );
    let config_path = data_dir.path().join("config.yaml");
    fs::write(&config_path, yaml).expect("Failed to write config file");
    let config_path = config_path.to_str().unwrap();

    let result = run_command(
        AppCommand::Rate {
            from: "US".to_string(),
            to: "EUR".to_string(),
        },
        Some(config_path),
    )
    .await;
    assert!(result.unwrap_err().to_string().contains("invalid currency code"));

    let result = run_command(
        AppCommand::Convert {
            amount: -5.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        Some(config_path),
    )
    .await;
    assert!(result.unwrap_err().to_string().contains("invalid amount"));
}

#[test_log::test(tokio::test)]
async fn test_run_command_with_missing_config_file() {
    let data_dir = TempDir::new().unwrap();
    let missing = data_dir.path().join("missing.yaml");

    let result = run_command(AppCommand::Portfolio, Some(missing.to_str().unwrap())).await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
}

#[test_log::test(tokio::test)]
async fn test_trends_command() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("vs_currencies", "usd"))
        .and(query_param("include_24hr_change", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"bitcoin": {"usd": 64000.0, "usd_24h_change": 1.2}, "ethereum": {"usd": 3100.0}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let config_path = data_dir.path().join("config.yaml");
    let yaml = format!(
        r#"
        data_path: "{}"
        providers:
          coingecko:
            base_url: "{}"
    "#,
        data_dir.path().join("data").display(),
        mock_server.uri()
    );
    fs::write(&config_path, yaml).expect("Failed to write config file");

    let result = run_command(
        AppCommand::Trends {
            vs_currency: "usd".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Trends failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_trends_command_requires_crypto_provider() {
    let data_dir = TempDir::new().unwrap();
    let yaml = test_utils::config_yaml(
        "http://127.0.0.1:9",
        data_dir.path().join("data").to_str().unwrap(),
        "[]",
    );
    let config_path = data_dir.path().join("config.yaml");
    fs::write(&config_path, yaml).expect("Failed to write config file");

    let result = run_command(
        AppCommand::Trends {
            vs_currency: "USD".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.unwrap_err().to_string().contains("disabled"));
}
