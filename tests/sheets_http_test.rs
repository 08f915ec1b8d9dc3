use anyhow::Result;
use edgecap::application::catalogue::{ChartCatalogue, NAV_CHART};
use edgecap::application::chart_cache::ChartCache;
use edgecap::application::live_series::{ChartSource, LiveSeriesService};
use edgecap::config::HttpEnvConfig;
use edgecap::domain::contact::ContactForm;
use edgecap::domain::errors::SheetError;
use edgecap::domain::fund_returns::FundClass;
use edgecap::domain::ports::{FormSink, FundReturnsSource, PerformanceSource};
use edgecap::domain::series::FlatPathPolicy;
use edgecap::infrastructure::{HttpClientFactory, SheetsFormClient, SheetsReadClient};
use reqwest_middleware::ClientWithMiddleware;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves the same canned reply to every connection and records requests.
struct CannedServer {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    async fn start(status: u16, body: &str) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/exec", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let reply = format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request);
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Ok(Self { url, requests })
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn client() -> ClientWithMiddleware {
    HttpClientFactory::create_client(&HttpEnvConfig {
        max_retries: 0,
        timeout_secs: 5,
        ..HttpEnvConfig::default()
    })
}

fn read_client(url: &str) -> SheetsReadClient {
    SheetsReadClient::new(client(), Some(url.to_string()), Some(url.to_string()))
}

fn live_service(source: SheetsReadClient) -> LiveSeriesService {
    let cache = ChartCache::build(&ChartCatalogue::builtin(), FlatPathPolicy::Fail).unwrap();
    LiveSeriesService::new(Arc::new(cache), Arc::new(source), Duration::from_secs(5))
}

#[tokio::test]
async fn test_fetch_rows_sends_sheet_and_cache_buster() -> Result<()> {
    let server = CannedServer::start(
        200,
        r#"{"ok": true, "data": [{"date": "Jan 2024", "correlationArbitrage": 180.2}]}"#,
    )
    .await?;

    let rows = read_client(&server.url).fetch_rows("nav").await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("correlationArbitrage"), Some(180.2));

    let request = server.requests()[0].to_lowercase();
    assert!(request.starts_with("get /exec?sheet=nav&t="));
    assert!(request.contains("accept: application/json"));
    Ok(())
}

#[tokio::test]
async fn test_live_rows_are_rebased() -> Result<()> {
    let server = CannedServer::start(
        200,
        r#"{"ok": true, "data": [
            {"date": "Jan 2024", "correlationArbitrage": 200, "volPremiumRisk": 250, "msciWorld": 150},
            {"date": "Feb 2024", "correlationArbitrage": 210, "volPremiumRisk": "262.5", "msciWorld": 147}
        ]}"#,
    )
    .await?;

    let displayed = live_service(read_client(&server.url)).resolve(NAV_CHART).await?;
    assert_eq!(displayed.source, ChartSource::Live);
    assert_eq!(displayed.points.len(), 2);
    let msci = displayed.values("msciWorld").unwrap();
    assert_eq!(msci[0], 100.0);
    assert!((msci[1] - 98.0).abs() < 1e-9);
    let vol = displayed.values("volPremiumRisk").unwrap();
    assert!((vol[1] - 105.0).abs() < 1e-9);
    Ok(())
}

async fn assert_falls_back(status: u16, body: &str) -> Result<String> {
    let server = CannedServer::start(status, body).await?;
    let service = live_service(read_client(&server.url));
    let displayed = service.resolve(NAV_CHART).await?;

    let synthetic = ChartCatalogue::builtin()
        .get(NAV_CHART)?
        .build(FlatPathPolicy::Fail)?;
    for name in &synthetic.series {
        assert_eq!(displayed.values(name), synthetic.values(name));
    }

    match displayed.source {
        ChartSource::Fallback { reason } => Ok(reason),
        ChartSource::Live => anyhow::bail!("expected a fallback"),
    }
}

#[tokio::test]
async fn test_ok_false_falls_back() -> Result<()> {
    let reason = assert_falls_back(200, r#"{"ok": false, "message": "sheet missing"}"#).await?;
    assert!(reason.contains("sheet missing"));
    Ok(())
}

#[tokio::test]
async fn test_error_field_falls_back() -> Result<()> {
    let reason = assert_falls_back(200, r#"{"ok": true, "data": [], "error": "quota"}"#).await?;
    assert!(reason.contains("quota"));
    Ok(())
}

#[tokio::test]
async fn test_server_error_falls_back() -> Result<()> {
    let reason = assert_falls_back(500, r#"{"ok": false}"#).await?;
    assert!(reason.contains("500"));
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_falls_back() -> Result<()> {
    let reason = assert_falls_back(200, "<html>Moved Temporarily</html>").await?;
    assert!(reason.contains("Moved Temporarily"));
    Ok(())
}

#[tokio::test]
async fn test_missing_endpoint_falls_back() -> Result<()> {
    let source = SheetsReadClient::new(client(), None, None);
    let displayed = live_service(source).resolve(NAV_CHART).await?;
    assert!(!displayed.source.is_live());
    Ok(())
}

fn contact_form() -> ContactForm {
    ContactForm {
        name: "Ada".to_string(),
        mail: "ada@example.com".to_string(),
        message: "Factsheet please".to_string(),
        number: String::new(),
        subscribe_newsletter: true,
    }
}

#[tokio::test]
async fn test_form_post_shape() -> Result<()> {
    let server = CannedServer::start(200, r#"{"ok": true, "row": 7}"#).await?;
    let sink = SheetsFormClient::new(client(), Some(server.url.clone()));

    let receipt = sink.submit(&contact_form().into_submission()).await?;
    assert!(receipt.ok);

    let request = server.requests()[0].clone();
    let lower = request.to_lowercase();
    assert!(lower.starts_with("post /exec"));
    assert!(lower.contains("content-type: text/plain;charset=utf-8"));
    assert!(request.contains(r#""formSlug":"landing-contact""#));
    assert!(request.contains(r#""subscribeNewsletter":true"#));
    Ok(())
}

#[tokio::test]
async fn test_form_rejection_carries_server_message() -> Result<()> {
    let server = CannedServer::start(200, r#"{"ok": false, "message": "Sheet locked"}"#).await?;
    let sink = SheetsFormClient::new(client(), Some(server.url.clone()));

    let err = sink.submit(&contact_form().into_submission()).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Sheet locked"));
    Ok(())
}

#[tokio::test]
async fn test_form_status_without_message() -> Result<()> {
    let server = CannedServer::start(502, r#"{"ok": false}"#).await?;
    let sink = SheetsFormClient::new(client(), Some(server.url.clone()));

    let err = sink.submit(&contact_form().into_submission()).await.unwrap_err();
    assert_eq!(err, SheetError::Status { status: 502 });
    Ok(())
}

#[tokio::test]
async fn test_form_unreadable_reply() -> Result<()> {
    let server = CannedServer::start(200, "Script function not found: doPost").await?;
    let sink = SheetsFormClient::new(client(), Some(server.url.clone()));

    let err = sink.submit(&contact_form().into_submission()).await.unwrap_err();
    assert_eq!(
        err,
        SheetError::MalformedBody {
            snippet: "Script function not found: doPost".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_form_without_endpoint() -> Result<()> {
    let sink = SheetsFormClient::new(client(), None);
    let err = sink.submit(&contact_form().into_submission()).await.unwrap_err();
    assert_eq!(
        err,
        SheetError::MissingEndpoint {
            name: "FORM_SCRIPT_URL"
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_fund_returns_fetch() -> Result<()> {
    let server = CannedServer::start(
        200,
        r#"{
            "EC_Class_I": {
                "month": {"nl": "juni", "en": "June", "key": "2025-06"},
                "returns": {"monthly": 3.28, "ytd": 27.25, "since_inception": 180.9, "cagr": 19.4}
            },
            "EC_Class_II": null,
            "EC_Class_III": null
        }"#,
    )
    .await?;

    let snapshot = read_client(&server.url).fetch_fund_returns().await?;
    assert_eq!(snapshot.get(FundClass::ClassI).unwrap().month.en, "June");
    assert!(snapshot.get(FundClass::ClassII).is_none());
    Ok(())
}

#[tokio::test]
async fn test_fund_returns_error_field() -> Result<()> {
    let server = CannedServer::start(200, r#"{"error": "No published month"}"#).await?;

    let err = read_client(&server.url).fetch_fund_returns().await.unwrap_err();
    assert_eq!(
        err,
        SheetError::Rejected {
            message: "No published month".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_fund_returns_blank_error_is_ignored() -> Result<()> {
    let server = CannedServer::start(
        200,
        r#"{
            "error": "",
            "EC_Class_I": {
                "month": {"nl": "mei", "en": "May", "key": "2025-05"},
                "returns": {"monthly": 1.1, "ytd": 23.2, "since_inception": 172.1, "cagr": 19.0}
            },
            "EC_Class_II": null,
            "EC_Class_III": null
        }"#,
    )
    .await?;

    let snapshot = read_client(&server.url).fetch_fund_returns().await?;
    assert_eq!(snapshot.get(FundClass::ClassI).unwrap().month.key, "2025-05");
    Ok(())
}
