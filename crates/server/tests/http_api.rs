use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use server::routes;
use service::catalog::repo::{SeaOrmServiceRepository, SeaOrmVersionRepository};
use service::catalog::repository::mock::InMemoryCatalog;
use service::catalog::CatalogService;
use service::errors::StoreError;

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

async fn spawn(app: Router) -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

async fn start_with_mock() -> anyhow::Result<(TestApp, Arc<InMemoryCatalog>)> {
    let repo = Arc::new(InMemoryCatalog::new());
    let app = routes::build_router(CatalogService::new(repo.clone(), repo.clone()));
    Ok((spawn(app).await?, repo))
}

async fn start_with_sqlite() -> anyhow::Result<TestApp> {
    let db = models::db::connect_with_config(&models::db::DatabaseConfig::sqlite_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    let services = Arc::new(SeaOrmServiceRepository::new(db.clone()));
    let versions = Arc::new(SeaOrmVersionRepository::new(db));
    spawn(routes::build_router(CatalogService::new(services, versions))).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_service(app: &TestApp, name: &str) -> anyhow::Result<i64> {
    let res = client()
        .post(app.url("/services"))
        .json(&json!({ "name": name, "description": format!("{name} service") }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    Ok(body["id"].as_i64().unwrap_or_default())
}

async fn create_version(app: &TestApp, service_id: i64, label: &str) -> anyhow::Result<i64> {
    let res = client()
        .post(app.url(&format!("/services/{service_id}/versions")))
        .json(&json!({ "version": label }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["is_active"], json!(true));
    Ok(body["id"].as_i64().unwrap_or_default())
}

async fn catalog_flow(app: &TestApp) -> anyhow::Result<()> {
    let auth = create_service(app, "Auth").await?;
    create_service(app, "Billing").await?;
    create_version(app, auth, "1.0.0").await?;
    create_version(app, auth, "1.1.0").await?;

    // unparsable numbers fall back to defaults
    let res = client().get(app.url("/services?page=abc&limit=")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    let got: Vec<_> = body["services"]
        .as_array()
        .map(|a| a.iter().map(|s| (s["name"].clone(), s["version_count"].clone())).collect())
        .unwrap_or_default();
    assert_eq!(got, vec![(json!("Auth"), json!(2)), (json!("Billing"), json!(0))]);
    assert_eq!(
        body["pagination"],
        json!({ "current_page": 1, "total_pages": 1, "total_items": 2, "items_per_page": 10 })
    );

    let res = client().get(app.url("/services?name=AUTH")).send().await?;
    let body: Value = res.json().await?;
    assert_eq!(body["pagination"]["total_items"], json!(1));

    let res = client().get(app.url(&format!("/services/{auth}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["version_count"], json!(2));
    assert_eq!(body["versions"][0]["version"], json!("1.1.0"));

    let res = client()
        .patch(app.url(&format!("/services/{auth}")))
        .json(&json!({ "description": "tokens" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["name"], json!("Auth"));
    assert_eq!(body["description"], json!("tokens"));

    let res = client().delete(app.url(&format!("/services/{auth}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = client().get(app.url(&format!("/services/{auth}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], json!("service_not_found"));

    let res = client().get(app.url(&format!("/services/{auth}/versions"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_catalog_flow_in_memory() -> anyhow::Result<()> {
    let (app, _) = start_with_mock().await?;
    catalog_flow(&app).await
}

#[tokio::test]
async fn e2e_catalog_flow_sqlite() -> anyhow::Result<()> {
    let app = start_with_sqlite().await?;
    catalog_flow(&app).await
}

#[tokio::test]
async fn e2e_rejects_bad_ids_and_bodies() -> anyhow::Result<()> {
    let (app, _) = start_with_mock().await?;

    let res = client().get(app.url("/services/abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], json!("invalid_service_id"));

    let id = create_service(&app, "Auth").await?;
    let res = client().get(app.url(&format!("/services/{id}/versions/xyz"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], json!("invalid_version_id"));

    let res = client()
        .post(app.url("/services"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], json!("invalid_request_body"));

    let res = client().post(app.url("/services")).json(&json!({ "name": "Auth" })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = client().post(app.url("/services")).json(&json!({ "name": "   " })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], json!("invalid"));
    Ok(())
}

#[tokio::test]
async fn e2e_versions_are_scoped() -> anyhow::Result<()> {
    let (app, _) = start_with_mock().await?;
    let a = create_service(&app, "A").await?;
    let b = create_service(&app, "B").await?;
    let v = create_version(&app, a, "1.0.0").await?;

    let res = client().get(app.url(&format!("/services/{b}/versions/{v}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], json!("version_not_found"));

    let res = client()
        .patch(app.url(&format!("/services/{a}/versions/{v}")))
        .json(&json!({ "is_active": false }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["is_active"], json!(false));

    let res = client().post(app.url("/services/999/versions")).json(&json!({ "version": "1.0.0" })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = client().delete(app.url(&format!("/services/{a}/versions/{v}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = client().get(app.url(&format!("/services/{a}/versions"))).send().await?;
    let body: Value = res.json().await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_store_outage_is_503() -> anyhow::Result<()> {
    let (app, repo) = start_with_mock().await?;
    repo.fail_next(StoreError::Unavailable("pool timed out".into()));
    let res = client().get(app.url("/services")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], json!("unavailable"));
    Ok(())
}

#[tokio::test]
async fn e2e_huge_page_is_empty_not_an_error() -> anyhow::Result<()> {
    let app = start_with_sqlite().await?;
    create_service(&app, "Auth").await?;

    for page in ["100000000000000000", "9223372036854775807"] {
        let res = client().get(app.url(&format!("/services?page={page}&limit=100"))).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        let body: Value = res.json().await?;
        assert_eq!(body["services"], json!([]));
        assert_eq!(body["pagination"]["total_items"], json!(1));
        assert_eq!(body["pagination"]["items_per_page"], json!(100));
    }
    Ok(())
}
