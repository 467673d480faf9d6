use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use server::routes;
use service::storage::MemoryFileStorage;

mod support;

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    storage: Arc<MemoryFileStorage>,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }
}

async fn start_server() -> anyhow::Result<Option<TestApp>> {
    let Some(db) = support::test_db().await else { return Ok(None) };
    let storage = Arc::new(MemoryFileStorage::default());
    let app = routes::build_router(support::state_with(db, storage.clone()), support::cors());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    let client = reqwest::Client::builder().cookie_store(true).build()?;
    Ok(Some(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()), client, storage }))
}

/// Register and log in a fresh member; the client keeps the auth cookie.
async fn login_new_member(app: &TestApp) -> anyhow::Result<String> {
    let email = format!("e2e_{}@diary.test", Uuid::new_v4());
    let password = "S3curePass!";
    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({"email": email, "nickname": "Tester", "password": password}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    assert!(resp.headers().get("set-cookie").is_some());
    let body: Value = resp.json().await?;
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

fn create_form(title: &str, tags: &[&str]) -> Form {
    let post = json!({
        "title": title,
        "begin_at": "2024-05-01",
        "finish_at": "2024-05-03",
        "tags": [{"tag_type": "PLACE", "tag_name": tags}],
        "experiences": [{"title": "hike", "content": "Hallasan at dawn"}]
    });
    let file = Part::bytes(b"fake-png".to_vec()).file_name("sunset.png");
    Form::new().text("post", post.to_string()).part("files", file)
}

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let token = login_new_member(&app).await?;
    assert!(!token.is_empty());

    // cookie
    let resp = app.client.get(app.url("/auth/me")).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let me: Value = resp.json().await?;
    assert_eq!(me["nickname"], "Tester");

    // bearer, without the cookie jar
    let resp = reqwest::Client::new().get(app.url("/auth/me")).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({"email": me["email"], "password": "wrong-password"}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn post_lifecycle_over_http() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    login_new_member(&app).await?;

    let resp = app.client.post(app.url("/api/posts")).multipart(create_form("Jeju", &["Jeju", "sea"])).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let post_id = resp.json::<Value>().await?["post_id"].as_str().unwrap_or_default().to_string();
    assert_eq!(app.storage.len().await, 1);

    let detail: Value = app.client.get(app.url(&format!("/api/posts/{post_id}"))).send().await?.json().await?;
    assert_eq!(detail["title"], "Jeju");
    assert_eq!(detail["tags"][0]["tag_type"], "PLACE");
    let file_url = detail["files"][0]["url"].as_str().unwrap_or_default().to_string();

    let resp = app.client.get(app.url(&file_url)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(resp.bytes().await?.as_ref(), b"fake-png");

    let resp = app
        .client
        .patch(app.url(&format!("/api/posts/{post_id}")))
        .json(&json!({"title": "Jeju again", "begin_at": "2024-05-02", "finish_at": "2024-05-01"}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);

    let found: Value = app.client.get(app.url("/api/posts/search?tags=sea")).send().await?.json().await?;
    assert_eq!(found["total_posts"], 1);
    assert_eq!(found["posts"][0]["tag_names"], json!(["Jeju", "sea"]));

    let tags: Value = app.client.get(app.url("/api/tags")).send().await?.json().await?;
    assert_eq!(tags[0]["tag_name"], json!(["Jeju", "sea"]));

    let resp = app.client.delete(app.url(&format!("/api/posts/{post_id}"))).send().await?;
    assert_eq!(resp.json::<Value>().await?["post_id"], json!(post_id));
    let resp = app.client.get(app.url(&format!("/api/posts/{post_id}"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
    let removed: Value = app.client.get(app.url("/api/posts/removed")).send().await?.json().await?;
    assert_eq!(removed["total_posts"], 1);

    let resp = app.client.patch(app.url(&format!("/api/posts/{post_id}/restore"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let resp = app.client.get(app.url(&format!("/api/posts/{post_id}"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);

    let resp = app.client.delete(app.url(&format!("/api/posts/{post_id}/hard"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);
    let resp = app.client.get(app.url(&format!("/api/posts/{post_id}"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NOT_FOUND);
    assert!(app.storage.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn other_members_cannot_touch_a_post() -> anyhow::Result<()> {
    let Some(owner) = start_server().await? else { return Ok(()) };
    login_new_member(&owner).await?;
    let resp = owner.client.post(owner.url("/api/posts")).multipart(create_form("mine", &["home"])).send().await?;
    let post_id = resp.json::<Value>().await?["post_id"].as_str().unwrap_or_default().to_string();

    // second client against the same server
    let intruder = TestApp {
        base_url: owner.base_url.clone(),
        client: reqwest::Client::builder().cookie_store(true).build()?,
        storage: owner.storage.clone(),
    };
    login_new_member(&intruder).await?;

    let resp = intruder.client.get(intruder.url(&format!("/api/posts/{post_id}"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);
    let resp = intruder.client.delete(intruder.url(&format!("/api/posts/{post_id}"))).send().await?;
    assert_eq!(resp.json::<Value>().await?["post_id"], Value::Null);
    let resp = intruder.client.delete(intruder.url(&format!("/api/posts/{post_id}/hard"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);

    let resp = owner.client.get(owner.url(&format!("/api/posts/{post_id}"))).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    Ok(())
}
