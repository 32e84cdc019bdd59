use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gist_search::error::{FetchError, ListingError};
use gist_search::github::GithubClient;

mod test_helpers {
    use super::*;

    pub const TOKEN: &str = "test-token";

    pub fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::new(TOKEN, &server.uri()).unwrap()
    }

    pub fn gist_json(server: &MockServer, id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "url": format!("{}/gists/{}", server.uri(), id),
            "html_url": format!("https://gist.github.com/{}", id),
            "description": "ignored",
            "public": true
        })
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_list_gists_sends_pagination_and_auth() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/testuser/gists"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "5"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([gist_json(&server, "1")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let listing = client_for(&server).list_gists("testuser", 2, 5).await?;

    assert_eq!(listing.gists.len(), 1);
    assert_eq!(listing.gists[0].id, "1");
    assert_eq!(listing.gists[0].html_url, "https://gist.github.com/1");
    assert!(!listing.more_pages);
    Ok(())
}

#[tokio::test]
async fn test_list_gists_reads_next_link() -> Result<()> {
    let server = MockServer::start().await;
    let link = format!(
        "<{uri}/users/testuser/gists?page=2>; rel=\"next\", <{uri}/users/testuser/gists?page=4>; rel=\"last\"",
        uri = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/users/testuser/gists"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .insert_header("Link", link.as_str()),
        )
        .mount(&server)
        .await;

    let listing = client_for(&server).list_gists("testuser", 1, 10).await?;

    assert!(listing.gists.is_empty());
    assert!(listing.more_pages);
    Ok(())
}

#[tokio::test]
async fn test_list_gists_without_next_link_on_last_page() -> Result<()> {
    let server = MockServer::start().await;
    let link = format!(
        "<{uri}/users/testuser/gists?page=3>; rel=\"prev\", <{uri}/users/testuser/gists?page=1>; rel=\"first\"",
        uri = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/users/testuser/gists"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([gist_json(&server, "9")]))
                .insert_header("Link", link.as_str()),
        )
        .mount(&server)
        .await;

    let listing = client_for(&server).list_gists("testuser", 4, 10).await?;

    assert_eq!(listing.gists.len(), 1);
    assert!(!listing.more_pages);
    Ok(())
}

#[tokio::test]
async fn test_list_gists_does_not_retry_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/testuser/gists"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).list_gists("testuser", 1, 10).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_gists_fails_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost/gists"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_gists("ghost", 1, 10)
        .await
        .unwrap_err();

    assert!(matches!(err, ListingError(_)));
    assert!(err.to_string().starts_with("Error fetching gists"));
}

#[tokio::test]
async fn test_list_gists_fails_on_transport_error() {
    // nothing listens on port 1
    let client = GithubClient::new(TOKEN, "http://127.0.0.1:1").unwrap();
    let err = client.list_gists("testuser", 1, 10).await.unwrap_err();
    assert!(matches!(err, ListingError(_)));
}

#[tokio::test]
async fn test_fetch_file_contents_reads_every_file() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "files": {
                "gistfile2.txt": { "filename": "gistfile2.txt", "raw_url": format!("{}/raw/gistfile2.txt", server.uri()) },
                "gistfile1.txt": { "filename": "gistfile1.txt", "raw_url": format!("{}/raw/gistfile1.txt", server.uri()) }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/gistfile1.txt"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("content of gistfile1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/gistfile2.txt"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("content of gistfile2"))
        .expect(1)
        .mount(&server)
        .await;

    let files = client_for(&server)
        .fetch_file_contents(&format!("{}/gists/abc", server.uri()))
        .await?;

    let pairs: Vec<(&str, &str)> = files
        .iter()
        .map(|f| (f.filename.as_str(), f.content.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("gistfile2.txt", "content of gistfile2"),
            ("gistfile1.txt", "content of gistfile1"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_fetch_file_contents_names_failing_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": {
                "ok.txt": { "raw_url": format!("{}/raw/ok.txt", server.uri()) },
                "gone.txt": { "raw_url": format!("{}/raw/gone.txt", server.uri()) }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/ok.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/gone.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_file_contents(&format!("{}/gists/abc", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::File { .. }));
    assert_eq!(err.filename(), Some("gone.txt"));
    assert!(err.to_string().contains("gone.txt"));
}

#[tokio::test]
async fn test_fetch_file_contents_manifest_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/a.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_file_contents(&format!("{}/gists/abc", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Manifest { .. }));
    assert_eq!(err.filename(), None);
}

#[tokio::test]
async fn test_fetch_file_contents_missing_raw_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": { "odd.bin": { "filename": "odd.bin" } }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_file_contents(&format!("{}/gists/abc", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MissingRawUrl { .. }));
    assert_eq!(err.filename(), Some("odd.bin"));
}
