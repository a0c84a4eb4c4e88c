mod common;

use git_info::config::DeploymentTarget;
use git_info::deployment::DeploymentState;
use git_info::{pull, Error, GithubClient, Lookup, Reason};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{config, deployments_body, pull_body, repository_body};

fn target() -> DeploymentTarget {
  DeploymentTarget {
    owner: "acme".to_string(),
    name: "shop".to_string(),
    environment: "production".to_string(),
  }
}

async fn mount_pull(server: &MockServer) {
  Mock::given(method("GET"))
    .and(path("/repos/acme/shop"))
    .and(header("authorization", "Bearer test-token"))
    .respond_with(ResponseTemplate::new(200).set_body_json(repository_body()))
    .mount(server)
    .await;

  Mock::given(method("GET"))
    .and(path("/repos/acme/shop/pulls/42"))
    .respond_with(ResponseTemplate::new(200).set_body_json(pull_body("master", "feature/x")))
    .mount(server)
    .await;
}

#[tokio::test]
async fn resolves_pull_request() {
  let server = MockServer::start().await;
  mount_pull(&server).await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let info = pull::resolve(&client, "https://github.com/acme/shop/pull/42")
    .await
    .unwrap()
    .found()
    .unwrap();

  assert_eq!(info.base_branch, "master");
  assert_eq!(info.base_sha, "1111111111111111111111111111111111111111");
  assert_eq!(info.base_repo_url, "https://github.com/acme/shop.git");
  assert_eq!(info.head_branch, "feature/x");
  assert_eq!(info.head_sha, "2222222222222222222222222222222222222222");
  assert_eq!(info.head_repo_url, "https://github.com/contributor/shop.git");
  assert!(info.is_mergeable);
}

#[tokio::test]
async fn api_urls_resolve_the_same_pull_request() {
  let server = MockServer::start().await;
  mount_pull(&server).await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let lookup = pull::resolve(&client, "https://api.github.com/repos/acme/shop/pulls/42")
    .await
    .unwrap();

  assert_eq!(lookup.found().unwrap().head_branch, "feature/x");
}

#[tokio::test]
async fn missing_repository_is_not_found() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/repos/acme/gone"))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
    .expect(1)
    .mount(&server)
    .await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let lookup = pull::resolve(&client, "https://github.com/acme/gone/pull/1")
    .await
    .unwrap();

  assert_eq!(lookup, Lookup::Missing(Reason::NotFound));
}

#[tokio::test]
async fn missing_pull_request_is_not_found() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/repos/acme/shop"))
    .respond_with(ResponseTemplate::new(200).set_body_json(repository_body()))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/repos/acme/shop/pulls/9999"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let lookup = pull::resolve(&client, "https://github.com/acme/shop/pull/9999")
    .await
    .unwrap();

  assert_eq!(lookup, Lookup::Missing(Reason::NotFound));
}

#[tokio::test]
async fn malformed_url_skips_the_api() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(500))
    .expect(0)
    .mount(&server)
    .await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let lookup = pull::resolve(&client, "https://github.com/acme/shop/issues/42")
    .await
    .unwrap();

  assert_eq!(lookup, Lookup::Missing(Reason::Malformed));
}

#[tokio::test]
async fn empty_url_is_a_usage_error() {
  let server = MockServer::start().await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let err = pull::resolve(&client, "").await.unwrap_err();
  assert!(matches!(err, Error::Usage(_)));
}

#[tokio::test]
async fn server_errors_are_fatal() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/repos/acme/shop"))
    .respond_with(ResponseTemplate::new(401))
    .mount(&server)
    .await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let err = pull::resolve(&client, "https://github.com/acme/shop/pull/42")
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Api { status, .. } if status.as_u16() == 401));
}

#[tokio::test]
async fn lists_deployments_in_returned_order() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/graphql"))
    .and(header("authorization", "Bearer test-token"))
    .and(body_partial_json(json!({
      "variables": {
        "owner": "acme",
        "name": "shop",
        "environments": ["production"],
        "first": 10,
      }
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(deployments_body(&[
      ("ACTIVE", "sha1"),
      ("INACTIVE", "sha2"),
      ("ACTIVE", "sha3"),
    ])))
    .expect(1)
    .mount(&server)
    .await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let deployments = client.deployments(&target(), 10).await.unwrap();

  let states: Vec<_> = deployments.iter().map(|deployment| deployment.state).collect();
  assert_eq!(
    states,
    vec![
      DeploymentState::Active,
      DeploymentState::Inactive,
      DeploymentState::Active
    ]
  );
  assert_eq!(deployments[2].sha.as_deref(), Some("sha3"));
}

#[tokio::test]
async fn graphql_errors_are_fatal() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/graphql"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "data": null,
      "errors": [{ "message": "Bad credentials" }],
    })))
    .mount(&server)
    .await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let err = client.deployments(&target(), 10).await.unwrap_err();
  assert!(matches!(err, Error::GraphQl(message) if message == "Bad credentials"));
}

#[tokio::test]
async fn unknown_repository_in_graphql_is_fatal() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/graphql"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(json!({ "data": { "repository": null } })),
    )
    .mount(&server)
    .await;
  let client = GithubClient::new(&config(&server)).unwrap();

  let err = client.deployments(&target(), 10).await.unwrap_err();
  assert!(matches!(err, Error::GraphQl(_)));
}
