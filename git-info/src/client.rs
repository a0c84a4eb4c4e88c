use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::config::{Config, DeploymentTarget};
use crate::deployment::{Deployment, DeploymentState};
use crate::error::{Error, Result};

const DEPLOYMENTS_QUERY: &str = r#"
query($owner: String!, $name: String!, $environments: [String!], $first: Int!) {
  repository(owner: $owner, name: $name) {
    deployments(environments: $environments, first: $first) {
      edges {
        cursor
        node {
          state
          commit {
            oid
          }
        }
      }
    }
  }
}"#;

pub struct GithubClient {
  client: Client,
  api_url: Url,
  graphql_url: Url,
  token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRecord {
  pub full_name: String,
  pub clone_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRecord {
  #[serde(default)]
  pub merged: bool,
  pub mergeable: Option<bool>,
  pub base: BranchRecord,
  pub head: BranchRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRecord {
  #[serde(rename = "ref")]
  pub ref_name: String,
  pub sha: String,
  pub repo: Option<RepositoryRecord>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
  query: &'a str,
  variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
  data: Option<T>,
  errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
  message: String,
}

#[derive(Deserialize)]
struct DeploymentsData {
  repository: Option<DeploymentsRepository>,
}

#[derive(Deserialize)]
struct DeploymentsRepository {
  deployments: Connection<DeploymentNode>,
}

#[derive(Deserialize)]
struct Connection<T> {
  edges: Vec<Edge<T>>,
}

#[derive(Deserialize)]
struct Edge<T> {
  node: T,
}

#[derive(Deserialize)]
struct DeploymentNode {
  state: DeploymentState,
  commit: Option<CommitNode>,
}

#[derive(Deserialize)]
struct CommitNode {
  oid: String,
}

impl GithubClient {
  pub fn new(config: &Config) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

    let client = Client::builder()
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .default_headers(headers)
      .build()?;

    let mut api_url = config.api_url.clone();
    if !api_url.path().ends_with('/') {
      let path = format!("{}/", api_url.path());
      api_url.set_path(&path);
    }

    Ok(Self {
      client,
      api_url,
      graphql_url: config.graphql_url.clone(),
      token: config.token.clone().filter(|token| !token.is_empty()),
    })
  }

  fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
    match &self.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    }
  }

  /// Fetches a REST resource, mapping 404 to `None`.
  async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
    let url = self.api_url.join(path)?;
    debug!(%url, "GET");

    let response = self.authorized(self.client.get(url.clone())).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }

    let record = check_status(response, &url)?.json::<T>().await?;
    Ok(Some(record))
  }

  pub async fn repository(&self, owner: &str, name: &str) -> Result<Option<RepositoryRecord>> {
    self.get_optional(&format!("repos/{}/{}", owner, name)).await
  }

  pub async fn pull_request(
    &self,
    full_name: &str,
    number: u64,
  ) -> Result<Option<PullRequestRecord>> {
    self
      .get_optional(&format!("repos/{}/pulls/{}", full_name, number))
      .await
  }

  /// Lists up to `first` deployments of the target environment, in the order the API returns them.
  pub async fn deployments(&self, target: &DeploymentTarget, first: u32) -> Result<Vec<Deployment>> {
    let request = GraphQlRequest {
      query: DEPLOYMENTS_QUERY,
      variables: json!({
        "owner": target.owner,
        "name": target.name,
        "environments": [target.environment],
        "first": first,
      }),
    };

    debug!(
      owner = %target.owner,
      name = %target.name,
      environment = %target.environment,
      "querying deployments"
    );

    let response = self
      .authorized(self.client.post(self.graphql_url.clone()))
      .json(&request)
      .send()
      .await?;

    let body = check_status(response, &self.graphql_url)?
      .json::<GraphQlResponse<DeploymentsData>>()
      .await?;

    if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
      let messages: Vec<_> = errors.into_iter().map(|error| error.message).collect();
      return Err(Error::GraphQl(messages.join("; ")));
    }

    let repository = body
      .data
      .ok_or_else(|| Error::GraphQl("response carried no data".to_string()))?
      .repository
      .ok_or_else(|| {
        Error::GraphQl(format!("repository {}/{} not found", target.owner, target.name))
      })?;

    Ok(
      repository
        .deployments
        .edges
        .into_iter()
        .map(|edge| Deployment {
          state: edge.node.state,
          sha: edge.node.commit.map(|commit| commit.oid),
        })
        .collect(),
    )
  }
}

fn check_status(response: Response, url: &Url) -> Result<Response> {
  let status = response.status();
  if status.is_success() {
    Ok(response)
  } else {
    Err(Error::Api {
      status,
      url: url.to_string(),
    })
  }
}
