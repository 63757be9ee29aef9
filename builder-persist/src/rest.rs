//! Client for a hosted REST table of projects.
//!
//! Talks to `{base}/rest/v1/projects` using row filters such as
//! `id=eq.<id>`. Every request carries the project's API key and the
//! session's bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::project::current_timestamp_ms;
use crate::{
    NewProject, PersistError, PersistResult, ProjectId, ProjectPatch, ProjectRecord, ProjectStore,
    Session,
};

const TABLE_PATH: &str = "rest/v1/projects";

/// Hosted REST project store.
#[derive(Clone)]
pub struct RestProjectStore {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl RestProjectStore {
    /// Create a client for the service at `base_url`.
    ///
    /// `base_url` is the service root (`https://project.example.co`); the
    /// table path is appended.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::InvalidUrl`] if the URL is malformed.
    /// Returns [`PersistError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> PersistResult<Self> {
        let base = Url::parse(base_url).map_err(|e| PersistError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(PersistError::InvalidUrl(format!("{base_url} cannot be a base URL")));
        }
        let mut endpoint = base;
        let prefix = endpoint.path().trim_end_matches('/').to_string();
        endpoint.set_path(&format!("{prefix}/{TABLE_PATH}"));

        let http = Client::builder()
            .user_agent(concat!("site-builder/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint,
                api_key: api_key.into(),
            }),
        })
    }

    /// Table endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    fn request(
        &self,
        session: &Session,
        method: reqwest::Method,
        filters: &[(&str, String)],
    ) -> PersistResult<RequestBuilder> {
        let token = session.require_token()?;
        Ok(self
            .inner
            .http
            .request(method, self.inner.endpoint.clone())
            .query(filters)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(token))
    }

    fn returning(builder: RequestBuilder) -> RequestBuilder {
        builder.header("Prefer", "return=representation")
    }

    async fn rows<T: DeserializeOwned>(response: Response) -> PersistResult<Vec<T>> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistError::Unauthorized(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Project backend returned {status}: {body}");
            return Err(PersistError::Status {
                code: status.as_u16(),
                body,
            });
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn single(rows: Vec<ProjectRecord>, id: ProjectId) -> PersistResult<ProjectRecord> {
        rows.into_iter()
            .next()
            .ok_or_else(|| PersistError::NotFound(id.to_string()))
    }
}

fn owner_filter(owner: &str) -> (&'static str, String) {
    ("owner", format!("eq.{owner}"))
}

/// Filters selecting one project of one owner.
fn row_filters(id: ProjectId, owner: &str) -> [(&'static str, String); 2] {
    [("id", format!("eq.{id}")), owner_filter(owner)]
}

#[async_trait]
impl ProjectStore for RestProjectStore {
    async fn create(&self, session: &Session, project: NewProject) -> PersistResult<ProjectRecord> {
        let owner = session.require_user()?;
        project.validate()?;
        let record = ProjectRecord::create(owner, project, current_timestamp_ms());

        let request = Self::returning(self.request(session, reqwest::Method::POST, &[])?);
        let response = request.json(&record).send().await?;
        let rows: Vec<ProjectRecord> = Self::rows(response).await?;
        let stored = rows.into_iter().next().ok_or_else(|| {
            PersistError::UnexpectedResponse("create returned no rows".into())
        })?;
        tracing::info!("Created project {} for {owner}", stored.id);
        Ok(stored)
    }

    async fn update(
        &self,
        session: &Session,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> PersistResult<ProjectRecord> {
        let owner = session.require_user()?;
        patch.validate()?;
        let mut body = serde_json::to_value(&patch)?;
        if let Some(fields) = body.as_object_mut() {
            fields.insert("updated_at".into(), current_timestamp_ms().into());
        }

        let request = Self::returning(self.request(
            session,
            reqwest::Method::PATCH,
            &row_filters(id, owner),
        )?);
        let response = request.json(&body).send().await?;
        let stored = Self::single(Self::rows(response).await?, id)?;
        tracing::info!("Updated project {id}");
        Ok(stored)
    }

    async fn get(&self, session: &Session, id: ProjectId) -> PersistResult<ProjectRecord> {
        let owner = session.require_user()?;
        let [by_id, by_owner] = row_filters(id, owner);
        let filters = [by_id, by_owner, ("select", "*".to_string())];
        let response = self
            .request(session, reqwest::Method::GET, &filters)?
            .send()
            .await?;
        Self::single(Self::rows(response).await?, id)
    }

    async fn list(&self, session: &Session) -> PersistResult<Vec<ProjectRecord>> {
        let owner = session.require_user()?;
        let filters = [
            owner_filter(owner),
            ("select", "*".to_string()),
            ("order", "updated_at.desc".to_string()),
        ];
        let response = self
            .request(session, reqwest::Method::GET, &filters)?
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn delete(&self, session: &Session, id: ProjectId) -> PersistResult<()> {
        let owner = session.require_user()?;
        let request = Self::returning(self.request(
            session,
            reqwest::Method::DELETE,
            &row_filters(id, owner),
        )?);
        let response = request.send().await?;
        let rows: Vec<ProjectRecord> = Self::rows(response).await?;
        if rows.is_empty() {
            return Err(PersistError::NotFound(id.to_string()));
        }
        tracing::info!("Deleted project {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ========================================================================
    // Unit tests that don't require network/wiremock
    // ========================================================================

    #[test]
    fn endpoint_appends_table_path() {
        let store = RestProjectStore::new("https://db.example.com", "key").expect("store");
        assert_eq!(
            store.endpoint().as_str(),
            "https://db.example.com/rest/v1/projects"
        );

        let store = RestProjectStore::new("https://db.example.com/base/", "key").expect("store");
        assert_eq!(store.endpoint().path(), "/base/rest/v1/projects");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            RestProjectStore::new("not a url", "key"),
            Err(PersistError::InvalidUrl(_))
        ));
        assert!(matches!(
            RestProjectStore::new("mailto:ada@example.com", "key"),
            Err(PersistError::InvalidUrl(_))
        ));
    }

    #[test]
    fn row_filters_scope_to_owner() {
        let id = ProjectId::new_v4();
        let filters = row_filters(id, "ada");
        assert_eq!(filters[0], ("id", format!("eq.{id}")));
        assert_eq!(filters[1], ("owner", "eq.ada".to_string()));
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_without_request() {
        let store = RestProjectStore::new("http://127.0.0.1:9", "key").expect("store");
        let result = store.list(&Session::new("ada")).await;
        assert!(matches!(result, Err(PersistError::Unauthorized(_))));
    }

    // ========================================================================
    // Wiremock tests
    // ========================================================================

    fn session() -> Session {
        Session::new("ada").with_access_token("jwt-token")
    }

    fn record(id: ProjectId, name: &str) -> ProjectRecord {
        let mut record = ProjectRecord::create("ada", NewProject::new(name, "Food"), 5);
        record.id = id;
        record
    }

    fn store_for(server: &MockServer) -> RestProjectStore {
        RestProjectStore::new(&server.uri(), "anon-key").expect("store")
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn create_posts_record_with_headers() {
        let server = MockServer::start().await;
        let id = ProjectId::new_v4();

        Mock::given(method("POST"))
            .and(path("/rest/v1/projects"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer jwt-token"))
            .and(header("prefer", "return=representation"))
            .and(body_partial_json(serde_json::json!({
                "owner": "ada",
                "name": "Bakery",
                "industry": "Food"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(vec![record(id, "Bakery")]))
            .expect(1)
            .mount(&server)
            .await;

        let created = store_for(&server)
            .create(&session(), NewProject::new("Bakery", "Food"))
            .await
            .expect("create");
        assert_eq!(created.id, id);
        assert_eq!(created.name, "Bakery");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn update_patches_by_id_and_owner() {
        let server = MockServer::start().await;
        let id = ProjectId::new_v4();

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/projects"))
            .and(query_param("id", format!("eq.{id}")))
            .and(query_param("owner", "eq.ada"))
            .and(body_partial_json(serde_json::json!({ "name": "Renamed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![record(id, "Renamed")]))
            .expect(1)
            .mount(&server)
            .await;

        let patch = ProjectPatch {
            name: Some("Renamed".into()),
            ..ProjectPatch::default()
        };
        let updated = store_for(&server)
            .update(&session(), id, patch)
            .await
            .expect("update");
        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn get_with_no_rows_is_not_found() {
        let server = MockServer::start().await;
        let id = ProjectId::new_v4();

        Mock::given(method("GET"))
            .and(path("/rest/v1/projects"))
            .and(query_param("id", format!("eq.{id}")))
            .and(query_param("owner", "eq.ada"))
            .and(query_param("select", "*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<ProjectRecord>::new()))
            .mount(&server)
            .await;

        let result = store_for(&server).get(&session(), id).await;
        assert!(matches!(result, Err(PersistError::NotFound(_))));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn list_filters_by_owner() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/projects"))
            .and(query_param("owner", "eq.ada"))
            .and(query_param("order", "updated_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![
                record(ProjectId::new_v4(), "One"),
                record(ProjectId::new_v4(), "Two"),
            ]))
            .mount(&server)
            .await;

        let projects = store_for(&server).list(&session()).await.expect("list");
        assert_eq!(projects.len(), 2);
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn delete_of_missing_row_is_not_found() {
        let server = MockServer::start().await;
        let id = ProjectId::new_v4();

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/projects"))
            .and(query_param("id", format!("eq.{id}")))
            .and(query_param("owner", "eq.ada"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<ProjectRecord>::new()))
            .expect(1)
            .mount(&server)
            .await;

        let result = store_for(&server).delete(&session(), id).await;
        assert!(matches!(result, Err(PersistError::NotFound(_))));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn rejected_token_maps_to_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("JWT expired"))
            .mount(&server)
            .await;

        let result = store_for(&server).list(&session()).await;
        assert!(matches!(result, Err(PersistError::Unauthorized(body)) if body == "JWT expired"));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn server_errors_carry_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = store_for(&server).get(&session(), ProjectId::new_v4()).await;
        match result {
            Err(PersistError::Status { code, body }) => {
                assert_eq!(code, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
