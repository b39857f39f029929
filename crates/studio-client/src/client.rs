// crates/studio-client/src/client.rs
// ============================================================================
// Module: Studio Client
// Description: Session-holding façade over the Studio RPC surface.
// Purpose: Manage authentication state and expose typed data operations.
// Dependencies: serde, serde_json, studio-core, time, tracing
// ============================================================================

//! ## Overview
//! [`Client`] holds the service URL, a shared [`TokenStorage`] and a shared
//! [`Transport`]. The storage is the only source of truth for the session
//! token: the client is authenticated exactly when the storage holds one.
//!
//! Builder methods (`with_server`, `with_token`, ...) are synchronous and
//! return a new client value; the original is left pointing where it was.
//! Clones share storage and transport, so two clients wired to the same
//! storage observe each other's logins and logouts.
//!
//! Every network operation is `async`. [`crate::BlockingClient`] runs these
//! same futures to completion, so both forms share one implementation.
//!
//! Invariants:
//! - Authenticated operations without a stored token fail with
//!   [`ClientError::Authentication`] and issue no request.
//! - Storage is mutated only after the last suspension point of an operation.
//!   Dropping an in-flight future never leaves a partial `store` or `clear`.
//! - Failures are returned, never logged-and-swallowed, and never retried.
//! - Tokens and passwords are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use studio_core::AnnotationSet;
use studio_core::AnnotationSetId;
use studio_core::Artifact;
use studio_core::ClientError;
use studio_core::Dataset;
use studio_core::DatasetId;
use studio_core::Experiment;
use studio_core::ExperimentId;
use studio_core::Label;
use studio_core::MemoryTokenStorage;
use studio_core::Organization;
use studio_core::Parameter;
use studio_core::Project;
use studio_core::ProjectId;
use studio_core::Sample;
use studio_core::Snapshot;
use studio_core::SnapshotId;
use studio_core::Task;
use studio_core::TaskFilter;
use studio_core::TaskId;
use studio_core::TaskInfo;
use studio_core::TokenClaims;
use studio_core::TokenStorage;
use studio_core::TrainingSession;
use studio_core::TrainingSessionId;
use studio_core::ValidationSession;
use studio_core::ValidationSessionId;
use studio_core::resolve_server_url;
use studio_core::server_name;
use time::OffsetDateTime;
use tracing::debug;
use tracing::warn;

use crate::config::Credentials;
use crate::config::Secret;
use crate::transport::RpcRequest;
use crate::transport::Transport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound on pages followed by one paginated listing.
pub const MAX_PAGES: usize = 100_000;

/// Message used when an operation needs a token and none is stored.
const EMPTY_TOKEN: &str = "Empty token";

// ============================================================================
// SECTION: Response Shapes
// ============================================================================

/// `version` result.
#[derive(Deserialize)]
struct VersionResult {
    /// Service version string.
    version: String,
}

/// `auth.login` and `auth.refresh` result.
#[derive(Deserialize)]
struct TokenResult {
    /// Issued session token.
    token: String,
}

/// `task.list` page.
#[derive(Deserialize)]
struct TaskPage {
    /// Tasks on this page.
    tasks: Vec<Task>,
    /// Cursor for the next page.
    #[serde(default)]
    continue_token: Option<String>,
}

/// `samples.list` page.
#[derive(Deserialize)]
struct SamplePage {
    /// Samples on this page.
    samples: Vec<Sample>,
    /// Cursor for the next page.
    #[serde(default)]
    continue_token: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Asynchronous Studio client.
#[derive(Clone)]
pub struct Client {
    /// Service base URL.
    url: String,
    /// Session token storage shared by clones.
    storage: Arc<dyn TokenStorage>,
    /// RPC transport shared by clones.
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("url", &self.url).finish_non_exhaustive()
    }
}

impl Client {
    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Creates an unauthenticated client for the production server with
    /// in-memory token storage.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            url: resolve_server_url(""),
            storage: Arc::new(MemoryTokenStorage::new()),
            transport,
        }
    }

    /// Returns a client with fresh, empty in-memory token storage.
    #[must_use]
    pub fn with_memory_storage(&self) -> Self {
        self.with_storage(Arc::new(MemoryTokenStorage::new()))
    }

    /// Returns a client backed by `storage`.
    ///
    /// A token already held by `storage` makes the new client authenticated.
    /// When that token names its server, the client is pointed there. A
    /// storage read failure is not reported here; the next authenticated
    /// operation surfaces it.
    #[must_use]
    pub fn with_storage(&self, storage: Arc<dyn TokenStorage>) -> Self {
        let url = storage
            .load()
            .ok()
            .flatten()
            .and_then(|token| claimed_server_url(&token))
            .unwrap_or_else(|| self.url.clone());
        Self {
            url,
            storage,
            transport: Arc::clone(&self.transport),
        }
    }

    /// Returns a client pointed at the named server. Auth state is unchanged.
    #[must_use]
    pub fn with_server(&self, name: &str) -> Self {
        self.with_url(resolve_server_url(name))
    }

    /// Returns a client pointed at an explicit URL. Auth state is unchanged.
    #[must_use]
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            storage: Arc::clone(&self.storage),
            transport: Arc::clone(&self.transport),
        }
    }

    /// Stores `token` and returns an authenticated client.
    ///
    /// The server is not contacted. When the token carries a `server` claim
    /// the returned client is pointed at that server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameters`] for an empty token and
    /// [`ClientError::Storage`] when the token cannot be stored.
    pub fn with_token(&self, token: &str) -> Result<Self, ClientError> {
        if token.is_empty() {
            return Err(ClientError::InvalidParameters(EMPTY_TOKEN.to_string()));
        }
        self.storage.store(token)?;
        debug!(url = %self.url, "session token installed");
        Ok(self.repointed_for(token))
    }

    // ------------------------------------------------------------------------
    // Session State
    // ------------------------------------------------------------------------

    /// Returns the service base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the symbolic server name for the current URL.
    #[must_use]
    pub fn server(&self) -> String {
        server_name(&self.url)
    }

    /// Returns the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the storage cannot be read.
    pub fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.storage.load()?.filter(|token| !token.is_empty()))
    }

    /// Returns whether the storage currently holds a token.
    ///
    /// The token is not validated against the server.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_ok_and(|token| token.is_some())
    }

    /// Returns the username claim of the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] without a token, and
    /// [`ClientError::InvalidParameters`] when the token has no readable claims.
    pub fn username(&self) -> Result<Option<String>, ClientError> {
        Ok(self.claims()?.username)
    }

    /// Returns the expiry of the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] without a token, and
    /// [`ClientError::InvalidParameters`] when the token has no readable claims.
    pub fn token_expiration(&self) -> Result<Option<OffsetDateTime>, ClientError> {
        Ok(self.claims()?.expires_at())
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    /// Returns the service version. Does not require a session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn version(&self) -> Result<String, ClientError> {
        let result: VersionResult = self.send("version", json!({}), None).await?;
        Ok(result.version)
    }

    /// Exchanges a username and password for a session token.
    ///
    /// The token is stored only after the exchange succeeds. A store failure
    /// fails the whole login and no authenticated client is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] when credentials are rejected
    /// or the service returns an empty token, and [`ClientError::Storage`]
    /// when the issued token cannot be stored.
    pub async fn with_login(&self, username: &str, password: &str) -> Result<Self, ClientError> {
        let params = json!({
            "username": username,
            "password": password,
        });
        let result: TokenResult = self.send("auth.login", params, None).await?;
        if result.token.is_empty() {
            return Err(ClientError::Authentication(EMPTY_TOKEN.to_string()));
        }
        self.storage.store(&result.token)?;
        debug!(url = %self.url, "login succeeded");
        Ok(self.repointed_for(&result.token))
    }

    /// Authenticates with credentials obtained from the host.
    ///
    /// The credentials' server, when present, is applied first.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::with_token`] or [`Client::with_login`].
    pub async fn with_credentials(&self, credentials: &Credentials) -> Result<Self, ClientError> {
        let target =
            credentials.server.as_deref().map_or_else(|| self.clone(), |name| self.with_server(name));
        match &credentials.secret {
            Secret::Token(token) => target.with_token(token),
            Secret::Password {
                username,
                password,
            } => target.with_login(username, password).await,
        }
    }

    /// Checks the stored token with the service. Storage is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] when no token is stored or the
    /// service rejects it, and [`ClientError::Network`] on transport failure.
    pub async fn verify_token(&self) -> Result<(), ClientError> {
        let _: Value = self.rpc("auth.verify_token", json!({})).await?;
        Ok(())
    }

    /// Exchanges the stored token for a fresh one and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] when no token is stored, the
    /// token has no username claim or the service refuses the refresh.
    pub async fn renew_token(&self) -> Result<(), ClientError> {
        let username = self.claims()?.username.ok_or_else(|| {
            ClientError::Authentication("token has no username claim".to_string())
        })?;
        let result: TokenResult = self.rpc("auth.refresh", json!({ "username": username })).await?;
        if result.token.is_empty() {
            return Err(ClientError::Authentication(EMPTY_TOKEN.to_string()));
        }
        self.storage.store(&result.token)?;
        debug!(url = %self.url, "session token renewed");
        Ok(())
    }

    /// Ends the session.
    ///
    /// The server-side invalidation is best-effort; its failure is logged and
    /// does not stop the local logout. An unreadable token skips the server
    /// call. The storage is then always cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the storage cannot be cleared.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let token = self.token().unwrap_or_else(|err| {
            warn!(url = %self.url, error = %err, "stored token unreadable during logout");
            None
        });
        if let Some(token) = token {
            let request = self.request("auth.logout", json!({}), Some(token));
            if let Err(err) = self.transport.call(request).await {
                warn!(url = %self.url, error = %err, "server-side logout failed");
            }
        }
        self.storage.clear()?;
        debug!(url = %self.url, "logged out");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Organization and Projects
    // ------------------------------------------------------------------------

    /// Returns the organization of the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn organization(&self) -> Result<Organization, ClientError> {
        self.rpc("org.get", json!({})).await
    }

    /// Lists projects, optionally filtered by name on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn projects(&self, name: Option<&str>) -> Result<Vec<Project>, ClientError> {
        self.rpc("project.list", named(json!({}), name)).await
    }

    /// Returns one project.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the project does not exist.
    pub async fn project(&self, project_id: ProjectId) -> Result<Project, ClientError> {
        self.rpc("project.get", json!({ "project_id": project_id })).await
    }

    // ------------------------------------------------------------------------
    // Datasets
    // ------------------------------------------------------------------------

    /// Lists datasets of a project, optionally filtered by name on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn datasets(
        &self,
        project_id: ProjectId,
        name: Option<&str>,
    ) -> Result<Vec<Dataset>, ClientError> {
        self.rpc("dataset.list", named(json!({ "project_id": project_id }), name)).await
    }

    /// Returns one dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the dataset does not exist.
    pub async fn dataset(&self, dataset_id: DatasetId) -> Result<Dataset, ClientError> {
        self.rpc("dataset.get", json!({ "dataset_id": dataset_id })).await
    }

    /// Lists annotation sets of a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn annotation_sets(
        &self,
        dataset_id: DatasetId,
    ) -> Result<Vec<AnnotationSet>, ClientError> {
        self.rpc("annset.list", json!({ "dataset_id": dataset_id })).await
    }

    /// Returns one annotation set.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the annotation set does not exist.
    pub async fn annotation_set(
        &self,
        annotation_set_id: AnnotationSetId,
    ) -> Result<AnnotationSet, ClientError> {
        self.rpc("annset.get", json!({ "annotation_set_id": annotation_set_id })).await
    }

    /// Lists labels defined on a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn labels(&self, dataset_id: DatasetId) -> Result<Vec<Label>, ClientError> {
        self.rpc("label.list", json!({ "dataset_id": dataset_id })).await
    }

    /// Lists samples of a dataset, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when any page fails.
    pub async fn samples(
        &self,
        dataset_id: DatasetId,
        annotation_set_id: Option<AnnotationSetId>,
    ) -> Result<Vec<Sample>, ClientError> {
        let params = with_entry(
            json!({ "dataset_id": dataset_id }),
            "annotation_set_id",
            annotation_set_id.map(|id| json!(id)),
        );
        let mut samples = Vec::new();
        let mut cursor = None;
        for _ in 0 .. MAX_PAGES {
            let page: SamplePage = self.rpc("samples.list", paged(params.clone(), cursor)).await?;
            samples.extend(page.samples);
            match page.continue_token.filter(|token| !token.is_empty()) {
                Some(next) => cursor = Some(next),
                None => return Ok(samples),
            }
        }
        Err(ClientError::Internal("samples.list pagination did not terminate".to_string()))
    }

    // ------------------------------------------------------------------------
    // Experiments and Sessions
    // ------------------------------------------------------------------------

    /// Lists experiments of a project, optionally filtered by name on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn experiments(
        &self,
        project_id: ProjectId,
        name: Option<&str>,
    ) -> Result<Vec<Experiment>, ClientError> {
        self.rpc("trainer.list2", named(json!({ "project_id": project_id }), name)).await
    }

    /// Returns one experiment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the experiment does not exist.
    pub async fn experiment(&self, experiment_id: ExperimentId) -> Result<Experiment, ClientError> {
        self.rpc("trainer.get", json!({ "trainer_id": experiment_id })).await
    }

    /// Lists training sessions of an experiment, optionally filtered by name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn training_sessions(
        &self,
        experiment_id: ExperimentId,
        name: Option<&str>,
    ) -> Result<Vec<TrainingSession>, ClientError> {
        self.rpc("trainer.session.list", named(json!({ "trainer_id": experiment_id }), name)).await
    }

    /// Returns one training session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the session does not exist.
    pub async fn training_session(
        &self,
        session_id: TrainingSessionId,
    ) -> Result<TrainingSession, ClientError> {
        self.rpc("trainer.session.get", json!({ "trainer_session_id": session_id })).await
    }

    /// Returns the metrics recorded for a training session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the session does not exist.
    pub async fn training_session_metrics(
        &self,
        session_id: TrainingSessionId,
    ) -> Result<BTreeMap<String, Parameter>, ClientError> {
        self.rpc("trainer.session.metrics", json!({ "trainer_session_id": session_id })).await
    }

    /// Replaces the metrics recorded for a training session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the session does not exist.
    pub async fn set_training_session_metrics(
        &self,
        session_id: TrainingSessionId,
        metrics: &BTreeMap<String, Parameter>,
    ) -> Result<(), ClientError> {
        let params = json!({
            "trainer_session_id": session_id,
            "metrics": metrics,
        });
        let _: Value = self.rpc("trainer.session.set_metrics", params).await?;
        Ok(())
    }

    /// Lists artifacts produced by a training session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn artifacts(
        &self,
        session_id: TrainingSessionId,
    ) -> Result<Vec<Artifact>, ClientError> {
        self.rpc("trainer.get_artifacts", json!({ "training_session_id": session_id })).await
    }

    /// Lists validation sessions of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn validation_sessions(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ValidationSession>, ClientError> {
        self.rpc("validate.session.list", json!({ "project_id": project_id })).await
    }

    /// Returns one validation session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the session does not exist.
    pub async fn validation_session(
        &self,
        session_id: ValidationSessionId,
    ) -> Result<ValidationSession, ClientError> {
        self.rpc("validate.session.get", json!({ "validate_session_id": session_id })).await
    }

    // ------------------------------------------------------------------------
    // Snapshots and Tasks
    // ------------------------------------------------------------------------

    /// Lists snapshots, optionally filtered by name on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub async fn snapshots(&self, name: Option<&str>) -> Result<Vec<Snapshot>, ClientError> {
        self.rpc("snapshots.list", named(json!({}), name)).await
    }

    /// Returns one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the snapshot does not exist.
    pub async fn snapshot(&self, snapshot_id: SnapshotId) -> Result<Snapshot, ClientError> {
        self.rpc("snapshots.get", json!({ "snapshot_id": snapshot_id })).await
    }

    /// Lists tasks matching `filter`, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when any page fails.
    pub async fn tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ClientError> {
        let params = serde_json::to_value(filter)
            .map_err(|err| ClientError::InvalidParameters(format!("task filter: {err}")))?;
        let mut tasks = Vec::new();
        let mut cursor = None;
        for _ in 0 .. MAX_PAGES {
            let page: TaskPage = self.rpc("task.list", paged(params.clone(), cursor)).await?;
            tasks.extend(page.tasks);
            match page.continue_token.filter(|token| !token.is_empty()) {
                Some(next) => cursor = Some(next),
                None => return Ok(tasks),
            }
        }
        Err(ClientError::Internal("task.list pagination did not terminate".to_string()))
    }

    /// Returns detailed information for one task.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the task does not exist.
    pub async fn task_info(&self, task_id: TaskId) -> Result<TaskInfo, ClientError> {
        self.rpc("task.get", json!({ "id": task_id })).await
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Returns a clone pointed at the server named by `token`, if any.
    fn repointed_for(&self, token: &str) -> Self {
        claimed_server_url(token).map_or_else(|| self.clone(), |url| self.with_url(url))
    }

    /// Decodes the claims of the stored token.
    fn claims(&self) -> Result<TokenClaims, ClientError> {
        let token = self.require_token()?;
        TokenClaims::decode(&token)
    }

    /// Returns the stored token or an authentication error.
    fn require_token(&self) -> Result<String, ClientError> {
        self.token()?.ok_or_else(|| ClientError::Authentication(EMPTY_TOKEN.to_string()))
    }

    /// Issues an authenticated call and decodes its result.
    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ClientError> {
        let token = self.require_token()?;
        self.send(method, params, Some(token)).await
    }

    /// Issues a call and decodes its result.
    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        bearer_token: Option<String>,
    ) -> Result<T, ClientError> {
        debug!(method, url = %self.url, "studio rpc");
        let request = self.request(method, params, bearer_token);
        let result = self.transport.call(request).await?;
        serde_json::from_value(result)
            .map_err(|err| ClientError::Internal(format!("invalid {method} response: {err}")))
    }

    /// Builds a request against the current URL.
    fn request(&self, method: &str, params: Value, bearer_token: Option<String>) -> RpcRequest {
        RpcRequest {
            endpoint: self.url.clone(),
            method: method.to_string(),
            params,
            bearer_token,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the URL of the server named in a token's claims.
fn claimed_server_url(token: &str) -> Option<String> {
    TokenClaims::decode(token).ok()?.server.map(|name| resolve_server_url(&name))
}

/// Adds an optional `name` filter to an object of parameters.
fn named(params: Value, name: Option<&str>) -> Value {
    with_entry(params, "name", name.map(Value::from))
}

/// Adds an optional `continue_token` cursor to an object of parameters.
fn paged(params: Value, cursor: Option<String>) -> Value {
    with_entry(params, "continue_token", cursor.map(Value::from))
}

/// Inserts `key` into an object of parameters when `value` is present.
fn with_entry(params: Value, key: &str, value: Option<Value>) -> Value {
    match (params, value) {
        (Value::Object(mut object), Some(value)) => {
            object.insert(key.to_string(), value);
            Value::Object(object)
        }
        (Value::Null, Some(value)) => {
            let mut object = Map::new();
            object.insert(key.to_string(), value);
            Value::Object(object)
        }
        (params, _) => params,
    }
}
