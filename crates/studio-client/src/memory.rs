// crates/studio-client/src/memory.rs
// ============================================================================
// Module: In-Memory Studio
// Description: Reference Studio service answering client RPCs from fixtures.
// Purpose: Exercise the full client surface without a network.
// Dependencies: async-trait, serde_json, studio-core, time, tokio
// ============================================================================

//! ## Overview
//! [`InMemoryStudio`] implements [`Transport`] over a fixture held behind an
//! `Arc<Mutex<..>>`. It plays the server role for hosts that want a local
//! stand-in and for this crate's tests: it issues JWT-shaped tokens, enforces
//! authentication, answers every RPC the client issues, paginates listings,
//! and can be switched offline or slowed down.
//!
//! Name filters follow the service: case-insensitive substring match, with
//! exact matches first, then case-insensitive exact matches, then shorter
//! names, then alphabetical order.
//!
//! Invariants:
//! - Requests addressed to another endpoint fail as network errors.
//! - Revoked, unknown and expired tokens are rejected as authentication errors.
//! - Clones share one fixture.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use studio_core::Annotation;
use studio_core::AnnotationSet;
use studio_core::AnnotationSetId;
use studio_core::Artifact;
use studio_core::Dataset;
use studio_core::DatasetId;
use studio_core::Experiment;
use studio_core::ExperimentId;
use studio_core::Id;
use studio_core::IdKind;
use studio_core::Label;
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
use studio_core::TrainingSession;
use studio_core::TrainingSessionId;
use studio_core::ValidationSession;
use studio_core::ValidationSessionId;
use studio_core::resolve_server_url;
use studio_core::server::SAAS_SERVER;
use time::OffsetDateTime;

use crate::transport::CODE_AUTHENTICATION_FAILED;
use crate::transport::CODE_INVALID_PARAMS;
use crate::transport::CODE_METHOD_NOT_FOUND;
use crate::transport::CODE_NOT_FOUND;
use crate::transport::CODE_TOKEN_EXPIRED;
use crate::transport::RpcRequest;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default lifetime of issued tokens in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
/// Default number of entries per page for paginated listings.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Version string reported by default.
pub const DEFAULT_VERSION: &str = "in-memory";

// ============================================================================
// SECTION: Fixture State
// ============================================================================

/// Everything the in-memory service knows.
#[derive(Debug)]
struct StudioState {
    /// Symbolic server name stamped into tokens.
    server: String,
    /// Endpoint URL requests must target.
    url: String,
    /// Reported service version.
    version: String,
    /// Lifetime of issued tokens.
    token_ttl_secs: i64,
    /// Entries per page.
    page_size: usize,
    /// Registered accounts (username to password).
    users: BTreeMap<String, String>,
    /// Live sessions (token to username).
    sessions: BTreeMap<String, String>,
    /// Number of tokens issued so far.
    issued: u64,
    /// Organization of every account.
    organization: Option<Organization>,
    /// Projects in insertion order.
    projects: Vec<Project>,
    /// Datasets in insertion order.
    datasets: Vec<Dataset>,
    /// Annotation sets in insertion order.
    annotation_sets: Vec<AnnotationSet>,
    /// Labels in insertion order.
    labels: Vec<Label>,
    /// Experiments in insertion order.
    experiments: Vec<Experiment>,
    /// Training sessions in insertion order.
    training_sessions: Vec<TrainingSession>,
    /// Metrics per training session.
    metrics: BTreeMap<TrainingSessionId, BTreeMap<String, Parameter>>,
    /// Artifacts per training session.
    artifacts: BTreeMap<TrainingSessionId, Vec<Artifact>>,
    /// Validation sessions in insertion order.
    validation_sessions: Vec<ValidationSession>,
    /// Snapshots in insertion order.
    snapshots: Vec<Snapshot>,
    /// Task summaries in insertion order.
    tasks: Vec<Task>,
    /// Task details in insertion order.
    task_infos: Vec<TaskInfo>,
    /// Samples per dataset.
    samples: BTreeMap<DatasetId, Vec<Sample>>,
    /// Annotations per annotation set.
    annotations: BTreeMap<AnnotationSetId, Vec<Annotation>>,
    /// Whether every call fails as a network error.
    offline: bool,
    /// Delay applied before answering.
    latency: Duration,
    /// Methods received, in order.
    calls: Vec<String>,
}

// ============================================================================
// SECTION: In-Memory Studio
// ============================================================================

/// In-memory Studio service.
#[derive(Debug, Clone)]
pub struct InMemoryStudio {
    /// Shared fixture.
    state: Arc<Mutex<StudioState>>,
}

impl Default for InMemoryStudio {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStudio {
    /// Creates an empty production (`saas`) service.
    #[must_use]
    pub fn new() -> Self {
        Self::for_server(SAAS_SERVER)
    }

    /// Creates an empty service answering for the named server.
    #[must_use]
    pub fn for_server(name: &str) -> Self {
        let server = if name.is_empty() { SAAS_SERVER } else { name };
        let state = StudioState {
            server: server.to_string(),
            url: resolve_server_url(server),
            version: DEFAULT_VERSION.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            users: BTreeMap::new(),
            sessions: BTreeMap::new(),
            issued: 0,
            organization: None,
            projects: Vec::new(),
            datasets: Vec::new(),
            annotation_sets: Vec::new(),
            labels: Vec::new(),
            experiments: Vec::new(),
            training_sessions: Vec::new(),
            metrics: BTreeMap::new(),
            artifacts: BTreeMap::new(),
            validation_sessions: Vec::new(),
            snapshots: Vec::new(),
            tasks: Vec::new(),
            task_infos: Vec::new(),
            samples: BTreeMap::new(),
            annotations: BTreeMap::new(),
            offline: false,
            latency: Duration::ZERO,
            calls: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Locks the fixture. A poisoned lock still yields the fixture.
    fn state(&self) -> MutexGuard<'_, StudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `edit` to the fixture and returns `self` for chaining.
    fn edit(self, edit: impl FnOnce(&mut StudioState)) -> Self {
        edit(&mut self.state());
        self
    }

    // ------------------------------------------------------------------------
    // Fixture Builders
    // ------------------------------------------------------------------------

    /// Sets the reported service version.
    #[must_use]
    pub fn with_version(self, version: &str) -> Self {
        self.edit(|state| state.version = version.to_string())
    }

    /// Registers an account.
    #[must_use]
    pub fn with_user(self, username: &str, password: &str) -> Self {
        self.edit(|state| {
            state.users.insert(username.to_string(), password.to_string());
        })
    }

    /// Sets the lifetime of tokens issued from now on. Negative values issue
    /// already-expired tokens.
    #[must_use]
    pub fn with_token_ttl(self, seconds: i64) -> Self {
        self.edit(|state| state.token_ttl_secs = seconds)
    }

    /// Sets the page size of paginated listings (at least one).
    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.edit(|state| state.page_size = page_size.max(1))
    }

    /// Sets the organization.
    #[must_use]
    pub fn with_organization(self, organization: Organization) -> Self {
        self.edit(|state| state.organization = Some(organization))
    }

    /// Adds a project.
    #[must_use]
    pub fn with_project(self, project: Project) -> Self {
        self.edit(|state| state.projects.push(project))
    }

    /// Adds a dataset.
    #[must_use]
    pub fn with_dataset(self, dataset: Dataset) -> Self {
        self.edit(|state| state.datasets.push(dataset))
    }

    /// Adds an annotation set.
    #[must_use]
    pub fn with_annotation_set(self, annotation_set: AnnotationSet) -> Self {
        self.edit(|state| state.annotation_sets.push(annotation_set))
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(self, label: Label) -> Self {
        self.edit(|state| state.labels.push(label))
    }

    /// Adds an experiment.
    #[must_use]
    pub fn with_experiment(self, experiment: Experiment) -> Self {
        self.edit(|state| state.experiments.push(experiment))
    }

    /// Adds a training session.
    #[must_use]
    pub fn with_training_session(self, session: TrainingSession) -> Self {
        self.edit(|state| state.training_sessions.push(session))
    }

    /// Sets the metrics of a training session.
    #[must_use]
    pub fn with_metrics(
        self,
        session_id: TrainingSessionId,
        metrics: BTreeMap<String, Parameter>,
    ) -> Self {
        self.edit(|state| {
            state.metrics.insert(session_id, metrics);
        })
    }

    /// Adds an artifact to a training session.
    #[must_use]
    pub fn with_artifact(self, session_id: TrainingSessionId, artifact: Artifact) -> Self {
        self.edit(|state| state.artifacts.entry(session_id).or_default().push(artifact))
    }

    /// Adds a validation session.
    #[must_use]
    pub fn with_validation_session(self, session: ValidationSession) -> Self {
        self.edit(|state| state.validation_sessions.push(session))
    }

    /// Adds a snapshot.
    #[must_use]
    pub fn with_snapshot(self, snapshot: Snapshot) -> Self {
        self.edit(|state| state.snapshots.push(snapshot))
    }

    /// Adds a task summary.
    #[must_use]
    pub fn with_task(self, task: Task) -> Self {
        self.edit(|state| state.tasks.push(task))
    }

    /// Adds task details.
    #[must_use]
    pub fn with_task_info(self, info: TaskInfo) -> Self {
        self.edit(|state| state.task_infos.push(info))
    }

    /// Adds a sample to a dataset.
    ///
    /// Annotations carried by `sample` are ignored; listings attach the
    /// annotations of the requested set instead.
    #[must_use]
    pub fn with_sample(self, dataset_id: DatasetId, mut sample: Sample) -> Self {
        sample.annotations.clear();
        self.edit(|state| state.samples.entry(dataset_id).or_default().push(sample))
    }

    /// Adds an annotation to an annotation set.
    ///
    /// The annotation attaches to the sample whose id equals its `sample_id`,
    /// or, without one, to the sample whose image name equals its `name`.
    #[must_use]
    pub fn with_annotation(self, set_id: AnnotationSetId, annotation: Annotation) -> Self {
        self.edit(|state| state.annotations.entry(set_id).or_default().push(annotation))
    }

    // ------------------------------------------------------------------------
    // Runtime Controls
    // ------------------------------------------------------------------------

    /// Returns the endpoint URL this service answers on.
    #[must_use]
    pub fn url(&self) -> String {
        self.state().url.clone()
    }

    /// Makes every subsequent call fail (or succeed again) at the network layer.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Delays every subsequent answer by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = latency;
    }

    /// Returns the methods received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }

    /// Revokes every live session.
    pub fn revoke_all_sessions(&self) {
        self.state().sessions.clear();
    }

    /// Issues a session token for a registered account without a login call.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Rpc`] when the account does not exist.
    pub fn issue_token(&self, username: &str) -> Result<String, TransportError> {
        let mut state = self.state();
        if !state.users.contains_key(username) {
            return Err(rpc_error(CODE_AUTHENTICATION_FAILED, "unknown user"));
        }
        state.issue(username)
    }
}

#[async_trait]
impl Transport for InMemoryStudio {
    async fn call(&self, request: RpcRequest) -> Result<Value, TransportError> {
        let latency = self.state().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state();
        state.calls.push(request.method.clone());
        if state.offline {
            return Err(TransportError::Network("studio is offline".to_string()));
        }
        if request.endpoint != state.url {
            return Err(TransportError::Network(format!("no route to {}", request.endpoint)));
        }
        state.dispatch(&request)
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

impl StudioState {
    /// Routes one request to its handler.
    fn dispatch(&mut self, request: &RpcRequest) -> Result<Value, TransportError> {
        let params = &request.params;
        match request.method.as_str() {
            "version" => Ok(json!({ "version": self.version })),
            "auth.login" => self.login(params),
            method => {
                let (token, username) = self.authorize(request)?;
                match method {
                    "auth.verify_token" => Ok(json!({})),
                    "auth.refresh" => self.refresh(params, &token, &username),
                    "auth.logout" => {
                        self.sessions.remove(&token);
                        Ok(json!({}))
                    }
                    _ => self.dispatch_data(method, params),
                }
            }
        }
    }

    /// Routes an authenticated data request.
    fn dispatch_data(&mut self, method: &str, params: &Value) -> Result<Value, TransportError> {
        match method {
            "org.get" => self
                .organization
                .as_ref()
                .map_or_else(|| Err(not_found("organization")), encode),
            "project.list" => {
                encode(&filter_by_name(self.projects.iter(), name_param(params), |p| &p.name))
            }
            "project.get" => {
                let id: ProjectId = id_param(params, "project_id")?;
                find(&self.projects, |p| p.id == id, "project")
            }
            "dataset.list" => {
                let id: ProjectId = id_param(params, "project_id")?;
                require(self.projects.iter().any(|p| p.id == id), "project")?;
                let scoped = self.datasets.iter().filter(|d| d.project_id == id);
                encode(&filter_by_name(scoped, name_param(params), |d| &d.name))
            }
            "dataset.get" => {
                let id: DatasetId = id_param(params, "dataset_id")?;
                find(&self.datasets, |d| d.id == id, "dataset")
            }
            "annset.list" => {
                let id: DatasetId = id_param(params, "dataset_id")?;
                require(self.datasets.iter().any(|d| d.id == id), "dataset")?;
                encode(&collect(&self.annotation_sets, |a| a.dataset_id == id))
            }
            "annset.get" => {
                let id: AnnotationSetId = id_param(params, "annotation_set_id")?;
                find(&self.annotation_sets, |a| a.id == id, "annotation set")
            }
            "label.list" => {
                let id: DatasetId = id_param(params, "dataset_id")?;
                require(self.datasets.iter().any(|d| d.id == id), "dataset")?;
                encode(&collect(&self.labels, |l| l.dataset_id == id))
            }
            "samples.list" => self.samples_page(params),
            _ => self.dispatch_training(method, params),
        }
    }

    /// Routes an authenticated experiment, snapshot or task request.
    fn dispatch_training(&mut self, method: &str, params: &Value) -> Result<Value, TransportError> {
        match method {
            "trainer.list2" => {
                let id: ProjectId = id_param(params, "project_id")?;
                require(self.projects.iter().any(|p| p.id == id), "project")?;
                let scoped = self.experiments.iter().filter(|e| e.project_id == id);
                encode(&filter_by_name(scoped, name_param(params), |e| &e.name))
            }
            "trainer.get" => {
                let id: ExperimentId = id_param(params, "trainer_id")?;
                find(&self.experiments, |e| e.id == id, "experiment")
            }
            "trainer.session.list" => {
                let id: ExperimentId = id_param(params, "trainer_id")?;
                require(self.experiments.iter().any(|e| e.id == id), "experiment")?;
                let scoped = self.training_sessions.iter().filter(|s| s.experiment_id == id);
                encode(&filter_by_name(scoped, name_param(params), |s| &s.name))
            }
            "trainer.session.get" => {
                let id: TrainingSessionId = id_param(params, "trainer_session_id")?;
                find(&self.training_sessions, |s| s.id == id, "training session")
            }
            "trainer.session.metrics" => {
                let id = self.training_session_param(params, "trainer_session_id")?;
                encode(&self.metrics.get(&id).cloned().unwrap_or_default())
            }
            "trainer.session.set_metrics" => {
                let id = self.training_session_param(params, "trainer_session_id")?;
                let metrics: BTreeMap<String, Parameter> = params
                    .get("metrics")
                    .cloned()
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|err| rpc_error(CODE_INVALID_PARAMS, &format!("metrics: {err}")))?
                    .ok_or_else(|| rpc_error(CODE_INVALID_PARAMS, "missing metrics"))?;
                self.metrics.insert(id, metrics);
                Ok(json!({}))
            }
            "trainer.get_artifacts" => {
                let id = self.training_session_param(params, "training_session_id")?;
                encode(&self.artifacts.get(&id).cloned().unwrap_or_default())
            }
            "validate.session.list" => {
                let id: ProjectId = id_param(params, "project_id")?;
                require(self.projects.iter().any(|p| p.id == id), "project")?;
                let experiments: Vec<ExperimentId> = self
                    .experiments
                    .iter()
                    .filter(|e| e.project_id == id)
                    .map(|e| e.id)
                    .collect();
                encode(&collect(&self.validation_sessions, |v| experiments.contains(&v.experiment_id)))
            }
            "validate.session.get" => {
                let id: ValidationSessionId = id_param(params, "validate_session_id")?;
                find(&self.validation_sessions, |v| v.id == id, "validation session")
            }
            "snapshots.list" => encode(&filter_by_name(
                self.snapshots.iter(),
                name_param(params),
                |s| &s.description,
            )),
            "snapshots.get" => {
                let id: SnapshotId = id_param(params, "snapshot_id")?;
                find(&self.snapshots, |s| s.id == id, "snapshot")
            }
            "task.list" => self.tasks_page(params),
            "task.get" => {
                let id: TaskId = id_param(params, "id")?;
                find(&self.task_infos, |t| t.id == id, "task")
            }
            other => Err(rpc_error(CODE_METHOD_NOT_FOUND, &format!("method not found: {other}"))),
        }
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    /// Handles `auth.login`.
    fn login(&mut self, params: &Value) -> Result<Value, TransportError> {
        let username = str_param(params, "username")?;
        let password = str_param(params, "password")?;
        if self.users.get(username).is_none_or(|expected| expected != password) {
            return Err(rpc_error(CODE_AUTHENTICATION_FAILED, "invalid username or password"));
        }
        let token = self.issue(username)?;
        Ok(json!({ "token": token }))
    }

    /// Handles `auth.refresh`, replacing the caller's token.
    fn refresh(
        &mut self,
        params: &Value,
        token: &str,
        session_user: &str,
    ) -> Result<Value, TransportError> {
        let username = str_param(params, "username")?;
        if username != session_user {
            return Err(rpc_error(CODE_AUTHENTICATION_FAILED, "username does not match session"));
        }
        self.sessions.remove(token);
        let renewed = self.issue(username)?;
        Ok(json!({ "token": renewed }))
    }

    /// Mints and records a token for `username`.
    fn issue(&mut self, username: &str) -> Result<String, TransportError> {
        self.issued += 1;
        let claims = TokenClaims {
            server: Some(self.server.clone()),
            username: Some(username.to_string()),
            exp: Some(OffsetDateTime::now_utc().unix_timestamp() + self.token_ttl_secs),
        };
        let token = claims
            .encode_unsigned(&format!("mem{}", self.issued))
            .map_err(|err| TransportError::Protocol(err.to_string()))?;
        self.sessions.insert(token.clone(), username.to_string());
        Ok(token)
    }

    /// Checks the bearer token and returns it with its account.
    fn authorize(&self, request: &RpcRequest) -> Result<(String, String), TransportError> {
        let token = request
            .bearer_token
            .as_deref()
            .ok_or_else(|| rpc_error(CODE_AUTHENTICATION_FAILED, "missing token"))?;
        let username = self
            .sessions
            .get(token)
            .ok_or_else(|| rpc_error(CODE_AUTHENTICATION_FAILED, "invalid or revoked token"))?;
        let expired = TokenClaims::decode(token)
            .ok()
            .and_then(|claims| claims.exp)
            .is_some_and(|exp| exp <= OffsetDateTime::now_utc().unix_timestamp());
        if expired {
            return Err(rpc_error(CODE_TOKEN_EXPIRED, "token expired"));
        }
        Ok((token.to_string(), username.clone()))
    }

    // ------------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------------

    /// Handles one `task.list` page.
    fn tasks_page(&self, params: &Value) -> Result<Value, TransportError> {
        let filter: TaskFilter = serde_json::from_value(params.clone())
            .map_err(|err| rpc_error(CODE_INVALID_PARAMS, &format!("task filter: {err}")))?;
        let matches = |allowed: Option<&Vec<String>>, value: Option<&str>| {
            allowed.is_none_or(|allowed| value.is_some_and(|value| allowed.iter().any(|a| a == value)))
        };
        let selected = collect(&self.tasks, |task| {
            matches(filter.workflows.as_ref(), Some(task.workflow.as_str()))
                && matches(filter.managers.as_ref(), task.manager.as_deref())
                && matches(filter.statuses.as_ref(), Some(task.status.as_str()))
        });
        let (tasks, continue_token) = page(&selected, cursor_param(params), self.page_size)?;
        Ok(json!({
            "tasks": encode(&tasks)?,
            "continue_token": continue_token,
        }))
    }

    /// Handles one `samples.list` page.
    fn samples_page(&self, params: &Value) -> Result<Value, TransportError> {
        let dataset_id: DatasetId = id_param(params, "dataset_id")?;
        require(self.datasets.iter().any(|d| d.id == dataset_id), "dataset")?;
        let annotations = if params.get("annotation_set_id").is_some() {
            let set_id: AnnotationSetId = id_param(params, "annotation_set_id")?;
            let belongs =
                self.annotation_sets.iter().any(|a| a.id == set_id && a.dataset_id == dataset_id);
            require(belongs, "annotation set")?;
            self.annotations.get(&set_id).map_or(&[][..], Vec::as_slice)
        } else {
            &[][..]
        };
        let all = self.samples.get(&dataset_id).map_or(&[][..], Vec::as_slice);
        let (mut samples, continue_token) = page(all, cursor_param(params), self.page_size)?;
        for sample in &mut samples {
            let attached = collect(annotations, |annotation| annotates(annotation, sample));
            sample.annotations = attached;
        }
        Ok(json!({
            "samples": encode(&samples)?,
            "continue_token": continue_token,
        }))
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Reads a training session id parameter and checks that it exists.
    fn training_session_param(
        &self,
        params: &Value,
        key: &str,
    ) -> Result<TrainingSessionId, TransportError> {
        let id = id_param(params, key)?;
        require(self.training_sessions.iter().any(|s| s.id == id), "training session")?;
        Ok(id)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a JSON-RPC error.
fn rpc_error(code: i64, message: &str) -> TransportError {
    TransportError::Rpc {
        code,
        message: message.to_string(),
    }
}

/// Builds a not-found error for an entity description.
fn not_found(what: &str) -> TransportError {
    rpc_error(CODE_NOT_FOUND, &format!("{what} not found"))
}

/// Fails with not-found unless `exists`.
fn require(exists: bool, what: &str) -> Result<(), TransportError> {
    if exists { Ok(()) } else { Err(not_found(what)) }
}

/// Serializes a response value.
fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, TransportError> {
    serde_json::to_value(value).map_err(|err| TransportError::Protocol(err.to_string()))
}

/// Returns whether `annotation` belongs to `sample`.
fn annotates(annotation: &Annotation, sample: &Sample) -> bool {
    match annotation.sample_id {
        Some(id) => sample.id == Some(id),
        None => annotation.name.is_some() && annotation.name == sample.image_name,
    }
}

/// Returns clones of the entries matching `predicate`.
fn collect<T: Clone>(items: &[T], predicate: impl Fn(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// Serializes the first entry matching `predicate`.
fn find<T: Serialize>(
    items: &[T],
    predicate: impl Fn(&T) -> bool,
    what: &str,
) -> Result<Value, TransportError> {
    items.iter().find(|item| predicate(item)).map_or_else(|| Err(not_found(what)), encode)
}

/// Reads a numeric identifier parameter.
fn id_param<K: IdKind>(params: &Value, key: &str) -> Result<Id<K>, TransportError> {
    params
        .get(key)
        .and_then(Value::as_u64)
        .map(Id::new)
        .ok_or_else(|| rpc_error(CODE_INVALID_PARAMS, &format!("missing or invalid {key}")))
}

/// Reads a string parameter.
fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, TransportError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| rpc_error(CODE_INVALID_PARAMS, &format!("missing or invalid {key}")))
}

/// Reads the optional `name` filter.
fn name_param(params: &Value) -> Option<&str> {
    params.get("name").and_then(Value::as_str)
}

/// Reads the optional pagination cursor.
fn cursor_param(params: &Value) -> Option<&str> {
    params.get("continue_token").and_then(Value::as_str)
}

/// Applies the service's name filter and ordering.
fn filter_by_name<'a, T: Clone + 'a>(
    items: impl Iterator<Item = &'a T>,
    name: Option<&str>,
    key: fn(&T) -> &String,
) -> Vec<T> {
    let Some(name) = name else {
        return items.cloned().collect();
    };
    let needle = name.to_lowercase();
    let mut matched: Vec<T> =
        items.filter(|item| key(item).to_lowercase().contains(&needle)).cloned().collect();
    matched.sort_by(|left, right| {
        let (left, right) = (key(left), key(right));
        (left != name)
            .cmp(&(right != name))
            .then_with(|| (left.to_lowercase() != needle).cmp(&(right.to_lowercase() != needle)))
            .then_with(|| left.len().cmp(&right.len()))
            .then_with(|| left.cmp(right))
    });
    matched
}

/// Slices one page starting at `cursor` and returns the next cursor.
fn page<T: Clone>(
    items: &[T],
    cursor: Option<&str>,
    page_size: usize,
) -> Result<(Vec<T>, Option<String>), TransportError> {
    let start = match cursor {
        None | Some("") => 0,
        Some(cursor) => cursor
            .parse::<usize>()
            .ok()
            .filter(|start| *start <= items.len())
            .ok_or_else(|| rpc_error(CODE_INVALID_PARAMS, "invalid continue_token"))?,
    };
    let end = start.saturating_add(page_size).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    Ok((items[start .. end].to_vec(), next))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
