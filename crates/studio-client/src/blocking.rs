// crates/studio-client/src/blocking.rs
// ============================================================================
// Module: Blocking Studio Client
// Description: Synchronous wrapper over the asynchronous client.
// Purpose: Serve hosts without an async runtime from the same implementation.
// Dependencies: studio-core, tokio
// ============================================================================

//! ## Overview
//! [`BlockingClient`] owns a current-thread Tokio runtime and runs each
//! [`Client`] future to completion on it. Results and errors are identical to
//! the asynchronous form because the same futures run underneath.
//!
//! Do not call a blocking client from inside an async runtime: blocking on a
//! runtime from one of its own worker threads panics in Tokio.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use studio_core::AnnotationSet;
use studio_core::AnnotationSetId;
use studio_core::Artifact;
use studio_core::ClientError;
use studio_core::Dataset;
use studio_core::DatasetId;
use studio_core::Experiment;
use studio_core::ExperimentId;
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
use studio_core::TokenStorage;
use studio_core::TrainingSession;
use studio_core::TrainingSessionId;
use studio_core::ValidationSession;
use studio_core::ValidationSessionId;
use time::OffsetDateTime;
use tokio::runtime::Builder;
use tokio::runtime::Runtime;

use crate::client::Client;
use crate::config::Credentials;
use crate::transport::Transport;

// ============================================================================
// SECTION: Blocking Client
// ============================================================================

/// Synchronous Studio client.
///
/// # Invariants
/// - Clones and derived clients share one runtime.
#[derive(Debug, Clone)]
pub struct BlockingClient {
    /// Asynchronous client doing the work.
    inner: Client,
    /// Runtime driving the futures.
    runtime: Arc<Runtime>,
}

impl BlockingClient {
    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Creates an unauthenticated client for the production server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Internal`] when the runtime cannot be started.
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        Self::from_async(Client::new(transport))
    }

    /// Wraps an existing asynchronous client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Internal`] when the runtime cannot be started.
    pub fn from_async(inner: Client) -> Result<Self, ClientError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ClientError::Internal(format!("failed to start runtime: {err}")))?;
        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// Returns the wrapped asynchronous client.
    #[must_use]
    pub fn into_async(self) -> Client {
        self.inner
    }

    /// Borrows the wrapped asynchronous client.
    #[must_use]
    pub const fn as_async(&self) -> &Client {
        &self.inner
    }

    /// Wraps a derived client around the shared runtime.
    fn derive(&self, inner: Client) -> Self {
        Self {
            inner,
            runtime: Arc::clone(&self.runtime),
        }
    }

    /// Runs `future` to completion.
    fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    /// See [`Client::with_memory_storage`].
    #[must_use]
    pub fn with_memory_storage(&self) -> Self {
        self.derive(self.inner.with_memory_storage())
    }

    /// See [`Client::with_storage`].
    #[must_use]
    pub fn with_storage(&self, storage: Arc<dyn TokenStorage>) -> Self {
        self.derive(self.inner.with_storage(storage))
    }

    /// See [`Client::with_server`].
    #[must_use]
    pub fn with_server(&self, name: &str) -> Self {
        self.derive(self.inner.with_server(name))
    }

    /// See [`Client::with_url`].
    #[must_use]
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        self.derive(self.inner.with_url(url))
    }

    /// See [`Client::with_token`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::with_token`].
    pub fn with_token(&self, token: &str) -> Result<Self, ClientError> {
        Ok(self.derive(self.inner.with_token(token)?))
    }

    /// See [`Client::with_login`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::with_login`].
    pub fn with_login(&self, username: &str, password: &str) -> Result<Self, ClientError> {
        let inner = self.run(self.inner.with_login(username, password))?;
        Ok(self.derive(inner))
    }

    /// See [`Client::with_credentials`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::with_credentials`].
    pub fn with_credentials(&self, credentials: &Credentials) -> Result<Self, ClientError> {
        let inner = self.run(self.inner.with_credentials(credentials))?;
        Ok(self.derive(inner))
    }

    // ------------------------------------------------------------------------
    // Session State
    // ------------------------------------------------------------------------

    /// Returns the service base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.inner.url()
    }

    /// Returns the symbolic server name for the current URL.
    #[must_use]
    pub fn server(&self) -> String {
        self.inner.server()
    }

    /// See [`Client::token`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the storage cannot be read.
    pub fn token(&self) -> Result<Option<String>, ClientError> {
        self.inner.token()
    }

    /// Returns whether the storage currently holds a token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated()
    }

    /// See [`Client::username`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::username`].
    pub fn username(&self) -> Result<Option<String>, ClientError> {
        self.inner.username()
    }

    /// See [`Client::token_expiration`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::token_expiration`].
    pub fn token_expiration(&self) -> Result<Option<OffsetDateTime>, ClientError> {
        self.inner.token_expiration()
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// See [`Client::version`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::version`].
    pub fn version(&self) -> Result<String, ClientError> {
        self.run(self.inner.version())
    }

    /// See [`Client::verify_token`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::verify_token`].
    pub fn verify_token(&self) -> Result<(), ClientError> {
        self.run(self.inner.verify_token())
    }

    /// See [`Client::renew_token`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::renew_token`].
    pub fn renew_token(&self) -> Result<(), ClientError> {
        self.run(self.inner.renew_token())
    }

    /// See [`Client::logout`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::logout`].
    pub fn logout(&self) -> Result<(), ClientError> {
        self.run(self.inner.logout())
    }

    /// See [`Client::organization`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::organization`].
    pub fn organization(&self) -> Result<Organization, ClientError> {
        self.run(self.inner.organization())
    }

    /// See [`Client::projects`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::projects`].
    pub fn projects(&self, name: Option<&str>) -> Result<Vec<Project>, ClientError> {
        self.run(self.inner.projects(name))
    }

    /// See [`Client::project`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::project`].
    pub fn project(&self, project_id: ProjectId) -> Result<Project, ClientError> {
        self.run(self.inner.project(project_id))
    }

    /// See [`Client::datasets`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::datasets`].
    pub fn datasets(
        &self,
        project_id: ProjectId,
        name: Option<&str>,
    ) -> Result<Vec<Dataset>, ClientError> {
        self.run(self.inner.datasets(project_id, name))
    }

    /// See [`Client::dataset`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::dataset`].
    pub fn dataset(&self, dataset_id: DatasetId) -> Result<Dataset, ClientError> {
        self.run(self.inner.dataset(dataset_id))
    }

    /// See [`Client::annotation_sets`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::annotation_sets`].
    pub fn annotation_sets(&self, dataset_id: DatasetId) -> Result<Vec<AnnotationSet>, ClientError> {
        self.run(self.inner.annotation_sets(dataset_id))
    }

    /// See [`Client::annotation_set`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::annotation_set`].
    pub fn annotation_set(
        &self,
        annotation_set_id: AnnotationSetId,
    ) -> Result<AnnotationSet, ClientError> {
        self.run(self.inner.annotation_set(annotation_set_id))
    }

    /// See [`Client::labels`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::labels`].
    pub fn labels(&self, dataset_id: DatasetId) -> Result<Vec<Label>, ClientError> {
        self.run(self.inner.labels(dataset_id))
    }

    /// See [`Client::samples`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::samples`].
    pub fn samples(
        &self,
        dataset_id: DatasetId,
        annotation_set_id: Option<AnnotationSetId>,
    ) -> Result<Vec<Sample>, ClientError> {
        self.run(self.inner.samples(dataset_id, annotation_set_id))
    }

    /// See [`Client::experiments`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::experiments`].
    pub fn experiments(
        &self,
        project_id: ProjectId,
        name: Option<&str>,
    ) -> Result<Vec<Experiment>, ClientError> {
        self.run(self.inner.experiments(project_id, name))
    }

    /// See [`Client::experiment`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::experiment`].
    pub fn experiment(&self, experiment_id: ExperimentId) -> Result<Experiment, ClientError> {
        self.run(self.inner.experiment(experiment_id))
    }

    /// See [`Client::training_sessions`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::training_sessions`].
    pub fn training_sessions(
        &self,
        experiment_id: ExperimentId,
        name: Option<&str>,
    ) -> Result<Vec<TrainingSession>, ClientError> {
        self.run(self.inner.training_sessions(experiment_id, name))
    }

    /// See [`Client::training_session`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::training_session`].
    pub fn training_session(
        &self,
        session_id: TrainingSessionId,
    ) -> Result<TrainingSession, ClientError> {
        self.run(self.inner.training_session(session_id))
    }

    /// See [`Client::training_session_metrics`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::training_session_metrics`].
    pub fn training_session_metrics(
        &self,
        session_id: TrainingSessionId,
    ) -> Result<BTreeMap<String, Parameter>, ClientError> {
        self.run(self.inner.training_session_metrics(session_id))
    }

    /// See [`Client::set_training_session_metrics`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::set_training_session_metrics`].
    pub fn set_training_session_metrics(
        &self,
        session_id: TrainingSessionId,
        metrics: &BTreeMap<String, Parameter>,
    ) -> Result<(), ClientError> {
        self.run(self.inner.set_training_session_metrics(session_id, metrics))
    }

    /// See [`Client::artifacts`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::artifacts`].
    pub fn artifacts(&self, session_id: TrainingSessionId) -> Result<Vec<Artifact>, ClientError> {
        self.run(self.inner.artifacts(session_id))
    }

    /// See [`Client::validation_sessions`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::validation_sessions`].
    pub fn validation_sessions(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ValidationSession>, ClientError> {
        self.run(self.inner.validation_sessions(project_id))
    }

    /// See [`Client::validation_session`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::validation_session`].
    pub fn validation_session(
        &self,
        session_id: ValidationSessionId,
    ) -> Result<ValidationSession, ClientError> {
        self.run(self.inner.validation_session(session_id))
    }

    /// See [`Client::snapshots`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::snapshots`].
    pub fn snapshots(&self, name: Option<&str>) -> Result<Vec<Snapshot>, ClientError> {
        self.run(self.inner.snapshots(name))
    }

    /// See [`Client::snapshot`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::snapshot`].
    pub fn snapshot(&self, snapshot_id: SnapshotId) -> Result<Snapshot, ClientError> {
        self.run(self.inner.snapshot(snapshot_id))
    }

    /// See [`Client::tasks`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::tasks`].
    pub fn tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ClientError> {
        self.run(self.inner.tasks(filter))
    }

    /// See [`Client::task_info`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Client::task_info`].
    pub fn task_info(&self, task_id: TaskId) -> Result<TaskInfo, ClientError> {
        self.run(self.inner.task_info(task_id))
    }
}
