// crates/studio-client/tests/common/mod.rs
// ============================================================================
// Module: Client Test Support
// Description: Seeded studio fixture and instrumented storages/transports.
// Purpose: Share setup across client integration tests.
// Dependencies: studio-client, studio-core, serde_json, time
// ============================================================================

//! Shared helpers for client integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers.")]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;
use studio_client::Client;
use studio_client::InMemoryStudio;
use studio_client::RpcRequest;
use studio_client::Transport;
use studio_client::TransportError;
use studio_core::Annotation;
use studio_core::AnnotationSet;
use studio_core::AnnotationSetId;
use studio_core::Artifact;
use studio_core::Dataset;
use studio_core::DatasetId;
use studio_core::Experiment;
use studio_core::ExperimentId;
use studio_core::Label;
use studio_core::LabelId;
use studio_core::MemoryTokenStorage;
use studio_core::Organization;
use studio_core::OrganizationId;
use studio_core::Parameter;
use studio_core::Project;
use studio_core::ProjectId;
use studio_core::Sample;
use studio_core::Snapshot;
use studio_core::SnapshotId;
use studio_core::Stage;
use studio_core::StorageError;
use studio_core::Task;
use studio_core::TaskId;
use studio_core::TaskInfo;
use studio_core::TokenStorage;
use studio_core::TrainingSession;
use studio_core::TrainingSessionId;
use studio_core::ValidationSession;
use studio_core::ValidationSessionId;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Account seeded into every fixture.
pub const USER: &str = "alice";
/// Password of [`USER`].
pub const PASSWORD: &str = "correct horse";
/// Page size used by the fixture so listings span several pages.
pub const PAGE_SIZE: usize = 2;
/// Number of samples seeded into [`DEER_DAY`].
pub const SAMPLE_COUNT: usize = 5;

/// Project with two datasets and two experiments.
pub const DEER: ProjectId = ProjectId::new(0x10);
/// Project whose name contains [`DEER`]'s.
pub const DEER_TRACKING: ProjectId = ProjectId::new(0x11);
/// Unrelated project.
pub const CARS: ProjectId = ProjectId::new(0x12);
/// Dataset holding the samples.
pub const DEER_DAY: DatasetId = DatasetId::new(0x20);
/// Second dataset of [`DEER`].
pub const DEER_NIGHT: DatasetId = DatasetId::new(0x21);
/// Ground-truth annotation set of [`DEER_DAY`].
pub const GROUND_TRUTH: AnnotationSetId = AnnotationSetId::new(0x30);
/// Machine-generated annotation set of [`DEER_DAY`].
pub const AUTO: AnnotationSetId = AnnotationSetId::new(0x31);
/// Baseline experiment of [`DEER`].
pub const BASELINE: ExperimentId = ExperimentId::new(0x50);
/// Training session with metrics and artifacts.
pub const RUN_1: TrainingSessionId = TrainingSessionId::new(0x60);
/// Training session without metrics.
pub const RUN_2: TrainingSessionId = TrainingSessionId::new(0x61);
/// Validation session of [`RUN_1`].
pub const VALIDATION: ValidationSessionId = ValidationSessionId::new(0x70);
/// Seeded snapshot.
pub const SNAPSHOT: SnapshotId = SnapshotId::new(0x80);

fn project(id: ProjectId, name: &str) -> Project {
    Project {
        id,
        name: name.to_string(),
        description: format!("{name} project"),
    }
}

fn dataset(id: DatasetId, project_id: ProjectId, name: &str) -> Dataset {
    Dataset {
        id,
        project_id,
        name: name.to_string(),
        description: String::new(),
        created: OffsetDateTime::UNIX_EPOCH,
    }
}

fn annotation_set(id: AnnotationSetId, name: &str) -> AnnotationSet {
    AnnotationSet {
        id,
        dataset_id: DEER_DAY,
        name: name.to_string(),
        description: String::new(),
        created: OffsetDateTime::UNIX_EPOCH,
    }
}

fn experiment(id: ExperimentId, project_id: ProjectId, name: &str) -> Experiment {
    Experiment {
        id,
        project_id,
        name: name.to_string(),
        description: String::new(),
    }
}

fn training_session(id: TrainingSessionId, name: &str) -> TrainingSession {
    TrainingSession {
        id,
        experiment_id: BASELINE,
        name: name.to_string(),
        description: String::new(),
        model: "modelpack".to_string(),
        model_params: BTreeMap::from([("epochs".to_string(), Parameter::Integer(10))]),
    }
}

fn task(id: u64, workflow: &str, status: &str, manager: Option<&str>) -> Task {
    Task {
        id: TaskId::new(id),
        name: format!("{workflow} task"),
        workflow: workflow.to_string(),
        status: status.to_string(),
        manager: manager.map(str::to_string),
        instance: "cpu-small".to_string(),
        created: OffsetDateTime::UNIX_EPOCH,
    }
}

fn task_info(task: &Task) -> TaskInfo {
    TaskInfo {
        id: task.id,
        project_id: Some(DEER),
        description: task.name.clone(),
        workflow: task.workflow.clone(),
        status: Some(task.status.clone()),
        created: OffsetDateTime::UNIX_EPOCH,
        completed: None,
        stages: vec![Stage {
            task_id: Some(task.id),
            stage: "prepare".to_string(),
            status: Some("done".to_string()),
            description: None,
            message: None,
            percentage: 100,
        }],
    }
}

/// Builds a sample carrying only an image name.
pub fn sample(index: usize) -> Sample {
    serde_json::from_value(json!({ "image_name": format!("frame-{index:03}.jpg") }))
        .expect("sample fixture")
}

/// Builds an annotation of sample `index` with the given label.
pub fn annotation(index: usize, label: &str) -> Annotation {
    Annotation {
        name: sample(index).image_name,
        label_name: Some(label.to_string()),
        ..Annotation::default()
    }
}

/// Metrics recorded for [`RUN_1`].
pub fn run_1_metrics() -> BTreeMap<String, Parameter> {
    BTreeMap::from([
        ("mAP".to_string(), Parameter::Real(0.5)),
        ("epochs".to_string(), Parameter::Integer(10)),
        ("classes".to_string(), Parameter::array(["deer", "person"].map(Parameter::from))),
    ])
}

/// Returns a production (`saas`) studio seeded with one account and a small
/// project tree.
pub fn seeded_studio() -> InMemoryStudio {
    seed(InMemoryStudio::new())
}

/// Seeds `studio` with the shared fixture.
pub fn seed(studio: InMemoryStudio) -> InMemoryStudio {
    let tasks = [
        task(0x90, "trainer", "running", Some("cloud")),
        task(0x91, "validation", "complete", Some("user")),
        task(0x92, "snapshot", "running", None),
        task(0x93, "trainer", "complete", Some("cloud")),
        task(0x94, "trainer", "error", Some("user")),
    ];
    let mut studio = studio
        .with_user(USER, PASSWORD)
        .with_page_size(PAGE_SIZE)
        .with_version("1.2.3")
        .with_organization(Organization {
            id: OrganizationId::new(1),
            name: "Au-Zone".to_string(),
            credits: 250,
        })
        .with_project(project(DEER_TRACKING, "Deer Tracking"))
        .with_project(project(DEER, "Deer"))
        .with_project(project(CARS, "Cars"))
        .with_dataset(dataset(DEER_DAY, DEER, "Deer Day"))
        .with_dataset(dataset(DEER_NIGHT, DEER, "Deer Night"))
        .with_dataset(dataset(DatasetId::new(0x22), CARS, "Highway"))
        .with_annotation_set(annotation_set(GROUND_TRUTH, "Ground Truth"))
        .with_annotation_set(annotation_set(AUTO, "Auto"))
        .with_annotation(GROUND_TRUTH, annotation(0, "deer"))
        .with_annotation(GROUND_TRUTH, annotation(1, "person"))
        .with_annotation(AUTO, annotation(0, "person"))
        .with_label(Label {
            id: LabelId::new(0x40),
            dataset_id: DEER_DAY,
            index: 0,
            name: "deer".to_string(),
        })
        .with_label(Label {
            id: LabelId::new(0x41),
            dataset_id: DEER_DAY,
            index: 1,
            name: "person".to_string(),
        })
        .with_experiment(experiment(BASELINE, DEER, "Baseline"))
        .with_experiment(experiment(ExperimentId::new(0x51), DEER, "Baseline Large"))
        .with_experiment(experiment(ExperimentId::new(0x52), CARS, "Lanes"))
        .with_training_session(training_session(RUN_1, "run-1"))
        .with_training_session(training_session(RUN_2, "run-2"))
        .with_metrics(RUN_1, run_1_metrics())
        .with_artifact(RUN_1, Artifact {
            name: "modelpack.onnx".to_string(),
            model_type: "onnx".to_string(),
        })
        .with_artifact(RUN_1, Artifact {
            name: "modelpack.tflite".to_string(),
            model_type: "tflite".to_string(),
        })
        .with_validation_session(ValidationSession {
            id: VALIDATION,
            experiment_id: BASELINE,
            training_session_id: RUN_1,
            dataset_id: DEER_DAY,
            annotation_set_id: GROUND_TRUTH,
            description: "nightly validation".to_string(),
            params: BTreeMap::new(),
        })
        .with_snapshot(Snapshot {
            id: SNAPSHOT,
            description: "Deer export".to_string(),
            status: "available".to_string(),
            path: "snapshots/deer.zip".to_string(),
            created: OffsetDateTime::UNIX_EPOCH,
        });
    for task in &tasks {
        studio = studio.with_task(task.clone()).with_task_info(task_info(task));
    }
    for index in 0 .. SAMPLE_COUNT {
        studio = studio.with_sample(DEER_DAY, sample(index));
    }
    studio
}

/// Returns an unauthenticated client wired to `studio`.
pub fn client_for(studio: &InMemoryStudio) -> Client {
    Client::new(Arc::new(studio.clone())).with_url(studio.url())
}

/// Returns a client logged in as [`USER`].
pub async fn logged_in(studio: &InMemoryStudio) -> Client {
    client_for(studio).with_login(USER, PASSWORD).await.expect("login")
}

// ============================================================================
// SECTION: Instrumented Storage
// ============================================================================

/// In-memory storage that counts every operation.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    /// Backing store.
    inner: MemoryTokenStorage,
    /// Number of `store` calls.
    pub stores: AtomicUsize,
    /// Number of `load` calls.
    pub loads: AtomicUsize,
    /// Number of `clear` calls.
    pub clears: AtomicUsize,
}

impl RecordingStorage {
    /// Returns `(stores, clears)`.
    pub fn mutations(&self) -> (usize, usize) {
        (self.stores.load(Ordering::SeqCst), self.clears.load(Ordering::SeqCst))
    }
}

impl TokenStorage for RecordingStorage {
    fn store(&self, token: &str) -> Result<(), StorageError> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.inner.store(token)
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load()
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

/// Storage whose selected operations always fail.
#[derive(Debug, Default)]
pub struct FailingStorage {
    /// Backing store for operations that succeed.
    pub inner: MemoryTokenStorage,
    /// Whether `store` fails.
    pub fail_store: bool,
    /// Whether `load` fails.
    pub fail_load: bool,
    /// Whether `clear` fails.
    pub fail_clear: bool,
}

impl TokenStorage for FailingStorage {
    fn store(&self, token: &str) -> Result<(), StorageError> {
        if self.fail_store {
            return Err(StorageError::WriteError("disk full".to_string()));
        }
        self.inner.store(token)
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        if self.fail_load {
            return Err(StorageError::ReadError("unreadable".to_string()));
        }
        self.inner.load()
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.fail_clear {
            return Err(StorageError::ClearError("read-only".to_string()));
        }
        self.inner.clear()
    }
}

// ============================================================================
// SECTION: Instrumented Transports
// ============================================================================

/// Transport whose calls never complete.
#[derive(Debug, Default)]
pub struct StalledTransport {
    /// Number of calls started.
    pub started: AtomicUsize,
}

#[async_trait]
impl Transport for StalledTransport {
    async fn call(&self, _request: RpcRequest) -> Result<Value, TransportError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Transport answering every call with one fixed outcome.
#[derive(Debug)]
pub struct FixedTransport {
    /// Outcome returned for every call.
    pub outcome: Result<Value, TransportError>,
}

#[async_trait]
impl Transport for FixedTransport {
    async fn call(&self, _request: RpcRequest) -> Result<Value, TransportError> {
        self.outcome.clone()
    }
}
