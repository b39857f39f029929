// crates/studio-core/src/records.rs
// ============================================================================
// Module: Studio Domain Records
// Description: Value aggregates returned by Studio list and get operations.
// Purpose: Decode service responses into structurally comparable records.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Records are plain values: public fields, structural equality and hashing,
//! no identity. Field names follow the service's JSON, with `serde` renames
//! where the wire name differs from the Rust name. Optional fields are
//! `Option` and are never defaulted by the client.
//!
//! Float-carrying geometry leaves ([`Box2d`], [`Box3d`], [`Point2d`],
//! [`GpsData`], [`ImuData`]) implement `Hash` over normalized bit patterns so
//! that values comparing equal hash identically; aggregates derive `Hash`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::identifiers::AnnotationSetId;
use crate::identifiers::DatasetId;
use crate::identifiers::ExperimentId;
use crate::identifiers::LabelId;
use crate::identifiers::OrganizationId;
use crate::identifiers::ProjectId;
use crate::identifiers::SampleId;
use crate::identifiers::SnapshotId;
use crate::identifiers::TaskId;
use crate::identifiers::TrainingSessionId;
use crate::identifiers::ValidationSessionId;
use crate::parameter::Parameter;
use crate::parameter::hash_f32;
use crate::parameter::hash_f64;

// ============================================================================
// SECTION: Organization and Projects
// ============================================================================

/// Organization owning the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Organization {
    /// Organization identifier.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Latest credit balance.
    #[serde(rename = "latest_credit")]
    pub credits: i64,
}

/// Project grouping datasets and experiments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

// ============================================================================
// SECTION: Datasets
// ============================================================================

/// Dataset within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset identifier.
    pub id: DatasetId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation time.
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

/// Named set of annotations over a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationSet {
    /// Annotation set identifier.
    pub id: AnnotationSetId,
    /// Annotated dataset.
    pub dataset_id: DatasetId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation time.
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

/// Class label defined on a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    /// Label identifier.
    pub id: LabelId,
    /// Owning dataset.
    pub dataset_id: DatasetId,
    /// Class index used by trained models.
    pub index: u64,
    /// Label name.
    pub name: String,
}

// ============================================================================
// SECTION: Experiments
// ============================================================================

/// Experiment (trainer) within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment identifier.
    pub id: ExperimentId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// Training run belonging to an experiment.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Training session identifier.
    pub id: TrainingSessionId,
    /// Owning experiment.
    #[serde(rename = "trainer_id")]
    pub experiment_id: ExperimentId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Model architecture name.
    pub model: String,
    /// Model hyperparameters.
    #[serde(default)]
    pub model_params: BTreeMap<String, Parameter>,
}

/// Validation run of a trained model against an annotation set.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct ValidationSession {
    /// Validation session identifier.
    pub id: ValidationSessionId,
    /// Experiment the validated model belongs to.
    pub experiment_id: ExperimentId,
    /// Training session that produced the model.
    pub training_session_id: TrainingSessionId,
    /// Validated dataset.
    pub dataset_id: DatasetId,
    /// Ground-truth annotation set.
    #[serde(rename = "gt_annotation_set_id")]
    pub annotation_set_id: AnnotationSetId,
    /// Free-form description.
    pub description: String,
    /// Validation parameters.
    #[serde(default)]
    pub params: BTreeMap<String, Parameter>,
}

/// File produced by a training session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    /// File name.
    pub name: String,
    /// Model format of the artifact.
    #[serde(rename = "modelType")]
    pub model_type: String,
}

// ============================================================================
// SECTION: Snapshots and Tasks
// ============================================================================

/// Uploaded dataset snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot identifier.
    pub id: SnapshotId,
    /// Free-form description.
    pub description: String,
    /// Processing status.
    pub status: String,
    /// Storage path.
    pub path: String,
    /// Creation time.
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

/// Background task summary as returned by task listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Task name.
    pub name: String,
    /// Workflow type.
    #[serde(rename = "type")]
    pub workflow: String,
    /// Current status.
    pub status: String,
    /// Manager type, when the task is managed.
    #[serde(rename = "manage_type")]
    pub manager: Option<String>,
    /// Compute instance type.
    #[serde(rename = "instance_type")]
    pub instance: String,
    /// Creation time.
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

/// Detailed task information including stage progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Task identifier.
    pub id: TaskId,
    /// Project the task runs in, if any.
    pub project_id: Option<ProjectId>,
    /// Free-form description.
    #[serde(rename = "task_description")]
    pub description: String,
    /// Workflow type.
    #[serde(rename = "type")]
    pub workflow: String,
    /// Current status, if reported.
    pub status: Option<String>,
    /// Creation time.
    #[serde(rename = "created_date", with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    /// Completion time, absent while running.
    #[serde(rename = "end_date", default, with = "time::serde::rfc3339::option")]
    pub completed: Option<OffsetDateTime>,
    /// Reported stages in service order.
    #[serde(default)]
    pub stages: Vec<Stage>,
}

/// Progress of one task stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stage {
    /// Task the stage belongs to.
    #[serde(rename = "docker_task_id", default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// Stage name.
    pub stage: String,
    /// Stage status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Stage description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Latest progress message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Completion percentage (0..=100).
    pub percentage: u8,
}

/// Filter applied to task listings. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Workflow types to include.
    #[serde(rename = "types", default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Vec<String>>,
    /// Manager types to include.
    #[serde(rename = "manage_types", default, skip_serializing_if = "Option::is_none")]
    pub managers: Option<Vec<String>>,
    /// Statuses to include.
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<String>>,
}

// ============================================================================
// SECTION: Samples
// ============================================================================

/// Dataset sample with its sensor files and annotations.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct Sample {
    /// Sample identifier.
    #[serde(default)]
    pub id: Option<SampleId>,
    /// Split group (train, val, ...).
    #[serde(default, alias = "group_name")]
    pub group: Option<String>,
    /// Sequence the sample belongs to.
    #[serde(default)]
    pub sequence_name: Option<String>,
    /// Frame index within the sequence.
    #[serde(default)]
    pub frame_number: Option<u32>,
    /// Image file name.
    #[serde(default)]
    pub image_name: Option<String>,
    /// Image download URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Image width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Image height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Capture time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// Capture source.
    #[serde(default)]
    pub source: Option<String>,
    /// Capture location.
    #[serde(default)]
    pub location: Option<Location>,
    /// Additional sensor files.
    #[serde(rename = "sensors", default)]
    pub files: Vec<SampleFile>,
    /// Annotations attached to the sample.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Sensor file attached to a sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleFile {
    /// Sensor file type (`lidar.pcd`, `radar.png`, ...).
    #[serde(rename = "type")]
    pub file_type: String,
    /// Download URL.
    #[serde(default)]
    pub url: Option<String>,
    /// File name.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Annotation attached to a sample.
///
/// # Invariants
/// - `box2d`, `box3d` and `mask` are independent; exclusivity is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotated sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<SampleId>,
    /// Sample name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sequence name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_name: Option<String>,
    /// Frame index within the sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<u32>,
    /// Split group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Object tracking identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Label name.
    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub label_name: Option<String>,
    /// Label class index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_index: Option<u64>,
    /// 2D bounding box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box2d: Option<Box2d>,
    /// 3D bounding box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box3d: Option<Box3d>,
    /// Segmentation mask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Mask>,
}

// ============================================================================
// SECTION: Geometry
// ============================================================================

/// Axis-aligned 2D box in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Box2d {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Box2d {
    /// Creates a box from its left/top corner and extent.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Returns the box area.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

impl Hash for Box2d {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.left, state);
        hash_f32(self.top, state);
        hash_f32(self.width, state);
        hash_f32(self.height, state);
    }
}

/// 3D box given by its center and extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Box3d {
    /// Center x.
    pub cx: f32,
    /// Center y.
    pub cy: f32,
    /// Center z.
    pub cz: f32,
    /// Extent along x.
    pub width: f32,
    /// Extent along y.
    pub height: f32,
    /// Extent along z.
    pub length: f32,
}

impl Box3d {
    /// Returns the box volume.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.width * self.height * self.length
    }
}

impl Hash for Box3d {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in [self.cx, self.cy, self.cz, self.width, self.height, self.length] {
            hash_f32(value, state);
        }
    }
}

/// Point in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Hash for Point2d {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.x, state);
        hash_f32(self.y, state);
    }
}

/// Closed polygon ring.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct PolygonRing {
    /// Ring vertices in order.
    pub points: Vec<Point2d>,
}

/// Segmentation mask made of polygon rings.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct Mask {
    /// Rings in order.
    pub polygon: Vec<PolygonRing>,
}

/// Capture location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Satellite position.
    #[serde(default)]
    pub gps: Option<GpsData>,
    /// Inertial orientation.
    #[serde(default)]
    pub imu: Option<ImuData>,
}

/// GPS position in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsData {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl Hash for GpsData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.lat, state);
        hash_f64(self.lon, state);
    }
}

/// IMU orientation in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuData {
    /// Roll angle.
    pub roll: f64,
    /// Pitch angle.
    pub pitch: f64,
    /// Yaw angle.
    pub yaw: f64,
}

impl Hash for ImuData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.roll, state);
        hash_f64(self.pitch, state);
        hash_f64(self.yaw, state);
    }
}
