// crates/studio-core/src/lib.rs
// ============================================================================
// Module: Studio Core Library
// Description: Value model, error taxonomy and token storage for the Studio client.
// Purpose: Provide the leaf types every Studio client operation is built on.
// Dependencies: base64, dirs, serde, serde_json, thiserror, time, tracing, url
// ============================================================================

//! ## Overview
//! Studio Core holds everything the client SDK needs that does not perform
//! network I/O:
//! - [`Id`] typed identifiers, one distinct type per entity kind.
//! - [`Parameter`], the recursive schema-free value used for hyperparameters
//!   and metrics.
//! - Domain records returned by list and get operations.
//! - [`ClientError`] and [`StorageError`], the two closed error sets.
//! - [`TokenStorage`] with in-memory and file-backed implementations.
//! - Server-name resolution and unverified token claim decoding.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod claims;
pub mod errors;
pub mod identifiers;
pub mod parameter;
pub mod records;
pub mod server;
pub mod storage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use claims::TokenClaims;
pub use errors::ClientError;
pub use errors::ClientErrorKind;
pub use errors::StorageError;
pub use errors::StorageErrorKind;
pub use identifiers::AnnotationSetId;
pub use identifiers::AppId;
pub use identifiers::DatasetId;
pub use identifiers::ExperimentId;
pub use identifiers::Id;
pub use identifiers::IdKind;
pub use identifiers::ImageId;
pub use identifiers::LabelId;
pub use identifiers::OrganizationId;
pub use identifiers::ProjectId;
pub use identifiers::SampleId;
pub use identifiers::SequenceId;
pub use identifiers::SnapshotId;
pub use identifiers::TaskId;
pub use identifiers::TrainingSessionId;
pub use identifiers::ValidationSessionId;
pub use parameter::Parameter;
pub use records::Annotation;
pub use records::AnnotationSet;
pub use records::Artifact;
pub use records::Box2d;
pub use records::Box3d;
pub use records::Dataset;
pub use records::Experiment;
pub use records::GpsData;
pub use records::ImuData;
pub use records::Label;
pub use records::Location;
pub use records::Mask;
pub use records::Organization;
pub use records::Point2d;
pub use records::PolygonRing;
pub use records::Project;
pub use records::Sample;
pub use records::SampleFile;
pub use records::Snapshot;
pub use records::Stage;
pub use records::Task;
pub use records::TaskFilter;
pub use records::TaskInfo;
pub use records::TrainingSession;
pub use records::ValidationSession;
pub use server::resolve_server_url;
pub use server::server_name;
pub use storage::FileTokenStorage;
pub use storage::MemoryTokenStorage;
pub use storage::TokenStorage;
