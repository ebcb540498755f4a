//! nav_core: walkable-surface extraction and navigation queries.
//!
//! `SurfaceClassifier` scores every mesh of an unannotated scene, the
//! `NavMeshBuilder` merges the accepted surfaces into a `NavMesh`, and
//! `SharedNavMesh` publishes finished meshes to movement code. When nothing
//! qualifies, a flat fallback plane is built so queries always have a mesh.

pub mod build;
pub mod classify;
mod grid;
pub mod navmesh;
mod path;
pub mod shared;

pub use build::NavMeshBuilder;
pub use classify::{ClassifierPolicy, ScoreBreakdown, SurfaceCandidate, SurfaceClassifier};
pub use navmesh::NavMesh;
pub use shared::SharedNavMesh;
