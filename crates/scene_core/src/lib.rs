//! scene_core: renderer-agnostic scene graph, geometry and clip data.
//!
//! Everything here is plain CPU-side data shared by the asset loader, the
//! procedural generator, the navmesh builder and the animation runtime.

pub mod anim;
pub mod mesh;
pub mod node;
pub mod shapes;
pub mod util;

pub use anim::{AnimationClip, JointPose, Pose, Skeleton, Track, TrackValues};
pub use mesh::{Aabb, Material, MeshData, Vertex};
pub use node::{MeshInstance, Node, Transform};
pub use util::normalize_bone_name;
