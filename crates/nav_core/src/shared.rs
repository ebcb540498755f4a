//! Publication slot for the current navmesh. Builds happen outside the lock;
//! readers only ever see a complete mesh.

use std::sync::Arc;

use parking_lot::RwLock;
use scene_core::Node;

use crate::build::NavMeshBuilder;
use crate::navmesh::NavMesh;

pub struct SharedNavMesh {
    slot: RwLock<Arc<NavMesh>>,
}

impl SharedNavMesh {
    pub fn new(initial: NavMesh) -> Self {
        Self {
            slot: RwLock::new(Arc::new(initial)),
        }
    }

    /// Starts on the builder's fallback plane.
    pub fn with_fallback(builder: &NavMeshBuilder) -> Self {
        Self::new(builder.fallback())
    }

    pub fn current(&self) -> Arc<NavMesh> {
        Arc::clone(&self.slot.read())
    }

    /// Swap in `mesh`; returns the previous one.
    pub fn publish(&self, mesh: NavMesh) -> Arc<NavMesh> {
        let next = Arc::new(mesh);
        let prev = std::mem::replace(&mut *self.slot.write(), next);
        log::debug!("navmesh {}: published", prev.zone_id());
        prev
    }

    pub fn rebuild(&self, builder: &NavMeshBuilder, scene: &Node) -> Arc<NavMesh> {
        let mesh = builder.build(scene);
        self.publish(mesh);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_core::{Material, MeshInstance, shapes};

    #[test]
    fn readers_keep_old_mesh_across_publish() {
        let builder = NavMeshBuilder::default().with_fallback(20.0, 2);
        let shared = SharedNavMesh::with_fallback(&builder);
        let before = shared.current();
        assert!(before.is_fallback());

        let scene = Node::new("city").with_child(Node::new("road").with_mesh(MeshInstance::new(
            shapes::grid_plane(4.0, 2),
            Material::rgb("asphalt", 0.05, 0.05, 0.05),
        )));
        let after = shared.rebuild(&builder, &scene);
        assert!(!after.is_fallback());
        assert!(before.is_fallback());
        assert_eq!(before.triangle_count(), 8);
        assert_eq!(after.triangle_count(), 8);
        assert!(!Arc::ptr_eq(&before, &shared.current()));
    }
}
