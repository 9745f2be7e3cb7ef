use crate::Vec3;

/// Bounding-volume overlap test, used by self-traversal.
///
/// Implemented by the caller's concrete bounding-volume type (sphere, AABB,
/// OBB, ...); the core never inspects the volume's own representation.
pub trait Overlap {
    fn overlap(&self, other: &Self) -> bool;
}

/// Bounding-volume/ray hit test, used by ray traversal.
pub trait RayHit {
    fn ray_hit(&self, origin: Vec3, direction: Vec3) -> bool;
}
