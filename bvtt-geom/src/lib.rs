//! Minimal `Sphere` / `Aabb` bounding volumes implementing `bvtt-core`'s
//! `Overlap` and `RayHit` traits.
//!
//! This crate exists only so `bvtt-core`'s test suite and examples have a
//! concrete bounding volume to traverse; the core itself stays generic and
//! never depends on this crate.

use bvtt_core::{Overlap, RayHit, Vec3};

/// An axis-aligned bounding sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub const fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    fn distance_squared(&self, other: Vec3) -> f64 {
        let dx = self.center.x - other.x;
        let dy = self.center.y - other.y;
        let dz = self.center.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl Overlap for Sphere {
    fn overlap(&self, other: &Self) -> bool {
        let r = self.radius + other.radius;
        self.distance_squared(other.center) <= r * r
    }
}

impl RayHit for Sphere {
    fn ray_hit(&self, origin: Vec3, direction: Vec3) -> bool {
        // Standard sphere/ray quadratic: solve |o + t*d - c|^2 = r^2 for a
        // real root with t >= 0.
        let oc = Vec3::new(
            origin.x - self.center.x,
            origin.y - self.center.y,
            origin.z - self.center.z,
        );
        let a = dot(direction, direction);
        let b = 2.0 * dot(oc, direction);
        let c = dot(oc, oc) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }
        // a > 0 for any non-degenerate direction, so t0 <= t1: the ray hits
        // iff its far intersection is still ahead of the origin.
        let sqrt_d = discriminant.sqrt();
        let t1 = (-b + sqrt_d) / (2.0 * a);
        t1 >= 0.0
    }
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// An axis-aligned bounding box, `[min, max]` inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

impl Overlap for Aabb {
    fn overlap(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

impl RayHit for Aabb {
    fn ray_hit(&self, origin: Vec3, direction: Vec3) -> bool {
        // Slab method, adapted to a forward half-line: the ray only counts
        // as hitting if the entry/exit interval intersects t >= 0.
        let mut near = f64::NEG_INFINITY;
        let mut far = f64::INFINITY;
        for i in 0..3 {
            let inv_dir = 1.0 / direction[i];
            let mut t0 = (self.min[i] - origin[i]) * inv_dir;
            let mut t1 = (self.max[i] - origin[i]) * inv_dir;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            near = near.max(t0);
            far = far.min(t1);
            if near > far {
                return false;
            }
        }
        far >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_spheres_overlap() {
        let a = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(a.overlap(&b));
    }

    #[test]
    fn distant_spheres_do_not_overlap() {
        let a = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let b = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(!a.overlap(&b));
    }

    #[test]
    fn ray_through_sphere_center_hits() {
        let s = Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0);
        assert!(s.ray_hit(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn ray_pointing_away_from_sphere_misses() {
        let s = Sphere::new(Vec3::new(-5.0, 0.0, 0.0), 1.0);
        assert!(!s.ray_hit(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn overlapping_aabbs_overlap() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 1.5, 1.5));
        assert!(a.overlap(&b));
    }

    #[test]
    fn disjoint_aabbs_do_not_overlap() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));
        assert!(!a.overlap(&b));
    }

    #[test]
    fn ray_into_aabb_hits() {
        let bb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(bb.ray_hit(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn ray_behind_aabb_misses() {
        let bb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(!bb.ray_hit(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)));
    }
}
