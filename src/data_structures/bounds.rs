//! Bounding volumes and intersection predicates.
//!
//! This module contains the spatial math used by the scene graph: axis-aligned
//! bounding boxes ([`Aabb`]), bounding spheres, rays, and the view [`Frustum`]
//! used for conservative visibility culling. All predicates are inclusive on
//! boundaries and never cull geometry that could be visible.

use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};

use crate::data_structures::pose::Pose;

fn vmin(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

fn vmax(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// An axis-aligned bounding box described by its minimum and maximum corners.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// The empty box: unions as identity and intersects nothing.
    pub const EMPTY: Aabb = Aabb {
        min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_center_extents(center: Vector3<f32>, extents: Vector3<f32>) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing all `points`. Empty input gives [`Aabb::EMPTY`].
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut aabb = Self::EMPTY;
        for point in points {
            aabb.expand_point(point);
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis.
    pub fn extents(&self) -> Vector3<f32> {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Grow the box so it contains `point`.
    pub fn expand_point(&mut self, point: Vector3<f32>) {
        self.min = vmin(self.min, point);
        self.max = vmax(self.max, point);
    }

    /// Grow the box so it contains `other`. An empty `other` is a no-op.
    pub fn expand_aabb(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.min = vmin(self.min, other.min);
        self.max = vmax(self.max, other.max);
    }

    /// The smallest box containing both operands.
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        result.expand_aabb(other);
        result
    }

    /// Boundary points count as contained.
    pub fn contains_point(&self, point: Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Sphere/box overlap via the closest point on the box to the sphere center.
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        if self.is_empty() {
            return false;
        }
        let closest = vmax(self.min, vmin(sphere.center, self.max));
        (closest - sphere.center).magnitude2() <= sphere.radius * sphere.radius
    }

    /// World-space box of a posed local box: the eight corners are transformed
    /// and re-wrapped, so the result stays axis-aligned (and conservative
    /// under rotation).
    pub fn transformed(&self, pose: &Pose) -> Aabb {
        if self.is_empty() {
            return Self::EMPTY;
        }
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];
        Self::from_points(corners.into_iter().map(|c| pose.transform_point(c)))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A bounding sphere, the cheaper companion volume to [`Aabb`].
#[derive(Clone, Copy, Debug)]
pub struct BoundingSphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vector3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// The sphere circumscribing `aabb`.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        if aabb.is_empty() {
            return Self::new(Vector3::new(0.0, 0.0, 0.0), 0.0);
        }
        Self {
            center: aabb.center(),
            radius: aabb.extents().magnitude(),
        }
    }

    pub fn contains_point(&self, point: Vector3<f32>) -> bool {
        (point - self.center).magnitude2() <= self.radius * self.radius
    }

    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let r = self.radius + other.radius;
        (other.center - self.center).magnitude2() <= r * r
    }
}

/// A ray for mouse picking and bounds queries. `direction` should be unit
/// length for the returned distances to be meaningful.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    /// Slab test. Returns the distance to the entry point, or 0.0 when the
    /// origin is inside the box. Axis-parallel rays fall out of the infinity
    /// arithmetic of the inverse direction.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        if aabb.is_empty() {
            return None;
        }
        let inv = Vector3::new(
            1.0 / self.direction.x,
            1.0 / self.direction.y,
            1.0 / self.direction.z,
        );
        let t1 = (aabb.min.x - self.origin.x) * inv.x;
        let t2 = (aabb.max.x - self.origin.x) * inv.x;
        let t3 = (aabb.min.y - self.origin.y) * inv.y;
        let t4 = (aabb.max.y - self.origin.y) * inv.y;
        let t5 = (aabb.min.z - self.origin.z) * inv.z;
        let t6 = (aabb.max.z - self.origin.z) * inv.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }

    /// Geometric ray/sphere test. Returns the distance to the first hit.
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<f32> {
        let to_center = sphere.center - self.origin;
        let proj = to_center.dot(self.direction);
        let d2 = to_center.magnitude2() - proj * proj;
        let r2 = sphere.radius * sphere.radius;
        if d2 > r2 {
            return None;
        }
        let half_chord = (r2 - d2).sqrt();
        let t = if proj - half_chord >= 0.0 {
            proj - half_chord
        } else {
            proj + half_chord
        };
        if t >= 0.0 { Some(t) } else { None }
    }
}

/// A plane in constant-normal form: `dot(normal, p) + d = 0`.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub d: f32,
}

impl Plane {
    /// Signed distance; positive on the side the normal points to.
    pub fn distance_to_point(&self, point: Vector3<f32>) -> f32 {
        self.normal.dot(point) + self.d
    }

    fn from_vector4(v: Vector4<f32>) -> Self {
        let normal = Vector3::new(v.x, v.y, v.z);
        let len = normal.magnitude();
        Self {
            normal: normal / len,
            d: v.w / len,
        }
    }
}

/// The six planes of a view frustum, normals pointing inward.
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the planes from a combined view-projection matrix
    /// (Gribb/Hartmann). The matrix is expected to produce clip-space depth
    /// in `[0, 1]`, which is what [`crate::camera::Projection`] emits.
    pub fn from_matrix(view_proj: &Matrix4<f32>) -> Self {
        let m = view_proj;
        let row = |i: usize| Vector4::new(m.x[i], m.y[i], m.z[i], m.w[i]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        Self {
            planes: [
                Plane::from_vector4(r3 + r0), // left
                Plane::from_vector4(r3 - r0), // right
                Plane::from_vector4(r3 + r1), // bottom
                Plane::from_vector4(r3 - r1), // top
                Plane::from_vector4(r2),      // near, depth 0 at z' = 0
                Plane::from_vector4(r3 - r2), // far
            ],
        }
    }

    pub fn contains_point(&self, point: Vector3<f32>) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Conservative p-vertex test: the box is rejected only when it lies
    /// entirely outside one of the planes.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        if aabb.is_empty() {
            return false;
        }
        for plane in &self.planes {
            let mut p = aabb.min;
            if plane.normal.x >= 0.0 {
                p.x = aabb.max.x;
            }
            if plane.normal.y >= 0.0 {
                p.y = aabb.max.y;
            }
            if plane.normal.z >= 0.0 {
                p.z = aabb.max.z;
            }
            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }
        true
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(sphere.center) >= -sphere.radius)
    }
}
