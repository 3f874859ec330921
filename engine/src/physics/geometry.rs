//! Collision geometry primitives
//!
//! Triangles, planes and the two scalar workhorses of the swept-sphere
//! resolver: the point-in-triangle test used for face hits and the
//! lowest-quadratic-root solver used for vertex and edge sweeps.

use glam::Vec3;

/// One triangle of static collision geometry, world-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl Triangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self { p0, p1, p2 }
    }
}

/// Plane in normal/distance form: `normal · x + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Plane with the given (unit) normal passing through `origin`.
    pub fn from_origin_normal(origin: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            d: -origin.dot(normal),
        }
    }

    /// Plane through three points, normal following counter-clockwise
    /// winding: `(p1 - p0) × (p2 - p0)`, normalized.
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        Self {
            normal,
            d: -normal.dot(p0),
        }
    }

    /// Signed distance from `point` to the plane; positive on the normal's
    /// side.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }

    /// True if the plane faces against the travel direction, i.e. the front
    /// side of the surface is the one a collider moving along `direction`
    /// could hit.
    pub fn is_front_facing_to(&self, direction: Vec3) -> bool {
        self.normal.dot(direction) <= 0.0
    }
}

/// Tests whether `point`, known to lie in the triangle's plane, is inside
/// the triangle.
pub fn check_point_in_triangle(point: Vec3, pa: Vec3, pb: Vec3, pc: Vec3) -> bool {
    let e10 = pb - pa;
    let e20 = pc - pa;

    let a = e10.dot(e10);
    let b = e10.dot(e20);
    let c = e20.dot(e20);
    let ac_bb = a * c - b * b;

    let vp = point - pa;
    let d = vp.dot(e10);
    let e = vp.dot(e20);

    let x = d * c - e * b;
    let y = e * a - d * b;
    let z = x + y - ac_bb;

    z < 0.0 && x >= 0.0 && y >= 0.0
}

/// Solves `a·t² + b·t + c = 0` and returns the smallest root in
/// `(0, max_root)`, or `None` if no root lies in that interval.
///
/// Every vertex and edge sweep reduces to one of these; `max_root` is the
/// best collision time found so far, so later features only win by being
/// strictly earlier.
pub fn get_lowest_root(a: f32, b: f32, c: f32, max_root: f32) -> Option<f32> {
    let determinant = b * b - 4.0 * a * c;

    // No real roots, no intersection.
    if determinant < 0.0 {
        return None;
    }

    let sqrt_d = determinant.sqrt();
    let mut r1 = (-b - sqrt_d) / (2.0 * a);
    let mut r2 = (-b + sqrt_d) / (2.0 * a);

    if r1 > r2 {
        std::mem::swap(&mut r1, &mut r2);
    }

    if r1 > 0.0 && r1 < max_root {
        return Some(r1);
    }

    // r1 may be negative (sphere already past the feature); the greater root
    // can still be the first valid hit.
    if r2 > 0.0 && r2 < max_root {
        return Some(r2);
    }

    None
}
