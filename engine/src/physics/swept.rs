//! Collide-and-slide resolver
//!
//! Swept-ellipsoid collision against arbitrary triangle soup. The collider
//! is an axis-aligned ellipsoid; scaling the world per-axis by `1/radius`
//! turns it into a unit sphere, so detection is always swept-unit-sphere vs.
//! triangle. Response projects the blocked motion onto a sliding plane and
//! re-resolves recursively until the remaining velocity is negligible or the
//! recursion cap is hit.
//!
//! Resolution never fails: zero velocity, empty geometry or degenerate
//! triangles all resolve to "moved as far as possible", and the depth cap
//! turns potential non-termination on pathological geometry into a defined
//! (if imprecise) stop.

use glam::Vec3;

use super::geometry::{Plane, Triangle, check_point_in_triangle, get_lowest_root};

/// Recursion cap for sliding resolution. Depths 0..=5 are evaluated; past
/// that the position is returned as-is.
const MAX_RECURSION_DEPTH: u32 = 5;

/// Velocities with `|normal · velocity|` under this are treated as parallel
/// to the triangle plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// The "very close" threshold: how far short of a surface the sphere stops,
/// and the slide velocity magnitude below which resolution has converged.
///
/// 0.005 of a centimeter-scaled unit, matching the resolver's tuning; kept
/// proportional to the world's unit convention.
pub fn very_close_distance(units_per_meter: f32) -> f32 {
    let unit_scale = units_per_meter / 100.0;
    0.005 * unit_scale
}

/// Per-resolution scratch state, all fields in ellipsoid space.
///
/// Created at the start of one [`collide_and_slide`] call, mutated through
/// the recursive steps, discarded when the call returns.
struct CollisionPacket {
    e_radius: Vec3,
    e_velocity: Vec3,
    e_normalized_velocity: Vec3,
    e_base_point: Vec3,
    found_collision: bool,
    /// Distance along the velocity to the closest unresolved intersection.
    e_nearest_distance: f32,
    e_intersection_point: Vec3,
}

/// Moves an ellipsoid through the world, resolving penetrations by sliding.
///
/// `position` and `velocity` are world space; the returned corrected final
/// position is world space as well. `units_per_meter` scales the convergence
/// epsilon (see [`very_close_distance`]).
pub fn collide_and_slide(
    triangles: &[Triangle],
    position: Vec3,
    velocity: Vec3,
    ellipsoid_radius: Vec3,
    units_per_meter: f32,
) -> Vec3 {
    // A degenerate collider cannot be mapped to a unit sphere; treat it as
    // non-colliding rather than an error.
    if ellipsoid_radius.min_element() <= 0.0 {
        log::warn!(
            "collide_and_slide: non-positive ellipsoid radius {ellipsoid_radius:?}, \
             moving without collision"
        );
        return position + velocity;
    }

    // Transform world position and velocity into ellipsoid space.
    let inv_radius = ellipsoid_radius.recip();
    let e_position = position * inv_radius;
    let e_velocity = velocity * inv_radius;

    let mut packet = CollisionPacket {
        e_radius: ellipsoid_radius,
        e_velocity,
        e_normalized_velocity: e_velocity.normalize_or_zero(),
        e_base_point: e_position,
        found_collision: false,
        e_nearest_distance: f32::INFINITY,
        e_intersection_point: Vec3::ZERO,
    };

    let very_close = very_close_distance(units_per_meter);
    let e_final_position =
        collide_with_world(triangles, &mut packet, e_position, e_velocity, very_close, 0);

    // Back to world space via the inverse per-axis scale.
    e_final_position * ellipsoid_radius
}

/// One recursive resolution step in ellipsoid space.
fn collide_with_world(
    triangles: &[Triangle],
    packet: &mut CollisionPacket,
    e_position: Vec3,
    e_velocity: Vec3,
    very_close: f32,
    depth: u32,
) -> Vec3 {
    // Bounded recursion prevents infinite sliding loops on degenerate
    // geometry.
    if depth > MAX_RECURSION_DEPTH {
        return e_position;
    }

    packet.e_velocity = e_velocity;
    packet.e_normalized_velocity = e_velocity.normalize_or_zero();
    packet.e_base_point = e_position;
    packet.found_collision = false;
    packet.e_nearest_distance = f32::INFINITY;

    move_with_collisions(triangles, packet);

    // No collision, move the full velocity unobstructed.
    if !packet.found_collision {
        return e_position + e_velocity;
    }

    // Collision occurred. Original destination point:
    let e_destination_point = e_position + e_velocity;
    let mut e_new_base_point = e_position;

    // Only advance if we are not already very close, and then only to just
    // short of the intersection so floating-point error never embeds us in
    // the surface.
    if packet.e_nearest_distance >= very_close {
        let direction = e_velocity.normalize_or_zero();
        e_new_base_point = packet.e_base_point + direction * (packet.e_nearest_distance - very_close);

        // Pull the intersection point back by the same margin so the sliding
        // plane is unaffected by us stopping slightly short.
        packet.e_intersection_point -= very_close * direction;
    }

    // Determine the sliding plane.
    let slide_plane_origin = packet.e_intersection_point;
    let slide_plane_normal = (e_new_base_point - packet.e_intersection_point).normalize_or_zero();
    if slide_plane_normal == Vec3::ZERO {
        return e_new_base_point;
    }
    let sliding_plane = Plane::from_origin_normal(slide_plane_origin, slide_plane_normal);

    let e_new_destination_point = e_destination_point
        - sliding_plane.signed_distance(e_destination_point) * slide_plane_normal;

    // The slide vector becomes the velocity for the next step.
    let e_new_velocity = e_new_destination_point - packet.e_intersection_point;

    // Converged once the remaining slide is negligible.
    if e_new_velocity.length() < very_close {
        return e_new_base_point;
    }

    collide_with_world(
        triangles,
        packet,
        e_new_base_point,
        e_new_velocity,
        very_close,
        depth + 1,
    )
}

/// Tests the swept sphere against every world triangle, keeping the nearest
/// collision found across the whole set (nearest-wins, not first-hit).
fn move_with_collisions(triangles: &[Triangle], packet: &mut CollisionPacket) {
    if packet.e_velocity == Vec3::ZERO {
        return;
    }

    let inv_radius = packet.e_radius.recip();
    for triangle in triangles {
        // Triangle vertices into ellipsoid space.
        let ep0 = triangle.p0 * inv_radius;
        let ep1 = triangle.p1 * inv_radius;
        let ep2 = triangle.p2 * inv_radius;

        check_triangle(packet, ep0, ep1, ep2);
    }
}

/// Sweeps the unit sphere along the packet velocity against one triangle,
/// all points already in ellipsoid space.
///
/// Records the hit in the packet if it is closer than any found so far this
/// resolution step.
fn check_triangle(packet: &mut CollisionPacket, p0: Vec3, p1: Vec3, p2: Vec3) {
    let triangle_plane = Plane::from_points(p0, p1, p2);

    // Only check front faces: surfaces the sphere moves away from cannot be
    // hit and would otherwise produce phantom back-face collisions.
    if !triangle_plane.is_front_facing_to(packet.e_normalized_velocity) {
        return;
    }

    let signed_distance = triangle_plane.signed_distance(packet.e_base_point);
    let normal_dot_velocity = triangle_plane.normal.dot(packet.e_velocity);

    let mut embedded_in_plane = false;
    let mut t0: f32;

    if normal_dot_velocity.abs() < PARALLEL_EPSILON {
        // Sphere travelling parallel to the plane.
        if signed_distance.abs() >= 1.0 {
            // Not embedded, no collision possible from this triangle.
            return;
        }
        // Embedded and travelling parallel: intersects the whole sweep.
        embedded_in_plane = true;
        t0 = 0.0;
    } else {
        // Interval of the sweep during which the sphere's plane distance is
        // within the unit radius.
        t0 = (-1.0 - signed_distance) / normal_dot_velocity;
        let mut t1 = (1.0 - signed_distance) / normal_dot_velocity;

        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        // Both outside [0, 1] (t0 <= t1 makes the two checks sufficient).
        if t0 > 1.0 || t1 < 0.0 {
            return;
        }

        // t1 only bounds the range check; the face test reads t0 alone.
        t0 = t0.clamp(0.0, 1.0);
    }

    // The swept sphere first touches the triangle *plane* at t0; any
    // collision with the triangle's face must happen exactly then.
    let mut collision_point = Vec3::ZERO;
    let mut found_collision = false;
    let mut t = 1.0_f32;

    // A face collision can only happen at t0, when the sphere first rests on
    // the front side of the plane, and only if it is not embedded (an
    // embedded sphere can only hit vertices or edges).
    if !embedded_in_plane {
        let plane_intersection_point =
            (packet.e_base_point - triangle_plane.normal) + packet.e_velocity * t0;

        if check_point_in_triangle(plane_intersection_point, p0, p1, p2) {
            found_collision = true;
            t = t0;
            collision_point = plane_intersection_point;
        }
    }

    // No face hit: sweep against the triangle's vertices and edges. Each
    // feature reduces to a quadratic a·t² + b·t + c = 0 in the sweep
    // parameter.
    if !found_collision {
        let velocity = packet.e_velocity;
        let base = packet.e_base_point;
        let velocity_squared_length = velocity.length_squared();

        // Vertex sweeps.
        let a = velocity_squared_length;
        for &vertex in &[p0, p1, p2] {
            let b = 2.0 * velocity.dot(base - vertex);
            let c = (vertex - base).length_squared() - 1.0;
            if let Some(new_t) = get_lowest_root(a, b, c, t) {
                t = new_t;
                found_collision = true;
                collision_point = vertex;
            }
        }

        // Edge sweeps. Even after a vertex hit the edges must be checked:
        // the sphere can reach an edge at a smaller time value.
        for &(va, vb) in &[(p0, p1), (p1, p2), (p2, p0)] {
            let edge = vb - va;
            let base_to_vertex = va - base;
            let edge_squared_length = edge.length_squared();
            if edge_squared_length == 0.0 {
                continue;
            }
            let edge_dot_velocity = edge.dot(velocity);
            let edge_dot_base_to_vertex = edge.dot(base_to_vertex);

            let a = edge_squared_length * -velocity_squared_length
                + edge_dot_velocity * edge_dot_velocity;
            let b = edge_squared_length * (2.0 * velocity.dot(base_to_vertex))
                - 2.0 * edge_dot_velocity * edge_dot_base_to_vertex;
            let c = edge_squared_length * (1.0 - base_to_vertex.length_squared())
                + edge_dot_base_to_vertex * edge_dot_base_to_vertex;

            if let Some(new_t) = get_lowest_root(a, b, c, t) {
                // Intersection with the infinite line; accept only if it
                // lies within the segment.
                let f = (edge_dot_velocity * new_t - edge_dot_base_to_vertex)
                    / edge_squared_length;
                if (0.0..=1.0).contains(&f) {
                    t = new_t;
                    found_collision = true;
                    collision_point = va + edge * f;
                }
            }
        }
    }

    // Nearest-wins across the whole triangle set: only record if closer than
    // anything found so far this resolution step.
    if found_collision {
        let distance_to_collision = t * packet.e_velocity.length();
        if !packet.found_collision || distance_to_collision < packet.e_nearest_distance {
            packet.found_collision = true;
            packet.e_nearest_distance = distance_to_collision;
            packet.e_intersection_point = collision_point;
        }
    }
}
