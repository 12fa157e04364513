//! Test a ray against a convex polygon.
use crate::raycasting::*;
use crate::*;

/// Clip the ray against the half-plane behind each edge of the polygon.
///
/// The polygon is the intersection of those half-planes, so the part of the
/// ray inside it is the intersection of the parts inside each half-plane,
/// which we track as `[lower, upper]`.  Edges the ray is entering through raise
/// `lower`, edges it is leaving through lower `upper`.  The hit is the entry:
/// `lower`, on whichever edge last raised it.
///
/// A ray which starts inside never enters, so it never hits.
///
/// The window gets [RAY_EPSILON] of slack on both ends, as in the other
/// tests, so that rays starting or ending on a face still register after the
/// rounding of moving them into the polygon's frame.
pub(crate) fn ray_polygon_test(
    input: &RayCastInput,
    polygon: &Polygon,
    transform: &Transform,
) -> Option<RayCastOutput> {
    if input.ray.is_degenerate() {
        return None;
    }

    // Work in the polygon's frame, which is cheaper than moving every vertex.
    let p1 = transform.apply_inverse(input.ray.get_origin());
    let p2 = transform.apply_inverse(input.ray.get_target());
    let d = p2 - p1;

    let mut lower = -RAY_EPSILON;
    let mut upper = input.max_fraction + RAY_EPSILON;
    let mut hit_edge = None;
    // Same slack for the parallel case, as a distance from the edge.
    let parallel_slack = RAY_EPSILON * d.length();

    for (i, (vertex, normal)) in polygon
        .get_vertices()
        .iter()
        .zip(polygon.get_normals().iter())
        .enumerate()
    {
        // `p = p1 + t * d` is behind the edge when `normal . (p - vertex) <= 0`,
        // e.g. `t * denominator <= numerator`.
        let numerator = normal.dot(&(*vertex - p1));
        let denominator = normal.dot(&d);

        if denominator == 0.0 {
            // Parallel to the edge: the whole ray is on one side.
            if numerator < -parallel_slack {
                return None;
            }
        } else if denominator < 0.0 && numerator <= lower * denominator {
            // Entering.
            lower = numerator / denominator;
            hit_edge = Some(i);
        } else if denominator > 0.0 && numerator < upper * denominator {
            // Leaving.
            upper = numerator / denominator;
        }

        if upper < lower {
            return None;
        }
    }

    let edge = hit_edge?;
    let fraction = input.accept_fraction(lower)?;
    Some(RayCastOutput {
        fraction,
        point: input.ray.evaluate(fraction),
        normal: transform.rotate(&polygon.get_normals()[edge]),
    })
}
