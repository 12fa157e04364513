//! Test a ray against line segments: single edges and chains of them.
use crate::raycasting::*;
use crate::*;

/// Intersect the ray with the segment `v1..v2`, given in body space.
///
/// Segments are two-sided.  The reported normal faces the side the ray came from.
fn ray_segment_test(
    input: &RayCastInput,
    v1: &V2,
    v2: &V2,
    transform: &Transform,
) -> Option<RayCastOutput> {
    let p1 = transform.apply_inverse(input.ray.get_origin());
    let p2 = transform.apply_inverse(input.ray.get_target());
    let d = p2 - p1;

    let e = *v2 - *v1;
    let normal = e.right_perp().normalize();

    // The ray is on the segment's line at `t = numerator / denominator`.
    let numerator = normal.dot(&(*v1 - p1));
    let denominator = normal.dot(&d);

    if denominator == 0.0 {
        return None;
    }

    let fraction = input.accept_fraction(numerator / denominator)?;

    // Where along the segment, as a fraction of the segment.
    let q = p1 + d * fraction;
    let s = (q - *v1).dot(&e) / e.dot(&e);
    if !(-RAY_EPSILON..=1.0 + RAY_EPSILON).contains(&s) {
        return None;
    }

    // The origin is in front of the segment when `v1` is behind it.
    let local_normal = if numerator > 0.0 { -normal } else { normal };
    Some(RayCastOutput {
        fraction,
        point: input.ray.evaluate(fraction),
        normal: transform.rotate(&local_normal),
    })
}

pub(crate) fn ray_edge_test(
    input: &RayCastInput,
    edge: &Edge,
    transform: &Transform,
) -> Option<RayCastOutput> {
    if input.ray.is_degenerate() {
        return None;
    }

    let (v1, v2) = edge.get_vertices();
    ray_segment_test(input, v1, v2, transform)
}

/// Every segment of the chain is tested on its own.  Each hit shrinks the window for the segments after it, so what
/// comes out is the closest one.
pub(crate) fn ray_chain_test(
    input: &RayCastInput,
    chain: &Chain,
    transform: &Transform,
) -> Option<RayCastOutput> {
    if input.ray.is_degenerate() {
        return None;
    }

    let mut window = *input;
    let mut best = None;

    for (v1, v2) in chain.iter_segments() {
        if let Some(hit) = ray_segment_test(&window, v1, v2, transform) {
            window.max_fraction = hit.fraction;
            best = Some(hit);
        }
    }

    best
}
