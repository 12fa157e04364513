use crate::raycasting::*;
use crate::*;

/// Does the searched part of the ray touch the box at all?
///
/// This is the slab test.  It is used to prune the tree, so it has to be conservative: touching an edge or a corner
/// counts, as does starting inside the box.
pub(crate) fn ray_aabb_test(input: &RayCastInput, aabb: &Aabb) -> bool {
    let origin = input.ray.get_origin();
    let direction = input.ray.get_direction();

    // In 2d, planes are actually lines.  The box can be visualized as having 2
    // x lines and 2 y lines, coming out of the left/right sides of the box and
    // top/bottom respectively.  A ray only intersects the box if it is between
    // both pairs of lines at the same time, so we narrow `[tmin, tmax]` one
    // axis at a time, starting from the searched window.
    let mut tmin: f64 = 0.0;
    let mut tmax = input.max_fraction;

    let axes = [
        (origin.x, direction.x, aabb.get_p1().x, aabb.get_p2().x),
        (origin.y, direction.y, aabb.get_p1().y, aabb.get_p2().y),
    ];

    for (o, d, lower, upper) in axes {
        if d == 0.0 {
            // Parallel to this pair of lines.  Dividing would give `inf * 0.0`
            // for a ray lying on an edge, so handle it directly: the ray is
            // either between the lines for its whole length, or never.
            if o < lower || upper < o {
                return false;
            }
            continue;
        }

        let inv_d = 1.0 / d;
        let t1 = (lower - o) * inv_d;
        let t2 = (upper - o) * inv_d;
        let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

        tmin = tmin.max(near);
        tmax = tmax.min(far);

        if tmin > tmax {
            return false;
        }
    }

    true
}
