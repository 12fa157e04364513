//! Test a ray against a circle.
use crate::raycasting::*;
use crate::*;

pub(crate) fn ray_circle_test(
    input: &RayCastInput,
    circle: &Circle,
    transform: &Transform,
) -> Option<RayCastOutput> {
    if input.ray.is_degenerate() {
        return None;
    }

    // Points on the ray are `p(t) = origin + t * d`.  Translating so that the
    // circle is at the origin (`s = origin - center`), the ray is on the
    // circle when `|s + t * d|^2 = r^2`, which expands to the quadratic
    //
    // `(d.d) t^2 + 2 (s.d) t + (s.s - r^2) = 0`
    //
    // with roots `(-(s.d) +- sqrt((s.d)^2 - (d.d)(s.s - r^2))) / (d.d)`.
    let center = transform.apply(circle.get_center());
    let radius = circle.get_radius();
    let s = *input.ray.get_origin() - center;
    let d = input.ray.get_direction();

    let dd = d.dot(&d);
    let sd = s.dot(&d);
    let c = s.dot(&s) - radius * radius;
    let discriminant = sd * sd - dd * c;

    // A tangent ray has a discriminant of exactly zero, which rounding can
    // push slightly negative.  Allow a little slack relative to the size of
    // the terms involved so that grazing rays still register.
    if discriminant < -RAY_EPSILON * dd * radius * radius {
        return None;
    }

    let root = discriminant.max(0.0).sqrt();
    let t1 = (-sd - root) / dd;
    let t2 = (-sd + root) / dd;

    // `t1 <= t2`.  The entry point is t1, but if the ray starts inside the
    // circle t1 is behind the origin and the first boundary crossing is the
    // exit at t2.
    let fraction = [t1, t2]
        .into_iter()
        .find_map(|t| input.accept_fraction(t))?;

    let point = input.ray.evaluate(fraction);
    let normal = (point - center).normalize();
    Some(RayCastOutput {
        fraction,
        point,
        normal,
    })
}
