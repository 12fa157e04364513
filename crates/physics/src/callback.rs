//! The per-hit decision a ray cast asks its caller to make, and some ready-made callbacks.
use crate::*;

/// Receives hits from a ray cast and decides how the cast proceeds.
///
/// The return value is a fraction along the original ray:
///
/// - Negative (or NaN): ignore this fixture, as if it weren't there.
/// - 0: stop the cast now.
/// - Between 0 and 1: only look for hits up to this fraction from now on.
/// - 1 or more: keep going without changing anything.
///
/// Returning the fraction passed in finds the closest hit.  Hits are not delivered in order along the ray.
///
/// Implemented for any `FnMut(&Fixture, V2, V2, f64) -> f64`, called with the fixture, the point, the normal and the
/// fraction.
pub trait RayCastCallback {
    fn report_fixture(&mut self, fixture: &Fixture, point: V2, normal: V2, fraction: f64) -> f64;
}

impl<F: FnMut(&Fixture, V2, V2, f64) -> f64> RayCastCallback for F {
    fn report_fixture(&mut self, fixture: &Fixture, point: V2, normal: V2, fraction: f64) -> f64 {
        self(fixture, point, normal, fraction)
    }
}

/// What a callback's return value asks for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RayCastControl {
    Ignore,
    Terminate,
    Clip(f64),
    Continue,
}

impl RayCastControl {
    pub fn from_reported(value: f64) -> RayCastControl {
        if value.is_nan() || value < 0.0 {
            RayCastControl::Ignore
        } else if value == 0.0 {
            RayCastControl::Terminate
        } else if value < 1.0 {
            RayCastControl::Clip(value)
        } else {
            RayCastControl::Continue
        }
    }
}

/// A hit, as collected by the callbacks in this module.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    pub fixture: FixtureId,
    pub point: V2,
    pub normal: V2,
    pub fraction: f64,
}

impl RayHit {
    fn new(fixture: &Fixture, point: V2, normal: V2, fraction: f64) -> RayHit {
        RayHit {
            fixture: fixture.get_id(),
            point,
            normal,
            fraction,
        }
    }
}

/// Keeps the closest hit, clipping the ray to each one it is given.
#[derive(Clone, Debug, Default)]
pub struct ClosestHit {
    hit: Option<RayHit>,
}

impl ClosestHit {
    pub fn new() -> ClosestHit {
        Default::default()
    }

    pub fn get_hit(&self) -> Option<&RayHit> {
        self.hit.as_ref()
    }

    pub fn into_hit(self) -> Option<RayHit> {
        self.hit
    }
}

impl RayCastCallback for ClosestHit {
    fn report_fixture(&mut self, fixture: &Fixture, point: V2, normal: V2, fraction: f64) -> f64 {
        // The cast is clipped to every hit, so anything reported is at least as close as what we have.  Ties keep the
        // first.
        if self.hit.map(|h| fraction < h.fraction).unwrap_or(true) {
            self.hit = Some(RayHit::new(fixture, point, normal, fraction));
        }
        fraction
    }
}

/// Collects every hit, in the order they were reported.
#[derive(Clone, Debug, Default)]
pub struct AllHits {
    hits: Vec<RayHit>,
}

impl AllHits {
    pub fn new() -> AllHits {
        Default::default()
    }

    pub fn get_hits(&self) -> &[RayHit] {
        &self.hits
    }

    /// The hits, sorted by fraction along the ray.
    pub fn into_sorted_hits(mut self) -> Vec<RayHit> {
        self.hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        self.hits
    }
}

impl RayCastCallback for AllHits {
    fn report_fixture(&mut self, fixture: &Fixture, point: V2, normal: V2, fraction: f64) -> f64 {
        self.hits.push(RayHit::new(fixture, point, normal, fraction));
        1.0
    }
}

/// Stops at the first hit found, which need not be the closest.
#[derive(Clone, Debug, Default)]
pub struct AnyHit {
    hit: Option<RayHit>,
}

impl AnyHit {
    pub fn new() -> AnyHit {
        Default::default()
    }

    pub fn get_hit(&self) -> Option<&RayHit> {
        self.hit.as_ref()
    }

    pub fn into_hit(self) -> Option<RayHit> {
        self.hit
    }
}

impl RayCastCallback for AnyHit {
    fn report_fixture(&mut self, fixture: &Fixture, point: V2, normal: V2, fraction: f64) -> f64 {
        self.hit = Some(RayHit::new(fixture, point, normal, fraction));
        0.0
    }
}
