//! The world: a registry of bodies and fixtures, indexed by a [DynamicTree] for ray casts.
use log::*;
use slab::Slab;

use crate::callback::RayCastControl;
use crate::dynamic_tree::DynamicTree;
use crate::fixture::Body;
use crate::raycasting::*;
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// How far to grow fixture boxes in the tree.  Larger margins mean fewer tree updates as bodies move, and more
    /// candidates for every ray cast.
    pub aabb_margin: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            aabb_margin: DEFAULT_AABB_MARGIN,
        }
    }
}

#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    bodies: Slab<Body>,
    fixtures: Slab<Fixture>,
    tree: DynamicTree<FixtureId>,
}

impl World {
    pub fn new(config: WorldConfig) -> World {
        World {
            config,
            bodies: Slab::new(),
            fixtures: Slab::new(),
            tree: DynamicTree::new(config.aabb_margin),
        }
    }

    pub fn get_config(&self) -> &WorldConfig {
        &self.config
    }

    /// The broad phase, for diagnostics.
    pub fn get_tree(&self) -> &DynamicTree<FixtureId> {
        &self.tree
    }

    /// Fails with [Error::NonFiniteTransform] if any part of the transform is NaN or infinite.
    pub fn create_body(&mut self, transform: Transform) -> Result<BodyId> {
        if !transform.is_finite() {
            return Err(Error::NonFiniteTransform);
        }

        let id = BodyId(self.bodies.insert(Body::new(transform)));
        debug!("Created {} at {:?}", id, transform.get_position());
        Ok(id)
    }

    /// Destroy a body along with all of its fixtures.
    pub fn destroy_body(&mut self, id: BodyId) -> Result<()> {
        if !self.bodies.contains(id.0) {
            return Err(Error::UnknownBody(id));
        }

        let body = self.bodies.remove(id.0);
        for fixture_id in body.fixtures {
            let fixture = self.fixtures.remove(fixture_id.0);
            self.tree.remove(fixture.proxy);
        }

        debug!("Destroyed {}", id);
        Ok(())
    }

    /// Move a body, updating the tree for its fixtures.
    ///
    /// A non-finite transform is rejected and the body stays where it was.
    pub fn set_body_transform(&mut self, id: BodyId, transform: Transform) -> Result<()> {
        if !transform.is_finite() {
            return Err(Error::NonFiniteTransform);
        }

        let body = self.bodies.get_mut(id.0).ok_or(Error::UnknownBody(id))?;
        body.transform = transform;

        for fixture_id in body.fixtures.iter() {
            let fixture = self
                .fixtures
                .get(fixture_id.0)
                .expect("Fixtures of a live body should be registered");
            let aabb = fixture.shape.get_bounding_box(&transform);
            if self.tree.update(fixture.proxy, &aabb) {
                trace!("Reinserted {} into the tree", fixture_id);
            }
        }

        Ok(())
    }

    pub fn get_body_transform(&self, id: BodyId) -> Option<Transform> {
        self.bodies.get(id.0).map(|b| b.transform)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn create_fixture(&mut self, body_id: BodyId, def: FixtureDef) -> Result<FixtureId> {
        let body = self
            .bodies
            .get_mut(body_id.0)
            .ok_or(Error::UnknownBody(body_id))?;

        let entry = self.fixtures.vacant_entry();
        let id = FixtureId(entry.key());
        let aabb = def.shape.get_bounding_box(&body.transform);
        let proxy = self.tree.insert(&aabb, id);

        entry.insert(Fixture {
            id,
            body: body_id,
            shape: def.shape,
            filter: def.filter,
            is_sensor: def.is_sensor,
            proxy,
        });
        body.fixtures.push(id);

        debug!("Created {} on {}", id, body_id);
        Ok(id)
    }

    pub fn destroy_fixture(&mut self, id: FixtureId) -> Result<()> {
        if !self.fixtures.contains(id.0) {
            return Err(Error::UnknownFixture(id));
        }

        let fixture = self.fixtures.remove(id.0);
        self.tree.remove(fixture.proxy);
        self.bodies
            .get_mut(fixture.body.0)
            .expect("Fixtures should belong to live bodies")
            .fixtures
            .retain(|f| *f != id);

        debug!("Destroyed {}", id);
        Ok(())
    }

    pub fn get_fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.get(id.0)
    }

    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }

    /// Cast a ray from `origin` to `target`, reporting hits on non-sensor fixtures to `callback`.
    ///
    /// See [RayCastCallback] for how the callback steers the cast.  Closures need their argument types written out:
    ///
    /// ```ignore
    /// world.raycast(origin, target, &mut |fixture: &Fixture, point: V2, normal: V2, fraction: f64| {
    ///     fraction
    /// });
    /// ```
    pub fn raycast<C: RayCastCallback + ?Sized>(&self, origin: V2, target: V2, callback: &mut C) {
        self.raycast_filtered(origin, target, &QueryFilter::default(), callback);
    }

    /// Like [World::raycast], but only fixtures which `filter` accepts are tested.
    pub fn raycast_filtered<F: RayCastFilter + ?Sized, C: RayCastCallback + ?Sized>(
        &self,
        origin: V2,
        target: V2,
        filter: &F,
        callback: &mut C,
    ) {
        let ray = Ray::from_points(origin, target);
        if ray.is_degenerate() {
            debug!("Ignoring zero-length ray cast at {:?}", origin);
            return;
        }

        let mut query = self.tree.ray_query(RayCastInput::new(ray, 1.0));
        while let Some((_, fixture_id)) = query.next() {
            let fixture = self
                .fixtures
                .get(fixture_id.0)
                .expect("Fixtures in the tree should be registered");

            if !filter.should_report(fixture) {
                trace!("Filtered out {}", fixture_id);
                continue;
            }

            let body = self
                .bodies
                .get(fixture.body.0)
                .expect("Fixtures should belong to live bodies");

            let input = *query.get_input();
            let output = match fixture.shape.raycast(&input, &body.transform) {
                Some(o) if o.fraction <= input.max_fraction => o,
                _ => {
                    trace!("Ray missed {}", fixture_id);
                    continue;
                }
            };

            trace!("Ray hit {} at fraction {}", fixture_id, output.fraction);
            let reported =
                callback.report_fixture(fixture, output.point, output.normal, output.fraction);
            match RayCastControl::from_reported(reported) {
                RayCastControl::Ignore => {}
                RayCastControl::Continue => {}
                RayCastControl::Clip(f) => query.clip(f),
                RayCastControl::Terminate => {
                    debug!("Ray cast terminated by callback at {}", fixture_id);
                    return;
                }
            }
        }
    }

    /// The closest hit on a non-sensor fixture, if any.
    pub fn raycast_closest(&self, origin: V2, target: V2) -> Option<RayHit> {
        let mut closest = ClosestHit::new();
        self.raycast(origin, target, &mut closest);
        closest.into_hit()
    }

    /// Every hit on a non-sensor fixture, ordered along the ray.
    pub fn raycast_all(&self, origin: V2, target: V2) -> Vec<RayHit> {
        let mut all = AllHits::new();
        self.raycast(origin, target, &mut all);
        all.into_sorted_hits()
    }
}

impl Default for World {
    fn default() -> Self {
        World::new(Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use approx::*;

    fn add_circle(world: &mut World, x: f64, y: f64, radius: f64) -> crate::Result<FixtureId> {
        let body = world.create_body(Transform::from_position(V2::new(x, y)))?;
        world.create_fixture(
            body,
            FixtureDef::new(Circle::new(V2::new(0.0, 0.0), radius)?),
        )
    }

    /// Three unit circles along the x axis, at 2, 5 and 8.
    fn row_of_circles() -> crate::Result<(World, Vec<FixtureId>)> {
        let mut world = World::default();
        let ids = [2.0, 5.0, 8.0]
            .into_iter()
            .map(|x| add_circle(&mut world, x, 0.0, 1.0))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok((world, ids))
    }

    fn collect_with(world: &World, origin: V2, target: V2, reply: f64) -> Vec<(FixtureId, f64)> {
        let mut seen = vec![];
        world.raycast(
            origin,
            target,
            &mut |f: &Fixture, _p: V2, _n: V2, t: f64| {
                seen.push((f.get_id(), t));
                reply
            },
        );
        seen
    }

    #[test]
    fn test_circle_through_center() -> crate::Result<()> {
        ray2d_logging::init_test_logging();

        let mut world = World::default();
        let id = add_circle(&mut world, 0.0, 0.0, 1.0)?;
        let hit = world
            .raycast_closest(V2::new(-5.0, 0.0), V2::new(5.0, 0.0))
            .expect("Should hit the circle");

        assert_eq!(hit.fixture, id);
        assert_relative_eq!(hit.fraction, 0.4);
        assert_relative_eq!(hit.point.x, -1.0);
        assert_relative_eq!(hit.point.y, 0.0);
        assert_relative_eq!(hit.normal.x, -1.0);
        assert_relative_eq!(hit.normal.y, 0.0);
        Ok(())
    }

    #[test]
    fn test_closest() -> crate::Result<()> {
        let (world, ids) = row_of_circles()?;

        let hit = world
            .raycast_closest(V2::new(0.0, 0.0), V2::new(10.0, 0.0))
            .expect("Should hit");
        assert_eq!(hit.fixture, ids[0]);
        assert_relative_eq!(hit.fraction, 0.1);

        // And from the other side.
        let hit = world
            .raycast_closest(V2::new(10.0, 0.0), V2::new(0.0, 0.0))
            .expect("Should hit");
        assert_eq!(hit.fixture, ids[2]);
        assert_relative_eq!(hit.fraction, 0.1);
        Ok(())
    }

    #[test]
    fn test_continue_reports_everything_once() -> crate::Result<()> {
        let (world, ids) = row_of_circles()?;
        let seen = collect_with(&world, V2::new(0.0, 0.0), V2::new(10.0, 0.0), 1.0);

        assert_eq!(seen.len(), 3);
        let unique = seen.iter().map(|(id, _)| *id).collect::<HashSet<_>>();
        pretty_assertions::assert_eq!(unique, ids.into_iter().collect::<HashSet<_>>());

        let all = world.raycast_all(V2::new(0.0, 0.0), V2::new(10.0, 0.0));
        let fractions = all.iter().map(|h| h.fraction).collect::<Vec<_>>();
        assert_eq!(fractions.len(), 3);
        assert_relative_eq!(fractions[0], 0.1);
        assert_relative_eq!(fractions[1], 0.4);
        assert_relative_eq!(fractions[2], 0.7);
        Ok(())
    }

    #[test]
    fn test_terminate() -> crate::Result<()> {
        let (world, _) = row_of_circles()?;
        let seen = collect_with(&world, V2::new(0.0, 0.0), V2::new(10.0, 0.0), 0.0);
        assert_eq!(seen.len(), 1);

        let mut any = AnyHit::new();
        world.raycast(V2::new(0.0, 0.0), V2::new(10.0, 0.0), &mut any);
        assert!(any.get_hit().is_some());
        Ok(())
    }

    #[test]
    fn test_ignore_does_not_hide_others() -> crate::Result<()> {
        let (world, ids) = row_of_circles()?;
        let ignored = ids[0];

        // Continuing past the others means every one of them is reported.
        let mut seen = vec![];
        world.raycast(
            V2::new(0.0, 0.0),
            V2::new(10.0, 0.0),
            &mut |f: &Fixture, _p: V2, _n: V2, _t: f64| {
                if f.get_id() == ignored {
                    -1.0
                } else {
                    seen.push(f.get_id());
                    1.0
                }
            },
        );
        seen.sort();
        pretty_assertions::assert_eq!(seen, vec![ids[1], ids[2]]);

        // Clipping skips the ignored one and still finds the nearest of the rest.
        let mut closest: Option<(FixtureId, f64)> = None;
        world.raycast(
            V2::new(0.0, 0.0),
            V2::new(10.0, 0.0),
            &mut |f: &Fixture, _p: V2, _n: V2, t: f64| {
                if f.get_id() == ignored {
                    return -1.0;
                }
                if closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((f.get_id(), t));
                }
                t
            },
        );
        let (id, fraction) = closest.expect("Should hit past the ignored circle");
        assert_eq!(id, ids[1]);
        assert_relative_eq!(fraction, 0.4, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_non_finite_transforms() -> crate::Result<()> {
        let mut world = World::default();
        assert!(matches!(
            world.create_body(Transform::from_position(V2::new(f64::NAN, 0.0))),
            Err(Error::NonFiniteTransform)
        ));
        assert!(matches!(
            world.create_body(Transform::new(V2::new(0.0, 0.0), f64::INFINITY)),
            Err(Error::NonFiniteTransform)
        ));
        assert_eq!(world.body_count(), 0);

        let body = world.create_body(Transform::from_position(V2::new(5.0, 0.0)))?;
        world.create_fixture(body, FixtureDef::new(Circle::new(V2::new(0.0, 0.0), 1.0)?))?;
        assert!(matches!(
            world.set_body_transform(body, Transform::from_position(V2::new(f64::INFINITY, 0.0))),
            Err(Error::NonFiniteTransform)
        ));
        assert_eq!(
            world.get_body_transform(body).map(|t| t.get_position()),
            Some(V2::new(5.0, 0.0))
        );
        world.get_tree().validate();

        let hit = world
            .raycast_closest(V2::new(0.0, 0.0), V2::new(10.0, 0.0))
            .expect("Body should not have moved");
        assert_relative_eq!(hit.fraction, 0.4, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_clip_never_grows() -> crate::Result<()> {
        let (world, _) = row_of_circles()?;

        let mut fractions = vec![];
        world.raycast(
            V2::new(0.0, 0.0),
            V2::new(10.0, 0.0),
            &mut |_f: &Fixture, _p: V2, _n: V2, t: f64| {
                fractions.push(t);
                if fractions.len() == 1 {
                    0.5
                } else {
                    0.9
                }
            },
        );

        assert!(!fractions.is_empty());
        for t in &fractions[1..] {
            assert!(*t <= 0.5, "{:?}", fractions);
        }
        Ok(())
    }

    #[test]
    fn test_outside_bounds() -> crate::Result<()> {
        let (world, _) = row_of_circles()?;
        assert!(collect_with(&world, V2::new(0.0, 50.0), V2::new(10.0, 50.0), 1.0).is_empty());
        assert!(collect_with(&World::default(), V2::new(0.0, 0.0), V2::new(10.0, 0.0), 1.0).is_empty());
        Ok(())
    }

    #[test]
    fn test_zero_length_ray() -> crate::Result<()> {
        let (world, _) = row_of_circles()?;
        // Inside the first circle.
        let p = V2::new(2.0, 0.0);
        assert!(collect_with(&world, p, p, 1.0).is_empty());
        Ok(())
    }

    #[test]
    fn test_grazing_endpoint() -> crate::Result<()> {
        let mut world = World::default();
        add_circle(&mut world, 0.0, 0.0, 1.0)?;

        // The ray stops exactly on the circle.
        let hit = world
            .raycast_closest(V2::new(-5.0, 0.0), V2::new(-1.0, 0.0))
            .expect("Should hit at the very end");
        assert_relative_eq!(hit.fraction, 1.0);
        Ok(())
    }

    #[test]
    fn test_inside_polygon() -> crate::Result<()> {
        let mut world = World::default();
        let body = world.create_body(Transform::IDENTITY)?;
        world.create_fixture(body, FixtureDef::new(Polygon::new_box(2.0, 2.0)?))?;

        assert!(world
            .raycast_all(V2::new(-0.5, 0.0), V2::new(0.5, 0.0))
            .is_empty());

        let hit = world
            .raycast_closest(V2::new(-4.0, 0.0), V2::new(0.0, 0.0))
            .expect("Should hit from outside");
        assert_relative_eq!(hit.fraction, 0.5);
        assert_relative_eq!(hit.normal.x, -1.0);
        Ok(())
    }

    #[test]
    fn test_sensors() -> crate::Result<()> {
        let mut world = World::default();
        let body = world.create_body(Transform::IDENTITY)?;
        let sensor = world.create_fixture(
            body,
            FixtureDef::new(Circle::new(V2::new(0.0, 0.0), 1.0)?).sensor(true),
        )?;

        assert!(world.raycast_all(V2::new(-5.0, 0.0), V2::new(5.0, 0.0)).is_empty());

        let with_sensors = QueryFilter {
            include_sensors: true,
            ..Default::default()
        };
        let mut all = AllHits::new();
        world.raycast_filtered(V2::new(-5.0, 0.0), V2::new(5.0, 0.0), &with_sensors, &mut all);
        assert_eq!(all.get_hits().len(), 1);
        assert_eq!(all.get_hits()[0].fixture, sensor);
        Ok(())
    }

    #[test]
    fn test_category_filters() -> crate::Result<()> {
        let mut world = World::default();
        let body = world.create_body(Transform::IDENTITY)?;
        let left = world.create_fixture(
            body,
            FixtureDef::new(Circle::new(V2::new(-2.0, 0.0), 0.5)?).with_filter(Filter {
                category_bits: 0x0002,
                ..Default::default()
            }),
        )?;
        let right = world.create_fixture(
            body,
            FixtureDef::new(Circle::new(V2::new(2.0, 0.0), 0.5)?),
        )?;

        let only_default = QueryFilter {
            mask_bits: Filter::DEFAULT_CATEGORY,
            ..Default::default()
        };
        let mut closest = ClosestHit::new();
        world.raycast_filtered(V2::new(-5.0, 0.0), V2::new(5.0, 0.0), &only_default, &mut closest);
        assert_eq!(closest.get_hit().map(|h| h.fixture), Some(right));

        // Closures work too.
        let mut closest = ClosestHit::new();
        let not_right = |f: &Fixture| f.get_id() != right;
        world.raycast_filtered(V2::new(5.0, 0.0), V2::new(-5.0, 0.0), &not_right, &mut closest);
        assert_eq!(closest.get_hit().map(|h| h.fixture), Some(left));
        Ok(())
    }

    #[test]
    fn test_edges_and_chains() -> crate::Result<()> {
        let mut world = World::default();
        let body = world.create_body(Transform::from_position(V2::new(0.0, 1.0)))?;
        let floor = world.create_fixture(
            body,
            FixtureDef::new(Chain::new_open(vec![
                V2::new(-10.0, -1.0),
                V2::new(0.0, -1.0),
                V2::new(10.0, -1.0),
            ])?),
        )?;
        let wall = world.create_fixture(
            body,
            FixtureDef::new(Edge::new(V2::new(5.0, -1.0), V2::new(5.0, 5.0))?),
        )?;

        let down = world
            .raycast_closest(V2::new(0.0, 4.0), V2::new(0.0, -4.0))
            .expect("Should hit the floor");
        assert_eq!(down.fixture, floor);
        assert_relative_eq!(down.fraction, 0.5);
        assert_relative_eq!(down.normal.y, 1.0);

        let across = world
            .raycast_closest(V2::new(0.0, 2.0), V2::new(10.0, 2.0))
            .expect("Should hit the wall");
        assert_eq!(across.fixture, wall);
        assert_relative_eq!(across.normal.x, -1.0);
        Ok(())
    }

    #[test]
    fn test_registry() -> crate::Result<()> {
        let mut world = World::default();
        let body = world.create_body(Transform::IDENTITY)?;
        let a = world.create_fixture(body, FixtureDef::new(Circle::new(V2::new(0.0, 0.0), 1.0)?))?;
        let b = world.create_fixture(body, FixtureDef::new(Polygon::new_box(0.5, 0.5)?))?;
        assert_eq!(world.fixture_count(), 2);
        assert_eq!(world.get_fixture(a).map(|f| f.get_body()), Some(body));
        world.get_tree().validate();

        // Move the body far enough that the tree has to change.
        world.set_body_transform(body, Transform::from_position(V2::new(100.0, 0.0)))?;
        world.get_tree().validate();
        assert!(world.raycast_all(V2::new(-5.0, 0.0), V2::new(5.0, 0.0)).is_empty());
        assert_eq!(
            world.raycast_all(V2::new(95.0, 0.0), V2::new(105.0, 0.0)).len(),
            2
        );
        assert_eq!(
            world.get_body_transform(body).map(|t| t.get_position()),
            Some(V2::new(100.0, 0.0))
        );

        world.destroy_fixture(a)?;
        assert!(world.get_fixture(a).is_none());
        assert!(matches!(world.destroy_fixture(a), Err(Error::UnknownFixture(_))));
        let hits = world.raycast_all(V2::new(95.0, 0.0), V2::new(105.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fixture, b);

        world.destroy_body(body)?;
        assert_eq!(world.fixture_count(), 0);
        assert_eq!(world.body_count(), 0);
        assert!(world.get_tree().is_empty());
        world.get_tree().validate();
        assert!(matches!(world.destroy_body(body), Err(Error::UnknownBody(_))));
        assert!(matches!(
            world.create_fixture(body, FixtureDef::new(Polygon::new_box(1.0, 1.0)?)),
            Err(Error::UnknownBody(_))
        ));
        assert!(world.set_body_transform(body, Transform::IDENTITY).is_err());
        Ok(())
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<World>();
    }
}
