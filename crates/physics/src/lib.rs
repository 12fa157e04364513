//! 2d geometry, shapes, and ray casts against a world of fixtures.
//!
//! The entry point is [World]: create bodies, attach fixtures with shapes to them, and cast rays with
//! [World::raycast] and friends.

mod aabb;
mod callback;
mod chain;
mod circle;
mod dynamic_tree;
mod edge;
mod errors;
mod filter;
mod fixture;
mod polygon;
mod ray;
mod raycasting;
mod shape;
mod transform;
mod v2;
mod world;

pub use aabb::*;
pub use callback::*;
pub use chain::*;
pub use circle::*;
pub use dynamic_tree::*;
pub use edge::*;
pub use errors::*;
pub use filter::*;
pub use fixture::*;
pub use polygon::*;
pub use ray::*;
pub use raycasting::*;
pub use shape::*;
pub use transform::*;
pub use v2::*;
pub use world::*;
