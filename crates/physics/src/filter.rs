//! Collision filtering with categories, masks and groups, and the filters ray casts use to skip fixtures.
use crate::*;

/// Contact filtering data for a fixture.
///
/// Categories are bits: a fixture is in the categories set in `category_bits` and will collide with the categories set
/// in `mask_bits`.  Groups override this.  Two fixtures in the same positive group always collide, and two in the same
/// negative group never do.  Group 0 means no group.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, proptest_derive::Arbitrary)]
pub struct Filter {
    pub category_bits: u16,
    pub mask_bits: u16,
    pub group_index: i16,
}

impl Filter {
    pub const DEFAULT_CATEGORY: u16 = 0x0001;
    pub const ALL_CATEGORIES: u16 = 0xFFFF;

    pub fn should_collide(&self, other: &Filter) -> bool {
        if self.group_index != 0 && self.group_index == other.group_index {
            return self.group_index > 0;
        }

        (self.mask_bits & other.category_bits) != 0 && (self.category_bits & other.mask_bits) != 0
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            category_bits: Filter::DEFAULT_CATEGORY,
            mask_bits: Filter::ALL_CATEGORIES,
            group_index: 0,
        }
    }
}

/// Decides which fixtures a ray cast reports.
///
/// Rejected fixtures are skipped before any intersection math is done, and the callback never sees them.
pub trait RayCastFilter {
    fn should_report(&self, fixture: &Fixture) -> bool;
}

/// The usual way to filter a ray cast: by category, and whether sensors are wanted.
///
/// A fixture is reported if it is in one of the categories in `mask_bits`, and its own mask accepts one of the
/// categories in `category_bits`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct QueryFilter {
    pub category_bits: u16,
    pub mask_bits: u16,
    pub include_sensors: bool,
}

impl Default for QueryFilter {
    fn default() -> Self {
        QueryFilter {
            category_bits: Filter::ALL_CATEGORIES,
            mask_bits: Filter::ALL_CATEGORIES,
            include_sensors: false,
        }
    }
}

impl RayCastFilter for QueryFilter {
    fn should_report(&self, fixture: &Fixture) -> bool {
        if fixture.is_sensor() && !self.include_sensors {
            return false;
        }

        let filter = fixture.get_filter();
        (self.mask_bits & filter.category_bits) != 0 && (self.category_bits & filter.mask_bits) != 0
    }
}

impl<F: Fn(&Fixture) -> bool> RayCastFilter for F {
    fn should_report(&self, fixture: &Fixture) -> bool {
        self(fixture)
    }
}
