//! Minefield generation settings and errors.

use std::fmt;

use rand::Rng;

/// Errors from minefield configuration and mine placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// `mine_min` exceeds `mine_max`.
    InvalidMineBounds { mine_min: u64, mine_max: u64 },
    /// A placement quota exceeds the target region's tile capacity.
    /// Detected up front, before any placement.
    QuotaExceedsCapacity { quota: u64, capacity: u64 },
    /// Rejection sampling exhausted its retry budget; the requested quota
    /// saturates the target region.
    PlacementStalled { placed: u64, quota: u64 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidMineBounds { mine_min, mine_max } => write!(
                f,
                "invalid mine bounds: min {} exceeds max {}",
                mine_min, mine_max
            ),
            FieldError::QuotaExceedsCapacity { quota, capacity } => write!(
                f,
                "mine quota {} exceeds region capacity of {} tiles",
                quota, capacity
            ),
            FieldError::PlacementStalled { placed, quota } => write!(
                f,
                "mine placement stalled after {} of {} mines; region too saturated",
                placed, quota
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Bounds and result of the mine-count draw for a minefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSettings {
    /// The fewest mines that can be placed on generation.
    pub mine_min: u64,
    /// One past the most mines that can be placed on generation.
    pub mine_max: u64,
    /// The count actually used, drawn once by [`FieldSettings::roll_mine_count`].
    pub mine_count: u64,
}

impl FieldSettings {
    pub const fn new(mine_min: u64, mine_max: u64) -> Self {
        Self {
            mine_min,
            mine_max,
            mine_count: 0,
        }
    }

    /// Draw `mine_count` uniformly from `[mine_min, mine_max)`, store it,
    /// and return it.
    ///
    /// A single-value range (`mine_min == mine_max`) yields `mine_min`.
    pub fn roll_mine_count<R: Rng>(&mut self, rng: &mut R) -> Result<u64, FieldError> {
        if self.mine_min > self.mine_max {
            return Err(FieldError::InvalidMineBounds {
                mine_min: self.mine_min,
                mine_max: self.mine_max,
            });
        }
        self.mine_count = if self.mine_min == self.mine_max {
            self.mine_min
        } else {
            rng.random_range(self.mine_min..self.mine_max)
        };
        Ok(self.mine_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_roll_stays_in_half_open_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut settings = FieldSettings::new(204, 312);
        for _ in 0..200 {
            let count = settings.roll_mine_count(&mut rng).unwrap();
            assert!((204..312).contains(&count));
            assert_eq!(count, settings.mine_count);
        }
    }

    #[test]
    fn test_single_value_range_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut settings = FieldSettings::new(10, 11);
        assert_eq!(settings.roll_mine_count(&mut rng).unwrap(), 10);
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut settings = FieldSettings::new(20, 10);
        assert_eq!(
            settings.roll_mine_count(&mut rng),
            Err(FieldError::InvalidMineBounds {
                mine_min: 20,
                mine_max: 10,
            })
        );
    }
}
