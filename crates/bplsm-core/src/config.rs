use crate::{Error, Result};
use std::fmt;

pub const MIN_ORDER: usize = 3;
pub const MIN_GROWTH_FACTOR: usize = 2;

/// Validated fan-out of an ordered tree.
///
/// Bounds both the number of records in a leaf and the number of children of an
/// interior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order(usize);

impl Order {
    pub fn new(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidConfig(format!(
                "order must be at least {}, got {}",
                MIN_ORDER, order
            )));
        }
        Ok(Order(order))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Minimum records (leaf) or children (interior) of a non-root node.
    pub fn floor(self) -> usize {
        (self.0 / 2).max(2)
    }

    /// Records kept by the left half of a leaf split.
    pub(crate) fn leaf_split_point(self) -> usize {
        (self.0 + 2) / 2
    }

    /// Children kept by the left half of an interior split.
    pub(crate) fn interior_split_point(self) -> usize {
        (self.0 + 2) / 2
    }
}

impl TryFrom<usize> for Order {
    type Error = Error;

    fn try_from(order: usize) -> Result<Self> {
        Order::new(order)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Writes buffered in level 0 before it is merged down.
    pub l0_capacity: usize,
    /// Capacity multiplier from one level to the next.
    pub growth_factor: usize,
    /// Fan-out of every level's tree.
    pub order: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            l0_capacity: 1024,
            growth_factor: 10,
            order: 64,
        }
    }
}

impl Config {
    pub fn new(l0_capacity: usize, growth_factor: usize, order: usize) -> Self {
        Config {
            l0_capacity,
            growth_factor,
            order,
        }
    }

    pub fn validate(&self) -> Result<()> {
        Order::new(self.order)?;

        if self.l0_capacity == 0 {
            return Err(Error::InvalidConfig(
                "l0_capacity must be greater than 0".to_string(),
            ));
        }

        if self.growth_factor < MIN_GROWTH_FACTOR {
            return Err(Error::InvalidConfig(format!(
                "growth_factor must be at least {}, got {}",
                MIN_GROWTH_FACTOR, self.growth_factor
            )));
        }

        Ok(())
    }

    /// Target capacity of `level`: `l0_capacity * growth_factor^level`, saturating.
    pub fn level_capacity(&self, level: usize) -> usize {
        let exp = u32::try_from(level).unwrap_or(u32::MAX);
        self.l0_capacity
            .saturating_mul(self.growth_factor.saturating_pow(exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_order_too_small() {
        assert!(matches!(Order::new(2), Err(Error::InvalidConfig(_))));
        assert!(Order::new(3).is_ok());

        let config = Config::new(6, 2, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_capacity_and_growth() {
        assert!(Config::new(0, 2, 3).validate().is_err());
        assert!(Config::new(6, 1, 3).validate().is_err());
        assert!(Config::new(6, 2, 3).validate().is_ok());
    }

    #[test]
    fn test_floor_and_split_points() {
        let three = Order::new(3).unwrap();
        assert_eq!(three.floor(), 2);
        assert_eq!(three.leaf_split_point(), 2);
        assert_eq!(three.interior_split_point(), 2);

        let four = Order::new(4).unwrap();
        assert_eq!(four.floor(), 2);
        assert_eq!(four.leaf_split_point(), 3);

        let seven = Order::new(7).unwrap();
        assert_eq!(seven.floor(), 3);
        assert_eq!(seven.leaf_split_point(), 4);
    }

    #[test]
    fn test_level_capacity() {
        let config = Config::new(6, 2, 3);
        assert_eq!(config.level_capacity(0), 6);
        assert_eq!(config.level_capacity(1), 12);
        assert_eq!(config.level_capacity(3), 48);
        assert_eq!(config.level_capacity(200), usize::MAX);
    }
}
