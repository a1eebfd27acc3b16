//! Per-machine network and disk counters

use crate::common::DisplayUnit;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Accumulated I/O, in gigabits
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IoCounters {
    /// Network receive
    pub net_rx: f64,
    /// Network transmit
    pub net_tx: f64,
    pub disk_write: f64,
    pub disk_read: f64,
}

impl IoCounters {
    /// Divide every counter by the unit's divisor
    pub fn scaled(&self, unit: DisplayUnit) -> Self {
        Self {
            net_rx: unit.scale(self.net_rx),
            net_tx: unit.scale(self.net_tx),
            disk_write: unit.scale(self.disk_write),
            disk_read: unit.scale(self.disk_read),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for IoCounters {
    type Output = IoCounters;

    fn add(mut self, rhs: IoCounters) -> IoCounters {
        self += rhs;
        self
    }
}

impl AddAssign for IoCounters {
    fn add_assign(&mut self, rhs: IoCounters) {
        self.net_rx += rhs.net_rx;
        self.net_tx += rhs.net_tx;
        self.disk_write += rhs.disk_write;
        self.disk_read += rhs.disk_read;
    }
}

impl Sum for IoCounters {
    fn sum<I: Iterator<Item = IoCounters>>(iter: I) -> Self {
        iter.fold(IoCounters::default(), |acc, c| acc + c)
    }
}

impl<'a> Sum<&'a IoCounters> for IoCounters {
    fn sum<I: Iterator<Item = &'a IoCounters>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_scale() {
        let a = IoCounters {
            net_rx: 8.0,
            net_tx: 16.0,
            disk_write: 24.0,
            disk_read: 0.0,
        };
        let b = IoCounters {
            net_rx: 8.0,
            ..Default::default()
        };

        let total: IoCounters = [a, b].iter().sum();
        assert_eq!(total.net_rx, 16.0);
        assert_eq!(total.net_tx, 16.0);

        let bytes = total.scaled(DisplayUnit::Byte);
        assert_eq!(bytes.net_rx, 2.0);
        assert_eq!(bytes.disk_write, 3.0);
        assert!(!bytes.is_zero());
        assert!(IoCounters::default().is_zero());
    }
}
