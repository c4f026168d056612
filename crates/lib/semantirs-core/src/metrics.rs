use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::Deserialize;

/// A trait that marks a measured physical quantity. All quantities in the models are stored
/// as one of the unit types below so that decibels never get added to milliseconds.
pub trait Metric: Default + PartialEq + PartialOrd + Copy + Clone + Send + Sync {
    fn as_f64(&self) -> f64;
}

/// An enum that represents the feasibility of a metric. This is used as return type of the
/// feasibility evaluation so that the caller can get the feasibility and the actual value of the
/// metric that was measured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feasibility<M>
where
    M: Metric,
{
    Feasible(M),
    Infeasible(M),
}

impl<M: Metric> Feasibility<M> {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible(_))
    }

    pub fn value(&self) -> M {
        match self {
            Feasibility::Feasible(m) | Feasibility::Infeasible(m) => *m,
        }
    }
}

macro_rules! unit_metric {
    ($(#[$doc:meta])* $name:ident, $suffix:literal) => {
        $(#[$doc])*
        #[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
        pub struct $name(f64);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            pub fn clamp(self, lower: Self, upper: Self) -> Self {
                Self(self.0.clamp(lower.0, upper.0))
            }
        }

        impl Metric for $name {
            fn as_f64(&self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.3} {}", self.0, $suffix)
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + x)
            }
        }
    };
}

unit_metric!(
    /// Logarithmic power ratio or absolute power level (dB, dBm).
    Decibel,
    "dB"
);
unit_metric!(Meters, "m");
unit_metric!(Milliseconds, "ms");
unit_metric!(Kilobytes, "KB");
unit_metric!(
    /// Data rate in megabits per second.
    Mbps,
    "Mbps"
);
unit_metric!(MilliJoules, "mJ");

impl Decibel {
    /// Converts a decibel value to its linear ratio.
    pub fn to_linear(self) -> f64 {
        10f64.powf(self.0 / 10.0)
    }
}

impl Kilobytes {
    /// Payload size in bits, with 1 KB taken as 1024 bytes.
    pub fn as_bits(&self) -> f64 {
        self.0 * 8.0 * 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_arithmetic() {
        let total: Milliseconds = [1.0, 2.5, 0.5]
            .into_iter()
            .map(Milliseconds::new)
            .sum();
        assert_eq!(total, Milliseconds::new(4.0));
        assert_eq!(Decibel::new(20.0) - Decibel::new(5.0), Decibel::new(15.0));
        assert_eq!(Kilobytes::new(10.0) * 0.5, Kilobytes::new(5.0));
    }

    #[test]
    fn test_conversions() {
        assert!((Decibel::new(30.0).to_linear() - 1000.0).abs() < 1e-9);
        assert_eq!(Kilobytes::new(1.0).as_bits(), 8192.0);
        assert_eq!(Meters::new(300.0).clamp(Meters::new(1.0), Meters::new(250.0)).as_f64(), 250.0);
    }

    #[test]
    fn test_feasibility_value() {
        let verdict = Feasibility::Infeasible(Decibel::new(1.5));
        assert!(!verdict.is_feasible());
        assert_eq!(verdict.value(), Decibel::new(1.5));
    }
}
