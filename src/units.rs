//! This module defines the physical and financial quantities used in LCOE calculations.
//!
//! Each quantity is a thin wrapper around an `f64`. Only the arithmetic which makes sense
//! dimensionally is implemented, so that (for example) a cost per unit of energy cannot
//! accidentally be multiplied by a capacity.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN.
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// The absolute value of the quantity.
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |acc, x| acc + x)
            }
        }

        impl std::ops::Div for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                float_cmp::ApproxEq::approx_eq(self.0, other.0, margin)
            }
        }
    };
}

macro_rules! impl_scale {
    ($name:ident) => {
        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

unit_struct!(Dimensionless);

impl Dimensionless {
    /// Raise to a real power.
    pub fn powf(self, rhs: f64) -> Self {
        Self(self.0.powf(rhs))
    }
}

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

// Base quantities
unit_struct!(Money);
unit_struct!(Year);
unit_struct!(Hours);
unit_struct!(Energy);
unit_struct!(Capacity);

// Derived quantities
unit_struct!(MoneyPerYear);
unit_struct!(MoneyPerEnergy);
unit_struct!(MoneyPerCapacity);
unit_struct!(MoneyPerCapacityPerYear);
unit_struct!(MoneyPerEmissions);
unit_struct!(EmissionsPerEnergy);

impl_scale!(Money);
impl_scale!(Energy);
impl_scale!(Capacity);
impl_scale!(MoneyPerEnergy);
impl_scale!(MoneyPerCapacity);

// Multiplication rules
impl_mul!(MoneyPerCapacity, Capacity, Money);
impl_mul!(MoneyPerCapacityPerYear, Capacity, MoneyPerYear);
impl_mul!(MoneyPerYear, Year, Money);
impl_mul!(Capacity, Hours, Energy);
impl_mul!(MoneyPerEnergy, Energy, Money);
impl_mul!(MoneyPerEmissions, EmissionsPerEnergy, MoneyPerEnergy);

// Division rules
impl_div!(Money, Energy, MoneyPerEnergy);
impl_div!(Money, Capacity, MoneyPerCapacity);
impl_div!(Energy, Capacity, Hours);
