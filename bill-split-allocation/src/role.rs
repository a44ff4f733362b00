use core::fmt::{self, Display};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Result};

/// The fixed set of roles a participant can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Junior,
    Middle,
    Senior,
    Manager,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Junior, Self::Middle, Self::Senior, Self::Manager];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Middle => "middle",
            Self::Senior => "senior",
            Self::Manager => "manager",
        }
    }

    /// Label shown to users in summaries and exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Junior => "ジュニア",
            Self::Middle => "ミドル",
            Self::Senior => "シニア",
            Self::Manager => "マネージャー",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AllocationError;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| AllocationError::UnknownRole(value.to_owned()))
    }
}

#[derive(Deserialize)]
struct RawCoefficientTable {
    junior: f64,
    middle: f64,
    senior: f64,
    manager: f64,
}

/// Weight per role. Every value is positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoefficientTable")]
pub struct CoefficientTable {
    junior: f64,
    middle: f64,
    senior: f64,
    manager: f64,
}

impl CoefficientTable {
    pub const DEFAULT: Self = Self {
        junior: 1.0,
        middle: 1.3,
        senior: 1.5,
        manager: 2.0,
    };

    pub fn new(junior: f64, middle: f64, senior: f64, manager: f64) -> Result<Self> {
        let table = Self {
            junior,
            middle,
            senior,
            manager,
        };
        table.check()?;
        Ok(table)
    }

    #[must_use]
    pub const fn get(&self, role: Role) -> f64 {
        match role {
            Role::Junior => self.junior,
            Role::Middle => self.middle,
            Role::Senior => self.senior,
            Role::Manager => self.manager,
        }
    }

    /// Returns a copy of the table with the coefficient of `role` replaced.
    pub fn with(mut self, role: Role, value: f64) -> Result<Self> {
        check_coefficient(role, value)?;
        match role {
            Role::Junior => self.junior = value,
            Role::Middle => self.middle = value,
            Role::Senior => self.senior = value,
            Role::Manager => self.manager = value,
        }
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, f64)> + '_ {
        Role::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    fn check(&self) -> Result<()> {
        self.iter()
            .try_for_each(|(role, value)| check_coefficient(role, value))
    }
}

impl Default for CoefficientTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<RawCoefficientTable> for CoefficientTable {
    type Error = AllocationError;

    fn try_from(raw: RawCoefficientTable) -> Result<Self> {
        Self::new(raw.junior, raw.middle, raw.senior, raw.manager)
    }
}

fn check_coefficient(role: Role, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AllocationError::InvalidCoefficient { role, value })
    }
}

/// Weight resolver: the coefficient a participant of `role` is weighted with.
#[must_use]
pub const fn resolve_coefficient(role: Role, table: &CoefficientTable) -> f64 {
    table.get(role)
}
