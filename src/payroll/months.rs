use serde::{Deserialize, Serialize};

use super::error::PayrollError;

/// Set of calendar months (1-12) in which a deduction applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct MonthSet(u16);

impl MonthSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b1_1111_1111_1110)
    }

    pub fn from_months<I>(months: I) -> Result<Self, PayrollError>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut bits = 0u16;
        for month in months {
            if !(1..=12).contains(&month) {
                return Err(PayrollError::MonthOutOfRange(month));
            }
            bits |= 1 << month;
        }
        Ok(Self(bits))
    }

    pub fn contains(&self, month: u32) -> bool {
        (1..=12).contains(&month) && self.0 & (1 << month) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=12u32).filter(move |m| self.contains(*m))
    }
}

impl TryFrom<Vec<u8>> for MonthSet {
    type Error = PayrollError;

    fn try_from(months: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_months(months.into_iter().map(i32::from))
    }
}

impl TryFrom<&[i16]> for MonthSet {
    type Error = PayrollError;

    fn try_from(months: &[i16]) -> Result<Self, Self::Error> {
        Self::from_months(months.iter().map(|m| i32::from(*m)))
    }
}

impl From<MonthSet> for Vec<u8> {
    fn from(set: MonthSet) -> Self {
        set.iter().map(|m| m as u8).collect()
    }
}
