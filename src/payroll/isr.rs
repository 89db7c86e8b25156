//! Progressive income tax (ISR) withholding.

use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use super::error::PayrollError;
use super::{percent_of, round_money};
use crate::database::models::IsrBracket;

/// Largest step allowed between one bracket's upper bound and the next
/// bracket's lower bound.
fn contiguity_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

/// Validated bracket table of one company, sorted by lower bound, ending in
/// exactly one unbounded bracket.
#[derive(Debug, Clone)]
pub struct IsrTable {
    company_id: Uuid,
    brackets: Vec<IsrBracket>,
}

impl IsrTable {
    pub fn build(company_id: Uuid, brackets: &[IsrBracket]) -> Result<Self, PayrollError> {
        let mut brackets: Vec<IsrBracket> = brackets
            .iter()
            .filter(|b| b.company_id == company_id && b.active)
            .cloned()
            .collect();

        if brackets.is_empty() {
            return Err(PayrollError::NoBracketConfigured {
                company_id,
                employee_id: None,
                taxable_amount: None,
            });
        }

        brackets.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));

        let malformed = |detail: String| PayrollError::BracketGapOrOverlap {
            company_id,
            employee_id: None,
            detail,
        };

        for bracket in &brackets {
            if let Some(upper) = &bracket.upper_bound {
                if upper < &bracket.lower_bound {
                    return Err(malformed(format!(
                        "bracket starting at {} ends below its lower bound at {}",
                        bracket.lower_bound, upper
                    )));
                }
            }
        }

        let tolerance = contiguity_tolerance();
        for pair in brackets.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let Some(upper) = &current.upper_bound else {
                return Err(malformed(format!(
                    "unbounded bracket starting at {} is followed by a bracket starting at {}",
                    current.lower_bound, next.lower_bound
                )));
            };

            let step = &next.lower_bound - upper;
            if step < BigDecimal::zero() {
                return Err(malformed(format!(
                    "bracket ending at {} overlaps bracket starting at {}",
                    upper, next.lower_bound
                )));
            }
            if step > tolerance {
                return Err(malformed(format!(
                    "gap between {} and {}",
                    upper, next.lower_bound
                )));
            }
        }

        if let Some(top) = brackets.last() {
            if let Some(upper) = &top.upper_bound {
                return Err(malformed(format!(
                    "no unbounded top bracket; highest bracket ends at {}",
                    upper
                )));
            }
        }

        Ok(Self { company_id, brackets })
    }

    pub fn brackets(&self) -> &[IsrBracket] {
        &self.brackets
    }

    /// The bracket covering `amount`. An amount equal to a bracket's upper
    /// bound belongs to that bracket rather than the next one.
    pub fn bracket_for(&self, amount: &BigDecimal) -> Result<&IsrBracket, PayrollError> {
        let amount = round_money(amount);
        let uncovered = || PayrollError::NoBracketConfigured {
            company_id: self.company_id,
            employee_id: None,
            taxable_amount: Some(amount.clone()),
        };

        let position = self
            .brackets
            .iter()
            .position(|b| b.upper_bound.as_ref().is_none_or(|upper| &amount <= upper))
            .ok_or_else(uncovered)?;

        let bracket = &self.brackets[position];
        // Gaps between brackets are rejected at build time, so an amount under
        // the lower bound can only fall below the first bracket.
        if position == 0 && amount < bracket.lower_bound {
            return Err(uncovered());
        }
        Ok(bracket)
    }

    /// `(amount − lower) × percentage / 100 + fixed deduction`, in cents.
    pub fn withholding(&self, amount: &BigDecimal) -> Result<BigDecimal, PayrollError> {
        let amount = round_money(amount);
        let bracket = self.bracket_for(&amount)?;

        let mut excess = &amount - &bracket.lower_bound;
        if excess < BigDecimal::zero() {
            // Inside the one-cent step between two brackets.
            excess = BigDecimal::zero();
        }
        Ok(round_money(
            &(percent_of(&excess, &bracket.percentage) + &bracket.fixed_deduction),
        ))
    }
}

/// One-off withholding over a raw bracket list.
pub fn compute_withholding(
    company_id: Uuid,
    brackets: &[IsrBracket],
    taxable_amount: &BigDecimal,
) -> Result<BigDecimal, PayrollError> {
    IsrTable::build(company_id, brackets)?.withholding(taxable_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(v: &str) -> BigDecimal {
        BigDecimal::from_str(v).unwrap()
    }

    fn bracket(company_id: Uuid, lower: &str, upper: Option<&str>, pct: &str, fixed: &str) -> IsrBracket {
        IsrBracket {
            id: Uuid::new_v4(),
            company_id,
            lower_bound: dec(lower),
            upper_bound: upper.map(dec),
            percentage: dec(pct),
            fixed_deduction: dec(fixed),
            active: true,
            created_at: Utc::now(),
        }
    }

    fn standard(company_id: Uuid) -> Vec<IsrBracket> {
        vec![
            bracket(company_id, "50000.01", None, "25", "6650"),
            bracket(company_id, "0", Some("11000"), "0", "0"),
            bracket(company_id, "11000.01", Some("50000"), "15", "1650"),
        ]
    }

    #[test]
    fn every_amount_maps_to_one_bracket_and_boundaries_stay_low() {
        let company = Uuid::new_v4();
        let table = IsrTable::build(company, &standard(company)).unwrap();

        let lower_of = |amount: &str| table.bracket_for(&dec(amount)).unwrap().lower_bound.clone();
        assert_eq!(lower_of("0"), dec("0"));
        assert_eq!(lower_of("11000"), dec("0"));
        assert_eq!(lower_of("11000.01"), dec("11000.01"));
        assert_eq!(lower_of("50000"), dec("11000.01"));
        assert_eq!(lower_of("50000.01"), dec("50000.01"));
        assert_eq!(lower_of("1000000"), dec("50000.01"));
    }

    #[test]
    fn withholding_formula() {
        let company = Uuid::new_v4();
        let table = IsrTable::build(company, &standard(company)).unwrap();

        assert_eq!(table.withholding(&dec("1958.00")).unwrap(), dec("0.00"));
        // (17800 − 11000.01) × 15% + 1650 = 2669.9985
        assert_eq!(table.withholding(&dec("17800")).unwrap(), dec("2670.00"));
        assert_eq!(table.withholding(&dec("50000")).unwrap(), dec("7500.00"));
        assert_eq!(table.withholding(&dec("50000.01")).unwrap(), dec("6650.00"));
        assert_eq!(table.withholding(&dec("60000.01")).unwrap(), dec("9150.00"));
    }

    #[test]
    fn empty_table_is_not_configured() {
        let company = Uuid::new_v4();
        let other = standard(Uuid::new_v4());
        let err = compute_withholding(company, &other, &dec("100")).unwrap_err();
        assert!(matches!(err, PayrollError::NoBracketConfigured { taxable_amount: None, .. }));
    }

    #[test]
    fn amount_below_lowest_bracket_is_not_configured() {
        let company = Uuid::new_v4();
        let brackets = vec![
            bracket(company, "100", Some("200"), "0", "0"),
            bracket(company, "200.01", None, "10", "0"),
        ];
        let err = compute_withholding(company, &brackets, &dec("50")).unwrap_err();
        assert!(matches!(err, PayrollError::NoBracketConfigured { taxable_amount: Some(_), .. }));
    }

    #[test]
    fn malformed_tables_are_rejected() {
        let company = Uuid::new_v4();
        let cases = vec![
            // gap
            vec![
                bracket(company, "0", Some("11000"), "0", "0"),
                bracket(company, "12000", None, "15", "0"),
            ],
            // overlap
            vec![
                bracket(company, "0", Some("11000"), "0", "0"),
                bracket(company, "10000", None, "15", "0"),
            ],
            // unbounded bracket in the middle
            vec![
                bracket(company, "0", None, "0", "0"),
                bracket(company, "11000.01", None, "15", "0"),
            ],
            // no unbounded top
            vec![
                bracket(company, "0", Some("11000"), "0", "0"),
                bracket(company, "11000.01", Some("50000"), "15", "0"),
            ],
            // inverted bounds
            vec![bracket(company, "100", Some("50"), "0", "0")],
        ];

        for brackets in cases {
            let err = IsrTable::build(company, &brackets).unwrap_err();
            assert!(
                matches!(err, PayrollError::BracketGapOrOverlap { .. }),
                "expected malformed table error, got {:?}",
                err
            );
        }
    }

    #[test]
    fn inactive_brackets_are_ignored() {
        let company = Uuid::new_v4();
        let mut brackets = standard(company);
        let mut stale = bracket(company, "0", Some("5000"), "50", "0");
        stale.active = false;
        brackets.push(stale);

        let table = IsrTable::build(company, &brackets).unwrap();
        assert_eq!(table.brackets().len(), 3);
    }
}
