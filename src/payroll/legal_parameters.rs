//! Latest-effective-as-of lookup of statutory rates.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::error::PayrollError;
use crate::database::models::{LegalParameter, LegalParameterName};

/// Per-company index of active legal parameters, keyed by name. Each series
/// is sorted by effective date and holds at most one rate per date.
#[derive(Debug, Clone)]
pub struct LegalParameterIndex {
    company_id: Uuid,
    series: BTreeMap<LegalParameterName, Vec<(NaiveDate, BigDecimal)>>,
}

impl LegalParameterIndex {
    /// Index the active parameters of `company_id`. Rows of other companies
    /// and inactive rows are ignored.
    pub fn build(company_id: Uuid, parameters: &[LegalParameter]) -> Result<Self, PayrollError> {
        let mut series: BTreeMap<LegalParameterName, Vec<(NaiveDate, BigDecimal)>> = BTreeMap::new();

        for parameter in parameters
            .iter()
            .filter(|p| p.company_id == company_id && p.active)
        {
            series
                .entry(parameter.name)
                .or_default()
                .push((parameter.effective_from, parameter.percentage.clone()));
        }

        for (name, rates) in series.iter_mut() {
            rates.sort_by(|a, b| a.0.cmp(&b.0));

            if let Some(window) = rates.windows(2).find(|w| w[0].0 == w[1].0) {
                let effective_from = window[0].0;
                let count = rates.iter().filter(|(d, _)| *d == effective_from).count();
                return Err(PayrollError::ConflictingParameters {
                    company_id,
                    employee_id: None,
                    parameter: *name,
                    effective_from,
                    count,
                });
            }
        }

        Ok(Self { company_id, series })
    }

    pub fn company_id(&self) -> Uuid {
        self.company_id
    }

    /// Rate of `name` in effect on `date`: the one with the latest
    /// effective-from date not after `date`.
    pub fn resolve(&self, name: LegalParameterName, date: NaiveDate) -> Result<&BigDecimal, PayrollError> {
        let not_configured = || PayrollError::ParameterNotConfigured {
            company_id: self.company_id,
            employee_id: None,
            parameter: name,
            effective_date: date,
        };

        let rates = self.series.get(&name).ok_or_else(not_configured)?;
        let effective = rates.partition_point(|(from, _)| *from <= date);
        if effective == 0 {
            return Err(not_configured());
        }
        Ok(&rates[effective - 1].1)
    }
}

/// One-off resolution over a raw parameter list.
pub fn resolve(
    company_id: Uuid,
    name: LegalParameterName,
    date: NaiveDate,
    parameters: &[LegalParameter],
) -> Result<BigDecimal, PayrollError> {
    LegalParameterIndex::build(company_id, parameters)?
        .resolve(name, date)
        .cloned()
}
