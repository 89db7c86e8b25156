use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use super::error::PayrollError;
use super::isr::IsrTable;
use super::legal_parameters::LegalParameterIndex;
use crate::database::models::{IsrBracket, LegalParameter, LegalParameterName};

/// One company's statutory configuration, indexed once for a whole run.
///
/// A malformed table does not prevent construction: the error is kept and
/// returned from every lookup, so each employee of the run reports it.
#[derive(Debug, Clone)]
pub struct CompanyRules {
    company_id: Uuid,
    parameters: Result<LegalParameterIndex, PayrollError>,
    brackets: Result<IsrTable, PayrollError>,
}

impl CompanyRules {
    pub fn new(company_id: Uuid, parameters: &[LegalParameter], brackets: &[IsrBracket]) -> Self {
        Self {
            company_id,
            parameters: LegalParameterIndex::build(company_id, parameters),
            brackets: IsrTable::build(company_id, brackets),
        }
    }

    pub fn company_id(&self) -> Uuid {
        self.company_id
    }

    pub fn rate(&self, name: LegalParameterName, date: NaiveDate) -> Result<&BigDecimal, PayrollError> {
        self.parameters.as_ref().map_err(Clone::clone)?.resolve(name, date)
    }

    pub fn withholding(&self, taxable_amount: &BigDecimal) -> Result<BigDecimal, PayrollError> {
        self.brackets
            .as_ref()
            .map_err(Clone::clone)?
            .withholding(taxable_amount)
    }
}
