use anyhow::{Result, anyhow};
use std::env;

use crate::payroll::{BracketBasis, DeductionOverflow, PayrollPolicy, TaxableBase};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub bracket_basis: BracketBasis,
    pub taxable_base: TaxableBase,
    pub deduction_overflow: DeductionOverflow,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        // Unreadable payroll policy values are errors, not defaults
        let periods_per_year: u32 = match env::var("PAYROLL_PERIODS_PER_YEAR") {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| anyhow!("PAYROLL_PERIODS_PER_YEAR: {}: {}", value, e))?,
            Err(_) => 12,
        };
        let bracket_basis = match env::var("PAYROLL_BRACKET_BASIS") {
            Ok(value) => BracketBasis::parse(&value, periods_per_year)
                .map_err(|e| anyhow!("PAYROLL_BRACKET_BASIS: {}", e))?,
            Err(_) => BracketBasis::default(),
        };
        let taxable_base = match env::var("PAYROLL_TAXABLE_BASE") {
            Ok(value) => value
                .parse()
                .map_err(|e| anyhow!("PAYROLL_TAXABLE_BASE: {}", e))?,
            Err(_) => TaxableBase::default(),
        };
        let deduction_overflow = match env::var("PAYROLL_DEDUCTION_OVERFLOW") {
            Ok(value) => value
                .parse()
                .map_err(|e| anyhow!("PAYROLL_DEDUCTION_OVERFLOW: {}", e))?,
            Err(_) => DeductionOverflow::default(),
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/payroll".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            bracket_basis,
            taxable_base,
            deduction_overflow,
        })
    }

    pub fn payroll_policy(&self) -> PayrollPolicy {
        PayrollPolicy {
            bracket_basis: self.bracket_basis,
            taxable_base: self.taxable_base,
            deduction_overflow: self.deduction_overflow,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
