pub(crate) mod macros;

pub mod employee;
pub mod isr_bracket;
pub mod legal_parameter;
pub mod payroll_entry;

// Re-export all models for easy importing
pub use employee::*;
pub use isr_bracket::*;
pub use legal_parameter::*;
pub use payroll_entry::*;
