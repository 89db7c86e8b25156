pub mod employee;
pub mod isr_bracket;
pub mod legal_parameter;
pub mod payroll_entry;
