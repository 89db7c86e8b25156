pub mod calculations;
pub mod payroll;
pub mod shared;
