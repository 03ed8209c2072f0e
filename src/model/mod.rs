pub mod absence;
pub mod employee;
pub mod payroll;
pub mod sale;
pub mod tier;
