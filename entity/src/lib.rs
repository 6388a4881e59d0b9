pub mod advance;
pub mod employee;
pub mod work_entry;
