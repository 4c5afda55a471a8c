pub mod csv;
pub mod json;

pub use csv::{write_pole_table, write_pole_table_file};
pub use json::{write_design, write_design_file, DesignSummary};
