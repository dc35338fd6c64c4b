//! Upload a CSV file, clean it (deduplicate, drop or fill missing values),
//! inspect statistics and charts, and export the result as a spreadsheet.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
