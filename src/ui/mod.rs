pub mod charts;
pub mod explore;
pub mod insights;
pub mod panels;
