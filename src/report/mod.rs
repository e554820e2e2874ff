pub mod collector;
pub mod console;
pub mod render;
pub mod report_model;
pub mod search;
