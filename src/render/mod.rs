pub mod bar_chart;
pub mod error;
pub mod site_map;
