pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
