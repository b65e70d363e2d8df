pub mod heatmap;

// Re-export the chart entry points
pub use heatmap::{draw_field_chart, export_png, export_svg};
