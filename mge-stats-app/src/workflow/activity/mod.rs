pub mod daily;
pub mod heatmap;
