pub mod charts;
pub mod frequency;

pub use charts::{BarChart, Histogram, TagCloud};
pub use frequency::{compare, ComparisonRow, WordFrequencies};
