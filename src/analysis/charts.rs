//! Chart-ready data built from word frequencies
//!
//! These types describe what to draw; rendering is left to the client.
use serde::{Deserialize, Serialize};

use super::frequency::WordFrequencies;

pub const DEFAULT_BAR_CHART_TOP_N: usize = 20;
pub const DEFAULT_TAG_CLOUD_TOP_N: usize = 80;
pub const TAG_CLOUD_MIN_FONT_SIZE: f64 = 12.0;
pub const TAG_CLOUD_MAX_FONT_SIZE: f64 = 48.0;
pub const TAG_CLOUD_COLUMNS: usize = 6;
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub word: String,
    pub count: usize,
}

/// Horizontal bar chart, bars in ascending display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn from_frequencies(frequencies: &WordFrequencies, top_n: usize, title: &str) -> Self {
        let mut bars: Vec<Bar> = frequencies
            .most_common(top_n)
            .into_iter()
            .map(|(word, count)| Bar { word, count })
            .collect();
        bars.reverse();

        Self {
            title: title.to_string(),
            bars,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub word: String,
    pub count: usize,
    pub font_size: f64,
    pub x: usize,
    /// Row index, growing downward as negative values
    pub y: i64,
}

/// Grid-laid tag wall with font size scaled by count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCloud {
    pub title: String,
    pub tags: Vec<Tag>,
}

impl TagCloud {
    pub fn from_frequencies(frequencies: &WordFrequencies, top_n: usize) -> Self {
        Self::with_font_range(
            frequencies,
            top_n,
            TAG_CLOUD_MIN_FONT_SIZE,
            TAG_CLOUD_MAX_FONT_SIZE,
        )
    }

    /// Tags in descending count order, laid out left to right in rows of six
    pub fn with_font_range(
        frequencies: &WordFrequencies,
        top_n: usize,
        min_size: f64,
        max_size: f64,
    ) -> Self {
        let items = frequencies.most_common(top_n);
        let min_count = items.iter().map(|(_, c)| *c).min().unwrap_or(0);
        let max_count = items.iter().map(|(_, c)| *c).max().unwrap_or(0);

        let tags = items
            .into_iter()
            .enumerate()
            .map(|(i, (word, count))| Tag {
                font_size: interpolate(count, min_count, max_count, min_size, max_size),
                x: i % TAG_CLOUD_COLUMNS,
                y: -((i / TAG_CLOUD_COLUMNS) as i64),
                word,
                count,
            })
            .collect();

        Self {
            title: "Interactive Tag Wall (descending sizes, hover for counts)".to_string(),
            tags,
        }
    }
}

/// Linear map of `count` from `[lo, hi]` onto `[min_size, max_size]`
///
/// A degenerate range maps everything to `max_size`.
fn interpolate(count: usize, lo: usize, hi: usize, min_size: f64, max_size: f64) -> f64 {
    if hi <= lo {
        return max_size;
    }
    let fraction = (count - lo) as f64 / (hi - lo) as f64;
    min_size + fraction * (max_size - min_size)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower bound
    pub start: usize,
    /// Exclusive upper bound
    pub end: usize,
    pub count: usize,
}

/// Distribution of per-text token counts in equal-width bins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub title: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn of_token_counts<S: AsRef<str>>(texts: &[S], bin_count: usize) -> Self {
        let lengths: Vec<usize> = texts
            .iter()
            .map(|text| text.as_ref().split_whitespace().count())
            .collect();
        Self::from_values(&lengths, bin_count, "Tokens per Text")
    }

    pub fn from_values(values: &[usize], bin_count: usize, title: &str) -> Self {
        let bins = match (values.iter().min(), values.iter().max()) {
            (Some(&min), Some(&max)) => {
                let bin_count = bin_count.max(1);
                let width = (max - min) / bin_count + 1;
                let used = (max - min) / width + 1;

                let mut bins: Vec<HistogramBin> = (0..used)
                    .map(|i| HistogramBin {
                        start: min + i * width,
                        end: min + (i + 1) * width,
                        count: 0,
                    })
                    .collect();
                for value in values {
                    bins[(value - min) / width].count += 1;
                }
                bins
            }
            _ => Vec::new(),
        };

        Self {
            title: title.to_string(),
            bins,
        }
    }
}
