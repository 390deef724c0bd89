mod bins;
mod waste;

pub use bins::{AdjustResult, AxisBins, LogMark};
pub use waste::WasteHistogram;
