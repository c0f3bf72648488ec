mod format;

pub use format::{format_date, summarize};
