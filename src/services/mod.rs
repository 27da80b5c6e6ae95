pub mod insights;

pub use insights::{build_prompt, sanitize_api_key, ColumnMetrics, InsightsService, QualityMetrics};
