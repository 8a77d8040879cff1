//! Campaign-contact metrics engine: selection filtering, counter
//! normalization, funnel rates, and the dimensional breakdowns behind each
//! dashboard chart.

pub mod aggregate;
pub mod crosstab;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod pipeline;
pub mod rates;
pub mod series;
pub mod session;

pub use aggregate::DimensionalAggregator;
pub use crosstab::CrossTab;
pub use filter::FilterSelection;
pub use normalize::{normalize, normalize_counter, NormalizedTable};
pub use pipeline::{DashboardReport, InsightsPipeline};
pub use rates::{FunnelSummary, SummaryCards};
pub use series::{ChartPoint, ChartSeries};
pub use session::{AnalysisSession, SessionRegistry};
