pub mod models;
pub mod pagination;
pub mod platform;

// Re-export commonly used types
pub use models::{
    ClusterDetails, CostBreakdown, CostSlice, GroupedJob, JobRun, JobSpend, SpendFilter,
    SummaryMetrics,
};
pub use pagination::{Page, PageInfo, PaginationError};
pub use platform::CloudPlatform;
