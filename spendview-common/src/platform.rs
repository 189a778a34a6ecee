use serde::{Deserialize, Serialize};

/// Cloud platform hosting the compute side of each job. Drives the labels
/// shown on cost breakdown charts; the platform (Databricks) label is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum CloudPlatform {
    Aws,
    Azure,
    Gcp,
}

pub const COMPUTE_SLICE_COLOR: &str = "#3b82f6";
pub const PLATFORM_SLICE_COLOR: &str = "#ef4444";
pub const PLATFORM_COST_LABEL: &str = "Databricks Cost";

impl CloudPlatform {
    /// Unknown strings fall back to AWS rather than failing startup.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" => Self::Azure,
            "gcp" => Self::Gcp,
            _ => Self::Aws,
        }
    }

    pub fn compute_service_name(self) -> &'static str {
        match self {
            Self::Aws => "EC2",
            Self::Azure => "Azure Compute",
            Self::Gcp => "GCE",
        }
    }

    pub fn compute_display_name(self) -> String {
        format!("{} Cost", self.compute_service_name())
    }

    pub fn platform_display_name(self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "Azure",
            Self::Gcp => "Google Cloud",
        }
    }
}

impl Default for CloudPlatform {
    fn default() -> Self {
        Self::Aws
    }
}
