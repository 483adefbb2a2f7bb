pub mod detection;
pub mod metrics;

pub use detection::{DetectionState, DriftDetector, DriftInitiation, DriftState};
pub use metrics::{DriftAnalyzer, DriftMetrics};
