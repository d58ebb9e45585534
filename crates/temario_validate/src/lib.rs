mod distribution;
mod fields;
mod keywords;
mod quality;
mod report;
mod structure;

pub use distribution::{calculate_distribution_stats, Distribution, DistributionStats, L1Row};
pub use fields::validate_required_fields;
pub use keywords::check_keywords;
pub use quality::{check_description_quality, LevelWordStats, WordStats};
pub use report::{TreeValidator, ValidationReport};
pub use structure::{validate_hierarchy, validate_uniqueness, LevelCounts};
