//! Chart layer: pure builders from tables to declarative specs.

pub mod builders;
pub mod spec;

pub use builders::RoiDetail;
pub use spec::ChartSpec;
