pub mod counties;
pub mod estimate;
