pub mod aligner;
pub mod builder;

pub use aligner::ReturnAligner;
pub use builder::ReturnSeriesBuilder;
