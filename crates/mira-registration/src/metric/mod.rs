pub mod trait_;
pub mod mean_squares;
pub mod mutual_information;

pub use trait_::Metric;
pub use mean_squares::MeanSquaresMetric;
pub use mutual_information::MutualInformationMetric;
