pub mod gaussian;
pub mod downsample;
pub mod resample;
pub mod pyramid;

pub use gaussian::GaussianFilter;
pub use downsample::DownsampleFilter;
pub use resample::ResampleFilter;
pub use pyramid::ImagePyramid;
