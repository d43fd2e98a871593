pub mod trait_;
pub mod rigid;
pub mod translation;

pub use trait_::Transform;
pub use rigid::EulerTransform;
pub use translation::TranslationTransform;
