pub mod error;
pub mod landmarks;
pub mod report;
pub mod tre;

pub use error::{EvalError, Result};
pub use landmarks::{read_landmarks, validate_landmarks_file, write_landmarks};
pub use tre::{evaluate, LandmarkEvaluationResult};
