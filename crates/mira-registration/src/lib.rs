pub mod metric;
pub mod optimizer;
pub mod pyramid;
pub mod initializer;
pub mod progress;
pub mod registration;
pub mod error;

pub use error::{RegistrationError, Result};
pub use pyramid::PyramidSchedule;
pub use progress::{ConsoleProgressCallback, HistoryCallback, ProgressCallback, ProgressInfo};
pub use registration::{
    Registration, RegistrationMode, RegistrationOutcome, RegistrationParameters,
};
