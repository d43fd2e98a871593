pub mod trait_;
pub mod gradient_descent;
pub mod one_plus_one;

pub use trait_::{CostFunction, Optimizer, OptimizerOutcome, StopCondition};
pub use gradient_descent::RegularStepGradientDescent;
pub use one_plus_one::OnePlusOneEvolutionary;
