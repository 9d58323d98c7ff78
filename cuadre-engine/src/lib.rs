pub mod calculator;

pub use calculator::{CalculatorConfig, CuadreCalculator, DEFAULT_TOLERANCE};
