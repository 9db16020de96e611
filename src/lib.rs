//! Матричный калькулятор: сложение, вычитание, умножение и правое деление
//! (`A · B⁻¹`) прямоугольных матриц `f64`.

pub mod input;
pub mod matrix;
pub mod render;
pub mod request;
pub mod utils;

// Реэкспорт основных типов для удобства
pub use matrix::{Matrix, MatrixError, Operation};
pub use request::{Request, Response};
