//! Модуль для работы с матрицами
//! 
//! Предоставляет:
//! - Тип матрицы и перечень операций
//! - Ошибки операций
//! - Сложение, вычитание, умножение и правое деление

mod types;
mod error;
pub mod operations;

pub use types::{Matrix, Operation};
pub(crate) use types::checked_len;
pub use error::MatrixError;
pub use operations::{
    add, apply, apply_with_config, determinant, divide, divide_with_epsilon, inverse,
    inverse_with_epsilon, multiply, subtract, validate_epsilon, KernelConfig, DEFAULT_EPSILON,
};
