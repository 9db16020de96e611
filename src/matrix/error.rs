//! Ошибки матричных операций

use thiserror::Error;

use super::types::Operation;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Формы операндов несовместимы с операцией
    #[error("dimension mismatch for {operation}: left is {}x{}, right is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        operation: Operation,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Ведущий элемент меньше порога: обратной матрицы не существует
    #[error("matrix is singular, cannot calculate inverse")]
    Singular,

    #[error("matrix must have at least one row and one column")]
    Empty,

    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Произведение размеров не помещается в `usize`
    #[error("matrix of {rows}x{cols} entries is too large")]
    TooLarge { rows: usize, cols: usize },

    /// Порог вырожденности должен быть конечным и положительным
    #[error("pivot tolerance must be finite and positive, got {0}")]
    InvalidEpsilon(f64),

    #[error("parse error: {0}")]
    Parse(String),
}

impl MatrixError {
    /// Сообщение для пользователя в формулировках калькулятора
    pub fn user_message(&self) -> String {
        match self {
            MatrixError::DimensionMismatch {
                operation: Operation::Multiply,
                ..
            } => "For multiplication, columns of Matrix A must equal rows of Matrix B".to_string(),
            MatrixError::DimensionMismatch {
                operation: Operation::Divide,
                ..
            } => "For division, columns of Matrix A must equal rows of Matrix B".to_string(),
            MatrixError::DimensionMismatch { operation, .. } => {
                format!("Matrices must have the same dimensions for {}", operation)
            }
            MatrixError::NotSquare { .. } => "Matrix B must be square for division".to_string(),
            MatrixError::Singular => {
                "Cannot perform division: Matrix B is singular (not invertible)".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_shapes() {
        let err = MatrixError::DimensionMismatch {
            operation: Operation::Multiply,
            left: (2, 3),
            right: (2, 2),
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch for multiply: left is 2x3, right is 2x2"
        );
    }

    #[test]
    fn user_messages_follow_operation() {
        let add = MatrixError::DimensionMismatch {
            operation: Operation::Add,
            left: (1, 1),
            right: (2, 2),
        };
        assert_eq!(add.user_message(), "Matrices must have the same dimensions for add");
        assert!(MatrixError::Singular.user_message().contains("singular"));
        assert_eq!(MatrixError::Empty.user_message(), MatrixError::Empty.to_string());
    }
}
