//! Запрос на вычисление и его результат
//!
//! Запрос неизменяем: операция, два операнда и необязательный порог
//! вырожденности. Ответ содержит либо матрицу, либо сообщение об ошибке.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::matrix::{apply_with_config, KernelConfig, Matrix, MatrixError, Operation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub operation: Operation,
    pub a: Matrix,
    pub b: Matrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok {
        operation: Operation,
        result: Matrix,
    },
    Error {
        operation: Operation,
        message: String,
    },
}

impl Response {
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        match self {
            Response::Ok { result, .. } => Some(result),
            Response::Error { .. } => None,
        }
    }
}

/// Предупреждение предварительной проверки. Не мешает вызову ядра.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Формы несовместимы; ядро вернет ошибку
    Shape(String),
    /// У B есть нулевая строка или нулевой столбец
    LikelySingular {
        zero_row: Option<usize>,
        zero_col: Option<usize>,
    },
}

impl Request {
    pub fn new(operation: Operation, a: Matrix, b: Matrix) -> Self {
        Self {
            operation,
            a,
            b,
            epsilon: None,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn config(&self) -> KernelConfig {
        match self.epsilon {
            Some(epsilon) => KernelConfig { epsilon },
            None => KernelConfig::default(),
        }
    }

    /// Выполняет запрос; предварительные проверки только пишутся в лог
    pub fn run(&self) -> Result<Matrix, MatrixError> {
        for warning in precheck(self) {
            warn!("{:?}", warning);
        }
        apply_with_config(self.operation, &self.a, &self.b, &self.config())
    }

    pub fn evaluate(&self) -> Response {
        match self.run() {
            Ok(result) => Response::Ok {
                operation: self.operation,
                result,
            },
            Err(err) => {
                debug!("{} failed: {}", self.operation, err);
                Response::Error {
                    operation: self.operation,
                    message: err.user_message(),
                }
            }
        }
    }
}

fn zero_row(m: &Matrix) -> Option<usize> {
    m.row_iter().position(|row| row.iter().all(|&v| v == 0.0))
}

fn zero_col(m: &Matrix) -> Option<usize> {
    (0..m.cols()).find(|&j| m.column(j).all(|v| v == 0.0))
}

/// Проверки формы ввода до вызова ядра.
///
/// Поиск нулевых строк и столбцов лишь эвристика: матрица `[[1,2],[2,4]]`
/// ее проходит, хотя вырождена. Окончательный ответ дает только ядро.
pub fn precheck(request: &Request) -> Vec<Warning> {
    let (a, b) = (&request.a, &request.b);
    let mut warnings = Vec::new();

    match request.operation {
        Operation::Add | Operation::Subtract if a.shape() != b.shape() => {
            warnings.push(Warning::Shape(format!(
                "Matrices must have the same dimensions for {}",
                request.operation
            )));
        }
        Operation::Multiply if a.cols() != b.rows() => {
            warnings.push(Warning::Shape(
                "For multiplication, columns of Matrix A must equal rows of Matrix B".to_string(),
            ));
        }
        Operation::Divide => {
            if !b.is_square() {
                warnings.push(Warning::Shape("Matrix B must be square for division".to_string()));
            } else {
                let (zero_row, zero_col) = (zero_row(b), zero_col(b));
                if zero_row.is_some() || zero_col.is_some() {
                    warnings.push(Warning::LikelySingular { zero_row, zero_col });
                }
            }
        }
        _ => {}
    }

    warnings
}
