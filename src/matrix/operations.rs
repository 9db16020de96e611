//! Операции над матрицами
//!
//! Все функции чистые: принимают операнды по ссылке и возвращают новую
//! матрицу либо [`MatrixError`].

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::error::MatrixError;
use super::types::{Matrix, Operation};

/// Порог ведущего элемента, ниже которого матрица считается вырожденной
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Настройки ядра
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl KernelConfig {
    pub fn new(epsilon: f64) -> Result<Self, MatrixError> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
        })
    }
}

/// Порог должен быть конечным и строго положительным: при нулевом пороге
/// нулевой ведущий элемент прошел бы проверку и дал бы деление на ноль
pub fn validate_epsilon(epsilon: f64) -> Result<f64, MatrixError> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(epsilon)
    } else {
        Err(MatrixError::InvalidEpsilon(epsilon))
    }
}

fn same_shape(operation: Operation, a: &Matrix, b: &Matrix) -> Result<(), MatrixError> {
    if a.shape() != b.shape() {
        return Err(MatrixError::DimensionMismatch {
            operation,
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

fn elementwise(
    operation: Operation,
    a: &Matrix,
    b: &Matrix,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Matrix, MatrixError> {
    same_shape(operation, a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| f(x, y))
        .collect();
    Matrix::from_vec(a.rows(), a.cols(), data)
}

/// Поэлементная сумма матриц одинаковой формы
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    elementwise(Operation::Add, a, b, |x, y| x + y)
}

/// Поэлементная разность матриц одинаковой формы
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    elementwise(Operation::Subtract, a, b, |x, y| x - y)
}

/// Произведение `A · B`, требует `cols(A) == rows(B)`
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch {
            operation: Operation::Multiply,
            left: a.shape(),
            right: b.shape(),
        });
    }
    product(a, b)
}

// Без проверки форм; вызывающий гарантирует cols(a) == rows(b)
fn product(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    let (n, m, p) = (a.rows(), a.cols(), b.cols());
    let (lhs, rhs) = (a.as_slice(), b.as_slice());
    let mut c = vec![0.0f64; n * p];

    for i in 0..n {
        let out = &mut c[i * p..(i + 1) * p];
        for k in 0..m {
            let aik = lhs[i * m + k];
            let b_row = &rhs[k * p..(k + 1) * p];
            for (cij, &bkj) in out.iter_mut().zip(b_row) {
                *cij += aik * bkj;
            }
        }
    }

    Matrix::from_vec(n, p, c)
}

fn require_square(m: &Matrix) -> Result<usize, MatrixError> {
    if !m.is_square() {
        return Err(MatrixError::NotSquare {
            rows: m.rows(),
            cols: m.cols(),
        });
    }
    Ok(m.rows())
}

// Строка с максимальным по модулю элементом в столбце `col`, начиная с `from`
fn pivot_row(work: &[f64], width: usize, rows: usize, col: usize, from: usize) -> (usize, f64) {
    (from..rows)
        .map(|r| (r, work[r * width + col].abs()))
        .fold((from, -1.0), |best, cand| if cand.1 > best.1 { cand } else { best })
}

fn swap_rows(work: &mut [f64], width: usize, r1: usize, r2: usize) {
    if r1 == r2 {
        return;
    }
    let (lo, hi) = (r1.min(r2), r1.max(r2));
    let (head, tail) = work.split_at_mut(hi * width);
    head[lo * width..(lo + 1) * width].swap_with_slice(&mut tail[..width]);
}

/// Обратная матрица методом Гаусса-Жордана с частичным выбором ведущего элемента
pub fn inverse(m: &Matrix) -> Result<Matrix, MatrixError> {
    inverse_with_epsilon(m, DEFAULT_EPSILON)
}

pub fn inverse_with_epsilon(m: &Matrix, epsilon: f64) -> Result<Matrix, MatrixError> {
    let epsilon = validate_epsilon(epsilon)?;
    let n = require_square(m)?;
    let width = 2 * n;

    // Расширенная матрица [M | I]
    let mut work = vec![0.0f64; n * width];
    for (i, row) in m.row_iter().enumerate() {
        work[i * width..i * width + n].copy_from_slice(row);
        work[i * width + n + i] = 1.0;
    }

    for col in 0..n {
        let (p, magnitude) = pivot_row(&work, width, n, col, col);
        // NaN тоже не проходит проверку
        if !(magnitude >= epsilon) {
            debug!("column {} has no pivot above {:e} (max |a| = {:e})", col, epsilon, magnitude);
            return Err(MatrixError::Singular);
        }
        trace!("column {}: pivot row {} (|a| = {:e})", col, p, magnitude);
        swap_rows(&mut work, width, col, p);

        let pivot = work[col * width + col];
        for v in &mut work[col * width..(col + 1) * width] {
            *v /= pivot;
        }

        let lead: Vec<f64> = work[col * width..(col + 1) * width].to_vec();
        for r in (0..n).filter(|&r| r != col) {
            let factor = work[r * width + col];
            if factor == 0.0 {
                continue;
            }
            for (v, &pv) in work[r * width..(r + 1) * width].iter_mut().zip(&lead) {
                *v -= factor * pv;
            }
        }
    }

    let data = work
        .chunks_exact(width)
        .flat_map(|row| row[n..].iter().copied())
        .collect();
    Matrix::from_vec(n, n, data)
}

/// Определитель квадратной матрицы (прямой ход Гаусса с выбором ведущего элемента).
/// Для матриц, вырожденных по порогу [`DEFAULT_EPSILON`], возвращает `0.0`.
pub fn determinant(m: &Matrix) -> Result<f64, MatrixError> {
    let n = require_square(m)?;
    let mut work = m.as_slice().to_vec();
    let mut det = 1.0f64;

    for col in 0..n {
        let (p, magnitude) = pivot_row(&work, n, n, col, col);
        if !(magnitude >= DEFAULT_EPSILON) {
            return Ok(0.0);
        }
        if p != col {
            swap_rows(&mut work, n, col, p);
            det = -det;
        }

        let pivot = work[col * n + col];
        det *= pivot;
        for r in col + 1..n {
            let factor = work[r * n + col] / pivot;
            for j in col..n {
                work[r * n + j] -= factor * work[col * n + j];
            }
        }
    }

    Ok(det)
}

/// Правое деление `A / B = A · B⁻¹`
pub fn divide(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    divide_with_epsilon(a, b, DEFAULT_EPSILON)
}

pub fn divide_with_epsilon(a: &Matrix, b: &Matrix, epsilon: f64) -> Result<Matrix, MatrixError> {
    require_square(b)?;
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch {
            operation: Operation::Divide,
            left: a.shape(),
            right: b.shape(),
        });
    }
    let b_inv = inverse_with_epsilon(b, epsilon)?;
    product(a, &b_inv)
}

/// Выполняет выбранную операцию с порогом по умолчанию
pub fn apply(operation: Operation, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    apply_with_config(operation, a, b, &KernelConfig::default())
}

pub fn apply_with_config(
    operation: Operation,
    a: &Matrix,
    b: &Matrix,
    config: &KernelConfig,
) -> Result<Matrix, MatrixError> {
    validate_epsilon(config.epsilon)?;
    debug!(
        "{} {}x{} {} {}x{}",
        operation,
        a.rows(),
        a.cols(),
        operation.symbol(),
        b.rows(),
        b.cols()
    );
    match operation {
        Operation::Add => add(a, b),
        Operation::Subtract => subtract(a, b),
        Operation::Multiply => multiply(a, b),
        Operation::Divide => divide_with_epsilon(a, b, config.epsilon),
    }
}
