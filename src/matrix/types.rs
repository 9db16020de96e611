//! Типы матриц и связанные структуры

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::MatrixError;

/// Прямоугольная матрица `f64`, хранится построчно в плоском буфере.
///
/// Инвариант: `rows >= 1`, `cols >= 1`, `data.len() == rows * cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Число элементов `rows x cols` без переполнения
pub(crate) fn checked_len(rows: usize, cols: usize) -> Result<usize, MatrixError> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::Empty);
    }
    rows.checked_mul(cols)
        .ok_or(MatrixError::TooLarge { rows, cols })
}

impl Matrix {
    /// Создает матрицу из вложенных строк, проверяя прямоугольность
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let first = rows.first().ok_or(MatrixError::Empty)?;
        let cols = first.as_ref().len();
        if cols == 0 {
            return Err(MatrixError::Empty);
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MatrixError::Ragged {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Создает матрицу из плоского буфера в построчном порядке
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, MatrixError> {
        if data.len() != checked_len(rows, cols)? {
            return Err(MatrixError::Ragged {
                row: data.len() / cols,
                expected: cols,
                found: data.len() % cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        let len = checked_len(rows, cols)?;
        Self::from_vec(rows, cols, vec![0.0; len])
    }

    /// Единичная матрица порядка `n`
    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        Ok(m)
    }

    /// Матрица со случайными элементами из `[0, 1)`
    pub fn random<G: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut G) -> Result<Self, MatrixError> {
        let data = (0..checked_len(rows, cols)?).map(|_| rng.gen_range(0.0..1.0)).collect();
        Self::from_vec(rows, cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Размерность `(строки, столбцы)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().skip(j).step_by(self.cols).copied()
    }

    /// Вложенное представление, как его принимает вызывающая сторона
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.row_iter().map(<[f64]>::to_vec).collect()
    }

    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows, self.cols), |(i, j)| self.data[i * self.cols + j])
    }

    /// Поэлементное сравнение с допуском
    pub fn approx_eq(&self, other: &Matrix, epsilon: f64) -> bool {
        self.shape() == other.shape() && self.max_abs_diff(other) <= epsilon
    }

    /// Максимальная по модулю разница элементов (бесконечность при разных формах)
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        if self.shape() != other.shape() {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(j < self.cols, "column index {} out of bounds for {} columns", j, self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(j < self.cols, "column index {} out of bounds for {} columns", j, self.cols);
        &mut self.data[i * self.cols + j]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl TryFrom<Array2<f64>> for Matrix {
    type Error = MatrixError;

    fn try_from(array: Array2<f64>) -> Result<Self, Self::Error> {
        let (rows, cols) = array.dim();
        // iter() обходит в логическом построчном порядке независимо от раскладки
        Self::from_vec(rows, cols, array.iter().copied().collect())
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.row_iter())
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        Matrix::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

/// Операция над парой матриц
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    /// Правое деление: `A · B⁻¹`
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '×',
            Operation::Divide => '÷',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(Operation::Add),
            "subtract" | "sub" | "-" => Ok(Operation::Subtract),
            "multiply" | "mul" | "*" | "x" => Ok(Operation::Multiply),
            "divide" | "div" | "/" => Ok(Operation::Divide),
            other => Err(MatrixError::Parse(format!("unknown operation '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        let rows: Vec<Vec<f64>> = vec![];
        assert_eq!(Matrix::from_rows(&rows).unwrap_err(), MatrixError::Empty);
        assert_eq!(Matrix::from_rows(&[Vec::<f64>::new()]).unwrap_err(), MatrixError::Empty);
    }

    #[test]
    fn oversized_dimensions_do_not_overflow() {
        assert_eq!(
            Matrix::zeros(usize::MAX, 2).unwrap_err(),
            MatrixError::TooLarge {
                rows: usize::MAX,
                cols: 2
            }
        );
        let mut rng = rand::thread_rng();
        assert!(matches!(
            Matrix::random(2, usize::MAX, &mut rng),
            Err(MatrixError::TooLarge { .. })
        ));
        assert!(matches!(
            Matrix::from_vec(usize::MAX / 2 + 1, 4, vec![1.0]),
            Err(MatrixError::TooLarge { .. })
        ));
    }

    #[test]
    fn row_and_column_access() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(2).collect::<Vec<_>>(), vec![3.0, 6.0]);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn serde_uses_nested_rows() {
        let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");

        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<Matrix>("[[1.0],[2.0,3.0]]").is_err());
    }

    #[test]
    fn ndarray_conversion_keeps_layout() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let a = m.to_array2();
        assert_eq!(a[[1, 0]], 4.0);
        assert_eq!(a.dim(), (2, 3));
        assert_eq!(a.row(0).to_vec(), vec![1.0, 2.0, 3.0]);
        // транспонированный вид имеет другую раскладку в памяти
        let t = Matrix::try_from(a.t().to_owned()).unwrap();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.row(0), &[1.0, 4.0]);
    }

    #[test]
    fn operation_parsing() {
        assert_eq!("Divide".parse::<Operation>().unwrap(), Operation::Divide);
        assert_eq!("*".parse::<Operation>().unwrap(), Operation::Multiply);
        assert_eq!(Operation::Subtract.to_string(), "subtract");
        assert!("pow".parse::<Operation>().is_err());
    }
}
