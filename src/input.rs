//! Разбор пользовательского ввода в матрицы
//!
//! Два режима:
//! - ячейки формы: пустые и нечисловые значения становятся `0.0`, ошибок нет;
//! - компактная запись `1,2;3,4` (строки через `;`, элементы через `,` или пробел),
//!   где некорректное число является ошибкой.

use crate::matrix::{checked_len, Matrix, MatrixError};

/// Значение одной ячейки; пустое или нечисловое значение дает `0.0`
pub fn parse_cell(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

/// Строит матрицу `rows x cols` из ячеек в построчном порядке.
/// Недостающие ячейки считаются пустыми, лишние игнорируются.
pub fn matrix_from_cells<S: AsRef<str>>(
    rows: usize,
    cols: usize,
    cells: &[S],
) -> Result<Matrix, MatrixError> {
    let data = (0..checked_len(rows, cols)?)
        .map(|idx| cells.get(idx).map_or(0.0, |c| parse_cell(c.as_ref())))
        .collect();
    Matrix::from_vec(rows, cols, data)
}

/// Разбирает компактную запись матрицы, например `"1 2; 3 4"` или `"1,2;3,4"`
pub fn parse_matrix(text: &str) -> Result<Matrix, MatrixError> {
    let rows = text
        .split(';')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .enumerate()
        .map(|(i, row)| {
            row.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|v| !v.is_empty())
                .map(|v| {
                    v.parse::<f64>().map_err(|_| {
                        MatrixError::Parse(format!("row {}: '{}' is not a number", i, v))
                    })
                })
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Matrix::from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_default_to_zero() {
        assert_eq!(parse_cell(" 2.5 "), 2.5);
        assert_eq!(parse_cell(""), 0.0);
        assert_eq!(parse_cell("abc"), 0.0);
        assert_eq!(parse_cell("-1e2"), -100.0);
    }

    #[test]
    fn matrix_from_partial_cells() {
        let m = matrix_from_cells(2, 2, &["1", "x", "3"]).unwrap();
        assert_eq!(m.to_rows(), vec![vec![1.0, 0.0], vec![3.0, 0.0]]);
        assert_eq!(matrix_from_cells::<&str>(0, 2, &[]).unwrap_err(), MatrixError::Empty);
    }

    #[test]
    fn huge_cell_counts_are_rejected() {
        assert_eq!(
            matrix_from_cells(usize::MAX, 3, &["1"]).unwrap_err(),
            MatrixError::TooLarge {
                rows: usize::MAX,
                cols: 3
            }
        );
    }

    #[test]
    fn compact_notation() {
        let m = parse_matrix("1, 2; 3 4").unwrap();
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        // завершающая точка с запятой допустима
        assert_eq!(parse_matrix("5;").unwrap().shape(), (1, 1));
    }

    #[test]
    fn compact_notation_errors() {
        assert!(matches!(parse_matrix("1,2;3,z"), Err(MatrixError::Parse(_))));
        assert!(matches!(parse_matrix("1,2;3"), Err(MatrixError::Ragged { row: 1, .. })));
        assert_eq!(parse_matrix("  ").unwrap_err(), MatrixError::Empty);
    }
}
