//! Вывод результатов: матрицы с двумя знаками после запятой,
//! ошибки заглавными буквами

use prettytable::{format, Cell, Row, Table};

use crate::matrix::{Matrix, MatrixError};
use crate::request::Response;

/// Элемент матрицы с точностью до сотых
pub fn format_entry(value: f64) -> String {
    let text = format!("{:.2}", value);
    // -0.001 округляется до "-0.00"
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

pub fn matrix_table(m: &Matrix) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    for row in m.row_iter() {
        table.add_row(Row::new(
            row.iter()
                .map(|&v| Cell::new_align(&format_entry(v), format::Alignment::RIGHT))
                .collect(),
        ));
    }
    table
}

/// Матрица построчно без рамок: элементы через пробел, строки через перевод строки
pub fn render_plain(m: &Matrix) -> String {
    m.row_iter()
        .map(|row| {
            row.iter()
                .map(|&v| format_entry(v))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_error(err: &MatrixError) -> String {
    err.user_message().to_uppercase()
}

/// Ответ в виде таблицы; при ошибке выводится только сообщение
pub fn render_response(response: &Response) -> String {
    match response {
        Response::Ok { result, .. } => matrix_table(result).to_string(),
        Response::Error { message, .. } => message.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Operation;

    #[test]
    fn entries_have_two_decimals() {
        assert_eq!(format_entry(0.5), "0.50");
        assert_eq!(format_entry(2.0 / 3.0), "0.67");
        assert_eq!(format_entry(-0.001), "0.00");
        assert_eq!(format_entry(-1.005e3), "-1005.00");
    }

    #[test]
    fn plain_rendering() {
        let m = Matrix::from_rows(&[[0.5, 0.0], [0.0, 0.5]]).unwrap();
        assert_eq!(render_plain(&m), "0.50 0.00\n0.00 0.50");
    }

    #[test]
    fn table_contains_every_entry() {
        let m = Matrix::from_rows(&[[19.0, 22.0], [43.0, 50.0]]).unwrap();
        let text = matrix_table(&m).to_string();
        for entry in ["19.00", "22.00", "43.00", "50.00"] {
            assert!(text.contains(entry), "{} missing in\n{}", entry, text);
        }
    }

    #[test]
    fn errors_are_uppercased_and_suppress_result() {
        assert_eq!(
            render_error(&MatrixError::NotSquare { rows: 2, cols: 3 }),
            "MATRIX B MUST BE SQUARE FOR DIVISION"
        );
        let response = Response::Error {
            operation: Operation::Divide,
            message: MatrixError::Singular.user_message(),
        };
        let text = render_response(&response);
        assert_eq!(text, "CANNOT PERFORM DIVISION: MATRIX B IS SINGULAR (NOT INVERTIBLE)");
    }
}
