//! Замер производительности ядра: умножение и деление против ndarray
use anyhow::{ensure, Context, Result};
use clap::{Arg, Command};
use log::{info, LevelFilter};
use std::hint::black_box;
use prettytable::{row, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use matrix_calc::matrix::{divide, inverse, multiply, Matrix};
use matrix_calc::utils::{average_ms, measure_time};

/// Допустимое расхождение с ndarray
const EPSILON: f64 = 1e-10;

/// Способ заполнения входных матриц
#[derive(Debug, Clone, Copy, PartialEq)]
enum Fill {
    /// A заполнена 1, B диагональная с 2 на диагонали
    OnesAndTwos,
    /// Случайные значения из [0, 1) с фиксированным зерном
    Random,
}

fn initialize_matrices(fill: Fill, size: usize, seed: u64) -> Result<(Matrix, Matrix)> {
    let pair = match fill {
        Fill::OnesAndTwos => {
            let a = Matrix::from_rows(&vec![vec![1.0; size]; size])?;
            let mut b = Matrix::zeros(size, size)?;
            for i in 0..size {
                b[(i, i)] = 2.0;
            }
            (a, b)
        }
        Fill::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            let a = Matrix::random(size, size, &mut rng)?;
            // Диагональное преобладание гарантирует обратимость B
            let mut b = Matrix::random(size, size, &mut rng)?;
            for i in 0..size {
                b[(i, i)] += size as f64;
            }
            (a, b)
        }
    };
    Ok(pair)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Info)
        .parse_env(env_logger::Env::default().filter_or("MATRIX_CALC_LOG", "info"))
        .init();

    let matches = Command::new("matrix_bench")
        .about("Time the matrix kernel against ndarray")
        .arg(
            Arg::new("size")
                .short('n')
                .long("size")
                .default_value("128")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("iterations")
                .short('i')
                .long("iterations")
                .default_value("10")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .default_value("42")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("ones")
                .long("ones")
                .help("Use constant matrices instead of random ones")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let size = *matches.get_one::<usize>("size").context("size is required")?;
    let iterations = *matches.get_one::<u32>("iterations").context("iterations is required")?;
    let seed = *matches.get_one::<u64>("seed").context("seed is required")?;
    let fill = if matches.get_flag("ones") { Fill::OnesAndTwos } else { Fill::Random };
    ensure!(size > 0, "size must be positive");
    ensure!(iterations > 0, "iterations must be positive");

    info!("Размер матриц: {}x{}, итераций: {}, заполнение: {:?}", size, size, iterations, fill);
    let (a, b) = initialize_matrices(fill, size, seed)?;
    let (a_nd, b_nd) = (a.to_array2(), b.to_array2());

    // Прогрев
    let kernel_product = multiply(&a, &b)?;
    let reference = Matrix::try_from(a_nd.dot(&b_nd))?;
    let product_diff = kernel_product.max_abs_diff(&reference);

    let (_, kernel_mul) = measure_time(|| {
        for _ in 0..iterations {
            let _ = black_box(multiply(black_box(&a), black_box(&b)));
        }
    });
    let (_, ndarray_mul) = measure_time(|| {
        for _ in 0..iterations {
            let _ = black_box(black_box(&a_nd).dot(black_box(&b_nd)));
        }
    });

    let (quotient, kernel_div) = measure_time(|| divide(&a, &b));
    let quotient = quotient.context("divide failed on an invertible matrix")?;
    // A / B · B должно вернуть A
    let roundtrip_diff = multiply(&quotient, &b)?.max_abs_diff(&a);
    let inverse_diff = multiply(&b, &inverse(&b)?)?.max_abs_diff(&Matrix::identity(size)?);

    let mut table = Table::new();
    table.add_row(row!["Операция", "Среднее время, мс", "Макс. расхождение"]);
    table.add_row(row![
        "multiply (ядро)",
        format!("{:.4}", average_ms(kernel_mul, iterations)),
        format!("{:e}", product_diff)
    ]);
    table.add_row(row![
        "dot (ndarray)",
        format!("{:.4}", average_ms(ndarray_mul, iterations)),
        "-"
    ]);
    table.add_row(row![
        "divide (ядро)",
        format!("{:.4}", average_ms(kernel_div, 1)),
        format!("{:e}", roundtrip_diff)
    ]);
    table.add_row(row!["B · B⁻¹ - I", "-", format!("{:e}", inverse_diff)]);
    table.printstd();

    let results_match = product_diff <= EPSILON * size as f64;
    println!(
        "Результаты ядра и ndarray {}",
        if results_match { "совпадают" } else { "различаются" }
    );
    ensure!(results_match, "kernel product differs from ndarray by {:e}", product_diff);

    Ok(())
}
