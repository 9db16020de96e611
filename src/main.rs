//! Консольный матричный калькулятор
//!
//! Примеры:
//!   matrix_calc multiply -a "1,2;3,4" -b "5,6;7,8"
//!   matrix_calc --request request.json --json

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{info, LevelFilter};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use matrix_calc::{
    input::parse_matrix,
    matrix::validate_epsilon,
    render::{render_plain, render_response},
    utils::measure_time,
    Operation, Request, Response,
};

fn parse_epsilon(text: &str) -> Result<f64, String> {
    let value: f64 = text.trim().parse().map_err(|e| format!("{}", e))?;
    validate_epsilon(value).map_err(|e| e.to_string())
}

fn cli() -> Command {
    Command::new("matrix_calc")
        .version(clap::crate_version!())
        .about("Add, subtract, multiply or divide (A · B⁻¹) two matrices")
        .arg_required_else_help(true)
        .arg(
            Arg::new("operation")
                .help("add | subtract | multiply | divide")
                .value_parser(clap::value_parser!(Operation))
                .required_unless_present("request"),
        )
        .arg(
            Arg::new("a")
                .short('a')
                .long("a")
                .help("Matrix A, rows separated by ';', entries by ',' or spaces")
                .allow_hyphen_values(true)
                .required_unless_present("request"),
        )
        .arg(
            Arg::new("b")
                .short('b')
                .long("b")
                .help("Matrix B, same notation as A")
                .allow_hyphen_values(true)
                .required_unless_present("request"),
        )
        .arg(
            Arg::new("request")
                .short('r')
                .long("request")
                .help("JSON request file ('-' reads stdin)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath)
                .conflicts_with_all(["operation", "a", "b"]),
        )
        .arg(
            Arg::new("epsilon")
                .short('e')
                .long("epsilon")
                .help("Pivot magnitude below which B is treated as singular")
                .allow_hyphen_values(true)
                .value_parser(parse_epsilon),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the response as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("plain")
                .long("plain")
                .help("Print the result without table borders")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
}

fn read_request(path: &PathBuf) -> Result<Request> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?
    };
    serde_json::from_str(&text).context("Failed to parse request JSON")
}

fn build_request(matches: &ArgMatches) -> Result<Request> {
    let mut request = match matches.get_one::<PathBuf>("request") {
        Some(path) => read_request(path)?,
        None => {
            let operation = *matches
                .get_one::<Operation>("operation")
                .context("Operation is required")?;
            let a = matches.get_one::<String>("a").context("Matrix A is required")?;
            let b = matches.get_one::<String>("b").context("Matrix B is required")?;
            Request::new(
                operation,
                parse_matrix(a).context("Failed to parse matrix A")?,
                parse_matrix(b).context("Failed to parse matrix B")?,
            )
        }
    };
    if let Some(&epsilon) = matches.get_one::<f64>("epsilon") {
        request = request.with_epsilon(epsilon);
    }
    Ok(request)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("MATRIX_CALC_LOG", "warn"))
        .init();

    let matches = cli().get_matches();
    let request = build_request(&matches)?;

    info!(
        "{}: A is {}x{}, B is {}x{}",
        request.operation,
        request.a.rows(),
        request.a.cols(),
        request.b.rows(),
        request.b.cols()
    );
    let (response, duration) = measure_time(|| request.evaluate());
    info!("{} finished in {:?}", request.operation, duration);

    if matches.get_flag("json") {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("Failed to serialize response")?
        );
    } else {
        match &response {
            Response::Ok { result, .. } if matches.get_flag("plain") => {
                println!("{}", render_plain(result))
            }
            Response::Ok { .. } => print!("{}", render_response(&response)),
            Response::Error { .. } => eprintln!("{}", render_response(&response)),
        }
    }

    if !response.is_ok() {
        std::process::exit(2);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn builds_request_from_arguments() {
        let matches = cli()
            .try_get_matches_from(["matrix_calc", "divide", "-a", "1,0;0,1", "-b", "2,0;0,2", "-e", "1e-12"])
            .unwrap();
        let request = build_request(&matches).unwrap();
        assert_eq!(request.operation, Operation::Divide);
        assert_eq!(request.epsilon, Some(1e-12));
        assert_eq!(request.b.to_rows(), vec![vec![2.0, 0.0], vec![0.0, 2.0]]);
    }

    #[test]
    fn epsilon_must_be_positive() {
        for eps in ["0", "-1e-3", "NaN", "inf"] {
            let result = cli().try_get_matches_from([
                "matrix_calc", "divide", "-a", "1", "-b", "1", "--epsilon", eps,
            ]);
            assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation, "{}", eps);
        }
    }

    #[test]
    fn version_flag_is_available() {
        let err = cli().try_get_matches_from(["matrix_calc", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn negative_entries_are_not_flags() {
        let matches = cli()
            .try_get_matches_from(["matrix_calc", "add", "-a", "-1,2", "-b", "3,-4"])
            .unwrap();
        let request = build_request(&matches).unwrap();
        assert_eq!(request.a.to_rows(), vec![vec![-1.0, 2.0]]);
    }

    #[test]
    fn request_conflicts_with_inline_matrices() {
        let result = cli().try_get_matches_from(["matrix_calc", "--request", "r.json", "-a", "1"]);
        assert!(result.is_err());
    }
}
