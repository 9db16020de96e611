//! Вспомогательные функции и утилиты

use std::time::{Duration, Instant};

/// Измеряет время выполнения функции
pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Среднее время одной итерации в миллисекундах
pub fn average_ms(total: Duration, iterations: u32) -> f64 {
    if iterations == 0 {
        return 0.0;
    }
    total.as_secs_f64() * 1000.0 / iterations as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_time_returns_result() {
        let (value, elapsed) = measure_time(|| 2 + 2);
        assert_eq!(value, 4);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn average_of_zero_iterations() {
        assert_eq!(average_ms(Duration::from_secs(1), 0), 0.0);
        assert_eq!(average_ms(Duration::from_millis(500), 5), 100.0);
    }
}
