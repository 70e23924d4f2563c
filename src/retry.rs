use std::thread;
use std::time::Duration;

use tracing::warn;

/// Runs `op` up to `attempts` times, sleeping `delay` between failures. The
/// delay never grows. The last error is returned once attempts run out.
pub fn retry_fixed<T, E, F>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                warn!(attempt, attempts, error = %err, "attempt failed, retrying");
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::retry_fixed;

    #[test]
    fn succeeds_after_transient_failures() {
        let mut calls = 0;
        let out: Result<u32, String> = retry_fixed(3, Duration::ZERO, |attempt| {
            calls += 1;
            if attempt < 3 {
                Err(format!("fail {attempt}"))
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(out, Ok(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn returns_last_error_when_exhausted() {
        let mut calls = 0;
        let out: Result<(), String> = retry_fixed(2, Duration::ZERO, |attempt| {
            calls += 1;
            Err(format!("fail {attempt}"))
        });
        assert_eq!(out, Err("fail 2".to_string()));
        assert_eq!(calls, 2);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let out: Result<u8, String> = retry_fixed(0, Duration::ZERO, |_| Ok(7));
        assert_eq!(out, Ok(7));
    }
}
