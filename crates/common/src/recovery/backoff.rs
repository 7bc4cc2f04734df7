//! Delay computation between attempts.
//!
//! With `exponential_backoff` the delay before the retry that follows attempt
//! `n` is `initial_delay * multiplier^(n - 1)`, clamped to `max_delay`:
//! 1 s, 2 s, 4 s, 8 s for the standard preset. Without it the delay is the
//! fixed `initial_delay`.

use std::time::Duration;

use super::config::RetryConfig;
use super::constants::MAX_BACKOFF_EXPONENT;

/// Computes backoff delays for a [`RetryConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BackoffCalculator;

impl BackoffCalculator {
    /// Delay to wait after attempt number `attempt` (1-based) failed.
    ///
    /// Never exceeds `config.max_delay()`. An `attempt` of 0 is treated as 1.
    pub fn delay(attempt: u32, config: &RetryConfig) -> Duration {
        let max_delay = config.max_delay();

        if !config.exponential_backoff() {
            return config.initial_delay().min(max_delay);
        }

        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        // exponent <= i32::MAX, the cast cannot wrap
        #[allow(clippy::cast_possible_wrap)]
        let factor = config.backoff_multiplier().powi(exponent as i32);
        let scaled_secs = config.initial_delay().as_secs_f64() * factor;

        if !scaled_secs.is_finite() || scaled_secs >= max_delay.as_secs_f64() {
            return max_delay;
        }

        Duration::try_from_secs_f64(scaled_secs).map_or(max_delay, |delay| delay.min(max_delay))
    }

    /// Every delay a full run of `config` could sleep, in order.
    ///
    /// A run of `max_attempts` attempts sleeps at most `max_attempts - 1`
    /// times.
    pub fn schedule(config: &RetryConfig) -> Vec<Duration> {
        (1..config.max_attempts()).map(|attempt| Self::delay(attempt, config)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_preset_doubles() {
        let config = RetryConfig::standard();
        assert_eq!(BackoffCalculator::delay(1, &config), Duration::from_secs(1));
        assert_eq!(BackoffCalculator::delay(2, &config), Duration::from_secs(2));
        assert_eq!(BackoffCalculator::delay(3, &config), Duration::from_secs(4));
        assert_eq!(BackoffCalculator::delay(4, &config), Duration::from_secs(8));
        assert_eq!(BackoffCalculator::delay(5, &config), Duration::from_secs(15));
    }

    #[test]
    fn test_first_retry_waits_initial_delay() {
        let config = RetryConfig::quick();
        assert_eq!(BackoffCalculator::delay(1, &config), Duration::from_millis(500));
        assert_eq!(BackoffCalculator::delay(0, &config), Duration::from_millis(500));
    }

    #[test]
    fn test_delay_never_exceeds_max_delay() {
        let configs = [
            RetryConfig::quick(),
            RetryConfig::standard(),
            RetryConfig::persistent(),
            RetryConfig::builder()
                .initial_delay(Duration::from_millis(1))
                .max_delay(Duration::from_millis(3))
                .backoff_multiplier(10.0)
                .build()
                .unwrap(),
            RetryConfig::builder()
                .initial_delay(Duration::from_secs(1))
                .max_delay(Duration::from_secs(u64::MAX / 4))
                .backoff_multiplier(1e300)
                .build()
                .unwrap(),
        ];

        for config in &configs {
            for attempt in (0..=64).chain([u32::MAX - 1, u32::MAX]) {
                let delay = BackoffCalculator::delay(attempt, config);
                assert!(delay <= config.max_delay(), "attempt {attempt}: {delay:?} > max");
            }
        }
    }

    #[test]
    fn test_slow_growth_follows_formula_for_every_attempt() {
        let config = RetryConfig::builder()
            .max_attempts(100)
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(3600))
            .backoff_multiplier(1.05)
            .build()
            .unwrap();

        assert_eq!(
            BackoffCalculator::delay(50, &config),
            Duration::from_secs_f64(1.05_f64.powi(49))
        );

        let schedule = BackoffCalculator::schedule(&config);
        assert_eq!(schedule.len(), 99);
        for pair in schedule.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should grow to {:?}", pair[0], pair[1]);
        }
        // 1.05^98 is about 119 s, still well under the ceiling
        assert!(schedule[98] > Duration::from_secs(100));
    }

    #[test]
    fn test_fixed_delay_ignores_attempt() {
        let config =
            RetryConfig::builder().fixed_delay(Duration::from_millis(300)).build().unwrap();
        assert_eq!(BackoffCalculator::delay(1, &config), Duration::from_millis(300));
        assert_eq!(BackoffCalculator::delay(9, &config), Duration::from_millis(300));
    }

    #[test]
    fn test_fractional_multiplier_rounds_to_nanos() {
        let config = RetryConfig::builder()
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(1))
            .backoff_multiplier(1.5)
            .build()
            .unwrap();
        assert_eq!(BackoffCalculator::delay(2, &config), Duration::from_millis(150));
        assert_eq!(BackoffCalculator::delay(3, &config), Duration::from_millis(225));
    }

    #[test]
    fn test_schedule_lists_sleeps_between_attempts() {
        assert_eq!(
            BackoffCalculator::schedule(&RetryConfig::standard()),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert!(BackoffCalculator::schedule(
            &RetryConfig::builder().max_attempts(1).build().unwrap()
        )
        .is_empty());
    }
}
