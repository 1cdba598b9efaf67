use std::str::FromStr;
use std::time::Duration;

use crate::tracker::TrackerConfig;

/// Default service origin.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Dashboard configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local service. Values that
/// fail to parse fall back to their default with a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Base URL of the video-generation service.
    pub api_url: String,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// Delay between progress polling cycles.
    pub poll_interval: Duration,
    /// Consecutive lost-progress observations before the video list is
    /// refreshed.
    pub regression_threshold: u32,
    /// Wait after a completion notification before refreshing.
    pub completion_refresh_delay: Duration,
    /// Wait after an error notification before refreshing.
    pub error_refresh_delay: Duration,
    /// Wait after a generation is accepted before refreshing.
    pub dispatch_refresh_delay: Duration,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let tracker = TrackerConfig::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            poll_interval: tracker.poll_interval,
            regression_threshold: tracker.regression_threshold,
            completion_refresh_delay: tracker.completion_refresh_delay,
            error_refresh_delay: tracker.error_refresh_delay,
            dispatch_refresh_delay: Duration::from_secs(2),
            notification_ttl: vidforge_events::center::DEFAULT_NOTIFICATION_TTL,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `VIDFORGE_API_URL`              | `http://localhost:5000` |
    /// | `VIDFORGE_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `VIDFORGE_POLL_INTERVAL_MS`     | `3000`                  |
    /// | `VIDFORGE_REGRESSION_THRESHOLD` | `2`                     |
    /// | `VIDFORGE_COMPLETION_DELAY_MS`  | `2000`                  |
    /// | `VIDFORGE_ERROR_DELAY_MS`       | `1000`                  |
    /// | `VIDFORGE_DISPATCH_REFRESH_MS`  | `2000`                  |
    /// | `VIDFORGE_NOTIFICATION_TTL_MS`  | `5000`                  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("VIDFORGE_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let secs = |key: &str, default: Duration| {
            Duration::from_secs(parse_or(&lookup, key, default.as_secs()))
        };
        let millis = |key: &str, default: Duration| {
            Duration::from_millis(parse_or(&lookup, key, default.as_millis() as u64))
        };

        Self {
            api_url,
            request_timeout: secs("VIDFORGE_REQUEST_TIMEOUT_SECS", defaults.request_timeout),
            poll_interval: nonzero(
                "VIDFORGE_POLL_INTERVAL_MS",
                millis("VIDFORGE_POLL_INTERVAL_MS", defaults.poll_interval),
                defaults.poll_interval,
            ),
            regression_threshold: parse_or(
                &lookup,
                "VIDFORGE_REGRESSION_THRESHOLD",
                defaults.regression_threshold,
            )
            .max(1),
            completion_refresh_delay: millis(
                "VIDFORGE_COMPLETION_DELAY_MS",
                defaults.completion_refresh_delay,
            ),
            error_refresh_delay: millis("VIDFORGE_ERROR_DELAY_MS", defaults.error_refresh_delay),
            dispatch_refresh_delay: millis(
                "VIDFORGE_DISPATCH_REFRESH_MS",
                defaults.dispatch_refresh_delay,
            ),
            notification_ttl: millis("VIDFORGE_NOTIFICATION_TTL_MS", defaults.notification_ttl),
        }
    }

    /// The progress tracker's share of the configuration.
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            poll_interval: self.poll_interval,
            regression_threshold: self.regression_threshold,
            completion_refresh_delay: self.completion_refresh_delay,
            error_refresh_delay: self.error_refresh_delay,
        }
    }
}

/// Periods must be positive; a zero period falls back to `default`.
fn nonzero(key: &str, value: Duration, default: Duration) -> Duration {
    if value.is_zero() {
        tracing::warn!(key, default = ?default, "Ignoring zero interval");
        default
    } else {
        value
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Ignoring unparseable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = DashboardConfig::from_lookup(|_| None);
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.regression_threshold, 2);
        assert_eq!(config.completion_refresh_delay, Duration::from_secs(2));
        assert_eq!(config.error_refresh_delay, Duration::from_secs(1));
        assert_eq!(config.notification_ttl, Duration::from_secs(5));
    }

    #[test]
    fn overrides_are_applied() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("VIDFORGE_API_URL", " http://render-box:8080 "),
            ("VIDFORGE_POLL_INTERVAL_MS", "500"),
            ("VIDFORGE_REGRESSION_THRESHOLD", "3"),
        ]));
        assert_eq!(config.api_url, "http://render-box:8080");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.tracker().regression_threshold, 3);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("VIDFORGE_POLL_INTERVAL_MS", "soon"),
            ("VIDFORGE_REGRESSION_THRESHOLD", "0"),
            ("VIDFORGE_API_URL", "   "),
        ]));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        // A zero threshold would refresh on every observation.
        assert_eq!(config.regression_threshold, 1);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn zero_poll_interval_falls_back_to_default() {
        let config =
            DashboardConfig::from_lookup(lookup_from(&[("VIDFORGE_POLL_INTERVAL_MS", "0")]));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert!(!config.tracker().poll_interval.is_zero());
    }
}
