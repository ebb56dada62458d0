use std::env;

/// Policy constants for commission rates, grade thresholds and network
/// capacity. Every value can be overridden from the environment; defaults
/// apply when a variable is unset or unparsable, so an embedded engine works
/// with no setup.
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// Flat rate every seller earns on their own closed sales.
    pub direct_commission_rate: f64,
    /// Override rate for a Silver upline on line-2 sales.
    pub override_rate_mid: f64,
    /// Override rate for a Gold or Diamond upline on line-2 sales.
    pub override_rate_top: f64,
    pub grade_silver_threshold: f64,
    pub grade_gold_threshold: f64,
    pub grade_diamond_threshold: f64,
    pub max_root_members: usize,
    pub max_direct_downlines: usize,
    /// Day of month commissions are paid out. Clamped to 1..=28 so the due
    /// date exists in every month.
    pub payment_day: u32,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            direct_commission_rate: 0.03,
            override_rate_mid: 0.0025,
            override_rate_top: 0.005,
            grade_silver_threshold: 10_000.0,
            grade_gold_threshold: 50_000.0,
            grade_diamond_threshold: 150_000.0,
            max_root_members: 5,
            max_direct_downlines: 20,
            payment_day: 10,
        }
    }
}

impl EnginePolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            direct_commission_rate: env_parse_or(
                "DIRECT_COMMISSION_RATE",
                defaults.direct_commission_rate,
            ),
            override_rate_mid: env_parse_or("OVERRIDE_RATE_MID", defaults.override_rate_mid),
            override_rate_top: env_parse_or("OVERRIDE_RATE_TOP", defaults.override_rate_top),
            grade_silver_threshold: env_parse_or(
                "GRADE_SILVER_THRESHOLD",
                defaults.grade_silver_threshold,
            ),
            grade_gold_threshold: env_parse_or(
                "GRADE_GOLD_THRESHOLD",
                defaults.grade_gold_threshold,
            ),
            grade_diamond_threshold: env_parse_or(
                "GRADE_DIAMOND_THRESHOLD",
                defaults.grade_diamond_threshold,
            ),
            max_root_members: env_parse_or("MAX_ROOT_MEMBERS", defaults.max_root_members),
            max_direct_downlines: env_parse_or(
                "MAX_DIRECT_DOWNLINES",
                defaults.max_direct_downlines,
            ),
            payment_day: clamp_payment_day(env_parse_or("PAYMENT_DAY", defaults.payment_day)),
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env_opt(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(default)
}

fn clamp_payment_day(raw: u32) -> u32 {
    raw.clamp(1, 28)
}

#[cfg(test)]
mod tests {
    use super::{clamp_payment_day, EnginePolicy};

    #[test]
    fn clamps_payment_day() {
        assert_eq!(clamp_payment_day(0), 1);
        assert_eq!(clamp_payment_day(10), 10);
        assert_eq!(clamp_payment_day(31), 28);
    }

    #[test]
    fn default_rates_are_consistent() {
        let policy = EnginePolicy::default();
        assert!(policy.override_rate_mid < policy.override_rate_top);
        assert!(policy.override_rate_top < policy.direct_commission_rate);
        assert!(policy.grade_silver_threshold < policy.grade_gold_threshold);
        assert!(policy.grade_gold_threshold < policy.grade_diamond_threshold);
    }
}
