use crate::config::EnginePolicy;
use crate::schemas::Grade;

/// Derive a member's tier from cumulative sales.
///
/// Thresholds are ascending and non-overlapping, so increasing sales can
/// never lower the tier. Pure; callers invoke it whenever `total_sales`
/// changes.
pub fn grade_for_sales(total_sales: f64, policy: &EnginePolicy) -> Grade {
    if total_sales >= policy.grade_diamond_threshold {
        Grade::Diamond
    } else if total_sales >= policy.grade_gold_threshold {
        Grade::Gold
    } else if total_sales >= policy.grade_silver_threshold {
        Grade::Silver
    } else {
        Grade::Bronze
    }
}

#[cfg(test)]
mod tests {
    use super::grade_for_sales;
    use crate::config::EnginePolicy;
    use crate::schemas::Grade;

    #[test]
    fn maps_threshold_boundaries() {
        let policy = EnginePolicy::default();
        assert_eq!(grade_for_sales(0.0, &policy), Grade::Bronze);
        assert_eq!(grade_for_sales(9_999.99, &policy), Grade::Bronze);
        assert_eq!(grade_for_sales(10_000.0, &policy), Grade::Silver);
        assert_eq!(grade_for_sales(50_000.0, &policy), Grade::Gold);
        assert_eq!(grade_for_sales(149_999.0, &policy), Grade::Gold);
        assert_eq!(grade_for_sales(150_000.0, &policy), Grade::Diamond);
        assert_eq!(grade_for_sales(1_000_000.0, &policy), Grade::Diamond);
    }

    #[test]
    fn grade_is_monotonic_in_sales() {
        let policy = EnginePolicy::default();
        let mut previous = grade_for_sales(0.0, &policy);
        for step in 1..400 {
            let current = grade_for_sales(step as f64 * 500.0, &policy);
            assert!(current >= previous);
            previous = current;
        }
    }
}
