//! Translation of compact schedule expressions into cron rules.

use std::sync::LazyLock;

use regex::Regex;

static MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)m").expect("valid regex"));
static HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)h").expect("valid regex"));
static DAYS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)d").expect("valid regex"));

/// Translates a compact schedule expression into a five-field cron rule.
///
/// Total over any input: an expression matching none of the recognized forms
/// is returned unchanged and treated as an already-canonical rule. The forms
/// are checked in priority order with an unanchored search, first match wins.
///
/// `<N>h` and `<N>d` alias to hour / day-of-month divisibility (`*/N`), not
/// to a fixed N-unit interval from now: `"5d"` fires at midnight on days 1,
/// 6, 11, ... of the month. Compatibility behavior, kept as-is.
pub fn translate(schedule: &str) -> String {
    if let Some(caps) = MINUTES.captures(schedule) {
        return format!("*/{} * * * *", &caps[1]);
    }
    if let Some(caps) = HOURS.captures(schedule) {
        return format!("0 */{} * * *", &caps[1]);
    }
    if let Some(caps) = DAYS.captures(schedule) {
        return format!("0 0 */{} * *", &caps[1]);
    }
    if schedule.contains("weekly") {
        return "0 0 * * 0".to_string();
    }
    if schedule.contains("monthly") {
        return "0 0 1 * *".to_string();
    }
    schedule.to_string()
}

/// Adapts a cron rule to the six-field (seconds-first) form the scheduler
/// library consumes. Five-field rules gain a `0` seconds column; anything
/// else passes through.
pub fn to_scheduler_expression(rule: &str) -> String {
    if rule.split_whitespace().count() == 5 {
        format!("0 {rule}")
    } else {
        rule.to_string()
    }
}
