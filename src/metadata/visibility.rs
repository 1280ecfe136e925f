use crate::graph::ParamKv;
use ahash::AHashSet;

/// Trigger type whose parameters depend on the selected `frequency`.
pub const SCHEDULED_TIME: &str = "scheduled_time";
pub const FREQUENCY: &str = "frequency";

/// Parameters shown for each `scheduled_time` frequency, besides `frequency` itself.
pub fn frequency_fields(frequency: &str) -> &'static [&'static str] {
    match frequency {
        "hourly" => &["minute_of_hour", "timezone"],
        "daily" => &["time_of_day", "timezone"],
        "weekly" => &["day_of_week", "time_of_day", "timezone"],
        "monthly" => &["day_of_month", "time_of_day", "timezone"],
        "once" => &["date", "time_of_day", "timezone"],
        "cron" => &["cron_expression", "timezone"],
        _ => &[],
    }
}

/// The parameter keys a trigger editor should show for the current values.
///
/// For `scheduled_time` this is `frequency` plus the fields its current value
/// selects. Every other trigger type shows all of its non-blank keys.
pub fn visible_keys(trigger_type: &str, params: &[ParamKv]) -> AHashSet<String> {
    if trigger_type != SCHEDULED_TIME {
        return params
            .iter()
            .filter(|p| !p.is_blank())
            .map(|p| p.key.clone())
            .collect();
    }

    let frequency = params
        .iter()
        .find(|p| p.key == FREQUENCY)
        .map(|p| p.value.trim())
        .unwrap_or_default();

    std::iter::once(FREQUENCY)
        .chain(frequency_fields(frequency).iter().copied())
        .map(str::to_string)
        .collect()
}
