use contracts::dashboards::d400_sales_performance::{KpiValue, ValueFormat};
use leptos::prelude::*;

/// Fallback formatting when the backend sent no display string
fn format_value(val: f64, fmt: &ValueFormat) -> String {
    match fmt {
        ValueFormat::Money { .. } => {
            let sign = if val < 0.0 { "-" } else { "" };
            let cents = (val.abs() * 100.0).round() as u64;
            format!(
                "{}${}.{:02}",
                sign,
                format_thousands(cents / 100),
                cents % 100
            )
        }
        // Counts are plain integers, as in backend `shared::format::format_count`
        ValueFormat::Integer => (val.round().max(0.0) as u64).to_string(),
    }
}

/// Mirrors backend `shared::format::group_thousands`; keep both in step
fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

fn display_text(kpi: &KpiValue) -> String {
    if !kpi.display.is_empty() {
        return kpi.display.clone();
    }
    format_value(kpi.value.unwrap_or(0.0), &kpi.format)
}

#[component]
pub fn KpiCard(
    /// Indicator to show; re-rendered whenever the dashboard reloads
    #[prop(into)]
    kpi: Signal<KpiValue>,
) -> impl IntoView {
    let label = move || kpi.with(|k| k.label.clone());
    let value = move || kpi.with(display_text);
    let card_class = move || {
        if kpi.with(|k| k.value.is_some()) {
            "kpi-card"
        } else {
            "kpi-card kpi-card--empty"
        }
    };

    view! {
        <div class=card_class>
            <div class="kpi-card__label">{label}</div>
            <div class="kpi-card__value">{value}</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(display: &str, value: Option<f64>, format: ValueFormat) -> KpiValue {
        KpiValue {
            id: "total_sales".to_string(),
            label: "Total Sales".to_string(),
            value,
            display: display.to_string(),
            format,
        }
    }

    #[test]
    fn test_backend_display_wins() {
        let money = ValueFormat::Money {
            currency: "USD".to_string(),
        };
        assert_eq!(display_text(&kpi("$12.00", Some(12.0), money)), "$12.00");
    }

    #[test]
    fn test_fallback_formatting() {
        let money = ValueFormat::Money {
            currency: "USD".to_string(),
        };
        assert_eq!(display_text(&kpi("", Some(1234567.891), money.clone())), "$1,234,567.89");
        assert_eq!(display_text(&kpi("", None, money)), "$0.00");
        assert_eq!(display_text(&kpi("", Some(1000.0), ValueFormat::Integer)), "1000");
    }
}
