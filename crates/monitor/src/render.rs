//! Terminal rendering of machine cards.
//!
//! Rendering is split in two pure steps: [`build_card`] turns a
//! [`MachineRecord`] into a [`CardView`] (status, formatted values, gauge
//! fills), and [`render_card`] lays the view out as text. Neither touches
//! the store or the network.

use rulwatch_core::failure_date::days_until_failure;
use rulwatch_core::gauge::{percent_of, percent_of_opt};
use rulwatch_core::machine::MachineRecord;
use rulwatch_core::metric_names::{
    METRIC_PRESSURE, METRIC_TEMPERATURE, METRIC_VIBRATION, PRESSURE_MAX, RUL_HOURS_MAX,
    TEMPERATURE_MAX, VIBRATION_MAX,
};
use rulwatch_core::status::MachineStatus;
use rulwatch_core::types::{MachineId, Timestamp};

use crate::store::Fleet;

/// Shown when no RUL prediction is available.
pub const RUL_PLACEHOLDER: &str = "-";

/// Shown when no failure date is available.
pub const DATE_PLACEHOLDER: &str = "N/A";

/// Number of cells in a gauge bar.
const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    /// Canonical metric name (see [`rulwatch_core::metric_names`]).
    pub metric: &'static str,
    pub label: &'static str,
    pub value_text: String,
    /// Fill in percent, always within `[0, 100]`.
    pub percent: f64,
}

/// Everything needed to draw one machine card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub machine_id: MachineId,
    pub status: MachineStatus,
    pub rul_text: String,
    pub rul_percent: f64,
    pub failure_date_text: String,
    pub days_until_failure: Option<i64>,
    pub run_hours: u64,
    pub sensors: Vec<GaugeView>,
}

pub fn build_card(machine: &MachineRecord, now: Timestamp) -> CardView {
    let rul_text = match machine.rul_hours {
        Some(rul) if rul.is_finite() => format!("{rul:.0} h"),
        _ => RUL_PLACEHOLDER.to_string(),
    };

    let (failure_date_text, days) = match machine.predicted_failure_date.as_deref() {
        Some(date) => (date.to_string(), days_until_failure(date, now)),
        None => (DATE_PLACEHOLDER.to_string(), None),
    };

    CardView {
        machine_id: machine.machine_id,
        status: MachineStatus::from_rul_hours(machine.rul_hours),
        rul_text,
        rul_percent: percent_of_opt(machine.rul_hours, RUL_HOURS_MAX),
        failure_date_text,
        days_until_failure: days,
        run_hours: machine.run_hours,
        sensors: vec![
            GaugeView {
                metric: METRIC_TEMPERATURE,
                label: "Temperature",
                value_text: format!("{:.1}°C", machine.temperature),
                percent: percent_of(machine.temperature, TEMPERATURE_MAX),
            },
            GaugeView {
                metric: METRIC_VIBRATION,
                label: "Vibration",
                value_text: format!("{:.2}", machine.vibration),
                percent: percent_of(machine.vibration, VIBRATION_MAX),
            },
            GaugeView {
                metric: METRIC_PRESSURE,
                label: "Pressure",
                value_text: format!("{:.1} PSI", machine.pressure),
                percent: percent_of(machine.pressure, PRESSURE_MAX),
            },
        ],
    }
}

/// A fixed-width bar such as `[#####---------------]`.
pub fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

/// ANSI SGR sequence for a status color name (see [`MachineStatus::color`]).
fn ansi_code(color: &str) -> &'static str {
    match color {
        "red" => "\x1b[31m",
        "orange" => "\x1b[38;5;208m",
        "green" => "\x1b[32m",
        _ => "\x1b[90m",
    }
}

const ANSI_RESET: &str = "\x1b[0m";

/// Wrap `text` in the terminal color of `status`.
pub fn paint(status: MachineStatus, text: &str) -> String {
    format!("{}{text}{ANSI_RESET}", ansi_code(status.color()))
}

/// Lay a card out as text. The status badge and RUL bar carry the status color.
pub fn render_card(card: &CardView) -> String {
    let badge = format!("{:>10}", card.status.as_str().to_uppercase());

    let failure = match card.days_until_failure {
        Some(days) => format!("{} ({days} days)", card.failure_date_text),
        None => card.failure_date_text.clone(),
    };

    let mut lines = vec![
        format!(
            "Machine {:<6} {}",
            card.machine_id,
            paint(card.status, &badge)
        ),
        format!(
            "  RUL          {} {}",
            paint(card.status, &bar(card.rul_percent)),
            card.rul_text
        ),
        format!("  Failure      {failure}"),
    ];
    lines.extend(card.sensors.iter().map(|gauge| {
        format!(
            "  {:<12} {} {}",
            gauge.label,
            bar(gauge.percent),
            gauge.value_text
        )
    }));
    lines.push(format!("  Run hours    {}", card.run_hours));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// One-line fleet summary shown above the cards.
pub fn render_summary(fleet: &Fleet) -> String {
    let critical = fleet
        .machines
        .iter()
        .filter(|m| MachineStatus::from_rul_hours(m.rul_hours) == MachineStatus::Critical)
        .count();

    let health = if critical > 0 {
        format!("{critical} machine(s) near failure, urgent attention required")
    } else {
        "All machines operating normally".to_string()
    };

    let updated = fleet
        .updated_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "waiting for first prediction".to_string());

    format!(
        "{} machines | {health} | last update: {updated}",
        fleet.machines.len()
    )
}

/// Full dashboard: summary followed by one card per machine, in fleet order.
pub fn render_dashboard(fleet: &Fleet, now: Timestamp) -> String {
    let mut out = render_summary(fleet);
    out.push_str("\n\n");
    for machine in &fleet.machines {
        out.push_str(&render_card(&build_card(machine, now)));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use rulwatch_core::machine::fallback_machines;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 4, 28, 12, 0, 0).unwrap()
    }

    fn fleet(machines: Vec<MachineRecord>) -> Fleet {
        Fleet {
            machines,
            applied_seq: 0,
            updated_at: None,
        }
    }

    #[test]
    fn placeholders_before_first_prediction() {
        let card = build_card(&fallback_machines()[0], now());
        assert_eq!(card.status, MachineStatus::Pending);
        assert_eq!(card.rul_text, RUL_PLACEHOLDER);
        assert_eq!(card.failure_date_text, DATE_PLACEHOLDER);
        assert_eq!(card.days_until_failure, None);
        assert_eq!(card.rul_percent, 0.0);
    }

    #[test]
    fn predicted_card_values() {
        let mut machine = fallback_machines()[0].clone();
        machine.rul_hours = Some(72.4);
        machine.predicted_failure_date = Some("2024-05-01 12:00:00".to_string());

        let card = build_card(&machine, now());
        assert_eq!(card.status, MachineStatus::Warning);
        assert_eq!(card.rul_text, "72 h");
        assert_eq!(card.days_until_failure, Some(3));
        assert_eq!(card.sensors[0].value_text, "70.0°C");
        assert_eq!(card.sensors[1].value_text, "0.50");
        assert_eq!(card.sensors[2].value_text, "30.0 PSI");
        assert_eq!(card.sensors[1].percent, 50.0);
        assert_eq!(card.sensors[1].metric, METRIC_VIBRATION);
    }

    #[test]
    fn unparseable_date_is_shown_without_countdown() {
        let mut machine = fallback_machines()[0].clone();
        machine.predicted_failure_date = Some("next tuesday".to_string());

        let card = build_card(&machine, now());
        assert_eq!(card.failure_date_text, "next tuesday");
        assert_eq!(card.days_until_failure, None);
    }

    #[test]
    fn bar_fill() {
        assert_eq!(bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(bar(100.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(bar(50.0), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(bar(250.0), bar(100.0));
    }

    #[test]
    fn card_text_contains_status_and_values() {
        let mut machine = fallback_machines()[1].clone();
        machine.rul_hours = Some(30.0);
        let text = render_card(&build_card(&machine, now()));

        assert!(text.starts_with("Machine 2"));
        assert!(text.contains("CRITICAL"));
        assert!(text.contains("30 h"));
        assert!(text.contains("N/A"));
        assert!(text.contains("Run hours    1500"));
    }

    #[test]
    fn status_color_reaches_the_card() {
        let mut machine = fallback_machines()[0].clone();

        machine.rul_hours = Some(30.0);
        let critical = render_card(&build_card(&machine, now()));
        assert!(critical.contains(&paint(MachineStatus::Critical, "  CRITICAL")));
        assert!(critical.contains("\x1b[31m"));

        machine.rul_hours = Some(150.0);
        let warning = render_card(&build_card(&machine, now()));
        assert!(warning.contains("\x1b[38;5;208m"));
        assert!(!warning.contains("\x1b[31m"));

        machine.rul_hours = Some(500.0);
        let normal = render_card(&build_card(&machine, now()));
        assert!(normal.contains("\x1b[32m"));
    }

    #[test]
    fn paint_maps_each_status_color() {
        assert_eq!(paint(MachineStatus::Critical, "x"), "\x1b[31mx\x1b[0m");
        assert_eq!(paint(MachineStatus::Warning, "x"), "\x1b[38;5;208mx\x1b[0m");
        assert_eq!(paint(MachineStatus::Normal, "x"), "\x1b[32mx\x1b[0m");
        assert_eq!(paint(MachineStatus::Pending, "x"), "\x1b[90mx\x1b[0m");
    }

    #[test]
    fn summary_counts_critical_machines() {
        let mut machines = fallback_machines();
        assert!(render_summary(&fleet(machines.clone())).contains("All machines operating normally"));

        machines[0].rul_hours = Some(12.0);
        machines[2].rul_hours = Some(40.0);
        let summary = render_summary(&fleet(machines));
        assert!(summary.starts_with("3 machines"));
        assert!(summary.contains("2 machine(s) near failure"));
        assert!(summary.contains("waiting for first prediction"));
    }

    #[test]
    fn dashboard_keeps_fleet_order() {
        let text = render_dashboard(&fleet(fallback_machines()), now());
        let p1 = text.find("Machine 1").unwrap();
        let p2 = text.find("Machine 2").unwrap();
        let p3 = text.find("Machine 3").unwrap();
        assert!(p1 < p2 && p2 < p3);
    }
}
