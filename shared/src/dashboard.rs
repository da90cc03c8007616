//! Dashboard aggregates.
//!
//! The backend has no metrics endpoint yet, so [`DashboardMetrics::sample`]
//! provides the bundled figures; the patients total is replaced with the
//! live count by the frontend.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kpi {
    pub total: u64,
    pub delta: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Kpi {
    pub const fn new(total: u64, delta: i64) -> Self {
        Self { total, delta }
    }

    pub fn trend(&self) -> Trend {
        if self.delta >= 0 { Trend::Up } else { Trend::Down }
    }

    /// `+18`, `-1`, `+0`
    pub fn delta_label(&self) -> String {
        if self.delta >= 0 {
            format!("+{}", self.delta)
        } else {
            self.delta.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamCount {
    pub name: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Collected,
    InAnalysis,
    Completed,
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Collected => "Coletado",
            EventStatus::InAnalysis => "Em análise",
            EventStatus::Completed => "Concluído",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabEvent {
    pub id: &'static str,
    pub patient: &'static str,
    pub exam: &'static str,
    pub when: &'static str,
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub patients: Kpi,
    pub exams: Kpi,
    pub physicians: Kpi,
    pub monthly_exams: Vec<MonthlyCount>,
    pub top_exams: Vec<ExamCount>,
    pub recent_events: Vec<LabEvent>,
}

impl DashboardMetrics {
    pub fn sample() -> Self {
        let monthly = [
            ("Jan", 220),
            ("Fev", 260),
            ("Mar", 280),
            ("Abr", 245),
            ("Mai", 310),
            ("Jun", 330),
            ("Jul", 355),
            ("Ago", 372),
            ("Set", 340),
            ("Out", 390),
            ("Nov", 405),
            ("Dez", 430),
        ];
        let top = [
            ("Hemograma", 1240),
            ("Glicose", 990),
            ("Colesterol", 870),
            ("Ureia", 640),
            ("Creatinina", 540),
        ];

        Self {
            patients: Kpi::new(1243, 18),
            exams: Kpi::new(4870, 132),
            physicians: Kpi::new(27, -1),
            monthly_exams: monthly
                .into_iter()
                .map(|(month, value)| MonthlyCount { month, value })
                .collect(),
            top_exams: top
                .into_iter()
                .map(|(name, count)| ExamCount { name, count })
                .collect(),
            recent_events: vec![
                LabEvent {
                    id: "E-9341",
                    patient: "Maria L.",
                    exam: "Hemograma",
                    when: "Hoje 10:12",
                    status: EventStatus::Completed,
                },
                LabEvent {
                    id: "E-9338",
                    patient: "Diego F.",
                    exam: "Glicose",
                    when: "Hoje 09:37",
                    status: EventStatus::InAnalysis,
                },
                LabEvent {
                    id: "E-9329",
                    patient: "Ana P.",
                    exam: "TSH",
                    when: "Ontem 17:05",
                    status: EventStatus::Collected,
                },
                LabEvent {
                    id: "E-9321",
                    patient: "João M.",
                    exam: "PCR",
                    when: "Ontem 15:22",
                    status: EventStatus::Completed,
                },
            ],
        }
    }

    /// Replaces the patients total with a live figure, keeping the delta.
    pub fn with_patient_total(mut self, total: u64) -> Self {
        self.patients.total = total;
        self
    }

    pub fn monthly_heights(&self) -> Vec<u8> {
        let values: Vec<u64> = self.monthly_exams.iter().map(|m| m.value).collect();
        relative_percentages(&values)
    }

    pub fn top_exam_widths(&self) -> Vec<u8> {
        let values: Vec<u64> = self.top_exams.iter().map(|e| e.count).collect();
        relative_percentages(&values)
    }
}

/// Scales each value to a whole percentage of the series maximum.
pub fn relative_percentages(values: &[u64]) -> Vec<u8> {
    let max = values.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|v| u8::try_from(v.saturating_mul(100) / max).unwrap_or(100))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_follows_delta_sign() {
        assert_eq!(Kpi::new(10, 0).trend(), Trend::Up);
        assert_eq!(Kpi::new(10, -3).trend(), Trend::Down);
        assert_eq!(Kpi::new(10, 18).delta_label(), "+18");
        assert_eq!(Kpi::new(10, -1).delta_label(), "-1");
    }

    #[test]
    fn percentages_are_relative_to_max() {
        assert_eq!(relative_percentages(&[50, 100, 25]), vec![50, 100, 25]);
        assert_eq!(relative_percentages(&[0, 0]), vec![0, 0]);
        assert!(relative_percentages(&[]).is_empty());
    }

    #[test]
    fn sample_has_a_full_year_and_live_override() {
        let metrics = DashboardMetrics::sample().with_patient_total(7);
        assert_eq!(metrics.monthly_exams.len(), 12);
        assert_eq!(metrics.patients, Kpi::new(7, 18));
        let heights = metrics.monthly_heights();
        assert_eq!(heights.last(), Some(&100));
        assert_eq!(metrics.top_exam_widths().first(), Some(&100));
    }
}
