use crate::api::use_api;
use crate::components::icons::{Squares, TrendDown, TrendUp, Users};
use genesis_shared::PageRequest;
use genesis_shared::dashboard::{DashboardMetrics, EventStatus, Kpi, Trend};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
fn TrendBadge(kpi: Kpi) -> impl IntoView {
    let (class, icon) = match kpi.trend() {
        Trend::Up => ("text-success", view! { <TrendUp attr:class="h-4 w-4" /> }.into_any()),
        Trend::Down => ("text-error", view! { <TrendDown attr:class="h-4 w-4" /> }.into_any()),
    };
    view! {
        <span class=format!("inline-flex items-center gap-1 text-sm font-medium {class}")>
            {icon}
            {kpi.delta_label()}
        </span>
    }
}

#[component]
fn KpiCard(title: &'static str, kpi: Signal<Kpi>, children: Children) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body flex-row items-start gap-4 p-5">
                <div class="h-12 w-12 rounded-xl bg-primary/15 text-primary flex items-center justify-center">
                    {children()}
                </div>
                <div class="flex-1">
                    <div class="flex items-center justify-between">
                        <p class="text-sm text-base-content/60">{title}</p>
                        {move || view! { <TrendBadge kpi=kpi.get() /> }}
                    </div>
                    <p class="mt-1 text-2xl font-semibold">{move || kpi.get().total}</p>
                </div>
            </div>
        </div>
    }
}

fn status_class(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Completed => "badge badge-success badge-outline",
        EventStatus::InAnalysis => "badge badge-warning badge-outline",
        EventStatus::Collected => "badge badge-info badge-outline",
    }
}

/// Swaps the live patient count into the sample figures.
///
/// Returns `false` when the page was unmounted first.
fn show_patient_total(metrics: RwSignal<DashboardMetrics>, total: u64) -> bool {
    metrics
        .try_set(DashboardMetrics::sample().with_patient_total(total))
        .is_none()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let metrics = RwSignal::new(DashboardMetrics::sample());

    // live patient count; the rest stays on the bundled figures
    spawn_local(async move {
        match api.list_patients(&PageRequest::new(1, 1, None)).await {
            Ok(page) => {
                if !show_patient_total(metrics, page.total) {
                    tracing::debug!("dashboard gone before the patient total arrived");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not load patient total"),
        }
    });

    let patients = Signal::derive(move || metrics.with(|m| m.patients));
    let exams = Signal::derive(move || metrics.with(|m| m.exams));
    let physicians = Signal::derive(move || metrics.with(|m| m.physicians));

    let sample = metrics.get_untracked();
    let monthly: Vec<_> = sample
        .monthly_exams
        .iter()
        .cloned()
        .zip(sample.monthly_heights())
        .collect();
    let top: Vec<_> = sample
        .top_exams
        .iter()
        .cloned()
        .zip(sample.top_exam_widths())
        .collect();
    let events = sample.recent_events.clone();

    view! {
        <div class="space-y-5">
            <h1 class="text-2xl font-semibold">"Dashboard"</h1>

            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <KpiCard title="Pacientes" kpi=patients>
                    <Users attr:class="h-6 w-6" />
                </KpiCard>
                <KpiCard title="Exames" kpi=exams>
                    <Squares attr:class="h-6 w-6" />
                </KpiCard>
                <KpiCard title="Médicos" kpi=physicians>
                    <Users attr:class="h-6 w-6" />
                </KpiCard>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-4">
                <div class="card bg-base-100 shadow-sm lg:col-span-2">
                    <div class="card-body">
                        <h3 class="card-title text-base">"Exames por mês"</h3>
                        <div class="flex items-end gap-2 h-48">
                            {monthly
                                .into_iter()
                                .map(|(m, height)| {
                                    view! {
                                        <div class="flex-1 flex flex-col items-center justify-end h-full gap-1" title=m.value.to_string()>
                                            <div class="w-full rounded-t bg-primary/70" style=format!("height: {height}%")></div>
                                            <span class="text-[10px] text-base-content/60">{m.month}</span>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body">
                        <h3 class="card-title text-base">"Exames mais solicitados"</h3>
                        <ul class="space-y-3">
                            {top
                                .into_iter()
                                .map(|(exam, width)| {
                                    view! {
                                        <li>
                                            <div class="flex justify-between text-sm">
                                                <span>{exam.name}</span>
                                                <span class="text-base-content/60">{exam.count}</span>
                                            </div>
                                            <div class="h-2 rounded bg-base-200">
                                                <div class="h-2 rounded bg-primary" style=format!("width: {width}%")></div>
                                            </div>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-sm">
                <div class="card-body p-0">
                    <h3 class="card-title text-base p-5 pb-0">"Últimos eventos"</h3>
                    <div class="overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"ID"</th>
                                    <th>"Paciente"</th>
                                    <th>"Exame"</th>
                                    <th>"Data"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {events
                                    .into_iter()
                                    .map(|event| {
                                        view! {
                                            <tr>
                                                <td class="font-mono text-xs">{event.id}</td>
                                                <td>{event.patient}</td>
                                                <td>{event.exam}</td>
                                                <td>{event.when}</td>
                                                <td>
                                                    <span class=status_class(event.status)>{event.status.label()}</span>
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_total_after_unmount_is_dropped() {
        let owner = Owner::new();
        owner.set();

        let metrics = RwSignal::new(DashboardMetrics::sample());
        assert!(show_patient_total(metrics, 42));
        assert_eq!(metrics.get_untracked().patients.total, 42);

        metrics.dispose();
        assert!(!show_patient_total(metrics, 43));
    }
}
