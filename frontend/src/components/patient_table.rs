use crate::components::icons::{Pencil, Trash};
use crate::patients::list_state::PatientListState;
use genesis_shared::date::format_display_date;
use genesis_shared::{PAGE_SIZE_OPTIONS, Patient};
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    Prev,
    Next,
    Go(u32),
    Size(u32),
}

fn patient_row(
    patient: Patient,
    state: RwSignal<PatientListState>,
    on_edit: Callback<Patient>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let id = patient.id.clone();
    let deleting = move || state.with(|s| s.is_deleting(&id));
    let data = &patient.data;
    let name = data.name.clone();
    let cpf = data.cpf.clone();
    let email = data.email.clone().unwrap_or_else(|| "-".to_string());
    let birth = data
        .birth_date
        .as_ref()
        .map(format_display_date)
        .unwrap_or_else(|| "-".to_string());
    let delete_id = patient.id.clone();

    view! {
        <tr class="hover">
            <td class="font-medium">{name}</td>
            <td>{cpf}</td>
            <td>{email}</td>
            <td>{birth}</td>
            <td class="text-right whitespace-nowrap">
                <button
                    class="btn btn-sm btn-outline gap-1 mr-2"
                    disabled=deleting.clone()
                    on:click=move |_| on_edit.run(patient.clone())
                >
                    <Pencil attr:class="h-4 w-4" />
                    "Editar"
                </button>
                <button
                    class="btn btn-sm btn-error gap-1"
                    disabled=deleting.clone()
                    on:click=move |_| on_delete.run(delete_id.clone())
                >
                    {
                        let deleting = deleting.clone();
                        move || if deleting() {
                            view! { <span class="loading loading-spinner loading-xs"></span> }.into_any()
                        } else {
                            view! { <Trash attr:class="h-4 w-4" /> }.into_any()
                        }
                    }
                    "Excluir"
                </button>
            </td>
        </tr>
    }
}

#[component]
pub fn PatientTable(
    state: RwSignal<PatientListState>,
    #[prop(into)] on_edit: Callback<Patient>,
    #[prop(into)] on_delete: Callback<String>,
    #[prop(into)] on_nav: Callback<PageNav>,
) -> impl IntoView {
    let rows = move || {
        state.with(|s| {
            if s.is_empty_state() {
                return view! {
                    <tr>
                        <td colspan="5" class="text-center py-8 text-base-content/50">
                            "Nenhum paciente encontrado."
                        </td>
                    </tr>
                }
                .into_any();
            }
            s.items()
                .iter()
                .cloned()
                .map(|p| patient_row(p, state, on_edit, on_delete))
                .collect_view()
                .into_any()
        })
    };

    let footer_text = move || {
        state.with(|s| {
            let (first, last) = s.visible_range();
            format!("Exibindo {}–{} de {}", first, last, s.total())
        })
    };

    let page_buttons = move || {
        let (current, pages) = state.with(|s| (s.current_page(), s.page_buttons()));
        pages
            .into_iter()
            .map(|n| {
                let class = if n == current {
                    "join-item btn btn-sm btn-active btn-primary"
                } else {
                    "join-item btn btn-sm"
                };
                view! { <button class=class on:click=move |_| on_nav.run(PageNav::Go(n))>{n}</button> }
            })
            .collect_view()
    };

    view! {
        <div class="card bg-base-100 shadow-sm overflow-hidden">
            <div class="overflow-auto max-h-[65vh]">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr class="bg-primary text-primary-content">
                            <th>"Nome"</th>
                            <th>"CPF"</th>
                            <th>"E-mail"</th>
                            <th>"Nascimento"</th>
                            <th class="text-right">"Ações"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>

            <div class="flex flex-col md:flex-row md:items-center md:justify-between gap-3 p-3 border-t border-base-200">
                <div class="text-sm text-base-content/70">{footer_text}</div>
                <div class="flex items-center gap-3">
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                                on_nav.run(PageNav::Size(size));
                            }
                        }
                    >
                        {PAGE_SIZE_OPTIONS
                            .into_iter()
                            .map(|n| {
                                view! {
                                    <option value=n.to_string() selected=move || state.with(|s| s.page_size() == n)>
                                        {format!("{n} / pág")}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                    <div class="join">
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || state.with(|s| !s.can_prev())
                            on:click=move |_| on_nav.run(PageNav::Prev)
                        >
                            "Anterior"
                        </button>
                        {page_buttons}
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || state.with(|s| !s.can_next())
                            on:click=move |_| on_nav.run(PageNav::Next)
                        >
                            "Próxima"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
