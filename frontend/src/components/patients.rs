use crate::api::{GenesisApi, use_api};
use crate::components::icons::{Plus, Search, XMark};
use crate::components::patient_form_modal::{PatientFormModal, SaveKind};
use crate::components::patient_table::{PageNav, PatientTable};
use crate::config::AppConfig;
use crate::patients::debounce::Debouncer;
use crate::patients::list_state::{FetchOutcome, FetchTicket, PatientListState};
use crate::web::Timeout;
use genesis_shared::Patient;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Runs `ticket` and follows a page-clamp refetch if the response asks for one.
fn spawn_fetch(api: GenesisApi, state: RwSignal<PatientListState>, ticket: FetchTicket) {
    spawn_local(async move {
        let result = api.list_patients(&ticket.request).await;
        let outcome = state.try_update(|s| s.apply(&ticket, result));
        if let Some(FetchOutcome::Refetch(next)) = outcome {
            spawn_fetch(api, state, next);
        }
    });
}

const SUCCESS_TOAST_MS: u32 = 3_000;

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn PatientsPage() -> impl IntoView {
    let api = use_api();
    let config = use_context::<AppConfig>().unwrap_or_default();

    let state = RwSignal::new(PatientListState::new(config.page_size));
    let (search_raw, set_search_raw) = signal(String::new());
    let debouncer = StoredValue::new_local(Debouncer::<String>::new(config.search_debounce_ms));
    let search_timer = StoredValue::new_local(Option::<Timeout>::None);

    let modal_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<Patient>::None);
    let (success, set_success) = signal(Option::<String>::None);
    let toast = StoredValue::new_local(Debouncer::<()>::new(SUCCESS_TOAST_MS));
    let toast_timer = StoredValue::new_local(Option::<Timeout>::None);

    // success toasts go away on their own, errors wait for the user
    let notify = move |message: &str| {
        set_success.set(Some(message.to_string()));
        let now = js_sys::Date::now();
        let Some(ticket) = toast.try_update_value(|d| d.input((), now)) else {
            return;
        };
        let timer = Timeout::new(SUCCESS_TOAST_MS, move || {
            if toast.try_update_value(|d| d.fire(ticket)).flatten().is_some() {
                set_success.set(None);
            }
        });
        toast_timer.set_value(timer);
    };

    let fetch = {
        let api = api.clone();
        move |ticket: Option<FetchTicket>| {
            if let Some(ticket) = ticket {
                spawn_fetch(api.clone(), state, ticket);
            }
        }
    };

    fetch(state.try_update(|s| s.begin_fetch()));

    let on_search_input = {
        let fetch = fetch.clone();
        move |value: String| {
            set_search_raw.set(value.clone());
            let now = js_sys::Date::now();
            let Some(ticket) = debouncer.try_update_value(|d| d.input(value, now)) else {
                return;
            };
            let fetch = fetch.clone();
            let timer = Timeout::new(debouncer.with_value(|d| d.delay_ms()), move || {
                let term = debouncer.try_update_value(|d| d.fire(ticket)).flatten();
                if let Some(term) = term {
                    fetch(state.try_update(|s| s.set_search(&term)).flatten());
                }
            });
            // replacing the old timer drops and clears it
            search_timer.set_value(timer);
        }
    };

    let on_nav = {
        let fetch = fetch.clone();
        move |nav: PageNav| {
            let ticket = state
                .try_update(|s| match nav {
                    PageNav::Prev => s.prev_page(),
                    PageNav::Next => s.next_page(),
                    PageNav::Go(page) => s.go_to_page(page),
                    PageNav::Size(size) => s.set_page_size(size),
                })
                .flatten();
            fetch(ticket);
        }
    };

    let on_delete = {
        let api = api.clone();
        let fetch = fetch.clone();
        move |id: String| {
            if !confirm("Excluir paciente?") {
                return;
            }
            if !state.try_update(|s| s.begin_delete(&id)).unwrap_or(false) {
                return;
            }
            let api = api.clone();
            let fetch = fetch.clone();
            spawn_local(async move {
                let result = api.delete_patient(&id).await;
                let deleted = result.is_ok();
                let reload = state.try_update(|s| s.finish_delete(&id, result)).flatten();
                if deleted {
                    notify("Paciente excluído");
                }
                fetch(reload);
            });
        }
    };

    let on_edit = move |patient: Patient| {
        editing.set(Some(patient));
        modal_open.set(true);
    };

    let on_new = move |_| {
        editing.set(None);
        modal_open.set(true);
    };

    let on_saved = {
        let fetch = fetch.clone();
        move |kind: SaveKind| {
            let message = match kind {
                SaveKind::Created => "Paciente cadastrado",
                SaveKind::Updated => "Paciente atualizado",
            };
            notify(message);
            fetch(state.try_update(|s| s.on_saved()));
        }
    };

    on_cleanup(move || {
        search_timer.try_update_value(|t| t.take());
        debouncer.try_update_value(|d| d.cancel());
        toast_timer.try_update_value(|t| t.take());
        toast.try_update_value(|d| d.cancel());
    });

    let notice = move || state.with(|s| s.notice().map(str::to_string));
    let list_error = move || state.with(|s| s.error().map(str::to_string));
    let on_retry = move |_| fetch(state.try_update(|s| s.reload()));

    view! {
        <div class="space-y-5">
            <Show when=move || success.get().is_some() || notice().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <Show when=move || success.get().is_some()>
                        <div class="alert alert-success shadow-lg">
                            <span>{move || success.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <Show when=move || notice().is_some()>
                        <div class="alert alert-error shadow-lg">
                            <span>{move || notice().unwrap_or_default()}</span>
                            <button
                                class="btn btn-ghost btn-xs btn-square"
                                aria-label="Fechar"
                                on:click=move |_| state.update(|s| s.dismiss_notice())
                            >
                                <XMark attr:class="h-4 w-4" />
                            </button>
                        </div>
                    </Show>
                </div>
            </Show>

            <div class="flex flex-col md:flex-row md:items-center gap-3">
                <h1 class="text-2xl font-semibold flex-1">"Pacientes"</h1>
                <label class="input input-bordered flex items-center gap-2 md:w-80">
                    <Search attr:class="h-4 w-4 opacity-50" />
                    <input
                        type="search"
                        class="grow"
                        placeholder="Buscar por nome, CPF ou e-mail"
                        prop:value=search_raw
                        on:input=move |ev| on_search_input(event_target_value(&ev))
                    />
                    <Show when=move || state.with(PatientListState::loading)>
                        <span class="loading loading-spinner loading-xs"></span>
                    </Show>
                </label>
                <button class="btn btn-primary gap-2" on:click=on_new>
                    <Plus attr:class="h-4 w-4" />
                    "Novo Paciente"
                </button>
            </div>

            <Show when=move || list_error().is_some()>
                <div role="alert" class="alert alert-warning">
                    <span>{move || list_error().unwrap_or_default()}</span>
                    <button class="btn btn-sm" on:click=on_retry.clone()>"Tentar novamente"</button>
                </div>
            </Show>

            <PatientTable state=state on_edit=on_edit on_delete=on_delete on_nav=on_nav />

            <PatientFormModal open=modal_open editing=editing on_saved=on_saved />
        </div>
    }
}
