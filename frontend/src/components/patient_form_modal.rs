use crate::api::use_api;
use crate::components::icons::XMark;
use crate::patients::form_state::FormState;
use genesis_shared::Patient;
use leptos::prelude::*;
use leptos::task::spawn_local;

const SAVE_ERROR: &str = "Erro ao salvar paciente";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created,
    Updated,
}

#[component]
fn FormField(
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    #[prop(default = "")] placeholder: &'static str,
    value: RwSignal<String>,
    #[prop(into)] error: Signal<Option<&'static str>>,
    #[prop(optional)] wide: bool,
) -> impl IntoView {
    view! {
        <label class=if wide { "form-control md:col-span-2" } else { "form-control" }>
            <span class="label-text mb-1">{label}</span>
            <input
                type=kind
                placeholder=placeholder
                class=move || {
                    if error.get().is_some() {
                        "input input-bordered input-error w-full"
                    } else {
                        "input input-bordered w-full"
                    }
                }
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
            />
            <Show when=move || error.get().is_some()>
                <span class="text-error text-xs mt-1">{move || error.get().unwrap_or_default()}</span>
            </Show>
        </label>
    }
}

/// Create/edit modal. `editing` selects update mode; completion is reported
/// once through `on_saved`.
#[component]
pub fn PatientFormModal(
    open: RwSignal<bool>,
    editing: RwSignal<Option<Patient>>,
    #[prop(into)] on_saved: Callback<SaveKind>,
) -> impl IntoView {
    let api = use_api();
    let form = FormState::new();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        let is_open = open.get();
        if is_open {
            match editing.get_untracked() {
                Some(patient) => form.fill_from(&patient),
                None => form.reset(),
            }
        }
        if let Some(dialog) = dialog_ref.get() {
            if is_open && !dialog.open() {
                let _ = dialog.show_modal();
            } else if !is_open && dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if form.submitting.get_untracked() {
            return;
        }

        let payload = match form.to_form().validate() {
            Ok(payload) => payload,
            Err(errors) => {
                form.errors.set(errors);
                return;
            }
        };
        let generation = form.begin_submit();

        let api = api.clone();
        let target = editing.get_untracked().map(|p| p.id);
        spawn_local(async move {
            let result = match &target {
                Some(id) => api.update_patient(id, payload).await.map(|_| SaveKind::Updated),
                None => api.create_patient(payload).await.map(|_| SaveKind::Created),
            };
            if !form.finish_submit(generation) {
                // the modal now belongs to another record; only refresh the list
                if let Ok(kind) = result {
                    on_saved.run(kind);
                }
                return;
            }
            match result {
                Ok(kind) => {
                    open.set(false);
                    on_saved.run(kind);
                }
                // the session redirects to login; nothing to show here
                Err(e) if e.is_unauthorized() => open.set(false),
                Err(e) => {
                    tracing::warn!(error = %e, "saving patient failed");
                    form.submit_error.set(Some(e.user_message(SAVE_ERROR)));
                }
            }
        });
    };

    let errors = form.errors;
    let title = move || {
        if editing.with(Option::is_some) {
            "Editar Paciente"
        } else {
            "Novo Paciente"
        }
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box max-w-2xl">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-semibold text-lg">{title}</h3>
                    <button
                        type="button"
                        class="btn btn-sm btn-ghost btn-square"
                        aria-label="Fechar"
                        on:click=move |_| open.set(false)
                    >
                        <XMark attr:class="h-5 w-5" />
                    </button>
                </div>

                <form on:submit=on_submit class="space-y-4" novalidate>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <FormField
                            label="Nome"
                            placeholder="Nome completo"
                            value=form.name
                            error=Signal::derive(move || errors.with(|e| e.name))
                            wide=true
                        />
                        <FormField
                            label="CPF"
                            placeholder="Somente números"
                            value=form.cpf
                            error=Signal::derive(move || errors.with(|e| e.cpf))
                        />
                        <FormField
                            label="E-mail (opcional)"
                            kind="email"
                            placeholder="email@exemplo.com"
                            value=form.email
                            error=Signal::derive(move || errors.with(|e| e.email))
                        />
                        <FormField
                            label="Data de Nascimento"
                            kind="date"
                            value=form.birth_date
                            error=Signal::derive(move || errors.with(|e| e.birth_date))
                        />
                    </div>

                    <Show when=move || form.submit_error.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || form.submit_error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>
                            "Cancelar"
                        </button>
                        <button type="submit" class="btn btn-neutral" disabled=move || form.submitting.get()>
                            {move || if form.submitting.get() { "Salvando..." } else { "Salvar" }}
                        </button>
                    </div>
                </form>
            </div>
        </dialog>
    }
}
