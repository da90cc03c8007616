use crate::api::use_api;
use crate::auth::{login, use_auth};
use crate::components::icons::{Envelope, LockClosed};
use leptos::prelude::*;
use leptos::task::spawn_local;

const LOGIN_ERROR: &str = "Erro ao fazer login";
const MISSING_FIELDS: &str = "Informe e-mail e senha";

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // leaving the page after success is the router's job
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        let email = email.get_untracked().trim().to_string();
        let password = password.get_untracked();
        if email.is_empty() || password.is_empty() {
            set_error_msg.set(Some(MISSING_FIELDS.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            if let Err(e) = login(&auth, &api, email, password).await {
                tracing::warn!(error = %e, "login failed");
                set_error_msg.set(Some(e.user_message(LOGIN_ERROR)));
            }
            set_is_submitting.set(false);
        });
    };

    let year = chrono::Local::now().format("%Y").to_string();

    view! {
        <div class="min-h-screen flex flex-col justify-between bg-base-200">
            <main class="flex flex-1 items-center justify-center px-4">
                <div class="flex flex-col md:flex-row w-full max-w-5xl rounded-box shadow-2xl overflow-hidden bg-base-100">
                    <div class="w-full md:w-1/2 bg-neutral text-neutral-content p-8 md:p-12 flex flex-col justify-center gap-3">
                        <h2 class="text-2xl md:text-3xl font-bold">"Bem-vindo à Genesis!"</h2>
                        <p class="text-sm md:text-base opacity-80">
                            "Faça login para gerenciar pacientes e exames com agilidade e segurança."
                        </p>
                    </div>

                    <form class="w-full md:w-1/2 p-6 md:p-12 flex flex-col gap-4" on:submit=on_submit>
                        <h2 class="text-xl md:text-2xl font-semibold">"Entrar na Conta"</h2>

                        <label class="form-control">
                            <span class="label-text mb-1">"Email"</span>
                            <div class="input input-bordered flex items-center gap-2">
                                <Envelope attr:class="h-5 w-5 opacity-50" />
                                <input
                                    type="email"
                                    class="grow"
                                    placeholder="Digite seu email"
                                    autocomplete="username"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                />
                            </div>
                        </label>

                        <label class="form-control">
                            <span class="label-text mb-1">"Senha"</span>
                            <div class="input input-bordered flex items-center gap-2">
                                <LockClosed attr:class="h-5 w-5 opacity-50" />
                                <input
                                    type="password"
                                    class="grow"
                                    placeholder="Digite sua senha"
                                    autocomplete="current-password"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                />
                            </div>
                        </label>

                        <Show when=move || error_msg.get().is_some()>
                            <p role="alert" class="text-error text-sm">
                                {move || error_msg.get().unwrap_or_default()}
                            </p>
                        </Show>

                        <button type="submit" class="btn btn-neutral w-full" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Entrando..." }.into_any()
                            } else {
                                "Entrar".into_any()
                            }}
                        </button>
                    </form>
                </div>
            </main>

            <footer class="text-center text-xs opacity-50 py-4">
                "© " {year} " Genesis | Todos os direitos reservados"
            </footer>
        </div>
    }
}
