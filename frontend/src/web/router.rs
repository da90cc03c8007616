//! Router service - core engine
//!
//! Wraps the History API: every touch of `window.history` lives here.
//! Navigation runs "listen -> guard -> handle -> load", the guard itself is
//! `AppRoute::guard`.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision};
use crate::auth::AuthPhase;

fn current_location() -> AppRoute {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return AppRoute::default();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    AppRoute::from_location(&path, &search)
}

fn push_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

/// Used for redirects so the guarded URL does not stay in history.
fn replace_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

/// Router service
///
/// The session phase is injected as a signal so routing does not depend on
/// the auth module's internals.
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    auth_phase: Signal<AuthPhase>,
}

impl RouterService {
    fn new(auth_phase: Signal<AuthPhase>) -> Self {
        let initial_route = current_location();
        // canonicalize `/` and unknown paths
        replace_history_state(&initial_route.to_url());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            auth_phase,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn auth_phase(&self) -> Signal<AuthPhase> {
        self.auth_phase
    }

    /// Navigates to `target` through the guard, pushing a history entry.
    pub fn navigate(&self, target: AppRoute) {
        self.navigate_to_route(target, true);
    }

    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let phase = self.auth_phase.get_untracked();

        let route = match target.guard(phase) {
            GuardDecision::Redirect(redirect) => {
                tracing::info!(from = %target, to = %redirect, "guard redirect");
                redirect
            }
            GuardDecision::Render | GuardDecision::Pending => target,
        };

        if use_push {
            push_history_state(&route.to_url());
        } else {
            replace_history_state(&route.to_url());
        }
        self.set_route.set(route);
    }

    /// Browser back/forward also goes through the guard.
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            router.navigate_to_route(current_location(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // the listener must outlive this scope
        closure.forget();
    }

    /// Re-runs the guard whenever the session phase changes.
    ///
    /// Covers login (leave the login page), logout and the out-of-band 401
    /// invalidation (leave the protected page, remembering it).
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let auth_phase = self.auth_phase;

        Effect::new(move |_| {
            let phase = auth_phase.get();
            let route = current_route.get_untracked();

            if let GuardDecision::Redirect(redirect) = route.guard(phase) {
                tracing::info!(?phase, from = %route, to = %redirect, "session changed, redirecting");
                replace_history_state(&redirect.to_url());
                set_route.set(redirect);
            }
        });
    }
}

fn provide_router(auth_phase: Signal<AuthPhase>) -> RouterService {
    let router = RouterService::new(auth_phase);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI components
// ============================================================================

/// Router root; provides the router context.
#[component]
pub fn Router(auth_phase: Signal<AuthPhase>, children: Children) -> impl IntoView {
    provide_router(auth_phase);

    children()
}

/// Renders the current route, or a placeholder while the guard is pending.
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        match current.guard(router.auth_phase().get()) {
            GuardDecision::Render => matcher(current),
            GuardDecision::Pending | GuardDecision::Redirect(_) => view! {
                <div class="p-6 text-center text-sm text-base-content/60">"Carregando…"</div>
            }
            .into_any(),
        }
    }
}
