//! Genesis admin frontend
//!
//! Context-driven layout:
//! - `web::route`: route model and guard decision
//! - `web::router`: History API router service
//! - `auth`: session state machine
//! - `api`: REST client over `web::http`
//! - `patients`: list/search/form controllers
//! - `components`: UI layer

mod api;
mod auth;
mod config;
mod error;
mod logging;

mod components {
    pub mod dashboard;
    mod icons;
    pub mod layout;
    pub mod login;
    mod patient_form_modal;
    mod patient_table;
    pub mod patients;
}

mod patients {
    pub mod debounce;
    pub mod form_state;
    pub mod list_state;
}

/// Thin wrappers over browser APIs (fetch, localStorage, setTimeout, History).
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    #[cfg(test)]
    pub use http::HttpResponse;
    pub use http::{FetchTransport, HttpError, HttpRequest, HttpTransport};
    #[cfg(test)]
    pub use storage::MemoryStorage;
    pub use storage::{BrowserStorage, KeyValueStore};
    pub use timer::Timeout;
}

use std::sync::Arc;

use crate::api::GenesisApi;
use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::layout::AppLayout;
use crate::components::login::LoginPage;
use crate::components::patients::PatientsPage;
use crate::config::AppConfig;
use crate::logging::init_logging;

use leptos::prelude::*;

use web::FetchTransport;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login { .. } => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <AppLayout><DashboardPage /></AppLayout> }.into_any(),
        AppRoute::Patients => view! { <AppLayout><PatientsPage /></AppLayout> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. configuration and logging
    let (config, config_error) = match AppConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_logging(config.log_level);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "invalid build configuration, using defaults");
    }
    tracing::info!(api_url = %config.api_url, "starting");

    // 2. session, restored from storage
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    // 3. API client reporting 401s back to the session
    let api = GenesisApi::new(&config.api_url, Arc::new(FetchTransport), Arc::new(auth_ctx));
    provide_context(api);
    provide_context(config);

    // 4. router guarded by the session phase
    let auth_phase = auth_ctx.phase_signal();

    view! {
        <Router auth_phase=auth_phase>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
