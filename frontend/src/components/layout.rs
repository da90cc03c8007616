use crate::auth::{logout, use_auth};
use crate::components::icons::{LogOut, Squares, Users};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
fn NavItem(route: AppRoute, label: &'static str, children: Children) -> impl IntoView {
    let router = use_router();
    let is_active = {
        let route = route.clone();
        move || router.current_route().get() == route
    };

    view! {
        <button
            class=move || {
                if is_active() {
                    "btn btn-square btn-ghost bg-white/25 text-white"
                } else {
                    "btn btn-square btn-ghost text-white hover:bg-white/15"
                }
            }
            title=label
            aria-label=label
            on:click=move |_| router.navigate(route.clone())
        >
            {children()}
        </button>
    }
}

/// Shell for the protected pages: sidebar navigation plus content area.
#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let on_logout = move |_| {
        logout(&auth);
        router.navigate(AppRoute::default());
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <aside class="fixed left-5 top-5 bottom-5 w-16 rounded-box bg-primary text-primary-content p-2 flex flex-col items-center gap-3 shadow-xl z-50">
                <div class="w-10 h-10 rounded-xl bg-base-100 text-primary font-bold flex items-center justify-center">
                    "G"
                </div>
                <nav class="mt-2 flex flex-col gap-2">
                    <NavItem route=AppRoute::Dashboard label="Dashboard">
                        <Squares attr:class="h-6 w-6" />
                    </NavItem>
                    <NavItem route=AppRoute::Patients label="Pacientes">
                        <Users attr:class="h-6 w-6" />
                    </NavItem>
                </nav>
                <button
                    class="btn btn-square btn-ghost text-white mt-auto hover:bg-white/15"
                    title="Sair"
                    aria-label="Sair"
                    on:click=on_logout
                >
                    <LogOut attr:class="h-6 w-6" />
                </button>
            </aside>

            <main class="pl-24 md:pl-28 pr-5 py-5">
                <div class="mx-auto max-w-7xl space-y-5">{children()}</div>
            </main>
        </div>
    }
}
