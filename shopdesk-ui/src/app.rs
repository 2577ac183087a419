//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use shopdesk::RouteId;

use crate::api;
use crate::components::{CanvasPanel, Loading, Nav, Toast};
use crate::pages::{Analytics, AssistantPage, AuthPage, Customers, Dashboard, Orders, Products, Settings};
use crate::state::{provide_global_state, CanvasState, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let gateway = match api::connect() {
        Ok(gateway) => gateway,
        Err(e) => {
            web_sys::console::error_1(&format!("Backend unavailable: {}", e).into());
            return view! { <BackendError message=e.to_string() /> }.into_view();
        }
    };

    let state = provide_global_state(gateway);
    provide_context(CanvasState::new(state.locale.get_untracked()));

    spawn_local(state.init_session());

    // Back/forward buttons
    let _ = window_event_listener(ev::popstate, move |_| state.sync_from_history());

    view! {
        <div class="min-h-screen bg-gray-50 text-gray-900">
            {move || {
                if !state.ready.get() {
                    return view! { <Loading /> }.into_view();
                }
                match state.route.get() {
                    RouteId::Login => view! { <AuthPage register=false /> }.into_view(),
                    RouteId::Register => view! { <AuthPage register=true /> }.into_view(),
                    route => view! { <Shell route=route /> }.into_view(),
                }
            }}

            // Toast notifications
            <Toast />
        </div>
    }
    .into_view()
}

/// Sidebar layout around a signed-in page
#[component]
fn Shell(route: RouteId) -> impl IntoView {
    let canvas = use_context::<CanvasState>().expect("CanvasState not found");

    let page = match route {
        RouteId::Orders => view! { <Orders /> }.into_view(),
        RouteId::Products => view! { <Products /> }.into_view(),
        RouteId::Customers => view! { <Customers /> }.into_view(),
        RouteId::Analytics => view! { <Analytics /> }.into_view(),
        RouteId::Ai => view! { <AssistantPage /> }.into_view(),
        RouteId::Settings => view! { <Settings /> }.into_view(),
        _ => view! { <Dashboard /> }.into_view(),
    };

    view! {
        <div class="flex min-h-screen">
            <Nav current=route />

            <main class="flex-1 px-8 py-6 overflow-x-hidden">
                {page}
            </main>

            {move || canvas.open.get().then(|| view! { <CanvasPanel /> })}
        </div>
    }
}

/// Shown when no gateway could be built
#[component]
fn BackendError(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-screen text-center">
            <div class="text-6xl mb-4">"⚠️"</div>
            <h1 class="text-2xl font-bold mb-2">"Backend unavailable"</h1>
            <p class="text-gray-500">{message}</p>
        </div>
    }
}
