//! Navigation Component
//!
//! Sidebar with the brand, one link per page and the sign-out button.

use leptos::*;
use shopdesk::router::path_for;
use shopdesk::RouteId;

use crate::state::GlobalState;

/// Sidebar navigation
#[component]
pub fn Nav(current: RouteId) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let sign_out = move |_| spawn_local(state.sign_out());

    view! {
        <nav class="w-60 shrink-0 bg-white border-r border-gray-200 flex flex-col">
            // Logo and brand
            <div class="h-16 flex items-center px-6 space-x-3 border-b border-gray-200">
                <span class="text-2xl">"🛍️"</span>
                <span class="text-xl font-bold">"Shopdesk"</span>
            </div>

            <div class="flex-1 px-3 py-4 space-y-1">
                {RouteId::NAV
                    .into_iter()
                    .map(|route| view! { <NavLink route=route active={route == current} /> })
                    .collect_view()}
            </div>

            <div class="px-6 py-4 border-t border-gray-200 text-sm">
                <div class="text-gray-500 truncate">
                    {move || match state.auth.get() {
                        shopdesk::AuthState::Authenticated { user, .. } => {
                            user.email.unwrap_or(user.id)
                        }
                        shopdesk::AuthState::Unauthenticated => String::new(),
                    }}
                </div>
                <button on:click=sign_out class="mt-2 text-red-600 hover:text-red-700">
                    {move || match state.locale.get() {
                        shopdesk::Locale::ZhCn => "退出登录",
                        shopdesk::Locale::En => "Sign out",
                    }}
                </button>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(route: RouteId, active: bool) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let class = if active {
        "block px-4 py-2 rounded-lg bg-blue-50 text-blue-700 font-medium"
    } else {
        "block px-4 py-2 rounded-lg text-gray-600 hover:bg-gray-100 hover:text-gray-900 transition-colors"
    };

    view! {
        <a
            href=path_for(route)
            class=class
            on:click=move |ev| {
                ev.prevent_default();
                state.navigate(route);
            }
        >
            {move || route.label(state.locale.get())}
        </a>
    }
}
