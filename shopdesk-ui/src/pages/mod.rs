//! Pages
//!
//! Top-level page components for each route.

pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;

pub use analytics::Analytics;
pub use assistant::AssistantPage;
pub use auth::AuthPage;
pub use customers::Customers;
pub use dashboard::Dashboard;
pub use orders::Orders;
pub use products::Products;
pub use settings::Settings;

use chrono::Utc;
use leptos::*;
use shopdesk::draft::Editable;
use shopdesk::export::CsvTable;
use shopdesk::{Draft, DraftError, DraftStore, Gateway, Message};

use crate::api::download;
use crate::components::tr;
use crate::state::GlobalState;

/// Save the open draft; on success close it and hand the record to
/// `on_saved`, otherwise keep it open and explain why
pub(crate) fn save_draft<R, F>(state: GlobalState, draft: RwSignal<Option<Draft<R>>>, on_saved: F)
where
    R: Editable + 'static,
    Gateway: DraftStore<R>,
    F: Fn(R) + 'static,
{
    let Some(mut working) = draft.get_untracked() else {
        return;
    };
    let gateway = state.gateway.get_untracked();
    state.loading.set(true);

    spawn_local(async move {
        match working.save(&gateway).await {
            Ok(record) => {
                draft.set(None);
                state.show_success(tr(state.locale.get_untracked(), "保存成功", "Saved"));
                on_saved(record);
            }
            Err(DraftError::Validation(e)) => {
                state.show_error(&state.text(e.message()));
                draft.set(Some(working));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save record");
                state.show_error(&state.text(Message::SaveFailed));
                draft.set(Some(working));
            }
        }
        state.loading.set(false);
    });
}

/// Download one CSV table stamped with today's date
pub(crate) fn download_table(state: GlobalState, table: CsvTable) {
    let result = table
        .to_file(Utc::now().date_naive())
        .map_err(|e| e.to_string())
        .and_then(|file| download(&file.filename, &file.contents, shopdesk::CsvFile::MIME_TYPE));

    if let Err(e) = result {
        tracing::error!(error = %e, "CSV export failed");
        state.show_error(&state.text(Message::ExportFailed));
    }
}

/// Labeled text input bound to a draft field
#[component]
pub(crate) fn Field(
    #[prop(into)] label: Signal<&'static str>,
    #[prop(into)] value: Signal<String>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(into)] on_input: Callback<String>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-600 mb-1">{label}</span>
            <input
                type=input_type.unwrap_or("text")
                class="w-full rounded-lg px-3 py-2 border border-gray-300 focus:border-blue-500 focus:outline-none"
                prop:value=value
                on:input=move |ev| on_input.call(event_target_value(&ev))
            />
        </label>
    }
}

/// Modal frame with save and cancel buttons
#[component]
pub(crate) fn FormModal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] on_save: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
    children: Children,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    view! {
        <div class="fixed inset-0 z-40 bg-black/40 flex items-center justify-center">
            <div class="bg-white rounded-xl shadow-xl w-full max-w-lg p-6 space-y-4">
                <h2 class="text-xl font-semibold">{title}</h2>
                {children()}
                <div class="flex justify-end space-x-2 pt-2">
                    <button
                        class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-50"
                        on:click=move |_| on_cancel.call(())
                    >
                        {move || tr(locale.get(), "取消", "Cancel")}
                    </button>
                    <button
                        class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-blue-300 text-white"
                        disabled=move || state.loading.get()
                        on:click=move |_| on_save.call(())
                    >
                        {move || tr(locale.get(), "保存", "Save")}
                    </button>
                </div>
            </div>
        </div>
    }
}
