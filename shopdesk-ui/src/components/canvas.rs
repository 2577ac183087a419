//! Canvas Panel Component
//!
//! Side panel editor for assistant documents: edit/split/preview modes,
//! formatting toolbar, local rewrites, undo/redo, scratch draft and export.

use leptos::*;
use shopdesk::canvas::{render, CanvasCommand, DocumentFormat, EditorMode, Format, RewriteAction};
use wasm_bindgen::JsCast;

use super::tr;
use crate::api::copy_to_clipboard;
use crate::state::canvas::utf16_to_char_offset;
use crate::state::{CanvasState, GlobalState};

const REWRITES: [RewriteAction; 3] = [
    RewriteAction::Improve,
    RewriteAction::Expand,
    RewriteAction::Simplify,
];

#[component]
pub fn CanvasPanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas = use_context::<CanvasState>().expect("CanvasState not found");
    let locale = state.locale;

    let title = move || canvas.document.with(|d| d.title().to_string());

    view! {
        <aside class="w-[48rem] shrink-0 bg-white border-l border-gray-200 flex flex-col h-screen sticky top-0">
            // Header
            <div class="flex items-center justify-between px-4 h-14 border-b border-gray-200">
                <input
                    type="text"
                    prop:value=title
                    on:change=move |ev| canvas.apply(CanvasCommand::SetTitle(event_target_value(&ev)))
                    class="flex-1 font-semibold bg-transparent focus:outline-none"
                />
                {move || canvas.revealing.get().then(|| view! {
                    <button
                        on:click=move |_| canvas.stop_reveal()
                        class="mr-3 text-sm text-gray-500 hover:text-gray-800"
                    >
                        {move || tr(locale.get(), "停止生成", "Stop")}
                    </button>
                })}
                <button on:click=move |_| canvas.close() class="text-gray-400 hover:text-gray-700 text-xl">
                    "×"
                </button>
            </div>

            <Toolbar />

            // Editor and preview
            <div class="flex-1 flex min-h-0">
                {move || {
                    let mode = canvas.mode.get();
                    view! {
                        {mode.shows_editor().then(|| view! { <Editor /> })}
                        {mode.shows_preview().then(|| view! { <Preview /> })}
                    }
                }}
            </div>

            // Status bar
            <div class="px-4 py-2 border-t border-gray-200 text-xs text-gray-500 flex space-x-4">
                {move || canvas.document.with(|d| match locale.get() {
                    shopdesk::Locale::ZhCn => format!("{} 字符 · {} 词", d.char_count(), d.word_count()),
                    shopdesk::Locale::En => format!("{} chars · {} words", d.char_count(), d.word_count()),
                })}
            </div>
        </aside>
    }
}

#[component]
fn Toolbar() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas = use_context::<CanvasState>().expect("CanvasState not found");
    let locale = state.locale;

    let copy = move |_| {
        let text = canvas.document.with_untracked(|d| d.content().to_string());
        spawn_local(async move {
            match copy_to_clipboard(&text).await {
                Ok(()) => state.show_success(tr(locale.get_untracked(), "已复制到剪贴板", "Copied to clipboard")),
                Err(e) => state.show_error(&e),
            }
        });
    };

    let save = move |_| match canvas.save_scratch() {
        Ok(message) => state.show_success(&state.text(message)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to save scratch draft");
            state.show_error(&state.text(shopdesk::Message::SaveFailed));
        }
    };

    let restore = move |_| match canvas.restore_scratch() {
        Ok(message) => state.show_success(&state.text(message)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to restore scratch draft");
            state.show_error(&state.text(shopdesk::Message::LoadFailed));
        }
    };

    let export = move |format: DocumentFormat| {
        if let Err(e) = canvas.export(format) {
            tracing::error!(error = %e, "Document export failed");
            state.show_error(&state.text(shopdesk::Message::ExportFailed));
        }
    };

    let button = "px-2 py-1 rounded hover:bg-gray-100 text-sm disabled:opacity-40";

    view! {
        <div class="flex flex-wrap items-center gap-1 px-4 py-2 border-b border-gray-200">
            // Mode switch
            <div class="flex rounded-lg bg-gray-100 p-0.5 mr-2">
                {EditorMode::ALL.into_iter().map(|mode| view! {
                    <button
                        on:click=move |_| canvas.mode.set(mode)
                        class=move || {
                            if canvas.mode.get() == mode {
                                "px-3 py-1 rounded-md bg-white shadow text-sm"
                            } else {
                                "px-3 py-1 rounded-md text-gray-500 text-sm"
                            }
                        }
                    >
                        {move || mode.label(locale.get())}
                    </button>
                }).collect_view()}
            </div>

            {Format::ALL.into_iter().map(|format| view! {
                <button
                    class=button
                    title=move || format.title(locale.get())
                    on:click=move |_| canvas.apply(CanvasCommand::Insert(format))
                >
                    {format_icon(format)}
                </button>
            }).collect_view()}

            <span class="mx-1 h-5 w-px bg-gray-200" />

            {REWRITES.into_iter().map(|action| view! {
                <button
                    class=button
                    disabled=move || canvas.document.with(|d| d.selection().is_none())
                    on:click=move |_| canvas.document.update(|d| {
                        d.rewrite_selection(action, locale.get_untracked());
                    })
                >
                    {move || action.label(locale.get())}
                </button>
            }).collect_view()}

            <span class="mx-1 h-5 w-px bg-gray-200" />

            <button
                class=button
                disabled=move || !canvas.document.with(|d| d.can_undo())
                on:click=move |_| canvas.apply(CanvasCommand::Undo)
            >
                "↶"
            </button>
            <button
                class=button
                disabled=move || !canvas.document.with(|d| d.can_redo())
                on:click=move |_| canvas.apply(CanvasCommand::Redo)
            >
                "↷"
            </button>

            <span class="flex-1" />

            <button class=button on:click=copy>{move || tr(locale.get(), "复制", "Copy")}</button>
            <button class=button on:click=save>{move || tr(locale.get(), "保存草稿", "Save draft")}</button>
            <button class=button on:click=restore>{move || tr(locale.get(), "恢复草稿", "Restore")}</button>
            <button class=button on:click=move |_| export(DocumentFormat::Md)>".md"</button>
            <button class=button on:click=move |_| export(DocumentFormat::Txt)>".txt"</button>
        </div>
    }
}

fn format_icon(format: Format) -> &'static str {
    match format {
        Format::Bold => "B",
        Format::Italic => "I",
        Format::Heading1 => "H1",
        Format::Heading2 => "H2",
        Format::BulletList => "•",
        Format::NumberedList => "1.",
        Format::Quote => "❝",
    }
}

#[component]
fn Editor() -> impl IntoView {
    let canvas = use_context::<CanvasState>().expect("CanvasState not found");

    let track_selection = move |target: Option<web_sys::EventTarget>| {
        let Some(area) = target
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            return;
        };
        let value = area.value();
        let start = area.selection_start().ok().flatten().unwrap_or(0);
        let end = area.selection_end().ok().flatten().unwrap_or(start);
        canvas.apply(CanvasCommand::Select {
            start: utf16_to_char_offset(&value, start),
            end: utf16_to_char_offset(&value, end),
        });
    };

    view! {
        <textarea
            class="flex-1 p-4 font-mono text-sm resize-none focus:outline-none border-r border-gray-100"
            prop:value=move || canvas.document.with(|d| d.content().to_string())
            readonly=move || canvas.revealing.get()
            on:input=move |ev| canvas.apply(CanvasCommand::Edit(event_target_value(&ev)))
            on:select=move |ev| track_selection(ev.target())
            on:mouseup=move |ev| track_selection(ev.target())
            on:keyup=move |ev| track_selection(ev.target())
        />
    }
}

#[component]
fn Preview() -> impl IntoView {
    let canvas = use_context::<CanvasState>().expect("CanvasState not found");

    view! {
        <div
            class="flex-1 p-6 overflow-y-auto prose max-w-none"
            inner_html=move || canvas.document.with(|d| render(d.content()))
        />
    }
}
