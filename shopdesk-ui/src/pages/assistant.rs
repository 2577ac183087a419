//! AI Assistant Page
//!
//! Model picker, conversation log and prompt box. Prompts sent in canvas
//! mode come back as documents in the canvas panel.

use leptos::*;
use shopdesk::assistant::{suggestions, Turn, CANVAS_PREFIX};
use shopdesk::canvas::RevealOptions;
use shopdesk::gateway::ChatRole;
use shopdesk::{Assistant, AssistantReply, Model, RouteId};

use crate::components::tr;
use crate::state::{CanvasState, GlobalState};

#[component]
pub fn AssistantPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas = use_context::<CanvasState>().expect("CanvasState not found");
    let locale = state.locale;

    let assistant = store_value(Some(Assistant::new(locale.get_untracked())));
    let turns = create_rw_signal(
        assistant.with_value(|a| a.as_ref().map(|a| a.conversation().turns().to_vec()).unwrap_or_default()),
    );
    let model = create_rw_signal(Model::default());
    let (input, set_input) = create_signal(String::new());
    let (canvas_mode, set_canvas_mode) = create_signal(false);
    let (sending, set_sending) = create_signal(false);

    let send = move |text: String| {
        let prompt = if canvas_mode.get_untracked() && !text.starts_with(CANVAS_PREFIX) {
            format!("{}{}", CANVAS_PREFIX, text)
        } else {
            text
        };
        if prompt.trim().is_empty() || sending.get_untracked() {
            return;
        }
        // Taken out for the duration of the request; `sending` blocks re-entry
        let Some(mut current) = assistant.try_update_value(Option::take).flatten() else {
            return;
        };
        current.set_model(model.get_untracked());
        set_input.set(String::new());
        set_sending.set(true);

        let gateway = state.gateway.get_untracked();
        spawn_local(async move {
            let reply = current.send(&gateway, &prompt).await;
            turns.set(current.conversation().turns().to_vec());
            assistant.set_value(Some(current));
            set_sending.set(false);

            if let Some(AssistantReply::Document(document)) = reply {
                canvas.open_generated(&document, RevealOptions::default());
            }
        });
    };

    let reset = move |_| {
        assistant.update_value(|a| {
            if let Some(a) = a {
                a.reset();
            }
        });
        turns.set(assistant.with_value(|a| a.as_ref().map(|a| a.conversation().turns().to_vec()).unwrap_or_default()));
    };

    view! {
        <div class="flex flex-col h-[calc(100vh-3rem)] space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">{move || RouteId::Ai.label(locale.get())}</h1>
                <div class="flex items-center space-x-2">
                    <select
                        class="rounded-lg px-3 py-2 border border-gray-300"
                        on:change=move |ev| {
                            if let Some(m) = Model::parse(&event_target_value(&ev)) {
                                model.set(m);
                            }
                        }
                    >
                        {Model::ALL.into_iter().map(|m| view! {
                            <option value=m.display_name() selected=move || model.get() == m>
                                {m.display_name()}
                            </option>
                        }).collect_view()}
                    </select>
                    <button
                        class="px-3 py-2 rounded-lg border border-gray-300 hover:bg-gray-50"
                        on:click=move |_| canvas.open.set(true)
                    >
                        {move || tr(locale.get(), "打开画布", "Open canvas")}
                    </button>
                    <button class="px-3 py-2 rounded-lg border border-gray-300 hover:bg-gray-50" on:click=reset>
                        {move || tr(locale.get(), "新对话", "New chat")}
                    </button>
                </div>
            </div>
            <p class="text-sm text-gray-500">{move || model.get().description(locale.get())}</p>

            // Conversation
            <div class="flex-1 overflow-y-auto bg-white rounded-xl border border-gray-200 p-6 space-y-4">
                <For
                    each=move || turns.get()
                    key=|turn| turn.id.clone()
                    children=move |turn| view! { <TurnBubble turn=turn /> }
                />
                {move || sending.get().then(|| view! {
                    <div class="text-sm text-gray-400">{tr(locale.get(), "正在思考...", "Thinking...")}</div>
                })}
                {move || (turns.with(Vec::len) <= 1).then(|| view! {
                    <div class="flex flex-wrap gap-2 pt-2">
                        {suggestions(locale.get()).into_iter().map(|s| view! {
                            <button
                                class="px-3 py-1.5 rounded-full bg-gray-100 hover:bg-gray-200 text-sm"
                                on:click=move |_| send(s.to_string())
                            >
                                {s}
                            </button>
                        }).collect_view()}
                    </div>
                })}
            </div>

            // Prompt
            <form
                class="flex items-center space-x-2"
                on:submit=move |ev| {
                    ev.prevent_default();
                    send(input.get_untracked());
                }
            >
                <label class="flex items-center space-x-1 text-sm text-gray-600">
                    <input
                        type="checkbox"
                        prop:checked=move || canvas_mode.get()
                        on:change=move |ev| set_canvas_mode.set(event_target_checked(&ev))
                    />
                    <span>{move || tr(locale.get(), "画布模式", "Canvas")}</span>
                </label>
                <input
                    type="text"
                    class="flex-1 rounded-lg px-4 py-3 border border-gray-300 focus:border-blue-500 focus:outline-none"
                    placeholder=move || tr(locale.get(), "输入您的问题...", "Ask anything...")
                    prop:value=move || input.get()
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    disabled=move || sending.get()
                    class="px-5 py-3 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-blue-300 text-white"
                >
                    {move || tr(locale.get(), "发送", "Send")}
                </button>
            </form>
        </div>
    }
}

#[component]
fn TurnBubble(turn: Turn) -> impl IntoView {
    let (row, bubble) = match turn.role {
        ChatRole::User => ("flex justify-end", "bg-blue-600 text-white"),
        ChatRole::Assistant => ("flex justify-start", "bg-gray-100 text-gray-900"),
    };

    view! {
        <div class=row>
            <div class=format!("max-w-[75%] rounded-2xl px-4 py-3 whitespace-pre-wrap {}", bubble)>
                {turn.content}
                <div class="text-xs opacity-60 mt-1">
                    {turn.model.map(|m| format!("{} · ", m.display_name())).unwrap_or_default()}
                    {turn.timestamp.format("%H:%M").to_string()}
                </div>
            </div>
        </div>
    }
}
