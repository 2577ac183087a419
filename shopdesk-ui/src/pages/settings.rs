//! Settings Page
//!
//! Profile, language and notification preferences stored per user, plus
//! the backend connection.

use leptos::*;
use shopdesk::views::{load_settings, save_settings};
use shopdesk::{AuthState, Locale, Message, RouteId, SettingsForm};

use crate::api;
use crate::components::{tr, Loading};
use crate::state::GlobalState;

use super::Field;

const TIMEZONES: [&str; 4] = ["Asia/Shanghai", "Asia/Tokyo", "Europe/London", "America/New_York"];

#[component]
pub fn Settings() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">{move || RouteId::Settings.label(locale.get())}</h1>
                <p class="text-gray-500 mt-1">
                    {move || match state.auth.get() {
                        AuthState::Authenticated { user, .. } => user.email.unwrap_or(user.id),
                        AuthState::Unauthenticated => String::new(),
                    }}
                </p>
            </div>

            <PreferenceSettings />
            <BackendSettings />
        </div>
    }
}

#[component]
fn PreferenceSettings() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let form = create_rw_signal(None::<SettingsForm>);
    let (saving, set_saving) = create_signal(false);

    create_effect(move |_| {
        let gateway = state.gateway.get();
        let Some(user_id) = state.user_id() else {
            return;
        };
        spawn_local(async move {
            match load_settings(&gateway, &user_id).await {
                Ok(loaded) => form.set(Some(loaded)),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load settings");
                    state.show_error(&state.text(Message::LoadFailed));
                    form.set(Some(SettingsForm::default()));
                }
            }
        });
    });

    let edit = move |write: fn(&mut SettingsForm, String)| {
        move |value: String| {
            form.update(|f| {
                if let Some(f) = f {
                    write(f, value)
                }
            })
        }
    };
    let text = move |read: fn(&SettingsForm) -> String| {
        move || form.with(|f| f.as_ref().map(read).unwrap_or_default())
    };

    let save = move |_| {
        let Some(current) = form.get_untracked() else {
            return;
        };
        let Some(user_id) = state.user_id() else {
            return;
        };
        set_saving.set(true);
        let gateway = state.gateway.get_untracked();

        spawn_local(async move {
            match save_settings(&gateway, &user_id, &current).await {
                Ok(saved) => {
                    if let Some(language) = Locale::parse(&saved.language) {
                        locale.set(language);
                    }
                    form.set(Some(saved));
                    state.show_success(tr(locale.get_untracked(), "设置已保存", "Settings saved"));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to save settings");
                    state.show_error(&state.text(Message::SaveFailed));
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <section class="bg-white rounded-xl border border-gray-200 p-6">
            <h2 class="text-xl font-semibold mb-4">{move || tr(locale.get(), "个人设置", "Preferences")}</h2>
            {move || if form.with(Option::is_none) {
                view! { <Loading /> }.into_view()
            } else {
                view! {
                    <div class="space-y-4">
                        <div class="grid grid-cols-2 gap-4">
                            <Field
                                label=move || tr(locale.get(), "姓名", "Full name")
                                value=text(|f| f.full_name.clone())
                                on_input=edit(|f, v| f.full_name = v)
                            />
                            <Field
                                label=move || tr(locale.get(), "电话", "Phone")
                                value=text(|f| f.phone.clone())
                                on_input=edit(|f, v| f.phone = v)
                            />
                        </div>
                        <div class="grid grid-cols-2 gap-4">
                            <label class="block">
                                <span class="block text-sm text-gray-600 mb-1">{move || tr(locale.get(), "语言", "Language")}</span>
                                <select
                                    class="w-full rounded-lg px-3 py-2 border border-gray-300"
                                    on:change=move |ev| edit(|f, v| f.language = v)(event_target_value(&ev))
                                >
                                    {[("zh-CN", "简体中文"), ("en", "English")].into_iter().map(|(tag, name)| view! {
                                        <option value=tag selected=move || form.with(|f| f.as_ref().map_or(false, |f| f.language == tag))>
                                            {name}
                                        </option>
                                    }).collect_view()}
                                </select>
                            </label>
                            <label class="block">
                                <span class="block text-sm text-gray-600 mb-1">{move || tr(locale.get(), "时区", "Timezone")}</span>
                                <select
                                    class="w-full rounded-lg px-3 py-2 border border-gray-300"
                                    on:change=move |ev| edit(|f, v| f.timezone = v)(event_target_value(&ev))
                                >
                                    {TIMEZONES.into_iter().map(|zone| view! {
                                        <option value=zone selected=move || form.with(|f| f.as_ref().map_or(false, |f| f.timezone == zone))>
                                            {zone}
                                        </option>
                                    }).collect_view()}
                                </select>
                            </label>
                        </div>

                        <div class="space-y-2 pt-2">
                            <Toggle
                                label=Signal::derive(move || tr(locale.get(), "邮件通知", "Email notifications"))
                                checked=Signal::derive(move || form.with(|f| f.as_ref().map_or(false, |f| f.email_notifications)))
                                on_toggle=move |on| form.update(|f| if let Some(f) = f { f.email_notifications = on })
                            />
                            <Toggle
                                label=Signal::derive(move || tr(locale.get(), "推送通知", "Push notifications"))
                                checked=Signal::derive(move || form.with(|f| f.as_ref().map_or(false, |f| f.push_notifications)))
                                on_toggle=move |on| form.update(|f| if let Some(f) = f { f.push_notifications = on })
                            />
                            <Toggle
                                label=Signal::derive(move || tr(locale.get(), "短信通知", "SMS notifications"))
                                checked=Signal::derive(move || form.with(|f| f.as_ref().map_or(false, |f| f.sms_notifications)))
                                on_toggle=move |on| form.update(|f| if let Some(f) = f { f.sms_notifications = on })
                            />
                        </div>

                        <div class="flex justify-end">
                            <button
                                class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-blue-300 text-white"
                                disabled=move || saving.get()
                                on:click=save
                            >
                                {move || if saving.get() {
                                    tr(locale.get(), "保存中...", "Saving...")
                                } else {
                                    tr(locale.get(), "保存设置", "Save settings")
                                }}
                            </button>
                        </div>
                    </div>
                }.into_view()
            }}
        </section>
    }
}

#[component]
fn Toggle(label: Signal<&'static str>, checked: Signal<bool>, #[prop(into)] on_toggle: Callback<bool>) -> impl IntoView {
    view! {
        <label class="flex items-center justify-between">
            <span>{label}</span>
            <input
                type="checkbox"
                prop:checked=checked
                on:change=move |ev| on_toggle.call(event_target_checked(&ev))
            />
        </label>
    }
}

/// Backend URL override, applied on the next page load
#[component]
fn BackendSettings() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let (backend_url, set_backend_url) = create_signal(api::get_backend_url());

    let save_url = move |_| {
        api::set_backend_url(&backend_url.get_untracked());
        set_backend_url.set(api::get_backend_url());
        state.show_success(tr(
            locale.get_untracked(),
            "后端地址已保存，刷新页面后生效",
            "Backend URL saved, reload to apply",
        ));
    };

    view! {
        <section class="bg-white rounded-xl border border-gray-200 p-6">
            <h2 class="text-xl font-semibold mb-4">{move || tr(locale.get(), "后端连接", "Backend connection")}</h2>
            <div class="flex space-x-2">
                <input
                    type="text"
                    class="flex-1 rounded-lg px-4 py-3 border border-gray-300 focus:border-blue-500 focus:outline-none"
                    prop:value=move || backend_url.get()
                    on:input=move |ev| set_backend_url.set(event_target_value(&ev))
                />
                <button class="px-4 py-3 rounded-lg bg-blue-600 hover:bg-blue-700 text-white" on:click=save_url>
                    {move || tr(locale.get(), "保存", "Save")}
                </button>
            </div>
            <p class="text-sm text-gray-500 mt-2">
                {move || tr(locale.get(), "留空以恢复默认地址", "Leave empty to restore the default")}
            </p>
        </section>
    }
}
