//! Sign-in and Registration Page

use leptos::*;
use shopdesk::gateway::SignUpOutcome;
use shopdesk::RouteId;

use crate::components::tr;
use crate::state::GlobalState;

/// Email/password form; `register` switches it to sign-up
#[component]
pub fn AuthPage(register: bool) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);
    let (notice, set_notice) = create_signal(None::<String>);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        if email.trim().is_empty() || password.is_empty() {
            return;
        }
        set_submitting.set(true);
        set_notice.set(None);

        spawn_local(async move {
            let locale = locale.get_untracked();
            if register {
                match state.sign_up(email, password).await {
                    Ok(SignUpOutcome::SignedIn(_)) => state.navigate(RouteId::Dashboard),
                    Ok(SignUpOutcome::ConfirmationRequired(_)) => set_notice.set(Some(
                        tr(locale, "注册成功，请查收确认邮件后登录。", "Check your inbox to confirm the account, then sign in.")
                            .to_string(),
                    )),
                    Err(e) => {
                        tracing::error!(error = %e, "Sign-up failed");
                        state.show_error(tr(locale, "注册失败，请重试", "Sign-up failed, please retry"));
                    }
                }
            } else if let Err(e) = state.sign_in(email, password).await {
                tracing::error!(error = %e, "Sign-in failed");
                state.show_error(tr(locale, "邮箱或密码错误", "Wrong email or password"));
            } else {
                state.navigate(RouteId::Dashboard);
            }
            set_submitting.set(false);
        });
    };

    let (route, other) = if register {
        (RouteId::Register, RouteId::Login)
    } else {
        (RouteId::Login, RouteId::Register)
    };

    let input_class = "w-full rounded-lg px-4 py-3 border border-gray-300 focus:border-blue-500 focus:outline-none";

    view! {
        <div class="min-h-screen flex items-center justify-center">
            <form on:submit=submit class="w-full max-w-sm bg-white rounded-xl shadow p-8 space-y-5">
                <div class="text-center">
                    <div class="text-4xl">"🛍️"</div>
                    <h1 class="text-2xl font-bold mt-2">{move || route.label(locale.get())}</h1>
                </div>

                <input
                    type="email"
                    class=input_class
                    placeholder=move || tr(locale.get(), "邮箱", "Email")
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    class=input_class
                    placeholder=move || tr(locale.get(), "密码", "Password")
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />

                {move || notice.get().map(|text| view! {
                    <p class="text-sm text-green-700 bg-green-50 rounded p-3">{text}</p>
                })}

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full py-3 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-blue-300 text-white font-medium"
                >
                    {move || route.label(locale.get())}
                </button>

                <p class="text-center text-sm text-gray-500">
                    <a
                        href="#"
                        class="text-blue-600 hover:underline"
                        on:click=move |ev| {
                            ev.prevent_default();
                            state.navigate(other);
                        }
                    >
                        {move || other.label(locale.get())}
                    </a>
                </p>
            </form>
        </div>
    }
}
