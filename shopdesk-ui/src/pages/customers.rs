//! Customers Page

use leptos::*;
use shopdesk::gateway::{Customer, CustomerStatus, NewCustomer};
use shopdesk::views::{load_customers, CustomerFilter, CustomerSummary, StatusTab};
use shopdesk::{Draft, Message, RouteId, ViewState};

use super::{save_draft, Field, FormModal};
use crate::api::confirm;
use crate::components::{tr, EmptyState, Loading, StatusBadge};
use crate::state::GlobalState;

#[component]
pub fn Customers() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let view_state = create_rw_signal(ViewState::<Customer>::Loading);
    let filter = create_rw_signal(CustomerFilter::default());
    let draft = create_rw_signal(None::<Draft<Customer>>);

    create_effect(move |_| {
        let gateway = state.gateway.get();
        spawn_local(async move {
            view_state.set(load_customers(&gateway, locale.get_untracked()).await);
        });
    });

    let summary = create_memo(move |_| view_state.with(|v| CustomerSummary::from_customers(v.rows())));

    let delete = move |customer: Customer| {
        if !confirm(tr(locale.get_untracked(), "确定要删除这个客户吗？", "Delete this customer?")) {
            return;
        }
        let gateway = state.gateway.get_untracked();
        spawn_local(async move {
            match gateway.customers().delete(&customer.id).await {
                Ok(()) => view_state.update(|v| {
                    v.remove_where(locale.get_untracked(), Message::NoCustomers, |c| c.id == customer.id)
                }),
                Err(e) => {
                    tracing::error!(error = %e, customer_id = %customer.id, "Failed to delete customer");
                    state.show_error(&state.text(Message::DeleteFailed));
                }
            }
        });
    };

    let on_saved = move |saved: Customer| {
        view_state.update(|v| match v {
            ViewState::Ready(rows) => match rows.iter_mut().find(|c| c.id == saved.id) {
                Some(row) => *row = saved,
                None => rows.insert(0, saved),
            },
            _ => *v = ViewState::Ready(vec![saved]),
        })
    };

    let tabs = std::iter::once(StatusTab::All)
        .chain(CustomerStatus::ALL.into_iter().map(StatusTab::Only))
        .collect::<Vec<_>>();

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">{move || RouteId::Customers.label(locale.get())}</h1>
                <button
                    class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white"
                    on:click=move |_| draft.set(Some(Draft::create()))
                >
                    {move || tr(locale.get(), "添加客户", "New customer")}
                </button>
            </div>

            // Summary cards
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <SummaryCard
                    label=move || tr(locale.get(), "客户总数", "Customers")
                    value=move || summary.with(|s| s.total.to_string())
                />
                <SummaryCard
                    label=move || tr(locale.get(), "活跃客户", "Active")
                    value=move || summary.with(|s| s.active.to_string())
                />
                <SummaryCard
                    label=move || tr(locale.get(), "VIP客户", "VIP")
                    value=move || summary.with(|s| s.vip.to_string())
                />
                <SummaryCard
                    label=move || tr(locale.get(), "累计消费", "Total spent")
                    value=move || summary.with(|s| s.total_spent_label(locale.get()))
                />
            </div>

            <div class="flex items-center justify-between">
                <div class="flex space-x-1">
                    {tabs.into_iter().map(|tab| {
                        let label_tab = tab.clone();
                        let active_tab = tab.clone();
                        view! {
                            <button
                                class=move || {
                                    if filter.with(|f| f.tab == active_tab) {
                                        "px-3 py-1.5 rounded-lg bg-blue-600 text-white text-sm"
                                    } else {
                                        "px-3 py-1.5 rounded-lg text-gray-600 hover:bg-gray-100 text-sm"
                                    }
                                }
                                on:click=move |_| filter.update(|f| f.tab = tab.clone())
                            >
                                {move || match &label_tab {
                                    StatusTab::All => tr(locale.get(), "全部", "All").to_string(),
                                    StatusTab::Only(status) => status.label(locale.get()),
                                }}
                            </button>
                        }
                    }).collect_view()}
                </div>
                <input
                    type="search"
                    class="w-64 rounded-lg px-3 py-2 border border-gray-300"
                    placeholder=move || tr(locale.get(), "搜索姓名或邮箱", "Search name or email")
                    prop:value=move || filter.with(|f| f.search.clone())
                    on:input=move |ev| filter.update(|f| f.search = event_target_value(&ev))
                />
            </div>

            <section class="bg-white rounded-xl border border-gray-200">
                {move || {
                    if view_state.with(ViewState::is_loading) {
                        return view! { <Loading /> }.into_view();
                    }
                    if let Some(message) = view_state.with(|v| v.message().map(str::to_string)) {
                        return view! { <EmptyState message=message /> }.into_view();
                    }
                    let rows: Vec<Customer> = view_state.with(|v| {
                        filter.with(|f| f.apply(v.rows()).into_iter().cloned().collect())
                    });
                    if rows.is_empty() {
                        return view! { <EmptyState message=state.text(Message::NoMatches) /> }.into_view();
                    }
                    let locale = locale.get();
                    view! {
                        <table class="w-full text-left">
                            <thead class="text-sm text-gray-500 border-b border-gray-200">
                                <tr>
                                    <th class="px-4 py-3">{tr(locale, "客户", "Customer")}</th>
                                    <th class="px-4 py-3">{tr(locale, "电话", "Phone")}</th>
                                    <th class="px-4 py-3">{tr(locale, "地区", "Location")}</th>
                                    <th class="px-4 py-3">{tr(locale, "订单数", "Orders")}</th>
                                    <th class="px-4 py-3">{tr(locale, "消费金额", "Spent")}</th>
                                    <th class="px-4 py-3">{tr(locale, "状态", "Status")}</th>
                                    <th class="px-4 py-3" />
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|customer| {
                                    let for_edit = customer.clone();
                                    let for_delete = customer.clone();
                                    view! {
                                        <tr class="border-b border-gray-100 last:border-0 hover:bg-gray-50">
                                            <td class="px-4 py-3">
                                                <div class="font-medium">{customer.name.clone()}</div>
                                                <div class="text-xs text-gray-500">{customer.email.clone()}</div>
                                            </td>
                                            <td class="px-4 py-3 text-sm">{customer.phone.clone()}</td>
                                            <td class="px-4 py-3 text-sm">{customer.location.clone()}</td>
                                            <td class="px-4 py-3">{customer.total_orders}</td>
                                            <td class="px-4 py-3">{format!("¥{:.2}", customer.total_spent)}</td>
                                            <td class="px-4 py-3">
                                                <StatusBadge label=customer.status.label(locale) tone=customer.status.as_str().to_string() />
                                            </td>
                                            <td class="px-4 py-3 text-right space-x-3 text-sm">
                                                <button class="text-blue-600" on:click=move |_| draft.set(Some(Draft::edit(&for_edit)))>
                                                    {tr(locale, "编辑", "Edit")}
                                                </button>
                                                <button class="text-red-600" on:click=move |_| delete(for_delete.clone())>
                                                    {tr(locale, "删除", "Delete")}
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view()
                }}
            </section>

            {move || draft.with(Option::is_some).then(|| view! {
                <CustomerForm draft=draft on_save=move |_| save_draft(state, draft, on_saved) />
            })}
        </div>
    }
}

#[component]
fn SummaryCard(#[prop(into)] label: Signal<&'static str>, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl p-5 border border-gray-200">
            <div class="text-sm text-gray-500">{label}</div>
            <div class="text-2xl font-bold mt-2">{value}</div>
        </div>
    }
}

#[component]
fn CustomerForm(draft: RwSignal<Option<Draft<Customer>>>, #[prop(into)] on_save: Callback<()>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let field = move |read: fn(&NewCustomer) -> String| {
        move || draft.with(|d| d.as_ref().map(|d| read(&d.current)).unwrap_or_default())
    };
    let edit = move |write: fn(&mut NewCustomer, String)| {
        move |value: String| {
            draft.update(|d| {
                if let Some(d) = d {
                    write(&mut d.current, value)
                }
            })
        }
    };

    let title = move || {
        let is_new = draft.with(|d| d.as_ref().map_or(true, Draft::is_new));
        let locale = locale.get();
        if is_new {
            tr(locale, "添加客户", "New customer").to_string()
        } else {
            tr(locale, "编辑客户", "Edit customer").to_string()
        }
    };

    view! {
        <FormModal title=Signal::derive(title) on_save=on_save on_cancel=move |_| draft.set(None)>
            <Field
                label=move || tr(locale.get(), "姓名", "Name")
                value=field(|c| c.name.clone())
                on_input=edit(|c, v| c.name = v)
            />
            <Field
                label=move || tr(locale.get(), "邮箱", "Email")
                value=field(|c| c.email.clone())
                input_type="email"
                on_input=edit(|c, v| c.email = v)
            />
            <div class="grid grid-cols-2 gap-4">
                <Field
                    label=move || tr(locale.get(), "电话", "Phone")
                    value=field(|c| c.phone.clone())
                    on_input=edit(|c, v| c.phone = v)
                />
                <Field
                    label=move || tr(locale.get(), "地区", "Location")
                    value=field(|c| c.location.clone())
                    on_input=edit(|c, v| c.location = v)
                />
            </div>
            <select
                class="w-full rounded-lg px-3 py-2 border border-gray-300"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    if let Some(status) = CustomerStatus::ALL.iter().find(|s| s.as_str() == value) {
                        draft.update(|d| if let Some(d) = d { d.current.status = status.clone() });
                    }
                }
            >
                {CustomerStatus::ALL.into_iter().map(|status| {
                    let value = status.as_str().to_string();
                    let selected = status.clone();
                    view! {
                        <option
                            value=value
                            selected=move || draft.with(|d| d.as_ref().map_or(false, |d| d.current.status == selected))
                        >
                            {move || status.label(locale.get())}
                        </option>
                    }
                }).collect_view()}
            </select>
        </FormModal>
    }
}
