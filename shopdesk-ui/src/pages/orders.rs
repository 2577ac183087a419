//! Orders Page
//!
//! Searchable order list with status tabs, inline create/edit, delete and
//! CSV export of the filtered rows.

use leptos::*;
use shopdesk::export::orders_page_table;
use shopdesk::gateway::{NewOrder, Order, OrderStatus, PaymentStatus};
use shopdesk::views::{load_orders, next_order_number, OrderFilter, StatusTab};
use shopdesk::{Draft, Message, RouteId, ViewState};

use super::{download_table, save_draft, Field, FormModal};
use crate::api::confirm;
use crate::components::{tr, EmptyState, Loading, StatusBadge};
use crate::state::GlobalState;

const PAYMENT_STATUSES: [PaymentStatus; 3] = [
    PaymentStatus::Pending,
    PaymentStatus::Paid,
    PaymentStatus::Refunded,
];

#[component]
pub fn Orders() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let view_state = create_rw_signal(ViewState::<Order>::Loading);
    let filter = create_rw_signal(OrderFilter::default());
    let draft = create_rw_signal(None::<Draft<Order>>);

    create_effect(move |_| {
        let gateway = state.gateway.get();
        spawn_local(async move {
            view_state.set(load_orders(&gateway, locale.get_untracked()).await);
        });
    });

    let filtered = move || {
        view_state.with(|v| {
            filter.with(|f| f.apply(v.rows()).into_iter().cloned().collect::<Vec<_>>())
        })
    };

    let delete = move |order: Order| {
        if !confirm(&state.text(Message::ConfirmDeleteOrder)) {
            return;
        }
        let gateway = state.gateway.get_untracked();
        spawn_local(async move {
            match gateway.orders().delete(&order.id).await {
                Ok(()) => view_state.update(|v| {
                    v.remove_where(locale.get_untracked(), Message::NoOrders, |o| o.id == order.id)
                }),
                Err(e) => {
                    tracing::error!(error = %e, order_id = %order.id, "Failed to delete order");
                    state.show_error(&state.text(Message::DeleteFailed));
                }
            }
        });
    };

    let on_saved = move |saved: Order| {
        view_state.update(|v| match v {
            ViewState::Ready(rows) => match rows.iter_mut().find(|o| o.id == saved.id) {
                Some(row) => *row = saved,
                None => rows.insert(0, saved),
            },
            _ => *v = ViewState::Ready(vec![saved]),
        })
    };

    let export = move |_| {
        let rows = filtered();
        download_table(state, orders_page_table(&rows, locale.get_untracked()));
    };

    let new_order = move |_| {
        draft.set(Some(Draft::create_with(NewOrder {
            order_number: next_order_number(),
            ..NewOrder::default()
        })))
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">{move || RouteId::Orders.label(locale.get())}</h1>
                <div class="space-x-2">
                    <button class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-50" on:click=export>
                        {move || tr(locale.get(), "导出", "Export")}
                    </button>
                    <button class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white" on:click=new_order>
                        {move || tr(locale.get(), "新建订单", "New order")}
                    </button>
                </div>
            </div>

            // Search and status tabs
            <div class="flex items-center justify-between">
                <div class="flex space-x-1">
                    <TabButton id="all" filter=filter />
                    {OrderStatus::ALL.into_iter().map(|status| view! {
                        <TabButton id=status.as_str().to_string() filter=filter />
                    }).collect_view()}
                </div>
                <input
                    type="search"
                    class="w-64 rounded-lg px-3 py-2 border border-gray-300"
                    placeholder=move || tr(locale.get(), "搜索订单号或客户", "Search number or customer")
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
                    let rows = filtered();
                    if rows.is_empty() {
                        return view! { <EmptyState message=state.text(Message::NoMatches) /> }.into_view();
                    }
                    let locale = locale.get();
                    view! {
                        <table class="w-full text-left">
                            <thead class="text-sm text-gray-500 border-b border-gray-200">
                                <tr>
                                    <th class="px-4 py-3">{tr(locale, "订单号", "Order")}</th>
                                    <th class="px-4 py-3">{tr(locale, "客户", "Customer")}</th>
                                    <th class="px-4 py-3">{tr(locale, "金额", "Amount")}</th>
                                    <th class="px-4 py-3">{tr(locale, "状态", "Status")}</th>
                                    <th class="px-4 py-3">{tr(locale, "支付", "Payment")}</th>
                                    <th class="px-4 py-3">{tr(locale, "创建时间", "Created")}</th>
                                    <th class="px-4 py-3" />
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|order| {
                                    let for_edit = order.clone();
                                    let for_delete = order.clone();
                                    view! {
                                        <tr class="border-b border-gray-100 last:border-0 hover:bg-gray-50">
                                            <td class="px-4 py-3 font-mono text-sm">{order.order_number.clone()}</td>
                                            <td class="px-4 py-3">
                                                <div>{order.customer_name.clone()}</div>
                                                <div class="text-xs text-gray-500">{order.customer_email.clone()}</div>
                                            </td>
                                            <td class="px-4 py-3">{format!("¥{:.2}", order.total_amount)}</td>
                                            <td class="px-4 py-3">
                                                <StatusBadge label=order.status.label(locale) tone=order.status.as_str().to_string() />
                                            </td>
                                            <td class="px-4 py-3">
                                                <StatusBadge label=order.payment_status.label(locale) tone=order.payment_status.as_str().to_string() />
                                            </td>
                                            <td class="px-4 py-3 text-sm text-gray-500">
                                                {order.created_at.format("%Y-%m-%d %H:%M").to_string()}
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
                <OrderForm draft=draft on_save=move |_| save_draft(state, draft, on_saved) />
            })}
        </div>
    }
}

#[component]
fn TabButton(#[prop(into)] id: String, filter: RwSignal<OrderFilter>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let status = (id != "all").then(|| OrderStatus::parse(&id));
    let tab = match status.clone() {
        Some(status) => StatusTab::Only(status),
        None => StatusTab::All,
    };
    let active = move || filter.with(|f| f.tab == tab);

    view! {
        <button
            class=move || {
                if active() {
                    "px-3 py-1.5 rounded-lg bg-blue-600 text-white text-sm"
                } else {
                    "px-3 py-1.5 rounded-lg text-gray-600 hover:bg-gray-100 text-sm"
                }
            }
            on:click=move |_| filter.update(|f| f.set_tab(&id))
        >
            {move || match &status {
                Some(status) => status.label(state.locale.get()),
                None => tr(state.locale.get(), "全部", "All").to_string(),
            }}
        </button>
    }
}

#[component]
fn OrderForm(draft: RwSignal<Option<Draft<Order>>>, #[prop(into)] on_save: Callback<()>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let field = move |read: fn(&NewOrder) -> String| {
        move || draft.with(|d| d.as_ref().map(|d| read(&d.current)).unwrap_or_default())
    };
    let edit = move |write: fn(&mut NewOrder, String)| {
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
        match (is_new, locale.get()) {
            (true, l) => tr(l, "新建订单", "New order").to_string(),
            (false, l) => tr(l, "编辑订单", "Edit order").to_string(),
        }
    };

    view! {
        <FormModal title=Signal::derive(title) on_save=on_save on_cancel=move |_| draft.set(None)>
            <div class="text-sm text-gray-500 font-mono">{field(|o| o.order_number.clone())}</div>
            <Field
                label=move || tr(locale.get(), "客户姓名", "Customer name")
                value=field(|o| o.customer_name.clone())
                on_input=edit(|o, v| o.customer_name = v)
            />
            <Field
                label=move || tr(locale.get(), "客户邮箱", "Customer email")
                value=field(|o| o.customer_email.clone())
                input_type="email"
                on_input=edit(|o, v| o.customer_email = v)
            />
            <div class="grid grid-cols-2 gap-4">
                <Field
                    label=move || tr(locale.get(), "金额", "Amount")
                    value=field(|o| o.total_amount.to_string())
                    input_type="number"
                    on_input=edit(|o, v| o.total_amount = v.parse().unwrap_or(0.0))
                />
                <Field
                    label=move || tr(locale.get(), "商品数", "Items")
                    value=field(|o| o.items_count.to_string())
                    input_type="number"
                    on_input=edit(|o, v| o.items_count = v.parse().unwrap_or(0))
                />
            </div>
            <div class="grid grid-cols-2 gap-4">
                <select
                    class="rounded-lg px-3 py-2 border border-gray-300"
                    on:change=move |ev| {
                        let status = OrderStatus::parse(&event_target_value(&ev));
                        draft.update(|d| if let Some(d) = d { d.current.status = status });
                    }
                >
                    {OrderStatus::ALL.into_iter().map(|status| {
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
                <select
                    class="rounded-lg px-3 py-2 border border-gray-300"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        if let Some(status) = PAYMENT_STATUSES.iter().find(|s| s.as_str() == value) {
                            draft.update(|d| if let Some(d) = d { d.current.payment_status = status.clone() });
                        }
                    }
                >
                    {PAYMENT_STATUSES.into_iter().map(|status| {
                        let value = status.as_str().to_string();
                        let selected = status.clone();
                        view! {
                            <option
                                value=value
                                selected=move || draft.with(|d| d.as_ref().map_or(false, |d| d.current.payment_status == selected))
                            >
                                {move || status.label(locale.get())}
                            </option>
                        }
                    }).collect_view()}
                </select>
            </div>
        </FormModal>
    }
}
