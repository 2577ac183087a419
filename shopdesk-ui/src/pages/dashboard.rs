//! Dashboard Page
//!
//! KPI cards, recent orders and the seven-day sales series.

use leptos::*;
use shopdesk::gateway::DailyMetrics;
use shopdesk::views::{kpi_cards, load_dashboard, DashboardData};
use shopdesk::{Message, RouteId};

use crate::components::{tr, CardSkeleton, EmptyState, KpiTile, StatusBadge};
use crate::state::GlobalState;

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let (data, set_data) = create_signal(None::<Result<DashboardData, String>>);

    // Fetch on mount and whenever the session changes
    create_effect(move |_| {
        let gateway = state.gateway.get();
        spawn_local(async move {
            let result = load_dashboard(&gateway).await.map_err(|e| {
                tracing::error!(error = %e, "Failed to load dashboard");
                state.text(Message::LoadFailed)
            });
            set_data.set(Some(result));
        });
    });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">{move || RouteId::Dashboard.label(locale.get())}</h1>
                <p class="text-gray-500 mt-1">
                    {move || tr(locale.get(), "今日店铺经营概况", "Today's store at a glance")}
                </p>
            </div>

            {move || match data.get() {
                None => view! {
                    <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                        <CardSkeleton /><CardSkeleton /><CardSkeleton /><CardSkeleton />
                    </div>
                }.into_view(),
                Some(Err(message)) => view! { <EmptyState message=message /> }.into_view(),
                Some(Ok(data)) => view! { <DashboardBody data=data /> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn DashboardBody(data: DashboardData) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale.get_untracked();

    let cards = kpi_cards(&data.kpis, locale)
        .into_iter()
        .map(|card| view! { <KpiTile card=card /> })
        .collect_view();

    let orders = data
        .recent_orders
        .into_iter()
        .map(|order| {
            view! {
                <tr class="border-b border-gray-100 last:border-0">
                    <td class="py-3 font-mono text-sm">{order.order_number}</td>
                    <td class="py-3">{order.customer_name}</td>
                    <td class="py-3">{format!("¥{:.2}", order.total_amount)}</td>
                    <td class="py-3">
                        <StatusBadge label=order.status.label(locale) tone=order.status.as_str().to_string() />
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <section class="grid grid-cols-2 md:grid-cols-4 gap-4">{cards}</section>

        <div class="grid md:grid-cols-2 gap-8">
            <section class="bg-white rounded-xl p-6 border border-gray-200">
                <h2 class="text-lg font-semibold mb-4">{tr(locale, "销售趋势", "Sales trend")}</h2>
                <SalesBars daily=data.daily />
            </section>

            <section class="bg-white rounded-xl p-6 border border-gray-200">
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-lg font-semibold">{tr(locale, "最近订单", "Recent orders")}</h2>
                    <button
                        class="text-sm text-blue-600 hover:underline"
                        on:click=move |_| state.navigate(RouteId::Orders)
                    >
                        {tr(locale, "查看全部", "View all")}
                    </button>
                </div>
                <table class="w-full text-left">
                    <tbody>{orders}</tbody>
                </table>
            </section>
        </div>
    }
}

/// Daily revenue as a simple bar chart
#[component]
fn SalesBars(daily: Vec<DailyMetrics>) -> impl IntoView {
    if daily.is_empty() {
        return view! { <div class="h-48 bg-gray-50 rounded" /> }.into_view();
    }

    let max = daily
        .iter()
        .map(|d| d.total_revenue)
        .fold(f64::MIN_POSITIVE, f64::max);

    view! {
        <div class="flex items-end space-x-2 h-48">
            {daily.into_iter().map(|day| {
                let height = (day.total_revenue / max * 90.0 + 10.0) as i32;
                view! {
                    <div class="flex-1 flex flex-col items-center justify-end h-full">
                        <div
                            class="w-full bg-blue-500 rounded-t opacity-80"
                            style=format!("height: {}%", height)
                            title=format!("¥{:.2}", day.total_revenue)
                        />
                        <span class="text-xs text-gray-400 mt-1">{day.date.format("%m-%d").to_string()}</span>
                    </div>
                }
            }).collect_view()}
        </div>
    }
    .into_view()
}
