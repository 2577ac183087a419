//! Analytics Page
//!
//! Daily metrics table and the "export all" CSV download.

use chrono::Utc;
use leptos::*;
use shopdesk::gateway::DailyMetrics;
use shopdesk::{export_all, Message, RouteId};

use crate::api::download;
use crate::components::{tr, EmptyState, Loading};
use crate::state::GlobalState;

/// Days shown in the metrics table
const ANALYTICS_DAYS: usize = 30;

#[component]
pub fn Analytics() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let (daily, set_daily) = create_signal(None::<Result<Vec<DailyMetrics>, String>>);
    let (exporting, set_exporting) = create_signal(false);

    create_effect(move |_| {
        let gateway = state.gateway.get();
        spawn_local(async move {
            let result = gateway.metrics().daily(ANALYTICS_DAYS).await.map_err(|e| {
                tracing::error!(error = %e, "Failed to load daily metrics");
                state.text(Message::LoadFailed)
            });
            set_daily.set(Some(result));
        });
    });

    let export = move |_| {
        set_exporting.set(true);
        let gateway = state.gateway.get_untracked();
        let locale = locale.get_untracked();

        spawn_local(async move {
            match export_all(&gateway, locale, Utc::now().date_naive()).await {
                Ok(files) => {
                    let failed = files
                        .iter()
                        .filter_map(|f| download(&f.filename, &f.contents, shopdesk::CsvFile::MIME_TYPE).err())
                        .count();
                    if failed == 0 {
                        state.show_success(&state.text(Message::ExportSucceeded { files: files.len() }));
                    } else {
                        state.show_error(&state.text(Message::ExportFailed));
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Analytics export failed");
                    state.show_error(&state.text(Message::ExportFailed));
                }
            }
            set_exporting.set(false);
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">{move || RouteId::Analytics.label(locale.get())}</h1>
                <button
                    class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-blue-300 text-white"
                    disabled=move || exporting.get()
                    on:click=export
                >
                    {move || if exporting.get() {
                        tr(locale.get(), "导出中...", "Exporting...")
                    } else {
                        tr(locale.get(), "导出全部数据", "Export all data")
                    }}
                </button>
            </div>

            <section class="bg-white rounded-xl border border-gray-200">
                {move || match daily.get() {
                    None => view! { <Loading /> }.into_view(),
                    Some(Err(message)) => view! { <EmptyState message=message /> }.into_view(),
                    Some(Ok(rows)) if rows.is_empty() => view! {
                        <EmptyState message=state.text(Message::NoMatches) />
                    }.into_view(),
                    Some(Ok(rows)) => {
                        let locale = locale.get();
                        view! {
                            <table class="w-full text-left">
                                <thead class="text-sm text-gray-500 border-b border-gray-200">
                                    <tr>
                                        <th class="px-4 py-3">{tr(locale, "日期", "Date")}</th>
                                        <th class="px-4 py-3">{tr(locale, "销售额", "Revenue")}</th>
                                        <th class="px-4 py-3">{tr(locale, "订单数", "Orders")}</th>
                                        <th class="px-4 py-3">{tr(locale, "活跃客户", "Active customers")}</th>
                                        <th class="px-4 py-3">{tr(locale, "转化率", "Conversion")}</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {rows.into_iter().map(|day| view! {
                                        <tr class="border-b border-gray-100 last:border-0">
                                            <td class="px-4 py-3">{day.date.format("%Y-%m-%d").to_string()}</td>
                                            <td class="px-4 py-3">{format!("¥{:.2}", day.total_revenue)}</td>
                                            <td class="px-4 py-3">{day.total_orders}</td>
                                            <td class="px-4 py-3">{day.active_customers}</td>
                                            <td class="px-4 py-3">{format!("{:.2}%", day.conversion_rate)}</td>
                                        </tr>
                                    }).collect_view()}
                                </tbody>
                            </table>
                        }.into_view()
                    }
                }}
            </section>
        </div>
    }
}
