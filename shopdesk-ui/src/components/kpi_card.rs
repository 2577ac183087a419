//! KPI Card Component
//!
//! One headline number on the dashboard.

use leptos::*;
use shopdesk::KpiCard;

fn kpi_icon(id: &str) -> &'static str {
    match id {
        "revenue" => "💰",
        "orders" => "🛒",
        "customers" => "👥",
        "conversion" => "📈",
        _ => "📊",
    }
}

#[component]
pub fn KpiTile(card: KpiCard) -> impl IntoView {
    let value = card.formatted();

    view! {
        <div class="bg-white rounded-xl p-5 border border-gray-200 shadow-sm">
            <div class="flex items-center justify-between">
                <span class="text-gray-500 text-sm">{card.title}</span>
                <span class="text-2xl">{kpi_icon(card.id)}</span>
            </div>
            <div class="text-3xl font-bold mt-3">{value}</div>
        </div>
    }
}

/// Colored pill for a record status
#[component]
pub fn StatusBadge(#[prop(into)] label: String, #[prop(into)] tone: String) -> impl IntoView {
    let class = match tone.as_str() {
        "completed" | "paid" | "active" | "shipped" => "bg-green-100 text-green-700",
        "pending" | "processing" | "new" => "bg-yellow-100 text-yellow-700",
        "cancelled" | "refunded" | "out_of_stock" | "inactive" => "bg-red-100 text-red-700",
        "vip" => "bg-purple-100 text-purple-700",
        _ => "bg-gray-100 text-gray-700",
    };

    view! {
        <span class=format!("px-2 py-1 rounded-full text-xs font-medium {}", class)>{label}</span>
    }
}
