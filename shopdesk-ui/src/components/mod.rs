//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod canvas;
pub mod kpi_card;
pub mod loading;
pub mod nav;
pub mod toast;

pub use canvas::CanvasPanel;
pub use kpi_card::{KpiTile, StatusBadge};
pub use loading::{CardSkeleton, EmptyState, Loading};
pub use nav::Nav;
pub use toast::Toast;

use shopdesk::Locale;

/// Pick the label for the active locale
pub fn tr(locale: Locale, zh: &'static str, en: &'static str) -> &'static str {
    match locale {
        Locale::ZhCn => zh,
        Locale::En => en,
    }
}
