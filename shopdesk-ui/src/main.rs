//! Shopdesk Dashboard
//!
//! E-commerce admin console built with Leptos (WASM).
//!
//! # Features
//!
//! - Orders, products and customers with inline create/edit
//! - KPI dashboard and analytics with CSV export
//! - AI assistant with a Markdown canvas editor
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! All data access goes through the `shopdesk` core crate; this crate only
//! adds the browser bindings (history, local storage, downloads) and views.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
