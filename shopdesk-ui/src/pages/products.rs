//! Products Page

use leptos::*;
use shopdesk::gateway::{NewProduct, Product, ProductStatus};
use shopdesk::views::{categories, load_products, ProductFilter, ALL_CATEGORIES};
use shopdesk::{Draft, Message, RouteId, ViewState};

use super::{save_draft, Field, FormModal};
use crate::api::confirm;
use crate::components::{tr, EmptyState, Loading, StatusBadge};
use crate::state::GlobalState;

const PRODUCT_STATUSES: [ProductStatus; 3] = [
    ProductStatus::Active,
    ProductStatus::Inactive,
    ProductStatus::OutOfStock,
];

#[component]
pub fn Products() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let view_state = create_rw_signal(ViewState::<Product>::Loading);
    let filter = create_rw_signal(ProductFilter::default());
    let draft = create_rw_signal(None::<Draft<Product>>);

    create_effect(move |_| {
        let gateway = state.gateway.get();
        spawn_local(async move {
            view_state.set(load_products(&gateway, locale.get_untracked()).await);
        });
    });

    let delete = move |product: Product| {
        if !confirm(tr(locale.get_untracked(), "确定要删除这个产品吗？", "Delete this product?")) {
            return;
        }
        let gateway = state.gateway.get_untracked();
        spawn_local(async move {
            match gateway.products().delete(&product.id).await {
                Ok(()) => view_state.update(|v| {
                    v.remove_where(locale.get_untracked(), Message::NoProducts, |p| p.id == product.id)
                }),
                Err(e) => {
                    tracing::error!(error = %e, product_id = %product.id, "Failed to delete product");
                    state.show_error(&state.text(Message::DeleteFailed));
                }
            }
        });
    };

    let on_saved = move |saved: Product| {
        view_state.update(|v| match v {
            ViewState::Ready(rows) => match rows.iter_mut().find(|p| p.id == saved.id) {
                Some(row) => *row = saved,
                None => rows.insert(0, saved),
            },
            _ => *v = ViewState::Ready(vec![saved]),
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">{move || RouteId::Products.label(locale.get())}</h1>
                <button
                    class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white"
                    on:click=move |_| draft.set(Some(Draft::create()))
                >
                    {move || tr(locale.get(), "添加产品", "New product")}
                </button>
            </div>

            <div class="flex items-center space-x-3">
                <input
                    type="search"
                    class="w-64 rounded-lg px-3 py-2 border border-gray-300"
                    placeholder=move || tr(locale.get(), "搜索产品", "Search products")
                    prop:value=move || filter.with(|f| f.search.clone())
                    on:input=move |ev| filter.update(|f| f.search = event_target_value(&ev))
                />
                <select
                    class="rounded-lg px-3 py-2 border border-gray-300"
                    on:change=move |ev| filter.update(|f| f.category = event_target_value(&ev))
                >
                    {move || {
                        let locale = locale.get();
                        view_state.with(|v| categories(v.rows())).into_iter().map(|category| {
                            let label = if category == ALL_CATEGORIES {
                                tr(locale, "全部分类", "All categories").to_string()
                            } else {
                                category.clone()
                            };
                            let selected = filter.with_untracked(|f| f.category == category);
                            view! { <option value=category selected=selected>{label}</option> }
                        }).collect_view()
                    }}
                </select>
            </div>

            {move || {
                if view_state.with(ViewState::is_loading) {
                    return view! { <Loading /> }.into_view();
                }
                if let Some(message) = view_state.with(|v| v.message().map(str::to_string)) {
                    return view! { <EmptyState message=message /> }.into_view();
                }
                let rows: Vec<Product> = view_state.with(|v| {
                    filter.with(|f| f.apply(v.rows()).into_iter().cloned().collect())
                });
                if rows.is_empty() {
                    return view! { <EmptyState message=state.text(Message::NoMatches) /> }.into_view();
                }
                let locale = locale.get();
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        {rows.into_iter().map(|product| {
                            let for_edit = product.clone();
                            let for_delete = product.clone();
                            view! {
                                <div class="bg-white rounded-xl border border-gray-200 p-5 space-y-2">
                                    <div class="flex items-start justify-between">
                                        <h3 class="font-semibold">{product.name.clone()}</h3>
                                        <StatusBadge label=product.status.label(locale) tone=product.status.as_str().to_string() />
                                    </div>
                                    <p class="text-sm text-gray-500 line-clamp-2">{product.description.clone()}</p>
                                    <div class="flex items-center justify-between text-sm">
                                        <span class="text-lg font-bold">{format!("¥{:.2}", product.price)}</span>
                                        <span class="text-gray-500">
                                            {format!("{} {}", tr(locale, "库存", "Stock"), product.stock)}
                                        </span>
                                    </div>
                                    <div class="flex justify-between text-sm pt-2">
                                        <span class="text-gray-400">{product.category.clone()}</span>
                                        <span class="space-x-3">
                                            <button class="text-blue-600" on:click=move |_| draft.set(Some(Draft::edit(&for_edit)))>
                                                {tr(locale, "编辑", "Edit")}
                                            </button>
                                            <button class="text-red-600" on:click=move |_| delete(for_delete.clone())>
                                                {tr(locale, "删除", "Delete")}
                                            </button>
                                        </span>
                                    </div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}

            {move || draft.with(Option::is_some).then(|| view! {
                <ProductForm draft=draft on_save=move |_| save_draft(state, draft, on_saved) />
            })}
        </div>
    }
}

#[component]
fn ProductForm(draft: RwSignal<Option<Draft<Product>>>, #[prop(into)] on_save: Callback<()>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let locale = state.locale;

    let field = move |read: fn(&NewProduct) -> String| {
        move || draft.with(|d| d.as_ref().map(|d| read(&d.current)).unwrap_or_default())
    };
    let edit = move |write: fn(&mut NewProduct, String)| {
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
            tr(locale, "添加产品", "New product").to_string()
        } else {
            tr(locale, "编辑产品", "Edit product").to_string()
        }
    };

    view! {
        <FormModal title=Signal::derive(title) on_save=on_save on_cancel=move |_| draft.set(None)>
            <Field
                label=move || tr(locale.get(), "产品名称", "Name")
                value=field(|p| p.name.clone())
                on_input=edit(|p, v| p.name = v)
            />
            <Field
                label=move || tr(locale.get(), "描述", "Description")
                value=field(|p| p.description.clone())
                on_input=edit(|p, v| p.description = v)
            />
            <div class="grid grid-cols-3 gap-4">
                <Field
                    label=move || tr(locale.get(), "价格", "Price")
                    value=field(|p| p.price.to_string())
                    input_type="number"
                    on_input=edit(|p, v| p.price = v.parse().unwrap_or(0.0))
                />
                <Field
                    label=move || tr(locale.get(), "库存", "Stock")
                    value=field(|p| p.stock.to_string())
                    input_type="number"
                    on_input=edit(|p, v| p.stock = v.parse().unwrap_or(0))
                />
                <Field
                    label=move || tr(locale.get(), "分类", "Category")
                    value=field(|p| p.category.clone())
                    on_input=edit(|p, v| p.category = v)
                />
            </div>
            <select
                class="w-full rounded-lg px-3 py-2 border border-gray-300"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    if let Some(status) = PRODUCT_STATUSES.iter().find(|s| s.as_str() == value) {
                        draft.update(|d| if let Some(d) = d { d.current.status = status.clone() });
                    }
                }
            >
                {PRODUCT_STATUSES.into_iter().map(|status| {
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
