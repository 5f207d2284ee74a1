use dioxus::prelude::*;

use crate::Route;
use crate::market;

#[component]
pub fn Product(id: u64) -> Element {
    let product = use_resource(move || async move { get_product(id).await });

    rsx! {
        div { class: "product-details",
            match &*product.read() {
                None => rsx! {
                    p { "Loading product..." }
                },
                Some(Ok(product)) => rsx! {
                    ProductDetails { product: product.clone() }
                },
                Some(Err(e)) => rsx! {
                    p { class: "error-message", "Error loading product: {e}" }
                },
            }
        }
    }
}

#[component]
fn ProductDetails(product: market::Product) -> Element {
    let nav = navigator();
    let mut selection = use_context::<Signal<Option<market::Product>>>();

    let lines: Vec<String> = market::description_lines(&product.description)
        .into_iter()
        .map(str::to_string)
        .collect();
    let chosen = product.clone();

    rsx! {
        img { class: "product-image", src: "{product.image}", alt: "{product.title}" }
        div { class: "product-data",
            h3 { class: "product-title", "{product.title}" }
            ul { class: "product-description",
                for line in lines {
                    li { "{line}" }
                }
            }
            div { class: "product-data-container",
                div { class: "product-price", "{product.price} ETH" }
                div { class: "product-quantity", "{product.quantity} units available" }
            }
            // the purchase itself happens on the page behind /buy
            button {
                class: "product-buy",
                r#type: "button",
                onclick: move |_| {
                    selection.set(Some(chosen.clone()));
                    nav.push(Route::Buy {});
                },
                "Buy"
            }
        }
    }
}

#[server]
async fn get_product(id: u64) -> Result<market::Product, ServerFnError> {
    let handle = crate::state::market()
        .await
        .ok_or_else(|| ServerFnError::new("marketplace contract is not configured"))?;
    handle
        .product(id)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}
