use dioxus::prelude::*;

use crate::Route;
use crate::market::Product;

#[component]
pub fn Home() -> Element {
    let products = use_resource(|| async move { list_products().await });

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        div { class: "products-container",
            h2 { "Latest listings" }

            match &*products.read() {
                None => rsx! {
                    p { "Loading products..." }
                },
                Some(Ok(products)) => {
                    if products.is_empty() {
                        rsx! {
                            p { "Nothing for sale yet." }
                        }
                    } else {
                        rsx! {
                            div { class: "product-grid",
                                for product in products.iter() {
                                    ProductCard { key: "{product.id}", product: product.clone() }
                                }
                            }
                        }
                    }
                }
                Some(Err(e)) => rsx! {
                    p { class: "error-message", "Error loading products: {e}" }
                },
            }
        }
        div { class: "spacer" }
    }
}

#[component]
fn ProductCard(product: Product) -> Element {
    rsx! {
        div { class: "product-card",
            img { class: "product-thumb", src: "{product.image}", alt: "{product.title}" }
            div { class: "product-info",
                h3 { "{product.title}" }
                p { class: "product-price", "{product.price} ETH" }
                Link { to: Route::Product { id: product.id }, "View" }
            }
        }
    }
}

#[server]
async fn list_products() -> Result<Vec<Product>, ServerFnError> {
    let handle = crate::state::market()
        .await
        .ok_or_else(|| ServerFnError::new("marketplace contract is not configured"))?;
    handle
        .products()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}
