use alloy_primitives::U256;
use dioxus::prelude::*;

use crate::Route;
use crate::market::Product;
use crate::wallet;

#[component]
pub fn Buy() -> Element {
    let selection = use_context::<Signal<Option<Product>>>();
    let mut quantity = use_signal(|| 1u64);
    let mut status = use_signal(|| None::<Result<String, String>>);

    let selected = selection.read().clone();
    let Some(product) = selected else {
        // reached by typing /buy directly, nothing was picked on a detail page
        return rsx! {
            div { class: "buy-page",
                p { "No product selected." }
                Link { to: Route::Home {}, "Back to the listings" }
            }
        };
    };

    let product_id = product.id;
    let available = product.quantity;
    let total = order_total(&product.price_wei, *quantity.read());

    rsx! {
        div { class: "buy-page",
            h3 { "Buy {product.title}" }
            img { class: "product-thumb", src: "{product.image}", alt: "{product.title}" }
            p { class: "product-price", "Unit price: {product.price} ETH" }
            p { class: "product-quantity", "{product.quantity} units available" }

            form {
                label { r#for: "buy-quantity", "Quantity:" }
                input {
                    r#type: "number",
                    id: "buy-quantity",
                    min: "1",
                    max: "{available}",
                    value: "{quantity}",
                    oninput: move |event| {
                        if let Ok(amount) = event.value().parse::<u64>() {
                            quantity.set(amount.clamp(1, available.max(1)));
                        }
                    },
                }
                p { class: "order-total", "Total: {total} ETH" }
                button {
                    r#type: "submit",
                    disabled: available == 0,
                    onclick: move |_| async move {
                        match buy_product(product_id, *quantity.read()).await {
                            Ok(hash) => {
                                status.set(Some(Ok(format!("Purchase sent in transaction {hash}"))));
                            }
                            Err(e) => {
                                status.set(Some(Err(format!("Purchase failed: {e}"))));
                            }
                        }
                    },
                    "Confirm purchase"
                }
            }

            if let Some(outcome) = &*status.read() {
                match outcome {
                    Ok(message) => rsx! {
                        p { class: "publish-ok", "{message}" }
                    },
                    Err(message) => rsx! {
                        p { class: "error-message", "{message}" }
                    },
                }
            }
        }
    }
}

/// Order total in display ETH. An unparseable stored price shows as a zero
/// total; the transaction value is recomputed on the server either way.
fn order_total(price_wei: &str, quantity: u64) -> String {
    let price = U256::from_str_radix(price_wei, 10).unwrap_or(U256::ZERO);
    wallet::from_wei(price.saturating_mul(U256::from(quantity)))
}

#[server]
async fn buy_product(id: u64, quantity: u64) -> Result<String, ServerFnError> {
    let handle = crate::state::market()
        .await
        .ok_or_else(|| ServerFnError::new("marketplace contract is not configured"))?;
    handle
        .buy_product(id, quantity)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}
