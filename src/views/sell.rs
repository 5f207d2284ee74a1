use dioxus::prelude::*;

use crate::market::{ProductDraft, PublishRequest, prepare_publish};

#[component]
pub fn Sell() -> Element {
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut price = use_signal(String::new);
    let mut image = use_signal(String::new);
    let mut status = use_signal(|| None::<Result<String, String>>);

    rsx! {
        div { class: "sell-page",
            h3 { "Sell a product" }

            input {
                r#type: "text",
                placeholder: "Product title...",
                value: "{title}",
                oninput: move |event| title.set(event.value()),
            }
            textarea {
                placeholder: "Product description",
                value: "{description}",
                oninput: move |event| description.set(event.value()),
            }
            input {
                r#type: "text",
                placeholder: "Product price in ETH...",
                value: "{price}",
                oninput: move |event| price.set(event.value()),
            }
            input {
                r#type: "text",
                placeholder: "Product image URL",
                value: "{image}",
                oninput: move |event| image.set(event.value()),
            }

            p { class: "sell-note", "Note: shipping costs are priced into the final price." }

            button {
                r#type: "button",
                onclick: move |_| async move {
                    let draft = ProductDraft {
                        title: title.read().clone(),
                        description: description.read().clone(),
                        price: price.read().clone(),
                        image: image.read().clone(),
                    };
                    // validation and unit conversion happen before anything
                    // leaves the browser; the first failing field wins
                    let request = match prepare_publish(&draft) {
                        Ok(request) => request,
                        Err(e) => {
                            status.set(Some(Err(e.to_string())));
                            return;
                        }
                    };
                    match publish_product(request).await {
                        Ok(hash) => {
                            status.set(Some(Ok(format!("Product published in transaction {hash}"))));
                        }
                        Err(e) => {
                            status.set(Some(Err(format!("Publishing failed: {e}"))));
                        }
                    }
                },
                "Publish product"
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

#[server]
async fn publish_product(request: PublishRequest) -> Result<String, ServerFnError> {
    let handle = crate::state::market()
        .await
        .ok_or_else(|| ServerFnError::new("marketplace contract is not configured"))?;
    handle
        .publish_product(&request)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}
