use crate::Route;
use dioxus::prelude::*;

#[component]
pub fn Navbar() -> Element {
    rsx! {
        div { id: "navbar",
            Link { to: Route::Home {}, "Home" }
            h1 { "Échoppe" }
            Link { to: Route::Sell {}, "Sell a product" }
        }
        Outlet::<Route> {}
    }
}
