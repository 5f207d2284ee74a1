mod abi;
mod contract;
mod market;
mod state;
mod views;
mod wallet;

use dioxus::prelude::*;

use views::{Buy, Home, Navbar, Product, Sell};

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Home {},
    #[route("/product/:id")]
    Product { id: u64 },
    #[route("/sell")]
    Sell {},
    #[route("/buy")]
    Buy {},
}

#[cfg(feature = "server")]
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = String::from("http://127.0.0.1:8545"))]
    rpc_url: String,
    #[arg(long, default_value_t = String::from("0x5FbDB2315678afecb367f032d93F642f64180aa3"))]
    contract: String,
    #[arg(long, default_value_t = String::from("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))]
    account: String,
}

fn main() {
    #[cfg(feature = "server")]
    init_server();

    dioxus::launch(App);
}

#[cfg(feature = "server")]
fn init_server() {
    use clap::Parser;

    env_logger::init();

    let args = Args::parse();
    match chain_config(&args) {
        Ok(config) => {
            log::info!("marketplace contract {} via {}", config.contract, config.rpc_url);
            state::install_market(contract::Marketplace::new(config));
        }
        Err(e) => {
            log::error!("invalid chain configuration: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "server")]
fn chain_config(args: &Args) -> Result<contract::ChainConfig, alloy_primitives::hex::FromHexError> {
    Ok(contract::ChainConfig {
        rpc_url: args.rpc_url.clone(),
        contract: args.contract.parse()?,
        account: args.account.parse()?,
    })
}

#[component]
fn App() -> Element {
    // the product picked on a detail page, read by the buy page
    use_context_provider(|| Signal::new(None::<market::Product>));

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        Router::<Route> {}
    }
}
