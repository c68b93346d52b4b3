use tracing::Level;

mod app;
mod common;
mod components;

fn main() {
    dioxus_logger::init(Level::DEBUG).expect("failed to init logger");
    app::launch();
}
