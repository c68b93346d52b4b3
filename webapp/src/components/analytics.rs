use anyhow::Result;
use chrono::Utc;
use js_sys::{Function, JSON, Reflect};
use tracing::{instrument, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use folio_common::analytics::{AnalyticsEvent, EventSink, track};

use crate::{
    app::AppContext,
    common::{JsResultExt, listen},
};

// window.gtag, if the page loaded it
pub struct GtagSink {
    gtag: Function,
}

impl GtagSink {
    pub fn detect(window: &Window) -> Option<Self> {
        let gtag = Reflect::get(window, &JsValue::from_str("gtag")).ok()?;

        Some(GtagSink {
            gtag: gtag.dyn_into::<Function>().ok()?,
        })
    }

    fn call(&self, event: &AnalyticsEvent) -> Result<()> {
        let json = serde_json::to_string(&event.data)?;
        let data = JSON::parse(&json).js_context("encode event data")?;

        self.gtag
            .call3(
                &JsValue::NULL,
                &JsValue::from_str("event"),
                &JsValue::from_str(&event.name),
                &data,
            )
            .js_context("gtag")?;

        Ok(())
    }
}

impl EventSink for GtagSink {
    fn send(&self, event: &AnalyticsEvent) {
        if let Err(err) = self.call(event) {
            warn!("failed to forward {} to gtag: {err}", event.name);
        }
    }
}

// the hook is looked up on every event, since analytics scripts usually load after us
pub fn track_event(window: &Window, event: &AnalyticsEvent) {
    track(GtagSink::detect(window).as_ref(), event);
}

#[instrument(skip_all)]
pub fn setup_analytics(ctx: &AppContext) -> Result<()> {
    let user_agent = ctx.window.navigator().user_agent().unwrap_or_default();
    track_event(&ctx.window, &AnalyticsEvent::page_loaded(Utc::now(), &user_agent));

    let window = ctx.window.clone();
    let document = ctx.document.clone();
    listen(&ctx.document, "visibilitychange", move |_| {
        if !document.hidden() {
            track_event(&window, &AnalyticsEvent::page_visible());
        }
    })
}
