pub mod storage;
pub mod timer;

use chrono::Local;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

use folio_common::{
    analytics::long_date,
    filter::{CardSurface, FilterButton},
    reveal::{RevealTarget, SkillTarget},
};

// today's date for the "last updated" line
pub fn local_date() -> String {
    long_date(Local::now().date_naive())
}

// JsValue errors carry no useful type information, so they are flattened into their debug
// representation at the boundary
pub trait JsResultExt<T> {
    fn js_context(self, what: &str) -> anyhow::Result<T>;
}

impl<T> JsResultExt<T> for Result<T, JsValue> {
    fn js_context(self, what: &str) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::Error::msg(format!("{what}: {err:?}")))
    }
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_within(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, enabled: bool) {
    let classes = element.class_list();
    let _ = if enabled {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}

pub fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let _ = element.style().set_property(property, value);
    }
}

pub fn clear_style(element: &Element, property: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let _ = element.style().remove_property(property);
    }
}

pub fn offset_top(element: &Element) -> f64 {
    element
        .dyn_ref::<HtmlElement>()
        .map(|el| f64::from(el.offset_top()))
        .unwrap_or(0.0)
}

pub fn offset_height(element: &Element) -> f64 {
    element
        .dyn_ref::<HtmlElement>()
        .map(|el| f64::from(el.offset_height()))
        .unwrap_or(0.0)
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

pub fn inner_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn inner_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

// attach a listener for the lifetime of the page
//
// nothing on these pages is ever torn down, so the closure is handed over to the js side
pub fn listen<T, F>(target: &T, event: &str, handler: F) -> anyhow::Result<()>
where
    T: AsRef<EventTarget>,
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);

    target
        .as_ref()
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .js_context(event)?;

    closure.forget();
    Ok(())
}

// a resolved element, wrapped so that it can stand in for the page traits
#[derive(Clone, Debug, PartialEq)]
pub struct DomNode(pub Element);

impl DomNode {
    pub fn element(&self) -> &Element {
        &self.0
    }
}

impl From<Element> for DomNode {
    fn from(element: Element) -> Self {
        DomNode(element)
    }
}

impl RevealTarget for DomNode {
    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        set_class(&self.0, class, true);
    }

    fn children(&self) -> Vec<Self> {
        let children = self.0.children();

        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(DomNode)
            .collect()
    }

    fn clear_animation_delay(&self) {
        set_style(&self.0, "animation-delay", "0s");
    }
}

impl SkillTarget for DomNode {
    fn target_width(&self) -> Option<String> {
        self.0.get_attribute("data-width")
    }

    fn set_width(&self, width: &str) {
        set_style(&self.0, "width", width);
    }
}

impl CardSurface for DomNode {
    fn category(&self) -> Option<String> {
        self.0.get_attribute("data-category")
    }

    fn set_displayed(&self, displayed: bool) {
        set_style(&self.0, "display", if displayed { "block" } else { "none" });
    }

    fn set_faded_in(&self, faded_in: bool) {
        let (opacity, transform) = if faded_in {
            ("1", "translateY(0)")
        } else {
            ("0", "translateY(30px)")
        };

        set_style(&self.0, "opacity", opacity);
        set_style(&self.0, "transform", transform);
    }
}

impl FilterButton for DomNode {
    fn filter_key(&self) -> Option<String> {
        self.0.get_attribute("data-filter")
    }

    fn set_active(&self, active: bool) {
        set_class(&self.0, "active", active);
    }
}
