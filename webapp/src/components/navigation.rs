use std::{cell::Cell, rc::Rc};

use anyhow::Result;
use tracing::{debug, instrument, trace};
use wasm_bindgen::JsCast;
use web_sys::{Element, Node, ScrollBehavior, ScrollToOptions};

use folio_common::{
    nav::{
        ACTIVE_CLASS, MenuState, SCROLLED_CLASS, SectionSpan, active_section,
        anchor_scroll_target, is_scrolled, link_targets, parallax_offset, should_collapse_menu,
    },
    timing::{debounce, throttle},
};

use crate::{
    app::AppContext,
    common::{
        inner_width, listen, offset_height, offset_top, query, query_all, scroll_y, set_class,
        set_style,
    },
};

// the toggle button and the menu it opens always share the same "active" state
#[derive(Clone)]
struct MobileMenu {
    toggle: Element,
    menu: Element,
    state: Rc<Cell<MenuState>>,
}

impl MobileMenu {
    fn sync(&self) {
        let open = self.state.get().is_open();
        set_class(&self.toggle, ACTIVE_CLASS, open);
        set_class(&self.menu, ACTIVE_CLASS, open);
    }

    fn toggle(&self) {
        let mut state = self.state.get();
        state.toggle();
        self.state.set(state);
        self.sync();
    }

    fn close(&self) {
        let mut state = self.state.get();
        if state.close() {
            self.state.set(state);
            self.sync();
        }
    }

    fn outside_click(&self, target: Option<&Node>) {
        let mut state = self.state.get();
        let inside_menu = self.menu.contains(target);
        let inside_toggle = self.toggle.contains(target);

        if state.outside_click(inside_menu, inside_toggle) {
            self.state.set(state);
            self.sync();
        }
    }
}

fn mobile_menu(ctx: &AppContext) -> Option<MobileMenu> {
    Some(MobileMenu {
        toggle: ctx.document.get_element_by_id("nav-toggle")?,
        menu: ctx.document.get_element_by_id("nav-menu")?,
        state: Rc::new(Cell::new(MenuState::default())),
    })
}

// measured on every scroll since the layout may have reflowed in between
fn section_spans(ctx: &AppContext) -> Vec<SectionSpan> {
    query_all(&ctx.document, "section[id]")
        .into_iter()
        .map(|section| SectionSpan {
            id: section.id(),
            top: offset_top(&section),
            height: offset_height(&section),
        })
        .collect()
}

fn highlight_nav_link(ctx: &AppContext) {
    let links = query_all(&ctx.document, ".nav-link");
    if links.is_empty() {
        return;
    }

    let sections = section_spans(ctx);
    let Some(active) = active_section(&sections, scroll_y(&ctx.window), &ctx.config.nav) else {
        return;
    };
    trace!(section = active, "highlighting nav link");

    for link in &links {
        let matches = link_targets(link.get_attribute("href").as_deref(), active);
        set_class(link, ACTIVE_CLASS, matches);
    }
}

#[instrument(skip_all)]
pub fn setup_navigation(ctx: &AppContext) -> Result<()> {
    let menu = mobile_menu(ctx);

    if let Some(menu) = &menu {
        {
            let toggle = menu.toggle.clone();
            let menu = menu.clone();
            listen(&toggle, "click", move |_| menu.toggle())?;
        }
        {
            let menu = menu.clone();
            listen(&ctx.document, "click", move |event| {
                let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                menu.outside_click(target.as_ref());
            })?;
        }
        {
            let menu = menu.clone();
            let window = ctx.window.clone();
            let config = ctx.config.clone();
            let on_resize = debounce(
                ctx.scheduler.clone(),
                config.nav.resize_debounce_ms,
                move || {
                    if should_collapse_menu(inner_width(&window), &config.nav) {
                        menu.close();
                    }
                },
            );
            listen(&ctx.window, "resize", move |_| on_resize())?;
        }
    } else {
        debug!("no mobile menu on this page");
    }

    let navbar = query(&ctx.document, ".nav");

    {
        let ctx_scroll = ctx.clone();
        let navbar = navbar.clone();
        let on_scroll = throttle(
            ctx.scheduler.clone(),
            ctx.config.nav.scroll_throttle_ms,
            move || {
                let y = scroll_y(&ctx_scroll.window);
                if let Some(navbar) = &navbar {
                    set_class(navbar, SCROLLED_CLASS, is_scrolled(y, &ctx_scroll.config.nav));
                }
                highlight_nav_link(&ctx_scroll);
            },
        );
        listen(&ctx.window, "scroll", move |_| on_scroll())?;
    }

    highlight_nav_link(ctx);
    setup_smooth_scrolling(ctx, navbar, menu)?;
    setup_parallax(ctx)?;

    Ok(())
}

fn setup_smooth_scrolling(
    ctx: &AppContext,
    navbar: Option<Element>,
    menu: Option<MobileMenu>,
) -> Result<()> {
    for link in query_all(&ctx.document, "a[href^=\"#\"]") {
        let document = ctx.document.clone();
        let window = ctx.window.clone();
        let navbar = navbar.clone();
        let menu = menu.clone();
        let href = link.get_attribute("href").unwrap_or_default();

        listen(&link, "click", move |event| {
            event.prevent_default();

            let Some(target) = document.get_element_by_id(href.trim_start_matches('#')) else {
                return;
            };

            let top = anchor_scroll_target(offset_top(&target), navbar.as_ref().map(offset_height));

            let options = ScrollToOptions::new();
            options.set_top(top);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);

            if let Some(menu) = &menu {
                menu.close();
            }
        })?;
    }

    Ok(())
}

fn setup_parallax(ctx: &AppContext) -> Result<()> {
    let Some(hero) = query(&ctx.document, ".hero") else {
        return Ok(());
    };

    let window = ctx.window.clone();
    let config = ctx.config.clone();
    let on_scroll = throttle(
        ctx.scheduler.clone(),
        config.nav.scroll_throttle_ms,
        move || {
            let y = scroll_y(&window);
            if let Some(offset) = parallax_offset(y, offset_height(&hero), &config.nav) {
                set_style(&hero, "transform", &format!("translateY({offset}px)"));
            }
        },
    );

    listen(&ctx.window, "scroll", move |_| on_scroll())
}
