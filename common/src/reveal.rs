use constcat::concat;
use tracing::{debug, trace};

use crate::{
    config::{RevealConfig, SkillConfig},
    schedule::Scheduler,
};

// marker classes
//
// an element opts into the scroll reveal by carrying any of these; the css decides what the
// animation actually looks like
pub const MARKER_CLASSES: [&str; 6] = [
    "scroll-animate",
    "scroll-animate-left",
    "scroll-animate-right",
    "scroll-animate-scale",
    "scroll-animate-fade",
    STAGGER_CLASS,
];

pub const MARKER_SELECTOR: &str = concat!(
    ".scroll-animate, .scroll-animate-left, .scroll-animate-right, ",
    ".scroll-animate-scale, .scroll-animate-fade, .",
    STAGGER_CLASS,
);

pub const FLOW_SELECTOR: &str = ".project-card, .timeline-content, .contact-item";

pub const ANIMATE_CLASS: &str = "animate";
pub const STAGGER_CLASS: &str = "scroll-animate-stagger";
pub const FLOWING_CLASS: &str = "flowing-element";
pub const FLOAT_CLASS: &str = "gentle-float";

// containers that get the floating emphasis once revealed
pub const FLOAT_CLASSES: [&str; 2] = ["stat-item", "skill-category"];

// an element the reveal observers act on
pub trait RevealTarget: Clone + 'static {
    fn has_class(&self, class: &str) -> bool;

    fn add_class(&self, class: &str);

    fn children(&self) -> Vec<Self>;

    // reset any css animation-delay the markup gave the element
    fn clear_animation_delay(&self);
}

// one observer callback entry, in callback order
#[derive(Clone, Debug)]
pub struct Intersection<T> {
    pub target: T,
    pub is_intersecting: bool,
    // fraction of the viewport the element has travelled into, only used by the flowing
    // observer
    pub progress: f64,
}

// how far into the viewport an element sits: 0 when its top is at the bottom edge (or
// below), 1 once its top reaches the top edge (or above)
pub fn scroll_progress(rect_top: f64, viewport_height: f64) -> f64 {
    if viewport_height <= 0.0 {
        return 1.0;
    }

    ((viewport_height - rect_top) / viewport_height).clamp(0.0, 1.0)
}

pub fn flow_delay_ms(progress: f64, max_delay_ms: u32) -> u32 {
    ((1.0 - progress) * f64::from(max_delay_ms)).max(0.0).round() as u32
}

pub struct ScrollReveal<S> {
    scheduler: S,
    config: RevealConfig,
}

impl<S> ScrollReveal<S>
where
    S: Scheduler + Clone + 'static,
{
    pub fn new(scheduler: S, config: RevealConfig) -> Self {
        ScrollReveal { scheduler, config }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    // main observer callback
    //
    // every intersecting entry is animated after a delay proportional to its position in the
    // batch.  the returned targets have been handed off and must no longer be observed, which
    // is what makes the reveal one-shot
    pub fn handle_entries<T: RevealTarget>(&self, entries: Vec<Intersection<T>>) -> Vec<T> {
        let mut done = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            if !entry.is_intersecting {
                continue;
            }

            let delay = index as u32 * self.config.stagger_ms;
            trace!(index, delay, "scheduling reveal");

            let target = entry.target.clone();
            let scheduler = self.scheduler.clone();
            let config = self.config.clone();
            self.scheduler.set_timeout(
                delay,
                Box::new(move || animate(&scheduler, &config, &target)),
            );

            done.push(entry.target);
        }

        done
    }

    // the "flowing" observer marks elements with a delay that shrinks the further they have
    // already scrolled into view
    pub fn handle_flowing<T: RevealTarget>(&self, entries: Vec<Intersection<T>>) -> Vec<T> {
        let mut done = Vec::new();

        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }

            let delay = flow_delay_ms(entry.progress, self.config.flow_max_delay_ms);

            let target = entry.target.clone();
            self.scheduler.set_timeout(
                delay,
                Box::new(move || target.add_class(FLOWING_CLASS)),
            );

            done.push(entry.target);
        }

        done
    }

    // fallback for browsers without IntersectionObserver
    pub fn reveal_all<T: RevealTarget>(&self, targets: &[T]) {
        debug!(count = targets.len(), "revealing everything at once");

        for target in targets {
            target.add_class(ANIMATE_CLASS);
        }
    }
}

fn animate<S, T>(scheduler: &S, config: &RevealConfig, target: &T)
where
    S: Scheduler,
    T: RevealTarget,
{
    if target.has_class(STAGGER_CLASS) {
        for (index, child) in target.children().into_iter().enumerate() {
            scheduler.set_timeout(
                index as u32 * config.child_stagger_ms,
                Box::new(move || child.add_class(ANIMATE_CLASS)),
            );
        }
    } else if target.has_class(FLOWING_CLASS) {
        target.clear_animation_delay();
        target.add_class(ANIMATE_CLASS);
    } else {
        target.add_class(ANIMATE_CLASS);
    }

    if FLOAT_CLASSES.iter().any(|class| target.has_class(class)) {
        let target = target.clone();
        scheduler.set_timeout(
            config.float_delay_ms,
            Box::new(move || target.add_class(FLOAT_CLASS)),
        );
    }
}

// skill bars
//
// a progress bar grows to its data-width once half of it is visible
pub trait SkillTarget: Clone + 'static {
    fn target_width(&self) -> Option<String>;

    fn set_width(&self, width: &str);
}

pub struct SkillBars<S> {
    scheduler: S,
    config: SkillConfig,
}

impl<S: Scheduler> SkillBars<S> {
    pub fn new(scheduler: S, config: SkillConfig) -> Self {
        SkillBars { scheduler, config }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    pub fn handle_entries<T: SkillTarget>(&self, entries: Vec<Intersection<T>>) -> Vec<T> {
        let mut done = Vec::new();

        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }

            if let Some(width) = entry.target.target_width() {
                let target = entry.target.clone();
                self.scheduler.set_timeout(
                    self.config.delay_ms,
                    Box::new(move || target.set_width(&width)),
                );
            }

            done.push(entry.target);
        }

        done
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::{BTreeSet, HashMap},
        rc::Rc,
    };

    use super::*;
    use crate::schedule::ManualScheduler;

    #[derive(Default)]
    struct Node {
        classes: BTreeSet<String>,
        // class -> how many times it was added
        added: HashMap<String, u32>,
        children: Vec<El>,
        delay_cleared: bool,
        width: Option<String>,
        data_width: Option<String>,
    }

    #[derive(Clone, Default)]
    struct El(Rc<RefCell<Node>>);

    impl El {
        fn with_classes(classes: &[&str]) -> Self {
            let el = El::default();
            for class in classes {
                el.0.borrow_mut().classes.insert((*class).to_owned());
            }
            el
        }

        fn has(&self, class: &str) -> bool {
            self.0.borrow().classes.contains(class)
        }

        fn times_added(&self, class: &str) -> u32 {
            self.0.borrow().added.get(class).copied().unwrap_or(0)
        }
    }

    impl RevealTarget for El {
        fn has_class(&self, class: &str) -> bool {
            self.has(class)
        }

        fn add_class(&self, class: &str) {
            let mut node = self.0.borrow_mut();
            if node.classes.insert(class.to_owned()) {
                *node.added.entry(class.to_owned()).or_default() += 1;
            }
        }

        fn children(&self) -> Vec<Self> {
            self.0.borrow().children.clone()
        }

        fn clear_animation_delay(&self) {
            self.0.borrow_mut().delay_cleared = true;
        }
    }

    impl SkillTarget for El {
        fn target_width(&self) -> Option<String> {
            self.0.borrow().data_width.clone()
        }

        fn set_width(&self, width: &str) {
            self.0.borrow_mut().width = Some(width.to_owned());
        }
    }

    fn hit(target: &El) -> Intersection<El> {
        Intersection {
            target: target.clone(),
            is_intersecting: true,
            progress: 0.0,
        }
    }

    fn miss(target: &El) -> Intersection<El> {
        Intersection {
            target: target.clone(),
            is_intersecting: false,
            progress: 0.0,
        }
    }

    // a tiny stand-in for the browser observer: keeps a watch list and forgets whatever the
    // callback hands back
    struct Observer {
        watched: Vec<El>,
    }

    impl Observer {
        fn fire(&mut self, reveal: &ScrollReveal<ManualScheduler>, visible: &[bool]) {
            let entries = self
                .watched
                .iter()
                .zip(visible)
                .map(|(el, &v)| if v { hit(el) } else { miss(el) })
                .collect();

            for done in reveal.handle_entries(entries) {
                self.watched.retain(|el| !Rc::ptr_eq(&el.0, &done.0));
            }
        }
    }

    #[test]
    fn element_is_revealed_exactly_once_after_crossing() {
        let scheduler = ManualScheduler::new();
        let reveal = ScrollReveal::new(scheduler.clone(), RevealConfig::default());
        let below = El::with_classes(&["scroll-animate"]);
        let mut observer = Observer {
            watched: vec![below.clone()],
        };

        observer.fire(&reveal, &[false]);
        scheduler.advance(1000);
        assert!(!below.has(ANIMATE_CLASS));

        observer.fire(&reveal, &[true]);
        scheduler.advance(0);
        assert!(below.has(ANIMATE_CLASS));
        assert!(observer.watched.is_empty());

        // scrolling back and forth no longer reaches it
        observer.fire(&reveal, &[]);
        scheduler.advance(1000);
        assert_eq!(below.times_added(ANIMATE_CLASS), 1);
    }

    #[test]
    fn batch_entries_are_staggered_by_index() {
        let scheduler = ManualScheduler::new();
        let reveal = ScrollReveal::new(scheduler.clone(), RevealConfig::default());
        let els: Vec<El> = (0..3).map(|_| El::with_classes(&["scroll-animate-left"])).collect();

        let done = reveal.handle_entries(els.iter().map(hit).collect());
        assert_eq!(done.len(), 3);

        scheduler.advance(0);
        assert!(els[0].has(ANIMATE_CLASS));
        assert!(!els[1].has(ANIMATE_CLASS));

        scheduler.advance(100);
        assert!(els[1].has(ANIMATE_CLASS));
        assert!(!els[2].has(ANIMATE_CLASS));

        scheduler.advance(100);
        assert!(els[2].has(ANIMATE_CLASS));
    }

    #[test]
    fn stagger_containers_animate_their_children() {
        let scheduler = ManualScheduler::new();
        let reveal = ScrollReveal::new(scheduler.clone(), RevealConfig::default());

        let children: Vec<El> = (0..3).map(|_| El::default()).collect();
        let container = El::with_classes(&[STAGGER_CLASS]);
        container.0.borrow_mut().children = children.clone();

        reveal.handle_entries(vec![hit(&container)]);

        scheduler.advance(150);
        assert!(children[0].has(ANIMATE_CLASS) && children[1].has(ANIMATE_CLASS));
        assert!(!children[2].has(ANIMATE_CLASS));

        scheduler.advance(150);
        assert!(children[2].has(ANIMATE_CLASS));
    }

    #[test]
    fn flowing_elements_reset_their_delay() {
        let scheduler = ManualScheduler::new();
        let reveal = ScrollReveal::new(scheduler.clone(), RevealConfig::default());
        let el = El::with_classes(&["scroll-animate", FLOWING_CLASS]);

        reveal.handle_entries(vec![hit(&el)]);
        scheduler.advance(0);

        assert!(el.0.borrow().delay_cleared);
        assert!(el.has(ANIMATE_CLASS));
    }

    #[test]
    fn stat_items_start_floating_later() {
        let scheduler = ManualScheduler::new();
        let reveal = ScrollReveal::new(scheduler.clone(), RevealConfig::default());
        let stat = El::with_classes(&["scroll-animate-scale", "stat-item"]);

        reveal.handle_entries(vec![hit(&stat)]);
        scheduler.advance(799);
        assert!(stat.has(ANIMATE_CLASS));
        assert!(!stat.has(FLOAT_CLASS));

        scheduler.advance(1);
        assert!(stat.has(FLOAT_CLASS));
    }

    #[test]
    fn flowing_delay_follows_scroll_progress() {
        assert_eq!(scroll_progress(800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(400.0, 800.0), 0.5);
        assert_eq!(scroll_progress(-20.0, 800.0), 1.0);
        assert_eq!(scroll_progress(1200.0, 800.0), 0.0);

        assert_eq!(flow_delay_ms(0.0, 300), 300);
        assert_eq!(flow_delay_ms(0.5, 300), 150);
        assert_eq!(flow_delay_ms(1.0, 300), 0);

        let scheduler = ManualScheduler::new();
        let reveal = ScrollReveal::new(scheduler.clone(), RevealConfig::default());
        let card = El::with_classes(&["project-card"]);

        let mut entry = hit(&card);
        entry.progress = 0.5;
        assert_eq!(reveal.handle_flowing(vec![entry]).len(), 1);

        scheduler.advance(149);
        assert!(!card.has(FLOWING_CLASS));
        scheduler.advance(1);
        assert!(card.has(FLOWING_CLASS));
    }

    #[test]
    fn fallback_reveals_everything() {
        let scheduler = ManualScheduler::new();
        let reveal = ScrollReveal::new(scheduler.clone(), RevealConfig::default());
        let els: Vec<El> = (0..4).map(|_| El::with_classes(&["scroll-animate-fade"])).collect();

        reveal.reveal_all(&els);

        assert!(els.iter().all(|el| el.has(ANIMATE_CLASS)));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn marker_selector_lists_every_marker() {
        for class in MARKER_CLASSES {
            assert!(MARKER_SELECTOR.contains(&format!(".{class}")));
        }
    }

    #[test]
    fn skill_bars_grow_after_delay() {
        let scheduler = ManualScheduler::new();
        let bars = SkillBars::new(scheduler.clone(), SkillConfig::default());

        let bar = El::default();
        bar.0.borrow_mut().data_width = Some("85%".into());
        let bare = El::default();

        let done = bars.handle_entries(vec![hit(&bar), hit(&bare), miss(&El::default())]);
        assert_eq!(done.len(), 2);

        scheduler.advance(199);
        assert_eq!(bar.0.borrow().width, None);

        scheduler.advance(1);
        assert_eq!(bar.0.borrow().width.as_deref(), Some("85%"));
        assert_eq!(bare.0.borrow().width, None);
    }
}
