use std::{cell::RefCell, fmt, rc::Rc};

use tracing::debug;

use crate::{config::FilterConfig, schedule::Scheduler};

pub const FILTER_ALL: &str = "all";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FilterKey {
    All,
    Category(String),
}

impl FilterKey {
    pub fn matches(&self, category: Option<&str>) -> bool {
        match self {
            FilterKey::All => true,
            FilterKey::Category(key) => category == Some(key.as_str()),
        }
    }
}

impl From<&str> for FilterKey {
    fn from(key: &str) -> FilterKey {
        match key {
            FILTER_ALL => FilterKey::All,
            other => FilterKey::Category(other.to_owned()),
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKey::All => f.write_str(FILTER_ALL),
            FilterKey::Category(key) => f.write_str(key),
        }
    }
}

// a project card as the filter sees it
pub trait CardSurface {
    fn category(&self) -> Option<String>;

    // take part in layout or not (display: block / none)
    fn set_displayed(&self, displayed: bool);

    // the opacity/translate pair that makes up the fade
    fn set_faded_in(&self, faded_in: bool);
}

pub trait FilterButton {
    fn filter_key(&self) -> Option<String>;

    fn set_active(&self, active: bool);
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CardTransition {
    Show { delay_ms: u32 },
    Hide { after_ms: u32 },
}

// what happens to every card under `key`, in card order
pub fn plan<'a, I>(key: &FilterKey, categories: I, config: &FilterConfig) -> Vec<CardTransition>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    categories
        .into_iter()
        .enumerate()
        .map(|(index, category)| {
            if key.matches(category) {
                CardTransition::Show {
                    delay_ms: index as u32 * config.stagger_ms,
                }
            } else {
                CardTransition::Hide {
                    after_ms: config.fade_out_ms,
                }
            }
        })
        .collect()
}

// project filter
//
// the current key is shared with the deferred halves of each transition: a card that is
// due to vanish is only removed from the layout if it still fails the filter that is
// current when the timer fires, and likewise for the fade-in
pub struct ProjectFilter<C, B, S> {
    cards: Rc<Vec<C>>,
    buttons: Vec<B>,
    scheduler: S,
    config: FilterConfig,
    current: Rc<RefCell<FilterKey>>,
}

impl<C, B, S> ProjectFilter<C, B, S>
where
    C: CardSurface + 'static,
    B: FilterButton,
    S: Scheduler,
{
    pub fn new(cards: Vec<C>, buttons: Vec<B>, scheduler: S, config: FilterConfig) -> Self {
        ProjectFilter {
            cards: Rc::new(cards),
            buttons,
            scheduler,
            config,
            current: Rc::new(RefCell::new(FilterKey::All)),
        }
    }

    pub fn current(&self) -> FilterKey {
        self.current.borrow().clone()
    }

    pub fn buttons(&self) -> &[B] {
        &self.buttons
    }

    pub fn apply(&self, key: FilterKey) -> Vec<CardTransition> {
        debug!(filter = %key, "applying project filter");

        let label = key.to_string();
        for button in &self.buttons {
            button.set_active(button.filter_key().as_deref() == Some(label.as_str()));
        }

        *self.current.borrow_mut() = key.clone();

        let categories: Vec<Option<String>> = self.cards.iter().map(|c| c.category()).collect();
        let transitions = plan(&key, categories.iter().map(|c| c.as_deref()), &self.config);

        for (index, (transition, category)) in transitions.iter().zip(categories).enumerate() {
            let cards = self.cards.clone();
            let current = self.current.clone();
            let card = &self.cards[index];

            match *transition {
                CardTransition::Show { delay_ms } => {
                    card.set_displayed(true);
                    self.scheduler.set_timeout(
                        delay_ms,
                        Box::new(move || {
                            if current.borrow().matches(category.as_deref()) {
                                cards[index].set_faded_in(true);
                            }
                        }),
                    );
                }
                CardTransition::Hide { after_ms } => {
                    card.set_faded_in(false);
                    self.scheduler.set_timeout(
                        after_ms,
                        Box::new(move || {
                            if !current.borrow().matches(category.as_deref()) {
                                cards[index].set_displayed(false);
                            }
                        }),
                    );
                }
            }
        }

        transitions
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::schedule::ManualScheduler;

    #[derive(Clone)]
    struct Card {
        category: Option<&'static str>,
        displayed: Rc<Cell<bool>>,
        faded_in: Rc<Cell<bool>>,
    }

    impl Card {
        fn new(category: Option<&'static str>) -> Self {
            Card {
                category,
                displayed: Rc::new(Cell::new(true)),
                faded_in: Rc::new(Cell::new(true)),
            }
        }

        fn visible(&self) -> bool {
            self.displayed.get() && self.faded_in.get()
        }
    }

    impl CardSurface for Card {
        fn category(&self) -> Option<String> {
            self.category.map(String::from)
        }

        fn set_displayed(&self, displayed: bool) {
            self.displayed.set(displayed);
        }

        fn set_faded_in(&self, faded_in: bool) {
            self.faded_in.set(faded_in);
        }
    }

    #[derive(Clone)]
    struct Button(&'static str, Rc<Cell<bool>>);

    impl FilterButton for Button {
        fn filter_key(&self) -> Option<String> {
            Some(self.0.to_owned())
        }

        fn set_active(&self, active: bool) {
            self.1.set(active);
        }
    }

    fn board() -> (
        Vec<Card>,
        Vec<Button>,
        ManualScheduler,
        ProjectFilter<Card, Button, ManualScheduler>,
    ) {
        let cards = vec![
            Card::new(Some("web")),
            Card::new(Some("mobile")),
            Card::new(Some("web")),
            Card::new(None),
        ];
        let buttons = ["all", "web", "mobile"]
            .into_iter()
            .map(|k| Button(k, Rc::new(Cell::new(false))))
            .collect::<Vec<_>>();
        let scheduler = ManualScheduler::new();
        let filter = ProjectFilter::new(
            cards.clone(),
            buttons.clone(),
            scheduler.clone(),
            FilterConfig::default(),
        );
        (cards, buttons, scheduler, filter)
    }

    #[test]
    fn filter_keys_parse() {
        assert_eq!(FilterKey::from("all"), FilterKey::All);
        assert_eq!(FilterKey::from("web"), FilterKey::Category("web".into()));
        assert!(FilterKey::All.matches(None));
        assert!(!FilterKey::from("web").matches(None));
    }

    #[test]
    fn plan_staggers_by_card_index() {
        let plan = plan(
            &FilterKey::from("web"),
            [Some("web"), Some("mobile"), Some("web")],
            &FilterConfig::default(),
        );

        assert_eq!(
            plan,
            vec![
                CardTransition::Show { delay_ms: 0 },
                CardTransition::Hide { after_ms: 300 },
                CardTransition::Show { delay_ms: 200 },
            ]
        );
    }

    #[test]
    fn category_filter_hides_the_rest_after_fade_out() {
        let (cards, buttons, scheduler, filter) = board();

        filter.apply(FilterKey::from("web"));

        assert!(buttons[1].1.get());
        assert!(!buttons[0].1.get() && !buttons[2].1.get());

        // faded immediately, still in the layout until the fade finishes
        assert!(cards[1].displayed.get() && !cards[1].faded_in.get());

        scheduler.advance(299);
        assert!(cards[1].displayed.get());

        scheduler.advance(1);
        assert!(!cards[1].displayed.get());
        assert!(!cards[3].displayed.get());
        assert!(cards[0].visible() && cards[2].visible());
    }

    #[test]
    fn all_shows_every_card() {
        let (cards, _, scheduler, filter) = board();

        filter.apply(FilterKey::from("mobile"));
        scheduler.advance(1000);
        filter.apply(FilterKey::All);
        scheduler.advance(1000);

        assert!(cards.iter().all(Card::visible));
        assert_eq!(filter.current(), FilterKey::All);
    }

    #[test]
    fn rapid_refilter_never_hides_a_matching_card() {
        let (cards, _, scheduler, filter) = board();

        filter.apply(FilterKey::from("mobile"));
        scheduler.advance(100);
        filter.apply(FilterKey::from("web"));
        scheduler.advance(1000);

        assert!(cards[0].visible());
        assert!(cards[2].visible());
        assert!(!cards[1].displayed.get());
    }
}
