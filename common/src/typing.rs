use std::rc::Rc;

use tracing::debug;

use crate::{config::TypingConfig, schedule::Scheduler};

// one rendered state of a typing effect, together with how long it stays on screen
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    pub text: String,
    pub delay_ms: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct CycleTiming {
    pub type_ms: u32,
    pub delete_ms: u32,
    pub hold_ms: u32,
    pub next_phrase_ms: u32,
}

impl From<&TypingConfig> for CycleTiming {
    fn from(config: &TypingConfig) -> Self {
        CycleTiming {
            type_ms: config.type_ms,
            delete_ms: config.delete_ms,
            hold_ms: config.hold_ms,
            next_phrase_ms: config.next_phrase_ms,
        }
    }
}

// cycling typewriter
//
// types the current phrase one character per tick, holds it, deletes it one character per
// tick, then moves on to the next phrase and wraps around forever.  the displayed text is
// always a prefix of the phrase at `phrase`
#[derive(Clone, Debug)]
pub struct Typewriter {
    phrases: Vec<Vec<char>>,
    timing: CycleTiming,
    phrase: usize,
    chars: usize,
    deleting: bool,
}

impl Typewriter {
    // empty phrases would never complete a type/delete cycle, so they are dropped; with
    // nothing left there is nothing to animate
    pub fn new<I, T>(phrases: I, timing: CycleTiming) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let phrases: Vec<Vec<char>> = phrases
            .into_iter()
            .map(|p| p.as_ref().chars().collect::<Vec<char>>())
            .filter(|p| !p.is_empty())
            .collect();

        if phrases.is_empty() {
            return None;
        }

        Some(Typewriter {
            phrases,
            timing,
            phrase: 0,
            chars: 0,
            deleting: false,
        })
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    pub fn current_phrase(&self) -> String {
        self.phrases[self.phrase].iter().collect()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn tick(&mut self) -> Frame {
        let phrase = &self.phrases[self.phrase];

        if self.deleting {
            self.chars -= 1;
        } else {
            self.chars += 1;
        }

        let text: String = phrase[..self.chars].iter().collect();

        let mut delay_ms = if self.deleting {
            self.timing.delete_ms
        } else {
            self.timing.type_ms
        };

        if !self.deleting && self.chars == phrase.len() {
            delay_ms = self.timing.hold_ms;
            self.deleting = true;
        } else if self.deleting && self.chars == 0 {
            delay_ms = self.timing.next_phrase_ms;
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
        }

        Frame { text, delay_ms }
    }
}

// one-shot reveal
//
// starts from the empty string and shows one more character per tick until the whole text
// is visible, then reports completion
#[derive(Clone, Debug)]
pub struct Reveal {
    text: Vec<char>,
    shown: usize,
}

impl Reveal {
    pub fn new(text: &str) -> Self {
        Reveal {
            text: text.chars().collect(),
            shown: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.text.len()
    }

    pub fn tick(&mut self) -> Option<String> {
        if self.is_done() {
            return None;
        }

        self.shown += 1;
        Some(self.text[..self.shown].iter().collect())
    }
}

// drive a typewriter forever
//
// each tick renders its frame and schedules the next one, handing the machine itself to the
// follow-up task.  there is no way to stop the chain; it ends with the page
pub fn start_cycle<S, R>(scheduler: S, machine: Typewriter, render: R)
where
    S: Scheduler + Clone + 'static,
    R: Fn(&str) + 'static,
{
    debug!(phrases = machine.phrases.len(), "starting typing cycle");
    cycle_step(scheduler, machine, Rc::new(render));
}

fn cycle_step<S, R>(scheduler: S, mut machine: Typewriter, render: Rc<R>)
where
    S: Scheduler + Clone + 'static,
    R: Fn(&str) + 'static,
{
    let frame = machine.tick();
    render(&frame.text);

    let next = scheduler.clone();
    scheduler.set_timeout(
        frame.delay_ms,
        Box::new(move || cycle_step(next, machine, render)),
    );
}

// clear the target and reveal `text` one character every `interval_ms`
pub fn start_reveal<S, R>(scheduler: S, text: &str, interval_ms: u32, render: R)
where
    S: Scheduler + Clone + 'static,
    R: Fn(&str) + 'static,
{
    render("");
    reveal_step(scheduler, Reveal::new(text), interval_ms, Rc::new(render));
}

fn reveal_step<S, R>(scheduler: S, mut reveal: Reveal, interval_ms: u32, render: Rc<R>)
where
    S: Scheduler + Clone + 'static,
    R: Fn(&str) + 'static,
{
    let next = scheduler.clone();
    scheduler.set_timeout(
        interval_ms,
        Box::new(move || {
            if let Some(text) = reveal.tick() {
                render(&text);
                reveal_step(next, reveal, interval_ms, render);
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::schedule::ManualScheduler;

    fn timing() -> CycleTiming {
        CycleTiming::from(&TypingConfig::default())
    }

    #[test]
    fn cycles_type_hold_delete_next() {
        let mut machine = Typewriter::new(["A", "B"], timing()).unwrap();

        let frames: Vec<Frame> = (0..6).map(|_| machine.tick()).collect();
        let shown: Vec<(&str, u32)> = frames
            .iter()
            .map(|f| (f.text.as_str(), f.delay_ms))
            .collect();

        assert_eq!(
            shown,
            vec![
                ("A", 2000),
                ("", 500),
                ("B", 2000),
                ("", 500),
                ("A", 2000),
                ("", 500),
            ]
        );
    }

    #[test]
    fn text_is_always_a_prefix_of_the_current_phrase() {
        let mut machine = Typewriter::new(["héllo", "wörld", "ok"], timing()).unwrap();

        for _ in 0..200 {
            let phrase = machine.current_phrase();
            let frame = machine.tick();
            assert!(phrase.starts_with(&frame.text), "{:?} vs {phrase:?}", frame.text);
            assert!(frame.text.chars().count() <= phrase.chars().count());
        }
    }

    #[test]
    fn typing_and_deleting_speeds_differ() {
        let mut machine = Typewriter::new(["abc"], timing()).unwrap();

        assert_eq!(machine.tick(), Frame { text: "a".into(), delay_ms: 100 });
        assert_eq!(machine.tick(), Frame { text: "ab".into(), delay_ms: 100 });
        assert_eq!(machine.tick(), Frame { text: "abc".into(), delay_ms: 2000 });
        assert!(machine.is_deleting());
        assert_eq!(machine.tick(), Frame { text: "ab".into(), delay_ms: 50 });
        assert_eq!(machine.tick(), Frame { text: "a".into(), delay_ms: 50 });
        assert_eq!(machine.tick(), Frame { text: "".into(), delay_ms: 500 });
        assert!(!machine.is_deleting());
        assert_eq!(machine.phrase_index(), 0);
    }

    #[test]
    fn empty_phrases_are_skipped() {
        assert!(Typewriter::new(Vec::<String>::new(), timing()).is_none());
        assert!(Typewriter::new(["", ""], timing()).is_none());

        let mut machine = Typewriter::new(["", "x"], timing()).unwrap();
        assert_eq!(machine.tick().text, "x");
    }

    #[test]
    fn scheduled_cycle_renders_through_the_phrases() {
        let scheduler = ManualScheduler::new();
        let shown = Rc::new(RefCell::new(Vec::<String>::new()));

        let machine = Typewriter::new(["A", "B"], timing()).unwrap();
        {
            let shown = shown.clone();
            start_cycle(scheduler.clone(), machine, move |text| {
                shown.borrow_mut().push(text.to_owned())
            });
        }

        assert_eq!(*shown.borrow(), vec!["A"]);

        scheduler.advance(1999);
        assert_eq!(shown.borrow().len(), 1);

        scheduler.advance(1);
        scheduler.advance(500);
        assert_eq!(*shown.borrow(), vec!["A", "", "B"]);

        // the chain never ends
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn reveal_stops_after_the_full_text() {
        let scheduler = ManualScheduler::new();
        let shown = Rc::new(RefCell::new(Vec::<String>::new()));

        {
            let shown = shown.clone();
            start_reveal(scheduler.clone(), "Hi!", 50, move |text| {
                shown.borrow_mut().push(text.to_owned())
            });
        }

        scheduler.run_until_idle();

        assert_eq!(*shown.borrow(), vec!["", "H", "Hi", "Hi!"]);
        assert_eq!(scheduler.now(), 200);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn reveal_of_empty_text_is_immediately_done() {
        let mut reveal = Reveal::new("");
        assert!(reveal.is_done());
        assert_eq!(reveal.tick(), None);
    }
}
