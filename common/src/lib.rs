// folio page behaviour
//
// everything the two pages do, minus the browser.  each feature is a small state machine
// or pure function that talks to the document through a narrow trait, and everything that
// waits goes through a Scheduler, so the whole crate runs (and is tested) natively.  the
// webapp crate supplies the DOM-backed implementations of those traits
pub mod analytics;
pub mod config;
pub mod contact;
pub mod filter;
pub mod nav;
pub mod page;
pub mod print;
pub mod reveal;
pub mod schedule;
pub mod shortcuts;
pub mod theme;
pub mod timing;
pub mod typing;

pub use config::{SiteConfig, read_config};
pub use page::PageKind;
pub use schedule::{ManualScheduler, Scheduler, TimerHandle};
