use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

pub const PAGE_LOADED: &str = "portfolio_loaded";
pub const PAGE_VISIBLE: &str = "page_visible";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub data: Map<String, Value>,
}

impl AnalyticsEvent {
    pub fn new(name: &str) -> Self {
        AnalyticsEvent {
            name: name.to_owned(),
            data: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_owned(), value);
        self
    }

    pub fn page_loaded<Tz: TimeZone>(at: DateTime<Tz>, user_agent: &str) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        AnalyticsEvent::new(PAGE_LOADED)
            .with("timestamp", json!(at.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .with("userAgent", json!(user_agent))
    }

    pub fn page_visible() -> Self {
        AnalyticsEvent::new(PAGE_VISIBLE)
    }
}

// where tracked events go besides the log
pub trait EventSink {
    fn send(&self, event: &AnalyticsEvent);
}

// every event is logged; an external hook, when one is installed, gets it as well
pub fn track<E: EventSink>(sink: Option<&E>, event: &AnalyticsEvent) {
    let data = Value::Object(event.data.clone());
    info!(event = %event.name, %data, "event tracked");

    if let Some(sink) = sink {
        sink.send(event);
    }
}

// the "last updated" line on the resume, always in en-US long form
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl EventSink for Recorder {
        fn send(&self, event: &AnalyticsEvent) {
            self.0.borrow_mut().push(event.name.clone());
        }
    }

    #[test]
    fn load_event_carries_timestamp_and_agent() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let event = AnalyticsEvent::page_loaded(at, "test-agent");

        assert_eq!(event.name, "portfolio_loaded");
        assert_eq!(event.data["timestamp"], "2026-10-19T08:30:00.000Z");
        assert_eq!(event.data["userAgent"], "test-agent");
    }

    #[test]
    fn hook_is_optional() {
        let recorder = Recorder::default();

        track(Some(&recorder), &AnalyticsEvent::page_visible());
        track(None::<&Recorder>, &AnalyticsEvent::page_visible());

        assert_eq!(*recorder.0.borrow(), vec!["page_visible"]);
    }

    #[test]
    fn events_with_data_reach_the_hook_intact() {
        let recorder = Recorder::default();
        let event = AnalyticsEvent::new("section_viewed").with("section", json!("projects"));

        track(Some(&recorder), &event);

        assert_eq!(*recorder.0.borrow(), vec!["section_viewed"]);
        assert_eq!(event.data["section"], "projects");
    }

    #[test]
    fn long_dates_use_the_fixed_locale_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(long_date(date), "March 7, 2026");
    }
}
