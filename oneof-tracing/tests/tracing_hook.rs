use std::sync::{Arc, Mutex};

use oneof::Variant;
use oneof_tracing::TracingHook;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, Registry, layer::Context, layer::SubscriberExt};

#[derive(Clone, Debug, Default)]
struct Recorded {
    level: Option<Level>,
    target: String,
    fields: Vec<(String, String)>,
}

#[derive(Clone, Default)]
struct RecordingLayer(Arc<Mutex<Vec<Recorded>>>);

struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorded = Recorded {
            level: Some(*event.metadata().level()),
            target: event.metadata().target().to_string(),
            fields: Vec::new(),
        };
        event.record(&mut FieldVisitor(&mut recorded.fields));
        self.0.lock().unwrap().push(recorded);
    }
}

fn field<'a>(recorded: &'a Recorded, name: &str) -> Option<&'a str> {
    recorded
        .fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

#[test]
fn test_valueless_transition_is_traced() {
    let layer = RecordingLayer::default();
    let events = layer.0.clone();
    let subscriber = Registry::default().with(layer);

    oneof_tracing::install().unwrap();

    tracing::subscriber::with_default(subscriber, || {
        let mut value: Variant<(u8, String)> = Variant::new(1_u8);
        let _ = value.try_emplace_with::<String, _, _, _>(|| Err("allocation refused"));
        assert!(value.valueless_by_exception());

        // A successful replacement emits nothing.
        value.emplace(String::from("ok"));
    });

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Some(Level::WARN));
    assert_eq!(event.target, "oneof");
    assert_eq!(field(event, "operation"), Some("in-place construction"));
    assert_eq!(field(event, "index"), Some("1"));
    assert_eq!(field(event, "error"), Some("allocation refused"));
    assert!(field(event, "alternative").is_some_and(|name| name.ends_with("String")));
    assert_eq!(field(event, "message"), Some("variant became valueless"));
}

#[test]
fn test_level_is_configurable() {
    let hook = TracingHook::new().with_level(Level::ERROR);
    assert_eq!(hook.level(), Level::ERROR);
    assert_eq!(TracingHook::default().level(), Level::WARN);
}
