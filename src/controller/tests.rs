use super::*;

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serializer;

use crate::config::AutocompleteConfig;
use crate::engine::{ScriptedEngine, SuggestionBridge};
use crate::error::BoxError;
use crate::field::MemoryField;

#[derive(Debug, Clone, PartialEq, Serialize)]
struct City {
    name: String,
    country: String,
}

fn city(name: &str, country: &str) -> City {
    City {
        name: name.to_string(),
        country: country.to_string(),
    }
}

/// Engine that hands the adapters straight back so tests can drive them.
struct CapturingEngine;

struct Captured<T, F> {
    options: EngineOptions<F>,
    bridge: Arc<dyn SuggestionBridge<T>>,
}

impl<T: 'static, F: InputField> SuggestionEngine<T, F> for CapturingEngine {
    type Session = Captured<T, F>;

    fn create(
        &self,
        options: EngineOptions<F>,
        bridge: Arc<dyn SuggestionBridge<T>>,
    ) -> Self::Session {
        Captured { options, bridge }
    }
}

fn controller() -> (MemoryField, Autocompleter<City, MemoryField>) {
    let field = MemoryField::new();
    let ac = Autocompleter::new(field.clone(), |c: &City| c.name.clone());
    (field, ac)
}

fn capture(ac: &Autocompleter<City, MemoryField>) -> Captured<City, MemoryField> {
    ac.create(&CapturingEngine)
}

#[test]
fn test_binding_disables_native_suggestions() {
    let (field, ac) = controller();
    assert_eq!(
        field.attribute(NATIVE_AUTOCOMPLETE_ATTR).as_deref(),
        Some("off")
    );
    assert_eq!(field.listener_count(), 1);
    assert_eq!(ac.selected_item(), None);
    assert_eq!(ac.selection_state(), SelectionState::Empty);
}

#[test]
fn test_defaults_and_chained_setters() {
    let (_, ac) = controller();
    assert_eq!(ac.config(), AutocompleteConfig::default());

    ac.set_class_name("cities")
        .set_min_length(3)
        .set_empty_msg("No city")
        .set_debounce_wait_ms(None)
        .set_strict_value(false);

    let config = ac.config();
    assert_eq!(config.class_name, "cities");
    assert_eq!(config.min_length, 3);
    assert_eq!(config.empty_msg, "No city");
    assert_eq!(config.debounce_wait_ms, None);
    assert!(!config.strict_value);
}

#[test]
fn test_create_passes_settings_to_engine() {
    let (field, ac) = controller();
    ac.set_min_length(4).set_debounce_wait_ms(Some(250));

    let session = capture(&ac);
    let options = &session.options;
    assert_eq!(options.min_length, 4);
    assert_eq!(options.debounce_wait, Some(std::time::Duration::from_millis(250)));
    assert_eq!(options.class_name, "autocomplete-widget");
    assert_eq!(options.empty_msg, "No matches found");
    assert!(options.prevent_submit);
    assert!(options.disable_auto_select);

    field.type_text("via engine handle");
    assert_eq!(options.field.value(), "via engine handle");
}

#[test]
fn test_with_config_seeds_settings() {
    let config = AutocompleteConfig {
        min_length: 0,
        strict_value: false,
        ..Default::default()
    };
    let ac = Autocompleter::with_config(MemoryField::new(), |c: &City| c.name.clone(), &config);
    assert_eq!(ac.config(), config);
}

#[test]
fn test_select_commits_item() {
    let (field, ac) = controller();
    let session = capture(&ac);
    let berlin = city("Berlin", "DE");

    session.bridge.select(berlin.clone());

    assert_eq!(field.value(), "Berlin");
    assert_eq!(ac.selected_item(), Some(berlin));
    assert_eq!(ac.selection_state(), SelectionState::Committed);
    assert_eq!(
        field.attribute(ITEM_DATA_ATTR).as_deref(),
        Some(r#"{"name":"Berlin","country":"DE"}"#)
    );
}

#[test]
fn test_select_overwrites_previous_item() {
    let (field, ac) = controller();
    let session = capture(&ac);

    session.bridge.select(city("Berlin", "DE"));
    session.bridge.select(city("Bern", "CH"));

    assert_eq!(field.value(), "Bern");
    assert_eq!(ac.selected_item(), Some(city("Bern", "CH")));
}

#[test]
fn test_strict_divergence_resets() {
    let (field, ac) = controller();
    let session = capture(&ac);
    session.bridge.select(city("Berlin", "DE"));

    field.type_text("Berl");
    assert_eq!(ac.selection_state(), SelectionState::Diverged);
    assert!(field.blur());

    assert_eq!(ac.selected_item(), None);
    assert_eq!(field.value(), "");
    assert_eq!(field.attribute(ITEM_DATA_ATTR), None);
    assert_eq!(ac.selection_state(), SelectionState::Empty);
}

#[test]
fn test_lenient_divergence_is_tolerated() {
    let (field, ac) = controller();
    ac.set_strict_value(false);
    let session = capture(&ac);
    session.bridge.select(city("Berlin", "DE"));

    field.type_text("Berlin Mitte");
    assert_eq!(ac.handle_change(), Reconciliation::Tolerated);
    field.blur();

    assert_eq!(ac.selected_item(), Some(city("Berlin", "DE")));
    assert_eq!(field.value(), "Berlin Mitte");
    assert_eq!(ac.selection_state(), SelectionState::Diverged);
}

#[test]
fn test_edit_reverted_before_change_is_stable() {
    for strict in [true, false] {
        let (field, ac) = controller();
        ac.set_strict_value(strict);
        let session = capture(&ac);
        session.bridge.select(city("Berlin", "DE"));

        field.type_text("Berl");
        field.type_text("Berlin");
        assert!(field.blur());

        assert_eq!(ac.selected_item(), Some(city("Berlin", "DE")));
        assert_eq!(field.value(), "Berlin");
        assert_eq!(ac.handle_change(), Reconciliation::Consistent);
    }
}

#[test]
fn test_free_text_without_selection_is_wiped_in_strict_mode() {
    let (field, ac) = controller();
    field.type_text("Atlantis");
    field.blur();
    assert_eq!(field.value(), "");

    ac.set_strict_value(false);
    field.type_text("Atlantis");
    field.blur();
    assert_eq!(field.value(), "Atlantis");
    assert_eq!(ac.selection_state(), SelectionState::Empty);
}

#[test]
fn test_reset_is_unconditional() {
    let (field, ac) = controller();

    ac.reset();
    assert_eq!(ac.selected_item(), None);
    assert_eq!(field.value(), "");

    let session = capture(&ac);
    session.bridge.select(city("Paris", "FR"));
    ac.reset();
    assert_eq!(ac.selected_item(), None);
    assert_eq!(field.value(), "");
    assert_eq!(field.attribute(ITEM_DATA_ATTR), None);

    ac.set_strict_value(false);
    session.bridge.select(city("Paris", "FR"));
    field.type_text("Par");
    ac.reset();
    assert_eq!(ac.selected_item(), None);
    assert_eq!(field.value(), "");
}

#[test]
fn test_fetch_delegates_once_with_query() {
    let (_, ac) = controller();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = calls.clone();
    ac.set_fetcher(move |text: String| {
        seen.lock().unwrap().push(text.clone());
        async move {
            Ok::<_, BoxError>(vec![city("Berlin", "DE"), city("Bergen", "NO")])
        }
    });
    let session = capture(&ac);

    let received = Arc::new(Mutex::new(None));
    let sink = received.clone();
    let pending = session
        .bridge
        .fetch(
            "Ber",
            Box::new(move |items: Vec<City>| {
                *sink.lock().unwrap() = Some(items);
            }),
        )
        .unwrap();
    tokio_test::block_on(pending).unwrap();

    assert_eq!(*calls.lock().unwrap(), vec!["Ber".to_string()]);
    assert_eq!(
        received.lock().unwrap().clone(),
        Some(vec![city("Berlin", "DE"), city("Bergen", "NO")])
    );
}

#[test]
fn test_fetcher_runs_when_fetch_is_polled() {
    let (_, ac) = controller();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    ac.set_fetcher(move |_text: String| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, BoxError>(vec![city("Berlin", "DE")]) }
    });
    let session = capture(&ac);

    let dropped = session
        .bridge
        .fetch("Ber", Box::new(|_: Vec<City>| {}))
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    drop(dropped);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let pending = session
        .bridge
        .fetch("Ber", Box::new(|_: Vec<City>| {}))
        .unwrap();
    tokio_test::block_on(pending).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fetch_without_fetcher_fails_synchronously() {
    let (_, ac) = controller();
    let session = capture(&ac);
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = updates.clone();

    let result = session.bridge.fetch(
        "Ber",
        Box::new(move |_: Vec<City>| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    match result {
        Err(err) => assert!(err.is_missing_fetcher()),
        Ok(_) => panic!("fetch must fail without a fetcher"),
    }
    assert_eq!(updates.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fetch_failure_passes_through() {
    let (_, ac) = controller();
    ac.set_fetcher(|_text: String| async move {
        Err::<Vec<City>, BoxError>(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "backend down",
        )))
    });
    let session = capture(&ac);
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = updates.clone();

    let pending = session
        .bridge
        .fetch(
            "Ber",
            Box::new(move |_: Vec<City>| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
    let err = tokio_test::block_on(pending).unwrap_err();

    let io_err = err.downcast_ref::<io::Error>().unwrap();
    assert_eq!(io_err.kind(), io::ErrorKind::ConnectionRefused);
    assert_eq!(updates.load(Ordering::SeqCst), 0);
}

#[test]
fn test_in_flight_fetch_keeps_captured_fetcher() {
    let (_, ac) = controller();
    ac.set_fetcher(|_text: String| async move { Ok::<_, BoxError>(vec![city("Old", "XX")]) });
    let session = capture(&ac);

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let pending = session
        .bridge
        .fetch("O", Box::new(move |items: Vec<City>| sink.lock().unwrap().extend(items)))
        .unwrap();

    ac.set_fetcher(|_text: String| async move { Ok::<_, BoxError>(vec![city("New", "YY")]) });
    tokio_test::block_on(pending).unwrap();

    assert_eq!(*received.lock().unwrap(), vec![city("Old", "XX")]);
}

#[test]
fn test_render_without_hooks_uses_default_container() {
    let (_, ac) = controller();
    let session = capture(&ac);

    let element = session.bridge.render(&city("Oslo", "NO"), "Os");
    assert_eq!(element, Element::item("Oslo"));
}

#[test]
fn test_render_hooks_compose_in_order() {
    let (_, ac) = controller();
    ac.on_render(|mut element, item: &City, _query| {
        element.add_class("h1");
        element.text = format!("{} ({})", element.text, item.country);
        element
    })
    .on_render(|previous, _item: &City, query| {
        let mut wrapper = Element::new("span");
        wrapper.text = format!("{}|{}", previous.text, query);
        wrapper.classes = previous.classes;
        wrapper
    });
    let session = capture(&ac);

    let element = session.bridge.render(&city("Oslo", "NO"), "Os");

    let mut expected = Element::new("span");
    expected.text = "Oslo (NO)|Os".to_string();
    expected.classes = vec!["ac-item".to_string(), "h1".to_string()];
    assert_eq!(element, expected);
}

#[test]
fn test_render_reads_live_extractor() {
    let (_, ac) = controller();
    let session = capture(&ac);

    ac.set_value_extractor(|c: &City| format!("{}, {}", c.name, c.country));
    let element = session.bridge.render(&city("Oslo", "NO"), "Os");
    assert_eq!(element.text, "Oslo, NO");
}

#[test]
fn test_select_hooks_run_in_order_after_commit() {
    let (field, ac) = controller();
    let log = Arc::new(Mutex::new(Vec::new()));

    let (log1, ac1) = (log.clone(), ac.clone());
    ac.on_select(move |item: &City| {
        let committed = ac1.selected_item().as_ref() == Some(item);
        log1.lock().unwrap().push(format!("s1:{}:{}", item.name, committed));
    });
    let (log2, field2) = (log.clone(), field.clone());
    ac.on_select(move |item: &City| {
        log2.lock()
            .unwrap()
            .push(format!("s2:{}:{}", item.name, field2.value()));
    });

    let session = capture(&ac);
    session.bridge.select(city("Rome", "IT"));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["s1:Rome:true".to_string(), "s2:Rome:Rome".to_string()]
    );
}

#[test]
fn test_unserializable_item_drops_attribute() {
    #[derive(Clone)]
    struct Opaque(&'static str);

    impl Serialize for Opaque {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("opaque"))
        }
    }

    let field = MemoryField::new();
    field.set_attribute(ITEM_DATA_ATTR, "stale");
    let ac = Autocompleter::new(field.clone(), |o: &Opaque| o.0.to_string());
    let session = ac.create(&CapturingEngine);

    session.bridge.select(Opaque("hidden"));

    assert_eq!(field.value(), "hidden");
    assert_eq!(field.attribute(ITEM_DATA_ATTR), None);
    assert!(ac.selected_item().is_some());
}

#[test]
fn test_create_twice_opens_independent_sessions() {
    let (field, ac) = controller();
    let first = capture(&ac);
    let second = capture(&ac);

    second.bridge.select(city("Lima", "PE"));
    assert_eq!(field.value(), "Lima");
    assert_eq!(first.bridge.render(&city("Lima", "PE"), "").text, "Lima");
    assert_eq!(ac.selected_item(), Some(city("Lima", "PE")));
}

#[test]
fn test_dropped_controller_ignores_change() {
    let (field, ac) = controller();
    drop(ac);

    field.type_text("orphan");
    assert!(field.blur());
    assert_eq!(field.value(), "orphan");
}

#[tokio::test]
async fn test_scripted_round_trip() {
    let (field, ac) = controller();
    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = fetches.clone();
    ac.set_min_length(2)
        .set_debounce_wait_ms(None)
        .set_fetcher(move |text: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                let all = vec![city("Madrid", "ES"), city("Malaga", "ES"), city("Oslo", "NO")];
                Ok::<_, BoxError>(
                    all.into_iter()
                        .filter(|c| c.name.starts_with(&text))
                        .collect::<Vec<_>>(),
                )
            }
        })
        .on_render(|mut element, item: &City, _| {
            element.set_attribute("title", &item.country);
            element
        });

    let session = ac.create(&ScriptedEngine::new());

    field.type_text("M");
    assert_eq!(
        session.on_input().await.unwrap(),
        crate::engine::QueryOutcome::TooShort
    );
    assert_eq!(fetches.load(Ordering::SeqCst), 0);

    field.type_text("Ma");
    assert_eq!(
        session.on_input().await.unwrap(),
        crate::engine::QueryOutcome::Rendered(2)
    );
    assert_eq!(session.rendered()[1].attribute("title"), Some("ES"));

    assert!(session.pick(1));
    assert_eq!(field.value(), "Malaga");
    assert_eq!(ac.selected_item(), Some(city("Malaga", "ES")));

    field.type_text("Malag");
    field.blur();
    assert_eq!(field.value(), "");
    assert_eq!(ac.selected_item(), None);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_queries_render_in_settle_order() {
    let (_, ac) = controller();
    ac.set_min_length(0)
        .set_debounce_wait_ms(None)
        .set_fetcher(|text: String| async move {
            let delay = if text == "slow" { 100 } else { 10 };
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            Ok::<_, BoxError>(vec![city(&text, "XX")])
        });
    let session = ac.create(&ScriptedEngine::new());

    let (slow, fast) = tokio::join!(session.query("slow"), session.query("fast"));

    assert_eq!(slow.unwrap(), crate::engine::QueryOutcome::Rendered(1));
    assert_eq!(fast.unwrap(), crate::engine::QueryOutcome::Rendered(1));
    // Issued first but settled last, so its stale result stays on screen.
    assert_eq!(session.items(), vec![city("slow", "XX")]);
    assert_eq!(session.rendered()[0].text, "slow");
}
