//! Integration tests for order reconstruction through an attached OrderedMirror
//! These drive the mirror from a ScriptedSource and check both the resulting
//! order and the exact diff stream the observer receives.

use std::sync::Arc;

use listmirror_client::{MirrorConfig, MirrorState, OrderedMirror};
use listmirror_shared::{ChangeEvent, ChildEvent, KeyLookup};
use listmirror_test::{assert_order, Notification, RecordingObserver, ScriptedSource};

fn attached_mirror(
    config: MirrorConfig,
) -> (OrderedMirror<String>, Arc<ScriptedSource<String>>, RecordingObserver) {
    let source = Arc::new(ScriptedSource::<String>::new());
    let observer = RecordingObserver::new();
    let mut mirror = OrderedMirror::new(config);
    mirror.set_observer(observer.clone());
    mirror.attach(source.clone()).expect("fresh mirror attaches");
    (mirror, source, observer)
}

fn value(text: &str) -> String {
    text.to_string()
}

#[test]
fn sibling_hints_rebuild_order() {
    let (mirror, source, observer) = attached_mirror(MirrorConfig::default());

    source.emit(ChildEvent::added("a", value("A"), None));
    source.emit(ChildEvent::added("b", value("B"), Some("a")));
    source.emit(ChildEvent::added("c", value("C"), Some("a")));

    assert_order!(mirror, ["a", "c", "b"]);
    assert_eq!(mirror.count(), 3);
    assert_eq!(
        observer.changes(),
        vec![ChangeEvent::added(0), ChangeEvent::added(1), ChangeEvent::added(1)]
    );
}

#[test]
fn full_lifecycle_emits_positional_diffs() {
    for key_lookup in [KeyLookup::LinearScan, KeyLookup::KeyIndex] {
        let config = MirrorConfig {
            key_lookup,
            ..MirrorConfig::default()
        };
        let (mirror, source, observer) = attached_mirror(config);

        source.emit(ChildEvent::added("a", value("A"), None));
        source.emit(ChildEvent::added("b", value("B"), Some("a")));
        source.emit(ChildEvent::added("c", value("C"), Some("a")));
        observer.clear();

        // Changed keeps the index and swaps the value
        source.emit(ChildEvent::changed("c", value("C2"), Some("a")));
        assert_eq!(observer.changes(), vec![ChangeEvent::changed(1)]);
        assert_order!(mirror, ["a", "c", "b"]);
        assert_eq!(mirror.get(1).unwrap().value(), "C2");
        observer.clear();

        // Removed reports the position the record occupied
        source.emit(ChildEvent::removed("a", value("A")));
        assert_eq!(observer.changes(), vec![ChangeEvent::removed(0)]);
        assert_order!(mirror, ["c", "b"]);
        assert_eq!(mirror.get(0).unwrap().key(), "c");
        observer.clear();

        // Moved to the front
        source.emit(ChildEvent::moved("b", value("B"), None));
        assert_eq!(observer.changes(), vec![ChangeEvent::moved(0, 1)]);
        assert_order!(mirror, ["b", "c"]);

        assert_eq!(mirror.state(), MirrorState::Live);
    }
}

#[test]
fn moved_event_carries_new_value() {
    let (mirror, source, _observer) = attached_mirror(MirrorConfig::default());

    source.emit(ChildEvent::added("a", value("A"), None));
    source.emit(ChildEvent::added("b", value("B"), Some("a")));
    source.emit(ChildEvent::moved("a", value("A2"), Some("b")));

    assert_order!(mirror, ["b", "a"]);
    assert_eq!(mirror.get(1).unwrap().value(), "A2");
}

#[test]
fn empty_prior_key_inserts_first() {
    let (mirror, source, observer) = attached_mirror(MirrorConfig::default());

    source.emit(ChildEvent::added("a", value("A"), None));
    source.emit(ChildEvent::added("z", value("Z"), Some("")));

    assert_order!(mirror, ["z", "a"]);
    assert_eq!(observer.changes().last(), Some(&ChangeEvent::added(0)));
}

#[test]
fn diff_counts_reflect_post_mutation_sequence() {
    let (_mirror, source, observer) = attached_mirror(MirrorConfig::default());

    source.emit(ChildEvent::added("a", value("A"), None));
    source.emit(ChildEvent::added("b", value("B"), Some("a")));
    source.emit(ChildEvent::removed("b", value("B")));

    let counts: Vec<usize> = observer
        .notifications()
        .into_iter()
        .map(|notification| match notification {
            Notification::Changed { count, .. } => count,
            other => panic!("unexpected notification {:?}", other),
        })
        .collect();
    assert_eq!(counts, vec![1, 2, 1]);
}

#[test]
fn replaying_same_events_is_deterministic() {
    let events = vec![
        ChildEvent::added("m", value("M"), None),
        ChildEvent::added("n", value("N"), Some("m")),
        ChildEvent::added("o", value("O"), None),
        ChildEvent::moved("o", value("O"), Some("n")),
        ChildEvent::changed("m", value("M2"), None),
        ChildEvent::added("p", value("P"), Some("m")),
        ChildEvent::removed("n", value("N")),
        ChildEvent::moved("m", value("M2"), Some("o")),
    ];

    let run = || {
        let (mirror, source, observer) = attached_mirror(MirrorConfig::default());
        for event in events.clone() {
            source.push(event);
        }
        source.deliver();
        (mirror.keys().unwrap(), observer.changes())
    };

    let (first_keys, first_changes) = run();
    let (second_keys, second_changes) = run();

    assert_eq!(first_keys, vec!["p", "o", "m"]);
    assert_eq!(first_keys, second_keys);
    assert_eq!(first_changes, second_changes);
    assert_eq!(first_changes.len(), events.len());
}

#[test]
fn no_observer_still_updates_sequence() {
    let source = Arc::new(ScriptedSource::<String>::new());
    let mut mirror: OrderedMirror<String> = OrderedMirror::<String>::default();
    mirror.attach(source.clone()).unwrap();

    source.emit(ChildEvent::added("a", value("A"), None));
    source.emit(ChildEvent::added("b", value("B"), Some("a")));

    assert_order!(mirror, ["a", "b"]);

    // an observer installed later only sees later diffs
    let observer = RecordingObserver::new();
    mirror.set_observer(observer.clone());
    source.emit(ChildEvent::removed("a", value("A")));
    assert_eq!(observer.changes(), vec![ChangeEvent::removed(0)]);
}

#[test]
fn replacing_observer_drops_previous_one() {
    let (mirror, source, first) = attached_mirror(MirrorConfig::default());
    let second = RecordingObserver::new();

    source.emit(ChildEvent::added("a", value("A"), None));
    mirror.set_observer(second.clone());
    source.emit(ChildEvent::added("b", value("B"), Some("a")));

    assert_eq!(first.changes(), vec![ChangeEvent::added(0)]);
    assert_eq!(second.changes(), vec![ChangeEvent::added(1)]);

    mirror.clear_observer();
    source.emit(ChildEvent::added("c", value("C"), Some("b")));
    assert_eq!(second.len(), 1);
    assert_eq!(mirror.count(), 3);
}
