use super::*;
use crate::{
    db::host::MemoryStore,
    model::{Flavour, FlavourId, ThingVisor, ThingVisorId, VThing, VThingId},
};

fn names() -> CollectionNames {
    CollectionNames::default()
}

fn tv_id(id: &str) -> ThingVisorId {
    ThingVisorId::parse(id).unwrap()
}

fn thing_visor(id: &str) -> ThingVisor {
    ThingVisor {
        thing_visor_id: id.to_string(),
        ..ThingVisor::default()
    }
}

fn vthing(id: &str) -> (VThingId, VThing) {
    (
        VThingId::parse(id).unwrap(),
        VThing {
            id: id.to_string(),
            ..VThing::default()
        },
    )
}

#[test]
fn insert_then_load_round_trips() {
    let names = names();
    let repo = Repo::<ThingVisor>::new(&names);
    let mut store = MemoryStore::new();

    repo.insert(&mut store, &tv_id("tv1"), &thing_visor("tv1"))
        .unwrap();

    assert_eq!(
        repo.load(&store, &tv_id("tv1")).unwrap(),
        Some(thing_visor("tv1"))
    );
    assert_eq!(store.len(&names.thing_visors), 1);
}

#[test]
fn insert_refuses_to_overwrite() {
    let names = names();
    let repo = Repo::<ThingVisor>::new(&names);
    let mut store = MemoryStore::new();
    let mut original = thing_visor("tv1");
    original.params = "original".to_string();

    repo.insert(&mut store, &tv_id("tv1"), &original).unwrap();
    let err = repo
        .insert(&mut store, &tv_id("tv1"), &thing_visor("tv1"))
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::AlreadyExists);
    assert_eq!(repo.require(&store, &tv_id("tv1")).unwrap(), original);
}

#[test]
fn replace_and_remove_require_existing_row() {
    let names = names();
    let repo = Repo::<Flavour>::new(&names);
    let mut store = MemoryStore::new();
    let id = FlavourId::parse("f1").unwrap();

    let err = repo
        .replace(&mut store, &id, &Flavour::default())
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::NotFound);

    let err = repo.remove(&mut store, &id).unwrap_err();
    assert!(err.is_not_found());
    assert!(store.is_empty(&names.flavours));
}

#[test]
fn prefix_scan_returns_only_owned_rows_in_key_order() {
    let names = names();
    let repo = Repo::<VThing>::new(&names);
    let mut store = MemoryStore::new();

    for id in ["tv1/b", "tv10/a", "tv1/a", "tv2/a"] {
        let (id, doc) = vthing(id);
        repo.insert(&mut store, &id, &doc).unwrap();
    }

    let ids: Vec<_> = repo
        .scan_prefix(&store, KindTag::VThing, &["tv1"])
        .unwrap()
        .into_iter()
        .map(|(_, doc)| doc.id)
        .collect();

    assert_eq!(ids, ["tv1/a", "tv1/b"]);
}

#[test]
fn corrupt_row_is_reported_with_store_origin() {
    let names = names();
    let repo = Repo::<ThingVisor>::new(&names);
    let mut store = MemoryStore::new();
    let key = tv_id("tv1").key().unwrap();
    store
        .put(&names.thing_visors, &key, b"not json".to_vec())
        .unwrap();

    let err = repo.load(&store, &tv_id("tv1")).unwrap_err();

    assert_eq!(err.class, ErrorClass::Serialization);
    assert_eq!(err.origin, ErrorOrigin::Store);
}

#[derive(Default)]
struct DeleteCounter(std::cell::Cell<u64>);

impl sink::MetricsSink for DeleteCounter {
    fn record(&self, event: MetricsEvent<'_>) {
        if let MetricsEvent::RowsDeleted { rows, .. } = event {
            self.0.set(self.0.get() + rows);
        }
    }
}

#[test]
fn delete_key_counts_only_rows_that_existed() {
    let names = names();
    let repo = Repo::<VThing>::new(&names);
    let mut store = MemoryStore::new();
    let (id, doc) = vthing("tv1/t1");
    repo.insert(&mut store, &id, &doc).unwrap();
    let key = id.key().unwrap();
    let counter = std::rc::Rc::new(DeleteCounter::default());

    let removed = sink::with_metrics_sink(counter.clone(), || {
        [
            repo.delete_key(&mut store, &key).unwrap(),
            repo.delete_key(&mut store, &key).unwrap(),
        ]
    });

    assert_eq!(removed, [true, false]);
    assert_eq!(counter.0.get(), 1);
    assert!(store.is_empty(&names.vthings));
}
