use serde_json::{Value, json};
use time::macros::datetime;
use viriot::{
    Error, ErrorKind, ErrorOrigin,
    core::{
        context::{Caller, TxContext},
        db::host::MemoryHost,
        provenance::ProvenanceEvent,
        registry::Registry,
    },
    invoke,
};

///
/// Node
///
/// One peer: a registry and an in-memory ledger, driven by raw calls.
///

struct Node {
    registry: Registry,
    host: MemoryHost,
    tx: u32,
}

impl Node {
    fn new() -> Self {
        Self {
            registry: Registry::default(),
            host: MemoryHost::new(),
            tx: 0,
        }
    }

    fn call(&mut self, args: &[&str]) -> Result<Option<Value>, Error> {
        self.tx += 1;
        let ctx = TxContext::new(
            format!("tx-{}", self.tx),
            datetime!(2024-05-01 12:00 UTC),
            Caller::new("alice", "Org1MSP"),
        )
        .with_args(args.iter().copied());
        let registry = &self.registry;

        let out = self.host.execute(|tx| invoke(registry, tx, &ctx))?;

        Ok(out.map(|bytes| serde_json::from_slice(&bytes).unwrap()))
    }

    fn read(&mut self, args: &[&str]) -> Value {
        self.call(args).unwrap().expect("read returns a payload")
    }

    fn write(&mut self, args: &[&str]) {
        assert_eq!(self.call(args).unwrap(), None, "mutations return nothing");
    }

    fn last_event(&self) -> ProvenanceEvent {
        ProvenanceEvent::from_bytes(&self.host.last_event().unwrap().payload).unwrap()
    }
}

fn tv_body(id: &str, status: &str) -> String {
    json!({
        "thingVisorID": id,
        "tvDescription": "weather",
        "status": status,
        "params": "",
        "additionalServicesNames": null,
    })
    .to_string()
}

fn vthing_body(id: &str) -> String {
    json!({ "label": "temp", "id": id, "type": "sensor" }).to_string()
}

#[test]
fn thing_visor_lifecycle_through_raw_calls() {
    let mut node = Node::new();

    node.write(&["CreateThingVisor", "tv1", &tv_body("tv1", "pending")]);
    let tv = node.read(&["GetThingVisor", "tv1"]);
    assert_eq!(tv["status"], "pending");
    assert_eq!(tv["vThings"], json!([]));
    assert_eq!(tv["additionalServicesNames"], json!([]));

    node.write(&["UpdateThingVisor", "tv1", &tv_body("tv1", "running")]);
    node.write(&["AddVThingToThingVisor", "tv1", &vthing_body("tv1/t1")]);
    assert_eq!(node.read(&["GetVThingByID", "tv1/t1"])["type"], "sensor");

    node.write(&["DeleteThingVisor", "tv1", "tv1/t1"]);

    let err = node.call(&["GetThingVisor", "tv1"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(node.read(&["GetAllVThings"]), json!([]));
}

#[test]
fn partial_update_treats_empty_strings_as_untouched() {
    let mut node = Node::new();
    node.write(&["CreateThingVisor", "tv1", &tv_body("tv1", "running")]);

    node.write(&["UpdateThingVisorPartial", "tv1", "", "rate=5"]);

    let tv = node.read(&["GetThingVisor", "tv1"]);
    assert_eq!(tv["tvDescription"], "weather");
    assert_eq!(tv["params"], "rate=5");
}

#[test]
fn delete_vthing_takes_the_vthing_body() {
    let mut node = Node::new();
    node.write(&["CreateThingVisor", "tv1", &tv_body("tv1", "running")]);
    node.write(&["AddVThingToThingVisor", "tv1", &vthing_body("tv1/t1")]);

    node.write(&["DeleteVThingFromThingVisor", "tv1", &vthing_body("tv1/t1")]);

    assert_eq!(node.read(&["GetAllVThingOfThingVisor", "tv1"]), json!([]));
    let event = node.last_event();
    assert_eq!(event.event_name, "DeleteVThingFromThingVisor");
    assert_eq!(event.graph_nodes.len(), 2);
}

#[test]
fn delete_thing_visor_accepts_keys_from_the_keyed_read() {
    let mut node = Node::new();
    node.write(&["CreateThingVisor", "tv1", &tv_body("tv1", "running")]);
    node.write(&["AddVThingToThingVisor", "tv1", &vthing_body("tv1/t1")]);
    node.write(&["AddVThingToThingVisor", "tv1", &vthing_body("tv1/t2")]);

    let keyed = node.read(&["GetThingVisorWithVThingKeys", "tv1"]);
    let keys: Vec<String> = keyed["vThings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(keyed["thingVisor"]["thingVisorID"], "tv1");

    let mut args = vec!["DeleteThingVisor", "tv1"];
    args.extend(keys.iter().map(String::as_str));
    node.write(&args);

    assert_eq!(node.read(&["GetAllThingVisors"]), json!([]));
    assert_eq!(node.last_event().graph_nodes.len(), 4);
}

#[test]
fn silo_scenario_through_raw_calls() {
    let mut node = Node::new();
    node.write(&["AddFlavour", "flavourX"]);
    node.write(&["AddVirtualSilo", "tenantA_flavourX", "flavourX"]);

    let vthings = ["tv1/t1", "tv1/t2", "tv2/t1"];
    for id in vthings {
        let body = json!({
            "tenantID": "tenantA",
            "vSiloID": "tenantA_flavourX",
            "creationTime": "2024-05-01T12:00:00Z",
            "vThingID": id,
        })
        .to_string();
        node.write(&["AddVThingVSilo", "tenantA_flavourX", id, &body]);
    }
    assert_eq!(
        node.read(&["GetVThingVSilosByTenantID", "tenantA"])
            .as_array()
            .unwrap()
            .len(),
        3
    );
    assert_eq!(
        node.read(&["GetVThingVSilo", "tenantA_flavourX", "tv1/t2"])["vThingID"],
        "tv1/t2"
    );

    let mut args = vec!["DeleteVirtualSilo", "tenantA_flavourX"];
    args.extend(vthings);
    node.write(&args);

    assert_eq!(
        node.read(&["GetVThingVSilosByVSiloID", "tenantA_flavourX"]),
        json!([])
    );
    assert_eq!(node.read(&["GetVirtualSilosByTenantID", "tenantA"]), json!([]));
    assert_eq!(node.read(&["GetAllFlavours"])[0]["status"], "pending");
}

#[test]
fn malformed_calls_are_interface_errors() {
    let mut node = Node::new();

    for args in [
        &[][..],
        &["NoSuchOperation"][..],
        &["GetThingVisor"][..],
        &["GetThingVisor", "tv1", "extra"][..],
        &["DeleteThingVisor"][..],
    ] {
        let err = node.call(args).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidKey, "{args:?}");
        assert_eq!(err.origin, ErrorOrigin::Interface, "{args:?}");
    }
    assert!(node.host.events().is_empty());
}

#[test]
fn bodies_are_decoded_strictly() {
    let mut node = Node::new();

    for body in [
        "not json".to_string(),
        json!({ "thingVisorID": "tv1", "surprise": true }).to_string(),
        json!({ "thingVisorID": "tv1", "status": "sleeping" }).to_string(),
    ] {
        let err = node.call(&["CreateThingVisor", "tv1", &body]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization, "{body}");
    }
}

#[test]
fn rejected_provenance_rolls_back_the_write() {
    let mut node = Node::new();
    node.host.reject_events(true);

    let err = node.call(&["AddFlavour", "flavourX"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Store);
    assert_eq!(err.origin, ErrorOrigin::Provenance);

    node.host.reject_events(false);
    assert!(node.call(&["GetFlavour", "flavourX"]).unwrap_err().is_not_found());
}

#[test]
fn public_error_round_trips_through_candid_shape() {
    let err = Error::new(ErrorKind::InvalidState, ErrorOrigin::Lifecycle, "not running");

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "InvalidState");
    assert_eq!(json["origin"], "Lifecycle");
    assert_eq!(err.to_string(), "InvalidState: not running");
}
