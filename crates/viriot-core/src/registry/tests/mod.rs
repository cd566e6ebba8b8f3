mod construction;
mod events;

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::Status,
    test_support::{Harness, edge_triples, membership, thing_visor, vthing},
};

fn edge(start: &str, end: &str, delete: bool) -> (String, String, bool) {
    (start.to_string(), end.to_string(), delete)
}

fn class_of<T: std::fmt::Debug>(result: Result<T, InternalError>) -> ErrorClass {
    result.unwrap_err().class
}

/// A running thing visor with the given local vthings attached.
fn running_with_vthings(h: &mut Harness, tv: &str, locals: &[&str]) {
    h.seed_thing_visor(tv, Status::Running);
    for local in locals {
        let id = format!("{tv}/{local}");
        h.tx(|s| s.add_vthing_to_thing_visor(tv, vthing(&id)))
            .unwrap();
    }
}

/// A pending silo with the given vthings attached.
fn silo_with_members(h: &mut Harness, silo: &str, vthings: &[&str]) {
    let (tenant, flavour) = silo.split_once('_').unwrap();
    h.tx(|s| s.add_virtual_silo(silo, flavour)).unwrap();
    for id in vthings {
        h.tx(|s| s.add_vthing_vsilo(silo, id, membership(tenant, silo, id)))
            .unwrap();
    }
}
