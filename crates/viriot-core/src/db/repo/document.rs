use crate::{
    db::key::{KeyError, StorageKey},
    model::{
        Flavour, FlavourId, Membership, MembershipId, ThingVisor, ThingVisorId, VSiloId, VThing,
        VThingId, VirtualSilo,
    },
};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Display;
use viriot_config::CollectionNames;

///
/// Document
///
/// A stored entity kind: its id type, key derivation, and home partition.
///

pub trait Document: Serialize + DeserializeOwned {
    const ENTITY: &'static str;

    type Id: Display;

    fn key(id: &Self::Id) -> Result<StorageKey, KeyError>;

    fn collection(names: &CollectionNames) -> &str;
}

impl Document for ThingVisor {
    const ENTITY: &'static str = "thing visor";

    type Id = ThingVisorId;

    fn key(id: &Self::Id) -> Result<StorageKey, KeyError> {
        id.key()
    }

    fn collection(names: &CollectionNames) -> &str {
        &names.thing_visors
    }
}

impl Document for VThing {
    const ENTITY: &'static str = "vthing";

    type Id = VThingId;

    fn key(id: &Self::Id) -> Result<StorageKey, KeyError> {
        id.key()
    }

    fn collection(names: &CollectionNames) -> &str {
        &names.vthings
    }
}

impl Document for Flavour {
    const ENTITY: &'static str = "flavour";

    type Id = FlavourId;

    fn key(id: &Self::Id) -> Result<StorageKey, KeyError> {
        id.key()
    }

    fn collection(names: &CollectionNames) -> &str {
        &names.flavours
    }
}

impl Document for VirtualSilo {
    const ENTITY: &'static str = "virtual silo";

    type Id = VSiloId;

    fn key(id: &Self::Id) -> Result<StorageKey, KeyError> {
        id.key()
    }

    fn collection(names: &CollectionNames) -> &str {
        &names.silos
    }
}

impl Document for Membership {
    const ENTITY: &'static str = "membership";

    type Id = MembershipId;

    fn key(id: &Self::Id) -> Result<StorageKey, KeyError> {
        id.key()
    }

    fn collection(names: &CollectionNames) -> &str {
        &names.memberships
    }
}
