use crate::{
    db::{
        key::{KEY_DELIMITER, KeyRange, KindTag, StorageKey},
        store::TxHost,
    },
    error::InternalError,
    lifecycle,
    model::{
        KeyedVThing, ThingVisor, ThingVisorDetail, ThingVisorId, ThingVisorWithVThingKeys, VThing,
        VThingId,
    },
    operation::Operation,
    provenance::Node,
    registry::{RegistrySession, ensure_body_id, ensure_owner},
};
use std::collections::{BTreeMap, BTreeSet};

impl<H: TxHost + ?Sized> RegistrySession<'_, H> {
    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    pub fn create_thing_visor(&mut self, id: &str, body: ThingVisor) -> Result<(), InternalError> {
        self.run(Operation::CreateThingVisor, |s| {
            let tv_id = ThingVisorId::parse(id)?;
            ensure_body_id("thingVisorID", id, &body.thing_visor_id)?;

            s.repo::<ThingVisor>().insert(&mut *s.host, &tv_id, &body)?;

            let edges = s.edges().from_user(Node::ThingVisor(&tv_id));
            s.emit(Operation::CreateThingVisor, edges)
        })
    }

    /// Replace the whole document. Status is taken verbatim from the body.
    pub fn update_thing_visor(&mut self, id: &str, body: ThingVisor) -> Result<(), InternalError> {
        self.run(Operation::UpdateThingVisor, |s| {
            let tv_id = ThingVisorId::parse(id)?;
            ensure_body_id("thingVisorID", id, &body.thing_visor_id)?;

            s.repo::<ThingVisor>().replace(&mut *s.host, &tv_id, &body)?;

            let edges = s.edges().from_user(Node::ThingVisor(&tv_id));
            s.emit(Operation::UpdateThingVisor, edges)
        })
    }

    /// Merge only the supplied fields into the stored document.
    pub fn update_thing_visor_partial(
        &mut self,
        id: &str,
        description: Option<&str>,
        params: Option<&str>,
    ) -> Result<(), InternalError> {
        self.run(Operation::UpdateThingVisorPartial, |s| {
            let tv_id = ThingVisorId::parse(id)?;
            let repo = s.repo::<ThingVisor>();
            let mut tv = repo.require(&*s.host, &tv_id)?;

            if let Some(description) = description {
                tv.tv_description = description.to_string();
            }
            if let Some(params) = params {
                tv.params = params.to_string();
            }
            repo.save(&mut *s.host, &tv_id, &tv)?;

            let edges = s.edges().from_user(Node::ThingVisor(&tv_id));
            s.emit(Operation::UpdateThingVisorPartial, edges)
        })
    }

    pub fn stop_thing_visor(&mut self, id: &str) -> Result<(), InternalError> {
        self.run(Operation::StopThingVisor, |s| {
            let tv_id = ThingVisorId::parse(id)?;
            let repo = s.repo::<ThingVisor>();
            let mut tv = repo.require(&*s.host, &tv_id)?;

            let transition = lifecycle::stop(&mut tv)?;
            repo.save(&mut *s.host, &tv_id, &tv)?;
            s.debug_log(format!(
                "thing visor {tv_id}: {} -> {}",
                transition.from, transition.to
            ));

            let edges = s.edges().from_user(Node::ThingVisor(&tv_id));
            s.emit(Operation::StopThingVisor, edges)
        })
    }

    /// Delete a thing visor and every vthing it owns.
    ///
    /// The parent must exist. Child references may be logical vthing ids or
    /// encoded keys; each must belong to this thing visor, but a child that
    /// is already gone is skipped. Remaining children are swept by prefix.
    pub fn delete_thing_visor<C>(&mut self, id: &str, children: &[C]) -> Result<(), InternalError>
    where
        C: AsRef<str>,
    {
        self.run(Operation::DeleteThingVisor, |s| {
            let tv_id = ThingVisorId::parse(id)?;
            let tvs = s.repo::<ThingVisor>();
            let vthings = s.repo::<VThing>();
            tvs.require(&*s.host, &tv_id)?;

            let mut explicit = BTreeSet::new();
            for child in children {
                explicit.insert(child_key(&tv_id, child.as_ref())?);
            }

            // read the full child set before the first delete
            let existing: Vec<StorageKey> = vthings
                .scan_prefix(&*s.host, KindTag::VThing, &[tv_id.as_str()])?
                .into_iter()
                .map(|(key, _)| key)
                .collect();

            let mut removed = Vec::with_capacity(existing.len());
            for key in &existing {
                vthings.delete_key(&mut *s.host, key)?;
                removed.push(VThingId::from_key(key)?);
            }
            for key in explicit.iter().filter(|&key| !existing.contains(key)) {
                vthings.delete_key(&mut *s.host, key)?;
            }
            tvs.delete_key(&mut *s.host, &tv_id.key()?)?;
            s.debug_log(format!(
                "thing visor {tv_id}: removed with {} vthings",
                removed.len()
            ));

            let edges = s
                .edges()
                .from_user_removed(Node::ThingVisor(&tv_id))
                .unlink_each(Node::ThingVisor(&tv_id), &removed);
            s.emit(Operation::DeleteThingVisor, edges)
        })
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn get_thing_visor(&mut self, id: &str) -> Result<ThingVisorDetail, InternalError> {
        self.run(Operation::GetThingVisor, |s| {
            let tv_id = ThingVisorId::parse(id)?;
            let thing_visor = s.repo::<ThingVisor>().require(&*s.host, &tv_id)?;
            let v_things = s
                .vthings_of(&tv_id)?
                .into_iter()
                .map(|(_, vthing)| vthing)
                .collect();

            Ok(ThingVisorDetail {
                thing_visor,
                v_things,
            })
        })
    }

    /// Every thing visor, each with exactly the vthings it owns.
    pub fn get_all_thing_visors(&mut self) -> Result<Vec<ThingVisorDetail>, InternalError> {
        self.run(Operation::GetAllThingVisors, |s| {
            let mut by_owner: BTreeMap<ThingVisorId, Vec<VThing>> = BTreeMap::new();
            let vthings = s
                .repo::<VThing>()
                .scan_prefix(&*s.host, KindTag::VThing, &[])?;
            for (key, vthing) in vthings {
                let owner = VThingId::from_key(&key)?.thing_visor().clone();
                by_owner.entry(owner).or_default().push(vthing);
            }

            let thing_visors = s
                .repo::<ThingVisor>()
                .scan(&*s.host, &KeyRange::simple_keys())?;

            let mut out = Vec::with_capacity(thing_visors.len());
            for (key, thing_visor) in thing_visors {
                let owner = ThingVisorId::parse(key.as_str())?;
                out.push(ThingVisorDetail {
                    thing_visor,
                    v_things: by_owner.remove(&owner).unwrap_or_default(),
                });
            }

            Ok(out)
        })
    }

    /// A thing visor plus each vthing's encoded key, for DeleteThingVisor.
    pub fn get_thing_visor_with_vthing_keys(
        &mut self,
        id: &str,
    ) -> Result<ThingVisorWithVThingKeys, InternalError> {
        self.run(Operation::GetThingVisorWithVThingKeys, |s| {
            let tv_id = ThingVisorId::parse(id)?;
            let thing_visor = s.repo::<ThingVisor>().require(&*s.host, &tv_id)?;
            let v_things = s
                .vthings_of(&tv_id)?
                .into_iter()
                .map(|(key, v_thing)| KeyedVThing {
                    key: key.as_str().to_string(),
                    v_thing,
                })
                .collect();

            Ok(ThingVisorWithVThingKeys {
                thing_visor,
                v_things,
            })
        })
    }

    pub(super) fn vthings_of(
        &self,
        tv_id: &ThingVisorId,
    ) -> Result<Vec<(StorageKey, VThing)>, InternalError> {
        self.repo::<VThing>()
            .scan_prefix(&*self.host, KindTag::VThing, &[tv_id.as_str()])
    }
}

/// Resolve one child reference to the key of a vthing owned by `tv_id`.
fn child_key(tv_id: &ThingVisorId, child: &str) -> Result<StorageKey, InternalError> {
    let vthing_id = if child.starts_with(KEY_DELIMITER) {
        VThingId::from_key(&StorageKey::parse(child)?)?
    } else {
        VThingId::parse(child)?
    };

    ensure_owner(tv_id, &vthing_id)?;

    Ok(vthing_id.key()?)
}
