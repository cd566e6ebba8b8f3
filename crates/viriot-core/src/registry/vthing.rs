use crate::{
    db::{key::KindTag, store::TxHost},
    error::InternalError,
    lifecycle,
    model::{ThingVisor, ThingVisorId, VThing, VThingId},
    operation::Operation,
    provenance::Node,
    registry::{RegistrySession, ensure_body_id, ensure_owner},
};

impl<H: TxHost + ?Sized> RegistrySession<'_, H> {
    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Attach a new vthing to a running thing visor.
    pub fn add_vthing_to_thing_visor(
        &mut self,
        tv_id: &str,
        body: VThing,
    ) -> Result<(), InternalError> {
        self.run(Operation::AddVThingToThingVisor, |s| {
            let tv_id = ThingVisorId::parse(tv_id)?;
            let vthing_id = body.vthing_id()?;

            let tv = s.repo::<ThingVisor>().require(&*s.host, &tv_id)?;
            lifecycle::require_running(&tv, "add vthing")?;
            ensure_owner(&tv_id, &vthing_id)?;

            s.repo::<VThing>().insert(&mut *s.host, &vthing_id, &body)?;

            let edges = s
                .edges()
                .from_user(Node::ThingVisor(&tv_id))
                .link(Node::ThingVisor(&tv_id), Node::VThing(&vthing_id));
            s.emit(Operation::AddVThingToThingVisor, edges)
        })
    }

    pub fn update_vthing_of_thing_visor(
        &mut self,
        vthing_id: &str,
        body: VThing,
    ) -> Result<(), InternalError> {
        self.run(Operation::UpdateVThingOfThingVisor, |s| {
            let vthing_id = VThingId::parse(vthing_id)?;
            ensure_body_id("vthing id", &vthing_id.to_string(), &body.id)?;

            s.repo::<VThing>().replace(&mut *s.host, &vthing_id, &body)?;

            let owner = vthing_id.thing_visor();
            let edges = s
                .edges()
                .from_user(Node::ThingVisor(owner))
                .link(Node::ThingVisor(owner), Node::VThing(&vthing_id));
            s.emit(Operation::UpdateVThingOfThingVisor, edges)
        })
    }

    /// Detach a vthing from a running thing visor; an absent vthing is a no-op
    /// and records no unlink edge.
    pub fn delete_vthing_from_thing_visor(
        &mut self,
        tv_id: &str,
        vthing_id: &str,
    ) -> Result<(), InternalError> {
        self.run(Operation::DeleteVThingFromThingVisor, |s| {
            let tv_id = ThingVisorId::parse(tv_id)?;
            let vthing_id = VThingId::parse(vthing_id)?;

            let tv = s.repo::<ThingVisor>().require(&*s.host, &tv_id)?;
            lifecycle::require_running(&tv, "delete vthing")?;
            ensure_owner(&tv_id, &vthing_id)?;

            let removed = s
                .repo::<VThing>()
                .delete_key(&mut *s.host, &vthing_id.key()?)?;

            let mut edges = s.edges();
            if removed {
                edges = edges.unlink(Node::ThingVisor(&tv_id), Node::VThing(&vthing_id));
            }
            s.emit(Operation::DeleteVThingFromThingVisor, edges)
        })
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn get_vthing_of_thing_visor(&mut self, vthing_id: &str) -> Result<VThing, InternalError> {
        self.run(Operation::GetVThingOfThingVisor, |s| {
            let vthing_id = VThingId::parse(vthing_id)?;

            s.repo::<VThing>().require(&*s.host, &vthing_id)
        })
    }

    pub fn get_vthing_by_id(&mut self, vthing_id: &str) -> Result<VThing, InternalError> {
        self.run(Operation::GetVThingById, |s| {
            let vthing_id = VThingId::parse(vthing_id)?;

            s.repo::<VThing>().require(&*s.host, &vthing_id)
        })
    }

    /// Every vthing of one thing visor. An unknown owner yields an empty list.
    pub fn get_all_vthing_of_thing_visor(
        &mut self,
        tv_id: &str,
    ) -> Result<Vec<VThing>, InternalError> {
        self.run(Operation::GetAllVThingOfThingVisor, |s| {
            let tv_id = ThingVisorId::parse(tv_id)?;

            Ok(s.vthings_of(&tv_id)?
                .into_iter()
                .map(|(_, vthing)| vthing)
                .collect())
        })
    }

    pub fn get_all_vthings(&mut self) -> Result<Vec<VThing>, InternalError> {
        self.run(Operation::GetAllVThings, |s| {
            Ok(s.repo::<VThing>()
                .scan_prefix(&*s.host, KindTag::VThing, &[])?
                .into_iter()
                .map(|(_, vthing)| vthing)
                .collect())
        })
    }
}
