use crate::{
    db::{
        key::{KindTag, StorageKey},
        store::TxHost,
    },
    error::InternalError,
    model::{Membership, MembershipId, TenantId, VSiloId, VThingId, VirtualSilo},
    operation::Operation,
    provenance::Node,
    registry::{RegistrySession, ensure_body_id},
};

impl<H: TxHost + ?Sized> RegistrySession<'_, H> {
    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Attach a vthing to an existing silo.
    ///
    /// The body must name the same silo, tenant and vthing it is stored under.
    pub fn add_vthing_vsilo(
        &mut self,
        vsilo_id: &str,
        vthing_id: &str,
        body: Membership,
    ) -> Result<(), InternalError> {
        self.run(Operation::AddVThingVSilo, |s| {
            let id = MembershipId::new(VSiloId::parse(vsilo_id)?, VThingId::parse(vthing_id)?);
            ensure_body_id("vSiloID", vsilo_id, &body.v_silo_id)?;
            ensure_body_id("vThingID", vthing_id, &body.v_thing_id)?;
            ensure_body_id("tenantID", id.silo.tenant().as_str(), &body.tenant_id)?;

            s.repo::<VirtualSilo>().require(&*s.host, &id.silo)?;
            s.repo::<Membership>().insert(&mut *s.host, &id, &body)?;

            let edges = s
                .edges()
                .from_user(Node::Silo(&id.silo))
                .link(Node::Silo(&id.silo), Node::VThing(&id.vthing));
            s.emit(Operation::AddVThingVSilo, edges)
        })
    }

    /// Detach a vthing from a silo; an absent membership is a no-op and
    /// records no unlink edge.
    pub fn delete_vthing_vsilo(
        &mut self,
        vsilo_id: &str,
        vthing_id: &str,
    ) -> Result<(), InternalError> {
        self.run(Operation::DeleteVThingVSilo, |s| {
            let id = MembershipId::new(VSiloId::parse(vsilo_id)?, VThingId::parse(vthing_id)?);

            let removed = s
                .repo::<Membership>()
                .delete_key(&mut *s.host, &id.key()?)?;

            let mut edges = s.edges().from_user(Node::Silo(&id.silo));
            if removed {
                edges = edges.unlink(Node::Silo(&id.silo), Node::VThing(&id.vthing));
            }
            s.emit(Operation::DeleteVThingVSilo, edges)
        })
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn get_vthing_vsilo(
        &mut self,
        vsilo_id: &str,
        vthing_id: &str,
    ) -> Result<Membership, InternalError> {
        self.run(Operation::GetVThingVSilo, |s| {
            let id = MembershipId::new(VSiloId::parse(vsilo_id)?, VThingId::parse(vthing_id)?);

            s.repo::<Membership>().require(&*s.host, &id)
        })
    }

    /// Every membership of one silo. An unknown silo yields an empty list.
    pub fn get_vthing_vsilos_by_vsilo_id(
        &mut self,
        vsilo_id: &str,
    ) -> Result<Vec<Membership>, InternalError> {
        self.run(Operation::GetVThingVSilosByVSiloId, |s| {
            let silo_id = VSiloId::parse(vsilo_id)?;

            Ok(s.memberships_of(&silo_id)?
                .into_iter()
                .map(|(_, membership)| membership)
                .collect())
        })
    }

    /// Every membership across all silos of one tenant.
    pub fn get_vthing_vsilos_by_tenant_id(
        &mut self,
        tenant_id: &str,
    ) -> Result<Vec<Membership>, InternalError> {
        self.run(Operation::GetVThingVSilosByTenantId, |s| {
            let tenant_id = TenantId::parse(tenant_id)?;

            Ok(s.repo::<Membership>()
                .scan_prefix(&*s.host, KindTag::Membership, &[tenant_id.as_str()])?
                .into_iter()
                .map(|(_, membership)| membership)
                .collect())
        })
    }

    pub(super) fn memberships_of(
        &self,
        silo_id: &VSiloId,
    ) -> Result<Vec<(StorageKey, Membership)>, InternalError> {
        self.repo::<Membership>().scan_prefix(
            &*self.host,
            KindTag::Membership,
            &[silo_id.tenant().as_str(), silo_id.flavour().as_str()],
        )
    }
}
