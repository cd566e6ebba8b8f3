use crate::{
    db::{
        key::{KindTag, StorageKey},
        store::TxHost,
    },
    error::{ErrorOrigin, InternalError},
    model::{FlavourId, Membership, TenantId, VSiloId, VThingId, VirtualSilo},
    operation::Operation,
    provenance::Node,
    registry::{RegistrySession, ensure_body_id},
};
use std::collections::BTreeSet;

impl<H: TxHost + ?Sized> RegistrySession<'_, H> {
    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Register a pending silo of `flavour_id` for the tenant named in the id.
    pub fn add_virtual_silo(
        &mut self,
        vsilo_id: &str,
        flavour_id: &str,
    ) -> Result<(), InternalError> {
        self.run(Operation::AddVirtualSilo, |s| {
            let silo_id = VSiloId::parse(vsilo_id)?;
            let flavour_id = FlavourId::parse(flavour_id)?;
            if silo_id.flavour() != &flavour_id {
                return Err(InternalError::invalid_key(
                    ErrorOrigin::Key,
                    format!("virtual silo {silo_id} is not of flavour {flavour_id}"),
                ));
            }

            let silo = VirtualSilo::pending(&silo_id, &s.ctx.timestamp_rfc3339());
            s.repo::<VirtualSilo>().insert(&mut *s.host, &silo_id, &silo)?;

            let edges = s
                .edges()
                .from_user(Node::Silo(&silo_id))
                .link(Node::Flavour(&flavour_id), Node::Silo(&silo_id));
            s.emit(Operation::AddVirtualSilo, edges)
        })
    }

    /// Replace the whole document. Its silo, tenant and flavour ids must
    /// agree with `vsilo_id`.
    pub fn update_virtual_silo(
        &mut self,
        vsilo_id: &str,
        body: VirtualSilo,
    ) -> Result<(), InternalError> {
        self.run(Operation::UpdateVirtualSilo, |s| {
            let silo_id = VSiloId::parse(vsilo_id)?;
            ensure_body_id("vSiloID", vsilo_id, &body.v_silo_id)?;
            ensure_body_id("tenantID", silo_id.tenant().as_str(), &body.tenant_id)?;
            ensure_body_id("flavourID", silo_id.flavour().as_str(), &body.flavour_id)?;

            s.repo::<VirtualSilo>().replace(&mut *s.host, &silo_id, &body)?;

            let edges = s.edges().from_user(Node::Silo(&silo_id));
            s.emit(Operation::UpdateVirtualSilo, edges)
        })
    }

    /// Delete a silo and every membership under it.
    ///
    /// Supplied vthing ids must be well formed; any that are no longer
    /// attached are skipped. Remaining memberships are swept by prefix.
    pub fn delete_virtual_silo<C>(
        &mut self,
        vsilo_id: &str,
        vthing_ids: &[C],
    ) -> Result<(), InternalError>
    where
        C: AsRef<str>,
    {
        self.run(Operation::DeleteVirtualSilo, |s| {
            let silo_id = VSiloId::parse(vsilo_id)?;
            let silos = s.repo::<VirtualSilo>();
            let memberships = s.repo::<Membership>();
            silos.require(&*s.host, &silo_id)?;

            let mut explicit = BTreeSet::new();
            for vthing_id in vthing_ids {
                let vthing_id = VThingId::parse(vthing_id.as_ref())?;
                explicit.insert(silo_id.membership_key(&vthing_id)?);
            }

            let existing: Vec<StorageKey> = s
                .memberships_of(&silo_id)?
                .into_iter()
                .map(|(key, _)| key)
                .collect();

            let mut removed = Vec::with_capacity(existing.len());
            for key in &existing {
                memberships.delete_key(&mut *s.host, key)?;
                removed.push(member_vthing(key)?);
            }
            for key in explicit.iter().filter(|&key| !existing.contains(key)) {
                memberships.delete_key(&mut *s.host, key)?;
            }
            silos.delete_key(&mut *s.host, &silo_id.key()?)?;
            s.debug_log(format!(
                "virtual silo {silo_id}: removed with {} memberships",
                removed.len()
            ));

            let edges = s
                .edges()
                .from_user_removed(Node::Silo(&silo_id))
                .unlink(Node::Flavour(silo_id.flavour()), Node::Silo(&silo_id))
                .unlink_each(Node::Silo(&silo_id), &removed);
            s.emit(Operation::DeleteVirtualSilo, edges)
        })
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn get_virtual_silo(&mut self, vsilo_id: &str) -> Result<VirtualSilo, InternalError> {
        self.run(Operation::GetVirtualSilo, |s| {
            let silo_id = VSiloId::parse(vsilo_id)?;

            s.repo::<VirtualSilo>().require(&*s.host, &silo_id)
        })
    }

    pub fn get_all_virtual_silos(&mut self) -> Result<Vec<VirtualSilo>, InternalError> {
        self.run(Operation::GetAllVirtualSilos, |s| s.silos_with_prefix(&[]))
    }

    pub fn get_virtual_silos_by_tenant_id(
        &mut self,
        tenant_id: &str,
    ) -> Result<Vec<VirtualSilo>, InternalError> {
        self.run(Operation::GetVirtualSilosByTenantId, |s| {
            let tenant_id = TenantId::parse(tenant_id)?;

            s.silos_with_prefix(&[tenant_id.as_str()])
        })
    }

    fn silos_with_prefix(&self, segments: &[&str]) -> Result<Vec<VirtualSilo>, InternalError> {
        Ok(self
            .repo::<VirtualSilo>()
            .scan_prefix(&*self.host, KindTag::VirtualSilo, segments)?
            .into_iter()
            .map(|(_, silo)| silo)
            .collect())
    }
}

/// The vthing id segment of a membership key.
fn member_vthing(key: &StorageKey) -> Result<String, InternalError> {
    let segments = key.decode_as(KindTag::Membership)?;

    Ok(segments[2].to_string())
}
