use crate::{
    db::{key::KeyRange, store::TxHost},
    error::InternalError,
    model::{Flavour, FlavourId},
    operation::Operation,
    provenance::Node,
    registry::{RegistrySession, ensure_body_id},
};

impl<H: TxHost + ?Sized> RegistrySession<'_, H> {
    /// Register a pending flavour; the template itself arrives via update.
    pub fn add_flavour(&mut self, id: &str) -> Result<(), InternalError> {
        self.run(Operation::AddFlavour, |s| {
            let flavour_id = FlavourId::parse(id)?;
            let flavour = Flavour::pending(&flavour_id, &s.ctx.timestamp_rfc3339());

            s.repo::<Flavour>().insert(&mut *s.host, &flavour_id, &flavour)?;

            let edges = s.edges().from_user(Node::Flavour(&flavour_id));
            s.emit(Operation::AddFlavour, edges)
        })
    }

    pub fn update_flavour(&mut self, id: &str, body: Flavour) -> Result<(), InternalError> {
        self.run(Operation::UpdateFlavour, |s| {
            let flavour_id = FlavourId::parse(id)?;
            ensure_body_id("flavourID", id, &body.flavour_id)?;

            s.repo::<Flavour>().replace(&mut *s.host, &flavour_id, &body)?;

            let edges = s.edges().from_user(Node::Flavour(&flavour_id));
            s.emit(Operation::UpdateFlavour, edges)
        })
    }

    pub fn delete_flavour(&mut self, id: &str) -> Result<(), InternalError> {
        self.run(Operation::DeleteFlavour, |s| {
            let flavour_id = FlavourId::parse(id)?;

            s.repo::<Flavour>().remove(&mut *s.host, &flavour_id)?;

            let edges = s.edges().from_user_removed(Node::Flavour(&flavour_id));
            s.emit(Operation::DeleteFlavour, edges)
        })
    }

    pub fn get_flavour(&mut self, id: &str) -> Result<Flavour, InternalError> {
        self.run(Operation::GetFlavour, |s| {
            let flavour_id = FlavourId::parse(id)?;

            s.repo::<Flavour>().require(&*s.host, &flavour_id)
        })
    }

    pub fn get_all_flavours(&mut self) -> Result<Vec<Flavour>, InternalError> {
        self.run(Operation::GetAllFlavours, |s| {
            Ok(s.repo::<Flavour>()
                .scan(&*s.host, &KeyRange::simple_keys())?
                .into_iter()
                .map(|(_, flavour)| flavour)
                .collect())
        })
    }
}
