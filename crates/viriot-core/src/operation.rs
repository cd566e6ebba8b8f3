use derive_more::Display;

///
/// Operation
///
/// Every externally invocable registry operation. The display form is the
/// wire name used for routing and as the provenance event name.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Operation {
    // thing visors
    CreateThingVisor,
    UpdateThingVisor,
    UpdateThingVisorPartial,
    GetThingVisor,
    GetAllThingVisors,
    StopThingVisor,
    DeleteThingVisor,
    GetThingVisorWithVThingKeys,

    // vthings
    AddVThingToThingVisor,
    UpdateVThingOfThingVisor,
    DeleteVThingFromThingVisor,
    GetVThingOfThingVisor,
    #[display("GetVThingByID")]
    GetVThingById,
    GetAllVThingOfThingVisor,
    GetAllVThings,

    // flavours
    AddFlavour,
    UpdateFlavour,
    DeleteFlavour,
    GetFlavour,
    GetAllFlavours,

    // virtual silos
    AddVirtualSilo,
    UpdateVirtualSilo,
    DeleteVirtualSilo,
    GetVirtualSilo,
    GetAllVirtualSilos,
    #[display("GetVirtualSilosByTenantID")]
    GetVirtualSilosByTenantId,

    // memberships
    AddVThingVSilo,
    DeleteVThingVSilo,
    GetVThingVSilo,
    #[display("GetVThingVSilosByVSiloID")]
    GetVThingVSilosByVSiloId,
    #[display("GetVThingVSilosByTenantID")]
    GetVThingVSilosByTenantId,
}

impl Operation {
    pub const ALL: [Self; 31] = [
        Self::CreateThingVisor,
        Self::UpdateThingVisor,
        Self::UpdateThingVisorPartial,
        Self::GetThingVisor,
        Self::GetAllThingVisors,
        Self::StopThingVisor,
        Self::DeleteThingVisor,
        Self::GetThingVisorWithVThingKeys,
        Self::AddVThingToThingVisor,
        Self::UpdateVThingOfThingVisor,
        Self::DeleteVThingFromThingVisor,
        Self::GetVThingOfThingVisor,
        Self::GetVThingById,
        Self::GetAllVThingOfThingVisor,
        Self::GetAllVThings,
        Self::AddFlavour,
        Self::UpdateFlavour,
        Self::DeleteFlavour,
        Self::GetFlavour,
        Self::GetAllFlavours,
        Self::AddVirtualSilo,
        Self::UpdateVirtualSilo,
        Self::DeleteVirtualSilo,
        Self::GetVirtualSilo,
        Self::GetAllVirtualSilos,
        Self::GetVirtualSilosByTenantId,
        Self::AddVThingVSilo,
        Self::DeleteVThingVSilo,
        Self::GetVThingVSilo,
        Self::GetVThingVSilosByVSiloId,
        Self::GetVThingVSilosByTenantId,
    ];

    /// Resolve a wire name back to an operation.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.to_string() == name)
    }

    /// Mutating operations emit exactly one provenance event; reads emit none.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::CreateThingVisor
                | Self::UpdateThingVisor
                | Self::UpdateThingVisorPartial
                | Self::StopThingVisor
                | Self::DeleteThingVisor
                | Self::AddVThingToThingVisor
                | Self::UpdateVThingOfThingVisor
                | Self::DeleteVThingFromThingVisor
                | Self::AddFlavour
                | Self::UpdateFlavour
                | Self::DeleteFlavour
                | Self::AddVirtualSilo
                | Self::UpdateVirtualSilo
                | Self::DeleteVirtualSilo
                | Self::AddVThingVSilo
                | Self::DeleteVThingVSilo
        )
    }
}
