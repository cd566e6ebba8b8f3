//! Module: router
//! Responsibility: map a raw call (`ctx.args()`) onto one registry operation.
//! Does not own: validation of ids or bodies beyond JSON decoding.
//!
//! `args[0]` names the operation; the remaining arguments are its string
//! parameters, with JSON bodies passed as strings. Reads return JSON bytes,
//! mutations return `None`.

use crate::error::{Error, ErrorKind, ErrorOrigin};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use viriot_core::{
    context::TxContext,
    db::store::TxHost,
    model::VThing,
    operation::Operation,
    registry::{Registry, RegistrySession},
};

/// Route one raw call through a registry session over `host`.
pub fn invoke<H>(
    registry: &Registry,
    host: &mut H,
    ctx: &TxContext,
) -> Result<Option<Vec<u8>>, Error>
where
    H: TxHost + ?Sized,
{
    let call = Call::parse(ctx.args())?;
    debug!(op = %call.op, params = call.params.len(), "routing call");

    let mut session = registry.session(host, ctx);
    dispatch(&mut session, &call)
}

///
/// Call
///

struct Call<'a> {
    op: Operation,
    params: &'a [String],
}

impl<'a> Call<'a> {
    fn parse(args: &'a [String]) -> Result<Self, Error> {
        let (name, params) = args
            .split_first()
            .ok_or_else(|| Error::interface("empty call: no operation name"))?;
        let op = Operation::from_name(name)
            .ok_or_else(|| Error::interface(format!("unknown operation '{name}'")))?;

        Ok(Self { op, params })
    }

    /// Require exactly `N` parameters.
    fn exact<const N: usize>(&self) -> Result<&'a [String; N], Error> {
        <&[String; N]>::try_from(self.params).map_err(|_| self.arity(N.to_string()))
    }

    /// Require at least `N` parameters; the rest are returned as the tail.
    fn at_least<const N: usize>(&self) -> Result<(&'a [String; N], &'a [String]), Error> {
        self.params
            .split_first_chunk::<N>()
            .ok_or_else(|| self.arity(format!("at least {N}")))
    }

    fn arity(&self, expected: String) -> Error {
        Error::interface(format!(
            "{} expects {expected} arguments, got {}",
            self.op,
            self.params.len()
        ))
    }
}

fn body<T: DeserializeOwned>(op: Operation, raw: &str) -> Result<T, Error> {
    serde_json::from_str(raw).map_err(|err| {
        Error::new(
            ErrorKind::Serialization,
            ErrorOrigin::Interface,
            format!("malformed {op} body: {err}"),
        )
    })
}

fn reply<T: Serialize>(value: &T) -> Result<Option<Vec<u8>>, Error> {
    serde_json::to_vec(value).map(Some).map_err(|err| {
        Error::new(
            ErrorKind::Serialization,
            ErrorOrigin::Serialize,
            err.to_string(),
        )
    })
}

/// An empty partial-update field means "leave untouched".
fn optional(raw: &str) -> Option<&str> {
    (!raw.is_empty()).then_some(raw)
}

#[allow(clippy::too_many_lines)]
fn dispatch<H>(s: &mut RegistrySession<'_, H>, call: &Call<'_>) -> Result<Option<Vec<u8>>, Error>
where
    H: TxHost + ?Sized,
{
    let op = call.op;

    match op {
        // thing visors
        Operation::CreateThingVisor => {
            let [id, raw] = call.exact::<2>()?;
            s.create_thing_visor(id, body(op, raw)?)?;
        }
        Operation::UpdateThingVisor => {
            let [id, raw] = call.exact::<2>()?;
            s.update_thing_visor(id, body(op, raw)?)?;
        }
        Operation::UpdateThingVisorPartial => {
            let [id, description, params] = call.exact::<3>()?;
            s.update_thing_visor_partial(id, optional(description), optional(params))?;
        }
        Operation::GetThingVisor => {
            let [id] = call.exact::<1>()?;
            return reply(&s.get_thing_visor(id)?);
        }
        Operation::GetAllThingVisors => {
            call.exact::<0>()?;
            return reply(&s.get_all_thing_visors()?);
        }
        Operation::StopThingVisor => {
            let [id] = call.exact::<1>()?;
            s.stop_thing_visor(id)?;
        }
        Operation::DeleteThingVisor => {
            let ([id], children) = call.at_least::<1>()?;
            s.delete_thing_visor(id, children)?;
        }
        Operation::GetThingVisorWithVThingKeys => {
            let [id] = call.exact::<1>()?;
            return reply(&s.get_thing_visor_with_vthing_keys(id)?);
        }

        // vthings
        Operation::AddVThingToThingVisor => {
            let [tv_id, raw] = call.exact::<2>()?;
            s.add_vthing_to_thing_visor(tv_id, body(op, raw)?)?;
        }
        Operation::UpdateVThingOfThingVisor => {
            let [vthing_id, raw] = call.exact::<2>()?;
            s.update_vthing_of_thing_visor(vthing_id, body(op, raw)?)?;
        }
        Operation::DeleteVThingFromThingVisor => {
            let [tv_id, raw] = call.exact::<2>()?;
            let vthing: VThing = body(op, raw)?;
            s.delete_vthing_from_thing_visor(tv_id, &vthing.id)?;
        }
        Operation::GetVThingOfThingVisor => {
            let [vthing_id] = call.exact::<1>()?;
            return reply(&s.get_vthing_of_thing_visor(vthing_id)?);
        }
        Operation::GetVThingById => {
            let [vthing_id] = call.exact::<1>()?;
            return reply(&s.get_vthing_by_id(vthing_id)?);
        }
        Operation::GetAllVThingOfThingVisor => {
            let [tv_id] = call.exact::<1>()?;
            return reply(&s.get_all_vthing_of_thing_visor(tv_id)?);
        }
        Operation::GetAllVThings => {
            call.exact::<0>()?;
            return reply(&s.get_all_vthings()?);
        }

        // flavours
        Operation::AddFlavour => {
            let [id] = call.exact::<1>()?;
            s.add_flavour(id)?;
        }
        Operation::UpdateFlavour => {
            let [id, raw] = call.exact::<2>()?;
            s.update_flavour(id, body(op, raw)?)?;
        }
        Operation::DeleteFlavour => {
            let [id] = call.exact::<1>()?;
            s.delete_flavour(id)?;
        }
        Operation::GetFlavour => {
            let [id] = call.exact::<1>()?;
            return reply(&s.get_flavour(id)?);
        }
        Operation::GetAllFlavours => {
            call.exact::<0>()?;
            return reply(&s.get_all_flavours()?);
        }

        // virtual silos
        Operation::AddVirtualSilo => {
            let [vsilo_id, flavour_id] = call.exact::<2>()?;
            s.add_virtual_silo(vsilo_id, flavour_id)?;
        }
        Operation::UpdateVirtualSilo => {
            let [vsilo_id, raw] = call.exact::<2>()?;
            s.update_virtual_silo(vsilo_id, body(op, raw)?)?;
        }
        Operation::DeleteVirtualSilo => {
            let ([vsilo_id], vthing_ids) = call.at_least::<1>()?;
            s.delete_virtual_silo(vsilo_id, vthing_ids)?;
        }
        Operation::GetVirtualSilo => {
            let [vsilo_id] = call.exact::<1>()?;
            return reply(&s.get_virtual_silo(vsilo_id)?);
        }
        Operation::GetAllVirtualSilos => {
            call.exact::<0>()?;
            return reply(&s.get_all_virtual_silos()?);
        }
        Operation::GetVirtualSilosByTenantId => {
            let [tenant_id] = call.exact::<1>()?;
            return reply(&s.get_virtual_silos_by_tenant_id(tenant_id)?);
        }

        // memberships
        Operation::AddVThingVSilo => {
            let [vsilo_id, vthing_id, raw] = call.exact::<3>()?;
            s.add_vthing_vsilo(vsilo_id, vthing_id, body(op, raw)?)?;
        }
        Operation::DeleteVThingVSilo => {
            let [vsilo_id, vthing_id] = call.exact::<2>()?;
            s.delete_vthing_vsilo(vsilo_id, vthing_id)?;
        }
        Operation::GetVThingVSilo => {
            let [vsilo_id, vthing_id] = call.exact::<2>()?;
            return reply(&s.get_vthing_vsilo(vsilo_id, vthing_id)?);
        }
        Operation::GetVThingVSilosByVSiloId => {
            let [vsilo_id] = call.exact::<1>()?;
            return reply(&s.get_vthing_vsilos_by_vsilo_id(vsilo_id)?);
        }
        Operation::GetVThingVSilosByTenantId => {
            let [tenant_id] = call.exact::<1>()?;
            return reply(&s.get_vthing_vsilos_by_tenant_id(tenant_id)?);
        }
    }

    Ok(None)
}
