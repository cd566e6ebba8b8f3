use crate::db::key::{KeyError, KindTag, StorageKey, validate_segment};
use derive_more::{Deref, Display};
use std::{fmt, str::FromStr};

const VTHING_SEPARATOR: char = '/';
const VSILO_SEPARATOR: char = '_';

fn reject_separator(what: &'static str, value: &str, separator: char) -> Result<(), KeyError> {
    if value.contains(separator) {
        return Err(KeyError::ContainsSeparator {
            what,
            value: value.to_string(),
            separator,
        });
    }

    Ok(())
}

fn split(
    what: &'static str,
    value: &str,
    separator: char,
) -> Result<(String, String), KeyError> {
    value
        .split_once(separator)
        .map(|(head, tail)| (head.to_string(), tail.to_string()))
        .ok_or_else(|| KeyError::MissingSeparator {
            what,
            value: value.to_string(),
            separator,
        })
}

///
/// ThingVisorId
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ThingVisorId(String);

impl ThingVisorId {
    pub fn parse(value: &str) -> Result<Self, KeyError> {
        validate_segment("thing visor id", value)?;
        reject_separator("thing visor id", value, VTHING_SEPARATOR)?;

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> Result<StorageKey, KeyError> {
        StorageKey::simple("thing visor id", &self.0)
    }
}

impl FromStr for ThingVisorId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// VThingId
///
/// `{thingVisorId}/{localId}`; the owner is everything before the first `/`.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VThingId {
    thing_visor: ThingVisorId,
    local: String,
}

impl VThingId {
    pub fn parse(value: &str) -> Result<Self, KeyError> {
        validate_segment("vthing id", value)?;
        let (owner, local) = split("vthing id", value, VTHING_SEPARATOR)?;
        let thing_visor = ThingVisorId::parse(&owner)?;
        validate_segment("vthing local id", &local)?;

        Ok(Self { thing_visor, local })
    }

    pub fn new(thing_visor: ThingVisorId, local: &str) -> Result<Self, KeyError> {
        validate_segment("vthing local id", local)?;

        Ok(Self {
            thing_visor,
            local: local.to_string(),
        })
    }

    #[must_use]
    pub const fn thing_visor(&self) -> &ThingVisorId {
        &self.thing_visor
    }

    #[must_use]
    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn key(&self) -> Result<StorageKey, KeyError> {
        StorageKey::composite(KindTag::VThing, &[self.thing_visor.as_str(), &self.local])
    }

    /// Recover the logical id from an encoded vthing key.
    pub fn from_key(key: &StorageKey) -> Result<Self, KeyError> {
        let segments = key.decode_as(KindTag::VThing)?;

        Self::new(ThingVisorId::parse(segments[0])?, segments[1])
    }
}

impl fmt::Display for VThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{VTHING_SEPARATOR}{}", self.thing_visor, self.local)
    }
}

impl FromStr for VThingId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// FlavourId
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FlavourId(String);

impl FlavourId {
    pub fn parse(value: &str) -> Result<Self, KeyError> {
        validate_segment("flavour id", value)?;

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> Result<StorageKey, KeyError> {
        StorageKey::simple("flavour id", &self.0)
    }
}

impl FromStr for FlavourId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// TenantId
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(value: &str) -> Result<Self, KeyError> {
        validate_segment("tenant id", value)?;
        reject_separator("tenant id", value, VSILO_SEPARATOR)?;

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TenantId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// VSiloId
///
/// `{tenantId}_{flavourId}`; the tenant is everything before the first `_`.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VSiloId {
    tenant: TenantId,
    flavour: FlavourId,
}

impl VSiloId {
    pub fn parse(value: &str) -> Result<Self, KeyError> {
        validate_segment("vsilo id", value)?;
        let (tenant, flavour) = split("vsilo id", value, VSILO_SEPARATOR)?;

        Ok(Self {
            tenant: TenantId::parse(&tenant)?,
            flavour: FlavourId::parse(&flavour)?,
        })
    }

    #[must_use]
    pub const fn new(tenant: TenantId, flavour: FlavourId) -> Self {
        Self { tenant, flavour }
    }

    #[must_use]
    pub const fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    #[must_use]
    pub const fn flavour(&self) -> &FlavourId {
        &self.flavour
    }

    pub fn key(&self) -> Result<StorageKey, KeyError> {
        StorageKey::composite(
            KindTag::VirtualSilo,
            &[self.tenant.as_str(), self.flavour.as_str()],
        )
    }

    /// Key of one membership row under this silo.
    pub fn membership_key(&self, vthing: &VThingId) -> Result<StorageKey, KeyError> {
        StorageKey::composite(
            KindTag::Membership,
            &[
                self.tenant.as_str(),
                self.flavour.as_str(),
                &vthing.to_string(),
            ],
        )
    }
}

impl fmt::Display for VSiloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{VSILO_SEPARATOR}{}", self.tenant, self.flavour)
    }
}

impl FromStr for VSiloId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// MembershipId
///
/// One vthing attached to one silo.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MembershipId {
    pub silo: VSiloId,
    pub vthing: VThingId,
}

impl MembershipId {
    #[must_use]
    pub const fn new(silo: VSiloId, vthing: VThingId) -> Self {
        Self { silo, vthing }
    }

    pub fn key(&self) -> Result<StorageKey, KeyError> {
        self.silo.membership_key(&self.vthing)
    }
}

impl fmt::Display for MembershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.vthing, self.silo)
    }
}
