//! Status state machine shared by thing visors and virtual silos.
//!
//! The registry only enforces two rules itself: children may be attached to
//! (or detached from) a parent that is running, and Stop moves a running
//! entity to stopping. Every other transition is reported by the
//! orchestrator through a full-document update.

use crate::{
    error::InternalError,
    model::{Status, ThingVisor, VirtualSilo},
};

///
/// Lifecycle
///

pub trait Lifecycle {
    const ENTITY: &'static str;

    fn lifecycle_id(&self) -> &str;

    fn status(&self) -> Status;

    fn set_status(&mut self, status: Status);
}

impl Lifecycle for ThingVisor {
    const ENTITY: &'static str = "thing visor";

    fn lifecycle_id(&self) -> &str {
        &self.thing_visor_id
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

impl Lifecycle for VirtualSilo {
    const ENTITY: &'static str = "virtual silo";

    fn lifecycle_id(&self) -> &str {
        &self.v_silo_id
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

///
/// Transition
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    pub from: Status,
    pub to: Status,
}

/// Fail unless the entity is running.
pub fn require_running<L: Lifecycle>(entity: &L, action: &str) -> Result<(), InternalError> {
    if entity.status().is_running() {
        return Ok(());
    }

    Err(InternalError::invalid_state(format!(
        "cannot {action}: {} {} is {}, not {}",
        L::ENTITY,
        entity.lifecycle_id(),
        entity.status(),
        Status::Running,
    )))
}

/// Move a running entity to stopping.
pub fn stop<L: Lifecycle>(entity: &mut L) -> Result<Transition, InternalError> {
    require_running(entity, "stop")?;

    let transition = Transition {
        from: entity.status(),
        to: Status::Stopping,
    };
    entity.set_status(transition.to);

    Ok(transition)
}

///
/// TESTS
///
