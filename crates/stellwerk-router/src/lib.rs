// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stellwerk — Native event routing core.
//
// Asynchronous callbacks from the native OS runtime arrive on arbitrary
// threads; UI-bound bridge objects live on the framework's main context.
// This crate owns the bookkeeping in between: which bridge instances are
// alive, which one is the elected main controller, which events are still
// waiting for a receiver, and how a raw native event becomes a typed sink
// call on the right object — exactly once, never on a dead one.

pub mod dispatcher;
pub mod election;
pub mod pending;
pub mod registry;
pub mod sink;

pub use dispatcher::{EventPump, EventRouter, InstanceHandle};
pub use election::MainControllerSlot;
pub use pending::PendingQueue;
pub use registry::InstanceRegistry;
pub use sink::EventSink;
