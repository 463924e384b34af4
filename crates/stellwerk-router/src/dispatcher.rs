// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event dispatch: the single entry point for every asynchronous native
// event, and the pump that marshals deliveries onto the framework's main
// context.
//
// ## Locking discipline
//
// One mutex guards registry + pending queue + election slot together.
// Registration, election, and dispatch linearize on it — a lookup never
// observes a half-updated table. The lock is held only for table
// mutation/lookup; sink methods run strictly after it is released, so a
// handler may re-enter the router without deadlocking.
//
// ## Delivery path
//
// `dispatch` resolves target *ids* under the lock and pushes
// `(id, event)` records onto an unbounded channel. The main context
// drains that channel through `EventPump`, which re-validates each target
// against the registry at delivery time: an instance unregistered in the
// meantime is silently skipped, so nothing is ever dispatched to a dead
// object. The channel is ordered, and there is a single pump, so events
// of one kind reach a given target in arrival order.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use stellwerk_core::error::Result;
use stellwerk_core::types::{
    CorrelationKey, DeliveryPolicy, InstanceId, NativeEvent, PendingLaunch, PendingNotification,
};

use crate::election::MainControllerSlot;
use crate::pending::PendingQueue;
use crate::registry::InstanceRegistry;
use crate::sink::EventSink;

/// Shared mutable state behind the router lock.
struct RouterCore {
    registry: InstanceRegistry,
    pending: PendingQueue,
    election: MainControllerSlot,
}

impl RouterCore {
    /// The main controller as seen by dispatch: elected, still alive, and
    /// enabled. The gating rule applies before any policy — a disabled
    /// main controller is invisible here.
    fn main_for_dispatch(&mut self) -> Option<InstanceId> {
        self.election
            .current(&self.registry)
            .filter(|id| self.registry.is_enabled(*id))
    }
}

/// What travels over the delivery channel.
#[derive(Debug)]
enum Outbound {
    Native(NativeEvent),
    EnabledChanged(bool),
    MainControllerChanged(bool),
}

#[derive(Debug)]
struct Delivery {
    target: InstanceId,
    outbound: Outbound,
}

/// Cheaply cloneable router handle.
///
/// The native callback layer holds one clone and feeds [`dispatch`]; the
/// UI layer holds another and manages instances. All state lives behind a
/// single shared lock, injected — nothing here is process-global.
///
/// [`dispatch`]: EventRouter::dispatch
#[derive(Clone)]
pub struct EventRouter {
    core: Arc<Mutex<RouterCore>>,
    delivery_tx: mpsc::UnboundedSender<Delivery>,
}

/// Drains queued deliveries on the framework's main context.
///
/// Exactly one pump exists per router. Hosts with their own event loop
/// call [`drain`](EventPump::drain) once per tick; tokio-driven hosts can
/// spawn [`run`](EventPump::run) on the main-context task instead.
pub struct EventPump {
    core: Arc<Mutex<RouterCore>>,
    delivery_rx: mpsc::UnboundedReceiver<Delivery>,
}

impl EventRouter {
    /// Create a router and its delivery pump.
    pub fn new() -> (Self, EventPump) {
        let core = Arc::new(Mutex::new(RouterCore {
            registry: InstanceRegistry::new(),
            pending: PendingQueue::new(),
            election: MainControllerSlot::new(),
        }));
        let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();

        let router = Self {
            core: Arc::clone(&core),
            delivery_tx,
        };
        let pump = EventPump { core, delivery_rx };
        (router, pump)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RouterCore> {
        self.core.lock().expect("router lock poisoned")
    }

    /// Register a UI-bound sink.
    ///
    /// The registry stores only a `Weak` handle — the caller keeps
    /// ownership of the `Arc` for as long as the object should receive
    /// events. The returned [`InstanceHandle`] unregisters on drop, which
    /// guarantees teardown runs on every exit path before the UI object's
    /// storage goes away.
    pub fn register(&self, sink: &Arc<dyn EventSink>) -> InstanceHandle {
        let id = self.lock().registry.register(sink);
        InstanceHandle {
            router: self.clone(),
            id,
        }
    }

    /// Remove an instance. Idempotent; also vacates the main-controller
    /// slot if this instance held it.
    pub fn unregister(&self, id: InstanceId) {
        let mut guard = self.lock();
        let core = &mut *guard;
        core.election.clear_if_current(&mut core.registry, id);
        core.registry.unregister(id);
    }

    /// Single entry point for every raw native event. Safe to call from
    /// any thread; never blocks on delivery and never invokes a sink
    /// itself.
    #[instrument(skip_all, fields(kind = event.kind()))]
    pub fn dispatch(&self, event: NativeEvent) {
        let targets = {
            let mut guard = self.lock();
            let core = &mut *guard;
            core.registry.sweep_dead();
            match event.policy() {
                DeliveryPolicy::Targeted => resolve_targeted(core, &event),
                DeliveryPolicy::MainControllerOnly => resolve_main_only(core, &event),
                DeliveryPolicy::Broadcast => core.registry.enabled_instances(),
            }
        };

        debug!(targets = targets.len(), "event routed");
        for target in targets {
            self.send(target, Outbound::Native(event.clone()));
        }
    }

    /// Enable or disable an instance. Disabled instances stay registered
    /// but receive nothing until re-enabled.
    pub fn set_enabled(&self, id: InstanceId, enabled: bool) -> Result<()> {
        let (changed, launches) = {
            let mut guard = self.lock();
            let core = &mut *guard;
            let changed = core.registry.set_enabled(id, enabled)?;
            // Re-enabling the sitting main controller releases any launch
            // events that queued up while it was gated off.
            let launches = if changed
                && enabled
                && core.election.current(&core.registry) == Some(id)
            {
                core.pending.drain_launches()
            } else {
                Vec::new()
            };
            (changed, launches)
        };

        if changed {
            self.send(id, Outbound::EnabledChanged(enabled));
        }
        for launch in launches {
            self.send(id, Outbound::Native(launch_event(launch)));
        }
        Ok(())
    }

    pub fn is_enabled(&self, id: InstanceId) -> bool {
        self.lock().registry.is_enabled(id)
    }

    /// Gate back/menu button delivery for an instance without touching its
    /// general `enabled` flag.
    pub fn set_button_events_enabled(&self, id: InstanceId, enabled: bool) -> Result<()> {
        self.lock().registry.set_button_events_enabled(id, enabled)
    }

    pub fn button_events_enabled(&self, id: InstanceId) -> bool {
        self.lock().registry.button_events_enabled(id)
    }

    /// Claim a correlation key for an instance and replay any pending
    /// notifications that were queued under that key, each exactly once.
    pub fn claim_notifications(&self, id: InstanceId, key: CorrelationKey) -> Result<()> {
        let drained = {
            let mut guard = self.lock();
            let core = &mut *guard;
            core.registry.set_correlation_key(id, key.clone())?;
            if core.registry.is_enabled(id) {
                core.pending.drain_matching(&key)
            } else {
                Vec::new()
            }
        };

        for pending in drained {
            let age = chrono::Utc::now() - pending.received_at;
            debug!(
                key = %pending.key,
                age_ms = age.num_milliseconds(),
                "replaying pending notification"
            );
            self.send(
                id,
                Outbound::Native(NativeEvent::NotificationReceived {
                    key: pending.key,
                    manager_name: pending.manager_name,
                }),
            );
        }
        Ok(())
    }

    /// Elect an instance as main controller. With `disable_others`, every
    /// other instance is force-disabled so only the elected one responds
    /// to environment events. Electing an unregistered id is rejected.
    pub fn set_main_controller(&self, id: InstanceId, disable_others: bool) -> Result<()> {
        let (outcome, launches) = {
            let mut guard = self.lock();
            let core = &mut *guard;
            let outcome = core.election.set_main(&mut core.registry, id, disable_others)?;
            let launches = if core.registry.is_enabled(id) {
                core.pending.drain_launches()
            } else {
                Vec::new()
            };
            (outcome, launches)
        };

        if let Some(previous) = outcome.previous {
            self.send(previous, Outbound::MainControllerChanged(false));
        }
        if outcome.changed {
            self.send(id, Outbound::MainControllerChanged(true));
        }
        for other in outcome.disabled {
            self.send(other, Outbound::EnabledChanged(false));
        }
        if !launches.is_empty() {
            info!(instance = %id, count = launches.len(), "replaying queued launch events");
        }
        for launch in launches {
            self.send(id, Outbound::Native(launch_event(launch)));
        }
        Ok(())
    }

    /// Relinquish main-controller status if `id` currently holds it.
    pub fn resign_main_controller(&self, id: InstanceId) -> Result<()> {
        let cleared = {
            let mut guard = self.lock();
            let core = &mut *guard;
            if !core.registry.contains(id) {
                return Err(stellwerk_core::error::StellwerkError::InvalidInstance(id));
            }
            core.election.clear_if_current(&mut core.registry, id)
        };
        if cleared {
            self.send(id, Outbound::MainControllerChanged(false));
        }
        Ok(())
    }

    /// The current main controller, or `None` before any election (or
    /// after its holder went away).
    pub fn main_controller(&self) -> Option<InstanceId> {
        let mut guard = self.lock();
        let core = &mut *guard;
        core.election.current(&core.registry)
    }

    pub fn is_main_controller(&self, id: InstanceId) -> bool {
        self.lock().registry.is_main_controller(id)
    }

    /// Whether `id` was registered more recently than its last
    /// unregistration.
    pub fn contains(&self, id: InstanceId) -> bool {
        self.lock().registry.contains(id)
    }

    pub fn instance_count(&self) -> usize {
        self.lock().registry.len()
    }

    /// Notifications still waiting for a claimant.
    pub fn pending_notification_count(&self) -> usize {
        self.lock().pending.notification_count()
    }

    /// Launch events still waiting for a main controller.
    pub fn pending_launch_count(&self) -> usize {
        self.lock().pending.launch_count()
    }

    fn send(&self, target: InstanceId, outbound: Outbound) {
        if self
            .delivery_tx
            .send(Delivery { target, outbound })
            .is_err()
        {
            warn!(instance = %target, "delivery pump gone, event dropped");
        }
    }
}

/// Targeted policy: route by correlation key, queue on miss.
fn resolve_targeted(core: &mut RouterCore, event: &NativeEvent) -> Vec<InstanceId> {
    let NativeEvent::NotificationReceived { key, manager_name } = event else {
        return Vec::new();
    };
    match core.registry.lookup_by_correlation(key) {
        Some(id) => vec![id],
        None => {
            core.pending
                .push_notification(PendingNotification::new(key.clone(), manager_name.clone()));
            Vec::new()
        }
    }
}

/// Main-controller-only policy: URL events queue while the slot is empty,
/// button presses drop (a stale button replay would fire on a screen the
/// user is no longer looking at).
fn resolve_main_only(core: &mut RouterCore, event: &NativeEvent) -> Vec<InstanceId> {
    let main = core.main_for_dispatch();
    match event {
        NativeEvent::OpenedWithUrl { url } => match main {
            Some(id) => vec![id],
            None => {
                core.pending.push_launch(PendingLaunch::new(Some(url.clone())));
                Vec::new()
            }
        },
        NativeEvent::OpenedWithoutUrl => match main {
            Some(id) => vec![id],
            None => {
                core.pending.push_launch(PendingLaunch::new(None));
                Vec::new()
            }
        },
        NativeEvent::ButtonPressed { button } => match main {
            Some(id) if core.registry.button_events_enabled(id) => vec![id],
            Some(id) => {
                debug!(instance = %id, ?button, "button events gated off for main controller, dropping");
                Vec::new()
            }
            None => {
                warn!(?button, "button press with no main controller, dropping");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

fn launch_event(launch: PendingLaunch) -> NativeEvent {
    match launch.url {
        Some(url) => NativeEvent::OpenedWithUrl { url },
        None => NativeEvent::OpenedWithoutUrl,
    }
}

impl EventPump {
    /// Drain everything currently queued. Call once per main-loop tick.
    /// Returns the number of sink invocations performed.
    pub fn drain(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(delivery) = self.delivery_rx.try_recv() {
            if self.deliver(delivery) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Run forever on a tokio task pinned to the main context. Ends when
    /// every router clone has been dropped.
    pub async fn run(&mut self) {
        while let Some(delivery) = self.delivery_rx.recv().await {
            self.deliver(delivery);
        }
    }

    /// Deliver one record: re-validate the target, upgrade the sink, drop
    /// the lock, then invoke. Returns whether a sink was invoked.
    fn deliver(&self, delivery: Delivery) -> bool {
        let sink = {
            let core = self.core.lock().expect("router lock poisoned");
            match delivery.outbound {
                // Routed native events respect the enabled gate right up
                // to the moment of delivery.
                Outbound::Native(_) => core
                    .registry
                    .sink(delivery.target)
                    .filter(|_| core.registry.is_enabled(delivery.target)),
                // State notices go to the affected instance even when the
                // new state is disabled.
                Outbound::EnabledChanged(_) | Outbound::MainControllerChanged(_) => {
                    core.registry.sink(delivery.target)
                }
            }
        };

        let Some(sink) = sink else {
            debug!(instance = %delivery.target, "target gone before delivery, skipping");
            return false;
        };

        match delivery.outbound {
            Outbound::Native(event) => forward(&*sink, &event),
            Outbound::EnabledChanged(enabled) => sink.enabled_changed(enabled),
            Outbound::MainControllerChanged(is_main) => sink.main_controller_changed(is_main),
        }
        true
    }
}

/// Translate a raw event into the corresponding typed sink call.
fn forward(sink: &dyn EventSink, event: &NativeEvent) {
    match event {
        NativeEvent::ButtonPressed { button } => sink.button_pressed(*button),
        NativeEvent::AlertDialogClicked { button_index } => {
            sink.alert_dialog_clicked(*button_index)
        }
        NativeEvent::ActionSheetClicked { button_index } => {
            sink.action_sheet_clicked(*button_index)
        }
        NativeEvent::DatePicked { year, month, day } => sink.date_picked(*year, *month, *day),
        NativeEvent::DatePickerCancelled => sink.date_picker_cancelled(),
        NativeEvent::TimePicked { hour, minute } => sink.time_picked(*hour, *minute),
        NativeEvent::TimePickerCancelled => sink.time_picker_cancelled(),
        NativeEvent::CameraCaptured { capture_path } => sink.camera_captured(capture_path),
        NativeEvent::CameraCaptureCancelled => sink.camera_capture_cancelled(),
        NativeEvent::FileSelected { file_path } => sink.file_selected(file_path),
        NativeEvent::FileSelectionCancelled => sink.file_selection_cancelled(),
        NativeEvent::KeyboardHeightChanged { height } => sink.keyboard_height_changed(*height),
        NativeEvent::OpenedWithUrl { url } => sink.opened_with_url(url),
        NativeEvent::OpenedWithoutUrl => sink.opened_without_url(),
        NativeEvent::NotificationReceived { key, manager_name } => {
            sink.notification_received(key, manager_name)
        }
    }
}

/// RAII registration: keeps the instance id and unregisters on drop, so
/// teardown is guaranteed on every exit path — including unwinding —
/// before the UI object's storage is invalidated.
pub struct InstanceHandle {
    router: EventRouter,
    id: InstanceId,
}

impl InstanceHandle {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.router.set_enabled(self.id, enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.router.is_enabled(self.id)
    }

    pub fn set_button_events_enabled(&self, enabled: bool) -> Result<()> {
        self.router.set_button_events_enabled(self.id, enabled)
    }

    pub fn claim_notifications(&self, key: CorrelationKey) -> Result<()> {
        self.router.claim_notifications(self.id, key)
    }

    pub fn set_main_controller(&self, disable_others: bool) -> Result<()> {
        self.router.set_main_controller(self.id, disable_others)
    }

    pub fn resign_main_controller(&self) -> Result<()> {
        self.router.resign_main_controller(self.id)
    }

    pub fn is_main_controller(&self) -> bool {
        self.router.is_main_controller(self.id)
    }
}

impl Drop for InstanceHandle {
    fn drop(&mut self) {
        self.router.unregister(self.id);
    }
}

impl std::fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("InstanceHandle").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellwerk_core::types::ButtonKind;
    use std::sync::Mutex as StdMutex;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("stellwerk_router=debug")
            .with_test_writer()
            .try_init();
    }

    /// Sink that records every call as a compact string.
    #[derive(Default)]
    struct TestSink {
        calls: StdMutex<Vec<String>>,
    }

    impl TestSink {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().expect("test sink lock").push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("test sink lock").clone()
        }
    }

    impl EventSink for TestSink {
        fn button_pressed(&self, button: ButtonKind) {
            self.record(format!("button:{button:?}"));
        }
        fn alert_dialog_clicked(&self, button_index: i32) {
            self.record(format!("alert:{button_index}"));
        }
        fn keyboard_height_changed(&self, height: i32) {
            self.record(format!("kbd:{height}"));
        }
        fn opened_with_url(&self, url: &str) {
            self.record(format!("url:{url}"));
        }
        fn opened_without_url(&self) {
            self.record("no-url");
        }
        fn notification_received(&self, key: &CorrelationKey, manager_name: &str) {
            self.record(format!("notif:{key}:{manager_name}"));
        }
        fn enabled_changed(&self, enabled: bool) {
            self.record(format!("enabled:{enabled}"));
        }
        fn main_controller_changed(&self, is_main: bool) {
            self.record(format!("main:{is_main}"));
        }
    }

    fn register(router: &EventRouter) -> (Arc<TestSink>, InstanceHandle) {
        let sink = Arc::new(TestSink::default());
        let as_dyn: Arc<dyn EventSink> = sink.clone();
        let handle = router.register(&as_dyn);
        (sink, handle)
    }

    #[test]
    fn broadcast_reaches_every_enabled_instance() {
        init_tracing();
        let (router, mut pump) = EventRouter::new();
        let (sink_a, _a) = register(&router);
        let (sink_b, b) = register(&router);
        let (sink_c, _c) = register(&router);

        router.dispatch(NativeEvent::KeyboardHeightChanged { height: 320 });
        pump.drain();

        assert_eq!(sink_a.calls(), vec!["kbd:320"]);
        assert_eq!(sink_b.calls(), vec!["kbd:320"]);
        assert_eq!(sink_c.calls(), vec!["kbd:320"]);

        // Disabled instances receive nothing, however many are registered.
        b.set_enabled(false).expect("disable");
        router.dispatch(NativeEvent::KeyboardHeightChanged { height: 0 });
        pump.drain();
        assert_eq!(sink_a.calls(), vec!["kbd:320", "kbd:0"]);
        assert_eq!(sink_b.calls(), vec!["kbd:320", "enabled:false"]);

        // Re-enabling restores delivery without re-registration.
        b.set_enabled(true).expect("enable");
        router.dispatch(NativeEvent::KeyboardHeightChanged { height: 99 });
        pump.drain();
        assert_eq!(
            sink_b.calls(),
            vec!["kbd:320", "enabled:false", "enabled:true", "kbd:99"]
        );
    }

    #[test]
    fn main_controller_with_disable_others_scenario() {
        let (router, mut pump) = EventRouter::new();
        let (sink0, h0) = register(&router);
        let (sink1, h1) = register(&router);
        let (sink2, h2) = register(&router);
        assert_eq!((h0.id(), h1.id(), h2.id()), (InstanceId(0), InstanceId(1), InstanceId(2)));

        h1.set_main_controller(true).expect("elect id 1");

        assert!(!h0.is_enabled());
        assert!(h1.is_enabled());
        assert!(!h2.is_enabled());

        router.dispatch(NativeEvent::OpenedWithUrl {
            url: "app://deep/link".into(),
        });
        pump.drain();

        assert!(sink0.calls().iter().all(|c| !c.starts_with("url:")));
        assert!(sink1.calls().contains(&"url:app://deep/link".to_string()));
        assert!(sink2.calls().iter().all(|c| !c.starts_with("url:")));
    }

    #[test]
    fn notification_queued_then_claimed_exactly_once() {
        let (router, mut pump) = EventRouter::new();
        let key = CorrelationKey::new("tag1", 5);

        // Arrives before any instance exists.
        router.dispatch(NativeEvent::NotificationReceived {
            key: key.clone(),
            manager_name: "fcm".into(),
        });
        assert_eq!(router.pending_notification_count(), 1);

        let (sink, handle) = register(&router);
        handle.claim_notifications(key.clone()).expect("claim");
        pump.drain();

        assert_eq!(sink.calls(), vec!["notif:tag1#5:fcm"]);
        assert_eq!(router.pending_notification_count(), 0);

        // Zero further replays, even if the key is claimed again.
        handle.claim_notifications(key).expect("re-claim");
        pump.drain();
        assert_eq!(sink.calls(), vec!["notif:tag1#5:fcm"]);
    }

    #[test]
    fn targeted_event_reaches_registered_claimant_directly() {
        let (router, mut pump) = EventRouter::new();
        let (sink, handle) = register(&router);
        let key = CorrelationKey::new("chat", 12);
        handle.claim_notifications(key.clone()).expect("claim");

        router.dispatch(NativeEvent::NotificationReceived {
            key,
            manager_name: "local".into(),
        });
        pump.drain();

        assert_eq!(sink.calls(), vec!["notif:chat#12:local"]);
        assert_eq!(router.pending_notification_count(), 0);
    }

    #[test]
    fn disabled_claimant_leaves_notification_queued() {
        let (router, mut pump) = EventRouter::new();
        let (sink, handle) = register(&router);
        let key = CorrelationKey::new("tag9", 1);
        handle.claim_notifications(key.clone()).expect("claim");
        handle.set_enabled(false).expect("disable");

        router.dispatch(NativeEvent::NotificationReceived {
            key,
            manager_name: "fcm".into(),
        });
        pump.drain();

        assert_eq!(router.pending_notification_count(), 1);
        assert!(sink.calls().iter().all(|c| !c.starts_with("notif:")));
    }

    #[test]
    fn unregister_wins_over_inflight_delivery() {
        let (router, mut pump) = EventRouter::new();
        let (sink, handle) = register(&router);

        router.dispatch(NativeEvent::KeyboardHeightChanged { height: 100 });
        drop(handle); // unregisters before the pump runs
        pump.drain();

        assert!(sink.calls().is_empty());
    }

    #[test]
    fn destroying_main_controller_empties_slot() {
        let (router, mut pump) = EventRouter::new();
        let (_sink, handle) = register(&router);
        handle.set_main_controller(false).expect("elect");
        assert_eq!(router.main_controller(), Some(handle.id()));

        drop(handle);
        assert_eq!(router.main_controller(), None);

        // Main-only URL events queue rather than vanish.
        router.dispatch(NativeEvent::OpenedWithoutUrl);
        pump.drain();
        assert_eq!(router.pending_launch_count(), 1);
    }

    #[test]
    fn launch_events_queue_until_election_then_replay_fifo() {
        let (router, mut pump) = EventRouter::new();

        router.dispatch(NativeEvent::OpenedWithUrl {
            url: "app://first".into(),
        });
        router.dispatch(NativeEvent::OpenedWithoutUrl);
        assert_eq!(router.pending_launch_count(), 2);

        let (sink, handle) = register(&router);
        handle.set_main_controller(false).expect("elect");
        pump.drain();

        assert_eq!(sink.calls(), vec!["main:true", "url:app://first", "no-url"]);
        assert_eq!(router.pending_launch_count(), 0);
    }

    #[test]
    fn button_press_needs_main_controller_and_button_events() {
        init_tracing();
        let (router, mut pump) = EventRouter::new();
        let (sink, handle) = register(&router);

        // No main controller yet: dropped, not queued.
        router.dispatch(NativeEvent::ButtonPressed {
            button: ButtonKind::Back,
        });
        pump.drain();
        assert_eq!(router.pending_launch_count(), 0);
        assert!(sink.calls().is_empty());

        handle.set_main_controller(false).expect("elect");
        handle.set_button_events_enabled(false).expect("gate off");
        router.dispatch(NativeEvent::ButtonPressed {
            button: ButtonKind::Back,
        });
        pump.drain();
        assert!(sink.calls().iter().all(|c| !c.starts_with("button:")));

        handle.set_button_events_enabled(true).expect("gate on");
        router.dispatch(NativeEvent::ButtonPressed {
            button: ButtonKind::Menu,
        });
        pump.drain();
        assert!(sink.calls().contains(&"button:Menu".to_string()));
    }

    #[test]
    fn election_handoff_notifies_both_sides() {
        let (router, mut pump) = EventRouter::new();
        let (sink_a, a) = register(&router);
        let (sink_b, b) = register(&router);

        a.set_main_controller(false).expect("elect a");
        b.set_main_controller(false).expect("elect b");
        pump.drain();

        assert_eq!(sink_a.calls(), vec!["main:true", "main:false"]);
        assert_eq!(sink_b.calls(), vec!["main:true"]);
        assert!(!a.is_main_controller());
        assert!(b.is_main_controller());
    }

    #[test]
    fn dropped_sink_is_never_invoked() {
        let (router, mut pump) = EventRouter::new();
        let sink: Arc<dyn EventSink> = Arc::new(TestSink::default());
        let _handle = router.register(&sink);

        router.dispatch(NativeEvent::KeyboardHeightChanged { height: 1 });
        drop(sink); // UI object gone; only the weak handle remains
        assert_eq!(pump.drain(), 0);

        // The dead entry is swept on the next dispatch.
        router.dispatch(NativeEvent::KeyboardHeightChanged { height: 2 });
        assert_eq!(router.instance_count(), 0);
    }

    #[test]
    fn same_kind_events_arrive_in_dispatch_order() {
        let (router, mut pump) = EventRouter::new();
        let (sink, _handle) = register(&router);

        for height in [10, 20, 30] {
            router.dispatch(NativeEvent::KeyboardHeightChanged { height });
        }
        pump.drain();

        assert_eq!(sink.calls(), vec!["kbd:10", "kbd:20", "kbd:30"]);
    }

    #[test]
    fn dispatch_is_callable_from_another_thread() {
        let (router, mut pump) = EventRouter::new();
        let (sink, _handle) = register(&router);

        let from_native = router.clone();
        std::thread::spawn(move || {
            from_native.dispatch(NativeEvent::AlertDialogClicked { button_index: 1 });
        })
        .join()
        .expect("native thread");

        pump.drain();
        assert_eq!(sink.calls(), vec!["alert:1"]);
    }

    #[tokio::test]
    async fn async_pump_delivers_and_stops_when_router_drops() {
        let (router, mut pump) = EventRouter::new();
        let (sink, handle) = register(&router);

        let pump_task = tokio::spawn(async move {
            pump.run().await;
        });

        router.dispatch(NativeEvent::KeyboardHeightChanged { height: 7 });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(sink.calls(), vec!["kbd:7"]);

        // Dropping every router clone (the handle holds one) ends the pump.
        drop(handle);
        drop(router);
        pump_task.await.expect("pump task");
    }
}
