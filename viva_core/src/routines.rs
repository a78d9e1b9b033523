// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative per-frame scheduler and event fan-out.
//!
//! A *routine* is a scheduled unit of game logic with three timing knobs:
//! a `delay` before the first run, a `tick` interval between runs (0 =
//! every frame), and a `life_time` after which it is force-removed (0 =
//! unlimited). Routines come from a fixed-capacity pool; exhaustion is a
//! soft failure ([`RoutineManager::add_routine`] returns `None`) because
//! dropping a non-critical scheduled effect beats crashing the frame.
//!
//! The manager is generic over a context type `C` that every callback
//! receives mutably — the engine passes its world (scene, camera, clock)
//! so routines can drive game state without global singletons.
//!
//! Callbacks also receive the manager itself, so a routine may schedule or
//! cancel other routines — or itself — mid-pass. The pass iterates
//! backward with swap-to-end removal, which tolerates exactly that.
//! Routines added during a pass first run on a later tick.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

/// What a routine callback wants to happen to it next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoutineControl {
    /// Keep the routine scheduled.
    Continue,
    /// Remove the routine after this run.
    Stop,
}

/// A routine callback. Runs with the caller context and the manager
/// re-entrantly available.
pub type RoutineFn<C> = Box<dyn FnMut(&mut C, &mut RoutineManager<C>) -> RoutineControl>;

/// An event handler; receives the caller context and the payload passed
/// to [`RoutineManager::trigger`].
pub type EventHandler<C> = Box<dyn FnMut(&mut C, i32)>;

/// Handle to a scheduled routine.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutineId {
    idx: u32,
    generation: u32,
}

impl fmt::Debug for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoutineId({}@gen{})", self.idx, self.generation)
    }
}

struct Slot<C> {
    generation: u32,
    live: bool,
    user_id: i32,
    delay: f64,
    life_time: f64,
    tick: f64,
    start_time: f64,
    last_pulse: f64,
    remove: bool,
    callback: Option<RoutineFn<C>>,
}

impl<C> Slot<C> {
    const fn empty() -> Self {
        Self {
            generation: 0,
            live: false,
            user_id: 0,
            delay: 0.0,
            life_time: 0.0,
            tick: 0.0,
            start_time: 0.0,
            last_pulse: 0.0,
            remove: false,
            callback: None,
        }
    }
}

/// Pool-backed routine scheduler plus an integer-keyed synchronous event
/// bus.
pub struct RoutineManager<C> {
    slots: Vec<Slot<C>>,
    free: Vec<u32>,
    active: Vec<u32>,
    handlers: BTreeMap<i32, Vec<EventHandler<C>>>,
    now: f64,
}

impl<C> fmt::Debug for RoutineManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutineManager")
            .field("capacity", &self.slots.len())
            .field("active", &self.active.len())
            .field("handlers", &self.handlers.len())
            .field("now", &self.now)
            .finish()
    }
}

impl<C> RoutineManager<C> {
    /// Default pool capacity.
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Creates a manager with [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY)
    /// routine slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a manager with a fixed pool of `capacity` routine slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        let mut free = Vec::with_capacity(capacity);
        for i in 0..capacity {
            slots.push(Slot::empty());
            #[expect(
                clippy::cast_possible_truncation,
                reason = "pool capacities are far below u32::MAX"
            )]
            free.push((capacity - 1 - i) as u32);
        }
        Self {
            slots,
            free,
            active: Vec::with_capacity(capacity),
            handlers: BTreeMap::new(),
            now: 0.0,
        }
    }

    /// Schedules a routine that runs every frame until it returns
    /// [`RoutineControl::Stop`]. Returns `None` when the pool is exhausted.
    pub fn add_routine(&mut self, callback: RoutineFn<C>) -> Option<RoutineId> {
        self.add_routine_with(callback, 0, 0.0, 0.0, 0.0)
    }

    /// Schedules a routine.
    ///
    /// - `user_id`: caller-chosen id for [`find_routine`](Self::find_routine);
    ///   0 means anonymous.
    /// - `delay`: seconds before the first run.
    /// - `life_time`: seconds after which the routine is force-removed
    ///   regardless of its return value; 0 = unlimited.
    /// - `tick`: minimum seconds between runs; 0 = every frame.
    ///
    /// Returns `None` when the pool is exhausted — previously scheduled
    /// routines are unaffected.
    pub fn add_routine_with(
        &mut self,
        callback: RoutineFn<C>,
        user_id: i32,
        delay: f64,
        life_time: f64,
        tick: f64,
    ) -> Option<RoutineId> {
        let idx = self.free.pop()?;
        let slot = &mut self.slots[idx as usize];
        slot.live = true;
        slot.user_id = user_id;
        slot.delay = delay;
        slot.life_time = life_time;
        slot.tick = tick;
        slot.start_time = self.now;
        slot.last_pulse = 0.0;
        slot.remove = false;
        slot.callback = Some(callback);
        self.active.push(idx);
        Some(RoutineId {
            idx,
            generation: slot.generation,
        })
    }

    /// Marks a routine for removal at its next visit. Stale handles are
    /// ignored.
    pub fn remove_routine(&mut self, id: RoutineId) {
        if self.is_alive(id) {
            self.slots[id.idx as usize].remove = true;
        }
    }

    /// Whether the handle refers to a scheduled routine.
    #[must_use]
    pub fn is_alive(&self, id: RoutineId) -> bool {
        (id.idx as usize) < self.slots.len()
            && self.slots[id.idx as usize].live
            && self.slots[id.idx as usize].generation == id.generation
    }

    /// Finds a routine by caller-chosen id (linear search). Id 0 is
    /// anonymous and never found.
    #[must_use]
    pub fn find_routine(&self, user_id: i32) -> Option<RoutineId> {
        if user_id == 0 {
            return None;
        }
        self.active.iter().find_map(|&idx| {
            let slot = &self.slots[idx as usize];
            (slot.live && slot.user_id == user_id).then_some(RoutineId {
                idx,
                generation: slot.generation,
            })
        })
    }

    /// Number of live routines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no routines are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Runs one scheduler pass at game time `now` (seconds).
    ///
    /// For every live routine past its delay whose tick window elapsed,
    /// the callback runs with `ctx`; returning [`RoutineControl::Stop`] or
    /// exceeding `life_time` releases the slot back to the pool.
    pub fn tick(&mut self, now: f64, ctx: &mut C) {
        self.now = now;

        // Backward so swap-removal neither skips nor double-visits;
        // routines added mid-pass land past the captured length and wait
        // for the next pass.
        for i in (0..self.active.len()).rev() {
            // A callback may have bulk-removed routines below us.
            if i >= self.active.len() {
                continue;
            }
            let idx = self.active[i];
            if self.slots[idx as usize].remove {
                self.release(i);
                continue;
            }

            let (past_delay, tick_due) = {
                let slot = &self.slots[idx as usize];
                (
                    now - slot.start_time > slot.delay,
                    slot.tick == 0.0 || now - slot.last_pulse > slot.tick,
                )
            };

            let mut control = RoutineControl::Continue;
            if past_delay && tick_due {
                // The callback is taken out of its slot for the duration of
                // the call so it can re-enter the manager freely.
                let mut callback = self.slots[idx as usize]
                    .callback
                    .take()
                    .expect("live routine has a callback");
                control = callback(ctx, self);
                let slot = &mut self.slots[idx as usize];
                slot.last_pulse = now;
                if slot.live {
                    slot.callback = Some(callback);
                } else {
                    // Released from inside the callback (e.g. clear_routines).
                    continue;
                }
            }

            let slot = &self.slots[idx as usize];
            let expired = slot.life_time > 0.0 && now - slot.start_time > slot.life_time;
            if control == RoutineControl::Stop || expired || slot.remove {
                // The callback may have shuffled `active`; resolve the
                // routine's current position before swap-removing.
                let pos = if self.active.get(i).copied() == Some(idx) {
                    Some(i)
                } else {
                    self.active.iter().position(|&x| x == idx)
                };
                if let Some(pos) = pos {
                    self.release(pos);
                }
            }
        }
    }

    /// Removes every routine immediately.
    pub fn clear_routines(&mut self) {
        for i in (0..self.active.len()).rev() {
            self.release(i);
        }
    }

    fn release(&mut self, active_index: usize) {
        let idx = self.active.swap_remove(active_index);
        let slot = &mut self.slots[idx as usize];
        slot.live = false;
        slot.generation += 1;
        slot.callback = None;
        slot.remove = false;
        self.free.push(idx);
    }

    // -- Event fan-out --

    /// Registers a handler for an integer-keyed event.
    pub fn add_handler(&mut self, event: i32, handler: EventHandler<C>) {
        self.handlers.entry(event).or_default().push(handler);
    }

    /// Synchronously invokes every handler registered for `event`, in
    /// registration order, passing `ctx` and `data`.
    pub fn trigger(&mut self, event: i32, data: i32, ctx: &mut C) {
        if let Some(handlers) = self.handlers.get_mut(&event) {
            for handler in handlers {
                handler(ctx, data);
            }
        }
    }

    /// Removes all handlers for one event.
    pub fn clear_handlers_for(&mut self, event: i32) {
        self.handlers.remove(&event);
    }

    /// Removes all handlers for all events.
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }
}

impl<C> Default for RoutineManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::{Cell, RefCell};

    use super::*;

    type Mgr = RoutineManager<()>;

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let c = Rc::new(Cell::new(0));
        (c.clone(), c)
    }

    #[test]
    fn every_frame_routine_runs_each_tick() {
        let mut mgr = Mgr::new();
        let (count, probe) = counter();
        mgr.add_routine(Box::new(move |_, _| {
            count.set(count.get() + 1);
            RoutineControl::Continue
        }))
        .unwrap();

        mgr.tick(0.1, &mut ());
        mgr.tick(0.2, &mut ());
        mgr.tick(0.3, &mut ());
        assert_eq!(probe.get(), 3);
    }

    #[test]
    fn stop_return_removes_routine() {
        let mut mgr = Mgr::new();
        let (count, probe) = counter();
        mgr.add_routine(Box::new(move |_, _| {
            count.set(count.get() + 1);
            RoutineControl::Stop
        }))
        .unwrap();

        mgr.tick(0.1, &mut ());
        mgr.tick(0.2, &mut ());
        assert_eq!(probe.get(), 1);
        assert!(mgr.is_empty());
    }

    #[test]
    fn delay_tick_lifetime_semantics() {
        let mut mgr = Mgr::new();
        let (count, probe) = counter();
        let id = mgr
            .add_routine_with(
                Box::new(move |_, _| {
                    count.set(count.get() + 1);
                    RoutineControl::Continue
                }),
                0,
                2.0,
                5.0,
                1.0,
            )
            .unwrap();

        // Not before the delay has elapsed.
        mgr.tick(1.0, &mut ());
        mgr.tick(2.0, &mut ());
        assert_eq!(probe.get(), 0, "must not fire before 2s elapsed");

        mgr.tick(2.5, &mut ());
        assert_eq!(probe.get(), 1);

        // Within the same 1s tick window: no fire.
        mgr.tick(3.0, &mut ());
        assert_eq!(probe.get(), 1);

        mgr.tick(4.0, &mut ());
        assert_eq!(probe.get(), 2);

        // Past the 5s lifetime the routine is removed regardless of its
        // return value (it may still fire one last time on this pass).
        mgr.tick(5.2, &mut ());
        assert!(!mgr.is_alive(id), "lifetime expiry removes the routine");
        let fired = probe.get();
        mgr.tick(6.0, &mut ());
        mgr.tick(7.0, &mut ());
        assert_eq!(probe.get(), fired, "no runs after expiry");
    }

    #[test]
    fn pool_exhaustion_returns_none_without_corruption() {
        let mut mgr = Mgr::with_capacity(2);
        let (count, probe) = counter();
        let c2 = count.clone();
        let a = mgr
            .add_routine(Box::new(move |_, _| {
                count.set(count.get() + 1);
                RoutineControl::Continue
            }))
            .unwrap();
        let b = mgr
            .add_routine(Box::new(move |_, _| {
                c2.set(c2.get() + 1);
                RoutineControl::Continue
            }))
            .unwrap();

        assert!(
            mgr.add_routine(Box::new(|_, _| RoutineControl::Continue))
                .is_none()
        );

        mgr.tick(0.1, &mut ());
        assert_eq!(probe.get(), 2, "existing routines unaffected");
        assert!(mgr.is_alive(a));
        assert!(mgr.is_alive(b));

        // Freeing a slot makes the pool usable again.
        mgr.remove_routine(a);
        mgr.tick(0.2, &mut ());
        assert!(
            mgr.add_routine(Box::new(|_, _| RoutineControl::Continue))
                .is_some()
        );
    }

    #[test]
    fn routine_can_remove_itself_by_id() {
        let mut mgr = Mgr::new();
        let slot: Rc<RefCell<Option<RoutineId>>> = Rc::new(RefCell::new(None));
        let slot2 = slot.clone();
        let (count, probe) = counter();
        let id = mgr
            .add_routine(Box::new(move |_, m| {
                count.set(count.get() + 1);
                m.remove_routine(slot2.borrow().expect("id stored before tick"));
                RoutineControl::Continue
            }))
            .unwrap();
        *slot.borrow_mut() = Some(id);

        mgr.tick(0.1, &mut ());
        mgr.tick(0.2, &mut ());
        assert_eq!(probe.get(), 1);
        assert!(!mgr.is_alive(id));
    }

    #[test]
    fn routine_added_from_callback_runs_next_pass() {
        let mut mgr = Mgr::new();
        let (count, probe) = counter();
        mgr.add_routine(Box::new(move |_, m| {
            let inner = count.clone();
            m.add_routine(Box::new(move |_, _| {
                inner.set(inner.get() + 1);
                RoutineControl::Stop
            }));
            RoutineControl::Stop
        }))
        .unwrap();

        mgr.tick(0.1, &mut ());
        assert_eq!(probe.get(), 0, "new routine waits for the next pass");
        mgr.tick(0.2, &mut ());
        assert_eq!(probe.get(), 1);
        assert!(mgr.is_empty());
    }

    #[test]
    fn removal_mid_pass_neither_skips_nor_double_runs() {
        let mut mgr = Mgr::new();
        let log: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..4_u8 {
            let log = log.clone();
            mgr.add_routine(Box::new(move |_, _| {
                log.borrow_mut().push(tag);
                if tag == 2 {
                    RoutineControl::Stop
                } else {
                    RoutineControl::Continue
                }
            }))
            .unwrap();
        }

        mgr.tick(0.1, &mut ());
        let mut first: Vec<u8> = log.borrow().clone();
        first.sort_unstable();
        assert_eq!(first, alloc::vec![0, 1, 2, 3], "every routine ran once");

        log.borrow_mut().clear();
        mgr.tick(0.2, &mut ());
        let mut second: Vec<u8> = log.borrow().clone();
        second.sort_unstable();
        assert_eq!(second, alloc::vec![0, 1, 3], "stopped routine is gone");
    }

    #[test]
    fn find_routine_by_user_id() {
        let mut mgr = Mgr::new();
        let id = mgr
            .add_routine_with(Box::new(|_, _| RoutineControl::Continue), 7, 0.0, 0.0, 0.0)
            .unwrap();
        assert_eq!(mgr.find_routine(7), Some(id));
        assert_eq!(mgr.find_routine(8), None);
        assert_eq!(mgr.find_routine(0), None, "0 is anonymous");
    }

    #[test]
    fn events_fan_out_in_registration_order() {
        let mut mgr = Mgr::new();
        let log: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(Vec::new()));
        let l1 = log.clone();
        let l2 = log.clone();
        mgr.add_handler(4, Box::new(move |_, d| l1.borrow_mut().push(d)));
        mgr.add_handler(4, Box::new(move |_, d| l2.borrow_mut().push(d + 100)));

        mgr.trigger(4, 5, &mut ());
        mgr.trigger(9, 1, &mut ()); // no handlers: silently ignored
        assert_eq!(*log.borrow(), alloc::vec![5, 105]);

        mgr.clear_handlers_for(4);
        mgr.trigger(4, 5, &mut ());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn routines_see_the_context() {
        let mut mgr: RoutineManager<u32> = RoutineManager::with_capacity(4);
        mgr.add_routine(Box::new(|ctx, _| {
            *ctx += 1;
            RoutineControl::Continue
        }))
        .unwrap();

        let mut world = 0_u32;
        mgr.tick(0.1, &mut world);
        mgr.tick(0.2, &mut world);
        assert_eq!(world, 2);
    }

    #[test]
    fn clear_routines_empties_pool_back() {
        let mut mgr = Mgr::with_capacity(3);
        for _ in 0..3 {
            mgr.add_routine(Box::new(|_, _| RoutineControl::Continue))
                .unwrap();
        }
        mgr.clear_routines();
        assert!(mgr.is_empty());
        // All three slots are reusable.
        for _ in 0..3 {
            assert!(
                mgr.add_routine(Box::new(|_, _| RoutineControl::Continue))
                    .is_some()
            );
        }
    }
}
