// =============================================================================
// RUNTIME — Simulation thread and snapshot hand-off to the renderer
//
// simulation thread                       render thread
//   drain InputEvents ── mpsc ──┐           SnapshotReader::refresh()
//   World::update(dt)           │             try_lock → newest snapshot
//   SnapshotSlot::publish ──────┴── Mutex<Arc<FrameSnapshot>> ──┘
//   sleep for the rest of the interval      (busy → keep previous)
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::camera::Camera;
use crate::error::{EngineError, Result};
use crate::input::InputEvent;
use crate::map::GridMap;
use crate::raycaster::SpriteTable;
use crate::world::World;

/// Upper bound on one simulation step, in seconds.
pub const MAX_DT: f32 = 0.25;

/// Clamp a measured frame time to `[0, MAX_DT]`.
#[inline]
pub fn capped_dt(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_DT)
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Everything the renderer needs for one frame, frozen at the end of a tick.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub camera: Camera,
    pub map: Arc<GridMap>,
    pub sprites: SpriteTable,
}

/// Single-slot mailbox holding the newest snapshot.
#[derive(Debug)]
pub struct SnapshotSlot {
    inner: Mutex<Arc<FrameSnapshot>>,
}

impl SnapshotSlot {
    pub fn new(initial: FrameSnapshot) -> Self {
        Self { inner: Mutex::new(Arc::new(initial)) }
    }

    /// Replace the stored snapshot. Blocks only for the duration of a pointer
    /// swap by a reader.
    pub fn publish(&self, snapshot: FrameSnapshot) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }

    /// Newest snapshot, or `None` if the slot is being written right now.
    pub fn try_latest(&self) -> Option<Arc<FrameSnapshot>> {
        match self.inner.try_lock() {
            Ok(guard) => Some(Arc::clone(&guard)),
            Err(TryLockError::Poisoned(p)) => Some(Arc::clone(&p.into_inner())),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Newest snapshot, waiting for a writer if necessary.
    pub fn latest(&self) -> Arc<FrameSnapshot> {
        Arc::clone(&self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Render-side view of a [`SnapshotSlot`] that never blocks.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Arc<SnapshotSlot>,
    current: Arc<FrameSnapshot>,
}

impl SnapshotReader {
    pub fn new(slot: Arc<SnapshotSlot>) -> Self {
        let current = slot.latest();
        Self { slot, current }
    }

    /// Pick up the newest snapshot if the slot is free; otherwise keep the
    /// previous one.
    pub fn refresh(&mut self) -> &FrameSnapshot {
        if let Some(latest) = self.slot.try_latest() {
            self.current = latest;
        }
        &self.current
    }

    pub fn current(&self) -> &FrameSnapshot {
        &self.current
    }
}

// ── Simulation thread ─────────────────────────────────────────────────────────

/// Owns the simulation thread. Dropping the handle stops and joins it.
pub struct SimulationHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<World>>,
    inputs: Sender<InputEvent>,
    slot: Arc<SnapshotSlot>,
}

impl SimulationHandle {
    /// Move `world` onto a new thread ticking every `interval`.
    ///
    /// # Errors
    /// [`EngineError::Thread`] if the OS refuses to spawn the thread.
    pub fn spawn(world: World, interval: Duration) -> Result<Self> {
        let slot = Arc::new(SnapshotSlot::new(world.snapshot()));
        let running = Arc::new(AtomicBool::new(true));
        let (inputs, rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("simulation".into())
            .spawn({
                let slot = Arc::clone(&slot);
                let running = Arc::clone(&running);
                move || run_loop(world, interval, &running, &rx, &slot)
            })
            .map_err(EngineError::Thread)?;

        Ok(Self { running, thread: Some(thread), inputs, slot })
    }

    pub fn sender(&self) -> Sender<InputEvent> {
        self.inputs.clone()
    }

    /// Forward an input event. `false` once the simulation has exited.
    pub fn send(&self, event: InputEvent) -> bool {
        self.inputs.send(event).is_ok()
    }

    pub fn slot(&self) -> Arc<SnapshotSlot> {
        Arc::clone(&self.slot)
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(self.slot())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop, join the thread and hand back the world.
    /// `None` if the simulation thread panicked.
    pub fn stop(mut self) -> Option<World> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<World> {
        self.running.store(false, Ordering::Release);
        let handle = self.thread.take()?;
        match handle.join() {
            Ok(world) => Some(world),
            Err(_) => {
                warn!("simulation thread panicked");
                None
            }
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(
    mut world: World,
    interval: Duration,
    running: &AtomicBool,
    inputs: &Receiver<InputEvent>,
    slot: &SnapshotSlot,
) -> World {
    debug!("simulation started ({:.1} ms interval)", interval.as_secs_f64() * 1000.0);
    let mut last = Instant::now();

    while running.load(Ordering::Acquire) {
        let frame_start = Instant::now();
        let dt = capped_dt(frame_start.duration_since(last));
        last = frame_start;

        while let Ok(event) = inputs.try_recv() {
            world.apply_input(event);
        }
        world.update(dt);
        slot.publish(world.snapshot());

        let spent = frame_start.elapsed();
        if spent < interval {
            thread::sleep(interval - spent);
        }
    }

    debug!("simulation stopped after {} ticks", world.tick());
    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_capped() {
        assert_eq!(capped_dt(Duration::from_secs(3)), MAX_DT);
        assert!((capped_dt(Duration::from_millis(16)) - 0.016).abs() < 1e-6);
    }
}
