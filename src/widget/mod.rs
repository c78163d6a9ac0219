//! Clock widget controller
//!
//! Owns the configuration, the simulated time, and the rendered face,
//! and exposes the control surface: `mount`, `pause`, `resume`,
//! `update`. The widget is best-effort by design: misapplied operations
//! and odd configuration degrade visually instead of erroring.

pub mod drag;
pub mod face;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use tracing::{debug, info, trace};

use crate::geometry;
use crate::options::{sanitized_speed, ClockOptions, ClockPatch};
use crate::render::{NodeId, RenderTree};
use crate::state::ClockState;
use crate::tasks::IntervalTimer;

use drag::{DragBinding, DragState};
use face::FaceNodes;

/// Widget state shared between the tick callback and the caller.
///
/// Both mutation paths lock this before touching the tree, which
/// serializes ticks against updates.
struct WidgetInner {
    options: ClockOptions,
    /// Unrecognized patch keys, stored verbatim for later reads
    extra: Map<String, Value>,
    clock: ClockState,
    nodes: FaceNodes,
    drag_state: Arc<Mutex<DragState>>,
    drag_bindings: Vec<DragBinding>,
}

/// An analog clock widget mounted on a host render tree.
///
/// Dropping the widget removes its nodes and listeners from the tree
/// and stops the animation timer.
pub struct ClockWidget<T: RenderTree + Send + 'static> {
    inner: Arc<Mutex<WidgetInner>>,
    tree: Arc<Mutex<T>>,
    timer: IntervalTimer,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves the state usable enough
    // for a decorative widget
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: RenderTree + Send + 'static> ClockWidget<T> {
    /// Build the face on the host tree and start the animation.
    ///
    /// Must be called within a tokio runtime; the tick callback runs on
    /// a spawned timer task.
    pub fn mount(tree: Arc<Mutex<T>>, mut options: ClockOptions) -> Self {
        options.sanitize();
        let clock = ClockState::new(options.date);
        info!(
            "Mounting clock widget: size {:?}, speed {}, countdown {}, low battery {}",
            options.size, options.speed, options.countdown, options.low_battery
        );

        let drag_state: Arc<Mutex<DragState>> = Arc::default();
        let (nodes, drag_bindings) = {
            let mut tree = lock(&tree);
            let nodes = face::build_face(&mut *tree, &options);
            face::apply_hand_angles(&mut *tree, &nodes, &geometry::hand_angles(&clock.time));
            let bindings = if options.draggable {
                drag::enable(&mut *tree, nodes.root, Arc::clone(&drag_state))
            } else {
                Vec::new()
            };
            (nodes, bindings)
        };

        let period = options.tick_period();
        let inner = Arc::new(Mutex::new(WidgetInner {
            options,
            extra: Map::new(),
            clock,
            nodes,
            drag_state,
            drag_bindings,
        }));

        let timer = {
            let inner = Arc::clone(&inner);
            let tree = Arc::clone(&tree);
            IntervalTimer::start(move || Self::tick(&inner, &tree), period)
        };

        Self { inner, tree, timer }
    }

    /// One animation tick: advance the simulated time and repaint the
    /// hands
    fn tick(inner: &Arc<Mutex<WidgetInner>>, tree: &Arc<Mutex<T>>) {
        let mut inner = lock(inner);
        let (countdown, low_battery) = (inner.options.countdown, inner.options.low_battery);
        inner.clock.advance(countdown, low_battery);

        let angles = geometry::hand_angles(&inner.clock.time);
        let mut tree = lock(tree);
        face::apply_hand_angles(&mut *tree, &inner.nodes, &angles);
    }

    /// Stop the animation, remembering the time until the next tick
    pub fn pause(&self) {
        debug!("Pausing clock widget");
        self.timer.pause();
    }

    /// Continue the animation where pause left it
    pub fn resume(&self) {
        debug!("Resuming clock widget");
        self.timer.resume();
    }

    /// Apply a partial options update.
    ///
    /// Changed recognized keys take effect immediately: `draggable`
    /// toggles the drag listeners, `size` resizes the face, `speed`
    /// re-arms the timer, `date` resets the simulated time. Every key
    /// present in the patch, recognized or not, is then written into
    /// the stored configuration.
    pub fn update(&self, patch: ClockPatch) {
        let mut inner = lock(&self.inner);
        let mut tree = lock(&self.tree);
        let inner = &mut *inner;

        if let Some(draggable) = patch.draggable {
            if draggable != inner.options.draggable {
                if draggable {
                    inner.drag_bindings = drag::enable(
                        &mut *tree,
                        inner.nodes.root,
                        Arc::clone(&inner.drag_state),
                    );
                } else {
                    drag::disable(&mut *tree, std::mem::take(&mut inner.drag_bindings));
                }
            }
            inner.options.draggable = draggable;
        }

        if let Some(size) = patch.size {
            if size != inner.options.size {
                debug!("Resizing clock widget to {:?}", size);
                face::apply_size(&mut *tree, inner.nodes.root, size);
            }
            inner.options.size = size;
        }

        if let Some(speed) = patch.speed {
            let speed = sanitized_speed(speed);
            if speed != inner.options.speed {
                debug!("Changing clock speed to {}", speed);
                inner.options.speed = speed;
                self.timer.set_period(inner.options.tick_period());
            }
        }

        if let Some(date) = patch.date {
            debug!("Resetting simulated time to {}", date);
            inner.clock.set_time(date);
            face::apply_hand_angles(
                &mut *tree,
                &inner.nodes,
                &geometry::hand_angles(&inner.clock.time),
            );
            inner.options.date = Some(date);
        }

        if let Some(countdown) = patch.countdown {
            inner.options.countdown = countdown;
        }
        if let Some(low_battery) = patch.low_battery {
            inner.options.low_battery = low_battery;
        }
        if let Some(h_mirrored) = patch.h_mirrored {
            inner.options.h_mirrored = h_mirrored;
        }
        if let Some(v_mirrored) = patch.v_mirrored {
            inner.options.v_mirrored = v_mirrored;
        }
        if let Some(sound_on) = patch.sound_on {
            inner.options.sound_on = sound_on;
        }

        for (key, value) in patch.extra {
            trace!("Storing unrecognized option {}", key);
            inner.extra.insert(key, value);
        }
    }

    /// Snapshot of the current configuration
    pub fn options(&self) -> ClockOptions {
        lock(&self.inner).options.clone()
    }

    /// Unrecognized option keys stored by `update`
    pub fn extra_options(&self) -> Map<String, Value> {
        lock(&self.inner).extra.clone()
    }

    /// The current simulated time
    pub fn simulated_time(&self) -> chrono::NaiveDateTime {
        lock(&self.inner).clock.time
    }

    /// The widget's root node on the host tree
    pub fn root(&self) -> NodeId {
        lock(&self.inner).nodes.root
    }
}

impl<T: RenderTree + Send + 'static> Drop for ClockWidget<T> {
    fn drop(&mut self) {
        debug!("Unmounting clock widget");
        let mut inner = lock(&self.inner);
        let mut tree = lock(&self.tree);
        drag::disable(&mut *tree, std::mem::take(&mut inner.drag_bindings));
        tree.remove_node(inner.nodes.root);
    }
}
