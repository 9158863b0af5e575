use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

/// Time source for keystroke timestamps and replay pacing.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Manually advanced clock. Clones share the same timeline, so a scripted
/// input source and the controller can both hold one.
#[derive(Clone, Debug)]
pub struct VirtualClock {
    inner: Rc<VirtualInner>,
}

#[derive(Debug)]
struct VirtualInner {
    origin: Instant,
    offset: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(VirtualInner {
                origin: Instant::now(),
                offset: Cell::new(Duration::ZERO),
                sleeps: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.inner.offset.set(self.inner.offset.get() + by);
    }

    pub fn elapsed(&self) -> Duration {
        self.inner.offset.get()
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.sleeps.borrow().clone()
    }

    pub fn clear_sleeps(&self) {
        self.inner.sleeps.borrow_mut().clear();
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.inner.origin + self.inner.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.inner.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}
