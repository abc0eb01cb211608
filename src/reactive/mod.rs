//! Single-threaded reactive cells and memoized computations
//!
//! A computation registers itself with every cell it reads while running;
//! a write to any of those cells marks the computation stale, and the next
//! read re-runs it. Subscriptions reflect the cells read during the last
//! run only: before re-running, a computation drops every subscription it
//! held, so a branch that is no longer taken stops invalidating it.
//! Everything here is demand-driven: nothing executes until a consumer
//! calls `get`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// The dependency-tracking side of a computation.
trait Observer {
    /// Mark the computation stale.
    fn invalidate(&self);
    /// Remember a subscriber list this computation was added to, so the
    /// subscription can be dropped before the next run.
    fn record_source(&self, source: Rc<SubscriberList>);
}

/// One registered subscription. The id survives trait-object coercion,
/// so deduplication and removal never compare fat pointers.
#[derive(Clone)]
struct Subscription {
    id: u64,
    observer: Weak<dyn Observer>,
}

type SubscriberList = RefCell<Vec<Subscription>>;

thread_local! {
    /// Computations currently evaluating, innermost last. Tracked reads
    /// subscribe the innermost entry.
    static OBSERVERS: RefCell<Vec<Subscription>> = RefCell::new(Vec::new());

    static NEXT_OBSERVER_ID: Cell<u64> = Cell::new(0);
}

fn next_observer_id() -> u64 {
    NEXT_OBSERVER_ID.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        id
    })
}

fn subscribe(subscribers: &Rc<SubscriberList>) {
    OBSERVERS.with(|stack| {
        let stack = stack.borrow();
        let Some(current) = stack.last() else {
            return;
        };
        let Some(observer) = current.observer.upgrade() else {
            return;
        };
        let mut subs = subscribers.borrow_mut();
        if !subs.iter().any(|existing| existing.id == current.id) {
            subs.push(current.clone());
            observer.record_source(Rc::clone(subscribers));
        }
    });
}

fn notify(subscribers: &Rc<SubscriberList>) {
    // Notified computations re-register on their next run.
    let subs = std::mem::take(&mut *subscribers.borrow_mut());
    for sub in subs {
        if let Some(observer) = sub.observer.upgrade() {
            observer.invalidate();
        }
    }
}

/// Pops the observer stack even if the computation panics.
struct ObserverGuard;

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        OBSERVERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

// ============================================================================
// ValueCell
// ============================================================================

/// A mutable cell whose reads are tracked by the running computation.
pub struct ValueCell<T> {
    inner: Rc<CellInner<T>>,
}

struct CellInner<T> {
    value: RefCell<T>,
    subscribers: Rc<SubscriberList>,
}

impl<T: Clone> ValueCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: RefCell::new(value),
                subscribers: Rc::new(RefCell::new(Vec::new())),
            }),
        }
    }

    /// Tracked read: the innermost running computation subscribes to this
    /// cell before the value is returned.
    pub fn get(&self) -> T {
        subscribe(&self.inner.subscribers);
        self.inner.value.borrow().clone()
    }

    /// Read without registering a dependency. Used where a tracked read
    /// would create a feedback loop.
    pub fn get_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Write the cell and mark every subscribed computation stale.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        notify(&self.inner.subscribers);
    }
}

impl<T> Clone for ValueCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValueCell").field(&self.inner.value.borrow()).finish()
    }
}

// ============================================================================
// Computed
// ============================================================================

/// A lazily memoized computation over tracked cells.
///
/// The closure runs on the first `get` and again after any cell it read
/// last time is written. Computed values are themselves tracked, so one
/// computation may read another and staleness propagates through the
/// chain.
pub struct Computed<T> {
    inner: Rc<ComputedInner<T>>,
}

struct ComputedInner<T> {
    id: u64,
    compute: Box<dyn Fn() -> T>,
    value: RefCell<Option<T>>,
    stale: Cell<bool>,
    /// Subscriber lists this computation joined during its last run.
    sources: RefCell<Vec<Rc<SubscriberList>>>,
    dependents: Rc<SubscriberList>,
}

impl<T> Observer for ComputedInner<T> {
    fn invalidate(&self) {
        if !self.stale.replace(true) {
            notify(&self.dependents);
        }
    }

    fn record_source(&self, source: Rc<SubscriberList>) {
        self.sources.borrow_mut().push(source);
    }
}

impl<T> ComputedInner<T> {
    /// Drop every subscription from the previous run.
    fn clear_sources(&self) {
        for source in self.sources.borrow_mut().drain(..) {
            source.borrow_mut().retain(|sub| sub.id != self.id);
        }
    }
}

impl<T: Clone + 'static> Computed<T> {
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: Rc::new(ComputedInner {
                id: next_observer_id(),
                compute: Box::new(compute),
                value: RefCell::new(None),
                stale: Cell::new(true),
                sources: RefCell::new(Vec::new()),
                dependents: Rc::new(RefCell::new(Vec::new())),
            }),
        }
    }

    /// Current value, recomputing first if any dependency changed since
    /// the last run.
    pub fn get(&self) -> T {
        subscribe(&self.inner.dependents);
        if self.is_stale() {
            self.inner.clear_sources();
            let weak = Rc::downgrade(&self.inner);
            let observer: Weak<dyn Observer> = weak;
            OBSERVERS.with(|stack| {
                stack.borrow_mut().push(Subscription {
                    id: self.inner.id,
                    observer,
                })
            });
            let _guard = ObserverGuard;
            self.inner.stale.set(false);
            let value = (self.inner.compute)();
            *self.inner.value.borrow_mut() = Some(value.clone());
            return value;
        }
        self.inner
            .value
            .borrow()
            .clone()
            .expect("computed value present when not stale")
    }

    /// Whether the next `get` will recompute.
    pub fn is_stale(&self) -> bool {
        self.inner.stale.get() || self.inner.value.borrow().is_none()
    }
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
