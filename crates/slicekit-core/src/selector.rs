//! Memoized selectors
//!
//! A [`Memoized`] selector is an input selector (global state → input)
//! paired with a projection (input → output). The projection runs only when
//! the input changes identity; otherwise the cached output is returned.
//!
//! Slice state is held behind `Arc`, and reducers return a fresh `Arc` for
//! every state they produce, so `Arc::ptr_eq` is an exact "did this slice
//! change" test.
//!
//! # Example
//!
//! ```rust,ignore
//! let select_count = create_selector(
//!     |state: &AppState| Arc::clone(&state.counter),
//!     |counter: &Arc<CounterState>| counter.model.count,
//! );
//! assert_eq!(select_count.select(&state), 0);
//! ```

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A read projection from global state `G`.
pub trait Selector<G>: Send + Sync {
    /// Projected value
    type Output;

    /// Run the selector against a state snapshot.
    fn select(&self, state: &G) -> Self::Output;
}

/// Inputs whose identity decides whether a memoized selector recomputes.
pub trait SelectorInput: Clone + Send + Sync {
    /// `true` when `other` is the same input as `self`.
    fn is_same(&self, other: &Self) -> bool;
}

impl<T: ?Sized + Send + Sync> SelectorInput for Arc<T> {
    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<A: SelectorInput, B: SelectorInput> SelectorInput for (A, B) {
    fn is_same(&self, other: &Self) -> bool {
        self.0.is_same(&other.0) && self.1.is_same(&other.1)
    }
}

type InputFn<G, I> = Box<dyn Fn(&G) -> I + Send + Sync>;
type ProjectFn<I, O> = Box<dyn Fn(&I) -> O + Send + Sync>;

/// A selector that caches its last input and output.
pub struct Memoized<G, I, O> {
    input: InputFn<G, I>,
    project: ProjectFn<I, O>,
    cache: Mutex<Option<(I, O)>>,
    recomputations: AtomicU64,
}

/// Build a memoized selector from an input selector and a projection.
pub fn create_selector<G, I, O>(
    input: impl Fn(&G) -> I + Send + Sync + 'static,
    project: impl Fn(&I) -> O + Send + Sync + 'static,
) -> Memoized<G, I, O>
where
    I: SelectorInput,
    O: Clone + Send,
{
    Memoized::new(input, project)
}

impl<G, I, O> Memoized<G, I, O>
where
    I: SelectorInput,
    O: Clone + Send,
{
    /// Create a memoized selector.
    pub fn new(
        input: impl Fn(&G) -> I + Send + Sync + 'static,
        project: impl Fn(&I) -> O + Send + Sync + 'static,
    ) -> Self {
        Self {
            input: Box::new(input),
            project: Box::new(project),
            cache: Mutex::new(None),
            recomputations: AtomicU64::new(0),
        }
    }

    /// Select from `state`, recomputing only if the input changed.
    pub fn select(&self, state: &G) -> O {
        let input = (self.input)(state);
        let mut cache = self.cache.lock();
        if let Some((cached_input, cached_output)) = cache.as_ref() {
            if cached_input.is_same(&input) {
                return cached_output.clone();
            }
        }

        let output = (self.project)(&input);
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        *cache = Some((input, output.clone()));
        output
    }

    /// Number of times the projection has run.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.load(Ordering::Relaxed)
    }
}

impl<G, I, O> Selector<G> for Memoized<G, I, O>
where
    I: SelectorInput,
    O: Clone + Send,
{
    type Output = O;

    fn select(&self, state: &G) -> O {
        Memoized::select(self, state)
    }
}

impl<G, I, O> std::fmt::Debug for Memoized<G, I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("recomputations", &self.recomputations.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
