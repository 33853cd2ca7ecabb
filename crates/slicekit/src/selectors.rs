//! Envelope selectors shared by every slice.

use slicekit_core::{create_selector, HasMeta, IsoTimestamp, Memoized};
use std::sync::Arc;

/// Names of the envelope selectors, in declaration order.
pub const META_SELECTOR_NAMES: [&str; 5] = [
    "selectSliceState",
    "selectStatus",
    "selectError",
    "selectLastModified",
    "selectLastHydrated",
];

/// Memoized selectors over a slice's envelope.
pub struct MetaSelectors<G, St: HasMeta> {
    /// The whole slice state
    pub select_slice_state: Memoized<G, Arc<St>, Arc<St>>,
    /// Envelope status
    pub select_status: Memoized<G, Arc<St>, St::Status>,
    /// Envelope error
    pub select_error: Memoized<G, Arc<St>, Option<St::Error>>,
    /// Last local modification
    pub select_last_modified: Memoized<G, Arc<St>, Option<IsoTimestamp>>,
    /// Last hydration
    pub select_last_hydrated: Memoized<G, Arc<St>, Option<IsoTimestamp>>,
}

impl<G, St> MetaSelectors<G, St>
where
    G: 'static,
    St: HasMeta + Send + Sync + 'static,
    St::Status: Clone + Send + 'static,
    St::Error: Clone + Send + 'static,
{
    /// Bind the envelope selectors to a slice state projection.
    pub fn new(select_slice_state: fn(&G) -> &Arc<St>) -> Self {
        let input = move |state: &G| Arc::clone(select_slice_state(state));
        Self {
            select_slice_state: create_selector(input, |st: &Arc<St>| Arc::clone(st)),
            select_status: create_selector(input, |st: &Arc<St>| st.meta().status.clone()),
            select_error: create_selector(input, |st: &Arc<St>| st.meta().error.clone()),
            select_last_modified: create_selector(input, |st: &Arc<St>| {
                st.meta().last_modified.clone()
            }),
            select_last_hydrated: create_selector(input, |st: &Arc<St>| {
                st.meta().last_hydrated.clone()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicekit_core::{MetaState, StateStatus};

    struct Global {
        meta: Arc<MetaState>,
    }

    fn select_meta(state: &Global) -> &Arc<MetaState> {
        &state.meta
    }

    #[test]
    fn test_envelope_selectors_read_fields() {
        let selectors = MetaSelectors::new(select_meta);
        let mut meta = MetaState::default();
        meta.set_status(StateStatus::Ready);
        meta.mark_modified(IsoTimestamp::parse("2024-01-01T00:00:00.000+00:00").unwrap());
        let state = Global {
            meta: Arc::new(meta),
        };

        assert_eq!(selectors.select_status.select(&state), StateStatus::Ready);
        assert_eq!(selectors.select_error.select(&state), None);
        assert!(selectors.select_last_modified.select(&state).is_some());
        assert_eq!(selectors.select_last_hydrated.select(&state), None);
        assert!(Arc::ptr_eq(
            &selectors.select_slice_state.select(&state),
            &state.meta
        ));
    }

    #[test]
    fn test_envelope_selectors_memoize_per_state() {
        let selectors = MetaSelectors::new(select_meta);
        let mut state = Global {
            meta: Arc::new(MetaState::default()),
        };
        selectors.select_status.select(&state);
        selectors.select_status.select(&state);
        assert_eq!(selectors.select_status.recomputations(), 1);

        state.meta = Arc::new(MetaState::default());
        selectors.select_status.select(&state);
        assert_eq!(selectors.select_status.recomputations(), 2);
    }
}
