//! API key pool.
//!
//! An ordered set of user-supplied API keys plus a cursor marking the key
//! currently in use. The pool is owned by the application's composition root
//! and handed to the client as an `Arc<KeyPool>`, so the settings screen can
//! replace the keys at any time while generation calls are in flight.
//!
//! Replacement is always wholesale: a new comma-separated string swaps the
//! whole list and resets the cursor. Rotation (`advance`) is the only partial
//! mutation. The cursor deliberately persists across calls so that a key
//! already known to be out of quota is not retried first on the next call.

use std::sync::Mutex;

#[derive(Debug, Default)]
struct PoolState {
    keys: Vec<String>,
    cursor: usize,
}

/// Shared, replaceable pool of API keys.
#[derive(Default)]
pub struct KeyPool {
    state: Mutex<PoolState>,
}

impl KeyPool {
    /// Create an empty pool. Operations fail with a configuration error
    /// until keys are provided.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool from a comma-separated key string.
    pub fn from_raw(raw: &str) -> Self {
        let pool = Self::new();
        pool.set_keys(raw);
        pool
    }

    /// Replace the pool contents from a comma-separated key string.
    ///
    /// Pieces are trimmed and empty pieces dropped. The cursor resets to 0.
    pub fn set_keys(&self, raw: &str) {
        let keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect();
        let mut state = self.state.lock().expect("key pool lock poisoned");
        tracing::info!(count = keys.len(), "configured API key pool");
        state.keys = keys;
        state.cursor = 0;
    }

    /// Snapshot of the current cursor position and key, or `None` when the
    /// pool is empty.
    pub fn current(&self) -> Option<(usize, String)> {
        let state = self.state.lock().expect("key pool lock poisoned");
        state
            .keys
            .get(state.cursor)
            .map(|key| (state.cursor, key.clone()))
    }

    /// Move the cursor to the next key, wrapping around. No-op on an empty
    /// pool.
    pub fn advance(&self) {
        let mut state = self.state.lock().expect("key pool lock poisoned");
        if !state.keys.is_empty() {
            state.cursor = (state.cursor + 1) % state.keys.len();
        }
    }

    /// Number of keys currently in the pool.
    pub fn len(&self) -> usize {
        self.state.lock().expect("key pool lock poisoned").keys.len()
    }

    /// Whether the pool holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.state.lock().expect("key pool lock poisoned").cursor
    }
}

// Key material must not leak through debug output.
impl std::fmt::Debug for KeyPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().expect("key pool lock poisoned");
        f.debug_struct("KeyPool")
            .field("len", &state.keys.len())
            .field("cursor", &state.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_comma_separated_keys() {
        let pool = KeyPool::from_raw(" k1 , ,k2,  ,k3 ");
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.current(), Some((0, "k1".to_string())));
    }

    #[test]
    fn empty_input_yields_empty_pool() {
        let pool = KeyPool::from_raw("  , ,");
        assert!(pool.is_empty());
        assert_eq!(pool.current(), None);
    }

    #[test]
    fn advance_wraps_around() {
        let pool = KeyPool::from_raw("a,b");
        pool.advance();
        assert_eq!(pool.current(), Some((1, "b".to_string())));
        pool.advance();
        assert_eq!(pool.current(), Some((0, "a".to_string())));
    }

    #[test]
    fn advance_on_empty_pool_is_a_no_op() {
        let pool = KeyPool::new();
        pool.advance();
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn replacement_resets_cursor() {
        let pool = KeyPool::from_raw("a,b,c");
        pool.advance();
        pool.advance();
        assert_eq!(pool.cursor(), 2);
        pool.set_keys("x,y");
        assert_eq!(pool.current(), Some((0, "x".to_string())));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let pool = KeyPool::from_raw("super-secret");
        let printed = format!("{pool:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("len: 1"));
    }
}
