//! Shared numeric context with explicit, reference-counted leases.
//!
//! Purpose
//! - Own the kernel and the kernel constants (`zero`, `one`) that every
//!   conversion in the context shares, and serialize conversions through one
//!   lock. There is no process-global state; callers pass a context around.
//!
//! Lifecycle
//! - `acquire` hands out a move-only `ContextLease`. The first live lease
//!   builds the constants, dropping the last one tears them down. The next
//!   `acquire` builds them again.
//! - The user count, the constants and every conversion sit behind the same
//!   `Mutex`. A poisoned lock is recovered; the state it guards is only ever
//!   replaced wholesale.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cfg::DdCfg;
use crate::dual::{self, DualResult};
use crate::error::DdError;
use crate::kernel::{Kernel, Scalar};
use crate::matrix::RepMatrix;

/// Kernel constants shared by all conversions of one context.
#[derive(Clone, Debug)]
pub(crate) struct Constants<S> {
    pub(crate) zero: S,
    pub(crate) one: S,
}

impl<S: Scalar> Constants<S> {
    fn new() -> Self {
        Self {
            zero: S::zero(),
            one: S::one(),
        }
    }
}

struct State<S> {
    users: usize,
    constants: Option<Constants<S>>,
}

struct Shared<K: Kernel> {
    kernel: K,
    state: Mutex<State<K::Scalar>>,
}

impl<K: Kernel> Shared<K> {
    fn lock(&self) -> MutexGuard<'_, State<K::Scalar>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cloneable handle to a shared numeric context.
pub struct NumericContext<K: Kernel> {
    shared: Arc<Shared<K>>,
}

impl<K: Kernel> Clone for NumericContext<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K: Kernel + Default> Default for NumericContext<K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

impl<K: Kernel> std::fmt::Debug for NumericContext<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericContext")
            .field("kernel", &self.shared.kernel)
            .field("users", &self.users())
            .finish()
    }
}

impl<K: Kernel> NumericContext<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            shared: Arc::new(Shared {
                kernel,
                state: Mutex::new(State {
                    users: 0,
                    constants: None,
                }),
            }),
        }
    }

    #[inline]
    pub fn kernel(&self) -> &K {
        &self.shared.kernel
    }

    /// Register a user; builds the constants on the first one.
    pub fn acquire(&self) -> ContextLease<K> {
        let mut st = self.shared.lock();
        st.users += 1;
        if st.users == 1 {
            st.constants = Some(Constants::new());
            debug!(kernel = self.shared.kernel.name(), "numeric context initialized");
        }
        ContextLease {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of live leases.
    pub fn users(&self) -> usize {
        self.shared.lock().users
    }

    /// Whether the kernel constants currently exist.
    pub fn is_initialized(&self) -> bool {
        self.shared.lock().constants.is_some()
    }

    #[cfg(test)]
    pub(crate) fn with_state_locked<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.shared.lock();
        f()
    }
}

/// Proof of registration with a `NumericContext`; releases on drop.
pub struct ContextLease<K: Kernel> {
    shared: Arc<Shared<K>>,
}

impl<K: Kernel> std::fmt::Debug for ContextLease<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextLease")
            .field("kernel", &self.shared.kernel)
            .finish()
    }
}

impl<K: Kernel> ContextLease<K> {
    #[inline]
    pub fn kernel(&self) -> &K {
        &self.shared.kernel
    }

    /// A new handle to the context this lease belongs to.
    pub fn context(&self) -> NumericContext<K> {
        NumericContext {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Convert an `f64` matrix inside the context's critical section.
    pub fn convert(
        &self,
        input: &RepMatrix<f64>,
        cfg: &DdCfg,
    ) -> Result<DualResult<K::Scalar>, DdError> {
        let native = RepMatrix::lift(&self.shared.kernel, input)?;
        self.convert_native(&native, cfg)
    }

    /// Convert a matrix already in the kernel's scalar type.
    pub fn convert_native(
        &self,
        input: &RepMatrix<K::Scalar>,
        cfg: &DdCfg,
    ) -> Result<DualResult<K::Scalar>, DdError> {
        let mut st = self.shared.lock();
        let constants = st.constants.get_or_insert_with(Constants::new);
        dual::convert(&self.shared.kernel, constants, input, cfg)
    }
}

impl<K: Kernel> Drop for ContextLease<K> {
    fn drop(&mut self) {
        let mut st = self.shared.lock();
        st.users = st.users.saturating_sub(1);
        if st.users == 0 {
            st.constants = None;
            debug!(kernel = self.shared.kernel.name(), "numeric context released");
        }
    }
}
