//! Conversion on a background thread with a caller-side deadline.
//!
//! The engine has no interruption point. On timeout the worker keeps running
//! to completion, holding its own lease, and its result is dropped.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::cfg::DdCfg;
use crate::context::NumericContext;
use crate::dual::DualResult;
use crate::error::DdError;
use crate::kernel::Kernel;
use crate::matrix::RepMatrix;

pub fn convert_with_timeout<K: Kernel>(
    ctx: &NumericContext<K>,
    input: RepMatrix<f64>,
    cfg: DdCfg,
    timeout: Duration,
) -> Result<DualResult<K::Scalar>, DdError> {
    let (tx, rx) = mpsc::channel();
    let ctx = ctx.clone();
    thread::Builder::new()
        .name("polydd-worker".into())
        .spawn(move || {
            let lease = ctx.acquire();
            // receiver may be gone after a timeout
            let _ = tx.send(lease.convert(&input, &cfg));
        })
        .map_err(|_| DdError::WorkerLost)?;
    match rx.recv_timeout(timeout) {
        Ok(res) => res,
        Err(RecvTimeoutError::Timeout) => {
            warn!(?timeout, "conversion timed out; result will be discarded");
            Err(DdError::Timeout(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => Err(DdError::WorkerLost),
    }
}
