use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendState {
    Connected,
    Disconnected,
}

#[derive(Debug)]
struct MonitorState {
    consecutive_failures: u32,
    backend: BackendState,
}

/// Shared indicator of backend reachability.
///
/// The state only changes through [`observe`](ConnectivityMonitor::observe).
/// `threshold` consecutive `BackendUnavailable` outcomes flip it to
/// `Disconnected`; any other outcome, including a `NotFound`, proves the
/// backend answered and flips it back to `Connected`.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    threshold: u32,
    state: Mutex<MonitorState>,
}

impl ConnectivityMonitor {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            state: Mutex::new(MonitorState {
                consecutive_failures: 0,
                backend: BackendState::Connected,
            }),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn state(&self) -> BackendState {
        self.state.lock().backend
    }

    pub fn is_connected(&self) -> bool {
        self.state() == BackendState::Connected
    }

    /// Records the outcome of a storage operation
    pub fn observe<T>(&self, result: &ApiResult<T>) {
        let mut state = self.state.lock();
        match result {
            Err(ApiError::BackendUnavailable(message)) => {
                state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                if state.backend == BackendState::Connected
                    && state.consecutive_failures >= self.threshold
                {
                    state.backend = BackendState::Disconnected;
                    tracing::error!(
                        failures = state.consecutive_failures,
                        error = %message,
                        "backend marked disconnected"
                    );
                }
            }
            _ => {
                state.consecutive_failures = 0;
                if state.backend == BackendState::Disconnected {
                    state.backend = BackendState::Connected;
                    tracing::info!("backend connection restored");
                }
            }
        }
    }

    /// Refuses writes while disconnected; there is no offline queue
    pub fn ensure_writable(&self) -> ApiResult<()> {
        match self.state() {
            BackendState::Connected => Ok(()),
            BackendState::Disconnected => Err(ApiError::BackendUnavailable(
                "backend is disconnected, writes are refused".to_string(),
            )),
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD)
    }
}

/// Result of a read that degrades instead of failing when the backend is down
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    /// `BackendUnavailable` becomes `Unavailable`; other errors are kept
    pub fn from_result(result: ApiResult<T>) -> ApiResult<Self> {
        match result {
            Ok(value) => Ok(Availability::Available(value)),
            Err(ApiError::BackendUnavailable(_)) => Ok(Availability::Unavailable),
            Err(e) => Err(e),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Availability::Available(value) => value,
            Availability::Unavailable => T::default(),
        }
    }
}
