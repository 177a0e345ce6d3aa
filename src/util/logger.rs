use std::fmt::{Display, Formatter};

use super::Log;

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Order of this log level, used to decide whether a trace line at a
    /// given level should be printed.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Print a single `Machine::step` trace line at [`Log::Verbose`] level
    /// or above. No-op outside debug builds.
    pub fn trace_step(&self, step: usize, message: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose(()).order() {
            println!("[{}; step {}]: {}", self, step, message);
        }
        #[cfg(not(debug_assertions))]
        let _ = (step, message);
    }
}
