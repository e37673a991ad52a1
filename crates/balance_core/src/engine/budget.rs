use std::time::{Duration, Instant};

/// Search budget to keep optimization passes bounded.
/// Tracks iterations and wall-clock time; either limit may be left open.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    start_time: Instant,
    max_wall_ms: Option<u64>,
    max_iterations: Option<usize>,

    iterations_done: usize,
}

impl SearchBudget {
    pub fn new(max_wall_ms: Option<u64>, max_iterations: Option<usize>) -> Self {
        Self { start_time: Instant::now(), max_wall_ms, max_iterations, iterations_done: 0 }
    }

    pub fn iterations(max_iterations: usize) -> Self {
        Self::new(None, Some(max_iterations))
    }

    /// Count one iteration and report whether the search may continue.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.iterations_done += 1;
        !self.is_exceeded()
    }

    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.is_timeout() || self.is_iteration_overflow()
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        match self.max_wall_ms {
            Some(ms) => self.start_time.elapsed() > Duration::from_millis(ms),
            None => false,
        }
    }

    #[inline]
    pub fn is_iteration_overflow(&self) -> bool {
        match self.max_iterations {
            Some(max) => self.iterations_done > max,
            None => false,
        }
    }

    pub fn iterations_done(&self) -> usize {
        self.iterations_done
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    pub fn exceeded_reason(&self) -> Option<String> {
        if self.is_timeout() {
            Some(format!(
                "Wall clock timeout: {}ms > {}ms",
                self.elapsed_ms(),
                self.max_wall_ms.unwrap_or_default()
            ))
        } else if self.is_iteration_overflow() {
            Some(format!(
                "Iteration overflow: {} > {}",
                self.iterations_done,
                self.max_iterations.unwrap_or_default()
            ))
        } else {
            None
        }
    }
}
