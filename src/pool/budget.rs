//! GPU memory accounting for pooled resources
//!
//! Tracks estimated GPU bytes held by the pool and reports pressure so the
//! scene can degrade before the device runs out of memory.

/// Memory budget tracker
#[derive(Clone, Debug)]
pub struct MemoryBudget {
    /// Maximum GPU memory allowed (bytes)
    budget_bytes: usize,
    /// Currently used GPU memory (bytes)
    used_bytes: usize,
}

impl MemoryBudget {
    /// Create a new memory budget
    ///
    /// # Arguments
    /// * `budget_mb` - Maximum GPU memory in megabytes
    pub fn new(budget_mb: usize) -> Self {
        Self {
            budget_bytes: budget_mb * 1024 * 1024,
            used_bytes: 0,
        }
    }

    /// Record an allocation
    pub fn add(&mut self, bytes: usize) {
        self.used_bytes = self.used_bytes.saturating_add(bytes);
    }

    /// Record a release
    pub fn remove(&mut self, bytes: usize) {
        self.used_bytes = self.used_bytes.saturating_sub(bytes);
    }

    /// Forget all tracked usage
    pub fn reset(&mut self) {
        self.used_bytes = 0;
    }

    /// Bytes currently in use
    pub fn used(&self) -> usize {
        self.used_bytes
    }

    /// Bytes still available under the budget
    pub fn available(&self) -> usize {
        self.budget_bytes.saturating_sub(self.used_bytes)
    }

    /// Memory pressure (0.0 to 1.0+)
    ///
    /// Values above 1.0 indicate over-budget.
    pub fn pressure(&self) -> f32 {
        if self.budget_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f32 / self.budget_bytes as f32
    }

    /// True once pressure exceeds `threshold`
    pub fn is_under_pressure(&self, threshold: f32) -> bool {
        self.pressure() > threshold
    }
}
