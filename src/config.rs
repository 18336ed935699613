use serde::Deserialize;

/// Limits applied to every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deepest allowed chain of pending function calls. `None` leaves the
    /// worker stack as the only bound; either way running out of room fails
    /// with "Stack overflow".
    pub max_call_depth: Option<usize>,
    /// Stack size in bytes of the thread a program runs on. Values below
    /// [`Config::MIN_WORKER_STACK_SIZE`] are raised to it.
    pub worker_stack_size: usize,
    /// Largest element count `new T[size]` may allocate.
    pub max_array_length: usize,
}

impl Config {
    pub const DEFAULT_WORKER_STACK_SIZE: usize = 256 * 1024 * 1024;
    pub const MIN_WORKER_STACK_SIZE: usize = 4 * 1024 * 1024;
    pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 64 * 1024 * 1024;

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = Some(max_call_depth);
        self
    }

    pub fn with_max_array_length(mut self, max_array_length: usize) -> Self {
        self.max_array_length = max_array_length;
        self
    }

    pub fn with_worker_stack_size(mut self, worker_stack_size: usize) -> Self {
        self.worker_stack_size = worker_stack_size;
        self
    }

    /// Stack size actually requested for the worker thread.
    pub fn effective_stack_size(&self) -> usize {
        self.worker_stack_size.max(Self::MIN_WORKER_STACK_SIZE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: None,
            worker_stack_size: Self::DEFAULT_WORKER_STACK_SIZE,
            max_array_length: Self::DEFAULT_MAX_ARRAY_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_yaml::from_str("max_call_depth: 16").expect("valid yaml");
        assert_eq!(config.max_call_depth, Some(16));
        assert_eq!(config.worker_stack_size, Config::DEFAULT_WORKER_STACK_SIZE);
        assert_eq!(config.max_array_length, Config::DEFAULT_MAX_ARRAY_LENGTH);

        let config: Config = serde_yaml::from_str("{}").expect("valid yaml");
        assert_eq!(config, Config::default());
        assert_eq!(config.max_call_depth, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config: Config =
            serde_yaml::from_str("worker_stack_size: 8388608\nverbose: true").expect("valid yaml");
        assert_eq!(config.worker_stack_size, 8 * 1024 * 1024);
    }

    #[test]
    fn tiny_worker_stacks_are_raised_to_the_minimum() {
        let config = Config::default().with_worker_stack_size(64 * 1024);
        assert_eq!(config.effective_stack_size(), Config::MIN_WORKER_STACK_SIZE);
        let config = Config::default().with_worker_stack_size(32 * 1024 * 1024);
        assert_eq!(config.effective_stack_size(), 32 * 1024 * 1024);
    }
}
