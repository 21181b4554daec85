use std::fmt;
use std::sync::{Arc, Mutex};

pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// A callback that runs at most once, however many clones try to fire it.
#[derive(Clone, Default)]
pub struct Completion(Arc<Mutex<Option<CompletionCallback>>>);

impl Completion {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::from_option(Some(Box::new(callback)))
    }

    pub fn from_option(callback: Option<CompletionCallback>) -> Self {
        Self(Arc::new(Mutex::new(callback)))
    }

    /// Run the callback if nobody has yet. Returns whether this call ran it.
    pub fn fire(&self) -> bool {
        let callback = self.0.lock().unwrap_or_else(|p| p.into_inner()).take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).is_some()
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Completion").field(&self.is_pending()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn fires_once_across_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let completion = Completion::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let other = completion.clone();

        assert!(completion.is_pending());
        assert!(other.fire());
        assert!(!completion.fire());
        assert!(!other.fire());
        assert!(!completion.is_pending());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_fires_run_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let completion = Completion::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let completion = completion.clone();
                thread::spawn(move || completion.fire())
            })
            .collect();
        let fired = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|fired| *fired)
            .count();

        assert_eq!(fired, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_completion_never_fires() {
        let completion = Completion::default();
        assert!(!completion.is_pending());
        assert!(!completion.fire());
    }

    #[test]
    fn callback_may_fire_its_own_completion() {
        let slot: Arc<Mutex<Option<Completion>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let completion = Completion::new(move || {
            if let Some(c) = inner.lock().unwrap().as_ref() {
                assert!(!c.fire());
            }
        });
        *slot.lock().unwrap() = Some(completion.clone());
        assert!(completion.fire());
    }
}
