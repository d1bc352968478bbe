use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket for one debounced pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Issues increasing tokens; only the most recent one may apply its result.
#[derive(Debug, Default)]
pub struct LatestWins {
    current: AtomicU64,
}

impl LatestWins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_token_wins() {
        let tokens = LatestWins::new();
        let a = tokens.issue();
        assert!(tokens.is_latest(a));
        let b = tokens.issue();
        assert!(b > a);
        assert!(!tokens.is_latest(a));
        assert!(tokens.is_latest(b));
    }
}
