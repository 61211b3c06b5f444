use std::collections::HashSet;

/// Request-scoped guard around a side-effecting call.
///
/// The first call per key goes through; repeats within the same request
/// are dropped, so a page that mentions its own view count twice still
/// counts one view. Build one per request and drop it with the request -
/// there is deliberately no process-wide instance.
#[derive(Default)]
pub struct RequestMemo {
    seen: HashSet<String>,
}

impl RequestMemo {
    pub fn new() -> Self {
        Default::default()
    }

    /// True exactly once per key for the lifetime of this memo.
    pub fn first_call(&mut self, key: &str) -> bool {
        self.seen.insert(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_once_per_key() {
        let mut memo = RequestMemo::new();
        assert!(memo.first_call("hello-world"));
        assert!(!memo.first_call("hello-world"));
        assert!(!memo.first_call("hello-world"));
        assert!(memo.first_call("other-post"));
    }

    #[test]
    fn test_fresh_memo_forgets() {
        let mut memo = RequestMemo::new();
        assert!(memo.first_call("hello-world"));

        // A new request gets a new memo and the call fires again
        let mut memo = RequestMemo::new();
        assert!(memo.first_call("hello-world"));
    }
}
