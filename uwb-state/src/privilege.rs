//! Scoped privilege elevation around notification dispatch.
//!
//! Observer code may live outside the triggering caller's security context.
//! The broker wraps every notification handoff in an elevation guard so the
//! handoff runs under the broker's own identity rather than whatever
//! identity the remote callback or registering caller carried in.

/// Opaque token returned by [`PrivilegeScope::acquire`].
pub type PrivilegeToken = u64;

/// Scoped acquire/release of an elevated dispatch identity.
///
/// `release` is called exactly once per `acquire`, unconditionally, whether
/// or not the guarded handoff succeeded.
pub trait PrivilegeScope: Send + Sync {
    /// Assume the elevated identity, returning a token for release.
    fn acquire(&self) -> PrivilegeToken;

    /// Restore the previous identity.
    fn release(&self, token: PrivilegeToken);
}

/// RAII guard pairing `acquire` with `release`.
pub struct PrivilegeGuard<'a> {
    scope: &'a dyn PrivilegeScope,
    token: PrivilegeToken,
}

impl<'a> PrivilegeGuard<'a> {
    /// Acquire the scope; released when the guard drops.
    pub fn acquire(scope: &'a dyn PrivilegeScope) -> Self {
        let token = scope.acquire();
        Self { scope, token }
    }
}

impl Drop for PrivilegeGuard<'_> {
    fn drop(&mut self) {
        self.scope.release(self.token);
    }
}

/// No-op scope for processes that already run with a suitable identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrivilege;

impl PrivilegeScope for NoPrivilege {
    fn acquire(&self) -> PrivilegeToken {
        0
    }

    fn release(&self, _token: PrivilegeToken) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Records acquire/release calls and hands out sequential tokens.
    struct RecordingScope {
        acquired: AtomicU64,
        released: AtomicU64,
        last_released_token: AtomicU64,
    }

    impl RecordingScope {
        fn new() -> Self {
            Self {
                acquired: AtomicU64::new(0),
                released: AtomicU64::new(0),
                last_released_token: AtomicU64::new(u64::MAX),
            }
        }
    }

    impl PrivilegeScope for RecordingScope {
        fn acquire(&self) -> PrivilegeToken {
            self.acquired.fetch_add(1, Ordering::SeqCst)
        }

        fn release(&self, token: PrivilegeToken) {
            self.released.fetch_add(1, Ordering::SeqCst);
            self.last_released_token.store(token, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_guard_pairs_acquire_with_release() {
        let scope = RecordingScope::new();

        {
            let _guard = PrivilegeGuard::acquire(&scope);
            assert_eq!(scope.acquired.load(Ordering::SeqCst), 1);
            assert_eq!(scope.released.load(Ordering::SeqCst), 0);
        }

        assert_eq!(scope.released.load(Ordering::SeqCst), 1);
        assert_eq!(scope.last_released_token.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_guard_releases_matching_token() {
        let scope = RecordingScope::new();

        drop(PrivilegeGuard::acquire(&scope));
        drop(PrivilegeGuard::acquire(&scope));

        assert_eq!(scope.acquired.load(Ordering::SeqCst), 2);
        assert_eq!(scope.released.load(Ordering::SeqCst), 2);
        assert_eq!(scope.last_released_token.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_privilege_is_inert() {
        let _guard = PrivilegeGuard::acquire(&NoPrivilege);
    }
}
