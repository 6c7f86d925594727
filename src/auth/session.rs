// Session Guard - the per-(tenant, caller) PIN-elevated session table.
//
// Elevation is an ephemeral, revocable grant: created by a successful PIN
// check, consulted before every sensitive admin action, expired after an idle
// TTL and cleared on explicit lock. Absence always means locked.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use uuid::Uuid;

#[derive(Debug)]
pub struct SessionGuard {
    ttl: Duration,
    entries: Mutex<HashMap<(Uuid, String), Instant>>,
}

impl SessionGuard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn key(tenant_id: Uuid, caller: &str) -> (Uuid, String) {
        (tenant_id, caller.to_ascii_lowercase())
    }

    /// Compare the supplied PIN against the tenant's stored bcrypt hash.
    /// A successful check also unlocks the caller's session for this tenant.
    pub fn check_pin(&self, tenant_id: Uuid, caller: &str, pin: &str, pin_hash: &str) -> bool {
        let ok = bcrypt::verify(pin, pin_hash).unwrap_or(false);
        if ok {
            self.unlock(tenant_id, caller);
        } else {
            tracing::warn!(%tenant_id, caller, "PIN verification failed");
        }
        ok
    }

    /// Whether this caller currently holds an unexpired elevation for this
    /// tenant. Expired entries are dropped on the way out.
    pub fn is_unlocked(&self, tenant_id: Uuid, caller: &str) -> bool {
        let key = Self::key(tenant_id, caller);
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some(deadline) if Instant::now() < *deadline => true,
            Some(_) => {
                entries.remove(&key);
                false
            }
            None => false,
        }
    }

    pub fn unlock(&self, tenant_id: Uuid, caller: &str) {
        let deadline = Instant::now() + self.ttl;
        self.entries
            .lock()
            .insert(Self::key(tenant_id, caller), deadline);
    }

    /// Drop the caller's elevation (logout or explicit re-lock).
    pub fn lock(&self, tenant_id: Uuid, caller: &str) {
        self.entries.lock().remove(&Self::key(tenant_id, caller));
    }
}
