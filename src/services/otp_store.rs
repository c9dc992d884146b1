use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;

/// Codes expire five minutes after issue.
const OTP_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    Mismatch,
    Expired,
    Unknown,
}

struct OtpEntry {
    code: String,
    issued_at: Instant,
}

/// In-process OTP map keyed by phone number. Codes are single-use: a
/// successful verify consumes the entry, as does expiry.
pub struct OtpStore {
    entries: Mutex<HashMap<String, OtpEntry>>,
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpStore {
    pub fn new() -> Self {
        OtpStore {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh 6-digit code for the phone, replacing any earlier one.
    pub fn issue(&self, phone: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        self.insert(phone, code.clone(), Instant::now());
        code
    }

    fn insert(&self, phone: &str, code: String, issued_at: Instant) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(phone.to_string(), OtpEntry { code, issued_at });
    }

    pub fn verify(&self, phone: &str, code: &str) -> VerifyOutcome {
        let mut entries = self.entries.lock().unwrap();
        let Some(entry) = entries.get(phone) else {
            return VerifyOutcome::Unknown;
        };
        if entry.issued_at.elapsed() >= OTP_TTL {
            entries.remove(phone);
            return VerifyOutcome::Expired;
        }
        if entry.code != code {
            return VerifyOutcome::Mismatch;
        }
        entries.remove(phone);
        VerifyOutcome::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_code_verifies_once() {
        let store = OtpStore::new();
        let code = store.issue("9876543210");
        assert_eq!(code.len(), 6);
        assert_eq!(store.verify("9876543210", &code), VerifyOutcome::Verified);
        // Consumed on success.
        assert_eq!(store.verify("9876543210", &code), VerifyOutcome::Unknown);
    }

    #[test]
    fn wrong_code_is_a_mismatch_and_stays_usable() {
        let store = OtpStore::new();
        let code = store.issue("9876543210");
        assert_eq!(store.verify("9876543210", "000000"), VerifyOutcome::Mismatch);
        assert_eq!(store.verify("9876543210", &code), VerifyOutcome::Verified);
    }

    #[test]
    fn unknown_phone_is_rejected() {
        let store = OtpStore::new();
        assert_eq!(store.verify("0000000000", "123456"), VerifyOutcome::Unknown);
    }

    #[test]
    fn expired_code_is_rejected_and_removed() {
        let store = OtpStore::new();
        let issued_at = Instant::now() - OTP_TTL - Duration::from_secs(1);
        store.insert("9876543210", "123456".to_string(), issued_at);
        assert_eq!(store.verify("9876543210", "123456"), VerifyOutcome::Expired);
        assert_eq!(store.verify("9876543210", "123456"), VerifyOutcome::Unknown);
    }

    #[test]
    fn reissue_replaces_the_previous_code() {
        let store = OtpStore::new();
        let first = store.issue("9876543210");
        let second = store.issue("9876543210");
        if first != second {
            assert_eq!(store.verify("9876543210", &first), VerifyOutcome::Mismatch);
        }
        assert_eq!(store.verify("9876543210", &second), VerifyOutcome::Verified);
    }
}
