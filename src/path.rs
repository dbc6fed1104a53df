//! Path selection and the consumed-once override flag
//!
//! The override flag is process-wide state armed by an external actor before
//! a submission attempt. It is read-and-cleared atomically at submission
//! time, so no attempt can observe a flag value written for a different
//! attempt; the engine additionally clears the store on every attempt exit
//! path.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::eligibility::SponsorshipEligibility;
use crate::types::Path;

/// Storage for the alternate-provider override flag
///
/// Persistent implementations (surviving a page reload) are external
/// collaborators; [`InMemoryOverrideStore`] is the process-local default.
pub trait PathOverrideStore: Send + Sync {
    /// Arm the override for the next submission attempt
    fn set(&self);

    /// Atomically read and clear the flag
    fn take(&self) -> bool;

    /// Unconditionally clear the flag
    fn clear(&self);
}

/// Process-local override store
#[derive(Debug, Default)]
pub struct InMemoryOverrideStore {
    armed: AtomicBool,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PathOverrideStore for InMemoryOverrideStore {
    fn set(&self) {
        self.armed.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.armed.swap(false, Ordering::AcqRel)
    }

    fn clear(&self) {
        self.armed.store(false, Ordering::Release);
    }
}

/// Select the submission path for one attempt
///
/// Precedence: the override wins unconditionally (provider-directed,
/// independent of sponsorship eligibility), then sponsorship eligibility,
/// then the standard path.
pub fn select_path(eligibility: &SponsorshipEligibility, override_armed: bool) -> Path {
    if override_armed {
        return Path::AlternateProvider;
    }
    if eligibility.is_eligible() {
        Path::Sponsored
    } else {
        Path::Standard
    }
}
