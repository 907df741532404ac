//! Shared harness for invitation workflow tests.

use crate::access::domain::{EmailAddress, UserId};
use crate::clock::FixedClock;
use crate::hierarchy::adapters::memory::InMemoryHierarchy;
use crate::hierarchy::domain::Organization;
use crate::hierarchy::services::OrganizationService;
use crate::invitation::adapters::memory::{
    InMemoryDirectory, InMemoryInvitationRepository, RecordingInvitationNotifier,
};
use crate::invitation::services::InvitationWorkflow;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub(crate) type TestWorkflow = InvitationWorkflow<
    InMemoryInvitationRepository,
    InMemoryDirectory,
    InMemoryHierarchy,
    RecordingInvitationNotifier,
    FixedClock,
>;

/// A fixed, arbitrary starting instant for deterministic expiry.
pub(crate) fn day_zero() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("valid timestamp literal"),
    }
}

/// Workflow, boundaries, and a seeded organization.
pub(crate) struct Harness {
    pub clock: Arc<FixedClock>,
    pub directory: Arc<InMemoryDirectory>,
    pub notifier: Arc<RecordingInvitationNotifier>,
    pub store: Arc<InMemoryHierarchy>,
    pub workflow: TestWorkflow,
    pub organization: Organization,
    pub owner: UserId,
}

impl Harness {
    pub(crate) async fn new() -> Self {
        let clock = Arc::new(FixedClock::new(day_zero()));
        let store = Arc::new(InMemoryHierarchy::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let notifier = Arc::new(RecordingInvitationNotifier::new());
        let invitations = Arc::new(InMemoryInvitationRepository::new());

        let owner = UserId::new();
        let organization = OrganizationService::new(store.clone(), clock.clone())
            .create("Acme", owner)
            .await
            .expect("organization creation should succeed");

        let workflow = InvitationWorkflow::new(
            invitations,
            directory.clone(),
            store.clone(),
            notifier.clone(),
            clock.clone(),
        );

        Self {
            clock,
            directory,
            notifier,
            store,
            workflow,
            organization,
            owner,
        }
    }

    /// Registers an account in the identity directory.
    pub(crate) fn register(&self, email: &str) -> UserId {
        let user = UserId::new();
        self.directory
            .register(user, EmailAddress::new(email).expect("valid address"))
            .expect("registration should succeed");
        user
    }
}
