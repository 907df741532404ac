//! Invitation workflow: issue, accept, reject, revoke.

use crate::access::domain::{AccessError, EmailAddress, InvalidEmail, OrganizationRole, UserId};
use crate::hierarchy::domain::OrganizationId;
use crate::invitation::domain::{
    Invitation, InvitationDomainError, InvitationId, InvitationStatus, IssuedToken, TokenHash,
};
use crate::invitation::ports::{
    DirectoryError, GatewayError, IdentityDirectory, InvitationNotifier, InvitationRepository,
    InvitationRepositoryError, OrganizationGateway, OrganizationSummary,
};
use crate::taxonomy::ErrorKind;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Roles allowed to issue and revoke invitations, as a display string for
/// denial messages.
const INVITER_ROLES: &str = "owner, admin";

/// Service-level errors for the invitation workflow.
#[derive(Debug, Error)]
pub enum InvitationWorkflowError {
    /// Invitation state machine rejected the transition.
    #[error(transparent)]
    Domain(#[from] InvitationDomainError),

    /// The email address failed validation.
    #[error(transparent)]
    InvalidEmail(#[from] InvalidEmail),

    /// The actor failed the access check.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] InvitationRepositoryError),

    /// Organization gateway operation failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Identity directory operation failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// No organization exists with the given identifier.
    #[error("organization {0} not found")]
    OrganizationNotFound(OrganizationId),

    /// The organization is scheduled for deletion.
    #[error("organization {0} is pending deletion")]
    OrganizationPendingDeletion(OrganizationId),

    /// The email already belongs to an organization member.
    #[error("{email} is already a member of the organization")]
    AlreadyMember {
        /// The invited address.
        email: EmailAddress,
    },

    /// An unexpired pending invitation already exists for this email,
    /// inviter, and organization.
    #[error("a pending invitation for {email} already exists")]
    DuplicatePending {
        /// The invited address.
        email: EmailAddress,
    },

    /// The token hash matches no stored invitation.
    #[error("unknown invitation token")]
    UnknownToken,

    /// The invitation expired before it was redeemed.
    #[error("invitation expired at {expires_at}")]
    Expired {
        /// The deadline that has passed.
        expires_at: DateTime<Utc>,
    },

    /// The redeeming identity's email does not match the invitation.
    #[error("the accepting identity's email does not match the invitation")]
    EmailMismatch,

    /// The redeeming identity has no resolvable account.
    #[error("no account found for user {0}")]
    UnknownActor(UserId),

    /// No invitation exists with the given identifier.
    #[error("invitation {0} not found")]
    NotFound(InvitationId),

    /// The organization owner role can never be granted by invitation.
    #[error("the owner role cannot be granted by invitation")]
    OwnerRoleReserved,
}

impl InvitationWorkflowError {
    /// Maps the error onto the transport-facing taxonomy.
    ///
    /// Returns `None` for persistence- and directory-layer failures, which
    /// have no transport mapping and propagate unchanged.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Domain(_) | Self::InvalidEmail(_) | Self::OrganizationPendingDeletion(_) => {
                Some(ErrorKind::InvalidState)
            }
            Self::Access(access) => Some(match access {
                AccessError::EntityNotFound => ErrorKind::NotFound,
                AccessError::NotAMember(_) | AccessError::InsufficientRole { .. } => {
                    ErrorKind::Forbidden
                }
            }),
            Self::Repository(repository) => match repository {
                InvitationRepositoryError::DuplicateId(_)
                | InvitationRepositoryError::VersionConflict { .. } => Some(ErrorKind::Conflict),
                InvitationRepositoryError::NotFound(_) => Some(ErrorKind::NotFound),
                InvitationRepositoryError::Persistence(_) => None,
            },
            Self::Gateway(gateway) => match gateway {
                GatewayError::OrganizationNotFound(_) => Some(ErrorKind::NotFound),
                GatewayError::Persistence(_) => None,
            },
            Self::Directory(_) => None,
            Self::OrganizationNotFound(_) | Self::UnknownActor(_) | Self::NotFound(_) => {
                Some(ErrorKind::NotFound)
            }
            Self::AlreadyMember { .. }
            | Self::DuplicatePending { .. }
            | Self::OwnerRoleReserved => Some(ErrorKind::Conflict),
            Self::UnknownToken => Some(ErrorKind::NotFound),
            Self::Expired { .. } => Some(ErrorKind::Expired),
            Self::EmailMismatch => Some(ErrorKind::Forbidden),
        }
    }
}

/// Result type for invitation workflow operations.
pub type InvitationWorkflowResult<T> = Result<T, InvitationWorkflowError>;

/// Request payload for issuing an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueInvitationRequest {
    organization: OrganizationId,
    email: String,
    role: OrganizationRole,
    invited_by: UserId,
    message: Option<String>,
}

impl IssueInvitationRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        organization: OrganizationId,
        email: impl Into<String>,
        role: OrganizationRole,
        invited_by: UserId,
    ) -> Self {
        Self {
            organization,
            email: email.into(),
            role,
            invited_by,
            message: None,
        }
    }

    /// Sets a personal message for the invitation email.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A stored invitation together with the raw token to transmit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedInvitation {
    /// The persisted invitation.
    pub invitation: Invitation,
    /// The raw token; this value is never stored and never reappears.
    pub raw_token: String,
}

/// Invitation workflow orchestration service.
#[derive(Clone)]
pub struct InvitationWorkflow<R, D, G, N, C>
where
    R: InvitationRepository,
    D: IdentityDirectory,
    G: OrganizationGateway,
    N: InvitationNotifier,
    C: Clock + Send + Sync,
{
    invitations: Arc<R>,
    directory: Arc<D>,
    gateway: Arc<G>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, D, G, N, C> InvitationWorkflow<R, D, G, N, C>
where
    R: InvitationRepository,
    D: IdentityDirectory,
    G: OrganizationGateway,
    N: InvitationNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new invitation workflow service.
    #[must_use]
    pub const fn new(
        invitations: Arc<R>,
        directory: Arc<D>,
        gateway: Arc<G>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            invitations,
            directory,
            gateway,
            notifier,
            clock,
        }
    }

    fn authorize_inviter(
        actor: UserId,
        role: Option<OrganizationRole>,
    ) -> InvitationWorkflowResult<()> {
        match role {
            Some(OrganizationRole::Owner | OrganizationRole::Admin) => Ok(()),
            Some(held) => Err(AccessError::InsufficientRole {
                user: actor,
                held: held.as_str(),
                required: INVITER_ROLES.to_owned(),
            }
            .into()),
            None => Err(AccessError::NotAMember(actor).into()),
        }
    }

    async fn find_summary_or_error(
        &self,
        organization: OrganizationId,
    ) -> InvitationWorkflowResult<OrganizationSummary> {
        self.gateway
            .find_summary(organization)
            .await?
            .ok_or(InvitationWorkflowError::OrganizationNotFound(organization))
    }

    /// Marks a pending-but-expired invitation as expired and persists the
    /// transition, then reports the expiry to the caller.
    async fn expire(&self, mut invitation: Invitation) -> InvitationWorkflowError {
        let expires_at = invitation.expires_at();
        if invitation.mark_expired(&*self.clock).is_ok()
            && let Err(err) = self.invitations.update(&invitation).await
        {
            warn!(invitation = %invitation.id(), error = %err, "failed to persist expiry");
        }
        InvitationWorkflowError::Expired { expires_at }
    }

    /// Issues an invitation and sends the invitation email.
    ///
    /// The email send is fire-and-forget: a delivery failure is logged
    /// and the stored invitation stands.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationWorkflowError::AlreadyMember`] when the email
    /// resolves to an existing member,
    /// [`InvitationWorkflowError::DuplicatePending`] when an unexpired
    /// pending invitation exists for the same email, inviter, and
    /// organization, plus organization, access, and validation errors.
    pub async fn issue(
        &self,
        request: IssueInvitationRequest,
    ) -> InvitationWorkflowResult<IssuedInvitation> {
        let summary = self.find_summary_or_error(request.organization).await?;
        let inviter_role = self
            .gateway
            .role_of(request.organization, request.invited_by)
            .await?;
        Self::authorize_inviter(request.invited_by, inviter_role)?;
        if !summary.active {
            return Err(InvitationWorkflowError::OrganizationPendingDeletion(
                request.organization,
            ));
        }
        if request.role == OrganizationRole::Owner {
            return Err(InvitationWorkflowError::OwnerRoleReserved);
        }

        let email = EmailAddress::new(request.email)?;
        if let Some(user) = self.directory.resolve_user_by_email(&email).await?
            && self
                .gateway
                .role_of(request.organization, user)
                .await?
                .is_some()
        {
            return Err(InvitationWorkflowError::AlreadyMember { email });
        }

        let now = self.clock.utc();
        if let Some(pending) = self
            .invitations
            .find_pending(&email, request.invited_by, request.organization)
            .await?
        {
            if pending.is_expired(now) {
                // Lazily retire the stale record so it stops blocking reissue.
                let _ = self.expire(pending).await;
            } else {
                return Err(InvitationWorkflowError::DuplicatePending { email });
            }
        }

        let (raw_token, token_hash) = IssuedToken::generate().into_parts();
        let invitation = Invitation::issue(
            request.organization,
            email.clone(),
            request.role,
            request.invited_by,
            request.message,
            token_hash,
            &*self.clock,
        );
        self.invitations.insert(&invitation).await?;

        if let Err(err) = self
            .notifier
            .send_invitation_email(&email, &raw_token, &summary)
            .await
        {
            warn!(invitation = %invitation.id(), error = %err, "invitation email failed");
        }

        Ok(IssuedInvitation {
            invitation,
            raw_token,
        })
    }

    /// Accepts an invitation by raw token, returning the organization the
    /// actor joined.
    ///
    /// When the accepting identity is known, its account email must match
    /// the invitation email (case-insensitively) and the actor is added to
    /// the organization through a conditional, idempotent member insert.
    /// With no actor supplied the invitation is consumed and the insert is
    /// deferred to the onboarding caller.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationWorkflowError::UnknownToken`] for an unknown
    /// hash, [`InvitationWorkflowError::Expired`] past the deadline,
    /// [`InvitationWorkflowError::Domain`] for non-pending invitations,
    /// and [`InvitationWorkflowError::EmailMismatch`] for the wrong
    /// identity.
    pub async fn accept(
        &self,
        raw_token: &str,
        actor: Option<UserId>,
    ) -> InvitationWorkflowResult<OrganizationId> {
        let hash = TokenHash::of(raw_token);
        let mut invitation = self
            .invitations
            .find_by_token_hash(&hash)
            .await?
            .ok_or(InvitationWorkflowError::UnknownToken)?;

        let now = self.clock.utc();
        if invitation.status() == InvitationStatus::Pending && invitation.is_expired(now) {
            return Err(self.expire(invitation).await);
        }

        if let Some(user) = actor {
            let account_email = self
                .directory
                .email_of(user)
                .await?
                .ok_or(InvitationWorkflowError::UnknownActor(user))?;
            if account_email != *invitation.email() {
                return Err(InvitationWorkflowError::EmailMismatch);
            }
        }

        invitation.accept(actor, &*self.clock)?;
        self.invitations.update(&invitation).await?;

        if let Some(user) = actor {
            let added = self
                .gateway
                .add_member_if_absent(invitation.organization(), user, invitation.role(), now)
                .await?;
            if !added {
                warn!(
                    invitation = %invitation.id(),
                    user = %user,
                    "acceptance found the user already a member; insert skipped"
                );
            }
        }

        Ok(invitation.organization())
    }

    /// Rejects an invitation by raw token.
    ///
    /// Rejection requires a known actor whose account email matches the
    /// invitation; no membership is touched.
    ///
    /// # Errors
    ///
    /// Returns the same token, expiry, state, and identity errors as
    /// acceptance.
    pub async fn reject(&self, raw_token: &str, actor: UserId) -> InvitationWorkflowResult<()> {
        let hash = TokenHash::of(raw_token);
        let mut invitation = self
            .invitations
            .find_by_token_hash(&hash)
            .await?
            .ok_or(InvitationWorkflowError::UnknownToken)?;

        let now = self.clock.utc();
        if invitation.status() == InvitationStatus::Pending && invitation.is_expired(now) {
            return Err(self.expire(invitation).await);
        }

        let account_email = self
            .directory
            .email_of(actor)
            .await?
            .ok_or(InvitationWorkflowError::UnknownActor(actor))?;
        if account_email != *invitation.email() {
            return Err(InvitationWorkflowError::EmailMismatch);
        }

        invitation.reject(&*self.clock)?;
        self.invitations.update(&invitation).await?;
        Ok(())
    }

    /// Revokes a pending invitation.
    ///
    /// Only the inviter or an organization owner/admin may revoke.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationWorkflowError::NotFound`] for unknown ids,
    /// access errors for other actors, and state errors for non-pending
    /// invitations.
    pub async fn revoke(&self, id: InvitationId, actor: UserId) -> InvitationWorkflowResult<()> {
        let mut invitation = self
            .invitations
            .find(id)
            .await?
            .ok_or(InvitationWorkflowError::NotFound(id))?;

        if invitation.invited_by() != actor {
            let role = self
                .gateway
                .role_of(invitation.organization(), actor)
                .await?;
            Self::authorize_inviter(actor, role)?;
        }

        let now = self.clock.utc();
        if invitation.status() == InvitationStatus::Pending && invitation.is_expired(now) {
            return Err(self.expire(invitation).await);
        }

        invitation.revoke(&*self.clock)?;
        self.invitations.update(&invitation).await?;
        Ok(())
    }

    /// Returns every invitation issued for an organization.
    ///
    /// The caller must hold owner or admin on the organization.
    ///
    /// # Errors
    ///
    /// Returns organization and access errors, plus repository errors from
    /// the listing.
    pub async fn list_for_organization(
        &self,
        organization: OrganizationId,
        actor: UserId,
    ) -> InvitationWorkflowResult<Vec<Invitation>> {
        self.find_summary_or_error(organization).await?;
        let role = self.gateway.role_of(organization, actor).await?;
        Self::authorize_inviter(actor, role)?;
        Ok(self.invitations.list_for_organization(organization).await?)
    }
}
