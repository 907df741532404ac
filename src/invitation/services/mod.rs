//! Orchestration services for the invitation workflow.

mod workflow;

pub use workflow::{
    InvitationWorkflow, InvitationWorkflowError, InvitationWorkflowResult, IssueInvitationRequest,
    IssuedInvitation,
};
