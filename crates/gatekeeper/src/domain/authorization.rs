//! Authorization helpers backed by the lilt gate.

use lilt::context::PolicyContext;

use crate::error::ApiResult;
use crate::middleware::identity::Identity;
use crate::state::AppState;

/// Build a fresh policy context for the current request.
pub fn build_policy_context(state: &AppState, identity: &Identity) -> PolicyContext {
    match identity.caller {
        Some(id) => PolicyContext::signed_in(id, state.policy_store.clone()),
        None => PolicyContext::anonymous(state.policy_store.clone()),
    }
}

/// Check that the configured rule for `action` permits this caller.
pub async fn require_action(state: &AppState, identity: &Identity, action: &str) -> ApiResult<()> {
    let ctx = build_policy_context(state, identity);
    state.gate.authorize(action, &ctx).await?;
    Ok(())
}
