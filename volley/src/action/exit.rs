use async_trait::async_trait;

use super::Action;
use crate::session::Session;

/// Last action of every chain: the virtual user is done.
#[derive(Debug, Default, Clone, Copy)]
pub struct Exit;

#[async_trait]
impl Action for Exit {
    fn name(&self) -> &str {
        "exit"
    }

    async fn execute(&self, session: Session) {
        tracing::debug!(
            "User {} of scenario {} finished",
            session.user_id(),
            session.scenario()
        );
    }
}
