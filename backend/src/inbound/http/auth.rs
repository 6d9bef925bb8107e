//! Authenticated caller extraction.
//!
//! [`AuthenticatedMember`] resolves the member id stored in the session and
//! confirms through [`crate::domain::ports::MemberQuery`] that the member
//! still exists. Handlers that take it as an argument never run for
//! anonymous or stale sessions.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, MemberId};

use super::session::MemberSession;
use super::state::HttpState;

/// Identity of the member making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedMember(MemberId);

impl AuthenticatedMember {
    /// Member id of the caller.
    pub fn id(self) -> MemberId {
        self.0
    }
}

async fn resolve(session: MemberSession, state: web::Data<HttpState>) -> Result<MemberId, Error> {
    let member_id = session.require_member()?;
    if state.members_query.member_exists(member_id).await? {
        Ok(member_id)
    } else {
        debug!(%member_id, "session refers to a member that no longer exists");
        session.sign_out();
        Err(Error::unauthorized("login required"))
    }
}

impl FromRequest for AuthenticatedMember {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = MemberSession::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let session = session.await.map_err(Error::from)?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            resolve(session, state).await.map(AuthenticatedMember)
        })
    }
}
