//! Member identity stored in the signed session cookie.
//!
//! The cookie holds a single value, the numeric member id under
//! [`MEMBER_ID_KEY`]. Handlers go through [`MemberSession`] rather than the
//! raw Actix session so the key and its encoding live in one place.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, MemberId};

pub(crate) const MEMBER_ID_KEY: &str = "member_id";

/// Session cookie viewed as "which member, if any, is signed in".
#[derive(Clone)]
pub struct MemberSession(Session);

impl MemberSession {
    /// Record `member_id` as signed in.
    ///
    /// The session key is rotated before writing so a cookie issued before
    /// login never becomes an authenticated one.
    pub fn sign_in(&self, member_id: MemberId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(MEMBER_ID_KEY, member_id.get())
            .map_err(|error| Error::internal(format!("session write failed: {error}")))
    }

    /// Signed-in member, or `None` for anonymous callers.
    ///
    /// A value that does not decode as a member id is treated as anonymous.
    pub fn member_id(&self) -> Option<MemberId> {
        self.0
            .get::<i64>(MEMBER_ID_KEY)
            .unwrap_or_else(|error| {
                warn!(%error, "discarding undecodable member id from session");
                None
            })
            .map(MemberId::new)
    }

    /// Signed-in member, or `unauthorized` for anonymous callers.
    pub fn require_member(&self) -> Result<MemberId, Error> {
        self.member_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Forget the member and tell the client to drop the cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }
}

impl FromRequest for MemberSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { Ok(Self(session.await?)) })
    }
}
