//! Correlation identifier carried by every templatehub request.
//!
//! The HTTP middleware installs one identifier per request; log spans and
//! error envelopes read it back through [`TraceId::current`] instead of
//! threading it through handler and service signatures.
//!
//! The value lives in a Tokio task-local, so work moved onto another task
//! must be wrapped in [`TraceId::scope`] again to keep the correlation.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used both to accept a caller-supplied identifier and to echo the
/// identifier on responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    pub(crate) static TRACE_ID: TraceId;
}

/// Identifier correlating log lines and error bodies for one request.
///
/// # Examples
/// ```
/// use templatehub::TraceId;
///
/// fn correlation() -> String {
///     TraceId::current().map_or_else(|| "untraced".to_owned(), |id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(pub(crate) Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Accept an identifier supplied by a caller in the request header.
    ///
    /// Blank, malformed and nil values are ignored so the caller cannot
    /// collapse unrelated requests onto one identifier.
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<Self>()
            .ok()
            .filter(|id| !id.0.is_nil())
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` installed for [`TraceId::current`].
    ///
    /// # Examples
    /// ```
    /// use templatehub::TraceId;
    /// use uuid::Uuid;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::from_uuid(Uuid::new_v4());
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[tokio::test]
    async fn nested_scopes_restore_the_outer_identifier() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();

        let (seen_inner, seen_outer) = TraceId::scope(outer, async move {
            let seen_inner = TraceId::scope(inner, async { TraceId::current() }).await;
            (seen_inner, TraceId::current())
        })
        .await;

        assert_eq!(seen_inner, Some(inner));
        assert_eq!(seen_outer, Some(outer));
        assert_eq!(TraceId::current(), None);
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_the_identifier() {
        let id = TraceId::generate();
        let seen = TraceId::scope(id, async {
            tokio::spawn(async { TraceId::current() })
                .await
                .expect("task joins")
        })
        .await;

        assert_eq!(seen, None);
    }

    #[test]
    fn display_is_the_hyphenated_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(TraceId::from_uuid(uuid).to_string(), uuid.to_string());
        assert_eq!(TraceId::from_uuid(uuid).as_uuid(), &uuid);
    }

    #[rstest]
    #[case::well_formed("7c4f5b8e-2a61-4c0f-9d3e-1b2a3c4d5e6f", true)]
    #[case::padded("  7c4f5b8e-2a61-4c0f-9d3e-1b2a3c4d5e6f ", true)]
    #[case::nil("00000000-0000-0000-0000-000000000000", false)]
    #[case::garbage("request-42", false)]
    #[case::blank("", false)]
    fn header_values_are_screened(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(TraceId::from_header(raw).is_some(), accepted);
    }
}
