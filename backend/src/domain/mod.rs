//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants in each
//! type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - Member, Category, Tag, Template and their identifiers.
//! - Ports (`ports::*`) and the services implementing the driving ports.

pub mod auth;
pub mod category;
mod category_service;
pub mod error;
mod lookup;
pub mod member;
mod member_service;
pub mod ports;
pub mod tag;
pub mod template;
mod template_service;
pub mod trace_id;

pub use self::auth::{HashingFailed, LoginCredentials, MalformedDigest, Password, PasswordDigest};
pub use self::category::{
    CATEGORY_NAME_MAX, Category, CategoryId, CategoryName, CategorySummary,
    CategoryValidationError, DEFAULT_CATEGORY_NAME,
};
pub use self::category_service::CategoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::lookup::FetchOrNotFound;
pub use self::member::{
    EMAIL_MAX, Email, Member, MemberId, MemberValidationError, USERNAME_MAX, USERNAME_MIN,
    Username,
};
pub use self::member_service::MemberService;
pub use self::tag::{TAG_NAME_MAX, Tag, TagId, TagName, TagValidationError};
pub use self::template::{
    FILENAME_MAX, Filename, NewTemplate, Ordinal, Snippet, SnippetDraft, SnippetEdit, SnippetId,
    TITLE_MAX, Template, TemplateChanges, TemplateDetail, TemplateFilter, TemplateId,
    TemplateSummary, TemplateTitle, TemplateValidationError, ThumbnailChoice, ThumbnailSnippet,
    ensure_unique_ordinals,
};
pub use self::template_service::TemplateService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
