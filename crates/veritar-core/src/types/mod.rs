//! Shared value types for archive members.

pub mod member_kind;

pub use member_kind::MemberKind;
