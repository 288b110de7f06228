// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural errors in an operation log.

use core::fmt;

/// Kind of push/pop scope in an operation log.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScopeKind {
    /// [`Op::PushArea`](crate::Op::PushArea) / [`Op::PopArea`](crate::Op::PopArea).
    Area,
    /// [`Op::PushTransform`](crate::Op::PushTransform) / [`Op::PopTransform`](crate::Op::PopTransform).
    Transform,
    /// [`Op::PushStop`](crate::Op::PushStop) / [`Op::PopStop`](crate::Op::PopStop).
    Stop,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Area => "area",
            Self::Transform => "transform",
            Self::Stop => "stop scope",
        })
    }
}

/// A log that is not well nested.
///
/// These are defects in the code that recorded the log. They are reported,
/// never repaired: the frame is rejected as a whole.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum OpsError {
    /// A pop with nothing open.
    #[error("op {index}: pop of {kind} with no matching push")]
    UnmatchedPop {
        /// Index of the offending op.
        index: usize,
        /// Kind of the pop.
        kind: ScopeKind,
    },
    /// A pop that does not match the innermost open scope.
    #[error("op {index}: pop of {found} while the innermost open scope is {open}")]
    MismatchedPop {
        /// Index of the offending op.
        index: usize,
        /// Kind of the pop.
        found: ScopeKind,
        /// Kind of the innermost open scope.
        open: ScopeKind,
    },
    /// The log ended with scopes still open.
    #[error("{count} scope(s) left open; innermost {kind} pushed at op {index}")]
    Unclosed {
        /// Index of the innermost unclosed push.
        index: usize,
        /// Kind of the innermost unclosed push.
        kind: ScopeKind,
        /// Number of unclosed scopes.
        count: usize,
    },
}
