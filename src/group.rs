//! Groups and invite codes.
//!
//! A group is the circle of friends a prediction is shared with. Members
//! join out-of-band by typing a short invite code.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::InviteConfig;

/// Invite alphabet with look-alike characters removed.
pub const DEFAULT_INVITE_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const DEFAULT_INVITE_CODE_LEN: usize = 6;
/// Characters never allowed in an invite alphabet.
pub const AMBIGUOUS_CHARS: &[char] = &['0', 'O', '1', 'I'];

/// Draw `len` characters uniformly from `alphabet`.
/// An empty alphabet yields an empty code.
pub fn generate_invite_code<R: Rng + ?Sized>(rng: &mut R, alphabet: &[char], len: usize) -> String {
    (0..len).filter_map(|_| alphabet.choose(rng)).collect()
}

/// Invite-code generator bound to a configured alphabet and length.
#[derive(Debug, Clone)]
pub struct InviteCodeGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl Default for InviteCodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_INVITE_ALPHABET.chars().collect(),
            length: DEFAULT_INVITE_CODE_LEN,
        }
    }
}

impl InviteCodeGenerator {
    pub fn from_config(config: &InviteConfig) -> Self {
        Self {
            alphabet: config.alphabet.chars().collect(),
            length: config.length,
        }
    }

    /// A fresh code from the thread-local RNG.
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        generate_invite_code(rng, &self.alphabet, self.length)
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("Invalid invite code for group {group}: {code}")]
    InvalidInviteCode { group: String, code: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({} members)",
            self.name,
            self.invite_code,
            self.members.len()
        )
    }
}

impl Group {
    /// Create a group owned by `owner`, with a fresh invite code.
    pub fn create(name: impl Into<String>, owner: Member, codes: &InviteCodeGenerator) -> Self {
        let group = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            invite_code: codes.generate(),
            members: vec![owner],
            created_at: Utc::now(),
        };
        info!(group_id = %group.id, name = %group.name, "Group created");
        group
    }

    /// New group value with `member` added. Idempotent on member id: an
    /// existing member yields an unchanged copy.
    pub fn add_member(&self, member: Member) -> Self {
        if self.is_member(&member.id) {
            return self.clone();
        }
        let mut members = self.members.clone();
        debug!(group_id = %self.id, member_id = %member.id, "Member added");
        members.push(member);
        Self {
            members,
            ..self.clone()
        }
    }

    /// Join using an invite code (case-insensitive, surrounding spaces ignored).
    pub fn join_with_code(&self, code: &str, member: Member) -> Result<Self, GroupError> {
        if !code.trim().eq_ignore_ascii_case(&self.invite_code) {
            return Err(GroupError::InvalidInviteCode {
                group: self.id.clone(),
                code: code.to_string(),
            });
        }
        Ok(self.add_member(member))
    }

    pub fn is_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }
}
