//! Thread members and mention highlighting.
//!
//! On the wire a member is `{"type": "...", "member": {...}}`. `did` members
//! are phone-number participants, `user` members are people in the group.
//! Any other type is kept as [`Member::Unknown`] so a thread from a newer
//! server still loads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMember {
    pub did: String,
    /// Caller-id name.
    pub cnam: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(rename = "name_first")]
    pub first_name: String,
    #[serde(rename = "name_last")]
    pub last_name: String,
    pub email: String,
    pub did: String,
    pub user_id: String,
    #[serde(default)]
    pub left_thread: bool,
    #[serde(default)]
    pub is_shared: Option<bool>,
}

impl GroupMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMember", into = "RawMember")]
pub enum Member {
    Thread(ThreadMember),
    Group(GroupMember),
    Unknown { kind: String },
}

#[derive(Serialize, Deserialize)]
struct RawMember {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    member: Option<serde_json::Value>,
}

impl TryFrom<RawMember> for Member {
    type Error = serde_json::Error;

    fn try_from(raw: RawMember) -> Result<Self, Self::Error> {
        let payload = raw.member.unwrap_or(serde_json::Value::Null);
        match raw.kind.as_str() {
            "did" => serde_json::from_value(payload).map(Member::Thread),
            "user" => serde_json::from_value(payload).map(Member::Group),
            _ => {
                log::debug!("Ignoring member of unknown type {:?}", raw.kind);
                Ok(Member::Unknown { kind: raw.kind })
            }
        }
    }
}

impl From<Member> for RawMember {
    fn from(member: Member) -> Self {
        // Serializing plain derive structs into a Value cannot fail.
        let (kind, payload) = match member {
            Member::Thread(m) => ("did".to_string(), serde_json::to_value(m).ok()),
            Member::Group(m) => ("user".to_string(), serde_json::to_value(m).ok()),
            Member::Unknown { kind } => (kind, None),
        };
        RawMember {
            kind,
            member: payload,
        }
    }
}

/// Full names of the group members, the names a message may mention.
pub fn mention_names(members: &[Member]) -> Vec<String> {
    members
        .iter()
        .filter_map(|member| match member {
            Member::Group(m) => Some(m.full_name()),
            _ => None,
        })
        .collect()
}

/// Byte ranges in `text` where any of `names` occurs, sorted by start.
pub fn highlight_ranges(text: &str, names: &[String]) -> Vec<std::ops::Range<usize>> {
    let mut ranges: Vec<_> = names
        .iter()
        .filter(|name| !name.is_empty())
        .flat_map(|name| {
            text.match_indices(name.as_str())
                .map(|(start, matched)| start..start + matched.len())
        })
        .collect();
    ranges.sort_by_key(|range| (range.start, range.end));
    ranges
}
