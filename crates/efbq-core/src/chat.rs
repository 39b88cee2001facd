use serde::Serialize;

/// QQ chat uid as the master channel sees it (`friend_<qq>`, `group_<id>`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChatUid(pub String);

/// QQ member uid (the numeric account rendered as text).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberUid(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Private,
    Group,
    System,
}

/// A chat referenced from message text (e.g. a forwarded group mention).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRef {
    pub module_id: String,
    pub uid: ChatUid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub kind: ChatKind,
}

impl ChatRef {
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A member of a group chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberRef {
    pub uid: MemberUid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl MemberRef {
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// The logged-in account, as a member of whatever chat the message belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelfMember {
    pub uid: MemberUid,
    pub name: String,
}

/// What an `@mention` range in message text points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubstitutionTarget {
    Chat(ChatRef),
    Member(MemberRef),
    SelfMember(SelfMember),
}

impl SubstitutionTarget {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Chat(c) => c.display_name(),
            Self::Member(m) => m.display_name(),
            Self::SelfMember(s) => &s.name,
        }
    }

    pub fn is_self(&self) -> bool {
        matches!(self, Self::SelfMember(_))
    }
}
