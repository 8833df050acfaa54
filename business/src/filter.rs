//! Narrowing a loaded user collection by search text, status and role.
//!
//! Filtering is a pure function of `(users, criteria)`. The three predicates
//! are applied conjunctively and the source order is kept. [`FilteredUsers`]
//! memoises the result for the UI but always agrees with [`filter_users`].

use moderation_states::State;

use crate::model::{Role, UserRecord, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Blocked,
}

impl StatusFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Blocked];

    /// Lenient parse: anything unrecognised means "no constraint".
    pub fn parse_lenient(value: &str) -> Self {
        UserStatus::parse(value).map_or(Self::All, Self::from)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Blocked => "blocked",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All users",
            Self::Active => "Active users",
            Self::Blocked => "Blocked users",
        }
    }

    #[inline]
    pub fn accepts(self, status: UserStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == UserStatus::Active,
            Self::Blocked => status == UserStatus::Blocked,
        }
    }
}

impl From<UserStatus> for StatusFilter {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Active => Self::Active,
            UserStatus::Blocked => Self::Blocked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub const ALL: [Self; 4] = [
        Self::All,
        Self::Only(Role::Admin),
        Self::Only(Role::Moderator),
        Self::Only(Role::User),
    ];

    /// Lenient parse: anything unrecognised means "no constraint".
    pub fn parse_lenient(value: &str) -> Self {
        Role::parse(value).map_or(Self::All, Self::Only)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(role) => role.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All roles",
            Self::Only(Role::Admin) => "Admin",
            Self::Only(Role::Moderator) => "Moderator",
            Self::Only(Role::User) => "User",
        }
    }

    /// Exact match only: a moderator is not an admin and vice versa.
    #[inline]
    pub fn accepts(self, role: Role) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == role,
        }
    }
}

/// The operator's current combination of search text, status and role filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub status_filter: StatusFilter,
    pub role_filter: RoleFilter,
}

impl State for FilterCriteria {}

impl FilterCriteria {
    pub fn new(
        search_text: impl Into<String>,
        status_filter: StatusFilter,
        role_filter: RoleFilter,
    ) -> Self {
        Self {
            search_text: search_text.into(),
            status_filter,
            role_filter,
        }
    }

    pub fn matches(&self, user: &UserRecord) -> bool {
        let needle = self.search_text.trim().to_lowercase();
        matches_search(user, &needle)
            && self.status_filter.accepts(user.status)
            && self.role_filter.accepts(user.role)
    }
}

/// `needle` must already be trimmed and lowercased; empty passes everything.
#[inline]
fn matches_search(user: &UserRecord, needle: &str) -> bool {
    needle.is_empty()
        || user.email.to_lowercase().contains(needle)
        || user
            .full_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(needle))
}

fn matching_indices(users: &[UserRecord], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.search_text.trim().to_lowercase();
    users
        .iter()
        .enumerate()
        .filter(|(_, user)| {
            matches_search(user, &needle)
                && criteria.status_filter.accepts(user.status)
                && criteria.role_filter.accepts(user.role)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Users satisfying every predicate of `criteria`, in source order.
pub fn filter_users<'a>(users: &'a [UserRecord], criteria: &FilterCriteria) -> Vec<&'a UserRecord> {
    matching_indices(users, criteria)
        .into_iter()
        .filter_map(|index| users.get(index))
        .collect()
}

/// Memoised filter result, keyed by the list revision and the criteria.
#[derive(Debug, Clone, Default)]
pub struct FilteredUsers {
    key: Option<(u64, FilterCriteria)>,
    indices: Vec<usize>,
}

impl FilteredUsers {
    /// Filtered view of `users`; recomputed only when `revision` or `criteria` changed.
    ///
    /// `revision` must change whenever `users` does.
    pub fn view<'a>(
        &mut self,
        users: &'a [UserRecord],
        revision: u64,
        criteria: &FilterCriteria,
    ) -> Vec<&'a UserRecord> {
        let fresh = matches!(&self.key, Some((rev, cached)) if *rev == revision && cached == criteria);
        if !fresh {
            self.indices = matching_indices(users, criteria);
            self.key = Some((revision, criteria.clone()));
        }
        self.indices
            .iter()
            .filter_map(|&index| users.get(index))
            .collect()
    }
}
