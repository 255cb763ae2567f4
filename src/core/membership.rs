//! Membership validation
//!
//! This module provides the `MembershipRegistry`, an in-memory cache of member
//! records loaded from the record store, and the `MembershipValidator` that
//! decides whether a member may rent.
//!
//! The registry is loaded once and only refreshed by an explicit `reload`.
//! Rental counts are always read from the store, so they see every rental
//! committed since the registry was loaded.

use crate::core::traits::{RecordStore, RentalCountScope};
use crate::types::{Member, MemberId, RentalError};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Cache of member records keyed by member id
#[derive(Debug, Clone, Default)]
pub struct MembershipRegistry {
    members: HashMap<MemberId, Member>,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every member currently held by the store
    pub fn from_store<S: RecordStore + ?Sized>(store: &S) -> Self {
        let mut registry = Self::new();
        registry.reload(store);
        registry
    }

    /// Replace the cached members with the store's current records
    pub fn reload<S: RecordStore + ?Sized>(&mut self, store: &S) {
        self.members = store
            .list_members()
            .into_iter()
            .map(|member| (member.id, member))
            .collect();
        debug!(members = self.members.len(), "membership registry loaded");
    }

    pub fn get(&self, member_id: MemberId) -> Option<&Member> {
        self.members.get(&member_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Rental count measured against a member's limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalUsage {
    /// Rental rows counted under the validator's scope, returned rows
    /// included unless the scope is open-only
    pub counted: usize,

    /// Maximum allowed; 0 for unknown members
    pub limit: u32,
}

impl RentalUsage {
    pub fn limit_reached(&self) -> bool {
        self.counted >= self.limit as usize
    }
}

/// Decides whether members may rent
#[derive(Debug, Clone, Default)]
pub struct MembershipValidator {
    registry: MembershipRegistry,
    scope: RentalCountScope,
}

impl MembershipValidator {
    /// Create a validator over a loaded registry
    ///
    /// # Arguments
    ///
    /// * `registry` - Cached member records
    /// * `scope` - Which rental rows count against the rental limit
    pub fn new(registry: MembershipRegistry, scope: RentalCountScope) -> Self {
        Self { registry, scope }
    }

    pub fn scope(&self) -> RentalCountScope {
        self.scope
    }

    pub fn registry(&self) -> &MembershipRegistry {
        &self.registry
    }

    /// Refresh the cached members from the store
    pub fn reload<S: RecordStore + ?Sized>(&mut self, store: &S) {
        self.registry.reload(store);
    }

    /// Check that a member exists and holds a current membership
    ///
    /// A membership ending today counts as expired.
    ///
    /// # Returns
    ///
    /// * `Ok(&Member)` for a valid member
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` when the member is not in the registry
    /// - `MembershipInvalid` when the member has no membership end date
    /// - `MembershipExpired` when the end date is today or earlier
    pub fn is_member_valid(
        &self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> Result<&Member, RentalError> {
        let member = self
            .registry
            .get(member_id)
            .ok_or_else(|| RentalError::member_not_found(member_id))?;

        let ended = member.membership_end.ok_or_else(|| {
            RentalError::membership_invalid(member_id, "no membership end date on record")
        })?;

        if ended <= today {
            return Err(RentalError::membership_expired(member_id, ended));
        }

        Ok(member)
    }

    /// Count the member's rentals against their limit
    pub fn rental_usage<S: RecordStore + ?Sized>(&self, store: &S, member_id: MemberId) -> RentalUsage {
        let limit = self
            .registry
            .get(member_id)
            .map_or(0, |member| member.rental_limit);

        RentalUsage {
            counted: store.count_rentals_for_member(member_id, self.scope),
            limit,
        }
    }

    /// Whether the member already holds as many rentals as allowed
    pub fn has_reached_rental_limit<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        member_id: MemberId,
    ) -> bool {
        self.rental_usage(store, member_id).limit_reached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record_store::InMemoryRecordStore;
    use crate::types::{ErrorKind, Rental};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(id: MemberId, membership_end: Option<NaiveDate>, rental_limit: u32) -> Member {
        Member {
            id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "07000".to_string(),
            membership_end,
            rental_limit,
        }
    }

    fn rental(id: u32, member_id: MemberId, open: bool) -> Rental {
        Rental {
            id,
            bicycle_id: id,
            member_id,
            rental_date: date(2024, 1, 1).into(),
            expected_return_date: date(2024, 1, 3).into(),
            returned_on: (!open).then(|| date(2024, 1, 3).into()),
        }
    }

    fn validator_for(store: &InMemoryRecordStore, scope: RentalCountScope) -> MembershipValidator {
        MembershipValidator::new(MembershipRegistry::from_store(store), scope)
    }

    #[rstest]
    #[case::valid(Some(date(2025, 1, 1)), None)]
    #[case::ends_today(Some(date(2024, 6, 1)), Some(ErrorKind::MembershipExpired))]
    #[case::ended(Some(date(2023, 12, 31)), Some(ErrorKind::MembershipExpired))]
    #[case::no_end_date(None, Some(ErrorKind::MembershipInvalid))]
    fn test_is_member_valid(#[case] end: Option<NaiveDate>, #[case] expected: Option<ErrorKind>) {
        let store = InMemoryRecordStore::seed(vec![], vec![member(1, end, 2)], vec![]);
        let validator = validator_for(&store, RentalCountScope::AllHistory);

        let result = validator.is_member_valid(1, date(2024, 6, 1));
        assert_eq!(result.err().map(|e| e.kind()), expected);
    }

    #[test]
    fn test_unknown_member_not_found() {
        let store = InMemoryRecordStore::new();
        let validator = validator_for(&store, RentalCountScope::AllHistory);

        let result = validator.is_member_valid(7, date(2024, 6, 1));
        assert_eq!(result.unwrap_err(), RentalError::member_not_found(7));
    }

    #[rstest]
    #[case::all_history(RentalCountScope::AllHistory, 2, true)]
    #[case::open_only(RentalCountScope::OpenOnly, 1, false)]
    fn test_rental_usage_scopes(
        #[case] scope: RentalCountScope,
        #[case] counted: usize,
        #[case] reached: bool,
    ) {
        let store = InMemoryRecordStore::seed(
            vec![],
            vec![member(1, Some(date(2025, 1, 1)), 2)],
            vec![rental(1, 1, false), rental(2, 1, true)],
        );
        let validator = validator_for(&store, scope);

        assert_eq!(validator.rental_usage(&store, 1), RentalUsage { counted, limit: 2 });
        assert_eq!(validator.has_reached_rental_limit(&store, 1), reached);
    }

    #[test]
    fn test_unknown_member_has_zero_limit() {
        let store = InMemoryRecordStore::new();
        let validator = validator_for(&store, RentalCountScope::AllHistory);

        assert_eq!(validator.rental_usage(&store, 5), RentalUsage { counted: 0, limit: 0 });
        assert!(validator.has_reached_rental_limit(&store, 5));
    }

    #[test]
    fn test_registry_only_changes_on_reload() {
        let store = InMemoryRecordStore::new();
        let mut validator = validator_for(&store, RentalCountScope::AllHistory);
        assert!(validator.registry().is_empty());

        let store = InMemoryRecordStore::seed(vec![], vec![member(1, Some(date(2025, 1, 1)), 1)], vec![]);
        assert!(validator.is_member_valid(1, date(2024, 6, 1)).is_err());

        validator.reload(&store);
        assert_eq!(validator.registry().len(), 1);
        assert!(validator.is_member_valid(1, date(2024, 6, 1)).is_ok());
    }
}
