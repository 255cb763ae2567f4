//! Rental desk
//!
//! This module provides the `RentalDesk` that applies rent and return requests
//! to a record store. It owns the store, the membership validator and the clock
//! that supplies "today", and routes each `DeskCommand` to the rental or return
//! workflow (see `core::rental` and `core::returns`).
//!
//! Every command either succeeds completely or leaves the store exactly as it
//! was: all writes of a command go through a single store transaction.

use crate::core::membership::{MembershipRegistry, MembershipValidator};
use crate::core::record_store::InMemoryRecordStore;
use crate::core::rental::RentalConfirmation;
use crate::core::returns::ReturnSummary;
use crate::core::traits::{Clock, RecordStore, RentalCountScope, SystemClock};
use crate::types::{BicycleId, CommandType, DeskCommand, MemberId, RentalError};
use chrono::NaiveDate;
use tracing::debug;

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq)]
pub enum DeskOutcome {
    Rented(RentalConfirmation),
    Returned(ReturnSummary),
}

/// A command paired with what became of it
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub action: CommandType,
    pub bicycle: BicycleId,

    /// The renting member, or for a return the member the rental belonged to
    pub member: Option<MemberId>,

    pub result: Result<DeskOutcome, RentalError>,
}

/// Applies rent and return requests against a record store
///
/// Requests are handled one at a time, each running to completion before the
/// next.
#[derive(Debug)]
pub struct RentalDesk<S: RecordStore = InMemoryRecordStore> {
    pub(crate) store: S,
    pub(crate) validator: MembershipValidator,
    clock: Box<dyn Clock>,
}

impl<S: RecordStore> RentalDesk<S> {
    /// Create a desk over a loaded store
    ///
    /// The membership registry is loaded from the store immediately.
    ///
    /// # Arguments
    ///
    /// * `store` - Record store holding bicycles, members and rentals
    /// * `clock` - Source of the current date
    /// * `scope` - Which rental rows count against members' rental limits
    pub fn new(store: S, clock: Box<dyn Clock>, scope: RentalCountScope) -> Self {
        let registry = MembershipRegistry::from_store(&store);
        RentalDesk {
            store,
            validator: MembershipValidator::new(registry, scope),
            clock,
        }
    }

    /// Create a desk reading the system date and counting all rental history
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, Box::new(SystemClock), RentalCountScope::default())
    }

    /// Apply a single command
    ///
    /// # Returns
    ///
    /// * `Ok(DeskOutcome)` describing the rental or return
    /// * `Err(RentalError)` if the command was refused; the store is unchanged
    pub fn process(&mut self, command: DeskCommand) -> Result<DeskOutcome, RentalError> {
        match command {
            DeskCommand::Rent {
                member,
                bicycle,
                days,
            } => self.rent(member, bicycle, days).map(DeskOutcome::Rented),
            DeskCommand::Return {
                bicycle,
                damage_charge,
            } => self
                .return_bicycle(bicycle, damage_charge)
                .map(DeskOutcome::Returned),
        }
    }

    /// Apply a command, keeping a refusal as part of the outcome
    pub fn apply(&mut self, command: DeskCommand) -> CommandOutcome {
        let action = command.command_type();
        let bicycle = command.bicycle();
        let requested_by = command.member();

        let result = self.process(command);
        if let Err(e) = &result {
            debug!(action = action.as_str(), bicycle, error = %e, "command refused");
        }

        let member = match &result {
            Ok(DeskOutcome::Returned(summary)) => Some(summary.member_id),
            _ => requested_by,
        };

        CommandOutcome {
            action,
            bicycle,
            member,
            result,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn validator(&self) -> &MembershipValidator {
        &self.validator
    }

    /// Refresh cached member records from the store
    pub fn reload_memberships(&mut self) {
        self.validator.reload(&self.store);
    }

    /// Consume the desk, handing back its store
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{bicycle, date, desk, member};
    use crate::types::BicycleStatus;
    use rust_decimal::Decimal;

    #[test]
    fn test_process_routes_commands() {
        let mut desk = desk(
            vec![bicycle(1, BicycleStatus::Available, 10)],
            vec![member(1, Some(date(2030, 1, 1)), 2)],
            vec![],
        );

        let rented = desk
            .process(DeskCommand::Rent {
                member: 1,
                bicycle: 1,
                days: 2,
            })
            .unwrap();
        assert!(matches!(rented, DeskOutcome::Rented(_)));

        let returned = desk
            .process(DeskCommand::Return {
                bicycle: 1,
                damage_charge: Decimal::ZERO,
            })
            .unwrap();
        assert!(matches!(returned, DeskOutcome::Returned(_)));
    }

    #[test]
    fn test_apply_reports_rental_member_on_return() {
        let mut desk = desk(
            vec![bicycle(1, BicycleStatus::Available, 10)],
            vec![member(3, Some(date(2030, 1, 1)), 2)],
            vec![],
        );

        desk.apply(DeskCommand::Rent {
            member: 3,
            bicycle: 1,
            days: 1,
        });
        let outcome = desk.apply(DeskCommand::Return {
            bicycle: 1,
            damage_charge: Decimal::ZERO,
        });

        assert_eq!(outcome.action, CommandType::Return);
        assert_eq!(outcome.member, Some(3));
        assert!(outcome.result.is_ok());
    }

    #[test]
    fn test_apply_keeps_refusal() {
        let mut desk = desk(vec![], vec![], vec![]);

        let outcome = desk.apply(DeskCommand::Rent {
            member: 8,
            bicycle: 2,
            days: 1,
        });

        assert_eq!(outcome.member, Some(8));
        assert_eq!(outcome.result, Err(RentalError::member_not_found(8)));
    }

    #[test]
    fn test_reload_memberships_sees_new_members() {
        let mut desk = desk(vec![], vec![member(1, Some(date(2030, 1, 1)), 1)], vec![]);
        desk.reload_memberships();
        assert_eq!(desk.validator().registry().len(), 1);
    }
}
