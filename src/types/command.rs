//! Desk commands
//!
//! A command is one rent or return request, as read from a commands CSV or
//! issued directly against the rental desk.

use super::bicycle::BicycleId;
use super::member::MemberId;
use rust_decimal::Decimal;

/// Kind of request made at the rental desk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Rent,
    Return,
}

impl CommandType {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandType::Rent => "rent",
            CommandType::Return => "return",
        }
    }
}

/// A single rent or return request
#[derive(Debug, Clone, PartialEq)]
pub enum DeskCommand {
    /// Rent `bicycle` to `member` for `days` days
    ///
    /// `days` is signed so that non-positive durations reach the engine and
    /// are rejected there.
    Rent {
        member: MemberId,
        bicycle: BicycleId,
        days: i64,
    },

    /// Bring `bicycle` back, optionally charging for damage
    Return {
        bicycle: BicycleId,
        damage_charge: Decimal,
    },
}

impl DeskCommand {
    pub fn command_type(&self) -> CommandType {
        match self {
            DeskCommand::Rent { .. } => CommandType::Rent,
            DeskCommand::Return { .. } => CommandType::Return,
        }
    }

    pub fn bicycle(&self) -> BicycleId {
        match self {
            DeskCommand::Rent { bicycle, .. } | DeskCommand::Return { bicycle, .. } => *bicycle,
        }
    }

    pub fn member(&self) -> Option<MemberId> {
        match self {
            DeskCommand::Rent { member, .. } => Some(*member),
            DeskCommand::Return { .. } => None,
        }
    }
}
