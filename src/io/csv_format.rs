//! CSV format handling for data files, commands and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserializing `bicycles.csv`, `members.csv`,
//!   `rentals.csv` and command files
//! - Conversion from rows to domain types, cleaning rates and dates
//! - Serialization of command outcomes, data files and reports
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::engine::{CommandOutcome, DeskOutcome};
use crate::core::recommendation::PurchaseOrder;
use crate::report::StatusCount;
use crate::types::{
    format_date, parse_date, Bicycle, BicycleId, BicycleStatus, BicycleType, Condition,
    DeskCommand, Member, MemberId, RecordDate, Rental, RentalError, RentalId, RentalRate,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;
use tracing::warn;

/// A deserialized CSV row that converts into a domain record
pub trait CsvRow: DeserializeOwned {
    type Record;

    fn convert(self) -> Result<Self::Record, RentalError>;
}

/// Row of `bicycles.csv`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BicycleRow {
    pub id: BicycleId,
    pub brand: String,
    #[serde(rename = "type")]
    pub bicycle_type: String,
    pub frame_size: String,
    pub rental_rate: String,
    pub purchase_date: Option<String>,
    pub condition: String,
    pub status: String,
}

/// Row of `members.csv`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MemberRow {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub membership_end: Option<String>,
    pub rental_limit: u32,
}

/// Row of `rentals.csv`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RentalRow {
    pub rental: RentalId,
    pub bicycle: BicycleId,
    pub member: MemberId,
    pub rental_date: String,
    pub expected_return_date: String,
    pub returned_on: Option<String>,
}

/// Row of a commands file
///
/// `member` and `days` are required for `rent`; `damage` is optional for
/// `return` and defaults to zero.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CommandRow {
    pub action: String,
    pub bicycle: BicycleId,
    pub member: Option<MemberId>,
    pub days: Option<String>,
    pub damage: Option<String>,
}

/// Treat blank optional fields as missing
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a rental date column, keeping malformed text in the record
fn record_date(value: &str, field: &str, id: RentalId) -> RecordDate {
    let date = RecordDate::parse(value);
    if date.is_malformed() {
        warn!(rental = id, field, value, "unreadable rental date kept as text");
    }
    date
}

/// Parse a date that may be dropped when malformed
///
/// Malformed values are logged and imported as absent.
fn lenient_date(value: Option<String>, field: &str, id: u32) -> Option<NaiveDate> {
    let value = present(value)?;
    match parse_date(&value) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(id, field, error = %e, "unreadable date imported as absent");
            None
        }
    }
}

impl CsvRow for BicycleRow {
    type Record = Bicycle;

    /// Convert a bicycle row
    ///
    /// The rate may omit its currency symbol or `/day` suffix. An unreadable
    /// purchase date is imported as absent; an unknown status rejects the row.
    fn convert(self) -> Result<Bicycle, RentalError> {
        let rental_rate = RentalRate::from_str(&self.rental_rate)?;
        let status = BicycleStatus::from_str(&self.status)?;
        let purchase_date = lenient_date(self.purchase_date, "purchase_date", self.id);

        Ok(Bicycle {
            id: self.id,
            brand: self.brand,
            bicycle_type: BicycleType::from(self.bicycle_type.as_str()),
            frame_size: self.frame_size,
            rental_rate,
            purchase_date,
            condition: Condition::from(self.condition.as_str()),
            status,
        })
    }
}

impl CsvRow for MemberRow {
    type Record = Member;

    fn convert(self) -> Result<Member, RentalError> {
        let membership_end = lenient_date(self.membership_end, "membership_end", self.id);

        Ok(Member {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            membership_end,
            rental_limit: self.rental_limit,
        })
    }
}

impl CsvRow for RentalRow {
    type Record = Rental;

    /// Convert a rental row
    ///
    /// Malformed dates are kept verbatim so the row still occupies its place
    /// in the bicycle's rental history; a blank `returned_on` marks the rental
    /// open.
    fn convert(self) -> Result<Rental, RentalError> {
        let id = self.rental;
        Ok(Rental {
            id,
            bicycle_id: self.bicycle,
            member_id: self.member,
            rental_date: record_date(&self.rental_date, "rental_date", id),
            expected_return_date: record_date(
                &self.expected_return_date,
                "expected_return_date",
                id,
            ),
            returned_on: present(self.returned_on)
                .map(|value| record_date(&value, "returned_on", id)),
        })
    }
}

impl CsvRow for CommandRow {
    type Record = DeskCommand;

    /// Convert a command row into a rent or return request
    ///
    /// The action is case-insensitive.
    fn convert(self) -> Result<DeskCommand, RentalError> {
        match self.action.trim().to_lowercase().as_str() {
            "rent" => {
                let member = self.member.ok_or_else(|| {
                    RentalError::invalid_command(format!(
                        "rent of bicycle {} requires a member",
                        self.bicycle
                    ))
                })?;
                let days = present(self.days).ok_or_else(|| {
                    RentalError::invalid_command(format!(
                        "rent of bicycle {} requires a number of days",
                        self.bicycle
                    ))
                })?;
                let days = days
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| RentalError::invalid_amount("rental days", &days))?;

                Ok(DeskCommand::Rent {
                    member,
                    bicycle: self.bicycle,
                    days,
                })
            }
            "return" => {
                let damage_charge = match present(self.damage) {
                    Some(damage) => Decimal::from_str(damage.trim())
                        .map_err(|_| RentalError::invalid_amount("damage charge", &damage))?,
                    None => Decimal::ZERO,
                };

                Ok(DeskCommand::Return {
                    bicycle: self.bicycle,
                    damage_charge,
                })
            }
            _ => Err(RentalError::invalid_command(format!(
                "unknown action '{}' for bicycle {}",
                self.action, self.bicycle
            ))),
        }
    }
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Render the outcome columns `result,due,charge,message`
fn outcome_fields(outcome: &CommandOutcome) -> [String; 4] {
    match &outcome.result {
        Ok(DeskOutcome::Rented(confirmation)) => [
            "ok".to_string(),
            format_date(confirmation.expected_return_date),
            String::new(),
            format!(
                "{} {} rented at {}. {}",
                confirmation.brand,
                confirmation.bicycle_type,
                confirmation.rate,
                confirmation.change.describe()
            ),
        ],
        Ok(DeskOutcome::Returned(summary)) => [
            "ok".to_string(),
            format_date(summary.expected_return_date),
            money(summary.total_charge),
            format!(
                "Returned {} day(s) late: late fee {} (rate {} + surcharge {}), damage {}. Status: {}",
                summary.late_fee.late_days,
                money(summary.late_fee.total()),
                money(summary.late_fee.rate_fee),
                money(summary.late_fee.surcharge),
                money(summary.damage_charge),
                summary.status
            ),
        ],
        Err(e) => ["error".to_string(), String::new(), String::new(), e.to_string()],
    }
}

/// Write command outcomes to CSV format
///
/// Writes one row per command, in the order the commands were applied, with
/// columns: action, bicycle, member, result, due, charge, message.
///
/// # Arguments
///
/// * `outcomes` - Outcomes in application order
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Errors
///
/// Returns an error if writing to `output` fails
pub fn write_outcomes_csv(
    outcomes: &[CommandOutcome],
    output: &mut dyn Write,
) -> Result<(), RentalError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["action", "bicycle", "member", "result", "due", "charge", "message"])?;

    for outcome in outcomes {
        let [result, due, charge, message] = outcome_fields(outcome);
        writer.write_record([
            outcome.action.as_str().to_string(),
            outcome.bicycle.to_string(),
            outcome.member.map(|m| m.to_string()).unwrap_or_default(),
            result,
            due,
            charge,
            message,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write bicycles in `bicycles.csv` layout
///
/// Dates are written as `YYYY-MM-DD` and rates as `£<amount>/day`.
pub fn write_bicycles_csv(bicycles: &[Bicycle], output: &mut dyn Write) -> Result<(), RentalError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record([
        "id",
        "brand",
        "type",
        "frame_size",
        "rental_rate",
        "purchase_date",
        "condition",
        "status",
    ])?;

    for bicycle in bicycles {
        writer.write_record([
            bicycle.id.to_string(),
            bicycle.brand.clone(),
            bicycle.bicycle_type.to_string(),
            bicycle.frame_size.clone(),
            bicycle.rental_rate.to_string(),
            bicycle.purchase_date.map(format_date).unwrap_or_default(),
            bicycle.condition.to_string(),
            bicycle.status.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write rental rows in `rentals.csv` layout
pub fn write_rentals_csv(rentals: &[Rental], output: &mut dyn Write) -> Result<(), RentalError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record([
        "rental",
        "bicycle",
        "member",
        "rental_date",
        "expected_return_date",
        "returned_on",
    ])?;

    for rental in rentals {
        writer.write_record([
            rental.id.to_string(),
            rental.bicycle_id.to_string(),
            rental.member_id.to_string(),
            rental.rental_date.to_string(),
            rental.expected_return_date.to_string(),
            rental
                .returned_on
                .as_ref()
                .map(RecordDate::to_string)
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a purchase order followed by a `total` row
pub fn write_purchase_order_csv(
    order: &PurchaseOrder,
    output: &mut dyn Write,
) -> Result<(), RentalError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["bicycle", "brand", "type", "score", "quantity", "unit_cost", "cost"])?;

    for line in &order.lines {
        writer.write_record([
            line.bicycle_id.to_string(),
            line.brand.clone(),
            line.bicycle_type.to_string(),
            line.score.normalize().to_string(),
            line.quantity.to_string(),
            money(line.unit_cost),
            money(line.cost),
        ])?;
    }

    writer.write_record([
        "total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        order.units().to_string(),
        String::new(),
        money(order.total_cost),
    ])?;

    writer.flush()?;
    Ok(())
}

/// Write bicycle counts per status
pub fn write_status_counts_csv(
    counts: &[StatusCount],
    output: &mut dyn Write,
) -> Result<(), RentalError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["status", "count"])?;
    for count in counts {
        writer.write_record([count.status.to_string(), count.count.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recommendation::OrderLine;
    use crate::core::rental::RentalConfirmation;
    use crate::core::returns::{LateFee, ReturnSummary};
    use crate::types::{CommandType, ErrorKind, RecordChange};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bicycle_row(rate: &str, purchase_date: Option<&str>, status: &str) -> BicycleRow {
        BicycleRow {
            id: 1,
            brand: "Trek".to_string(),
            bicycle_type: "Road Bike".to_string(),
            frame_size: "M".to_string(),
            rental_rate: rate.to_string(),
            purchase_date: purchase_date.map(str::to_string),
            condition: "Good".to_string(),
            status: status.to_string(),
        }
    }

    fn command_row(
        action: &str,
        member: Option<MemberId>,
        days: Option<&str>,
        damage: Option<&str>,
    ) -> CommandRow {
        CommandRow {
            action: action.to_string(),
            bicycle: 4,
            member,
            days: days.map(str::to_string),
            damage: damage.map(str::to_string),
        }
    }

    fn render(write: impl FnOnce(&mut dyn Write) -> Result<(), RentalError>) -> String {
        let mut output = Vec::new();
        write(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[rstest]
    #[case::full_rate("£15/day", Decimal::new(15, 0))]
    #[case::missing_suffix("£12.50", Decimal::new(1250, 2))]
    #[case::bare_number("8", Decimal::new(8, 0))]
    fn test_bicycle_row_rate_cleaning(#[case] rate: &str, #[case] expected: Decimal) {
        let bicycle = bicycle_row(rate, Some("2023-05-01"), "Available")
            .convert()
            .unwrap();
        assert_eq!(bicycle.rental_rate.per_day(), expected);
        assert_eq!(bicycle.bicycle_type, BicycleType::Road);
    }

    #[rstest]
    #[case::iso(Some("2023-05-01"), Some(date(2023, 5, 1)))]
    #[case::day_first(Some("01/05/2023"), Some(date(2023, 5, 1)))]
    #[case::unreadable(Some("May 2023"), None)]
    #[case::blank(Some(""), None)]
    #[case::missing(None, None)]
    fn test_bicycle_row_purchase_date(
        #[case] purchase_date: Option<&str>,
        #[case] expected: Option<NaiveDate>,
    ) {
        let bicycle = bicycle_row("£10/day", purchase_date, "Available")
            .convert()
            .unwrap();
        assert_eq!(bicycle.purchase_date, expected);
    }

    #[rstest]
    #[case::bad_status(bicycle_row("£10/day", None, "Lost"), ErrorKind::InvalidInput)]
    #[case::bad_rate(bicycle_row("ten pounds", None, "Available"), ErrorKind::InvalidInput)]
    fn test_bicycle_row_rejected(#[case] row: BicycleRow, #[case] kind: ErrorKind) {
        assert_eq!(row.convert().unwrap_err().kind(), kind);
    }

    #[test]
    fn test_member_row_without_end_date() {
        let member = MemberRow {
            id: 3,
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            phone: "01234".to_string(),
            membership_end: None,
            rental_limit: 2,
        }
        .convert()
        .unwrap();

        assert_eq!(member.membership_end, None);
        assert_eq!(member.rental_limit, 2);
    }

    #[test]
    fn test_rental_row_dates() {
        let row = RentalRow {
            rental: 9,
            bicycle: 2,
            member: 1,
            rental_date: "01/06/2024".to_string(),
            expected_return_date: "2024-06-04".to_string(),
            returned_on: Some(String::new()),
        };

        let rental = row.clone().convert().unwrap();
        assert_eq!(rental.rental_date, date(2024, 6, 1));
        assert_eq!(rental.expected_return_date, date(2024, 6, 4));
        assert!(rental.is_open());

        let broken = RentalRow {
            expected_return_date: "2024/25/12".to_string(),
            returned_on: Some("soon".to_string()),
            ..row
        };
        let rental = broken.convert().unwrap();
        assert_eq!(rental.rental_date, date(2024, 6, 1));
        assert_eq!(
            rental.expected_return_date,
            RecordDate::Malformed("2024/25/12".to_string())
        );
        assert_eq!(
            rental.returned_on,
            Some(RecordDate::Malformed("soon".to_string()))
        );
        assert!(!rental.is_open());
    }

    #[rstest]
    #[case::rent(
        command_row("rent", Some(1), Some("3"), None),
        DeskCommand::Rent { member: 1, bicycle: 4, days: 3 }
    )]
    #[case::rent_uppercase(
        command_row("RENT", Some(2), Some("0"), None),
        DeskCommand::Rent { member: 2, bicycle: 4, days: 0 }
    )]
    #[case::return_plain(
        command_row("return", None, None, None),
        DeskCommand::Return { bicycle: 4, damage_charge: Decimal::ZERO }
    )]
    #[case::return_damage(
        command_row("Return", None, None, Some("20.50")),
        DeskCommand::Return { bicycle: 4, damage_charge: Decimal::new(2050, 2) }
    )]
    fn test_command_row_valid(#[case] row: CommandRow, #[case] expected: DeskCommand) {
        assert_eq!(row.convert().unwrap(), expected);
    }

    #[rstest]
    #[case::unknown_action(command_row("borrow", Some(1), Some("3"), None), "unknown action")]
    #[case::rent_without_member(command_row("rent", None, Some("3"), None), "requires a member")]
    #[case::rent_without_days(command_row("rent", Some(1), None, None), "requires a number of days")]
    #[case::bad_days(command_row("rent", Some(1), Some("three"), None), "Invalid rental days")]
    #[case::bad_damage(command_row("return", None, None, Some("lots")), "Invalid damage charge")]
    fn test_command_row_errors(#[case] row: CommandRow, #[case] expected: &str) {
        let error = row.convert().unwrap_err();
        assert!(
            error.to_string().contains(expected),
            "unexpected error: {}",
            error
        );
    }

    #[test]
    fn test_write_outcomes_csv() {
        let rate = RentalRate::gbp(Decimal::new(10, 0)).unwrap();
        let outcomes = vec![
            CommandOutcome {
                action: CommandType::Rent,
                bicycle: 1,
                member: Some(1),
                result: Ok(DeskOutcome::Rented(RentalConfirmation {
                    bicycle_id: 1,
                    member_id: 1,
                    brand: "Trek".to_string(),
                    bicycle_type: BicycleType::Road,
                    rate,
                    rental_date: date(2024, 6, 10),
                    expected_return_date: date(2024, 6, 13),
                    change: RecordChange::Inserted,
                })),
            },
            CommandOutcome {
                action: CommandType::Return,
                bicycle: 1,
                member: Some(1),
                result: Ok(DeskOutcome::Returned(ReturnSummary {
                    bicycle_id: 1,
                    member_id: 1,
                    rate,
                    rental_date: date(2024, 6, 10),
                    expected_return_date: date(2024, 6, 13),
                    returned_on: date(2024, 6, 15),
                    late_fee: LateFee {
                        late_days: 2,
                        rate_fee: Decimal::new(20, 0),
                        surcharge: Decimal::new(10, 0),
                    },
                    damage_charge: Decimal::ZERO,
                    total_charge: Decimal::new(30, 0),
                    status: BicycleStatus::Available,
                })),
            },
            CommandOutcome {
                action: CommandType::Return,
                bicycle: 2,
                member: None,
                result: Err(RentalError::not_rented(2)),
            },
        ];

        let csv = render(|out| write_outcomes_csv(&outcomes, out));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "action,bicycle,member,result,due,charge,message");
        assert_eq!(
            lines[1],
            "rent,1,1,ok,2024-06-13,,Trek Road Bike rented at £10/day. Rental details added successfully."
        );
        assert_eq!(
            lines[2],
            "return,1,1,ok,2024-06-13,30.00,\"Returned 2 day(s) late: late fee 30.00 (rate 20.00 + surcharge 10.00), damage 0.00. Status: Available\""
        );
        assert_eq!(lines[3], "return,2,,error,,,Bicycle 2 is not currently rented");
    }

    #[test]
    fn test_write_bicycles_csv_normalizes_fields() {
        let bicycle = bicycle_row("12.5", Some("03/02/2022"), "under maintenance")
            .convert()
            .unwrap();

        let csv = render(|out| write_bicycles_csv(&[bicycle], out));
        assert_eq!(
            csv,
            "id,brand,type,frame_size,rental_rate,purchase_date,condition,status\n\
             1,Trek,Road Bike,M,£12.5/day,2022-02-03,Good,Under maintenance\n"
        );
    }

    #[test]
    fn test_write_rentals_csv() {
        let rentals = vec![
            Rental {
                id: 1,
                bicycle_id: 2,
                member_id: 3,
                rental_date: date(2024, 6, 1).into(),
                expected_return_date: date(2024, 6, 4).into(),
                returned_on: None,
            },
            Rental {
                id: 2,
                bicycle_id: 4,
                member_id: 3,
                rental_date: date(2024, 6, 2).into(),
                expected_return_date: RecordDate::Malformed("2024/25/12".to_string()),
                returned_on: Some(date(2024, 6, 5).into()),
            },
        ];

        let csv = render(|out| write_rentals_csv(&rentals, out));
        assert_eq!(
            csv,
            "rental,bicycle,member,rental_date,expected_return_date,returned_on\n\
             1,2,3,2024-06-01,2024-06-04,\n\
             2,4,3,2024-06-02,2024/25/12,2024-06-05\n"
        );
    }

    #[test]
    fn test_write_purchase_order_csv() {
        let order = PurchaseOrder {
            lines: vec![OrderLine {
                bicycle_id: 5,
                brand: "Brompton".to_string(),
                bicycle_type: BicycleType::City,
                score: Decimal::new(85, 1),
                quantity: 3,
                unit_cost: Decimal::new(30, 0),
                cost: Decimal::new(90, 0),
            }],
            total_cost: Decimal::new(90, 0),
        };

        let csv = render(|out| write_purchase_order_csv(&order, out));
        assert_eq!(
            csv,
            "bicycle,brand,type,score,quantity,unit_cost,cost\n\
             5,Brompton,City Bike,8.5,3,30.00,90.00\n\
             total,,,,3,,90.00\n"
        );
    }

    #[test]
    fn test_write_status_counts_csv() {
        let counts = vec![
            StatusCount {
                status: BicycleStatus::Available,
                count: 2,
            },
            StatusCount {
                status: BicycleStatus::UnderMaintenance,
                count: 0,
            },
        ];

        let csv = render(|out| write_status_counts_csv(&counts, out));
        assert_eq!(csv, "status,count\nAvailable,2\nUnder maintenance,0\n");
    }
}
