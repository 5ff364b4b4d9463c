//! End-to-end tests for the park / exit lifecycle through the public API

use chrono::Duration;
use lotkeeper::error::{Error, Result};
use lotkeeper::lot::{FeeSchedule, FlatFee};
use lotkeeper::{LotConfig, ParkingLot, Spot, SpotFinder, SpotSize, SpotStatus, Vehicle};
use std::sync::Arc;

fn lot_with_spots(finder: SpotFinder, spots: &[(&str, SpotSize)]) -> Result<ParkingLot> {
    let lot = ParkingLot::with_options(
        "Lifecycle Lot",
        1,
        finder,
        Arc::new(lotkeeper::HourlyFee::default()),
    )?;
    for &(id, size) in spots {
        lot.add_spot(1, Spot::new(id, size, 1))?;
    }
    Ok(lot)
}

#[test]
fn test_one_of_each_then_full() -> Result<()> {
    let lot = lot_with_spots(
        SpotFinder::BestFit,
        &[
            ("S", SpotSize::Small),
            ("M", SpotSize::Medium),
            ("L", SpotSize::Large),
        ],
    )?;

    let tickets = [
        lot.park(&Vehicle::motorcycle("MH-01-1234")),
        lot.park(&Vehicle::car("KA-05-5678")),
        lot.park(&Vehicle::bus("MH-12-BUS1")),
    ];
    let spots: Vec<_> = tickets
        .iter()
        .map(|t| t.as_ref().map(|t| t.spot().id().to_string()))
        .collect();
    assert_eq!(
        spots,
        vec![Some("S".to_string()), Some("M".to_string()), Some("L".to_string())]
    );

    assert!(lot.park(&Vehicle::car("DL-03-9999")).is_none());
    assert_eq!(lot.snapshot().active_tickets, 3);
    Ok(())
}

#[test]
fn test_best_fit_versus_first_fit() -> Result<()> {
    let layout = [("Medium-A", SpotSize::Medium), ("Small-B", SpotSize::Small)];
    let bike = Vehicle::motorcycle("GJ-01-4567");

    let best = lot_with_spots(SpotFinder::BestFit, &layout)?;
    let ticket = best.park(&bike).expect("bike parks");
    assert_eq!(ticket.spot().id(), "Small-B");

    let first = lot_with_spots(SpotFinder::FirstFit, &layout)?;
    let ticket = first.park(&bike).expect("bike parks");
    assert_eq!(ticket.spot().id(), "Medium-A");
    Ok(())
}

#[test]
fn test_small_vehicles_spill_into_larger_spots() -> Result<()> {
    let lot = lot_with_spots(
        SpotFinder::BestFit,
        &[("S1", SpotSize::Small), ("L1", SpotSize::Large)],
    )?;

    let first = lot.park(&Vehicle::motorcycle("M-1")).expect("exact fit");
    let second = lot.park(&Vehicle::motorcycle("M-2")).expect("spills over");
    assert_eq!(first.spot().id(), "S1");
    assert_eq!(second.spot().id(), "L1");

    // The bus now finds nothing even though a large spot exists
    assert!(lot.park(&Vehicle::bus("B-1")).is_none());

    lot.exit(second.id())?;
    assert!(lot.park(&Vehicle::bus("B-1")).is_some());
    Ok(())
}

#[test]
fn test_fee_rounding_through_exit() -> Result<()> {
    let lot = lot_with_spots(SpotFinder::BestFit, &[("M", SpotSize::Medium)])?;

    let ticket = lot.park(&Vehicle::car("KA-05-5678")).expect("car parks");
    let closed = lot.exit_at(ticket.id(), ticket.entry_time() + Duration::minutes(90))?;
    assert_eq!(closed.billable_hours(), Some(2));
    assert_eq!(closed.fee(), 5.0 + 20.0 * 2.0);
    assert_eq!(closed.exit_time(), Some(ticket.entry_time() + Duration::minutes(90)));
    assert!(closed.is_paid());

    let ticket = lot.park(&Vehicle::car("KA-05-5678")).expect("car parks again");
    let closed = lot.exit_at(ticket.id(), ticket.entry_time())?;
    assert_eq!(closed.billable_hours(), Some(1));
    assert_eq!(closed.fee(), 25.0);
    Ok(())
}

#[test]
fn test_exit_now_returns_fee() -> Result<()> {
    let lot = lot_with_spots(SpotFinder::BestFit, &[("L", SpotSize::Large)])?;
    let ticket = lot.park(&Vehicle::bus("MH-12-BUS1")).expect("bus parks");

    // A stay of a few microseconds bills the minimum hour
    assert_eq!(lot.exit(ticket.id())?, 45.0);
    assert_eq!(ticket.spot().status(), SpotStatus::Available);
    Ok(())
}

#[test]
fn test_unknown_ticket_changes_nothing() -> Result<()> {
    let lot = lot_with_spots(SpotFinder::BestFit, &[("M", SpotSize::Medium)])?;
    let ticket = lot.park(&Vehicle::car("KA-05-5678")).expect("car parks");

    let closed = lot.exit_ticket(ticket.id())?;
    assert!(closed.is_paid());

    match lot.exit_ticket(ticket.id()) {
        Err(Error::UnknownTicket(id)) => assert_eq!(id, ticket.id().to_string()),
        other => panic!("expected UnknownTicket, got {:?}", other.map(|t| t.id())),
    }
    assert_eq!(lot.total_available(), 1);
    assert_eq!(lot.active_count(), 0);
    Ok(())
}

#[test]
fn test_pluggable_fee_schedule() -> Result<()> {
    #[derive(Debug)]
    struct NeedBasedRate;

    impl FeeSchedule for NeedBasedRate {
        fn fee(&self, size: SpotSize, hours: u64) -> f64 {
            let per_hour = match size {
                SpotSize::Small => 1.0,
                SpotSize::Medium => 2.0,
                SpotSize::Large => 3.0,
            };
            per_hour * hours as f64
        }
    }

    let lot = ParkingLot::with_options("Custom", 1, SpotFinder::BestFit, Arc::new(NeedBasedRate))?;
    lot.add_spot(1, Spot::new("L", SpotSize::Large, 1))?;

    // A car in a large spot is billed by what it needs, not where it parked
    let ticket = lot.park(&Vehicle::car("KA-05-5678")).expect("car parks");
    let closed = lot.exit_at(ticket.id(), ticket.entry_time() + Duration::hours(3))?;
    assert_eq!(closed.fee(), 6.0);

    let flat = FlatFee { amount: 9.5 };
    assert_eq!(flat.fee(SpotSize::Large, 100), 9.5);
    Ok(())
}

#[test]
fn test_configured_lot_end_to_end() -> Result<()> {
    let lot = LotConfig::from_toml_str(
        r#"
name = "Config Lot"

[[floors]]
small = 1

[[floors]]
finder = "first-fit"
large = 1
medium = 1

[fees]
base_fee = 0.0
medium_rate = 10.0
"#,
    )?
    .build()?;

    // Floor 1 has no room for a car; floor 2 uses first-fit, and its medium
    // spot comes before the large one in the generated order.
    let ticket = lot.park(&Vehicle::car("KA-05-5678")).expect("car parks");
    assert_eq!(ticket.spot().id(), "F2-M1");
    assert_eq!(ticket.spot().floor(), 2);

    assert_eq!(lot.exit(ticket.id())?, 10.0);
    assert!(matches!(
        lot.add_spot(3, Spot::new("F3-S1", SpotSize::Small, 3)),
        Err(Error::InvalidFloor { floor: 3, floors: 2 })
    ));
    Ok(())
}
