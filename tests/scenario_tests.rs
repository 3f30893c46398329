use rust_decimal_macros::dec;
use tabledger::domain::money::Money;
use tabledger::domain::payment::DeclineReason;
use tabledger::domain::ports::SettlementLog;
use tabledger::domain::table::BillState;
use tabledger::error::LedgerError;
use tabledger::infrastructure::gateway::SimulatedGateway;

mod common;

use common::{card, ledger_with_log};

/// Garden-1 walked through creation, a rejected overpayment, a declined card,
/// a full payment and a reset.
#[tokio::test]
async fn test_garden_table_lifecycle() {
    let (ledger, log) = ledger_with_log(SimulatedGateway::new());

    // A: two orders make up the bill
    ledger.create_table("t1", "Garden-1").await.unwrap();
    ledger.add_order("t1", "Espresso", dec!(8.00)).await.unwrap();
    ledger.add_order("t1", "Cheesecake", dec!(5.00)).await.unwrap();

    let bill = ledger.get_bill("t1").await.unwrap();
    assert_eq!(bill.name, "Garden-1");
    assert_eq!(bill.total_due, Money::new(dec!(13.00)));
    assert_eq!(bill.paid_amount, Money::ZERO);
    assert_eq!(bill.remaining_balance, Money::new(dec!(13.00)));
    assert_eq!(bill.orders.len(), 2);
    assert_eq!(bill.state, BillState::Occupied);

    // B: paying more than is owed is rejected before the gateway is asked
    let result = ledger.accept_payment("t1", dec!(20.00), &card("123")).await.unwrap();
    assert_eq!(result.decline_reason(), Some(DeclineReason::OverpaymentRejected));
    assert_eq!(result.remaining_balance(), Money::new(dec!(13.00)));
    assert_eq!(ledger.get_bill("t1").await.unwrap().paid_amount, Money::ZERO);

    // C: the gateway declines CVC 999
    let result = ledger.accept_payment("t1", dec!(13.00), &card("999")).await.unwrap();
    assert_eq!(result.decline_reason(), Some(DeclineReason::GatewayDeclined));
    assert_eq!(result.remaining_balance(), Money::new(dec!(13.00)));
    assert_eq!(ledger.get_bill("t1").await.unwrap().paid_amount, Money::ZERO);
    assert!(log.entries().await.unwrap().is_empty());

    // D: a good card settles the bill and is logged once
    let result = ledger.accept_payment("t1", dec!(13.00), &card("123")).await.unwrap();
    assert!(result.is_accepted());
    assert_eq!(result.remaining_balance().rounded().to_string(), "0.00");
    match &result {
        tabledger::domain::payment::PaymentResult::Accepted { reference, .. } => {
            assert!(!reference.is_empty());
        }
        other => panic!("expected acceptance, got {other:?}"),
    }
    let entries = log.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].table_id, "t1");
    assert_eq!(entries[0].amount.value(), dec!(13.00));
    assert_eq!(
        ledger.get_bill("t1").await.unwrap().state,
        BillState::Settled
    );

    // E: reset clears the table for the next party
    ledger.reset_table("t1").await.unwrap();
    let bill = ledger.get_bill("t1").await.unwrap();
    assert!(bill.orders.is_empty());
    assert_eq!(bill.total_due, Money::ZERO);
    assert_eq!(bill.paid_amount, Money::ZERO);
    assert_eq!(bill.state, BillState::Empty);
}

#[tokio::test]
async fn test_payment_on_unknown_table() {
    let (ledger, log) = ledger_with_log(SimulatedGateway::new());

    let result = ledger.accept_payment("ghost", dec!(1.00), &card("123")).await;
    assert!(matches!(result, Err(LedgerError::NotFound(id)) if id == "ghost"));
    assert!(log.entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_table_operations() {
    let (ledger, _) = ledger_with_log(SimulatedGateway::new());

    assert!(matches!(
        ledger.get_bill("ghost").await,
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        ledger.reset_table("ghost").await,
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        ledger.add_order("ghost", "Tea", dec!(1)).await,
        Err(LedgerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_create_table_rejects_empty_fields() {
    let (ledger, _) = ledger_with_log(SimulatedGateway::new());

    assert!(matches!(
        ledger.create_table("", "Garden-1").await,
        Err(LedgerError::InvalidArgument(_))
    ));
    assert!(matches!(
        ledger.create_table("t1", "").await,
        Err(LedgerError::InvalidArgument(_))
    ));
    assert!(ledger.list_tables().await.unwrap().is_empty());
}
