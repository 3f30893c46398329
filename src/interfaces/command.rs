use crate::application::ledger::Ledger;
use crate::domain::payment::{CardCredentials, PaymentResult};
use crate::domain::table::{OrderLine, Table};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Create,
    Order,
    Pay,
    Reset,
    Remove,
}

/// One row of a command batch.
///
/// Only `type` and `table` are always required. `create` and `order` need
/// `name`, `order` and `pay` need `amount`, `pay` needs the card columns.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub r#type: CommandType,
    pub table: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub holder: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub exp_month: Option<u8>,
    #[serde(default)]
    pub exp_year: Option<u16>,
    #[serde(default)]
    pub cvc: Option<String>,
}

/// What a successfully executed command produced.
#[derive(Debug, PartialEq, Clone)]
pub enum CommandOutcome {
    Created(Table),
    OrderAdded(OrderLine),
    Payment(PaymentResult),
    Reset,
    Removed,
}

impl Command {
    fn name(&self) -> Result<&str> {
        self.name.as_deref().ok_or_else(|| {
            LedgerError::InvalidArgument(format!("{:?} requires a name", self.r#type))
        })
    }

    fn amount(&self) -> Result<Decimal> {
        self.amount.ok_or_else(|| {
            LedgerError::InvalidArgument(format!("{:?} requires an amount", self.r#type))
        })
    }

    /// Card columns as credentials. Missing columns become empty values and are
    /// rejected when the ledger validates them.
    pub fn credentials(&self) -> CardCredentials {
        CardCredentials {
            holder_name: self.holder.clone().unwrap_or_default(),
            card_number: self.card.clone().unwrap_or_default(),
            exp_month: self.exp_month.unwrap_or_default(),
            exp_year: self.exp_year.unwrap_or_default(),
            cvc: self.cvc.clone().unwrap_or_default(),
        }
    }

    /// Runs the command against the ledger.
    pub async fn execute(&self, ledger: &Ledger) -> Result<CommandOutcome> {
        match self.r#type {
            CommandType::Create => ledger
                .create_table(&self.table, self.name()?)
                .await
                .map(CommandOutcome::Created),
            CommandType::Order => ledger
                .add_order(&self.table, self.name()?, self.amount()?)
                .await
                .map(CommandOutcome::OrderAdded),
            CommandType::Pay => ledger
                .accept_payment(&self.table, self.amount()?, &self.credentials())
                .await
                .map(CommandOutcome::Payment),
            CommandType::Reset => ledger
                .reset_table(&self.table)
                .await
                .map(|_| CommandOutcome::Reset),
            CommandType::Remove => ledger
                .remove_table(&self.table)
                .await
                .map(|_| CommandOutcome::Removed),
        }
    }
}
