//! Tally demo
//!
//! Seeds an in-memory store and drives the transaction ledger through a
//! representative session: income, a guarded expense, a transfer, an
//! amendment, and a deletion.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::budget::Budget;
use tally_core::ledger::types::{
    Account, Category, CategoryType, CreateTransactionInput, TransactionType, TransactionUpdate,
    User,
};
use tally_core::ledger::TransactionLedger;
use tally_shared::types::{AccountId, BudgetId, CategoryId, UserId};
use tally_shared::AppConfig;
use tally_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    info!(store = %config.store.url, name = %config.store.name, "Store configured");

    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();

    let user = User {
        id: UserId::new(),
        name: "Alice".to_string(),
    };
    let checking = Account {
        id: AccountId::new(),
        user_id: user.id,
        name: "Checking".to_string(),
        balance: dec!(200.00),
        minimum_balance: dec!(0.00),
        created_at: now,
        updated_at: now,
    };
    let savings = Account {
        id: AccountId::new(),
        user_id: user.id,
        name: "Savings".to_string(),
        balance: dec!(0.00),
        minimum_balance: dec!(0.00),
        created_at: now,
        updated_at: now,
    };
    let salary = Category {
        id: CategoryId::new(),
        user_id: user.id,
        name: "Salary".to_string(),
        category_type: CategoryType::Income,
    };
    let groceries = Category {
        id: CategoryId::new(),
        user_id: user.id,
        name: "Groceries".to_string(),
        category_type: CategoryType::Expense,
    };
    let budget = Budget {
        id: BudgetId::new(),
        user_id: user.id,
        category_id: groceries.id,
        year: now.year(),
        month: now.month(),
        amount: dec!(150.00),
    };

    let user_id = user.id;
    let checking_id = checking.id;
    let savings_id = savings.id;
    let salary_id = salary.id;
    let groceries_id = groceries.id;
    store.put_user(user);
    store.put_account(checking);
    store.put_account(savings);
    store.put_category(salary);
    store.put_category(groceries);
    store.put_budget(budget);

    let ledger = TransactionLedger::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );

    let paycheck = ledger
        .create_transaction(CreateTransactionInput {
            user_id,
            account_id: checking_id,
            category_id: salary_id,
            amount: dec!(2500.00),
            transaction_type: TransactionType::Income,
            occurred_at: now,
            description: Some("August salary".to_string()),
            notes: None,
            counterparty: Some("Acme Corp".to_string()),
            transfer_account_id: None,
        })
        .await?;
    info!(id = %paycheck.id, amount = %paycheck.amount, "Recorded income");

    let shop = ledger
        .create_transaction(CreateTransactionInput {
            user_id,
            account_id: checking_id,
            category_id: groceries_id,
            amount: dec!(84.995),
            transaction_type: TransactionType::Expense,
            occurred_at: now,
            description: Some("Weekly shop".to_string()),
            notes: None,
            counterparty: None,
            transfer_account_id: None,
        })
        .await?;
    info!(id = %shop.id, amount = %shop.amount, "Recorded expense");

    // Pushes the month over the 150.00 grocery budget.
    if let Err(err) = ledger
        .create_transaction(CreateTransactionInput {
            user_id,
            account_id: checking_id,
            category_id: groceries_id,
            amount: dec!(100.00),
            transaction_type: TransactionType::Expense,
            occurred_at: now,
            description: Some("Stocking up".to_string()),
            notes: None,
            counterparty: None,
            transfer_account_id: None,
        })
        .await
    {
        info!(code = err.error_code(), %err, "Expense rejected");
    }

    let stash = ledger
        .create_transaction(CreateTransactionInput {
            user_id,
            account_id: checking_id,
            category_id: groceries_id,
            amount: dec!(500.00),
            transaction_type: TransactionType::Transfer,
            occurred_at: now,
            description: Some("Monthly savings".to_string()),
            notes: None,
            counterparty: None,
            transfer_account_id: Some(savings_id),
        })
        .await?;
    info!(id = %stash.id, amount = %stash.amount, "Recorded transfer");

    let amended = ledger
        .update_transaction(
            shop.id,
            TransactionUpdate {
                amount: Some(dec!(60.00)),
                notes: Some("Returned the melon".to_string()),
                ..TransactionUpdate::default()
            },
        )
        .await?;
    info!(id = %amended.id, amount = %amended.amount, "Amended expense");

    ledger.delete_transaction(stash.id).await?;
    info!(id = %stash.id, "Deleted transfer");

    if let Err(err) = ledger.get_transaction(stash.id).await
        && err.is_not_found()
    {
        info!(id = %stash.id, code = err.error_code(), "Transfer is gone");
    }

    for transaction in ledger.list_transactions_for_user(user_id).await? {
        info!(
            id = %transaction.id,
            kind = %transaction.transaction_type,
            amount = %transaction.amount,
            "Ledger entry"
        );
    }

    Ok(())
}
