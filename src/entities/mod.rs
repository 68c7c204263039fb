pub mod account;
pub mod general_ledger_accounts_grouping;
pub mod general_ledger_definition;
pub mod journal_voucher;
pub mod journal_voucher_entry;
