pub mod format_contract;
