//! One module per subcommand.  Each exposes an `execute` function.

pub mod add;
pub mod audit_cmd;
pub mod delete;
pub mod export;
pub mod get;
pub mod import_cmd;
pub mod passwd;
pub mod search;
pub mod switch;
pub mod update;
pub mod view;
