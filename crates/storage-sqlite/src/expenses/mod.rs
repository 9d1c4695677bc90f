//! SQLite storage implementation for expenses and their approval trail.

mod model;
mod repository;

pub use model::{ApprovalDB, ExpenseDB};
pub(crate) use repository::load_expenses;
pub use repository::ExpenseRepository;
