//! Request, response and alert data structures

pub mod alert;
pub mod loan;
pub mod result;
pub mod transaction;
