pub mod convert;
pub mod fees;
pub mod history;
pub mod portfolio;
pub mod rate;
pub mod setup;
pub mod trends;
pub mod ui;
