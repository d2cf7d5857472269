pub mod calculator;
pub mod convert;
pub mod currencies;
pub mod favorites;
pub mod history;
pub mod rates;
pub mod setup;
pub mod shell;
pub mod ui;
