pub mod money;
pub mod pipeline;
pub mod ports;
pub mod run;
pub mod transaction;
