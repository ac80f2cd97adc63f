pub mod categories;
pub mod evaluate;
pub mod liveness;
pub mod question;
pub mod readiness;
