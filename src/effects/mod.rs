pub(crate) mod dispatch;
pub(crate) mod effect;
pub(crate) mod executor;
