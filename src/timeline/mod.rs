pub(crate) mod builder;
pub(crate) mod cue;
pub(crate) mod cue_timeline;
pub(crate) mod fingerprint;
