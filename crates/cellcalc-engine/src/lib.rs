//! cellcalc_engine - Formula resolution (reference expansion + neutralization).

pub mod engine;
