//! Sender Module
//!
//! Turns routing decisions into writes. Each pair is placed on the ring by its **value**,
//! then written to the chosen storage node with `PUT /keys/:key/:value`.

pub mod sender;

pub use sender::{KeySender, Placement};

#[cfg(test)]
mod tests;
