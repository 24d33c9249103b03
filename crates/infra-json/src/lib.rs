// Time Machine Infrastructure - JSON File Adapter
// Implements: MessageQueue as one indented JSON document on disk

mod document;
mod json_queue;

pub use document::{decode, encode};
pub use json_queue::JsonFileQueue;
