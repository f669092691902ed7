//! Durable storage primitives.

mod atomic_record;

pub use atomic_record::AtomicRecordFile;
