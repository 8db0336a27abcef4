pub mod key_lookup;
pub mod keyed_record;
pub mod keyed_sequence;
