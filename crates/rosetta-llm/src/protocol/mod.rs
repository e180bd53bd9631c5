//! Wire format types for the vendor response and request shapes
//!
//! Each module holds plain serde structs matching one vendor family's JSON.
//! Response types only deserialize and ignore fields they do not name;
//! request types only serialize. Tool arguments travel as
//! [`serde_json::value::RawValue`] so their bytes are never re-rendered.

pub mod anthropic;
pub mod google;
pub mod openai;
