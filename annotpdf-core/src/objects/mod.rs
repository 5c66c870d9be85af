mod dictionary;
mod primitive;
mod reference;

pub use dictionary::Dictionary;
pub use primitive::Object;
pub use reference::{encode_reference, ReferencePointer};
