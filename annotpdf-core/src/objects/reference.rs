use crate::writer::tokens::{encode_integer, R, SPACE};
use std::fmt;

/// An indirect object slot: object number plus generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferencePointer {
    obj: u32,
    generation: u16,
}

impl ReferencePointer {
    pub fn new(obj: u32, generation: u16) -> Self {
        Self { obj, generation }
    }

    pub fn obj(&self) -> u32 {
        self.obj
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }
}

impl fmt::Display for ReferencePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.obj, self.generation)
    }
}

impl From<(u32, u16)> for ReferencePointer {
    fn from((obj, generation): (u32, u16)) -> Self {
        Self::new(obj, generation)
    }
}

/// Writes `<obj> <generation>`, followed by ` R` when `referenced` is set.
///
/// The unreferenced form is the header of an object definition and is
/// followed by the `obj` keyword; the referenced form is an occurrence of the
/// object inside another object.
pub fn encode_reference(reference: ReferencePointer, referenced: bool) -> Vec<u8> {
    let mut out = encode_integer(reference.obj);
    out.push(SPACE);
    out.extend_from_slice(&encode_integer(reference.generation));
    if referenced {
        out.push(SPACE);
        out.push(R);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_accessors() {
        let reference = ReferencePointer::new(12, 3);
        assert_eq!(reference.obj(), 12);
        assert_eq!(reference.generation(), 3);
        assert_eq!(reference, ReferencePointer::from((12, 3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ReferencePointer::new(5, 0).to_string(), "5 0 R");
    }

    #[test]
    fn test_encode_definition_header() {
        assert_eq!(encode_reference(ReferencePointer::new(42, 0), false), b"42 0");
    }

    #[test]
    fn test_encode_reference_occurrence() {
        assert_eq!(encode_reference(ReferencePointer::new(42, 7), true), b"42 7 R");
    }

    #[test]
    fn test_ordering_by_number_then_generation() {
        let mut refs = vec![
            ReferencePointer::new(3, 1),
            ReferencePointer::new(1, 0),
            ReferencePointer::new(3, 0),
        ];
        refs.sort();
        assert_eq!(
            refs,
            vec![
                ReferencePointer::new(1, 0),
                ReferencePointer::new(3, 0),
                ReferencePointer::new(3, 1),
            ]
        );
    }
}
