use crate::objects::ReferencePointer;

/// A page of the existing document, as far as annotation writing cares.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// The page dictionary object
    pub object_id: Option<ReferencePointer>,
    /// References already present in the page's `/Annots` array
    pub annots: Vec<ReferencePointer>,
    /// The indirect `/Annots` array object, when the page has one
    pub annots_pointer: Option<ReferencePointer>,
}

impl Page {
    pub fn new(object_id: ReferencePointer) -> Self {
        Self {
            object_id: Some(object_id),
            annots: Vec::new(),
            annots_pointer: None,
        }
    }

    pub fn with_annots(mut self, annots: Vec<ReferencePointer>) -> Self {
        self.annots = annots;
        self
    }

    pub fn with_annots_pointer(mut self, pointer: ReferencePointer) -> Self {
        self.annots_pointer = Some(pointer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_has_no_annotations() {
        let page = Page::new(ReferencePointer::new(4, 0));
        assert_eq!(page.object_id, Some(ReferencePointer::new(4, 0)));
        assert!(page.annots.is_empty());
        assert!(page.annots_pointer.is_none());
    }

    #[test]
    fn test_page_builder() {
        let page = Page::new(ReferencePointer::new(4, 0))
            .with_annots(vec![ReferencePointer::new(8, 0)])
            .with_annots_pointer(ReferencePointer::new(7, 0));
        assert_eq!(page.annots, vec![ReferencePointer::new(8, 0)]);
        assert_eq!(page.annots_pointer, Some(ReferencePointer::new(7, 0)));
    }
}
