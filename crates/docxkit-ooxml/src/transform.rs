//! The part transformer abstraction
//!
//! Every pipeline reduces to one capability: take the text of one package
//! part and return its replacement. The package rewriter and the template
//! materializer depend only on [`PartTransformer`], never on a concrete
//! variant.

use crate::error::Result;

/// A binary part contributed by a transformer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraPart {
    /// Path inside the package (e.g. `word/media/image_1.png`)
    pub path: String,
    /// Raw bytes
    pub contents: Vec<u8>,
}

/// Transforms the text of a single package part
pub trait PartTransformer {
    /// Produce the replacement text for the part at `path`
    fn transform(&self, path: &str, text: &str) -> Result<String>;

    /// Parts to add to the output package before the transformed ones
    fn extra_parts(&self) -> Vec<ExtraPart> {
        Vec::new()
    }
}

/// Leaves every part untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl PartTransformer for Identity {
    fn transform(&self, _path: &str, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

impl<T: PartTransformer + ?Sized> PartTransformer for &T {
    fn transform(&self, path: &str, text: &str) -> Result<String> {
        (**self).transform(path, text)
    }

    fn extra_parts(&self) -> Vec<ExtraPart> {
        (**self).extra_parts()
    }
}

impl<T: PartTransformer + ?Sized> PartTransformer for Box<T> {
    fn transform(&self, path: &str, text: &str) -> Result<String> {
        (**self).transform(path, text)
    }

    fn extra_parts(&self) -> Vec<ExtraPart> {
        (**self).extra_parts()
    }
}
