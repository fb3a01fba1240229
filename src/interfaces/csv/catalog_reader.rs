use crate::domain::catalog::Product;
use crate::error::{CoreError, Result};
use std::io::Read;

/// Reads catalog products from a CSV source.
///
/// Columns: `id, name, vendor_name, price`. Wraps `csv::Reader` and
/// provides a lazy iterator over `Result<Product>`, handling whitespace
/// trimming automatically.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    /// Creates a new `CatalogReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes products.
    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CoreError::from))
    }
}
