use crate::domain::product::{Catalog, Product};
use crate::error::{Result, VendingError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads products from a CSV source with a `code,name,price,state_key` header.
///
/// Whitespace around fields is trimmed and short rows are reported per row
/// rather than aborting the whole read.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
}

impl ProductReader<File> {
    /// Opens a product file. Only the open itself can fail here.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> ProductReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes one product per row.
    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(VendingError::from))
    }

    /// Collects the valid rows into a catalog, handing each bad row to
    /// `on_error`.
    pub fn into_catalog(self, mut on_error: impl FnMut(VendingError)) -> Catalog {
        let mut products = Vec::new();
        for result in self.products() {
            match result {
                Ok(product) => products.push(product),
                Err(e) => on_error(e),
            }
        }
        Catalog::new(products)
    }
}
