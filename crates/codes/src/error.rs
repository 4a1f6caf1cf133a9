//! Parameter validation errors for command builders.

/// A command parameter was outside the range the device accepts.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    /// Numeric parameter out of its documented range.
    #[error("{param} must be in {min}..={max}, got {value}")]
    OutOfRange {
        /// Parameter name.
        param: &'static str,
        /// Rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// Barcode data cannot be encoded for the requested symbology.
    #[error("invalid {symbology} barcode data: {details}")]
    InvalidBarcodeData {
        /// Symbology name.
        symbology: &'static str,
        /// What is wrong with the data.
        details: String,
    },

    /// Raster bitmap length does not match the declared size.
    #[error("raster data is {actual} bytes, expected {expected}")]
    RasterSize {
        /// `width_bytes × height_dots`.
        expected: usize,
        /// Length of the supplied bitmap.
        actual: usize,
    },
}
