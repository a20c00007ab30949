//! DataItem decoding.

use std::path::Path;

use super::{BinarySource, TypedArray};
use crate::resolve::PathResolver;
use crate::util::{Error, NumberType, Result};
use crate::xdmf::DataDescriptor;

/// Turns [`DataDescriptor`]s into bounded payload arrays.
#[derive(Clone, Copy, Debug)]
pub struct ArrayDecoder<'a> {
    resolver: PathResolver<'a>,
    use_mmap: bool,
}

impl<'a> ArrayDecoder<'a> {
    pub fn new(resolver: PathResolver<'a>) -> Self {
        Self { resolver, use_mmap: cfg!(feature = "mmap") }
    }

    /// Choose between memory-mapped and buffered payload access.
    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    #[inline]
    pub fn resolver(&self) -> &PathResolver<'a> {
        &self.resolver
    }

    /// Resolve and open the payload of `desc`.
    ///
    /// The declared range is validated here, so a returned array always
    /// lies within its file.
    pub fn decode(&self, desc: &DataDescriptor) -> Result<DecodedArray> {
        tracing::debug!(
            name = desc.name.as_deref().unwrap_or(""),
            format = %desc.format,
            data_type = %desc.data_type,
            precision = ?desc.precision,
            seek = desc.seek,
            dims = %desc.dimensions,
            "decoding data item"
        );

        if !desc.is_binary() {
            return Err(Error::UnsupportedFormat(desc.format.clone()));
        }

        let path = self.resolver.resolve(&desc.text)?;
        let number_type = desc.number_type();
        let count = desc.count();
        let source = BinarySource::open_opts(&path, self.use_mmap)?;

        let byte_len = count
            .checked_mul(number_type.num_bytes())
            .map_or(u64::MAX, |n| n as u64);
        source.check_range(desc.seek, byte_len)?;

        Ok(DecodedArray { source, number_type, offset: desc.seek, count })
    }
}

/// An opened payload range of known type and length.
///
/// Owns the file handle or mapping; views borrow from it.
#[derive(Debug)]
pub struct DecodedArray {
    source: BinarySource,
    number_type: NumberType,
    offset: u64,
    count: usize,
}

impl DecodedArray {
    /// Typed view over the payload range.
    pub fn view(&self) -> Result<TypedArray<'_>> {
        let bytes = self.source.bytes(self.offset, self.count * self.number_type.num_bytes())?;
        Ok(TypedArray::from_bytes(self.number_type, bytes))
    }

    #[inline]
    pub fn number_type(&self) -> NumberType {
        self.number_type
    }

    /// Element count.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Resolved payload path.
    #[inline]
    pub fn path(&self) -> &Path {
        self.source.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::SourceContext;
    use tempfile::TempDir;

    fn write<T: bytemuck::Pod>(dir: &TempDir, name: &str, data: &[T]) {
        std::fs::write(dir.path().join(name), bytemuck::cast_slice::<T, u8>(data)).unwrap();
    }

    #[test]
    fn test_every_type_decodes_declared_count() -> Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "f32.bin", &[1.0f32, 2.0, 3.0, 4.0]);
        write(&dir, "f64.bin", &[1.0f64, 2.0, 3.0, 4.0]);
        write(&dir, "i32.bin", &[1i32, 2, 3, 4]);
        write(&dir, "i64.bin", &[1i64, 2, 3, 4]);

        let ctx = SourceContext::new("doc.xmf", dir.path());
        let decoder = ArrayDecoder::new(PathResolver::new(&ctx));

        let cases = [
            ("f32.bin", "Float", Some(4), NumberType::Float32),
            ("f64.bin", "Float", Some(8), NumberType::Float64),
            ("f32.bin", "Float", None, NumberType::Float32),
            ("i32.bin", "Int", Some(4), NumberType::Int32),
            ("i32.bin", "Int", None, NumberType::Int32),
            ("i64.bin", "Int", Some(8), NumberType::Int64),
            ("f32.bin", "Double", Some(8), NumberType::Float32),
        ];
        for (file, tag, precision, expected) in cases {
            let array = decoder.decode(&DataDescriptor::binary(file, tag, precision, 0, 4))?;
            let view = array.view()?;
            assert_eq!(view.number_type(), expected, "{tag} {precision:?}");
            assert_eq!(view.len(), 4);
            assert_eq!(view.to_f32_vec(), vec![1.0, 2.0, 3.0, 4.0], "{file}");
        }
        Ok(())
    }

    #[test]
    fn test_seek_offset() -> Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "v.bin", &[9i32, 9, 5, 6, 7]);

        let ctx = SourceContext::new("doc.xmf", dir.path());
        for use_mmap in [true, false] {
            let decoder = ArrayDecoder::new(PathResolver::new(&ctx)).with_mmap(use_mmap);
            let array = decoder.decode(&DataDescriptor::binary("v.bin", "Int", Some(4), 8, 3))?;
            assert_eq!(array.view()?.as_slice::<i32>(), Some(&[5, 6, 7][..]));
        }
        Ok(())
    }

    #[test]
    fn test_dimensions_past_end_is_truncated() -> Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "short.bin", &[1.0f32, 2.0, 3.0]);

        let ctx = SourceContext::new("doc.xmf", dir.path());
        let decoder = ArrayDecoder::new(PathResolver::new(&ctx));
        let err = decoder.decode(&DataDescriptor::binary("short.bin", "Float", Some(4), 0, 4)).unwrap_err();
        assert!(matches!(err, Error::TruncatedData { required: 16, available: 12, .. }));

        let err = decoder.decode(&DataDescriptor::binary("short.bin", "Float", Some(4), 4, 3)).unwrap_err();
        assert!(matches!(err, Error::TruncatedData { .. }));
        Ok(())
    }

    #[test]
    fn test_non_binary_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = SourceContext::new("doc.xmf", dir.path());
        let decoder = ArrayDecoder::new(PathResolver::new(&ctx));

        let mut desc = DataDescriptor::binary("0 1 2", "Int", None, 0, 3);
        desc.format = "XML".to_string();
        assert!(matches!(decoder.decode(&desc), Err(Error::UnsupportedFormat(f)) if f == "XML"));
        Ok(())
    }

    #[test]
    fn test_missing_payload() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = SourceContext::new("doc.xmf", dir.path());
        let decoder = ArrayDecoder::new(PathResolver::new(&ctx));
        let desc = DataDescriptor::binary("nope.bin", "Float", None, 0, 1);
        assert!(matches!(decoder.decode(&desc), Err(Error::Resolution { .. })));
        Ok(())
    }
}
