use super::ConfigError;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Adapter trait for reading a contiguous 1D series.
pub trait Read1D<T> {
    /// Borrow the underlying input as a contiguous slice.
    fn read_slice(&self) -> Result<&[T], ConfigError>;
}

/// Adapter trait for reading a multichannel record laid out `[sample, channel]`.
pub trait Read2D<T> {
    /// Borrow the underlying input as a 2D view with one column per channel.
    fn read_view(&self) -> ArrayView2<'_, T>;
}

impl<T> Read1D<T> for [T] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T, const N: usize> Read1D<T> for [T; N] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T> Read1D<T> for Vec<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self.as_slice())
    }
}

impl<T> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "series" })
    }
}

impl<'a, T> Read1D<T> for ArrayView1<'a, T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "series_view" })
    }
}

impl<T> Read2D<T> for Array2<T> {
    fn read_view(&self) -> ArrayView2<'_, T> {
        self.view()
    }
}

impl<'a, T> Read2D<T> for ArrayView2<'a, T> {
    fn read_view(&self) -> ArrayView2<'_, T> {
        self.view()
    }
}

/// Read a series and reject empty input.
pub(crate) fn read_series<'a, I>(input: &'a I, arg: &'static str) -> Result<&'a [f64], ConfigError>
where
    I: Read1D<f64> + ?Sized,
{
    let series = input.read_slice()?;
    if series.is_empty() {
        return Err(ConfigError::EmptyInput { arg });
    }
    Ok(series)
}
